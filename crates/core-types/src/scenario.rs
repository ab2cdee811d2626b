use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to scenarios saved without one.
pub const DEFAULT_SCENARIO_NAME: &str = "Untitled";

/// The validated, numeric inputs of a single ROI estimate.
///
/// Values of this type have already passed the validation boundary in the
/// `analytics` crate; the metrics engine trusts them as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub scenario_name: String,
    pub monthly_invoice_volume: f64,
    /// Informational only. No formula reads it.
    pub num_ap_staff: f64,
    pub avg_hours_per_invoice: f64,
    pub hourly_wage: f64,
    /// Fraction of manually processed invoices that contain an error.
    pub error_rate_manual: f64,
    pub error_cost: f64,
    pub time_horizon_months: f64,
    pub one_time_implementation_cost: f64,
}

impl ScenarioInput {
    /// Every input field in schema order, paired with its verbatim rendering.
    ///
    /// Consumers that present the inputs (reports, CLI tables) iterate this list
    /// instead of enumerating struct fields.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("scenario_name", self.scenario_name.clone()),
            ("monthly_invoice_volume", self.monthly_invoice_volume.to_string()),
            ("num_ap_staff", self.num_ap_staff.to_string()),
            ("avg_hours_per_invoice", self.avg_hours_per_invoice.to_string()),
            ("hourly_wage", self.hourly_wage.to_string()),
            ("error_rate_manual", self.error_rate_manual.to_string()),
            ("error_cost", self.error_cost.to_string()),
            ("time_horizon_months", self.time_horizon_months.to_string()),
            (
                "one_time_implementation_cost",
                self.one_time_implementation_cost.to_string(),
            ),
        ]
    }
}

/// A named, persisted scenario: the inputs plus identity and save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    #[serde(flatten)]
    pub input: ScenarioInput,
    /// Stamped by the store on every save; `None` until the scenario is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Scenario {
    /// Builds an unsaved scenario, generating a UUIDv4 id when none (or an empty
    /// one) is supplied.
    pub fn new(id: Option<String>, input: ScenarioInput) -> Self {
        let id = id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Self {
            id,
            input,
            created_at: None,
        }
    }

    /// The name shown in report titles and email subjects, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.input.scenario_name.is_empty() {
            &self.id
        } else {
            &self.input.scenario_name
        }
    }

    pub fn summary(&self) -> Option<ScenarioSummary> {
        self.created_at.map(|created_at| ScenarioSummary {
            id: self.id.clone(),
            scenario_name: self.input.scenario_name.clone(),
            created_at,
        })
    }
}

/// The listing view of a stored scenario. Never carries the inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub scenario_name: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input(name: &str) -> ScenarioInput {
        ScenarioInput {
            scenario_name: name.to_string(),
            monthly_invoice_volume: 1000.0,
            num_ap_staff: 3.0,
            avg_hours_per_invoice: 0.1,
            hourly_wage: 20.0,
            error_rate_manual: 0.05,
            error_cost: 50.0,
            time_horizon_months: 12.0,
            one_time_implementation_cost: 5000.0,
        }
    }

    #[test]
    fn new_scenario_generates_id_when_missing_or_empty() {
        let a = Scenario::new(None, sample_input("A"));
        let b = Scenario::new(Some(String::new()), sample_input("B"));
        assert!(Uuid::parse_str(&a.id).is_ok());
        assert!(Uuid::parse_str(&b.id).is_ok());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn new_scenario_keeps_supplied_id() {
        let s = Scenario::new(Some("q3-pilot".to_string()), sample_input("Pilot"));
        assert_eq!(s.id, "q3-pilot");
        assert!(s.created_at.is_none());
        assert!(s.summary().is_none());
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let s = Scenario::new(Some("abc".to_string()), sample_input(""));
        assert_eq!(s.display_name(), "abc");
        let named = Scenario::new(Some("abc".to_string()), sample_input("Pilot"));
        assert_eq!(named.display_name(), "Pilot");
    }

    #[test]
    fn fields_are_in_schema_order_and_rendered_verbatim() {
        let fields = sample_input("Pilot").fields();
        let names: Vec<_> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            [
                "scenario_name",
                "monthly_invoice_volume",
                "num_ap_staff",
                "avg_hours_per_invoice",
                "hourly_wage",
                "error_rate_manual",
                "error_cost",
                "time_horizon_months",
                "one_time_implementation_cost",
            ]
        );
        assert_eq!(fields[1].1, "1000");
        assert_eq!(fields[3].1, "0.1");
    }

    #[test]
    fn scenario_serializes_flat() {
        let s = Scenario::new(Some("abc".to_string()), sample_input("Pilot"));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["scenario_name"], "Pilot");
        assert_eq!(json["hourly_wage"], 20.0);
        assert!(json.get("input").is_none());
        assert!(json.get("created_at").is_none());
    }
}
