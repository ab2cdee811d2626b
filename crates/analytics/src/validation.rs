use crate::error::ValidationError;
use core_types::{DEFAULT_SCENARIO_NAME, ScenarioInput};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Horizon used when the submitted value cannot be read as a number.
pub const DEFAULT_TIME_HORIZON_MONTHS: f64 = 12.0;

/// A scenario payload exactly as submitted by a client.
///
/// Every field is a loose JSON value: numbers may arrive as numbers, numeric
/// strings, booleans or nulls. `validate` coerces and checks them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScenarioInput {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub scenario_name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub monthly_invoice_volume: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub num_ap_staff: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub avg_hours_per_invoice: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub hourly_wage: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub error_rate_manual: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub error_cost: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub time_horizon_months: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub one_time_implementation_cost: Option<Value>,
}

impl RawScenarioInput {
    /// The client-supplied id, if it is a non-empty string or a number.
    pub fn id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Keeps an explicit `null` distinguishable from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Coerces a raw payload into a `ScenarioInput`, rejecting values the engine
/// must never see.
///
/// Coercion failures default the horizon to 12 months and the informational and
/// cost fields to zero. Volume, horizon, wage and the manual error rate are then
/// range-checked.
pub fn validate(raw: &RawScenarioInput) -> Result<ScenarioInput, ValidationError> {
    let monthly_invoice_volume = coerce_number(raw.monthly_invoice_volume.as_ref())
        .filter(|v| *v >= 0.0)
        .ok_or(ValidationError::InvalidInvoiceVolume)?;

    // Unreadable means the default; readable but infinite or NaN is rejected.
    let time_horizon_months = parse_number(raw.time_horizon_months.as_ref())
        .unwrap_or(DEFAULT_TIME_HORIZON_MONTHS);
    if !time_horizon_months.is_finite() || time_horizon_months <= 0.0 {
        return Err(ValidationError::InvalidTimeHorizon);
    }

    let hourly_wage = coerce_number(raw.hourly_wage.as_ref())
        .filter(|v| *v >= 0.0)
        .ok_or(ValidationError::InvalidHourlyWage)?;

    let error_rate_manual = coerce_number(raw.error_rate_manual.as_ref())
        .filter(|v| *v >= 0.0)
        .ok_or(ValidationError::InvalidManualErrorRate)?;

    let input = ScenarioInput {
        scenario_name: coerce_name(raw.scenario_name.as_ref()),
        monthly_invoice_volume,
        num_ap_staff: coerce_number(raw.num_ap_staff.as_ref()).unwrap_or(0.0),
        avg_hours_per_invoice: coerce_number(raw.avg_hours_per_invoice.as_ref()).unwrap_or(0.0),
        hourly_wage,
        error_rate_manual,
        error_cost: coerce_number(raw.error_cost.as_ref()).unwrap_or(0.0),
        time_horizon_months,
        one_time_implementation_cost: coerce_number(raw.one_time_implementation_cost.as_ref())
            .unwrap_or(0.0),
    };

    tracing::debug!(scenario_name = %input.scenario_name, "Scenario input validated.");
    Ok(input)
}

/// Loose numeric conversion. `None` means the value could not be read as a
/// finite number.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    parse_number(value).filter(|number| number.is_finite())
}

/// Like `coerce_number`, but keeps infinities and NaN spelled out as strings.
fn parse_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => return None,
    };
    Some(number)
}

fn coerce_name(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => DEFAULT_SCENARIO_NAME.to_string(),
    }
}
