use crate::format::{format_currency, format_fixed2, humanize_key};
use analytics::DerivedMetrics;
use core_types::Scenario;
use serde::Serialize;

pub const NOT_RECOVERABLE: &str = "More than horizon / not recoverable";

const SUMMARY: &str = "This report summarizes expected monthly savings, cumulative savings, \
ROI, and payback period based on the inputs provided.";
const NOTES: &str = "Notes: This is a model and uses simplified assumptions. For a detailed \
analysis, validate local costs and processes.";

/// A rendered report, independent of its output format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub summary: String,
    /// Inputs, key results and details, in that order.
    pub sections: Vec<ReportSection>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub heading: String,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub label: String,
    pub value: String,
    /// Highlighted in the HTML output (the headline savings figure).
    pub emphasis: bool,
}

impl ReportRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            emphasis: false,
        }
    }

    fn emphasized(mut self) -> Self {
        self.emphasis = true;
        self
    }
}

impl ReportDocument {
    pub fn section(&self, heading: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

impl ReportSection {
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

/// Builds the report for a scenario from its freshly computed metrics.
pub fn render_report(scenario: &Scenario, metrics: &DerivedMetrics) -> ReportDocument {
    ReportDocument {
        title: format!("ROI Report — {}", scenario.display_name()),
        summary: SUMMARY.to_string(),
        sections: vec![
            inputs_section(scenario),
            key_results_section(scenario, metrics),
            details_section(metrics),
        ],
        notes: NOTES.to_string(),
    }
}

fn inputs_section(scenario: &Scenario) -> ReportSection {
    let rows = scenario
        .input
        .fields()
        .into_iter()
        .map(|(key, value)| ReportRow::new(humanize_key(key), value))
        .collect();
    ReportSection {
        heading: "Inputs".to_string(),
        rows,
    }
}

fn key_results_section(scenario: &Scenario, m: &DerivedMetrics) -> ReportSection {
    let payback = match m.payback_months {
        Some(months) => format!("{months} months"),
        None => NOT_RECOVERABLE.to_string(),
    };
    ReportSection {
        heading: "Key results".to_string(),
        rows: vec![
            ReportRow::new("Baseline monthly cost", format_currency(m.baseline_monthly_total)),
            ReportRow::new(
                "Estimated monthly cost after automation",
                format_currency(m.new_monthly_total),
            ),
            ReportRow::new(
                "Estimated monthly savings",
                format_currency(m.monthly_net_savings),
            )
            .emphasized(),
            ReportRow::new(
                format!(
                    "Cumulative savings ({} months)",
                    scenario.input.time_horizon_months
                ),
                format_currency(m.cumulative_savings),
            ),
            ReportRow::new("Estimated ROI (adjusted)", format_fixed2(m.roi)),
            ReportRow::new("Payback period", payback),
        ],
    }
}

fn details_section(m: &DerivedMetrics) -> ReportSection {
    let d = &m.details;
    ReportSection {
        heading: "Details".to_string(),
        rows: vec![
            ReportRow::new(
                "Manual labor cost / month",
                format_currency(d.manual_monthly_labor_cost),
            ),
            ReportRow::new(
                "Automated processing cost / month",
                format_currency(d.automated_monthly_processing_cost),
            ),
            ReportRow::new(
                "Manual error cost / month",
                format_currency(d.manual_error_costs_monthly),
            ),
            ReportRow::new(
                "Automated error cost / month",
                format_currency(d.automated_error_costs_monthly),
            ),
            ReportRow::new(
                "Estimated time saved (hrs / month)",
                format_fixed2(d.time_saved_hours_per_month),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::MetricsEngine;
    use core_types::ScenarioInput;

    fn scenario(name: &str, implementation_cost: f64) -> Scenario {
        Scenario::new(
            Some("scn-1".to_string()),
            ScenarioInput {
                scenario_name: name.to_string(),
                monthly_invoice_volume: 1000.0,
                num_ap_staff: 3.0,
                avg_hours_per_invoice: 0.1,
                hourly_wage: 20.0,
                error_rate_manual: 0.05,
                error_cost: 50.0,
                time_horizon_months: 12.0,
                one_time_implementation_cost: implementation_cost,
            },
        )
    }

    fn render(scenario: &Scenario) -> ReportDocument {
        let metrics = MetricsEngine::default().compute(&scenario.input);
        render_report(scenario, &metrics)
    }

    #[test]
    fn title_uses_name_or_id() {
        assert_eq!(render(&scenario("Q3 pilot", 5000.0)).title, "ROI Report — Q3 pilot");
        assert_eq!(render(&scenario("", 5000.0)).title, "ROI Report — scn-1");
    }

    #[test]
    fn sections_are_in_fixed_order() {
        let doc = render(&scenario("Q3 pilot", 5000.0));
        let headings: Vec<_> = doc.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, ["Inputs", "Key results", "Details"]);
    }

    #[test]
    fn inputs_exclude_id_and_created_at_and_keep_raw_values() {
        let doc = render(&scenario("Q3 pilot", 5000.0));
        let inputs = doc.section("Inputs").unwrap();

        assert_eq!(inputs.rows.len(), 9);
        assert_eq!(inputs.rows[0].label, "Scenario Name");
        assert_eq!(inputs.value_of("Monthly Invoice Volume"), Some("1000"));
        assert_eq!(inputs.value_of("Avg Hours Per Invoice"), Some("0.1"));
        assert_eq!(inputs.value_of("One Time Implementation Cost"), Some("5000"));
        assert!(inputs.value_of("Id").is_none());
        assert!(inputs.value_of("Created At").is_none());
    }

    #[test]
    fn key_results_are_formatted() {
        let doc = render(&scenario("Q3 pilot", 5000.0));
        let results = doc.section("Key results").unwrap();

        assert_eq!(results.value_of("Baseline monthly cost"), Some("$4,500.00"));
        assert_eq!(
            results.value_of("Estimated monthly cost after automation"),
            Some("$5,200.00")
        );
        assert_eq!(results.value_of("Estimated monthly savings"), Some("-$700.00"));
        assert_eq!(
            results.value_of("Cumulative savings (12 months)"),
            Some("-$13,400.00")
        );
        assert_eq!(results.value_of("Estimated ROI (adjusted)"), Some("-2.95"));
        assert_eq!(results.value_of("Payback period"), Some(NOT_RECOVERABLE));
        assert!(results.rows[2].emphasis);
    }

    #[test]
    fn payback_renders_month_count() {
        let mut s = scenario("Labor heavy", 3000.0);
        s.input.avg_hours_per_invoice = 0.5;
        s.input.error_cost = 0.0;
        let doc = render(&s);
        let results = doc.section("Key results").unwrap();

        // $10,000 manual labor against $200 processing plus $7,333.33 residual labor.
        assert_eq!(results.value_of("Estimated monthly savings"), Some("$2,466.67"));
        assert_eq!(results.value_of("Payback period"), Some("2 months"));
    }

    #[test]
    fn details_show_time_saved_as_hours() {
        let doc = render(&scenario("Q3 pilot", 5000.0));
        let details = doc.section("Details").unwrap();

        assert_eq!(details.rows.len(), 5);
        assert_eq!(details.value_of("Manual labor cost / month"), Some("$2,000.00"));
        assert_eq!(details.value_of("Automated processing cost / month"), Some("$200.00"));
        assert_eq!(details.value_of("Manual error cost / month"), Some("$2,500.00"));
        assert_eq!(details.value_of("Automated error cost / month"), Some("$5,000.00"));
        assert_eq!(
            details.value_of("Estimated time saved (hrs / month)"),
            Some("133.33")
        );
    }
}
