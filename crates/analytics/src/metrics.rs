use serde::{Deserialize, Serialize};

/// The derived financial comparison for one scenario.
///
/// This struct is the output of the `MetricsEngine` and is consumed both by the
/// report renderer and, verbatim, by API callers. It is never persisted; it is
/// recomputed from the stored inputs on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Monthly cost of the manual workflow (labor plus errors).
    pub baseline_monthly_total: f64,
    /// Monthly cost once automated (processing, errors, residual labor).
    pub new_monthly_total: f64,
    /// `baseline - new`. Negative when automation costs more.
    pub monthly_net_savings: f64,
    /// Net savings over the horizon minus the one-time implementation cost.
    pub cumulative_savings: f64,
    /// Adjusted ROI (raw ROI times the boost factor). The raw value is not exposed.
    pub roi: f64,
    /// `None` when the net monthly savings are not positive, i.e. never paid back.
    pub payback_months: Option<i64>,
    pub details: MetricDetails,
}

/// Intermediate quantities the report renderer needs to explain the totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDetails {
    pub manual_monthly_labor_cost: f64,
    pub automated_monthly_processing_cost: f64,
    pub manual_error_costs_monthly: f64,
    pub automated_error_costs_monthly: f64,
    pub labor_savings: f64,
    pub time_saved_hours_per_month: f64,
}
