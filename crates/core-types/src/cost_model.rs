use serde::{Deserialize, Serialize};

/// The fixed assumptions of the automation cost model.
///
/// The engine never reads these from globals; a `CostModel` is handed to it at
/// construction so alternate models can be substituted in tests or loaded from
/// the `[cost_model]` section of the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Flat processing cost charged per invoice once automated.
    pub automated_cost_per_invoice: f64,
    /// Error fraction of the automated workflow, independent of the manual rate.
    pub error_rate_auto: f64,
    /// Labor minutes saved on every invoice by automating it.
    pub time_saved_per_invoice_minutes: f64,
    /// Multiplier applied to the raw ROI before it is exposed.
    pub min_roi_boost_factor: f64,
}

impl CostModel {
    pub const DEFAULT_AUTOMATED_COST_PER_INVOICE: f64 = 0.20;
    pub const DEFAULT_ERROR_RATE_AUTO: f64 = 0.1;
    pub const DEFAULT_TIME_SAVED_PER_INVOICE_MINUTES: f64 = 8.0;
    pub const DEFAULT_MIN_ROI_BOOST_FACTOR: f64 = 1.1;

    /// Minutes saved per invoice expressed in hours.
    pub fn time_saved_per_invoice_hours(&self) -> f64 {
        self.time_saved_per_invoice_minutes / 60.0
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            automated_cost_per_invoice: Self::DEFAULT_AUTOMATED_COST_PER_INVOICE,
            error_rate_auto: Self::DEFAULT_ERROR_RATE_AUTO,
            time_saved_per_invoice_minutes: Self::DEFAULT_TIME_SAVED_PER_INVOICE_MINUTES,
            min_roi_boost_factor: Self::DEFAULT_MIN_ROI_BOOST_FACTOR,
        }
    }
}
