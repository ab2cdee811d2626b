use thiserror::Error;

/// Reasons a raw scenario payload is rejected before it reaches the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("monthly_invoice_volume must be a non-negative number")]
    InvalidInvoiceVolume,

    #[error("time_horizon_months must be a positive number")]
    InvalidTimeHorizon,

    #[error("hourly_wage must be a non-negative number")]
    InvalidHourlyWage,

    #[error("error_rate_manual must be a non-negative number")]
    InvalidManualErrorRate,
}
