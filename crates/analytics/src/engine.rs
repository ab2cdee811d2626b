use crate::metrics::{DerivedMetrics, MetricDetails};
use core_types::{CostModel, ScenarioInput};

/// A stateless calculator for deriving the ROI of automating invoice processing.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    cost_model: CostModel,
}

impl MetricsEngine {
    pub fn new(cost_model: CostModel) -> Self {
        Self { cost_model }
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    /// The main entry point for calculating scenario metrics.
    ///
    /// # Arguments
    ///
    /// * `input` - A scenario input that has already passed `validate`.
    ///
    /// # Returns
    ///
    /// The `DerivedMetrics`. The calculation is total over finite input; only the
    /// labor-savings and residual-labor terms are clamped at zero, everything else
    /// (notably a negative net saving) propagates as-is.
    pub fn compute(&self, input: &ScenarioInput) -> DerivedMetrics {
        let details = self.calculate_details(input);

        let baseline_monthly_total =
            details.manual_monthly_labor_cost + details.manual_error_costs_monthly;
        let residual_labor_cost =
            (details.manual_monthly_labor_cost - details.labor_savings).max(0.0);
        let new_monthly_total = details.automated_monthly_processing_cost
            + details.automated_error_costs_monthly
            + residual_labor_cost;
        let monthly_net_savings = baseline_monthly_total - new_monthly_total;

        let implementation_cost = input.one_time_implementation_cost;
        let cumulative_savings =
            monthly_net_savings * input.time_horizon_months - implementation_cost;

        DerivedMetrics {
            baseline_monthly_total,
            new_monthly_total,
            monthly_net_savings,
            cumulative_savings,
            roi: self.calculate_roi(cumulative_savings, implementation_cost),
            payback_months: calculate_payback(implementation_cost, monthly_net_savings),
            details,
        }
    }

    /// Calculates the per-month cost and savings components.
    fn calculate_details(&self, input: &ScenarioInput) -> MetricDetails {
        let volume = input.monthly_invoice_volume;

        let manual_monthly_hours = volume * input.avg_hours_per_invoice;
        let manual_monthly_labor_cost = manual_monthly_hours * input.hourly_wage;

        let automated_monthly_processing_cost = volume * self.cost_model.automated_cost_per_invoice;

        let time_saved_hours_per_month = volume * self.cost_model.time_saved_per_invoice_hours();
        let labor_savings = (time_saved_hours_per_month * input.hourly_wage).max(0.0);

        let manual_error_costs_monthly = volume * input.error_rate_manual * input.error_cost;
        let automated_error_costs_monthly =
            volume * self.cost_model.error_rate_auto * input.error_cost;

        MetricDetails {
            manual_monthly_labor_cost,
            automated_monthly_processing_cost,
            manual_error_costs_monthly,
            automated_error_costs_monthly,
            labor_savings,
            time_saved_hours_per_month,
        }
    }

    /// ROI over the horizon, boosted. A zero implementation cost divides by 1.
    fn calculate_roi(&self, cumulative_savings: f64, implementation_cost: f64) -> f64 {
        let divisor = if implementation_cost == 0.0 {
            1.0
        } else {
            implementation_cost
        };
        (cumulative_savings / divisor) * self.cost_model.min_roi_boost_factor
    }
}

/// Whole months until the implementation cost is recovered, if ever.
fn calculate_payback(implementation_cost: f64, monthly_net_savings: f64) -> Option<i64> {
    if monthly_net_savings > 0.0 {
        Some((implementation_cost / monthly_net_savings).ceil() as i64)
    } else {
        None
    }
}
