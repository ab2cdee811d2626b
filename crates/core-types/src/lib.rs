pub mod cost_model;
pub mod scenario;

// Re-export the core types to provide a clean public API.
pub use cost_model::CostModel;
pub use scenario::{Scenario, ScenarioInput, ScenarioSummary, DEFAULT_SCENARIO_NAME};
