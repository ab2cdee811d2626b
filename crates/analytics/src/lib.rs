//! # ROI Analytics Engine
//!
//! This crate turns the operational inputs of an invoice-processing scenario into
//! the financial comparison between the manual and the automated workflow.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O and no knowledge of storage, HTTP or rendering. It
//!   depends only on `core-types`.
//! - **Stateless Calculation:** The `MetricsEngine` holds nothing but an immutable
//!   `CostModel`. It takes a validated `ScenarioInput` and produces `DerivedMetrics`.
//!   The calculation is total; it never returns an error.
//! - **Validation at the Boundary:** Raw, loosely typed payloads go through
//!   `validate` first. Only its output may reach the engine.
//!
//! ## Public API
//!
//! - `MetricsEngine`: The calculator.
//! - `DerivedMetrics` / `MetricDetails`: The calculation result.
//! - `RawScenarioInput` / `validate`: The validation boundary.
//! - `ValidationError`: Why a raw payload was rejected.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod metrics;
pub mod validation;

// Re-export the key components to create a clean, public-facing API.
pub use engine::MetricsEngine;
pub use error::ValidationError;
pub use metrics::{DerivedMetrics, MetricDetails};
pub use validation::{validate, RawScenarioInput};
