//! # Scenario Store
//!
//! This crate is the system's persistence adapter: a SQLite-backed key-value store
//! of scenarios keyed by id.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. The rest of the application sees only
//!   `Scenario` and `ScenarioSummary` values from `core-types`.
//! - **Overwrite, not versioning:** Saving an existing id replaces the row and
//!   re-stamps `created_at`.
//! - **Asynchronous & Pooled:** All operations are asynchronous over a `SqlitePool`.
//!
//! ## Public API
//!
//! - `connect` / `connect_in_memory`: Establish the connection pool.
//! - `run_migrations`: Applies the embedded schema migrations.
//! - `DbRepository`: `save_scenario`, `list_scenarios`, `get_scenario`, `delete_scenario`.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_in_memory, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
