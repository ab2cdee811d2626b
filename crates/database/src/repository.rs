use crate::DbError;
use chrono::{DateTime, SubsecRound, Utc};
use core_types::{Scenario, ScenarioInput, ScenarioSummary};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the scenario database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
}

/// A row fetched from the `scenarios` table.
#[derive(Debug, Clone, FromRow)]
struct DbScenario {
    id: String,
    scenario_name: String,
    monthly_invoice_volume: f64,
    num_ap_staff: f64,
    avg_hours_per_invoice: f64,
    hourly_wage: f64,
    error_rate_manual: f64,
    error_cost: f64,
    time_horizon_months: f64,
    one_time_implementation_cost: f64,
    created_at: DateTime<Utc>,
}

impl From<DbScenario> for Scenario {
    fn from(row: DbScenario) -> Self {
        Scenario {
            id: row.id,
            input: ScenarioInput {
                scenario_name: row.scenario_name,
                monthly_invoice_volume: row.monthly_invoice_volume,
                num_ap_staff: row.num_ap_staff,
                avg_hours_per_invoice: row.avg_hours_per_invoice,
                hourly_wage: row.hourly_wage,
                error_rate_manual: row.error_rate_manual,
                error_cost: row.error_cost,
                time_horizon_months: row.time_horizon_months,
                one_time_implementation_cost: row.one_time_implementation_cost,
            },
            created_at: Some(row.created_at),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbScenarioSummary {
    id: String,
    scenario_name: String,
    created_at: DateTime<Utc>,
}

impl From<DbScenarioSummary> for ScenarioSummary {
    fn from(row: DbScenarioSummary) -> Self {
        ScenarioSummary {
            id: row.id,
            scenario_name: row.scenario_name,
            created_at: row.created_at,
        }
    }
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts or overwrites a scenario, stamping a fresh `created_at`.
    ///
    /// Any `created_at` carried by the argument is ignored. Returns the record as
    /// stored.
    pub async fn save_scenario(&self, scenario: &Scenario) -> Result<Scenario, DbError> {
        // Millisecond precision survives the TEXT round-trip unchanged.
        let created_at = Utc::now().trunc_subsecs(3);
        let input = &scenario.input;

        sqlx::query(
            r#"
            INSERT INTO scenarios (
                id, scenario_name, monthly_invoice_volume, num_ap_staff, avg_hours_per_invoice,
                hourly_wage, error_rate_manual, error_cost, time_horizon_months,
                one_time_implementation_cost, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                scenario_name = excluded.scenario_name,
                monthly_invoice_volume = excluded.monthly_invoice_volume,
                num_ap_staff = excluded.num_ap_staff,
                avg_hours_per_invoice = excluded.avg_hours_per_invoice,
                hourly_wage = excluded.hourly_wage,
                error_rate_manual = excluded.error_rate_manual,
                error_cost = excluded.error_cost,
                time_horizon_months = excluded.time_horizon_months,
                one_time_implementation_cost = excluded.one_time_implementation_cost,
                created_at = excluded.created_at
            "#,
        )
        .bind(&scenario.id)
        .bind(&input.scenario_name)
        .bind(input.monthly_invoice_volume)
        .bind(input.num_ap_staff)
        .bind(input.avg_hours_per_invoice)
        .bind(input.hourly_wage)
        .bind(input.error_rate_manual)
        .bind(input.error_cost)
        .bind(input.time_horizon_months)
        .bind(input.one_time_implementation_cost)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(scenario_id = %scenario.id, "Scenario saved.");
        Ok(Scenario {
            created_at: Some(created_at),
            ..scenario.clone()
        })
    }

    /// Fetches the id, name and save time of every scenario, newest first.
    pub async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>, DbError> {
        let rows = sqlx::query_as::<_, DbScenarioSummary>(
            "SELECT id, scenario_name, created_at FROM scenarios ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ScenarioSummary::from).collect())
    }

    /// Fetches a single scenario, or `None` if the id is unknown.
    pub async fn get_scenario(&self, id: &str) -> Result<Option<Scenario>, DbError> {
        let row = sqlx::query_as::<_, DbScenario>(
            r#"
            SELECT id, scenario_name, monthly_invoice_volume, num_ap_staff, avg_hours_per_invoice,
                   hourly_wage, error_rate_manual, error_cost, time_horizon_months,
                   one_time_implementation_cost, created_at
            FROM scenarios
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Scenario::from))
    }

    /// Deletes a scenario. Deleting an unknown id is a no-op.
    pub async fn delete_scenario(&self, id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM scenarios WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(scenario_id = %id, deleted = result.rows_affected(), "Scenario delete processed.");
        Ok(())
    }
}
