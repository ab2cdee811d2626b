use analytics::{validate, DerivedMetrics, MetricsEngine, RawScenarioInput, ValidationError};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{init_logging, load_config, Config, LogFormat};
use database::{connect, run_migrations, DbRepository};
use core_types::ScenarioInput;
use reporter::document::NOT_RECOVERABLE;
use reporter::format::{format_currency, format_fixed2};
use reporter::{render_artifact, render_report, select_converter, ReportDocument};
use serde_json::json;
use std::path::PathBuf;

/// The main entry point for the ROI estimator.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config().context("Failed to load configuration")?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    // Keep the guard alive so the file writer flushes on exit.
    let _log_guard = init_logging(&config.logging)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, config).await,
        Commands::Calc(args) => handle_calc(args, &config),
        Commands::Scenarios => handle_scenarios(&config).await,
        Commands::Report(args) => handle_report(args, &config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Estimates the return on investment of automating invoice processing.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Override the configured console log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API and serve the front-end.
    Serve(ServeArgs),
    /// Compute the metrics for a scenario without saving it.
    Calc(CalcArgs),
    /// List the stored scenarios.
    Scenarios,
    /// Render the report of a stored scenario to a file.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Interface to bind, overriding `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct CalcArgs {
    /// Invoices processed per month.
    #[arg(long)]
    volume: f64,

    /// Manual handling time per invoice, in hours.
    #[arg(long)]
    hours_per_invoice: f64,

    /// Fully loaded hourly wage of AP staff.
    #[arg(long)]
    wage: f64,

    /// Number of AP staff (informational).
    #[arg(long, default_value_t = 0.0)]
    staff: f64,

    /// Manual error rate as a fraction of invoices (0.05 = 5%).
    #[arg(long, default_value_t = 0.0)]
    error_rate: f64,

    /// Cost of fixing one erroneous invoice.
    #[arg(long, default_value_t = 0.0)]
    error_cost: f64,

    /// Evaluation horizon, in months.
    #[arg(long, default_value_t = 12.0)]
    horizon: f64,

    /// One-time implementation cost.
    #[arg(long, default_value_t = 0.0)]
    implementation_cost: f64,

    /// Name shown in the output.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Parser)]
struct ReportArgs {
    /// Id of the stored scenario.
    id: String,

    /// Output file. Defaults to `report-<id>.pdf` or `report-<id>.html`.
    #[arg(long)]
    out: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    web_server::run_server(&config).await
}

fn handle_calc(args: CalcArgs, config: &Config) -> anyhow::Result<()> {
    let input = calc_input(args)?;
    let metrics = MetricsEngine::new(config.cost_model).compute(&input);

    println!("{}", input.scenario_name);
    println!("{}", metrics_table(&metrics));
    Ok(())
}

/// Runs the command-line values through the same validation as the HTTP API.
fn calc_input(args: CalcArgs) -> Result<ScenarioInput, ValidationError> {
    let raw = RawScenarioInput {
        id: None,
        scenario_name: args.name.map(|name| json!(name)),
        monthly_invoice_volume: Some(json!(args.volume)),
        num_ap_staff: Some(json!(args.staff)),
        avg_hours_per_invoice: Some(json!(args.hours_per_invoice)),
        hourly_wage: Some(json!(args.wage)),
        error_rate_manual: Some(json!(args.error_rate)),
        error_cost: Some(json!(args.error_cost)),
        time_horizon_months: Some(json!(args.horizon)),
        one_time_implementation_cost: Some(json!(args.implementation_cost)),
    };
    validate(&raw)
}

async fn handle_scenarios(config: &Config) -> anyhow::Result<()> {
    let repo = open_repository(config).await?;
    let scenarios = repo.list_scenarios().await?;

    if scenarios.is_empty() {
        println!("No scenarios saved yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Id", "Name", "Saved at"]);
    for scenario in scenarios {
        table.add_row(vec![
            scenario.id,
            scenario.scenario_name,
            scenario.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_report(args: ReportArgs, config: &Config) -> anyhow::Result<()> {
    let repo = open_repository(config).await?;
    let scenario = repo
        .get_scenario(&args.id)
        .await?
        .with_context(|| format!("Scenario '{}' not found", args.id))?;

    let metrics = MetricsEngine::new(config.cost_model).compute(&scenario.input);
    let document = render_report(&scenario, &metrics);
    let converter = select_converter(&config.pdf);
    let rendered = render_artifact(converter.as_ref(), &document).await;

    let (default_name, bytes) = match rendered.pdf() {
        Some(pdf) => (format!("report-{}.pdf", scenario.id), pdf.to_vec()),
        None => (
            format!("report-{}.html", scenario.id),
            rendered.html().as_bytes().to_vec(),
        ),
    };
    let out = args.out.unwrap_or_else(|| PathBuf::from(default_name));
    tokio::fs::write(&out, bytes)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    print_key_results(&document);
    tracing::info!(path = %out.display(), content_type = rendered.content_type(), "Report written.");
    Ok(())
}

async fn open_repository(config: &Config) -> anyhow::Result<DbRepository> {
    let pool = connect(&config.database).await?;
    run_migrations(&pool).await?;
    Ok(DbRepository::new(pool))
}

fn metrics_table(metrics: &DerivedMetrics) -> Table {
    let payback = metrics
        .payback_months
        .map(|months| format!("{months} months"))
        .unwrap_or_else(|| NOT_RECOVERABLE.to_string());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Metric", "Value"])
        .add_row(vec!["Baseline monthly cost".to_string(), format_currency(metrics.baseline_monthly_total)])
        .add_row(vec!["Monthly cost after automation".to_string(), format_currency(metrics.new_monthly_total)])
        .add_row(vec!["Monthly net savings".to_string(), format_currency(metrics.monthly_net_savings)])
        .add_row(vec!["Cumulative savings".to_string(), format_currency(metrics.cumulative_savings)])
        .add_row(vec!["ROI (adjusted)".to_string(), format_fixed2(metrics.roi)])
        .add_row(vec!["Payback period".to_string(), payback]);
    table
}

fn print_key_results(document: &ReportDocument) {
    let Some(section) = document.section("Key results") else {
        return;
    };
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Key result", "Value"]);
    for row in &section.rows {
        table.add_row(vec![row.label.as_str(), row.value.as_str()]);
    }
    println!("{}\n{table}", document.title);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc_args(extra: &[&str]) -> CalcArgs {
        let mut argv = vec![
            "roi-estimator", "calc", "--volume", "1000", "--hours-per-invoice", "0.1", "--wage", "20",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Calc(args) => args,
            _ => panic!("expected the calc subcommand"),
        }
    }

    #[test]
    fn error_rate_is_taken_as_a_fraction() {
        let input = calc_input(calc_args(&["--error-rate", "0.05", "--error-cost", "50"])).unwrap();
        assert_eq!(input.error_rate_manual, 0.05);

        let metrics = MetricsEngine::default().compute(&input);
        assert_eq!(metrics.details.manual_error_costs_monthly, 2500.0);
    }

    #[test]
    fn calc_defaults_optional_flags() {
        let input = calc_input(calc_args(&[])).unwrap();
        assert_eq!(input.time_horizon_months, 12.0);
        assert_eq!(input.error_rate_manual, 0.0);
        assert_eq!(input.one_time_implementation_cost, 0.0);
        assert_eq!(input.scenario_name, core_types::DEFAULT_SCENARIO_NAME);
    }

    #[test]
    fn calc_rejects_invalid_values() {
        assert_eq!(
            calc_input(calc_args(&["--horizon", "0"])),
            Err(ValidationError::InvalidTimeHorizon)
        );
        assert_eq!(
            calc_input(calc_args(&["--error-rate=-1"])),
            Err(ValidationError::InvalidManualErrorRate)
        );
    }

    #[test]
    fn metrics_table_uses_report_formatting() {
        let input = calc_input(calc_args(&[
            "--error-rate", "0.05", "--error-cost", "50", "--implementation-cost", "5000",
        ]))
        .unwrap();
        let table = metrics_table(&MetricsEngine::default().compute(&input)).to_string();

        assert!(table.contains("-$700.00"));
        assert!(table.contains("-$13,400.00"));
        assert!(table.contains(NOT_RECOVERABLE));
    }
}
