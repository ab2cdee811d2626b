use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{
    Config, DatabaseSettings, LogFormat, LoggingSettings, MailSettings, PdfSettings,
    ServerSettings,
};

/// Loads the application configuration from `config.toml` and the environment.
///
/// This function is the primary entry point for this crate. It loads `.env`, reads
/// the (optional) configuration file, applies `ROI__SECTION__KEY` environment
/// overrides, and returns the validated, strongly-typed `Config`.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from(Path::new("config.toml"))
}

/// Same as `load_config`, reading the given file instead of `config.toml`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("ROI")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port must be greater than 0".to_string(),
        ));
    }

    let model = &config.cost_model;
    let values = [
        ("automated_cost_per_invoice", model.automated_cost_per_invoice),
        ("error_rate_auto", model.error_rate_auto),
        ("time_saved_per_invoice_minutes", model.time_saved_per_invoice_minutes),
        ("min_roi_boost_factor", model.min_roi_boost_factor),
    ];
    for (name, value) in values {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "cost_model.{name} must be a non-negative number"
            )));
        }
    }
    if model.min_roi_boost_factor == 0.0 {
        return Err(ConfigError::ValidationError(
            "cost_model.min_roi_boost_factor must be greater than 0".to_string(),
        ));
    }

    if config.pdf.timeout_secs == 0 || config.mail.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "pdf.timeout_secs and mail.timeout_secs must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CostModel;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn settings_are_reachable_from_the_crate_root() {
        let config: crate::Config = crate::Config::default();
        let _: &crate::ServerSettings = &config.server;
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cost_model, CostModel::default());
        assert_eq!(config.pdf.command, "wkhtmltopdf");
        assert!(!config.mail.is_configured());
        assert_eq!(config.logging.format, LogFormat::Full);
    }

    #[test]
    fn file_overrides_individual_keys() {
        let file = write_config(
            r#"
            [server]
            port = 8080

            [cost_model]
            automated_cost_per_invoice = 0.35

            [mail]
            api_url = "https://mail.example.com/v3/messages"
            api_key = "key-123"

            [logging]
            format = "compact"
            "#,
        );
        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.cost_model.automated_cost_per_invoice, 0.35);
        assert_eq!(config.cost_model.error_rate_auto, 0.1);
        assert!(config.mail.is_configured());
        assert_eq!(config.mail.from, "no-reply@example.com");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn rejects_negative_cost_model_values() {
        let file = write_config("[cost_model]\nerror_rate_auto = -0.1\n");
        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("error_rate_auto")));
    }

    #[test]
    fn rejects_zero_boost_factor() {
        let file = write_config("[cost_model]\nmin_roi_boost_factor = 0.0\n");
        assert!(matches!(
            load_config_from(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
