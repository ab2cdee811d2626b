use core_types::CostModel;
use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every section is optional; a missing `config.toml` yields a runnable default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    /// The assumptions fed to the metrics engine.
    pub cost_model: CostModel,
    pub pdf: PdfSettings,
    pub mail: MailSettings,
    pub logging: LoggingSettings,
}

/// Where the HTTP server listens and what it serves statically.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory of the browser front-end. Skipped when it does not exist.
    pub static_dir: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "public".to_string(),
        }
    }
}

/// The scenario store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// A SQLite connection URL, e.g. `sqlite://data/scenarios.db`.
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://data/scenarios.db".to_string(),
            max_connections: 5,
        }
    }
}

/// The optional HTML-to-PDF converter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    pub enabled: bool,
    /// Program name (looked up on `PATH`) or explicit path.
    pub command: String,
    /// Arguments making the program read HTML on stdin and write PDF to stdout.
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "wkhtmltopdf".to_string(),
            args: vec![
                "--quiet".to_string(),
                "--page-size".to_string(),
                "A4".to_string(),
                "-".to_string(),
                "-".to_string(),
            ],
            timeout_secs: 30,
        }
    }
}

/// The HTTP mail API used to email reports.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
    pub timeout_secs: u64,
}

impl MailSettings {
    /// Delivery is only attempted when both the endpoint and the key are set.
    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.api_key.is_empty()
    }
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            from: "no-reply@example.com".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to daily rolling files in this directory.
    pub directory: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
            directory: None,
        }
    }
}
