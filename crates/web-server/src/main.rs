// This main function is the entry point when running `cargo run -p web-server`.
// It loads the configuration, sets up logging and hands off to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let _log_guard = configuration::init_logging(&config.logging)?;
    web_server::run_server(&config).await
}
