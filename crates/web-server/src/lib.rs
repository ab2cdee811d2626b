use analytics::MetricsEngine;
use axum::{
    routing::{get, post},
    Router,
};
use configuration::Config;
use database::DbRepository;
use mailer::{HttpMailer, ReportMailer};
use reporter::{select_converter, DocumentConverter};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
// Note: Tracing is initialized by the binaries, not here.

pub mod delivery;
pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub db_repo: DbRepository,
    pub engine: MetricsEngine,
    /// PDF strategy chosen at startup; `HtmlOnly` when no converter is available.
    pub converter: Arc<dyn DocumentConverter>,
    /// `None` when email delivery is not configured.
    pub mailer: Option<Arc<dyn ReportMailer>>,
}

/// Builds the application router. `static_dir`, when it exists, serves the
/// browser front-end with `index.html` as the catch-all.
pub fn build_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    let mut app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/calc", post(handlers::calculate))
        .route(
            "/api/scenario",
            post(handlers::save_scenario).get(handlers::list_scenarios),
        )
        .route(
            "/api/scenario/:id",
            get(handlers::get_scenario).delete(handlers::delete_scenario),
        )
        .route("/api/report/:id", post(handlers::request_report))
        .route("/report/:id", get(handlers::view_report));

    if let Some(dir) = static_dir.filter(|dir| dir.is_dir()) {
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }

    app.with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let db_pool = database::connect(&config.database).await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    let mailer = HttpMailer::new(&config.mail).map(|m| Arc::new(m) as Arc<dyn ReportMailer>);
    let app_state = Arc::new(AppState {
        db_repo,
        engine: MetricsEngine::new(config.cost_model),
        converter: select_converter(&config.pdf),
        mailer,
    });

    let app = build_router(app_state, Some(Path::new(&config.server.static_dir)));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
