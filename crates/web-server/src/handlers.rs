use crate::delivery::{produce_report, ReportOutcome};
use crate::{error::AppError, AppState};
use analytics::{validate, DerivedMetrics, RawScenarioInput};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use core_types::{Scenario, ScenarioInput, ScenarioSummary};
use reporter::{render_report, RenderedReport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct CalcResponse {
    pub ok: bool,
    pub input: ScenarioInput,
    pub metrics: DerivedMetrics,
}

#[derive(Debug, Serialize)]
pub struct ScenarioResponse {
    pub ok: bool,
    pub scenario: Scenario,
}

#[derive(Debug, Serialize)]
pub struct ScenarioListResponse {
    pub ok: bool,
    pub list: Vec<ScenarioSummary>,
}

#[derive(Debug, Serialize)]
pub struct EmailedResponse {
    pub ok: bool,
    pub emailed: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// # POST /api/calc
/// Validates the inputs and returns the derived metrics without saving anything.
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(raw), _): WithRejection<Json<RawScenarioInput>, AppError>,
) -> Result<Json<CalcResponse>, AppError> {
    let input = validate(&raw)?;
    let metrics = state.engine.compute(&input);
    Ok(Json(CalcResponse {
        ok: true,
        input,
        metrics,
    }))
}

/// # POST /api/scenario
/// Creates a scenario, or overwrites the one with the submitted `id`.
pub async fn save_scenario(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(raw), _): WithRejection<Json<RawScenarioInput>, AppError>,
) -> Result<Json<ScenarioResponse>, AppError> {
    let input = validate(&raw)?;
    let scenario = Scenario::new(raw.id(), input);
    let scenario = state.db_repo.save_scenario(&scenario).await?;
    tracing::info!(scenario_id = %scenario.id, "Scenario saved.");
    Ok(Json(ScenarioResponse { ok: true, scenario }))
}

/// # GET /api/scenario
pub async fn list_scenarios(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScenarioListResponse>, AppError> {
    let list = state.db_repo.list_scenarios().await?;
    Ok(Json(ScenarioListResponse { ok: true, list }))
}

/// # GET /api/scenario/:id
pub async fn get_scenario(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScenarioResponse>, AppError> {
    let scenario = state
        .db_repo
        .get_scenario(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("not found".to_string()))?;
    Ok(Json(ScenarioResponse { ok: true, scenario }))
}

/// # DELETE /api/scenario/:id
/// Succeeds whether or not the scenario existed.
pub async fn delete_scenario(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Ack>, AppError> {
    state.db_repo.delete_scenario(&id).await?;
    Ok(Json(Ack { ok: true }))
}

/// # GET /report/:id
/// The printable HTML report, for opening directly in a browser.
pub async fn view_report(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.db_repo.get_scenario(&id).await {
        Ok(Some(scenario)) => {
            let metrics = state.engine.compute(&scenario.input);
            Html(render_report(&scenario, &metrics).to_html()).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, Html("<h1>Scenario not found</h1>")).into_response(),
        Err(e) => {
            tracing::error!(error = ?e, scenario_id = %id, "Failed to load scenario for report.");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Error generating report</h1>"),
            )
                .into_response()
        }
    }
}

/// # POST /api/report/:id
/// Emails the report when a mailer is configured; otherwise (or if delivery fails)
/// returns the PDF when one could be rendered, else the HTML.
pub async fn request_report(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<ReportRequest>, AppError>,
) -> Result<Response, AppError> {
    let email = request
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("email required".to_string()))?;

    let scenario = state
        .db_repo
        .get_scenario(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("scenario not found".to_string()))?;

    let response = match produce_report(&state, &scenario, &email).await {
        ReportOutcome::Emailed => Json(EmailedResponse {
            ok: true,
            emailed: true,
        })
        .into_response(),
        ReportOutcome::Artifact(RenderedReport::Pdf { pdf, .. }) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"report-{}.pdf\"", scenario.id),
                ),
            ],
            pdf,
        )
            .into_response(),
        ReportOutcome::Artifact(RenderedReport::Html(html)) => Html(html).into_response(),
    };
    Ok(response)
}
