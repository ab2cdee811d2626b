use crate::AppState;
use core_types::Scenario;
use mailer::OutgoingReport;
use reporter::{render_artifact, render_report, RenderedReport};

/// What the report flow produced for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// The mail API accepted the report; the caller only gets an acknowledgment.
    Emailed,
    /// Delivery was not configured or failed: the PDF if rendered, else the HTML.
    Artifact(RenderedReport),
}

/// Recomputes the scenario's metrics, renders the report and tries to email it.
///
/// Neither a failed PDF conversion nor a failed delivery is an error here; both
/// fall back to handing the artifact back to the caller.
pub async fn produce_report(state: &AppState, scenario: &Scenario, email: &str) -> ReportOutcome {
    let metrics = state.engine.compute(&scenario.input);
    let document = render_report(scenario, &metrics);
    let rendered = render_artifact(state.converter.as_ref(), &document).await;

    if let Some(mailer) = &state.mailer {
        let message = OutgoingReport::new(email, scenario, &rendered);
        match mailer.send_report(&message).await {
            Ok(()) => return ReportOutcome::Emailed,
            Err(e) => {
                tracing::error!(error = %e, scenario_id = %scenario.id, "Failed to send report email; returning it directly.");
            }
        }
    }

    ReportOutcome::Artifact(rendered)
}
