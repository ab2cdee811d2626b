use crate::error::MailerError;
use async_trait::async_trait;
use configuration::MailSettings;
use core_types::Scenario;
use reporter::RenderedReport;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
pub mod error;

/// A file attached to an outgoing report email.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A report email ready to hand to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingReport {
    pub to: String,
    pub subject: String,
    /// The HTML report is always the message body.
    pub html: String,
    /// The PDF, when one was rendered.
    pub attachment: Option<Attachment>,
}

impl OutgoingReport {
    pub fn new(to: &str, scenario: &Scenario, rendered: &RenderedReport) -> Self {
        let attachment = rendered.pdf().map(|pdf| Attachment {
            filename: format!("report-{}.pdf", scenario.id),
            content_type: "application/pdf".to_string(),
            bytes: pdf.to_vec(),
        });
        Self {
            to: to.to_string(),
            subject: format!("ROI Report - {}", scenario.display_name()),
            html: rendered.html().to_string(),
            attachment,
        }
    }
}

/// A transport that can deliver a report email.
///
/// Delivery is best-effort: callers branch on the `Result` and fall back to
/// returning the artifact directly.
#[async_trait]
pub trait ReportMailer: Send + Sync {
    async fn send_report(&self, report: &OutgoingReport) -> Result<(), MailerError>;
}

/// A client for sending messages through an HTTP mail API (multipart form with
/// `from`, `to`, `subject`, `html` and an optional `attachment`).
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    /// Creates a new `HttpMailer`.
    ///
    /// Returns `None` if the API URL or key is missing from the configuration,
    /// allowing the system to gracefully disable email delivery.
    pub fn new(config: &MailSettings) -> Option<Self> {
        if !config.is_configured() {
            tracing::warn!("Mailer is not configured (missing api_url or api_key); reports will be returned directly.");
            return None;
        }
        let client = match Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = ?e, "Failed to build the mail HTTP client; email delivery disabled.");
                return None;
            }
        };
        Some(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        })
    }

    fn form(&self, report: &OutgoingReport) -> Result<Form, MailerError> {
        let mut form = Form::new()
            .text("from", self.from.clone())
            .text("to", report.to.clone())
            .text("subject", report.subject.clone())
            .text("html", report.html.clone());

        if let Some(attachment) = &report.attachment {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.filename.clone())
                .mime_str(&attachment.content_type)?;
            form = form.part("attachment", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl ReportMailer for HttpMailer {
    /// Posts the report to the mail API.
    async fn send_report(&self, report: &OutgoingReport) -> Result<(), MailerError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .multipart(self.form(report)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to decode error response".to_string());
            return Err(MailerError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %report.to, subject = %report.subject, "Report emailed.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ScenarioInput;

    fn scenario(name: &str) -> Scenario {
        Scenario::new(
            Some("scn-9".to_string()),
            ScenarioInput {
                scenario_name: name.to_string(),
                monthly_invoice_volume: 100.0,
                num_ap_staff: 1.0,
                avg_hours_per_invoice: 0.2,
                hourly_wage: 25.0,
                error_rate_manual: 0.1,
                error_cost: 15.0,
                time_horizon_months: 12.0,
                one_time_implementation_cost: 1000.0,
            },
        )
    }

    fn settings(api_url: &str, api_key: &str) -> MailSettings {
        MailSettings {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            ..MailSettings::default()
        }
    }

    #[test]
    fn unconfigured_mailer_is_disabled() {
        assert!(HttpMailer::new(&settings("", "key")).is_none());
        assert!(HttpMailer::new(&settings("http://localhost/mail", "")).is_none());
        assert!(HttpMailer::new(&settings("http://localhost/mail", "key")).is_some());
    }

    #[test]
    fn html_report_has_no_attachment() {
        let rendered = RenderedReport::Html("<p>report</p>".to_string());
        let email = OutgoingReport::new("cfo@example.com", &scenario("Q3 pilot"), &rendered);

        assert_eq!(email.subject, "ROI Report - Q3 pilot");
        assert_eq!(email.html, "<p>report</p>");
        assert!(email.attachment.is_none());
    }

    #[test]
    fn pdf_report_is_attached_by_scenario_id() {
        let rendered = RenderedReport::Pdf {
            html: "<p>report</p>".to_string(),
            pdf: b"%PDF-1.4".to_vec(),
        };
        let email = OutgoingReport::new("cfo@example.com", &scenario(""), &rendered);

        assert_eq!(email.subject, "ROI Report - scn-9");
        let attachment = email.attachment.unwrap();
        assert_eq!(attachment.filename, "report-scn-9.pdf");
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn unreachable_api_is_a_request_error() {
        // Port 9 (discard) on loopback is closed on any sane test host.
        let mailer = HttpMailer::new(&settings("http://127.0.0.1:9/messages", "key")).unwrap();
        let rendered = RenderedReport::Html("<p>report</p>".to_string());
        let email = OutgoingReport::new("cfo@example.com", &scenario("Q3"), &rendered);

        let err = mailer.send_report(&email).await.unwrap_err();
        assert!(matches!(err, MailerError::Request(_)));
    }
}
