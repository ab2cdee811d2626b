use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailerError {
    #[error("Mail API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Mail API returned an error ({status}): {body}")]
    ApiError { status: u16, body: String },
}
