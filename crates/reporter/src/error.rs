use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF rendering is not available")]
    Unavailable,

    #[error("Failed to run the PDF converter: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF converter exited with {status}: {stderr}")]
    ConverterFailed { status: String, stderr: String },

    #[error("PDF converter timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("PDF converter produced no output")]
    EmptyOutput,
}
