//! # Report Renderer
//!
//! Turns a scenario and its derived metrics into a human-readable report.
//!
//! - `render_report` builds a structured `ReportDocument` (title, inputs, key
//!   results, details). Currency and number formatting happen here and only here.
//! - `ReportDocument::to_html` is the textual projection.
//! - A `DocumentConverter` optionally projects the HTML to PDF. The HTML-only
//!   converter is always available; the external PDF converter is chosen at startup
//!   when its command exists. `render_artifact` falls back to the HTML whenever the
//!   conversion is unavailable, so the content never depends on the path taken.

pub mod converter;
pub mod document;
pub mod error;
pub mod format;
mod html;

pub use converter::{
    render_artifact, select_converter, DocumentConverter, ExternalPdfConverter, HtmlOnly,
    RenderedReport,
};
pub use document::{render_report, ReportDocument, ReportRow, ReportSection};
pub use error::RenderError;
