//! Error types for rendering and copying

use thiserror::Error;

use impress_bibtex::ParseError;

/// Failure to retrieve a bibliography source
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP {status} fetching {location}")]
    Status { location: String, status: u16 },
    #[error("Request failed for {location}: {message}")]
    Request { location: String, message: String },
    #[error("No source registered for {location}")]
    NotFound { location: String },
    #[error("Browser fetch failed for {location}: {message}")]
    Js { location: String, message: String },
}

/// Anything that stops a render call
///
/// All variants end in the same failure notice for the reader; the variant
/// only matters for the log line.
#[derive(Error, Debug)]
pub enum RenderFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Region `{0}` not found on page")]
    MissingRegion(String),
    #[error("Page rejected card: {0}")]
    Host(String),
}

/// Clipboard write failure; logged, never fatal to the page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard unavailable")]
    Unavailable,
    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
}
