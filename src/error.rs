use thiserror::Error;

/// Failures that abort a listing fetch (and therefore a whole scan cycle).
///
/// Per-row and per-symbol problems never show up here: rows are dropped,
/// float lookups become [`crate::float::FloatLookup`] values and reasons
/// carry an `Error: ...` category instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed: {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Could not find the premarket table. Website structure may have changed.")]
    TableNotFound,

    #[error("Header parsing failed: '{0}' is not in list")]
    HeaderParsing(String),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
