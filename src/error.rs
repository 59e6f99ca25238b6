use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while shaping recipes or talking to Google APIs
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport failure while talking to a remote service
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The token endpoint rejected a refresh grant
    #[error("Failed to refresh credentials: {0}")]
    Refresh(String),

    /// Interactive authorization did not produce credentials
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// A cell was unwrapped from a range that returned no values
    #[error("Range {0} returned no values")]
    EmptyRange(String),

    /// A successful response whose shape does not match the request
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A paginated listing returned a continuation token that does not advance
    #[error("Pagination error: {0}")]
    Pagination(String),

    /// A field named in an exclusion list is not part of the record
    #[error("Field not found in record: {0}")]
    MissingField(String),

    /// A category string outside the known set
    #[error("Unknown recipe categorie: {0}")]
    UnknownCategorie(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
