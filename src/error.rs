//! Error type shared by the cache controller and its codecs.

/// Error returned by fallible cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cookie payload is not a JSON object of string, boolean or null values.
    #[error("malformed cache document: {0}")]
    MalformedDocument(#[source] serde_json::Error),
    /// The percent-decoded cookie value is not valid UTF-8.
    #[error("malformed cookie encoding: {0}")]
    MalformedEncoding(#[from] std::str::Utf8Error),
    /// The document could not be serialized.
    #[error("failed to encode cache document: {0}")]
    Encode(#[source] serde_json::Error),
    /// The expiry timestamp is out of range or could not be rendered.
    #[error("invalid cookie expiry: {0}")]
    Expiry(String),
    /// A configuration value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
