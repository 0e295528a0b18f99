use thiserror::Error;

/// Errors reported by the analysis core.
///
/// Empty upstream data is not an error: it is carried on the record as
/// [`crate::RecordStatus::NoData`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("malformed record at index {index}: {reason}")]
    MalformedInput { index: usize, reason: String },
}

impl AnalysisError {
    pub fn missing_field(index: usize, field: &str) -> Self {
        AnalysisError::MalformedInput {
            index,
            reason: format!("missing required field `{}`", field),
        }
    }

    pub fn invalid(index: usize, reason: impl Into<String>) -> Self {
        AnalysisError::MalformedInput {
            index,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the content source. The caller decides whether to fall back.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {url}: status {status}")]
    Status { url: String, status: u16 },
    #[error("timed out fetching {0}")]
    Timeout(String),
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },
    #[error("failed to build http client: {0}")]
    Client(String),
}
