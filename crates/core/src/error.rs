use locus_plugin::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocusError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Provider '{provider}' failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: ProviderError,
    },
}

impl LocusError {
    pub(crate) fn provider(provider: &str, source: ProviderError) -> Self {
        LocusError::Provider {
            provider: provider.to_string(),
            source,
        }
    }

    /// Whether this error is an I/O failure of the given kind.
    pub fn is_io_kind(&self, kind: std::io::ErrorKind) -> bool {
        matches!(self, LocusError::Io(err) if err.kind() == kind)
    }
}

pub type Result<T> = std::result::Result<T, LocusError>;
