#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid access mode: {0} (expected \"r\" or \"rw\")")]
    InvalidAccessMode(String),
    #[error("Invalid byte order: {0} (expected \"big\" or \"little\")")]
    InvalidByteOrder(String),
}
