#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Check(#[from] pwned_check::Error),

    #[error("failed to read password: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode result: {0}")]
    Json(#[from] serde_json::Error),
}
