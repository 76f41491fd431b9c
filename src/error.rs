/// Why a run stopped
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The PNG encoder was not compiled into this build
    #[error("the PNG encoder is not available")]
    MissingCapability,

    #[error(transparent)]
    Generation(#[from] anyhow::Error),
}
