pub type ScrollytellResult<T> = Result<T, ScrollytellError>;

#[derive(thiserror::Error, Debug)]
pub enum ScrollytellError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("target unavailable: {0}")]
    TargetUnavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollytellError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn target_unavailable(msg: impl Into<String>) -> Self {
        Self::TargetUnavailable(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_target_unavailable(&self) -> bool {
        matches!(self, Self::TargetUnavailable(_))
    }
}
