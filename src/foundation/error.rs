pub type AtlasResult<T> = Result<T, AtlasError>;

#[derive(thiserror::Error, Debug)]
pub enum AtlasError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("data load error: {0}")]
    DataLoad(String),

    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AtlasError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn data_load(msg: impl Into<String>) -> Self {
        Self::DataLoad(msg.into())
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }
}
