/// Convenience result type used across meshmorph.
pub type MorphResult<T> = Result<T, MorphError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    /// Invalid user-provided configuration or image data.
    #[error("validation error: {0}")]
    Validation(String),

    /// No usable boundary could be extracted from an image.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Illegal request for the current transition state.
    #[error("transition error: {0}")]
    Transition(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MorphError {
    /// Build a [`MorphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MorphError::Extraction`] value.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Build a [`MorphError::Transition`] value.
    pub fn transition(msg: impl Into<String>) -> Self {
        Self::Transition(msg.into())
    }

    /// Build a [`MorphError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
