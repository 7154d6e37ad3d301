/// Convenience result type used across Loupe.
pub type LoupeResult<T> = Result<T, LoupeError>;

/// Top-level error taxonomy used by the effect APIs.
///
/// Rendering itself never fails for parameter values; errors only describe host contract
/// violations (buffer shapes, unknown parameters) and surrounding I/O.
#[derive(thiserror::Error, Debug)]
pub enum LoupeError {
    /// Invalid host-provided data: dimensions, strides, buffer lengths, parameter kinds.
    #[error("validation error: {0}")]
    Validation(String),

    /// The rasteriser could not accommodate the frame (for example, dimensions beyond its limits).
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing parameter sets.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoupeError {
    /// Build a [`LoupeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LoupeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LoupeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
