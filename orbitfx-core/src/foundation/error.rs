/// Convenience result type used across orbitfx.
pub type FxResult<T> = Result<T, FxError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Running effects never return these; they are reported at construction and configuration
/// boundaries only.
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    /// Invalid user-provided parameters (layers, markers, phrases, thresholds).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while allocating or drawing to a render surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when reading or parsing configuration documents.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FxError {
    /// Build a [`FxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FxError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FxError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
