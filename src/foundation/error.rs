/// Convenience result type used across kanimate.
pub type KanimateResult<T> = Result<T, KanimateError>;

/// Top-level error taxonomy used by the animation pipeline.
#[derive(thiserror::Error, Debug)]
pub enum KanimateError {
    /// Invalid settings, detected before any diagram is processed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unparsable stroke path data.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Malformed diagram document (bad XML, strokes without ids or path data).
    #[error("document error: {0}")]
    Document(String),

    /// An external rasterizer or encoder could not be spawned or exited non-zero.
    #[error("external process error: {0}")]
    ExternalProcess(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KanimateError {
    /// Build a [`KanimateError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`KanimateError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`KanimateError::Document`] value.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Build a [`KanimateError::ExternalProcess`] value.
    pub fn external_process(msg: impl Into<String>) -> Self {
        Self::ExternalProcess(msg.into())
    }

    /// Whether this error stops the whole batch rather than only the current diagram.
    pub fn aborts_batch(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::ExternalProcess(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
