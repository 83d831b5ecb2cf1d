use crate::sink::SinkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnimateError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("failed to write '{value}' to {element}.{property}")]
    SinkWrite {
        element: String,
        property: String,
        value: String,
        #[source]
        source: SinkError,
    },

    #[error("animation task ended without reporting an outcome")]
    Abandoned,
}

impl AnimateError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnimateError>;

/// Rejects NaN and infinities for a named numeric parameter.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AnimateError::invalid(name, format!("{value} is not finite")))
    }
}
