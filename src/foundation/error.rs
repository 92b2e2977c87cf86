use crate::foundation::core::ElementId;

/// Convenience result type used across the engine.
pub type MotionResult<T> = Result<T, MotionError>;

/// Error taxonomy for render-target and engine operations.
///
/// The public `execute_*` entry points never return these; they are logged and routed to the
/// fallback handler instead.
#[derive(thiserror::Error, Debug)]
pub enum MotionError {
    /// The render target rejected the keyframes/timing, or cannot animate at all.
    #[error("animation creation error: {0}")]
    AnimationCreation(String),

    /// One or both phases of a slide transition failed to start or complete.
    #[error("transition phase error: {0}")]
    TransitionPhase(String),

    /// A per-animation operation targeted an element with no running animation.
    #[error("no active animation for element '{0}'")]
    Inactive(ElementId),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from a render target implementation.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MotionError {
    /// Build a [`MotionError::AnimationCreation`] value.
    pub fn animation_creation(msg: impl Into<String>) -> Self {
        Self::AnimationCreation(msg.into())
    }

    /// Build a [`MotionError::TransitionPhase`] value.
    pub fn transition_phase(msg: impl Into<String>) -> Self {
        Self::TransitionPhase(msg.into())
    }

    /// Build a [`MotionError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
