use crate::foundation::core::{Direction, ElementId, duration_ms};
use crate::foundation::error::{MotionError, MotionResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Named element-level motion pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Opacity 0 → 1.
    Fade,
    /// Travel 100px along `direction` while fading in.
    Slide,
    /// Grow from nothing while fading in.
    Zoom,
    /// Rise and overshoot before settling.
    Bounce,
    /// One full turn while growing in.
    Spin,
    /// Clip reveal from the `direction` side.
    Wipe,
}

impl Effect {
    /// Every effect, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Fade,
        Self::Slide,
        Self::Zoom,
        Self::Bounce,
        Self::Spin,
        Self::Wipe,
    ];
}

pub(crate) fn default_easing() -> String {
    "ease".to_owned()
}

/// Authored description of how one element appears.
///
/// Immutable input: the same descriptor may be executed any number of times.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    /// Motion pattern.
    pub effect: Effect,
    /// Authored duration.
    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
    /// Authored start delay.
    #[serde(rename = "delay_ms", with = "duration_ms", default)]
    pub delay: Duration,
    /// Author-facing easing name or canonical curve text.
    #[serde(default = "default_easing")]
    pub easing: String,
    /// Direction for `slide`/`wipe`; defaults to left.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl AnimationDescriptor {
    /// Descriptor with no delay, `ease` timing, and default direction.
    pub fn new(effect: Effect, duration: Duration) -> Self {
        Self {
            effect,
            duration,
            delay: Duration::ZERO,
            easing: default_easing(),
            direction: None,
        }
    }

    /// Set the delay, builder-style.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the easing name, builder-style.
    pub fn with_easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = easing.into();
        self
    }

    /// Set the direction, builder-style.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Parse a descriptor from JSON text.
    pub fn from_json(text: &str) -> MotionResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| MotionError::serde(format!("parse animation descriptor JSON: {e}")))
    }
}

/// One element animation request: which element, and how it should move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    /// Registry key for the running animation.
    pub element_id: ElementId,
    /// What to play.
    pub animation: AnimationDescriptor,
}

impl AnimationStep {
    /// Pair an element id with a descriptor.
    pub fn new(element_id: impl Into<ElementId>, animation: AnimationDescriptor) -> Self {
        Self {
            element_id: element_id.into(),
            animation,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/descriptor.rs"]
mod tests;
