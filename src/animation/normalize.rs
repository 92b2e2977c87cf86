//! Author-facing timing → engine timing.

use crate::animation::descriptor::AnimationDescriptor;
use crate::animation::ease::Easing;
use crate::effects::transitions::TransitionDescriptor;
use crate::foundation::core::{Direction, PerformanceMode, as_millis_f64, from_millis_f64};
use std::time::Duration;

const LOW_TIER_FACTOR: f64 = 0.5;
const LOW_TIER_FLOOR_MS: f64 = 100.0;
const MEDIUM_TIER_FACTOR: f64 = 0.75;
const MEDIUM_TIER_FLOOR_MS: f64 = 150.0;

/// Engine-internal timing derived from a descriptor for a single invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    /// Tier-scaled duration.
    pub duration: Duration,
    /// Authored delay, unscaled.
    pub delay: Duration,
    /// Canonical easing.
    pub easing: Easing,
    /// Resolved direction.
    pub direction: Direction,
}

impl AnimationConfig {
    /// Normalize an element animation descriptor for the current tier.
    pub fn from_animation(desc: &AnimationDescriptor, mode: PerformanceMode) -> Self {
        Self {
            duration: scale_duration(desc.duration, mode),
            delay: desc.delay,
            easing: normalize_easing(&desc.easing),
            direction: desc.direction.unwrap_or_default(),
        }
    }

    /// Normalize a slide transition descriptor for the current tier.
    pub fn from_transition(desc: &TransitionDescriptor, mode: PerformanceMode) -> Self {
        Self {
            duration: scale_duration(desc.duration, mode),
            delay: Duration::ZERO,
            easing: normalize_easing(&desc.easing),
            direction: desc.direction.unwrap_or_default(),
        }
    }
}

/// Scale an authored duration for a performance tier.
///
/// Degraded tiers shorten motion but never below a per-tier floor.
pub fn scale_duration(duration: Duration, mode: PerformanceMode) -> Duration {
    let ms = as_millis_f64(duration);
    match mode {
        PerformanceMode::High => duration,
        PerformanceMode::Medium => {
            from_millis_f64((ms * MEDIUM_TIER_FACTOR).max(MEDIUM_TIER_FLOOR_MS))
        }
        PerformanceMode::Low => from_millis_f64((ms * LOW_TIER_FACTOR).max(LOW_TIER_FLOOR_MS)),
    }
}

/// Map an author-facing easing name to a canonical curve.
///
/// Aliases resolve to fixed curves, canonical syntax parses, and anything else passes through
/// unchanged as [`Easing::Named`].
pub fn normalize_easing(name: &str) -> Easing {
    match name.trim().to_ascii_lowercase().as_str() {
        "smooth" => smooth_easing(),
        "fast" => Easing::CubicBezier(0.4, 0.0, 1.0, 1.0),
        "slow" => Easing::CubicBezier(0.0, 0.0, 0.2, 1.0),
        "bouncy" => Easing::CubicBezier(0.68, -0.55, 0.265, 1.55),
        _ => Easing::parse_canonical(name).unwrap_or_else(|| Easing::Named(name.to_owned())),
    }
}

/// The curve behind the `smooth` alias.
pub fn smooth_easing() -> Easing {
    Easing::CubicBezier(0.4, 0.0, 0.2, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/normalize.rs"]
mod tests;
