//! Capability contract implemented by the rendering layer.
//!
//! A browser-backed host maps these calls onto its compositor animation primitive; a game-style
//! render loop implements the same contract with a per-frame tween updater (see
//! [`crate::surface::tween`]).

use crate::animation::ease::Easing;
use crate::animation::keyframes::Keyframe;
use crate::foundation::core::ElementId;
use crate::foundation::error::MotionResult;
use crate::foundation::style::Style;
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Duration;

/// How keyframe values apply outside the active interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Fill {
    /// Only during the active interval.
    None,
    /// Hold the last keyframe after the end.
    Forwards,
    /// Apply the first keyframe during the delay.
    Backwards,
    /// Both of the above.
    #[default]
    Both,
}

/// Timing handed to [`Animatable::animate`].
#[derive(Clone, Debug, PartialEq)]
pub struct Timing {
    /// Active duration.
    pub duration: Duration,
    /// Delay before the active interval.
    pub delay: Duration,
    /// Curve applied to overall progress.
    pub easing: Easing,
    /// Fill mode.
    pub fill: Fill,
}

impl Timing {
    /// Delay plus duration.
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }
}

/// How a started animation settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Ran to its end.
    Finished,
    /// Cancelled before finishing.
    Cancelled,
}

/// Control surface of one running animation.
pub trait AnimationControls {
    /// Resume or start playback.
    fn play(&self);
    /// Freeze at the current position.
    fn pause(&self);
    /// Abort; the completion future settles with [`Completion::Cancelled`].
    fn cancel(&self);
    /// Flip the playback direction from the current position.
    fn reverse(&self);
    /// Jump to a local time (delay included).
    fn seek(&self, time: Duration);
    /// Current local time (delay included).
    fn current_time(&self) -> Duration;
    /// Delay plus active duration.
    fn total_duration(&self) -> Duration;
    /// Future resolving when the animation finishes, is cancelled, or fails.
    fn finished(&self) -> LocalBoxFuture<'static, MotionResult<Completion>>;
}

/// A render target the engine can animate.
pub trait Animatable {
    /// Stable identifier of the element.
    fn element_id(&self) -> &ElementId;

    /// Whether the host can run keyframe animations on this target at all.
    fn can_animate(&self) -> bool {
        true
    }

    /// Current visual properties.
    fn style_snapshot(&self) -> Style;

    /// Overlay the properties set in `style`.
    fn set_style(&self, style: &Style);

    /// Start a keyframe animation.
    fn animate(
        &self,
        keyframes: &[Keyframe],
        timing: &Timing,
    ) -> MotionResult<Rc<dyn AnimationControls>>;
}
