//! Animation and slide transition engine for presentation playback.
//!
//! The engine turns declarative descriptors into motion on a render target and guarantees a
//! visually correct end state whatever happens on the way:
//!
//! 1. **Normalize**: descriptor + performance tier → [`AnimationConfig`]
//! 2. **Generate**: effect + direction → [`Keyframes`], or transition → [`TransitionPlan`]
//! 3. **Run**: hand keyframes to an [`Animatable`] target and await completion
//! 4. **Recover**: reduced motion, missing capability, and failures all end in an instant
//!    terminal state; `execute_*` calls never fail
//!
//! One [`Engine`] belongs to one presentation session. It is single-threaded; hosts drive time
//! through their own frame loop (see [`surface::tween`] for a software target).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod effects;
mod foundation;
mod session;
/// Render target contract and software implementation.
pub mod surface;

pub use crate::animation::descriptor::{AnimationDescriptor, AnimationStep, Effect};
pub use crate::animation::ease::Easing;
pub use crate::animation::keyframes::{Keyframe, Keyframes, generate_keyframes, sample};
pub use crate::animation::normalize::{
    AnimationConfig, normalize_easing, scale_duration, smooth_easing,
};
pub use crate::effects::fallback::{apply_element_fallback, apply_transition_fallback};
pub use crate::effects::transitions::{
    PhasePlan, TransitionDescriptor, TransitionPlan, TransitionType, plan_transition,
};
pub use crate::foundation::core::{Direction, ElementId, NavDirection, PerformanceMode};
pub use crate::foundation::error::{MotionError, MotionResult};
pub use crate::foundation::style::{
    ClipInset, Length, Lerp, Position, Style, Transform, Visibility,
};
pub use crate::session::engine::{AnimationController, Engine, EngineOpts, EngineState};
pub use crate::session::environment::{
    Environment, HostCapabilities, HostVisibility, StaticEnvironment, Subscription,
    detect_performance_mode,
};
pub use crate::surface::target::{Animatable, AnimationControls, Completion, Fill, Timing};
