use crate::animation::descriptor::default_easing;
use crate::animation::ease::Easing;
use crate::animation::keyframes::{Keyframe, Keyframes};
use crate::animation::normalize::{AnimationConfig, smooth_easing};
use crate::foundation::core::{
    Direction, NavDirection, PerformanceMode, duration_ms, saturating_millis,
};
use crate::foundation::error::{MotionError, MotionResult};
use crate::foundation::style::{Length, Position, Style, Transform, Visibility};
use crate::surface::target::{Animatable, AnimationControls, Completion, Fill, Timing};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;
use std::rc::Rc;
use std::time::Duration;

const FLIP_PERSPECTIVE_PX: f64 = 1000.0;

/// Named slide-to-slide handoff pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    /// Cross-fade in two halves.
    Fade,
    /// Both slides travel together by one slide width.
    Push,
    /// Shrink out, settle in.
    Zoom,
    /// Like `Push` with a fixed smooth curve.
    Slide,
    /// Rotate edge-on around the vertical axis.
    Flip,
    /// Played as `Fade`.
    Morph,
}

impl TransitionType {
    /// Every transition type, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Fade,
        Self::Push,
        Self::Zoom,
        Self::Slide,
        Self::Flip,
        Self::Morph,
    ];
}

/// Authored description of a slide-pair transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionDescriptor {
    /// Transition pattern.
    #[serde(rename = "type")]
    pub kind: TransitionType,
    /// Authored total duration.
    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
    /// Author-facing easing name or canonical curve text.
    #[serde(default = "default_easing")]
    pub easing: String,
    /// Optional authored direction; navigation direction decides the sign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl TransitionDescriptor {
    /// Descriptor with `ease` timing.
    pub fn new(kind: TransitionType, duration: Duration) -> Self {
        Self {
            kind,
            duration,
            easing: default_easing(),
            direction: None,
        }
    }

    /// Set the easing name, builder-style.
    pub fn with_easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = easing.into();
        self
    }

    /// Parse a descriptor from JSON text.
    pub fn from_json(text: &str) -> MotionResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| MotionError::serde(format!("parse transition descriptor JSON: {e}")))
    }
}

/// Keyframes and timing for one side of a transition.
#[derive(Clone, Debug, PartialEq)]
pub struct PhasePlan {
    /// Motion of this slide.
    pub keyframes: Keyframes,
    /// When it runs.
    pub timing: Timing,
}

/// Fully resolved two-phase transition.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionPlan {
    /// Pattern actually played (`Morph` resolves to `Fade`).
    pub kind: TransitionType,
    /// Phase for the slide leaving.
    pub outgoing: PhasePlan,
    /// Phase for the slide arriving.
    pub incoming: PhasePlan,
    /// Style applied to the incoming slide before either phase starts.
    pub preposition: Option<Style>,
}

/// Resolve a transition into its two phases.
pub fn plan_transition(
    desc: &TransitionDescriptor,
    nav: NavDirection,
    mode: PerformanceMode,
) -> TransitionPlan {
    let cfg = AnimationConfig::from_transition(desc, mode);
    let sign = nav.outgoing_sign();
    match desc.kind {
        TransitionType::Fade | TransitionType::Morph => sequential(
            TransitionType::Fade,
            &cfg,
            (Style::opacity(1.0), Style::opacity(0.0)),
            (Style::opacity(0.0), Style::opacity(1.0)),
        ),
        TransitionType::Zoom => sequential(
            TransitionType::Zoom,
            &cfg,
            (
                Style::opacity(1.0).with_transform(Transform::IDENTITY),
                Style::opacity(0.0).with_transform(Transform::scale(0.8)),
            ),
            (
                Style::opacity(0.0).with_transform(Transform::scale(1.2)),
                Style::opacity(1.0).with_transform(Transform::IDENTITY),
            ),
        ),
        TransitionType::Flip => {
            let rot = |deg: f64| Transform {
                rotate_y_deg: deg,
                perspective_px: Some(FLIP_PERSPECTIVE_PX),
                ..Transform::IDENTITY
            };
            let mut plan = sequential(
                TransitionType::Flip,
                &cfg,
                (
                    Style::default().with_transform(rot(0.0)),
                    Style::default().with_transform(rot(sign * 90.0)),
                ),
                (
                    Style::default().with_transform(rot(-sign * 90.0)),
                    Style::default().with_transform(rot(0.0)),
                ),
            );
            plan.preposition = Some(Style::default().with_transform(rot(-sign * 90.0)));
            plan
        }
        TransitionType::Push => concurrent(TransitionType::Push, &cfg, cfg.easing.clone(), sign),
        TransitionType::Slide => concurrent(TransitionType::Slide, &cfg, smooth_easing(), sign),
    }
}

/// Outgoing runs over the first half, incoming over the second.
fn sequential(
    kind: TransitionType,
    cfg: &AnimationConfig,
    outgoing: (Style, Style),
    incoming: (Style, Style),
) -> TransitionPlan {
    let half = cfg.duration / 2;
    let timing = |delay| Timing {
        duration: half,
        delay,
        easing: cfg.easing.clone(),
        fill: Fill::Both,
    };
    TransitionPlan {
        kind,
        outgoing: PhasePlan {
            keyframes: two_keys(outgoing),
            timing: timing(Duration::ZERO),
        },
        incoming: PhasePlan {
            keyframes: two_keys(incoming),
            timing: timing(half),
        },
        preposition: None,
    }
}

/// Both slides travel one width at once; the incoming one starts off-canvas.
fn concurrent(
    kind: TransitionType,
    cfg: &AnimationConfig,
    easing: Easing,
    sign: f64,
) -> TransitionPlan {
    let at =
        |pct: f64| Style::default().with_transform(Transform::translate_x(Length::Percent(pct)));
    let timing = Timing {
        duration: cfg.duration,
        delay: Duration::ZERO,
        easing,
        fill: Fill::Both,
    };
    TransitionPlan {
        kind,
        outgoing: PhasePlan {
            keyframes: two_keys((at(0.0), at(sign * 100.0))),
            timing: timing.clone(),
        },
        incoming: PhasePlan {
            keyframes: two_keys((at(-sign * 100.0), at(0.0))),
            timing,
        },
        preposition: Some(at(-sign * 100.0).with_position(Position::Absolute)),
    }
}

fn two_keys((from, to): (Style, Style)) -> Keyframes {
    smallvec![Keyframe::new(0.0, from), Keyframe::new(1.0, to)]
}

fn start_phase(
    side: &str,
    target: &dyn Animatable,
    phase: &PhasePlan,
) -> MotionResult<Rc<dyn AnimationControls>> {
    target.animate(&phase.keyframes, &phase.timing).map_err(|e| {
        MotionError::transition_phase(format!(
            "{side} phase on '{}' failed to start: {e}",
            target.element_id()
        ))
    })
}

fn check_phase(
    side: &str,
    target: &dyn Animatable,
    outcome: MotionResult<Completion>,
) -> MotionResult<()> {
    outcome.map(|_| ()).map_err(|e| {
        MotionError::transition_phase(format!(
            "{side} phase on '{}' failed: {e}",
            target.element_id()
        ))
    })
}

/// Run both phases of `plan` and wait for both to settle.
///
/// If the incoming phase cannot start, the already-started outgoing phase is cancelled before the
/// error is returned.
pub(crate) async fn run_transition(
    plan: &TransitionPlan,
    outgoing: &dyn Animatable,
    incoming: &dyn Animatable,
) -> MotionResult<()> {
    if let Some(pre) = &plan.preposition {
        incoming.set_style(pre);
    }
    incoming.set_style(&Style {
        visibility: Some(Visibility::Visible),
        ..Style::default()
    });

    let out = start_phase("outgoing", outgoing, &plan.outgoing)?;
    let inc = match start_phase("incoming", incoming, &plan.incoming) {
        Ok(c) => c,
        Err(e) => {
            out.cancel();
            return Err(e);
        }
    };

    tracing::debug!(
        kind = ?plan.kind,
        duration_ms = saturating_millis(plan.incoming.timing.total()),
        "transition phases started"
    );

    let (out_done, in_done) = futures::future::join(out.finished(), inc.finished()).await;
    check_phase("outgoing", outgoing, out_done)?;
    check_phase("incoming", incoming, in_done)?;

    outgoing.set_style(&Style {
        visibility: Some(Visibility::Hidden),
        ..Style::default()
    });
    if plan.preposition.is_some() {
        incoming.set_style(&Style::default().with_position(Position::Static));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
