use crate::animation::descriptor::AnimationStep;
use crate::animation::keyframes::generate_keyframes;
use crate::animation::normalize::AnimationConfig;
use crate::effects::fallback::{apply_element_fallback, apply_transition_fallback};
use crate::effects::transitions::{TransitionDescriptor, plan_transition, run_transition};
use crate::foundation::core::{ElementId, NavDirection, PerformanceMode};
use crate::foundation::error::{MotionError, MotionResult};
use crate::foundation::style::{Position, Style};
use crate::session::environment::{
    Environment, HostVisibility, Subscription, detect_performance_mode,
};
use crate::session::registry::{ActiveAnimation, Registry};
use crate::surface::target::{Animatable, AnimationControls, Completion, Fill, Timing};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Constructor options. Unset fields are probed from the environment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Force the reduced-motion preference.
    pub reduced_motion: Option<bool>,
    /// Force the performance tier.
    pub performance_mode: Option<PerformanceMode>,
}

impl EngineOpts {
    /// Parse options from JSON text.
    pub fn from_json(text: &str) -> MotionResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| MotionError::serde(format!("parse engine options JSON: {e}")))
    }
}

/// Engine-wide flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineState {
    /// Motion is replaced by instant state changes.
    pub reduced_motion: bool,
    /// Tier used to scale durations.
    pub performance_mode: PerformanceMode,
    /// At least one element animation is tracked.
    pub is_playing: bool,
    /// Tracked animations are globally paused.
    pub is_paused: bool,
}

#[derive(Default)]
struct Shared {
    state: Cell<EngineState>,
    registry: RefCell<Registry>,
    disposed: Cell<bool>,
}

impl Shared {
    fn update(&self, f: impl FnOnce(&mut EngineState)) {
        let mut s = self.state.get();
        f(&mut s);
        self.state.set(s);
    }

    fn sync_playing(&self) {
        let playing = !self.registry.borrow().is_empty();
        self.update(|s| s.is_playing = playing);
    }

    /// Track `entry`, cancelling any animation it displaces.
    ///
    /// A displaced animation hands over its snapshot, so stopping the successor restores the
    /// style from before the first of them started.
    fn track(&self, mut entry: ActiveAnimation) -> u64 {
        let mut reg = self.registry.borrow_mut();
        let generation = reg.next_generation();
        entry.generation = generation;
        if let Some(prev) = reg.get(&entry.element_id) {
            entry.snapshot = prev.snapshot.clone();
        }
        let displaced = reg.insert(entry);
        drop(reg);
        if let Some(prev) = displaced {
            tracing::debug!(element = %prev.element_id, "cancelled displaced animation");
            prev.controls.cancel();
        }
        self.sync_playing();
        generation
    }

    fn untrack(&self, id: &ElementId, generation: u64) {
        let removed = self.registry.borrow_mut().remove_generation(id, generation);
        if removed.is_some() {
            self.sync_playing();
        }
    }

    fn pause_all(&self) {
        let controls = self.registry.borrow().controls();
        for c in &controls {
            c.pause();
        }
        self.update(|s| s.is_paused = true);
    }

    fn resume_all(&self) {
        let controls = self.registry.borrow().controls();
        for c in &controls {
            c.play();
        }
        self.update(|s| s.is_paused = false);
    }

    fn stop_all(&self) {
        // Release the borrow before stopping: cancellation may settle futures that touch it.
        let entries = self.registry.borrow_mut().drain();
        for e in &entries {
            e.stop();
        }
        self.update(|s| {
            s.is_playing = false;
            s.is_paused = false;
        });
        if !entries.is_empty() {
            tracing::debug!(count = entries.len(), "stopped all animations");
        }
    }

    fn set_reduced_motion(&self, enabled: bool) {
        if self.disposed.get() {
            return;
        }
        if enabled {
            self.stop_all();
        }
        self.update(|s| s.reduced_motion = enabled);
    }

    fn set_visibility(&self, visibility: HostVisibility) {
        if self.disposed.get() {
            return;
        }
        match visibility {
            HostVisibility::Background => self.pause_all(),
            HostVisibility::Foreground => self.resume_all(),
        }
    }
}

/// Animation and transition engine for one presentation session.
///
/// Single-threaded: all calls, including environment callbacks, must happen on the thread that
/// drives the render surface.
pub struct Engine {
    shared: Rc<Shared>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl Engine {
    /// Create an engine with no environment signals.
    ///
    /// Unset options default to no reduced motion and the `high` tier.
    pub fn new(opts: EngineOpts) -> Self {
        let shared = Shared::default();
        shared.state.set(EngineState {
            reduced_motion: opts.reduced_motion.unwrap_or(false),
            performance_mode: opts.performance_mode.unwrap_or_default(),
            is_playing: false,
            is_paused: false,
        });
        Self {
            shared: Rc::new(shared),
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    /// Create an engine that probes `env` once and follows its change signals.
    pub fn with_environment(opts: EngineOpts, env: &dyn Environment) -> Self {
        let resolved = EngineOpts {
            reduced_motion: opts
                .reduced_motion
                .or_else(|| Some(env.prefers_reduced_motion())),
            performance_mode: opts
                .performance_mode
                .or_else(|| Some(detect_performance_mode(env.capabilities()))),
        };
        let engine = Self::new(resolved);

        let weak = Rc::downgrade(&engine.shared);
        let motion = env.on_reduced_motion_change(Box::new(move |enabled| {
            if let Some(shared) = weak.upgrade() {
                shared.set_reduced_motion(enabled);
            }
        }));
        let weak = Rc::downgrade(&engine.shared);
        let visibility = env.on_visibility_change(Box::new(move |visibility| {
            if let Some(shared) = weak.upgrade() {
                shared.set_visibility(visibility);
            }
        }));
        engine
            .subscriptions
            .borrow_mut()
            .extend([motion, visibility]);

        let state = engine.state();
        tracing::debug!(
            reduced_motion = state.reduced_motion,
            performance_mode = ?state.performance_mode,
            "engine environment probed"
        );
        engine
    }

    /// Snapshot of the engine-wide flags.
    pub fn state(&self) -> EngineState {
        self.shared.state.get()
    }

    /// Number of tracked element animations.
    pub fn active_count(&self) -> usize {
        self.shared.registry.borrow().len()
    }

    /// Whether `id` has a tracked animation.
    pub fn is_animating(&self, id: &ElementId) -> bool {
        self.shared.registry.borrow().get(id).is_some()
    }

    /// Per-animation controls for the element's current animation.
    pub fn controller(&self, id: &ElementId) -> Option<AnimationController> {
        let reg = self.shared.registry.borrow();
        let entry = reg.get(id)?;
        Some(AnimationController {
            shared: Rc::downgrade(&self.shared),
            element_id: id.clone(),
            generation: entry.generation,
            controls: Rc::clone(&entry.controls),
        })
    }

    /// Play one element animation to completion. Never fails.
    ///
    /// Reduced motion and missing capability apply the resting state immediately; creation or
    /// completion failures are logged and resolved by the element fallback.
    ///
    /// `target` is shared rather than borrowed: the registry keeps it so `stop` and
    /// `stop_all_animations` can restore the pre-animation style after this call has returned.
    #[tracing::instrument(skip_all, fields(element = %step.element_id, effect = ?step.animation.effect))]
    pub async fn execute_animation(&self, step: &AnimationStep, target: Rc<dyn Animatable>) {
        let state = self.state();
        if self.shared.disposed.get() || state.reduced_motion {
            target.set_style(&Style::resting());
            return;
        }
        if !target.can_animate() {
            tracing::debug!("target cannot animate, showing resting state");
            apply_element_fallback(&*target);
            return;
        }

        let cfg = AnimationConfig::from_animation(&step.animation, state.performance_mode);
        let keyframes = generate_keyframes(step.animation.effect, cfg.direction);
        let snapshot = target.style_snapshot().resolved();
        let timing = Timing {
            duration: cfg.duration,
            delay: cfg.delay,
            easing: cfg.easing,
            fill: Fill::Both,
        };

        let controls = match target.animate(&keyframes, &timing) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "animation creation failed, applying fallback");
                apply_element_fallback(&*target);
                return;
            }
        };
        if state.is_paused {
            controls.pause();
        }

        let generation = self.shared.track(ActiveAnimation {
            element_id: step.element_id.clone(),
            controls: Rc::clone(&controls),
            target: Rc::clone(&target),
            snapshot,
            generation: 0,
        });

        let outcome = controls.finished().await;
        self.shared.untrack(&step.element_id, generation);
        match outcome {
            Ok(Completion::Finished) => {}
            Ok(Completion::Cancelled) => tracing::debug!("animation cancelled"),
            Err(e) => {
                tracing::warn!(error = %e, "animation failed, applying fallback");
                apply_element_fallback(&*target);
            }
        }
    }

    /// Hand off from `outgoing` to `incoming`. Never fails.
    ///
    /// Transitions are not tracked in the registry, so both slides are only borrowed for the
    /// duration of the call.
    #[tracing::instrument(
        skip_all,
        fields(
            transition = ?transition.kind,
            from = %outgoing.element_id(),
            to = %incoming.element_id(),
        )
    )]
    pub async fn execute_slide_transition(
        &self,
        transition: &TransitionDescriptor,
        outgoing: &dyn Animatable,
        incoming: &dyn Animatable,
        direction: NavDirection,
    ) {
        let state = self.state();
        if self.shared.disposed.get() || state.reduced_motion {
            outgoing.set_style(&Style::hidden());
            incoming.set_style(&Style::resting().with_position(Position::Static));
            return;
        }
        if !outgoing.can_animate() || !incoming.can_animate() {
            tracing::debug!("slide cannot animate, swapping instantly");
            apply_transition_fallback(outgoing, incoming);
            return;
        }

        let plan = plan_transition(transition, direction, state.performance_mode);
        if let Err(e) = run_transition(&plan, outgoing, incoming).await {
            tracing::warn!(error = %e, "transition failed, applying fallback");
            apply_transition_fallback(outgoing, incoming);
        }
    }

    /// Pause every tracked animation in place.
    pub fn pause_all_animations(&self) {
        self.shared.pause_all();
    }

    /// Resume every tracked animation from where it was paused.
    pub fn resume_all_animations(&self) {
        self.shared.resume_all();
    }

    /// Cancel every tracked animation, restore pre-animation styles, and clear the registry.
    pub fn stop_all_animations(&self) {
        self.shared.stop_all();
    }

    /// Apply a reduced-motion preference change. Enabling it stops everything first.
    pub fn set_reduced_motion(&self, enabled: bool) {
        self.shared.set_reduced_motion(enabled);
    }

    /// Apply a host foreground/background change.
    pub fn set_visibility(&self, visibility: HostVisibility) {
        self.shared.set_visibility(visibility);
    }

    /// Stop everything, unsubscribe from the environment, and retire the engine. Later calls
    /// only apply terminal states.
    pub fn dispose(&self) {
        if self.shared.disposed.replace(true) {
            return;
        }
        self.subscriptions.borrow_mut().clear();
        self.shared.stop_all();
        tracing::debug!("engine disposed");
    }

    /// Whether [`Engine::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.get()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Handle to one tracked element animation.
///
/// Operations are no-ops once the animation has finished, been stopped, or been replaced, except
/// [`AnimationController::seek`], which reports [`MotionError::Inactive`].
#[derive(Clone)]
pub struct AnimationController {
    shared: Weak<Shared>,
    element_id: ElementId,
    generation: u64,
    controls: Rc<dyn AnimationControls>,
}

impl AnimationController {
    /// Element this controller drives.
    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    /// Whether the animation is still the tracked one for its element.
    pub fn is_active(&self) -> bool {
        self.shared.upgrade().is_some_and(|s| {
            s.registry
                .borrow()
                .is_current(&self.element_id, self.generation)
        })
    }

    /// Resume playback.
    pub fn play(&self) {
        if self.is_active() {
            self.controls.play();
        }
    }

    /// Freeze at the current position.
    pub fn pause(&self) {
        if self.is_active() {
            self.controls.pause();
        }
    }

    /// Flip playback direction.
    pub fn reverse(&self) {
        if self.is_active() {
            self.controls.reverse();
        }
    }

    /// Cancel the animation and restore the element's pre-animation style.
    pub fn stop(&self) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let removed = shared
            .registry
            .borrow_mut()
            .remove_generation(&self.element_id, self.generation);
        if let Some(entry) = removed {
            entry.stop();
            shared.sync_playing();
        }
    }

    /// Jump to `progress` in `[0, 1]` of the total duration (delay included).
    pub fn seek(&self, progress: f64) -> MotionResult<()> {
        if !self.is_active() {
            return Err(MotionError::Inactive(self.element_id.clone()));
        }
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.controls
            .seek(self.controls.total_duration().mul_f64(progress));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
