//! Clock-driven software implementation of [`Animatable`].
//!
//! Nothing advances on its own: the host's frame loop (or a test) calls [`TweenSurface::tick`]
//! and every live tween is sampled and written back to its element's style.

use crate::animation::keyframes::{self, Keyframe, Keyframes};
use crate::foundation::core::ElementId;
use crate::foundation::error::{MotionError, MotionResult};
use crate::foundation::style::Style;
use crate::surface::target::{Animatable, AnimationControls, Completion, Fill, Timing};
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

/// How a [`TweenElement`] responds to animation requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimateSupport {
    /// Animations run normally.
    #[default]
    Supported,
    /// The element reports no animate capability.
    Unsupported,
    /// `animate` returns an error.
    Rejects,
    /// Animations run, then their completion reports an error.
    FailsOnFinish,
}

#[derive(Clone, Debug)]
enum Settled {
    Finished,
    Cancelled,
    Failed(String),
}

impl Settled {
    fn into_result(self) -> MotionResult<Completion> {
        match self {
            Self::Finished => Ok(Completion::Finished),
            Self::Cancelled => Ok(Completion::Cancelled),
            Self::Failed(msg) => Err(MotionError::animation_creation(msg)),
        }
    }
}

#[derive(Default)]
struct SurfaceInner {
    now: Cell<Duration>,
    tweens: RefCell<Vec<Rc<Tween>>>,
}

/// Owner of the clock and every running tween.
#[derive(Clone, Default)]
pub struct TweenSurface {
    inner: Rc<SurfaceInner>,
}

impl TweenSurface {
    /// Create an empty surface at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element on this surface with an initial style.
    pub fn element(&self, id: impl Into<ElementId>, style: Style) -> Rc<TweenElement> {
        Rc::new(TweenElement {
            id: id.into(),
            surface: Rc::downgrade(&self.inner),
            style: Rc::new(RefCell::new(style)),
            support: Cell::new(AnimateSupport::Supported),
        })
    }

    /// Time elapsed on this surface.
    pub fn now(&self) -> Duration {
        self.inner.now.get()
    }

    /// Number of tweens that have not settled.
    pub fn running(&self) -> usize {
        self.inner
            .tweens
            .borrow()
            .iter()
            .filter(|t| !t.is_settled())
            .count()
    }

    /// Advance the clock by `dt`, updating every unpaused tween.
    pub fn tick(&self, dt: Duration) {
        self.inner.now.set(self.inner.now.get() + dt);
        let live: Vec<Rc<Tween>> = self.inner.tweens.borrow().clone();
        for tween in &live {
            tween.advance(dt);
        }
        self.inner
            .tweens
            .borrow_mut()
            .retain(|t| t.settled.borrow().is_none());
    }
}

/// An element whose style is written by tweens.
pub struct TweenElement {
    id: ElementId,
    surface: Weak<SurfaceInner>,
    style: Rc<RefCell<Style>>,
    support: Cell<AnimateSupport>,
}

impl TweenElement {
    /// Change how this element responds to animation requests.
    pub fn set_support(&self, support: AnimateSupport) {
        self.support.set(support);
    }

    /// Current style.
    pub fn style(&self) -> Style {
        self.style.borrow().clone()
    }
}

impl Animatable for TweenElement {
    fn element_id(&self) -> &ElementId {
        &self.id
    }

    fn can_animate(&self) -> bool {
        self.support.get() != AnimateSupport::Unsupported
    }

    fn style_snapshot(&self) -> Style {
        self.style()
    }

    fn set_style(&self, style: &Style) {
        self.style.borrow_mut().merge(style);
    }

    fn animate(
        &self,
        keyframes: &[Keyframe],
        timing: &Timing,
    ) -> MotionResult<Rc<dyn AnimationControls>> {
        match self.support.get() {
            AnimateSupport::Unsupported => {
                return Err(MotionError::animation_creation(format!(
                    "element '{}' has no animate capability",
                    self.id
                )));
            }
            AnimateSupport::Rejects => {
                return Err(MotionError::animation_creation(format!(
                    "element '{}' rejected keyframes",
                    self.id
                )));
            }
            AnimateSupport::Supported | AnimateSupport::FailsOnFinish => {}
        }
        let surface = self
            .surface
            .upgrade()
            .ok_or_else(|| anyhow::anyhow!("surface for '{}' was dropped", self.id))?;

        let tween = Rc::new(Tween {
            style: Rc::clone(&self.style),
            keyframes: keyframes.iter().cloned().collect(),
            timing: timing.clone(),
            time: Cell::new(Duration::ZERO),
            reversed: Cell::new(false),
            paused: Cell::new(false),
            fail_on_finish: self.support.get() == AnimateSupport::FailsOnFinish,
            settled: RefCell::new(None),
            waiters: RefCell::new(Vec::new()),
        });
        tween.apply();
        surface.tweens.borrow_mut().push(Rc::clone(&tween));
        Ok(Rc::new(TweenControls(tween)))
    }
}

struct Tween {
    style: Rc<RefCell<Style>>,
    keyframes: Keyframes,
    timing: Timing,
    time: Cell<Duration>,
    reversed: Cell<bool>,
    paused: Cell<bool>,
    fail_on_finish: bool,
    settled: RefCell<Option<Settled>>,
    waiters: RefCell<Vec<oneshot::Sender<Settled>>>,
}

impl Tween {
    fn is_settled(&self) -> bool {
        self.settled.borrow().is_some()
    }

    fn advance(&self, dt: Duration) {
        if self.is_settled() || self.paused.get() {
            return;
        }
        let total = self.timing.total();
        if self.reversed.get() {
            let t = self.time.get().saturating_sub(dt);
            self.time.set(t);
            self.apply();
            if t.is_zero() {
                self.finish();
            }
        } else {
            let t = (self.time.get() + dt).min(total);
            self.time.set(t);
            self.apply();
            if t >= total {
                self.finish();
            }
        }
    }

    fn apply(&self) {
        let t = self.time.get();
        let fill = self.timing.fill;
        let progress = if t < self.timing.delay {
            if !matches!(fill, Fill::Backwards | Fill::Both) {
                return;
            }
            0.0
        } else if self.timing.duration.is_zero() {
            1.0
        } else {
            ((t - self.timing.delay).as_secs_f64() / self.timing.duration.as_secs_f64()).min(1.0)
        };
        let eased = self.timing.easing.apply(progress);
        let sampled = keyframes::sample(&self.keyframes, eased);
        self.style.borrow_mut().merge(&sampled);
    }

    fn finish(&self) {
        if self.fail_on_finish {
            self.settle(Settled::Failed("animation aborted by render target".to_owned()));
        } else {
            self.settle(Settled::Finished);
        }
    }

    fn settle(&self, outcome: Settled) {
        if self.is_settled() {
            return;
        }
        *self.settled.borrow_mut() = Some(outcome.clone());
        for tx in self.waiters.borrow_mut().drain(..) {
            // Receiver may have been dropped; nothing to notify then.
            let _ = tx.send(outcome.clone());
        }
    }
}

struct TweenControls(Rc<Tween>);

impl AnimationControls for TweenControls {
    fn play(&self) {
        self.0.paused.set(false);
    }

    fn pause(&self) {
        self.0.paused.set(true);
    }

    fn cancel(&self) {
        self.0.settle(Settled::Cancelled);
    }

    fn reverse(&self) {
        self.0.reversed.set(!self.0.reversed.get());
    }

    fn seek(&self, time: Duration) {
        if self.0.is_settled() {
            return;
        }
        self.0.time.set(time.min(self.0.timing.total()));
        self.0.apply();
    }

    fn current_time(&self) -> Duration {
        self.0.time.get()
    }

    fn total_duration(&self) -> Duration {
        self.0.timing.total()
    }

    fn finished(&self) -> LocalBoxFuture<'static, MotionResult<Completion>> {
        if let Some(done) = self.0.settled.borrow().clone() {
            return futures::future::ready(done.into_result()).boxed_local();
        }
        let (tx, rx) = oneshot::channel();
        self.0.waiters.borrow_mut().push(tx);
        async move {
            match rx.await {
                Ok(done) => done.into_result(),
                Err(_) => Err(MotionError::animation_creation(
                    "tween dropped before settling",
                )),
            }
        }
        .boxed_local()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/tween.rs"]
mod tests;
