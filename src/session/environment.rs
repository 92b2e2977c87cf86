//! Host environment probes and push-based signals.

use crate::foundation::core::PerformanceMode;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Host foreground/background state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HostVisibility {
    /// Presentation is on screen.
    #[default]
    Foreground,
    /// Presentation is hidden (tab switched, window minimized, ...).
    Background,
}

/// Coarse capability flags reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The host can schedule per-frame callbacks.
    pub frame_scheduling: bool,
    /// Elements expose a native keyframe animation primitive.
    pub element_animate: bool,
    /// A hardware-accelerated rendering context is available.
    pub accelerated_rendering: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            frame_scheduling: true,
            element_animate: true,
            accelerated_rendering: true,
        }
    }
}

/// Classify host capabilities into a performance tier.
pub fn detect_performance_mode(caps: HostCapabilities) -> PerformanceMode {
    if !caps.frame_scheduling || !caps.element_animate {
        PerformanceMode::Low
    } else if !caps.accelerated_rendering {
        PerformanceMode::Medium
    } else {
        PerformanceMode::High
    }
}

/// Accessibility and visibility signal source injected into the engine.
pub trait Environment {
    /// Current reduced-motion preference.
    fn prefers_reduced_motion(&self) -> bool;
    /// Capability flags used for the performance tier probe.
    fn capabilities(&self) -> HostCapabilities;
    /// Register a callback for reduced-motion preference changes.
    fn on_reduced_motion_change(&self, callback: Box<dyn Fn(bool)>) -> Subscription;
    /// Register a callback for foreground/background changes.
    fn on_visibility_change(&self, callback: Box<dyn Fn(HostVisibility)>) -> Subscription;
}

/// Listener registration returned by [`Environment`]. Dropping it unregisters the callback.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap the action that removes the listener from its source.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Subscription with nothing to release, for sources that never outlive their listeners.
    pub fn detached() -> Self {
        Self { cancel: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

struct Listeners<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Rc<dyn Fn(T)>)>>,
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<T: Copy + 'static> Listeners<T> {
    fn subscribe(self: &Rc<Self>, callback: Box<dyn Fn(T)>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, Rc::from(callback)));
        let weak = Rc::downgrade(self);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners.entries.borrow_mut().retain(|(i, _)| *i != id);
            }
        })
    }

    fn notify(&self, value: T) {
        // Callbacks may unsubscribe, so call them outside the borrow.
        let callbacks: Vec<_> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for cb in callbacks {
            cb(value);
        }
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// In-process [`Environment`] whose signals are raised by calling its setters.
#[derive(Default)]
pub struct StaticEnvironment {
    reduced_motion: Cell<bool>,
    capabilities: Cell<HostCapabilities>,
    reduced_motion_listeners: Rc<Listeners<bool>>,
    visibility_listeners: Rc<Listeners<HostVisibility>>,
}

impl StaticEnvironment {
    /// Full capabilities, no reduced-motion preference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given reduced-motion preference.
    pub fn with_reduced_motion(self, enabled: bool) -> Self {
        self.reduced_motion.set(enabled);
        self
    }

    /// Start with the given capability flags.
    pub fn with_capabilities(self, caps: HostCapabilities) -> Self {
        self.capabilities.set(caps);
        self
    }

    /// Change the reduced-motion preference and notify listeners.
    pub fn set_reduced_motion(&self, enabled: bool) {
        self.reduced_motion.set(enabled);
        self.reduced_motion_listeners.notify(enabled);
    }

    /// Notify listeners of a foreground/background change.
    pub fn set_visibility(&self, visibility: HostVisibility) {
        self.visibility_listeners.notify(visibility);
    }

    /// Number of registered listeners across both signals.
    pub fn listener_count(&self) -> usize {
        self.reduced_motion_listeners.len() + self.visibility_listeners.len()
    }
}

impl Environment for StaticEnvironment {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }

    fn capabilities(&self) -> HostCapabilities {
        self.capabilities.get()
    }

    fn on_reduced_motion_change(&self, callback: Box<dyn Fn(bool)>) -> Subscription {
        self.reduced_motion_listeners.subscribe(callback)
    }

    fn on_visibility_change(&self, callback: Box<dyn Fn(HostVisibility)>) -> Subscription {
        self.visibility_listeners.subscribe(callback)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/environment.rs"]
mod tests;
