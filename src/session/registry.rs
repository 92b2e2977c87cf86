use crate::foundation::core::ElementId;
use crate::foundation::style::Style;
use crate::surface::target::{Animatable, AnimationControls};
use std::collections::HashMap;
use std::rc::Rc;

/// A tracked, running element animation.
pub(crate) struct ActiveAnimation {
    pub(crate) element_id: ElementId,
    pub(crate) controls: Rc<dyn AnimationControls>,
    pub(crate) target: Rc<dyn Animatable>,
    /// Resolved style captured before the animation started.
    pub(crate) snapshot: Style,
    pub(crate) generation: u64,
}

impl ActiveAnimation {
    /// Cancel the motion and put the element back where it was.
    pub(crate) fn stop(&self) {
        self.controls.cancel();
        self.target.set_style(&self.snapshot);
    }
}

/// Element id → running animation. At most one entry per id; inserts replace.
#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<ElementId, ActiveAnimation>,
    next_generation: u64,
}

impl Registry {
    pub(crate) fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Track `entry`, returning the entry it displaced, if any.
    pub(crate) fn insert(&mut self, entry: ActiveAnimation) -> Option<ActiveAnimation> {
        self.entries.insert(entry.element_id.clone(), entry)
    }

    /// Remove the entry for `id` only if it is still the one created as `generation`.
    pub(crate) fn remove_generation(
        &mut self,
        id: &ElementId,
        generation: u64,
    ) -> Option<ActiveAnimation> {
        match self.entries.get(id) {
            Some(e) if e.generation == generation => self.entries.remove(id),
            _ => None,
        }
    }

    pub(crate) fn get(&self, id: &ElementId) -> Option<&ActiveAnimation> {
        self.entries.get(id)
    }

    pub(crate) fn is_current(&self, id: &ElementId, generation: u64) -> bool {
        self.entries.get(id).is_some_and(|e| e.generation == generation)
    }

    pub(crate) fn controls(&self) -> Vec<Rc<dyn AnimationControls>> {
        self.entries.values().map(|e| Rc::clone(&e.controls)).collect()
    }

    pub(crate) fn drain(&mut self) -> Vec<ActiveAnimation> {
        self.entries.drain().map(|(_, e)| e).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/registry.rs"]
mod tests;
