//! Instant terminal states used when motion cannot run or has failed.

use crate::foundation::style::{Position, Style};
use crate::surface::target::Animatable;

/// Force an element to its resting, fully visible state.
pub fn apply_element_fallback(target: &dyn Animatable) {
    target.set_style(&Style::resting());
}

/// Force the end state of a slide transition: outgoing hidden, incoming fully shown in normal flow.
pub fn apply_transition_fallback(outgoing: &dyn Animatable, incoming: &dyn Animatable) {
    outgoing.set_style(&Style::hidden());
    incoming.set_style(&Style::resting().with_position(Position::Static));
}

#[cfg(test)]
#[path = "../../tests/unit/effects/fallback.rs"]
mod tests;
