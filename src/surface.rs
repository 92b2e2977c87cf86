pub(crate) mod target;
/// Software render target driven by an explicit clock.
pub mod tween;
