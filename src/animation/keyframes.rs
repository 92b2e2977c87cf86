use crate::animation::descriptor::Effect;
use crate::foundation::core::Direction;
use crate::foundation::style::{ClipInset, Length, Lerp, Style, Transform};
use smallvec::{SmallVec, smallvec};

const SLIDE_DISTANCE_PX: f64 = 100.0;
const BOUNCE_RISE_PX: f64 = 100.0;
const BOUNCE_OVERSHOOT_SCALE: f64 = 1.1;
const BOUNCE_OVERSHOOT_PX: f64 = -10.0;
const BOUNCE_OVERSHOOT_AT: f64 = 0.7;

/// One visual snapshot at a point along an animation.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Position in `[0, 1]` along the active duration.
    pub offset: f64,
    /// Properties reached at `offset`.
    pub style: Style,
}

impl Keyframe {
    /// Build a keyframe.
    pub fn new(offset: f64, style: Style) -> Self {
        Self { offset, style }
    }
}

/// Ordered keyframe list; effects never need more than three.
pub type Keyframes = SmallVec<[Keyframe; 3]>;

/// Generate the keyframes for an element effect.
///
/// The first keyframe is always a hidden start state and the last is fully opaque with no
/// residual transform or clip.
pub fn generate_keyframes(effect: Effect, direction: Direction) -> Keyframes {
    let shown = || Style::opacity(1.0);
    match effect {
        Effect::Fade => smallvec![
            Keyframe::new(0.0, Style::opacity(0.0)),
            Keyframe::new(1.0, shown()),
        ],
        Effect::Slide => smallvec![
            Keyframe::new(0.0, Style::opacity(0.0).with_transform(slide_offset(direction))),
            Keyframe::new(1.0, shown().with_transform(Transform::IDENTITY)),
        ],
        Effect::Zoom => smallvec![
            Keyframe::new(0.0, Style::opacity(0.0).with_transform(Transform::scale(0.0))),
            Keyframe::new(1.0, shown().with_transform(Transform::IDENTITY)),
        ],
        Effect::Bounce => smallvec![
            Keyframe::new(
                0.0,
                Style::opacity(0.0).with_transform(Transform {
                    scale: 0.0,
                    translate_y: Length::Px(BOUNCE_RISE_PX),
                    ..Transform::IDENTITY
                }),
            ),
            Keyframe::new(
                BOUNCE_OVERSHOOT_AT,
                shown().with_transform(Transform {
                    scale: BOUNCE_OVERSHOOT_SCALE,
                    translate_y: Length::Px(BOUNCE_OVERSHOOT_PX),
                    ..Transform::IDENTITY
                }),
            ),
            Keyframe::new(1.0, shown().with_transform(Transform::IDENTITY)),
        ],
        Effect::Spin => smallvec![
            Keyframe::new(
                0.0,
                Style::opacity(0.0).with_transform(Transform {
                    scale: 0.0,
                    rotate_deg: 0.0,
                    ..Transform::IDENTITY
                }),
            ),
            Keyframe::new(
                1.0,
                shown().with_transform(Transform {
                    rotate_deg: 360.0,
                    ..Transform::IDENTITY
                }),
            ),
        ],
        Effect::Wipe => smallvec![
            Keyframe::new(0.0, shown().with_clip(wipe_clip(direction))),
            Keyframe::new(1.0, shown().with_clip(ClipInset::OPEN)),
        ],
    }
}

/// Start offset for `slide`: 100px on the side opposite the travel direction.
fn slide_offset(direction: Direction) -> Transform {
    match direction {
        Direction::Left => Transform::translate_x(Length::Px(SLIDE_DISTANCE_PX)),
        Direction::Right => Transform::translate_x(Length::Px(-SLIDE_DISTANCE_PX)),
        Direction::Up => Transform::translate_y(Length::Px(SLIDE_DISTANCE_PX)),
        Direction::Down => Transform::translate_y(Length::Px(-SLIDE_DISTANCE_PX)),
    }
}

/// Start clip for `wipe`: fully hidden from the side named by `direction`.
fn wipe_clip(direction: Direction) -> ClipInset {
    match direction {
        Direction::Left => ClipInset {
            left: 100.0,
            ..ClipInset::OPEN
        },
        Direction::Right => ClipInset {
            right: 100.0,
            ..ClipInset::OPEN
        },
        Direction::Up => ClipInset {
            top: 100.0,
            ..ClipInset::OPEN
        },
        Direction::Down => ClipInset {
            bottom: 100.0,
            ..ClipInset::OPEN
        },
    }
}

/// Sample interpolated properties at eased `progress` in `[0, 1]`.
///
/// Keyframes must be sorted by offset. An empty list samples to an empty style.
pub fn sample(keyframes: &[Keyframe], progress: f64) -> Style {
    let (Some(first), Some(last)) = (keyframes.first(), keyframes.last()) else {
        return Style::default();
    };
    if progress <= first.offset {
        return first.style.clone();
    }
    if progress >= last.offset {
        return last.style.clone();
    }

    let idx = keyframes.partition_point(|k| k.offset <= progress);
    let a = &keyframes[idx - 1];
    let b = &keyframes[idx];
    let span = b.offset - a.offset;
    if span <= 0.0 {
        return b.style.clone();
    }
    Style::lerp(&a.style, &b.style, (progress - a.offset) / span)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
