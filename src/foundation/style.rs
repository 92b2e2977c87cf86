//! Visual property model shared by keyframes, render targets, and fallbacks.
//!
//! A [`Style`] is a sparse property map: `None` means "leave this property alone" when merged onto
//! a target, and "not animated" when it appears in a keyframe.

/// Values that can be linearly interpolated between two keyframes.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` at eased progress `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// A translation length, either absolute or relative to the element's own box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Device-independent pixels.
    Px(f64),
    /// Percent of the element's own size along the same axis.
    Percent(f64),
}

impl Length {
    /// Zero-length translation.
    pub const ZERO: Self = Self::Px(0.0);

    /// `true` when the translation is exactly zero in either unit.
    pub fn is_zero(self) -> bool {
        match self {
            Self::Px(v) | Self::Percent(v) => v == 0.0,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Lerp for Length {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (*a, *b) {
            (Self::Px(a), Self::Px(b)) => Self::Px(f64::lerp(&a, &b, t)),
            (Self::Percent(a), Self::Percent(b)) => Self::Percent(f64::lerp(&a, &b, t)),
            // Zero converts freely between units.
            (Self::Px(z), Self::Percent(b)) if z == 0.0 => Self::Percent(f64::lerp(&0.0, &b, t)),
            (Self::Percent(a), Self::Px(z)) if z == 0.0 => Self::Percent(f64::lerp(&a, &0.0, t)),
            _ => {
                if t < 0.5 {
                    *a
                } else {
                    *b
                }
            }
        }
    }
}

/// 2D transform plus a Y-axis rotation for perspective flips.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Horizontal translation.
    pub translate_x: Length,
    /// Vertical translation.
    pub translate_y: Length,
    /// Uniform scale factor.
    pub scale: f64,
    /// Rotation in the screen plane, degrees.
    pub rotate_deg: f64,
    /// Rotation around the vertical axis, degrees.
    pub rotate_y_deg: f64,
    /// Perspective distance applied before `rotate_y_deg`.
    pub perspective_px: Option<f64>,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translate_x: Length::ZERO,
        translate_y: Length::ZERO,
        scale: 1.0,
        rotate_deg: 0.0,
        rotate_y_deg: 0.0,
        perspective_px: None,
    };

    /// Pure horizontal translation.
    pub fn translate_x(x: Length) -> Self {
        Self {
            translate_x: x,
            ..Self::IDENTITY
        }
    }

    /// Pure vertical translation.
    pub fn translate_y(y: Length) -> Self {
        Self {
            translate_y: y,
            ..Self::IDENTITY
        }
    }

    /// Pure uniform scale.
    pub fn scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    /// `true` when the transform has no visual effect. Perspective alone is not a residual.
    pub fn is_identity(&self) -> bool {
        self.translate_x.is_zero()
            && self.translate_y.is_zero()
            && self.scale == 1.0
            && self.rotate_deg.rem_euclid(360.0) == 0.0
            && self.rotate_y_deg.rem_euclid(360.0) == 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Lerp for Transform {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            translate_x: Length::lerp(&a.translate_x, &b.translate_x, t),
            translate_y: Length::lerp(&a.translate_y, &b.translate_y, t),
            scale: f64::lerp(&a.scale, &b.scale, t),
            rotate_deg: f64::lerp(&a.rotate_deg, &b.rotate_deg, t),
            rotate_y_deg: f64::lerp(&a.rotate_y_deg, &b.rotate_y_deg, t),
            perspective_px: b.perspective_px.or(a.perspective_px),
        }
    }
}

/// Rectangular clip expressed as insets from each edge, in percent of the element's box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipInset {
    /// Inset from the top edge.
    pub top: f64,
    /// Inset from the right edge.
    pub right: f64,
    /// Inset from the bottom edge.
    pub bottom: f64,
    /// Inset from the left edge.
    pub left: f64,
}

impl ClipInset {
    /// Fully open clip.
    pub const OPEN: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// `true` when nothing is clipped away.
    pub fn is_open(&self) -> bool {
        *self == Self::OPEN
    }
}

impl Lerp for ClipInset {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            top: f64::lerp(&a.top, &b.top, t),
            right: f64::lerp(&a.right, &b.right, t),
            bottom: f64::lerp(&a.bottom, &b.bottom, t),
            left: f64::lerp(&a.left, &b.left, t),
        }
    }
}

/// Whether an element participates in painting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Painted.
    #[default]
    Visible,
    /// Not painted.
    Hidden,
}

/// Layout positioning of an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    /// Normal flow.
    #[default]
    Static,
    /// Taken out of flow and overlaid on the slide canvas.
    Absolute,
}

/// Sparse visual property map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// Opacity in `[0, 1]`.
    pub opacity: Option<f64>,
    /// Visual transform.
    pub transform: Option<Transform>,
    /// Clip insets.
    pub clip: Option<ClipInset>,
    /// Paint visibility.
    pub visibility: Option<Visibility>,
    /// Layout positioning.
    pub position: Option<Position>,
}

impl Style {
    /// Fully visible, untransformed, unclipped.
    pub fn resting() -> Self {
        Self {
            opacity: Some(1.0),
            transform: Some(Transform::IDENTITY),
            clip: Some(ClipInset::OPEN),
            visibility: Some(Visibility::Visible),
            position: None,
        }
    }

    /// Hidden and fully transparent.
    pub fn hidden() -> Self {
        Self {
            opacity: Some(0.0),
            visibility: Some(Visibility::Hidden),
            ..Self::default()
        }
    }

    /// Style with only opacity set.
    pub fn opacity(opacity: f64) -> Self {
        Self {
            opacity: Some(opacity),
            ..Self::default()
        }
    }

    /// Set the transform, builder-style.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Set the clip, builder-style.
    pub fn with_clip(mut self, clip: ClipInset) -> Self {
        self.clip = Some(clip);
        self
    }

    /// Set the layout position, builder-style.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Copy with every unset property replaced by its resting default.
    pub fn resolved(&self) -> Self {
        Self {
            opacity: Some(self.effective_opacity()),
            transform: Some(self.effective_transform()),
            clip: Some(self.clip.unwrap_or(ClipInset::OPEN)),
            visibility: Some(self.visibility.unwrap_or_default()),
            position: Some(self.position.unwrap_or_default()),
        }
    }

    /// Overlay every property that `other` sets onto `self`.
    pub fn merge(&mut self, other: &Style) {
        if other.opacity.is_some() {
            self.opacity = other.opacity;
        }
        if other.transform.is_some() {
            self.transform = other.transform;
        }
        if other.clip.is_some() {
            self.clip = other.clip;
        }
        if other.visibility.is_some() {
            self.visibility = other.visibility;
        }
        if other.position.is_some() {
            self.position = other.position;
        }
    }

    /// Effective opacity, treating unset as fully opaque.
    pub fn effective_opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }

    /// Effective transform, treating unset as identity.
    pub fn effective_transform(&self) -> Transform {
        self.transform.unwrap_or(Transform::IDENTITY)
    }

    /// `true` when the element would paint at its authored resting properties.
    pub fn is_at_rest(&self) -> bool {
        self.effective_opacity() == 1.0
            && self.effective_transform().is_identity()
            && self.clip.is_none_or(|c| c.is_open())
            && self.visibility != Some(Visibility::Hidden)
    }
}

impl Lerp for Style {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn num<T: Lerp + Copy>(a: Option<T>, b: Option<T>, t: f64) -> Option<T> {
            match (a, b) {
                (Some(a), Some(b)) => Some(T::lerp(&a, &b, t)),
                (a, b) => b.or(a),
            }
        }
        fn discrete<T: Copy>(a: Option<T>, b: Option<T>, t: f64) -> Option<T> {
            match (a, b) {
                (Some(a), Some(b)) => Some(if t < 0.5 { a } else { b }),
                (a, b) => b.or(a),
            }
        }

        Self {
            opacity: num(a.opacity, b.opacity, t),
            transform: num(a.transform, b.transform, t),
            clip: num(a.clip, b.clip, t),
            visibility: discrete(a.visibility, b.visibility, t),
            position: discrete(a.position, b.position, t),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/style.rs"]
mod tests;
