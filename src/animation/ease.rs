use std::fmt;

/// Canonical timing curve handed to render targets.
///
/// Curves the engine does not recognize are carried verbatim in [`Easing::Named`] so hosts with a
/// richer native curve syntax still receive the author's text.
#[derive(Clone, Debug, PartialEq)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1)`.
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Explicit control points `(x1, y1, x2, y2)`.
    CubicBezier(f64, f64, f64, f64),
    /// Unrecognized curve name, passed through unchanged.
    Named(String),
}

impl Easing {
    /// Parse canonical curve syntax. Returns `None` for anything that is not canonical.
    pub fn parse_canonical(text: &str) -> Option<Self> {
        let t = text.trim().to_ascii_lowercase();
        match t.as_str() {
            "linear" => Some(Self::Linear),
            "ease" => Some(Self::Ease),
            "ease-in" => Some(Self::EaseIn),
            "ease-out" => Some(Self::EaseOut),
            "ease-in-out" => Some(Self::EaseInOut),
            _ => {
                let args = t.strip_prefix("cubic-bezier(")?.strip_suffix(')')?;
                let mut nums = args.split(',').map(|p| p.trim().parse::<f64>());
                let (x1, y1, x2, y2) = match (nums.next(), nums.next(), nums.next(), nums.next()) {
                    (Some(Ok(a)), Some(Ok(b)), Some(Ok(c)), Some(Ok(d))) => (a, b, c, d),
                    _ => return None,
                };
                if nums.next().is_some() || !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2)
                {
                    return None;
                }
                Some(Self::CubicBezier(x1, y1, x2, y2))
            }
        }
    }

    /// Control points for curves that have them.
    pub fn control_points(&self) -> Option<(f64, f64, f64, f64)> {
        match self {
            Self::Linear | Self::Named(_) => None,
            Self::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            Self::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Self::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Self::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            Self::CubicBezier(x1, y1, x2, y2) => Some((*x1, *y1, *x2, *y2)),
        }
    }

    /// Map normalized progress `t` in `[0, 1]` to eased progress.
    ///
    /// Named pass-through curves evaluate linearly; only the host knows their shape.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self.control_points() {
            None => t,
            Some(_) if t == 0.0 || t == 1.0 => t,
            Some((x1, y1, x2, y2)) => bezier_y_for_x(x1, y1, x2, y2, t),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            Self::Named(name) => f.write_str(name),
        }
    }
}

fn bezier_coord(p1: f64, p2: f64, s: f64) -> f64 {
    // Endpoints fixed at 0 and 1.
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

fn bezier_y_for_x(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let mut s = x;
    for _ in 0..8 {
        let err = bezier_coord(x1, x2, s) - x;
        if err.abs() < 1e-7 {
            return bezier_coord(y1, y2, s);
        }
        let d = bezier_slope(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    s = x;
    for _ in 0..64 {
        let v = bezier_coord(x1, x2, s);
        if (v - x).abs() < 1e-7 {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier_coord(y1, y2, s)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
