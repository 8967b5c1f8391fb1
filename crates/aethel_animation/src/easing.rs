//! Easing curves
//!
//! Pure functions `[0, 1] -> [0, 1]` applied to an interpolation fraction
//! before it reaches `lerp`. Inputs outside the unit interval are clamped and
//! NaN is treated as the start of the curve.

use crate::error::AnimationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Easing function type
///
/// The named curves are the CSS keywords; `EaseInQuad` is a plain `t²`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EasingSpec", into = "EasingSpec")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    CubicBezier(f32, f32, f32, f32),
}

const NAMES: [(&str, Easing); 5] = [
    ("linear", Easing::Linear),
    ("ease-in", Easing::EaseIn),
    ("ease-out", Easing::EaseOut),
    ("ease-in-out", Easing::EaseInOut),
    ("ease-in-quad", Easing::EaseInQuad),
];

impl Easing {
    /// CSS `ease`
    pub const CSS_EASE: Easing = Easing::CubicBezier(0.25, 0.1, 0.25, 1.0);

    /// Control points of the curve, `None` for the ones that are not beziers
    fn control_points(&self) -> Option<[f32; 4]> {
        match *self {
            Easing::Linear | Easing::EaseInQuad => None,
            Easing::EaseIn => Some([0.42, 0.0, 1.0, 1.0]),
            Easing::EaseOut => Some([0.0, 0.0, 0.58, 1.0]),
            Easing::EaseInOut => Some([0.42, 0.0, 0.58, 1.0]),
            Easing::CubicBezier(x1, y1, x2, y2) => Some([x1, y1, x2, y2]),
        }
    }

    /// Apply the easing function to a progress value
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match (self, self.control_points()) {
            (_, Some(points)) => Bezier::new(points).solve(t),
            (Easing::EaseInQuad, None) => t * t,
            _ => t,
        }
    }

    fn name(&self) -> Option<&'static str> {
        NAMES
            .iter()
            .find(|(_, easing)| easing == self)
            .map(|(name, _)| *name)
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "ease" {
            return Ok(Easing::CSS_EASE);
        }
        NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, easing)| *easing)
            .ok_or_else(|| AnimationError::InvalidEasing(s.to_string()))
    }
}

/// Config form: a curve name or four bezier control values
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EasingSpec {
    Named(String),
    Bezier([f32; 4]),
}

impl TryFrom<EasingSpec> for Easing {
    type Error = AnimationError;

    fn try_from(spec: EasingSpec) -> Result<Self, Self::Error> {
        let [x1, y1, x2, y2] = match spec {
            EasingSpec::Named(name) => return name.parse(),
            EasingSpec::Bezier(points) => points,
        };
        let in_domain = |x: f32| (0.0..=1.0).contains(&x);
        if y1.is_finite() && y2.is_finite() && in_domain(x1) && in_domain(x2) {
            Ok(Easing::CubicBezier(x1, y1, x2, y2))
        } else {
            Err(AnimationError::InvalidEasing(format!(
                "cubic-bezier({x1}, {y1}, {x2}, {y2})"
            )))
        }
    }
}

impl From<Easing> for EasingSpec {
    fn from(easing: Easing) -> Self {
        match (easing.name(), easing) {
            (Some(name), _) => EasingSpec::Named(name.to_string()),
            (None, Easing::CubicBezier(x1, y1, x2, y2)) => EasingSpec::Bezier([x1, y1, x2, y2]),
            (None, _) => EasingSpec::Named("linear".to_string()),
        }
    }
}

/// One axis of a unit cubic bezier with end points 0 and 1, as `((a t + b) t + c) t`
#[derive(Clone, Copy)]
struct Axis {
    a: f64,
    b: f64,
    c: f64,
}

impl Axis {
    fn new(p1: f32, p2: f32) -> Self {
        let (p1, p2) = (p1 as f64, p2 as f64);
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        Self { a: 1.0 - c - b, b, c }
    }

    fn at(&self, u: f64) -> f64 {
        ((self.a * u + self.b) * u + self.c) * u
    }

    fn derivative(&self, u: f64) -> f64 {
        (3.0 * self.a * u + 2.0 * self.b) * u + self.c
    }
}

/// CSS `cubic-bezier()` timing curve
struct Bezier {
    x: Axis,
    y: Axis,
}

impl Bezier {
    const EPSILON: f64 = 1e-7;

    fn new([x1, y1, x2, y2]: [f32; 4]) -> Self {
        Self {
            x: Axis::new(x1, x2),
            y: Axis::new(y1, y2),
        }
    }

    /// y for the curve point whose x is `t`
    fn solve(&self, t: f32) -> f32 {
        if t <= 0.0 || t >= 1.0 {
            return t;
        }
        let target = t as f64;
        self.y.at(self.parameter_for(target)) as f32
    }

    /// Newton's method first; bisection when the slope flattens out
    fn parameter_for(&self, target: f64) -> f64 {
        let mut u = target;
        for _ in 0..8 {
            let error = self.x.at(u) - target;
            if error.abs() < Self::EPSILON {
                return u;
            }
            let slope = self.x.derivative(u);
            if slope.abs() < Self::EPSILON {
                break;
            }
            u -= error / slope;
        }

        let (mut low, mut high) = (0.0_f64, 1.0_f64);
        u = target;
        for _ in 0..32 {
            let x = self.x.at(u);
            if (x - target).abs() < Self::EPSILON {
                break;
            }
            if x < target {
                low = u;
            } else {
                high = u;
            }
            u = 0.5 * (low + high);
        }
        u
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 7] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInQuad,
        Easing::CSS_EASE,
        Easing::CubicBezier(0.76, 0.0, 0.24, 1.0),
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.apply(-3.0), easing.apply(0.0));
            assert_eq!(easing.apply(7.0), easing.apply(1.0));
            assert_eq!(easing.apply(f32::NAN), easing.apply(0.0));
        }
    }

    #[test]
    fn symmetric_bezier_midpoint() {
        let easing = Easing::CubicBezier(0.76, 0.0, 0.24, 1.0);
        assert!((easing.apply(0.5) - 0.5).abs() < 1e-4);
        assert!(easing.apply(0.2) < 0.2);
    }

    #[test]
    fn css_keywords_bend_the_right_way() {
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-4);
        assert_eq!(Easing::EaseInQuad.apply(0.5), 0.25);
        // CSS `ease` is already most of the way there at the midpoint
        assert!((Easing::CSS_EASE.apply(0.5) - 0.8024).abs() < 1e-3);
    }

    #[test]
    fn names_round_trip() {
        for easing in ALL {
            let spec = EasingSpec::from(easing);
            assert_eq!(Easing::try_from(spec).unwrap(), easing);
        }
        let css = serde_json::to_string(&Easing::CSS_EASE).unwrap();
        assert_eq!(css, "[0.25,0.1,0.25,1.0]");
    }

    #[test]
    fn parse_names_and_arrays() {
        assert_eq!("ease-out".parse::<Easing>().unwrap(), Easing::EaseOut);
        assert!("bouncy".parse::<Easing>().is_err());

        let named: Easing = serde_json::from_str("\"ease-in-out\"").unwrap();
        assert_eq!(named, Easing::EaseInOut);
        let bezier: Easing = serde_json::from_str("[0.76, 0, 0.24, 1]").unwrap();
        assert_eq!(bezier, Easing::CubicBezier(0.76, 0.0, 0.24, 1.0));
        assert!(serde_json::from_str::<Easing>("[2.0, 0, 0.24, 1]").is_err());
    }
}
