//! Linear interpolation for animatable values

use crate::color::Color;
use crate::error::{AnimationError, Result};
use aethel_core::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Values that can be blended linearly
///
/// `lerp(a, b, 0.0) == a` and `lerp(a, b, 1.0) == b` hold exactly.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        lerp_f32(self, to, t)
    }
}

impl Lerp for Vec2 {
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec2::new(lerp_f32(self.x, to.x, t), lerp_f32(self.y, to.y, t))
    }
}

impl Lerp for Point {
    fn lerp(self, to: Self, t: f32) -> Self {
        Point::new(lerp_f32(self.x, to.x, t), lerp_f32(self.y, to.y, t))
    }
}

/// Channel-wise RGBA blend (no perceptual colour space)
impl Lerp for Color {
    fn lerp(self, to: Self, t: f32) -> Self {
        Color::new(
            lerp_f32(self.r, to.r, t),
            lerp_f32(self.g, to.g, t),
            lerp_f32(self.b, to.b, t),
            lerp_f32(self.a, to.a, t),
        )
    }
}

/// Any value a scroll or keyframe mapping can produce
///
/// In config files a number is a scalar, a `"#rrggbb"` string is a colour and
/// an `{ x, y }` table is an offset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MotionValue {
    Scalar(f32),
    Color(Color),
    Offset(Vec2),
}

impl MotionValue {
    pub fn kind(&self) -> &'static str {
        match self {
            MotionValue::Scalar(_) => "scalar",
            MotionValue::Color(_) => "color",
            MotionValue::Offset(_) => "offset",
        }
    }

    /// Err unless both values are the same kind
    pub fn check_compatible(&self, other: &MotionValue) -> Result<()> {
        if std::mem::discriminant(self) == std::mem::discriminant(other) {
            Ok(())
        } else {
            Err(AnimationError::MismatchedValues {
                from: self.kind(),
                to: other.kind(),
            })
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            MotionValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            MotionValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_offset(&self) -> Option<Vec2> {
        match self {
            MotionValue::Offset(v) => Some(*v),
            _ => None,
        }
    }
}

impl Lerp for MotionValue {
    /// Mismatched kinds hold the start value; constructors reject them up front
    fn lerp(self, to: Self, t: f32) -> Self {
        match (self, to) {
            (MotionValue::Scalar(a), MotionValue::Scalar(b)) => MotionValue::Scalar(a.lerp(b, t)),
            (MotionValue::Color(a), MotionValue::Color(b)) => MotionValue::Color(a.lerp(b, t)),
            (MotionValue::Offset(a), MotionValue::Offset(b)) => MotionValue::Offset(a.lerp(b, t)),
            (from, _) => from,
        }
    }
}

impl From<f32> for MotionValue {
    fn from(value: f32) -> Self {
        MotionValue::Scalar(value)
    }
}

impl From<Color> for MotionValue {
    fn from(value: Color) -> Self {
        MotionValue::Color(value)
    }
}

impl From<Vec2> for MotionValue {
    fn from(value: Vec2) -> Self {
        MotionValue::Offset(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        let (a, b) = (0.3f32, 1.0f32);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);

        let from = Color::from_hex(0x333333);
        assert_eq!(from.lerp(Color::WHITE, 1.0), Color::WHITE);
    }

    #[test]
    fn colors_blend_per_channel() {
        let mid = Color::BLACK.lerp(Color::new(1.0, 0.5, 0.0, 0.0), 0.5);
        assert_eq!(mid, Color::new(0.5, 0.25, 0.0, 0.5));
    }

    #[test]
    fn motion_values_from_config() {
        let values: Vec<MotionValue> =
            serde_json::from_str(r##"[0.3, "#ffffff", { "x": 1.0, "y": -2.0 }]"##).unwrap();
        assert_eq!(values[0], MotionValue::Scalar(0.3));
        assert_eq!(values[1], MotionValue::Color(Color::WHITE));
        assert_eq!(values[2], MotionValue::Offset(Vec2::new(1.0, -2.0)));

        assert!(values[0].check_compatible(&values[1]).is_err());
        assert!(values[1].check_compatible(&MotionValue::Color(Color::BLACK)).is_ok());
    }
}
