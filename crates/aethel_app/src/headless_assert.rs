//! Assertion helpers for headless motion runs.

use crate::site::SiteSnapshot;
use aethel_animation::MotionValue;

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

/// Distance between two values of the same kind
///
/// Scalars compare by absolute difference, colours by the largest channel
/// difference, offsets by Euclidean distance.
pub fn distance(a: MotionValue, b: MotionValue) -> Option<f32> {
    match (a, b) {
        (MotionValue::Scalar(a), MotionValue::Scalar(b)) => Some((a - b).abs()),
        (MotionValue::Color(a), MotionValue::Color(b)) => Some(
            [a.r - b.r, a.g - b.g, a.b - b.b, a.a - b.a]
                .into_iter()
                .map(f32::abs)
                .fold(0.0, f32::max),
        ),
        (MotionValue::Offset(a), MotionValue::Offset(b)) => {
            Some(((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt())
        }
        _ => None,
    }
}

pub fn evaluate_assert_near(
    output: &str,
    expected: MotionValue,
    tolerance: f32,
    snapshot: &SiteSnapshot,
) -> AssertionResult {
    let Some(actual) = snapshot.output(output) else {
        return AssertionResult::Failed {
            code: "missing_output".to_string(),
            message: format!("{output}: output not found"),
        };
    };
    let Some(delta) = distance(actual, expected) else {
        return AssertionResult::Failed {
            code: "kind_mismatch".to_string(),
            message: format!(
                "{output}: expected a {} value, got {}",
                expected.kind(),
                actual.kind()
            ),
        };
    };
    if delta <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "value_mismatch".to_string(),
            message: format!(
                "{output}: expected {expected:?} within {tolerance}, got {actual:?}"
            ),
        }
    }
}

pub fn evaluate_assert_category(expected: &str, snapshot: &SiteSnapshot) -> AssertionResult {
    if snapshot.category == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "category_mismatch".to_string(),
            message: format!(
                "expected hover category '{expected}', got '{}'",
                snapshot.category
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aethel_animation::Color;
    use aethel_core::Vec2;

    #[test]
    fn distance_per_kind() {
        assert_eq!(distance(1.0_f32.into(), 1.5_f32.into()), Some(0.5));
        assert_eq!(
            distance(Color::BLACK.into(), Color::rgb(0.25, 0.5, 0.0).into()),
            Some(0.5)
        );
        assert_eq!(
            distance(Vec2::new(0.0, 0.0).into(), Vec2::new(3.0, 4.0).into()),
            Some(5.0)
        );
        assert_eq!(distance(1.0_f32.into(), Color::WHITE.into()), None);
    }
}
