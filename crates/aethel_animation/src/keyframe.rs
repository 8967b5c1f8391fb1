//! Keyframe tracks
//!
//! A track maps an input position to a value through an ordered list of
//! stops. It is driven either by scroll progress (multi-stop scroll
//! mappings) or by elapsed time (see [`crate::timeline`]). Positions before
//! the first stop hold the first value, positions after the last stop hold
//! the last value.

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::interpolate::{Lerp, MotionValue};

/// A single stop in a track
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<T> {
    /// Input position of this stop
    pub at: f32,
    pub value: T,
    /// Easing used on the segment that ends at this stop
    pub easing: Easing,
}

impl<T> Keyframe<T> {
    pub fn new(at: f32, value: T) -> Self {
        Self {
            at,
            value,
            easing: Easing::Linear,
        }
    }

    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Ordered, non-empty list of keyframes
#[derive(Clone, Debug)]
pub struct KeyframeTrack<T: Lerp> {
    stops: Vec<Keyframe<T>>,
}

impl<T: Lerp> KeyframeTrack<T> {
    /// Build a track from stops sorted by position
    pub fn new(stops: Vec<Keyframe<T>>) -> Result<Self> {
        if stops.is_empty() {
            return Err(AnimationError::InvalidTrack("no stops".to_string()));
        }
        if stops.iter().any(|s| !s.at.is_finite()) {
            return Err(AnimationError::InvalidTrack(
                "stop positions must be finite".to_string(),
            ));
        }
        if stops.windows(2).any(|w| w[1].at < w[0].at) {
            return Err(AnimationError::InvalidTrack(
                "stop positions must be ascending".to_string(),
            ));
        }
        Ok(Self { stops })
    }

    /// Pair input positions with output values, all segments linear
    pub fn from_pairs(inputs: &[f32], outputs: &[T]) -> Result<Self> {
        if inputs.len() != outputs.len() {
            return Err(AnimationError::InvalidTrack(format!(
                "{} inputs for {} outputs",
                inputs.len(),
                outputs.len()
            )));
        }
        Self::new(
            inputs
                .iter()
                .zip(outputs)
                .map(|(at, value)| Keyframe::new(*at, *value))
                .collect(),
        )
    }

    /// Linear track from `from` at 0 to `to` at 1
    pub fn between(from: T, to: T) -> Self {
        Self {
            stops: vec![Keyframe::new(0.0, from), Keyframe::new(1.0, to)],
        }
    }

    /// Spread `values` evenly over `[0, 1]`
    pub fn evenly(values: &[T]) -> Result<Self> {
        let last = values.len().saturating_sub(1).max(1) as f32;
        Self::new(
            values
                .iter()
                .enumerate()
                .map(|(i, value)| Keyframe::new(i as f32 / last, *value))
                .collect(),
        )
    }

    pub fn stops(&self) -> &[Keyframe<T>] {
        &self.stops
    }

    /// Input span covered by the stops
    pub fn span(&self) -> (f32, f32) {
        (self.stops[0].at, self.stops[self.stops.len() - 1].at)
    }

    /// Value at input position `at`
    pub fn sample(&self, at: f32) -> T {
        let first = &self.stops[0];
        let last = &self.stops[self.stops.len() - 1];
        if at.is_nan() || at <= first.at {
            return first.value;
        }
        if at >= last.at {
            return last.value;
        }

        let next_index = self
            .stops
            .iter()
            .position(|kf| kf.at > at)
            .unwrap_or(self.stops.len() - 1);
        let prev = &self.stops[next_index - 1];
        let next = &self.stops[next_index];

        let width = next.at - prev.at;
        if width <= f32::EPSILON {
            return next.value;
        }
        let local = (at - prev.at) / width;
        prev.value.lerp(next.value, next.easing.apply(local))
    }
}

impl KeyframeTrack<MotionValue> {
    /// Err if stops mix value kinds
    pub fn check_uniform(&self) -> Result<()> {
        let first = &self.stops[0].value;
        self.stops
            .iter()
            .try_for_each(|kf| first.check_compatible(&kf.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn holds_outside_span() {
        let track = KeyframeTrack::from_pairs(&[0.2, 0.8], &[10.0f32, 20.0]).unwrap();
        assert_eq!(track.sample(0.0), 10.0);
        assert_eq!(track.sample(1.0), 20.0);
        assert_eq!(track.sample(f32::NAN), 10.0);
        assert!((track.sample(0.5) - 15.0).abs() < 1e-5);
    }

    #[test]
    fn multi_stop_segments() {
        let track = KeyframeTrack::evenly(&[0.0f32, 10.0, 0.0]).unwrap();
        assert_eq!(track.span(), (0.0, 1.0));
        assert_eq!(track.sample(0.5), 10.0);
        assert!((track.sample(0.25) - 5.0).abs() < 1e-5);
        assert!((track.sample(0.75) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn segment_easing_applies_to_its_end_stop() {
        let track = KeyframeTrack::new(vec![
            Keyframe::new(0.0, 0.0f32),
            Keyframe::new(1.0, 1.0).eased(Easing::EaseInQuad),
        ])
        .unwrap();
        assert!((track.sample(0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn rejects_bad_stops() {
        assert!(KeyframeTrack::<f32>::new(vec![]).is_err());
        assert!(KeyframeTrack::from_pairs(&[0.5, 0.1], &[1.0f32, 2.0]).is_err());
        assert!(KeyframeTrack::from_pairs(&[0.5], &[1.0f32, 2.0]).is_err());

        let mixed = KeyframeTrack::from_pairs(
            &[0.0, 1.0],
            &[MotionValue::Scalar(1.0), MotionValue::Color(Color::WHITE)],
        )
        .unwrap();
        assert!(mixed.check_uniform().is_err());
    }
}
