//! Scroll-progress mapping
//!
//! One progress scalar fans out into many independent visual outputs. Each
//! output owns a [`ScrollRange`] (the slice of progress over which it moves)
//! and a pair of endpoint values. The mapping is a pure function of progress:
//! scrolling back up replays every output in reverse with no history.
//!
//! ```rust
//! use aethel_animation::scroll::{InterpolationSpec, ScrollMapper, ScrollRange};
//!
//! let mut mapper = ScrollMapper::new();
//! let words = mapper.bind_sequence(10, 1, 0.3f32, 1.0).unwrap();
//!
//! mapper.update(0.35);
//! let opacity = mapper.value(words[3]).and_then(|v| v.as_scalar()).unwrap();
//! assert!((opacity - 0.65).abs() < 1e-4);
//! ```

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::interpolate::{Lerp, MotionValue};
use crate::keyframe::KeyframeTrack;
use crate::spring::{Spring, SpringConfig};
use slotmap::{new_key_type, SecondaryMap, SlotMap};

/// Sub-window of the progress domain, `start < end`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRange {
    start: f32,
    end: f32,
}

impl ScrollRange {
    /// The whole normalized domain
    pub const FULL: ScrollRange = ScrollRange {
        start: 0.0,
        end: 1.0,
    };

    pub fn new(start: f32, end: f32) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(AnimationError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Slot `index` of `count` contiguous slots: `[i/n, (i+1)/n]`
    pub fn sequence(index: usize, count: usize) -> Result<Self> {
        Self::windowed(index, count, 1)
    }

    /// Slot `index` of `count`, stretched over `window` slots for overlap:
    /// `[i/n, min((i+k)/n, 1)]`
    pub fn windowed(index: usize, count: usize, window: usize) -> Result<Self> {
        if count == 0 || index >= count || window == 0 {
            return Err(AnimationError::InvalidSequence { index, count });
        }
        let start = (index as f64 / count as f64) as f32;
        let end = (((index + window) as f64 / count as f64).min(1.0)) as f32;
        Self::new(start, end)
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    pub fn contains(&self, progress: f32) -> bool {
        progress >= self.start && progress <= self.end
    }

    /// Position of `progress` inside the range, clamped to `[0, 1]`
    pub fn fraction(&self, progress: f32) -> f32 {
        if progress <= self.start {
            return 0.0;
        }
        if progress >= self.end {
            return 1.0;
        }
        ((progress - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }
}

impl Default for ScrollRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// One output: a range, two endpoints and an optional easing curve
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolationSpec<T> {
    pub range: ScrollRange,
    pub from: T,
    pub to: T,
    pub easing: Easing,
}

impl<T: Lerp> InterpolationSpec<T> {
    pub fn new(range: ScrollRange, from: T, to: T) -> Self {
        Self {
            range,
            from,
            to,
            easing: Easing::Linear,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Output for `progress`; holds `from` before the range and `to` after it
    pub fn sample(&self, progress: f32) -> T {
        let t = self.range.fraction(progress);
        if t <= 0.0 {
            return self.from;
        }
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, self.easing.apply(t))
    }
}

new_key_type! {
    pub struct BindingId;
}

#[derive(Clone, Debug)]
enum Binding {
    Span(InterpolationSpec<MotionValue>),
    Track(KeyframeTrack<MotionValue>),
}

impl Binding {
    fn sample(&self, progress: f32) -> MotionValue {
        match self {
            Binding::Span(spec) => spec.sample(progress),
            Binding::Track(track) => track.sample(progress),
        }
    }
}

/// Evaluates every bound output for one progress value
#[derive(Clone, Debug)]
pub struct ScrollMapper {
    bindings: SlotMap<BindingId, Binding>,
    values: SecondaryMap<BindingId, MotionValue>,
    progress: f32,
}

impl ScrollMapper {
    pub fn new() -> Self {
        Self {
            bindings: SlotMap::with_key(),
            values: SecondaryMap::new(),
            progress: 0.0,
        }
    }

    /// Bind a two-point mapping; both endpoints must be the same kind
    pub fn bind<T: Into<MotionValue>>(&mut self, spec: InterpolationSpec<T>) -> Result<BindingId> {
        let spec = InterpolationSpec {
            range: spec.range,
            from: spec.from.into(),
            to: spec.to.into(),
            easing: spec.easing,
        };
        spec.from.check_compatible(&spec.to)?;
        Ok(self.insert(Binding::Span(spec)))
    }

    /// Bind a multi-stop mapping; every stop must be the same kind
    pub fn bind_track(&mut self, track: KeyframeTrack<MotionValue>) -> Result<BindingId> {
        track.check_uniform()?;
        Ok(self.insert(Binding::Track(track)))
    }

    /// Bind `count` outputs over consecutive windowed slots
    ///
    /// Slot `i` covers `[i/count, min((i+window)/count, 1)]`; ids are returned
    /// in slot order.
    pub fn bind_sequence<T: Into<MotionValue> + Copy>(
        &mut self,
        count: usize,
        window: usize,
        from: T,
        to: T,
    ) -> Result<Vec<BindingId>> {
        (0..count)
            .map(|i| {
                let range = ScrollRange::windowed(i, count, window)?;
                self.bind(InterpolationSpec::new(range, from.into(), to.into()))
            })
            .collect()
    }

    fn insert(&mut self, binding: Binding) -> BindingId {
        let value = binding.sample(self.progress);
        let id = self.bindings.insert(binding);
        self.values.insert(id, value);
        id
    }

    pub fn unbind(&mut self, id: BindingId) -> bool {
        self.values.remove(id);
        self.bindings.remove(id).is_some()
    }

    /// Recompute every output for `progress`
    ///
    /// Non-finite progress keeps the previous progress.
    pub fn update(&mut self, progress: f32) {
        if progress.is_finite() {
            self.progress = progress;
        }
        for (id, binding) in &self.bindings {
            self.values.insert(id, binding.sample(self.progress));
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Output computed by the last update
    pub fn value(&self, id: BindingId) -> Option<MotionValue> {
        self.values.get(id).copied()
    }

    /// Output for an arbitrary progress without touching stored values
    pub fn sample(&self, id: BindingId, progress: f32) -> Option<MotionValue> {
        self.bindings.get(id).map(|b| b.sample(progress))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BindingId, MotionValue)> + '_ {
        self.values.iter().map(|(id, v)| (id, *v))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for ScrollMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Spring-filtered progress for scroll-linked inertia
#[derive(Clone, Debug)]
pub struct SmoothedProgress {
    spring: Spring,
}

impl SmoothedProgress {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            spring: Spring::new(config, initial),
        }
    }

    /// Feed the raw progress; non-finite samples are ignored
    pub fn set_raw(&mut self, progress: f32) {
        self.spring.set_target(progress);
    }

    pub fn step(&mut self, dt: f32) {
        self.spring.step(dt);
    }

    pub fn value(&self) -> f32 {
        self.spring.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn range_validation() {
        assert!(ScrollRange::new(0.5, 0.5).is_err());
        assert!(ScrollRange::new(0.6, 0.5).is_err());
        assert!(ScrollRange::new(f32::NAN, 1.0).is_err());
        assert!(ScrollRange::new(0.0, 500.0).is_ok());
        assert!(ScrollRange::sequence(10, 10).is_err());
        assert!(ScrollRange::sequence(0, 0).is_err());
    }

    #[test]
    fn endpoints_and_clamping() {
        let spec = InterpolationSpec::new(ScrollRange::new(0.2, 0.6).unwrap(), 0.3f32, 1.0);
        assert_eq!(spec.sample(0.2), 0.3);
        assert_eq!(spec.sample(0.6), 1.0);
        assert_eq!(spec.sample(0.0), 0.3);
        assert_eq!(spec.sample(-4.0), 0.3);
        assert_eq!(spec.sample(0.9), 1.0);
        assert_eq!(spec.sample(12.0), 1.0);
    }

    #[test]
    fn word_slot_midpoint() {
        let range = ScrollRange::sequence(3, 10).unwrap();
        assert!((range.start() - 0.3).abs() < 1e-6);
        assert!((range.end() - 0.4).abs() < 1e-6);

        let opacity = InterpolationSpec::new(range, 0.3f32, 1.0);
        assert!((opacity.sample(0.35) - 0.65).abs() < 1e-5);
    }

    #[test]
    fn sequence_covers_unit_interval() {
        for count in [1usize, 3, 7, 10, 64] {
            let ranges: Vec<ScrollRange> = (0..count)
                .map(|i| ScrollRange::sequence(i, count).unwrap())
                .collect();
            assert_eq!(ranges[0].start(), 0.0);
            assert_eq!(ranges[count - 1].end(), 1.0);
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].end(), pair[1].start());
            }
            for step in 0..=1000 {
                let p = step as f32 / 1000.0;
                assert!(ranges.iter().any(|r| r.contains(p)), "gap at {p} for n={count}");
            }
        }
    }

    #[test]
    fn windowed_ranges_overlap_and_clip() {
        let range = ScrollRange::windowed(8, 10, 3).unwrap();
        assert!((range.start() - 0.8).abs() < 1e-6);
        assert_eq!(range.end(), 1.0);
        let next = ScrollRange::windowed(1, 10, 3).unwrap();
        assert!(next.contains(0.35));
        assert!(ScrollRange::windowed(0, 10, 3).unwrap().contains(0.25));
    }

    #[test]
    fn eased_spec() {
        let spec = InterpolationSpec::new(ScrollRange::FULL, 0.0f32, 100.0)
            .with_easing(Easing::EaseInQuad);
        assert!((spec.sample(0.5) - 25.0).abs() < 1e-4);
    }

    #[test]
    fn colors_interpolate_channelwise() {
        let from: Color = "#333333".parse().unwrap();
        let spec = InterpolationSpec::new(ScrollRange::FULL, from, Color::WHITE);
        let mid = spec.sample(0.5);
        let expected = (0.2 + 1.0) / 2.0;
        assert!((mid.r - expected).abs() < 1e-6);
        assert_eq!(mid.r, mid.g);
        assert_eq!(mid.a, 1.0);
    }

    #[test]
    fn mapper_is_direction_independent() {
        let mut mapper = ScrollMapper::new();
        let ids = mapper.bind_sequence(5, 1, 0.3f32, 1.0).unwrap();

        mapper.update(0.5);
        let forward: Vec<_> = ids.iter().map(|id| mapper.value(*id)).collect();

        mapper.update(1.0);
        mapper.update(0.0);
        mapper.update(0.5);
        let reverse: Vec<_> = ids.iter().map(|id| mapper.value(*id)).collect();

        assert_eq!(forward, reverse);
        assert_eq!(mapper.value(ids[0]), Some(MotionValue::Scalar(1.0)));
        assert_eq!(mapper.value(ids[4]), Some(MotionValue::Scalar(0.3)));
    }

    #[test]
    fn mapper_ignores_non_finite_progress() {
        let mut mapper = ScrollMapper::new();
        let id = mapper
            .bind(InterpolationSpec::new(ScrollRange::FULL, 0.0f32, 10.0))
            .unwrap();
        mapper.update(0.4);
        mapper.update(f32::NAN);
        assert_eq!(mapper.progress(), 0.4);
        assert_eq!(mapper.value(id), mapper.sample(id, 0.4));
    }

    #[test]
    fn mapper_rejects_mixed_kinds() {
        let mut mapper = ScrollMapper::new();
        let spec = InterpolationSpec::new(
            ScrollRange::FULL,
            MotionValue::Scalar(0.0),
            MotionValue::Color(Color::WHITE),
        );
        assert!(matches!(
            mapper.bind(spec),
            Err(AnimationError::MismatchedValues { .. })
        ));
        assert!(mapper.is_empty());
    }

    #[test]
    fn mapper_tracks_and_unbind() {
        let mut mapper = ScrollMapper::new();
        let track = KeyframeTrack::from_pairs(
            &[0.0, 0.5, 1.0],
            &[
                MotionValue::Scalar(0.0),
                MotionValue::Scalar(-200.0),
                MotionValue::Scalar(0.0),
            ],
        )
        .unwrap();
        let id = mapper.bind_track(track).unwrap();
        mapper.update(0.5);
        assert_eq!(mapper.value(id), Some(MotionValue::Scalar(-200.0)));

        assert!(mapper.unbind(id));
        assert_eq!(mapper.value(id), None);
        assert_eq!(mapper.len(), 0);
    }

    #[test]
    fn smoothed_progress_trails_raw() {
        let mut smoothed = SmoothedProgress::new(SpringConfig::stiff(), 0.0);
        smoothed.set_raw(1.0);
        smoothed.step(1.0 / 60.0);
        assert!(smoothed.value() > 0.0 && smoothed.value() < 1.0);
        for _ in 0..300 {
            smoothed.step(1.0 / 60.0);
        }
        assert_eq!(smoothed.value(), 1.0);
    }
}
