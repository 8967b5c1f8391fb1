//! Time-driven keyframe playback
//!
//! Plays a [`KeyframeTrack`] over a fixed duration, optionally repeating.
//! Used for ambient loops such as the cursor's idle ring pulse or the hero's
//! scroll hint bob.

use crate::keyframe::KeyframeTrack;
use crate::interpolate::Lerp;

/// How many times a timeline plays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Times(u32),
    Forever,
}

/// A keyframe track played against the clock
///
/// The track's stops are read as fractions of `duration`.
#[derive(Clone, Debug)]
pub struct Timeline<T: Lerp> {
    track: KeyframeTrack<T>,
    duration: f32,
    repeat: Repeat,
    elapsed: f32,
    completed_loops: u32,
    playing: bool,
}

impl<T: Lerp> Timeline<T> {
    /// `duration` in seconds; clamped to a small positive minimum
    pub fn new(track: KeyframeTrack<T>, duration: f32) -> Self {
        let duration = if duration.is_finite() {
            duration.max(1e-3)
        } else {
            1.0
        };
        Self {
            track,
            duration,
            repeat: Repeat::Once,
            elapsed: 0.0,
            completed_loops: 0,
            playing: true,
        }
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Restart from the first frame
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.completed_loops = 0;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if !self.playing || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.elapsed += dt;

        while self.elapsed >= self.duration {
            let total = match self.repeat {
                Repeat::Once => Some(1),
                Repeat::Times(n) => Some(n.max(1)),
                Repeat::Forever => None,
            };
            self.completed_loops = self.completed_loops.saturating_add(1);
            if total.is_some_and(|t| self.completed_loops >= t) {
                self.elapsed = self.duration;
                self.playing = false;
                return;
            }
            self.elapsed -= self.duration;
        }
    }

    /// Fraction of the current loop, 0 to 1
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn value(&self) -> T {
        self.track.sample(self.progress())
    }
}
