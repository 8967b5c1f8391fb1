//! Logical clock for headless runs
//!
//! Scenario steps never sleep. A `tick` or `wait` step turns into a schedule
//! of per-frame millisecond deltas, and [`HeadlessClock`] accumulates them so
//! reports can say exactly how much simulated time a run consumed.

use crate::config::SiteConfig;
use anyhow::{bail, Result};

/// Frame pacing for a headless run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessRunConfig {
    /// Logical milliseconds per full frame
    pub tick_ms: u64,
    /// Take a snapshot every this many frames of a step; the last frame of a
    /// step is always sampled
    pub probe_every_frames: u32,
}

impl HeadlessRunConfig {
    /// Pacing from the `[headless]` table
    pub fn from_site(config: &SiteConfig) -> Self {
        Self {
            tick_ms: config.headless.tick_ms,
            probe_every_frames: config.headless.probe_every_frames,
        }
    }
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self::from_site(&SiteConfig::default())
    }
}

/// One scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledFrame {
    pub dt_ms: u64,
    /// A snapshot should be taken after this frame
    pub probe: bool,
}

/// Frames of one step, produced on demand
#[derive(Debug, Clone)]
pub struct FrameSchedule {
    tick_ms: u64,
    remaining_ms: u64,
    probe_every: u32,
    index: u32,
}

impl FrameSchedule {
    pub fn is_empty(&self) -> bool {
        self.remaining_ms == 0
    }
}

impl Iterator for FrameSchedule {
    type Item = ScheduledFrame;

    fn next(&mut self) -> Option<ScheduledFrame> {
        if self.remaining_ms == 0 {
            return None;
        }
        let dt_ms = self.remaining_ms.min(self.tick_ms);
        self.remaining_ms -= dt_ms;
        self.index = self.index.wrapping_add(1);
        Some(ScheduledFrame {
            dt_ms,
            probe: self.remaining_ms == 0 || self.index % self.probe_every == 0,
        })
    }
}

/// Accumulated simulated time
#[derive(Debug, Clone, Copy)]
pub struct HeadlessClock {
    tick_ms: u64,
    probe_every: u32,
    frames: u64,
    elapsed_ms: u64,
}

impl HeadlessClock {
    pub fn new(cfg: HeadlessRunConfig) -> Result<Self> {
        if cfg.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }
        Ok(Self {
            tick_ms: cfg.tick_ms,
            probe_every: cfg.probe_every_frames.max(1),
            frames: 0,
            elapsed_ms: 0,
        })
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// `frames` full ticks
    pub fn ticks(&self, frames: u32) -> FrameSchedule {
        self.schedule(self.tick_ms.saturating_mul(frames as u64))
    }

    /// Full ticks covering `ms`, the last one shortened to land exactly
    pub fn wait(&self, ms: u64) -> FrameSchedule {
        self.schedule(ms)
    }

    fn schedule(&self, ms: u64) -> FrameSchedule {
        FrameSchedule {
            tick_ms: self.tick_ms,
            remaining_ms: ms,
            probe_every: self.probe_every,
            index: 0,
        }
    }

    /// Account for one executed frame; returns its delta in seconds
    pub fn advance(&mut self, frame: &ScheduledFrame) -> f32 {
        self.frames = self.frames.saturating_add(1);
        self.elapsed_ms = self.elapsed_ms.saturating_add(frame.dt_ms);
        frame.dt_ms as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(tick_ms: u64, probe_every_frames: u32) -> HeadlessClock {
        HeadlessClock::new(HeadlessRunConfig {
            tick_ms,
            probe_every_frames,
        })
        .unwrap()
    }

    #[test]
    fn wait_lands_on_exact_milliseconds() {
        let clock = clock(16, 4);
        let deltas: Vec<u64> = clock.wait(40).map(|f| f.dt_ms).collect();
        assert_eq!(deltas, [16, 16, 8]);
        assert_eq!(clock.wait(32).count(), 2);
        assert!(clock.wait(0).is_empty());
        assert_eq!(clock.wait(0).next(), None);
    }

    #[test]
    fn huge_steps_are_produced_lazily() {
        let clock = clock(16, 4);
        let mut wait = clock.wait(u64::MAX);
        assert_eq!(wait.nth(2).map(|f| f.dt_ms), Some(16));
        assert!(!wait.is_empty());
        assert_eq!(clock.ticks(u32::MAX).take(5).count(), 5);
    }

    #[test]
    fn probes_every_n_frames_and_on_the_last() {
        let probes: Vec<bool> = clock(16, 4).ticks(6).map(|f| f.probe).collect();
        assert_eq!(probes, [false, false, false, true, false, true]);

        let every: Vec<bool> = clock(16, 0).ticks(2).map(|f| f.probe).collect();
        assert_eq!(every, [true, true]);
    }

    #[test]
    fn advance_accumulates() {
        let mut clock = clock(16, 4);
        for frame in clock.wait(40) {
            clock.advance(&frame);
        }
        assert_eq!(clock.elapsed_frames(), 3);
        assert_eq!(clock.elapsed_ms(), 40);
    }

    #[test]
    fn rejects_zero_tick() {
        let cfg = HeadlessRunConfig {
            tick_ms: 0,
            ..Default::default()
        };
        assert!(HeadlessClock::new(cfg).is_err());
    }

    #[test]
    fn pacing_follows_site_config() {
        let mut config = SiteConfig::default();
        config.headless.tick_ms = 8;
        assert_eq!(HeadlessRunConfig::from_site(&config).tick_ms, 8);
        assert_eq!(HeadlessRunConfig::default().tick_ms, 16);
    }
}
