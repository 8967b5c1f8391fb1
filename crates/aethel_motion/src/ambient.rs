//! Ambient glow follower
//!
//! The background glow drifts toward the normalized input with plain
//! exponential smoothing instead of a spring. The smoothing factor is defined
//! per 60 Hz frame and rescaled for the actual frame delta, so the glow moves
//! at the same speed on a 144 Hz display as on a 60 Hz one.

use crate::input::{attach, InputKind, InputSource};
use aethel_core::{AethelRuntime, FrameCallbackId, FrameTime, ListenerId, Point};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;
use tracing::debug;

/// Shortest phase after which every blob orbit repeats
const DRIFT_PERIOD: f32 = 10.0 * TAU;

fn default_inputs() -> Vec<InputKind> {
    vec![InputKind::Pointer, InputKind::Orientation]
}

fn default_smoothing() -> f32 {
    0.05
}

fn default_reference_fps() -> f32 {
    60.0
}

fn default_drift_speed() -> f32 {
    0.3
}

/// Ambient follower tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmbientConfig {
    /// Input providers feeding the glow, all active at once
    #[serde(default = "default_inputs")]
    pub inputs: Vec<InputKind>,
    /// Fraction of the remaining distance covered per reference frame
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
    #[serde(default = "default_reference_fps")]
    pub reference_fps: f32,
    /// Phase advance of the drifting blobs, radians per second
    #[serde(default = "default_drift_speed")]
    pub drift_speed: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            inputs: default_inputs(),
            smoothing: default_smoothing(),
            reference_fps: default_reference_fps(),
            drift_speed: default_drift_speed(),
        }
    }
}

/// Smoothing factor for a frame of `dt` seconds
///
/// Applying it once equals applying `smoothing` once per reference frame
/// for the same span of time.
pub fn frame_factor(smoothing: f32, reference_fps: f32, dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 || !smoothing.is_finite() || !reference_fps.is_finite() {
        return 0.0;
    }
    let smoothing = smoothing.clamp(0.0, 1.0);
    1.0 - (1.0 - smoothing).powf(dt * reference_fps.max(1.0))
}

/// Glow layout for one frame, all coordinates normalized to the viewport
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AmbientFrame {
    /// Smoothed input position
    pub input: Point,
    /// Three aurora blob centres: drift + input bias, drift only, input
    pub blobs: [Point; 3],
}

struct AmbientState {
    target: Point,
    position: Point,
    phase: f32,
    smoothing: f32,
    reference_fps: f32,
    drift_speed: f32,
}

impl AmbientState {
    fn tick(&mut self, time: &FrameTime) {
        let k = frame_factor(self.smoothing, self.reference_fps, time.dt);
        self.position = Point::new(
            self.position.x + (self.target.x - self.position.x) * k,
            self.position.y + (self.target.y - self.position.y) * k,
        );
        self.phase = (self.phase + self.drift_speed * time.dt) % DRIFT_PERIOD;
    }

    fn snapshot(&self) -> AmbientFrame {
        let t = self.phase;
        let input = self.position;
        AmbientFrame {
            input,
            blobs: [
                Point::new(
                    0.5 + t.sin() * 0.2 + (input.x - 0.5) * 0.1,
                    0.5 + (t * 0.8).cos() * 0.2 + (input.y - 0.5) * 0.1,
                ),
                Point::new(0.3 + (t * 1.2).cos() * 0.2, 0.7 + (t * 0.5).sin() * 0.2),
                input,
            ],
        }
    }
}

/// Mounted ambient glow follower
pub struct AmbientFollower {
    state: Rc<RefCell<AmbientState>>,
    listeners: SmallVec<[ListenerId; 2]>,
    frame: FrameCallbackId,
}

impl AmbientFollower {
    /// Mount with the providers named in `config`
    pub fn mount(runtime: &mut AethelRuntime, config: &AmbientConfig) -> Self {
        let viewport = runtime.viewport();
        let sources = config
            .inputs
            .iter()
            .map(|kind| kind.source(viewport.clone()))
            .collect();
        Self::mount_with(runtime, sources, config)
    }

    /// Mount with explicit providers
    pub fn mount_with(
        runtime: &mut AethelRuntime,
        sources: Vec<Box<dyn InputSource>>,
        config: &AmbientConfig,
    ) -> Self {
        let center = Point::new(0.5, 0.5);
        let state = Rc::new(RefCell::new(AmbientState {
            target: center,
            position: center,
            phase: 0.0,
            smoothing: config.smoothing,
            reference_fps: config.reference_fps,
            drift_speed: config.drift_speed,
        }));

        let listeners = sources
            .into_iter()
            .map(|source| {
                let sink = state.clone();
                attach(source, runtime.events_mut(), move |sample| {
                    sink.borrow_mut().target = sample;
                })
            })
            .collect();

        let ticking = state.clone();
        let frame = runtime
            .frames_mut()
            .request(move |time| ticking.borrow_mut().tick(time));

        debug!(inputs = ?config.inputs, "ambient follower mounted");
        Self {
            state,
            listeners,
            frame,
        }
    }

    pub fn target(&self) -> Point {
        self.state.borrow().target
    }

    pub fn position(&self) -> Point {
        self.state.borrow().position
    }

    pub fn snapshot(&self) -> AmbientFrame {
        self.state.borrow().snapshot()
    }

    pub fn unmount(self, runtime: &mut AethelRuntime) {
        for id in self.listeners {
            runtime.events_mut().remove(id);
        }
        runtime.frames_mut().cancel(self.frame);
        debug!("ambient follower unmounted");
    }
}
