//! Spring filter
//!
//! A damped harmonic oscillator that smooths a target value over time:
//!
//! ```text
//! a = (stiffness * (target - value) - damping * velocity) / mass
//! ```
//!
//! Targets may change at any rate; the spring keeps its value and velocity
//! and re-targets from there, so motion never snaps. Integration is RK4 over
//! sub-steps sized from the configuration, which keeps stiff, heavily damped
//! presets stable at display frame rates.

use crate::error::{AnimationError, Result};
use aethel_core::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Largest step a spring accepts, in seconds
pub const MAX_STEP_DT: f32 = 1.0 / 30.0;

/// Upper bound on RK4 sub-steps per call
const MAX_SUBSTEPS: u32 = 256;

/// Sub-step length relative to the fastest mode of the oscillator
const STABLE_STEP: f64 = 1.0;

fn default_mass() -> f32 {
    1.0
}

fn default_rest_delta() -> f32 {
    0.01
}

fn default_rest_speed() -> f32 {
    0.01
}

/// Physical parameters of a spring
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
    /// Distance to target below which the spring may come to rest
    #[serde(default = "default_rest_delta")]
    pub rest_delta: f32,
    /// Speed below which the spring may come to rest
    #[serde(default = "default_rest_speed")]
    pub rest_speed: f32,
}

impl SpringConfig {
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            rest_delta: 0.01,
            rest_speed: 0.01,
        }
    }

    /// Lean toward the pointer: light and heavily damped
    pub const fn magnetic() -> Self {
        Self::new(150.0, 15.0, 0.1)
    }

    /// Cursor position: a short organic lag behind the pointer
    pub const fn cursor() -> Self {
        Self::new(400.0, 35.0, 0.5)
    }

    /// Cursor size changes on hover
    pub const fn cursor_size() -> Self {
        Self::new(300.0, 20.0, 1.0)
    }

    /// Fast, no visible overshoot
    pub const fn stiff() -> Self {
        Self::new(400.0, 40.0, 1.0)
    }

    /// Quick with a hint of overshoot
    pub const fn snappy() -> Self {
        Self::new(300.0, 30.0, 1.0)
    }

    /// Slow and soft
    pub const fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// Visibly bouncy
    pub const fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// Damping chosen so the spring settles as fast as possible without overshoot
    pub fn critically_damped(stiffness: f32, mass: f32) -> Self {
        Self::new(stiffness, 2.0 * (stiffness * mass).sqrt(), mass)
    }

    /// Builder: rest thresholds
    pub fn with_rest(mut self, rest_delta: f32, rest_speed: f32) -> Self {
        self.rest_delta = rest_delta;
        self.rest_speed = rest_speed;
        self
    }

    /// Damping ratio; 1.0 is critical, above is overdamped
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Check the physical domain: stiffness > 0, damping >= 0, mass > 0
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.stiffness,
            self.damping,
            self.mass,
            self.rest_delta,
            self.rest_speed,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(AnimationError::InvalidSpring(
                "parameters must be finite".to_string(),
            ));
        }
        if self.stiffness <= 0.0 {
            return Err(AnimationError::InvalidSpring(format!(
                "stiffness must be positive, got {}",
                self.stiffness
            )));
        }
        if self.damping < 0.0 {
            return Err(AnimationError::InvalidSpring(format!(
                "damping must not be negative, got {}",
                self.damping
            )));
        }
        if self.mass <= 0.0 {
            return Err(AnimationError::InvalidSpring(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        if self.rest_delta < 0.0 || self.rest_speed < 0.0 {
            return Err(AnimationError::InvalidSpring(
                "rest thresholds must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of RK4 sub-steps needed to integrate `dt` stably
    fn substeps_for(&self, dt: f64) -> u32 {
        let stiffness = self.stiffness as f64;
        let damping = self.damping as f64;
        let mass = self.mass as f64;
        let fastest_mode = damping / mass + (stiffness / mass).sqrt();
        if fastest_mode <= 0.0 {
            return 1;
        }
        let max_h = STABLE_STEP / fastest_mode;
        ((dt / max_h).ceil() as u32).clamp(1, MAX_SUBSTEPS)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(100.0, 10.0, 1.0)
    }
}

/// One animated scalar
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// Create a spring at rest at `initial`
    ///
    /// Out-of-domain parameters are replaced by the default configuration.
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        let config = if config.validate().is_ok() {
            config
        } else {
            tracing::warn!(?config, "invalid spring config, using default");
            SpringConfig::default()
        };
        let initial = if initial.is_finite() { initial } else { 0.0 };
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Retarget without disturbing value or velocity
    ///
    /// Non-finite targets are ignored and the last valid target is kept.
    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Jump to `value` and stop there
    pub fn snap_to(&mut self, value: f32) {
        if value.is_finite() {
            self.value = value;
            self.target = value;
            self.velocity = 0.0;
        }
    }

    /// At target and (almost) still
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() <= self.config.rest_delta
            && self.velocity.abs() <= self.config.rest_speed
    }

    pub fn is_animating(&self) -> bool {
        !self.is_settled()
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Non-positive or non-finite steps are ignored; steps above
    /// [`MAX_STEP_DT`] are clamped.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        if self.is_settled() {
            self.rest();
            return;
        }

        let dt = dt.min(MAX_STEP_DT) as f64;
        let substeps = self.config.substeps_for(dt);
        let h = dt / substeps as f64;

        let mut x = self.value as f64;
        let mut v = self.velocity as f64;
        for _ in 0..substeps {
            (x, v) = self.rk4(x, v, h);
        }

        if !x.is_finite() || !v.is_finite() {
            tracing::debug!("spring diverged, settling at target");
            self.rest();
            return;
        }

        self.value = x as f32;
        self.velocity = v as f32;
        if self.is_settled() {
            self.rest();
        }
    }

    fn rest(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
    }

    fn acceleration(&self, x: f64, v: f64) -> f64 {
        let k = self.config.stiffness as f64;
        let c = self.config.damping as f64;
        let m = self.config.mass as f64;
        (k * (self.target as f64 - x) - c * v) / m
    }

    fn rk4(&self, x: f64, v: f64, h: f64) -> (f64, f64) {
        let k1x = v;
        let k1v = self.acceleration(x, v);

        let k2x = v + 0.5 * h * k1v;
        let k2v = self.acceleration(x + 0.5 * h * k1x, v + 0.5 * h * k1v);

        let k3x = v + 0.5 * h * k2v;
        let k3v = self.acceleration(x + 0.5 * h * k2x, v + 0.5 * h * k2v);

        let k4x = v + h * k3v;
        let k4v = self.acceleration(x + h * k3x, v + h * k3v);

        (
            x + h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x),
            v + h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v),
        )
    }
}

/// Two independent springs driving an x/y pair
///
/// The axes never share state, so motion on one axis cannot leak into the other.
#[derive(Clone, Debug)]
pub struct SpringVec2 {
    pub x: Spring,
    pub y: Spring,
}

impl SpringVec2 {
    pub fn new(config: SpringConfig, initial: Vec2) -> Self {
        Self {
            x: Spring::new(config, initial.x),
            y: Spring::new(config, initial.y),
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.x.set_target(target.x);
        self.y.set_target(target.y);
    }

    pub fn snap_to(&mut self, value: Vec2) {
        self.x.snap_to(value.x);
        self.y.snap_to(value.y);
    }

    pub fn step(&mut self, dt: f32) {
        self.x.step(dt);
        self.y.step(dt);
    }

    pub fn value(&self) -> Vec2 {
        Vec2::new(self.x.value(), self.y.value())
    }

    /// Value read as a position
    pub fn point(&self) -> Point {
        Point::new(self.x.value(), self.y.value())
    }

    pub fn target(&self) -> Vec2 {
        Vec2::new(self.x.target(), self.y.target())
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled()
    }
}
