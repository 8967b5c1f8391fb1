//! Aethel Animation System
//!
//! Spring filters, easing, keyframe tracks, and scroll-progress mapping.
//!
//! # Features
//!
//! - **Spring Filter**: RK4-integrated springs with stiffness, damping, mass
//! - **Scroll Mapping**: one progress scalar driving many interpolated outputs
//! - **Progress Sources**: page, absolute pixel, and element-tracking progress
//! - **Keyframe Tracks**: multi-stop mappings and looping time-driven tracks
//! - **Interruptible**: retargeted springs keep their velocity

pub mod color;
pub mod easing;
pub mod error;
pub mod interpolate;
pub mod keyframe;
pub mod progress;
pub mod scheduler;
pub mod scroll;
pub mod spring;
pub mod timeline;

pub use color::Color;
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use interpolate::{lerp_f32, Lerp, MotionValue};
pub use keyframe::{Keyframe, KeyframeTrack};
pub use progress::{Edge, ScrollGeometry, ScrollOffset, ScrollProgressSource, TargetBounds};
pub use scheduler::{AnimationScheduler, SpringId};
pub use scroll::{BindingId, InterpolationSpec, ScrollMapper, ScrollRange, SmoothedProgress};
pub use spring::{Spring, SpringConfig, SpringVec2, MAX_STEP_DT};
pub use timeline::{Repeat, Timeline};
