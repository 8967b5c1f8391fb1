//! Aethel Motion
//!
//! Pointer-reactive components built on the core runtime and the spring
//! filter:
//!
//! - **Input**: pointer and device-orientation providers behind one trait
//! - **Cursor**: spring-smoothed custom cursor shaped by hover classification
//! - **Magnetic**: elements that lean toward the pointer while hovered
//! - **Drag**: press-and-drag elements held inside a constraint box
//! - **Ambient**: exponentially smoothed background glow
//! - **Overlay**: contract for the decorative rigid-body overlay
//!
//! Every component follows the same lifecycle: `mount` registers listeners
//! and one frame callback on an [`AethelRuntime`](aethel_core::AethelRuntime)
//! and returns a handle; `unmount` consumes the handle and removes all of it.
//!
//! # Example
//!
//! ```rust
//! use aethel_core::{AethelRuntime, Element, Point, Rect, Size};
//! use aethel_motion::{MagneticConfig, MagneticPull};
//!
//! let mut runtime = AethelRuntime::new(Size::new(1280.0, 720.0));
//! let button = runtime
//!     .tree_mut()
//!     .insert(None, Element::new("button").bounds(Rect::new(0.0, 0.0, 100.0, 40.0)))
//!     .unwrap();
//!
//! let magnetic = MagneticPull::mount(&mut runtime, button, MagneticConfig::default()).unwrap();
//! runtime.pointer_move(Point::new(90.0, 20.0));
//! for _ in 0..120 {
//!     runtime.frame(1.0 / 60.0);
//! }
//! assert_eq!(magnetic.offset().x, 20.0);
//!
//! magnetic.unmount(&mut runtime);
//! assert_eq!(runtime.listener_count(), 0);
//! ```

pub mod ambient;
pub mod cursor;
pub mod drag;
pub mod error;
pub mod hover;
pub mod input;
pub mod magnetic;
pub mod overlay;

pub use ambient::{AmbientConfig, AmbientFollower, AmbientFrame};
pub use cursor::{CursorConfig, CursorFollower, CursorFrame, RingFrame};
pub use drag::{DragConfig, DragConstraints, Draggable};
pub use error::{MotionError, Result};
pub use hover::{HoverCategory, HoverClassifier};
pub use input::{InputKind, InputSource, OrientationInput, PointerInput};
pub use magnetic::{pull_offset, MagneticConfig, MagneticPull};
pub use overlay::{
    BodyDesc, BodyFrame, BodyId, BodyPose, OverlayConfig, OverlayHandle, PhysicsOverlay,
    RigidBodyEngine,
};
