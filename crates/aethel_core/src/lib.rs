//! Aethel Core Runtime
//!
//! Foundational primitives for the Aethel motion layer:
//!
//! - **Geometry**: points, sizes, rects and offsets
//! - **Element Tree**: retained elements with selectors and hit-testing
//! - **Event Dispatch**: removable listeners keyed by target and event type
//! - **Frame Loop**: cancellable per-frame callbacks with clamped deltas
//! - **Signals**: one-writer, many-reader shared values
//!
//! # Example
//!
//! ```rust
//! use aethel_core::{AethelRuntime, Element, Point, Rect, Size};
//!
//! let mut runtime = AethelRuntime::new(Size::new(1280.0, 720.0));
//! let button = runtime
//!     .tree_mut()
//!     .insert(None, Element::new("button").bounds(Rect::new(0.0, 0.0, 120.0, 40.0)))
//!     .unwrap();
//!
//! runtime.pointer_move(Point::new(10.0, 10.0));
//! assert_eq!(runtime.hover_target(), Some(button));
//! ```

pub mod error;
pub mod events;
pub mod frame;
pub mod geometry;
pub mod runtime;
pub mod signal;
pub mod tree;

pub use error::CoreError;
pub use events::{
    event_types, Event, EventData, EventDispatcher, EventType, ListenerId, ListenerTarget,
};
pub use frame::{FrameCallbackId, FrameLoop, FrameTime, MAX_FRAME_DT};
pub use geometry::{Point, Rect, Size, Vec2};
pub use runtime::AethelRuntime;
pub use signal::{ReadSignal, Signal};
pub use tree::{Element, ElementStyle, NodeId, NodePath, NodeTree, Positioning, Selector, Transform};
