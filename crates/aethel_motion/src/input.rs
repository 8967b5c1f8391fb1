//! Normalized 2D input providers
//!
//! A follower does not care whether its input comes from a mouse or from a
//! tilted phone. Each [`InputSource`] listens for one kind of window event and
//! reduces it to a point in `[0, 1]²`; events it cannot use (missing angles,
//! zero-sized viewport) are dropped so the follower keeps its last target.

use crate::error::{MotionError, Result};
use aethel_core::{
    event_types, Event, EventData, EventDispatcher, EventType, ListenerId, ListenerTarget, Point,
    ReadSignal, Size,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Provider of a normalized 2D input signal
pub trait InputSource {
    /// Window event this source listens to
    fn event_type(&self) -> EventType;

    /// Normalized position carried by `event`, or `None` to ignore it
    fn normalize(&self, event: &Event) -> Option<Point>;
}

impl<S: InputSource + ?Sized> InputSource for Box<S> {
    fn event_type(&self) -> EventType {
        (**self).event_type()
    }

    fn normalize(&self, event: &Event) -> Option<Point> {
        (**self).normalize(event)
    }
}

/// Pointer position divided by the viewport size
#[derive(Clone, Debug)]
pub struct PointerInput {
    viewport: ReadSignal<Size>,
}

impl PointerInput {
    pub fn new(viewport: ReadSignal<Size>) -> Self {
        Self { viewport }
    }
}

impl InputSource for PointerInput {
    fn event_type(&self) -> EventType {
        event_types::POINTER_MOVE
    }

    fn normalize(&self, event: &Event) -> Option<Point> {
        let position = event.pointer()?;
        let viewport = self.viewport.get();
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }
        let normalized = Point::new(position.x / viewport.width, position.y / viewport.height);
        normalized.is_finite().then_some(normalized)
    }
}

/// Device tilt: gamma `[-90, 90]` maps to x, beta `[-180, 180]` maps to y
#[derive(Clone, Copy, Debug, Default)]
pub struct OrientationInput;

impl OrientationInput {
    pub fn map(beta: f32, gamma: f32) -> Point {
        Point::new((gamma + 90.0) / 180.0, (beta + 180.0) / 360.0)
    }
}

impl InputSource for OrientationInput {
    fn event_type(&self) -> EventType {
        event_types::DEVICE_ORIENTATION
    }

    fn normalize(&self, event: &Event) -> Option<Point> {
        match event.data {
            EventData::Orientation {
                beta: Some(beta),
                gamma: Some(gamma),
                ..
            } => {
                let mapped = Self::map(beta, gamma);
                mapped.is_finite().then_some(mapped)
            }
            _ => None,
        }
    }
}

/// Input source names accepted in configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Pointer,
    Orientation,
}

impl InputKind {
    /// Build the provider for this kind
    pub fn source(self, viewport: ReadSignal<Size>) -> Box<dyn InputSource> {
        match self {
            InputKind::Pointer => Box::new(PointerInput::new(viewport)),
            InputKind::Orientation => Box::new(OrientationInput),
        }
    }
}

impl FromStr for InputKind {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "pointer" | "mouse" => Ok(InputKind::Pointer),
            "orientation" | "tilt" => Ok(InputKind::Orientation),
            other => Err(MotionError::UnknownInput(other.to_string())),
        }
    }
}

/// Register a window listener that forwards normalized samples to `sink`
pub fn attach<S, F>(source: S, events: &mut EventDispatcher, sink: F) -> ListenerId
where
    S: InputSource + 'static,
    F: Fn(Point) + 'static,
{
    let event_type = source.event_type();
    events.register(ListenerTarget::Window, event_type, move |event, _| {
        if let Some(sample) = source.normalize(event) {
            sink(sample);
        }
    })
}
