//! Event dispatch system
//!
//! Platform input is normalized into [`Event`]s and routed to listeners keyed
//! by target and event type. Every registration returns a [`ListenerId`] so
//! components can remove exactly what they added when they unmount.

use crate::geometry::{Point, Size};
use crate::tree::{NodeId, NodePath, NodeTree};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    /// Pointer entered a new hit target (fires on the window)
    pub const POINTER_OVER: EventType = 4;
    /// Pointer left an element's bounds (fires on that element)
    pub const POINTER_LEAVE: EventType = 5;
    pub const DEVICE_ORIENTATION: EventType = 8;
    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;
}

new_key_type! {
    pub struct ListenerId;
}

/// Where a listener is attached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    Window,
    Node(NodeId),
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    /// Element under the pointer, if any
    pub target: Option<NodeId>,
    /// `target` and its ancestors, nearest first
    pub path: NodePath,
    pub data: EventData,
    /// Milliseconds since runtime start
    pub timestamp: u64,
}

impl Event {
    pub fn new(event_type: EventType, data: EventData) -> Self {
        Self {
            event_type,
            target: None,
            path: SmallVec::new(),
            data,
            timestamp: 0,
        }
    }

    /// Pointer position for pointer events
    pub fn pointer(&self) -> Option<Point> {
        match self.data {
            EventData::Pointer { position } => Some(position),
            _ => None,
        }
    }
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    Pointer {
        /// Client (viewport) coordinates
        position: Point,
    },
    /// Device tilt in degrees; platforms may omit any angle
    Orientation {
        alpha: Option<f32>,
        beta: Option<f32>,
        gamma: Option<f32>,
    },
    Scroll {
        scroll_y: f32,
    },
    Resize {
        viewport: Size,
    },
    None,
}

/// Event handler function type
///
/// Handlers get read access to the element tree so they can resolve
/// ancestors and bounds at dispatch time.
pub type EventHandler = Box<dyn Fn(&Event, &NodeTree)>;

struct Listener {
    target: ListenerTarget,
    event_type: EventType,
    handler: EventHandler,
}

/// Dispatches events to registered handlers
pub struct EventDispatcher {
    listeners: SlotMap<ListenerId, Listener>,
    routes: FxHashMap<(ListenerTarget, EventType), SmallVec<[ListenerId; 4]>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
            routes: FxHashMap::default(),
        }
    }

    /// Register an event handler for a target and event type
    pub fn register<F>(
        &mut self,
        target: ListenerTarget,
        event_type: EventType,
        handler: F,
    ) -> ListenerId
    where
        F: Fn(&Event, &NodeTree) + 'static,
    {
        let id = self.listeners.insert(Listener {
            target,
            event_type,
            handler: Box::new(handler),
        });
        self.routes.entry((target, event_type)).or_default().push(id);
        id
    }

    /// Remove a previously registered handler
    ///
    /// Returns false if the listener was already removed.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let Some(listener) = self.listeners.remove(id) else {
            return false;
        };
        let key = (listener.target, listener.event_type);
        if let Some(ids) = self.routes.get_mut(&key) {
            ids.retain(|l| *l != id);
            if ids.is_empty() {
                self.routes.remove(&key);
            }
        }
        true
    }

    /// Remove every handler attached to `target`
    pub fn remove_target(&mut self, target: ListenerTarget) -> usize {
        let ids: Vec<ListenerId> = self
            .listeners
            .iter()
            .filter(|(_, l)| l.target == target)
            .map(|(id, _)| id)
            .collect();
        ids.into_iter().filter(|id| self.remove(*id)).count()
    }

    /// Dispatch an event to the handlers registered on `target`
    pub fn dispatch(&self, target: ListenerTarget, event: &Event, tree: &NodeTree) {
        if let Some(ids) = self.routes.get(&(target, event.event_type)) {
            for id in ids {
                if let Some(listener) = self.listeners.get(*id) {
                    (listener.handler)(event, tree);
                }
            }
        }
    }

    /// Dispatch to the window, then bubble along `event.path`
    pub fn dispatch_bubbling(&self, event: &Event, tree: &NodeTree) {
        self.dispatch(ListenerTarget::Window, event, tree);
        for node in &event.path {
            self.dispatch(ListenerTarget::Node(*node), event, tree);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
