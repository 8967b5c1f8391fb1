//! Runtime host
//!
//! Owns the element tree, the event dispatcher, the frame loop and the shared
//! input signals. Platform glue (or a headless scenario) feeds raw input in;
//! the runtime derives hover paths and leave events the same way a browser
//! would and forwards everything to listeners.

use crate::events::{event_types, Event, EventData, EventDispatcher, EventType, ListenerTarget};
use crate::frame::{FrameLoop, FrameTime};
use crate::geometry::{Point, Size};
use crate::signal::{ReadSignal, Signal};
use crate::tree::{NodeId, NodePath, NodeTree};
use smallvec::SmallVec;
use tracing::{debug, trace};

pub struct AethelRuntime {
    tree: NodeTree,
    events: EventDispatcher,
    frames: FrameLoop,
    pointer: Signal<Point>,
    scroll_y: Signal<f32>,
    viewport: Signal<Size>,
    hovered: NodePath,
    clock_ms: f64,
}

impl AethelRuntime {
    pub fn new(viewport: Size) -> Self {
        Self {
            tree: NodeTree::new(),
            events: EventDispatcher::new(),
            frames: FrameLoop::new(),
            pointer: Signal::new(Point::ZERO),
            scroll_y: Signal::new(0.0),
            viewport: Signal::new(viewport),
            hovered: SmallVec::new(),
            clock_ms: 0.0,
        }
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    pub fn events_mut(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }

    pub fn frames_mut(&mut self) -> &mut FrameLoop {
        &mut self.frames
    }

    /// Latest pointer position in client coordinates
    pub fn pointer(&self) -> ReadSignal<Point> {
        self.pointer.reader()
    }

    /// Latest vertical scroll offset in pixels
    pub fn scroll_y(&self) -> ReadSignal<f32> {
        self.scroll_y.reader()
    }

    pub fn viewport(&self) -> ReadSignal<Size> {
        self.viewport.reader()
    }

    /// Element currently under the pointer
    pub fn hover_target(&self) -> Option<NodeId> {
        self.hovered.first().copied()
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    pub fn frame_callback_count(&self) -> usize {
        self.frames.callback_count()
    }

    fn event(&self, event_type: u32, data: EventData) -> Event {
        let mut event = Event::new(event_type, data);
        event.timestamp = self.clock_ms as u64;
        event
    }

    /// Feed a raw pointer position
    ///
    /// Fires `POINTER_LEAVE` on every element the pointer left, `POINTER_OVER`
    /// on the window when the hit target changed, then `POINTER_MOVE` bubbling
    /// from the window through the new hover path.
    pub fn pointer_move(&mut self, position: Point) {
        if !position.is_finite() {
            debug!("ignoring non-finite pointer position");
            return;
        }
        self.pointer.set(position);

        let target = self.tree.hit_test(position);
        let path = target.map(|t| self.tree.path(t)).unwrap_or_default();

        let previous = std::mem::replace(&mut self.hovered, path.clone());
        for left in previous.iter().filter(|n| !path.contains(*n)) {
            let mut leave = self.event(event_types::POINTER_LEAVE, EventData::Pointer { position });
            leave.target = Some(*left);
            self.events
                .dispatch(ListenerTarget::Node(*left), &leave, &self.tree);
        }

        let mut event = self.event(event_types::POINTER_MOVE, EventData::Pointer { position });
        event.target = target;
        event.path = path;

        if previous.first() != event.path.first() {
            trace!(?target, "hover target changed");
            let mut over = event.clone();
            over.event_type = event_types::POINTER_OVER;
            self.events
                .dispatch(ListenerTarget::Window, &over, &self.tree);
        }

        self.events.dispatch_bubbling(&event, &self.tree);
    }

    /// Primary button pressed at `position`
    ///
    /// Hover is brought up to date first, then `POINTER_DOWN` bubbles from the
    /// window through the hover path.
    pub fn pointer_down(&mut self, position: Point) {
        self.pointer_button(event_types::POINTER_DOWN, position);
    }

    /// Primary button released; routed like [`pointer_down`](Self::pointer_down)
    pub fn pointer_up(&mut self, position: Point) {
        self.pointer_button(event_types::POINTER_UP, position);
    }

    fn pointer_button(&mut self, event_type: EventType, position: Point) {
        if !position.is_finite() {
            debug!("ignoring non-finite pointer position");
            return;
        }
        if position != self.pointer.get() {
            self.pointer_move(position);
        }
        let mut event = self.event(event_type, EventData::Pointer { position });
        event.target = self.hover_target();
        event.path = self.hovered.clone();
        self.events.dispatch_bubbling(&event, &self.tree);
    }

    /// Feed a device orientation sample, in degrees
    pub fn orientation(&mut self, alpha: Option<f32>, beta: Option<f32>, gamma: Option<f32>) {
        let event = self.event(
            event_types::DEVICE_ORIENTATION,
            EventData::Orientation { alpha, beta, gamma },
        );
        self.events
            .dispatch(ListenerTarget::Window, &event, &self.tree);
    }

    /// Set the vertical scroll offset
    pub fn scroll_to(&mut self, scroll_y: f32) {
        if !scroll_y.is_finite() {
            debug!("ignoring non-finite scroll offset");
            return;
        }
        self.scroll_y.set(scroll_y);
        let event = self.event(event_types::SCROLL, EventData::Scroll { scroll_y });
        self.events
            .dispatch(ListenerTarget::Window, &event, &self.tree);
    }

    pub fn resize(&mut self, viewport: Size) {
        self.viewport.set(viewport);
        let event = self.event(event_types::RESIZE, EventData::Resize { viewport });
        self.events
            .dispatch(ListenerTarget::Window, &event, &self.tree);
    }

    /// Run one display frame
    pub fn frame(&mut self, raw_dt: f32) -> FrameTime {
        let time = self.frames.advance(raw_dt);
        self.clock_ms += time.dt as f64 * 1000.0;
        time
    }

    /// Remove an element subtree along with every listener attached to it
    pub fn remove_node(&mut self, id: NodeId) {
        for node in self.tree.subtree(id) {
            self.events.remove_target(ListenerTarget::Node(node));
            self.hovered.retain(|h| *h != node);
        }
        self.tree.remove(id);
    }
}
