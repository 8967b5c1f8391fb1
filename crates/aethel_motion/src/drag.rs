//! Draggable elements
//!
//! Press on the element, move, release: the element follows the pointer by
//! the distance travelled since the press, clamped to a constraint box around
//! its resting place. Scale springs between rest, hover and grab targets.
//!
//! Moves are read from the window while a grab is held, so a fast pointer
//! that leaves the element keeps dragging it.

use crate::error::{MotionError, Result};
use aethel_animation::{Spring, SpringConfig};
use aethel_core::{
    event_types, AethelRuntime, FrameCallbackId, ListenerId, ListenerTarget, NodeId, NodeTree,
    Point, Transform, Vec2,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

/// Box the drag offset is held inside, relative to the resting position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragConstraints {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl DragConstraints {
    pub fn clamp(&self, offset: Vec2) -> Vec2 {
        Vec2::new(
            offset.x.clamp(self.left, self.right),
            offset.y.clamp(self.top, self.bottom),
        )
    }

    fn validate(&self) -> Result<()> {
        let finite = [self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.left > self.right || self.top > self.bottom {
            return Err(MotionError::InvalidDragConstraints(*self));
        }
        Ok(())
    }
}

impl Default for DragConstraints {
    fn default() -> Self {
        Self {
            left: -300.0,
            right: 300.0,
            top: -200.0,
            bottom: 200.0,
        }
    }
}

fn default_hover_scale() -> f32 {
    1.2
}

fn default_drag_scale() -> f32 {
    0.9
}

fn default_scale_spring() -> SpringConfig {
    SpringConfig::new(500.0, 25.0, 1.0)
}

/// Drag tuning
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    #[serde(default)]
    pub constraints: DragConstraints,
    /// Scale while hovered and not held
    #[serde(default = "default_hover_scale")]
    pub hover_scale: f32,
    /// Scale while held
    #[serde(default = "default_drag_scale")]
    pub drag_scale: f32,
    #[serde(default = "default_scale_spring")]
    pub scale_spring: SpringConfig,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            constraints: DragConstraints::default(),
            hover_scale: default_hover_scale(),
            drag_scale: default_drag_scale(),
            scale_spring: default_scale_spring(),
        }
    }
}

/// Where a grab started
#[derive(Clone, Copy, Debug)]
struct Grab {
    pointer: Point,
    offset: Vec2,
}

struct DragState {
    config: DragConfig,
    offset: Vec2,
    grab: Option<Grab>,
    hovered: bool,
    scale: Spring,
}

impl DragState {
    fn press(&mut self, pointer: Point) {
        self.grab = Some(Grab {
            pointer,
            offset: self.offset,
        });
        self.retarget();
    }

    fn follow(&mut self, pointer: Point) {
        let Some(grab) = self.grab else {
            return;
        };
        let offset = grab.offset + (pointer - grab.pointer);
        if offset.is_finite() {
            self.offset = self.config.constraints.clamp(offset);
        }
    }

    fn release(&mut self) {
        if self.grab.take().is_some() {
            trace!(x = self.offset.x, y = self.offset.y, "drag released");
        }
        self.retarget();
    }

    fn hover(&mut self, hovered: bool) {
        if self.hovered != hovered {
            self.hovered = hovered;
            self.retarget();
        }
    }

    fn retarget(&mut self) {
        let target = if self.grab.is_some() {
            self.config.drag_scale
        } else if self.hovered {
            self.config.hover_scale
        } else {
            1.0
        };
        self.scale.set_target(target);
    }
}

/// Mounted drag behaviour on one element
pub struct Draggable {
    node: NodeId,
    state: Rc<RefCell<DragState>>,
    listeners: SmallVec<[ListenerId; 5]>,
    frame: FrameCallbackId,
}

impl Draggable {
    /// Attach drag behaviour to `node`
    pub fn mount(runtime: &mut AethelRuntime, node: NodeId, config: DragConfig) -> Result<Self> {
        if runtime.tree().get(node).is_none() {
            return Err(MotionError::UnknownNode);
        }
        config.constraints.validate()?;
        config.scale_spring.validate()?;
        let state = Rc::new(RefCell::new(DragState {
            config,
            offset: Vec2::ZERO,
            grab: None,
            hovered: false,
            scale: Spring::new(config.scale_spring, 1.0),
        }));
        let element = ListenerTarget::Node(node);
        let events = runtime.events_mut();
        let mut listeners = SmallVec::new();

        let pressing = state.clone();
        listeners.push(events.register(element, event_types::POINTER_DOWN, move |event, _| {
            if let Some(pointer) = event.pointer() {
                pressing.borrow_mut().press(pointer);
            }
        }));

        let entering = state.clone();
        listeners.push(events.register(element, event_types::POINTER_MOVE, move |_, _| {
            entering.borrow_mut().hover(true)
        }));

        let leaving = state.clone();
        listeners.push(events.register(element, event_types::POINTER_LEAVE, move |_, _| {
            leaving.borrow_mut().hover(false)
        }));

        let dragging = state.clone();
        listeners.push(events.register(
            ListenerTarget::Window,
            event_types::POINTER_MOVE,
            move |event, _| {
                if let Some(pointer) = event.pointer() {
                    dragging.borrow_mut().follow(pointer);
                }
            },
        ));

        let releasing = state.clone();
        listeners.push(events.register(
            ListenerTarget::Window,
            event_types::POINTER_UP,
            move |_, _| releasing.borrow_mut().release(),
        ));

        let ticking = state.clone();
        let frame = runtime
            .frames_mut()
            .request(move |time| ticking.borrow_mut().scale.step(time.dt));

        debug!(?node, "draggable mounted");
        Ok(Self {
            node,
            state,
            listeners,
            frame,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Offset from the resting position, always inside the constraints
    pub fn offset(&self) -> Vec2 {
        self.state.borrow().offset
    }

    /// Current spring-filtered scale
    pub fn scale(&self) -> f32 {
        self.state.borrow().scale.value()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().grab.is_some()
    }

    pub fn is_hovered(&self) -> bool {
        self.state.borrow().hovered
    }

    /// Write offset and scale into the element's transform
    pub fn apply(&self, tree: &mut NodeTree) {
        let state = self.state.borrow();
        if let Some(element) = tree.get_mut(self.node) {
            element.style.transform.translate = state.offset;
            element.style.transform.scale = state.scale.value();
        }
    }

    /// Remove every listener, cancel the frame callback and reset the transform
    pub fn unmount(self, runtime: &mut AethelRuntime) {
        for id in &self.listeners {
            runtime.events_mut().remove(*id);
        }
        runtime.frames_mut().cancel(self.frame);
        if let Some(element) = runtime.tree_mut().get_mut(self.node) {
            element.style.transform = Transform::IDENTITY;
        }
        debug!(node = ?self.node, "draggable unmounted");
    }
}
