//! Magnetic hover
//!
//! While the pointer is over an element, the element leans toward it by
//! `(pointer - center) * strength`. Leaving the element sends it home. Both
//! moves go through `magnetic()` springs, one per axis.

use crate::error::{MotionError, Result};
use aethel_animation::{SpringConfig, SpringVec2};
use aethel_core::{
    event_types, AethelRuntime, FrameCallbackId, ListenerId, ListenerTarget, NodeId, NodeTree,
    Point, Transform, Vec2,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

fn default_strength() -> f32 {
    0.5
}

fn default_spring() -> SpringConfig {
    SpringConfig::magnetic()
}

/// Magnetic pull tuning
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MagneticConfig {
    /// Fraction of the pointer's distance from centre the element follows
    #[serde(default = "default_strength")]
    pub strength: f32,
    #[serde(default = "default_spring")]
    pub spring: SpringConfig,
}

impl MagneticConfig {
    /// Clamp `strength` into `[0, 1]`; NaN or infinity is an error
    pub fn new(strength: f32) -> Result<Self> {
        if !strength.is_finite() {
            return Err(MotionError::InvalidStrength(strength));
        }
        Ok(Self {
            strength: strength.clamp(0.0, 1.0),
            spring: SpringConfig::magnetic(),
        })
    }

    fn validated(self) -> Result<Self> {
        Ok(Self {
            spring: self.spring,
            ..Self::new(self.strength)?
        })
    }
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            strength: default_strength(),
            spring: default_spring(),
        }
    }
}

/// Target offset for a pointer over an element centred at `center`
pub fn pull_offset(pointer: Point, center: Point, strength: f32) -> Vec2 {
    (pointer - center) * strength
}

struct MagneticState {
    strength: f32,
    offset: SpringVec2,
}

impl MagneticState {
    fn pull(&mut self, pointer: Point, center: Point) {
        let target = pull_offset(pointer, center, self.strength);
        if target.is_finite() {
            self.offset.set_target(target);
        }
    }

    fn release(&mut self) {
        self.offset.set_target(Vec2::ZERO);
    }
}

/// Mounted magnetic behaviour on one element
pub struct MagneticPull {
    node: NodeId,
    state: Rc<RefCell<MagneticState>>,
    listeners: SmallVec<[ListenerId; 2]>,
    frame: FrameCallbackId,
}

impl MagneticPull {
    /// Attach magnetic behaviour to `node`
    pub fn mount(
        runtime: &mut AethelRuntime,
        node: NodeId,
        config: MagneticConfig,
    ) -> Result<Self> {
        if runtime.tree().get(node).is_none() {
            return Err(MotionError::UnknownNode);
        }
        let config = config.validated()?;
        let state = Rc::new(RefCell::new(MagneticState {
            strength: config.strength,
            offset: SpringVec2::new(config.spring, Vec2::ZERO),
        }));
        let target = ListenerTarget::Node(node);
        let mut listeners = SmallVec::new();

        let moving = state.clone();
        listeners.push(runtime.events_mut().register(
            target,
            event_types::POINTER_MOVE,
            move |event, tree| {
                let (Some(pointer), Some(element)) = (event.pointer(), tree.get(node)) else {
                    return;
                };
                moving.borrow_mut().pull(pointer, element.bounds.center());
            },
        ));

        let leaving = state.clone();
        listeners.push(runtime.events_mut().register(
            target,
            event_types::POINTER_LEAVE,
            move |_, _| leaving.borrow_mut().release(),
        ));

        let ticking = state.clone();
        let frame = runtime
            .frames_mut()
            .request(move |time| ticking.borrow_mut().offset.step(time.dt));

        debug!(?node, strength = config.strength, "magnetic pull mounted");
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

    /// Current spring-filtered offset
    pub fn offset(&self) -> Vec2 {
        self.state.borrow().offset.value()
    }

    /// Offset the springs are heading for
    pub fn target(&self) -> Vec2 {
        self.state.borrow().offset.target()
    }

    pub fn is_settled(&self) -> bool {
        self.state.borrow().offset.is_settled()
    }

    /// Write the current offset into the element's transform
    pub fn apply(&self, tree: &mut NodeTree) {
        let offset = self.offset();
        if let Some(element) = tree.get_mut(self.node) {
            element.style.transform.translate = offset;
        }
    }

    /// Remove both listeners, cancel the frame callback and reset the transform
    pub fn unmount(self, runtime: &mut AethelRuntime) {
        for id in &self.listeners {
            runtime.events_mut().remove(*id);
        }
        runtime.frames_mut().cancel(self.frame);
        if let Some(element) = runtime.tree_mut().get_mut(self.node) {
            element.style.transform = Transform::IDENTITY;
        }
        debug!(node = ?self.node, "magnetic pull unmounted");
    }
}
