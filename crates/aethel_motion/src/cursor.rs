//! Custom cursor follower
//!
//! A trailing cursor that follows the pointer through springs and changes
//! shape with whatever it hovers:
//!
//! - position: two independent springs (one per axis), `cursor()` preset
//! - size: one spring, `cursor_size()` preset, target chosen by hover category
//! - corner radius: one spring, round unless the category asks otherwise
//! - idle ring: a looping pulse shown only while nothing is hovered
//!
//! The first pointer sample snaps the position so the cursor does not fly in
//! from the corner of the screen.

use crate::hover::{HoverCategory, HoverClassifier};
use aethel_animation::{
    AnimationScheduler, KeyframeTrack, Repeat, Spring, SpringConfig, SpringId, Timeline,
};
use aethel_core::{
    event_types, AethelRuntime, FrameCallbackId, FrameTime, ListenerId, ListenerTarget, NodeId,
    NodeTree, Point, ReadSignal,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Cursor follower tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub position_spring: SpringConfig,
    pub size_spring: SpringConfig,
    pub radius_spring: SpringConfig,
    /// Seconds per idle ring pulse
    pub ring_period: f32,
    /// Ring scale at the start and end of a pulse
    pub ring_scale: [f32; 2],
    /// Ring opacity at the start and end of a pulse
    pub ring_opacity: [f32; 2],
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            position_spring: SpringConfig::cursor(),
            size_spring: SpringConfig::cursor_size(),
            radius_spring: SpringConfig::cursor_size(),
            ring_period: 2.0,
            ring_scale: [1.0, 1.5],
            ring_opacity: [0.5, 0.0],
        }
    }
}

/// Idle ring appearance for one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RingFrame {
    pub scale: f32,
    pub opacity: f32,
}

/// Everything needed to draw the cursor for one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CursorFrame {
    /// Centre of the cursor in client coordinates
    pub position: Point,
    pub size: f32,
    pub corner_radius: f32,
    pub category: String,
    pub label: Option<String>,
    /// False until the first pointer sample arrives
    pub visible: bool,
    pub ring: Option<RingFrame>,
}

struct CursorState {
    classifier: HoverClassifier,
    pointer: ReadSignal<Point>,
    baseline: Point,
    moved: bool,
    snapped: bool,
    springs: AnimationScheduler,
    x: SpringId,
    y: SpringId,
    size: SpringId,
    radius: SpringId,
    category: HoverCategory,
    ring_scale: Timeline<f32>,
    ring_opacity: Timeline<f32>,
}

impl CursorState {
    fn new(classifier: HoverClassifier, pointer: ReadSignal<Point>, config: &CursorConfig) -> Self {
        let category = classifier.fallback().clone();
        let baseline = pointer.get();

        let mut springs = AnimationScheduler::new();
        let x = springs.add_spring(Spring::new(config.position_spring, baseline.x));
        let y = springs.add_spring(Spring::new(config.position_spring, baseline.y));
        let size = springs.add_spring(Spring::new(config.size_spring, category.size));
        let radius =
            springs.add_spring(Spring::new(config.radius_spring, category.target_radius()));

        let ring = |[from, to]: [f32; 2]| {
            Timeline::new(KeyframeTrack::between(from, to), config.ring_period)
                .repeat(Repeat::Forever)
        };

        Self {
            classifier,
            pointer,
            baseline,
            moved: false,
            snapped: false,
            springs,
            x,
            y,
            size,
            radius,
            category,
            ring_scale: ring(config.ring_scale),
            ring_opacity: ring(config.ring_opacity),
        }
    }

    fn hovering(&self) -> bool {
        self.category.name != self.classifier.fallback().name
    }

    fn classify(&mut self, path: &[NodeId], tree: &NodeTree) {
        let category = self.classifier.classify(path, tree);
        if category.name == self.category.name {
            return;
        }
        let was_hovering = self.hovering();
        self.category = category.clone();
        debug!(category = %self.category.name, "cursor category changed");

        self.springs.set_target(self.size, self.category.size);
        self.springs.set_target(self.radius, self.category.target_radius());
        if was_hovering && !self.hovering() {
            self.ring_scale.restart();
            self.ring_opacity.restart();
        }
    }

    fn tick(&mut self, time: &FrameTime) {
        let pointer = self.pointer.get();
        if pointer.is_finite() && (self.moved || pointer != self.baseline) {
            if self.snapped {
                self.springs.set_target(self.x, pointer.x);
                self.springs.set_target(self.y, pointer.y);
            } else {
                for (id, value) in [(self.x, pointer.x), (self.y, pointer.y)] {
                    if let Some(spring) = self.springs.get_spring_mut(id) {
                        spring.snap_to(value);
                    }
                }
                self.snapped = true;
            }
        }

        self.springs.tick(time.dt);
        if !self.hovering() {
            self.ring_scale.tick(time.dt);
            self.ring_opacity.tick(time.dt);
        }
    }

    fn snapshot(&self) -> CursorFrame {
        let value = |id| self.springs.value(id).unwrap_or_default();
        let size = value(self.size).max(0.0);
        CursorFrame {
            position: Point::new(value(self.x), value(self.y)),
            size,
            corner_radius: value(self.radius).clamp(0.0, size / 2.0),
            category: self.category.name.clone(),
            label: self.category.label.clone(),
            visible: self.snapped,
            ring: (!self.hovering()).then(|| RingFrame {
                scale: self.ring_scale.value(),
                opacity: self.ring_opacity.value(),
            }),
        }
    }
}

/// Mounted cursor follower
///
/// Dropping the handle without calling [`CursorFollower::unmount`] leaves the
/// listeners registered.
pub struct CursorFollower {
    state: Rc<RefCell<CursorState>>,
    listeners: SmallVec<[ListenerId; 2]>,
    frame: FrameCallbackId,
}

impl CursorFollower {
    /// Register pointer listeners and a frame callback on `runtime`
    pub fn mount(
        runtime: &mut AethelRuntime,
        pointer: ReadSignal<Point>,
        classifier: HoverClassifier,
        config: &CursorConfig,
    ) -> Self {
        let state = Rc::new(RefCell::new(CursorState::new(classifier, pointer, config)));
        let mut listeners = SmallVec::new();

        let over = state.clone();
        listeners.push(runtime.events_mut().register(
            ListenerTarget::Window,
            event_types::POINTER_OVER,
            move |event, tree| over.borrow_mut().classify(&event.path, tree),
        ));

        let moved = state.clone();
        listeners.push(runtime.events_mut().register(
            ListenerTarget::Window,
            event_types::POINTER_MOVE,
            move |_, _| moved.borrow_mut().moved = true,
        ));

        let ticking = state.clone();
        let frame = runtime
            .frames_mut()
            .request(move |time| ticking.borrow_mut().tick(time));

        debug!("cursor follower mounted");
        Self {
            state,
            listeners,
            frame,
        }
    }

    /// Current cursor appearance
    pub fn snapshot(&self) -> CursorFrame {
        self.state.borrow().snapshot()
    }

    pub fn category(&self) -> String {
        self.state.borrow().category.name.clone()
    }

    /// Remove every listener and cancel the frame callback
    pub fn unmount(self, runtime: &mut AethelRuntime) {
        for id in self.listeners {
            runtime.events_mut().remove(id);
        }
        runtime.frames_mut().cancel(self.frame);
        debug!("cursor follower unmounted");
    }
}
