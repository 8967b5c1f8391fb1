//! Decorative physics overlay
//!
//! Turns selected page elements into rigid bodies for a playful "break the
//! page" mode, then puts everything back. The physics itself comes from an
//! injected [`RigidBodyEngine`]; this module only owns the contract around it:
//!
//! 1. snapshot the style of every matching element at least 10×10 px
//! 2. register one dynamic body per element plus a static floor and walls
//! 3. switch elements to fixed positioning above the page
//! 4. each frame, step the engine and copy body poses into transforms
//! 5. on deactivate, clear the engine and restore every snapshot exactly

use aethel_core::{ElementStyle, NodeId, NodeTree, Point, Positioning, Rect, Selector, Size, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Opaque body identifier handed out by an engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u64);

/// Dynamic body description
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDesc {
    /// Initial rectangle in client coordinates
    pub bounds: Rect,
    pub restitution: f32,
    pub friction: f32,
}

/// Pose of a body; `position` is the centre of mass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPose {
    pub position: Point,
    /// Radians
    pub angle: f32,
}

/// Rigid-body simulation the overlay drives
pub trait RigidBodyEngine {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId;

    /// Immovable collider (floor, walls)
    fn add_static(&mut self, bounds: Rect);

    fn step(&mut self, dt: f32);

    fn pose(&self, body: BodyId) -> Option<BodyPose>;

    /// Remove every body and collider
    fn clear(&mut self);
}

fn default_selector() -> String {
    ".project-card, .glass, h1, h2, .hero-letter, [role=button]".to_string()
}

fn default_min_size() -> f32 {
    10.0
}

fn default_restitution() -> f32 {
    0.6
}

fn default_friction() -> f32 {
    0.1
}

fn default_wall_thickness() -> f32 {
    100.0
}

fn default_z_index() -> i32 {
    9999
}

/// Overlay tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_selector")]
    pub selector: String,
    /// Elements narrower or shorter than this are left alone
    #[serde(default = "default_min_size")]
    pub min_size: f32,
    #[serde(default = "default_restitution")]
    pub restitution: f32,
    #[serde(default = "default_friction")]
    pub friction: f32,
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness: f32,
    /// Stacking order of elements while the overlay is active
    #[serde(default = "default_z_index")]
    pub z_index: i32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            min_size: default_min_size(),
            restitution: default_restitution(),
            friction: default_friction(),
            wall_thickness: default_wall_thickness(),
            z_index: default_z_index(),
        }
    }
}

/// Pose written to one element on one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BodyFrame {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
}

struct Captured {
    node: NodeId,
    body: BodyId,
    origin: Point,
    snapshot: ElementStyle,
}

/// Active overlay; pass back to [`PhysicsOverlay::deactivate`]
pub struct OverlayHandle {
    captured: Vec<Captured>,
}

impl OverlayHandle {
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.captured.iter().map(|c| c.node)
    }

    pub fn len(&self) -> usize {
        self.captured.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.is_empty()
    }
}

/// Physics overlay bound to one engine
pub struct PhysicsOverlay<E: RigidBodyEngine> {
    engine: E,
    config: OverlayConfig,
}

impl<E: RigidBodyEngine> PhysicsOverlay<E> {
    pub fn new(engine: E, config: OverlayConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Capture every element matching `selector` and hand it to the engine
    pub fn activate(
        &mut self,
        tree: &mut NodeTree,
        selector: &Selector,
        viewport: Size,
    ) -> OverlayHandle {
        let min = self.config.min_size;
        let candidates: Vec<NodeId> = tree
            .select(selector)
            .into_iter()
            .filter(|id| {
                tree.get(*id)
                    .is_some_and(|e| e.bounds.width() >= min && e.bounds.height() >= min)
            })
            .collect();

        let mut captured = Vec::with_capacity(candidates.len());
        for node in candidates {
            let Some(element) = tree.get_mut(node) else {
                continue;
            };
            let bounds = element.bounds;
            let body = self.engine.add_body(BodyDesc {
                bounds,
                restitution: self.config.restitution,
                friction: self.config.friction,
            });
            captured.push(Captured {
                node,
                body,
                origin: bounds.center(),
                snapshot: element.style.clone(),
            });

            element.style.position = Positioning::Fixed;
            element.style.z_index = Some(self.config.z_index);
            element.style.pointer_events = false;
        }

        let (w, h, t) = (viewport.width, viewport.height, self.config.wall_thickness);
        self.engine.add_static(Rect::new(-w / 2.0, h, w * 2.0, t));
        self.engine.add_static(Rect::new(-t, -h / 2.0, t, h * 2.0));
        self.engine.add_static(Rect::new(w, -h / 2.0, t, h * 2.0));

        debug!(bodies = captured.len(), selector = selector.as_str(), "physics overlay activated");
        OverlayHandle { captured }
    }

    /// Step the engine and write body poses into element transforms
    pub fn on_frame(
        &mut self,
        handle: &OverlayHandle,
        tree: &mut NodeTree,
        dt: f32,
    ) -> Vec<BodyFrame> {
        if dt.is_finite() && dt > 0.0 {
            self.engine.step(dt);
        }
        let mut frames = Vec::with_capacity(handle.captured.len());
        for item in &handle.captured {
            let Some(pose) = self.engine.pose(item.body) else {
                continue;
            };
            if !pose.position.is_finite() || !pose.angle.is_finite() {
                trace!(node = ?item.node, "skipping non-finite body pose");
                continue;
            }
            if let Some(element) = tree.get_mut(item.node) {
                let transform = &mut element.style.transform;
                transform.translate = Vec2::new(
                    pose.position.x - item.origin.x,
                    pose.position.y - item.origin.y,
                );
                transform.rotation = pose.angle;
            }
            frames.push(BodyFrame {
                id: item.node,
                x: pose.position.x,
                y: pose.position.y,
                rotation: pose.angle,
            });
        }
        frames
    }

    /// Clear the engine and restore every captured element
    pub fn deactivate(&mut self, handle: OverlayHandle, tree: &mut NodeTree) {
        self.engine.clear();
        for item in handle.captured {
            if let Some(element) = tree.get_mut(item.node) {
                element.style = item.snapshot;
            }
        }
        debug!("physics overlay deactivated");
    }
}
