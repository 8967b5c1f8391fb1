//! Element tree
//!
//! A minimal retained tree of page elements. Motion components never own
//! elements; they look them up by [`NodeId`], read bounds for hit-testing and
//! magnetic centres, and write [`ElementStyle`] back when they animate.
//!
//! Selectors cover the subset the motion layer needs: tag names, `.class`,
//! `[role=value]`, compounds of those (`a.nav`), `*`, and comma lists.

use crate::error::{CoreError, Result};
use crate::geometry::{Point, Rect, Vec2};
use serde::Serialize;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::str::FromStr;

new_key_type! {
    pub struct NodeId;
}

/// CSS-like positioning mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Positioning {
    #[default]
    Static,
    Relative,
    Fixed,
}

/// 2D transform applied on top of layout
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Transform {
    pub translate: Vec2,
    pub scale: f32,
    /// Rotation in radians
    pub rotation: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate: Vec2::ZERO,
        scale: 1.0,
        rotation: 0.0,
    };

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translate: Vec2::new(x, y),
            ..Self::IDENTITY
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Visual properties written by animations
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElementStyle {
    pub transform: Transform,
    pub position: Positioning,
    pub z_index: Option<i32>,
    pub opacity: f32,
    /// Element participates in hit-testing
    pub pointer_events: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            transform: Transform::IDENTITY,
            position: Positioning::Static,
            z_index: None,
            opacity: 1.0,
            pointer_events: true,
        }
    }
}

/// A page element
#[derive(Clone, Debug)]
pub struct Element {
    pub tag: String,
    pub classes: SmallVec<[String; 2]>,
    pub role: Option<String>,
    pub bounds: Rect,
    pub style: ElementStyle,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: SmallVec::new(),
            role: None,
            bounds: Rect::ZERO,
            style: ElementStyle::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder: add a class
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder: set the ARIA role
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Builder: set layout bounds in viewport coordinates
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Builder: exclude from hit-testing
    pub fn no_pointer_events(mut self) -> Self {
        self.style.pointer_events = false;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// One compound selector, e.g. `a.nav[role=button]`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    role: Option<String>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(&element.tag) {
                return false;
            }
        }
        if let Some(role) = &self.role {
            if element.role.as_deref() != Some(role.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| element.has_class(c))
    }

    fn parse(text: &str) -> Option<Self> {
        let mut compound = Compound::default();
        let mut rest = text;

        let tag_len = rest
            .find(|c: char| c == '.' || c == '[')
            .unwrap_or(rest.len());
        let tag = &rest[..tag_len];
        if !tag.is_empty() && tag != "*" {
            if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return None;
            }
            compound.tag = Some(tag.to_string());
        }
        rest = &rest[tag_len..];

        while !rest.is_empty() {
            if let Some(after_dot) = rest.strip_prefix('.') {
                let len = after_dot
                    .find(|c: char| c == '.' || c == '[')
                    .unwrap_or(after_dot.len());
                let class = &after_dot[..len];
                if class.is_empty() {
                    return None;
                }
                compound.classes.push(class.to_string());
                rest = &after_dot[len..];
            } else if let Some(after_bracket) = rest.strip_prefix('[') {
                let close = after_bracket.find(']')?;
                let (name, value) = after_bracket[..close].split_once('=')?;
                if name.trim() != "role" {
                    return None;
                }
                let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                if value.is_empty() {
                    return None;
                }
                compound.role = Some(value.to_string());
                rest = &after_bracket[close + 1..];
            } else {
                return None;
            }
        }

        Some(compound)
    }
}

/// Comma-separated list of compound selectors; matches if any entry matches
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    compounds: Vec<Compound>,
}

impl Selector {
    pub fn matches(&self, element: &Element) -> bool {
        self.compounds.iter().any(|c| c.matches(element))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let compounds = s
            .split(',')
            .map(str::trim)
            .map(|part| {
                if part.is_empty() {
                    None
                } else {
                    Compound::parse(part)
                }
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| CoreError::InvalidSelector(s.to_string()))?;

        Ok(Self {
            source: s.trim().to_string(),
            compounds,
        })
    }
}

/// Path from a target element up to its root, target first
pub type NodePath = SmallVec<[NodeId; 8]>;

/// Retained element tree
#[derive(Default)]
pub struct NodeTree {
    nodes: SlotMap<NodeId, Element>,
    roots: Vec<NodeId>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element, optionally under `parent`
    pub fn insert(&mut self, parent: Option<NodeId>, mut element: Element) -> Result<NodeId> {
        if let Some(parent) = parent {
            if !self.nodes.contains_key(parent) {
                return Err(CoreError::UnknownNode);
            }
        }
        element.parent = parent;
        element.children.clear();
        let id = self.nodes.insert(element);
        match parent {
            Some(parent) => self.nodes[parent].children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    /// Remove an element and its whole subtree
    pub fn remove(&mut self, id: NodeId) -> Option<Element> {
        let element = self.nodes.remove(id)?;
        match element.parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent) => parent.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
        for child in element.children.clone() {
            self.remove(child);
        }
        Some(element)
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The element and all its ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Element)> + '_ {
        let mut next = Some(id);
        std::iter::from_fn(move || {
            let current = next?;
            let element = self.nodes.get(current)?;
            next = element.parent;
            Some((current, element))
        })
    }

    pub fn path(&self, id: NodeId) -> NodePath {
        self.ancestors(id).map(|(id, _)| id).collect()
    }

    /// Nearest element on the path (self included) that matches `selector`
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        self.ancestors(id)
            .find(|(_, element)| selector.matches(element))
            .map(|(id, _)| id)
    }

    /// `id` and every descendant, parents before children
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.nodes.get(current) {
                out.push(current);
                stack.extend(element.children.iter().rev());
            }
        }
        out
    }

    /// All elements matching `selector`, in document order
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.collect_matching(*root, selector, &mut out);
        }
        out
    }

    fn collect_matching(&self, id: NodeId, selector: &Selector, out: &mut Vec<NodeId>) {
        let Some(element) = self.nodes.get(id) else {
            return;
        };
        if selector.matches(element) {
            out.push(id);
        }
        for child in &element.children {
            self.collect_matching(*child, selector, out);
        }
    }

    /// Topmost, deepest element under `point`
    ///
    /// Later siblings paint over earlier ones, so they are tested first.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.roots
            .iter()
            .rev()
            .find_map(|root| self.hit_test_node(*root, point))
    }

    fn hit_test_node(&self, id: NodeId, point: Point) -> Option<NodeId> {
        let element = self.nodes.get(id)?;
        if let Some(hit) = element
            .children
            .iter()
            .rev()
            .find_map(|child| self.hit_test_node(*child, point))
        {
            return Some(hit);
        }
        (element.style.pointer_events && element.bounds.contains(point)).then_some(id)
    }
}
