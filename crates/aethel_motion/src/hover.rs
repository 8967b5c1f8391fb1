//! Hover classification
//!
//! Decides how the cursor should look over a given element. Categories are
//! tested in precedence order against the hovered element and every ancestor;
//! the first category matched anywhere on the path wins. Nothing matched
//! means the fallback category.

use crate::error::{MotionError, Result};
use aethel_core::{NodeId, NodeTree, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cursor appearance for one kind of hover target
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoverCategory {
    pub name: String,
    /// Selector list (`tag`, `.class`, `[role=...]`, comma separated)
    #[serde(default)]
    pub selector: String,
    /// Cursor diameter in pixels
    pub size: f32,
    /// Corner radius in pixels; `None` keeps the cursor round
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f32>,
    /// Text shown inside the cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl HoverCategory {
    pub fn new(name: impl Into<String>, selector: impl Into<String>, size: f32) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
            size,
            corner_radius: None,
            label: None,
        }
    }

    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Links, buttons and anything marked interactive
    pub fn interactive() -> Self {
        Self::new("interactive", "a, button, [role=button], .interactive", 80.0)
    }

    /// Project cards: larger square-ish cursor with a label
    pub fn project() -> Self {
        Self::new("project", ".project-card", 100.0)
            .corner_radius(12.0)
            .label("View")
    }

    /// Plain small dot
    pub fn none() -> Self {
        Self::new("none", "", 16.0)
    }

    /// Radius the cursor should animate toward at `size`
    pub fn target_radius(&self) -> f32 {
        match self.corner_radius {
            Some(radius) => radius.min(self.size / 2.0),
            None => self.size / 2.0,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MotionError::EmptyCategoryName);
        }
        let radius_ok = self.corner_radius.map_or(true, |r| r.is_finite() && r >= 0.0);
        if !self.size.is_finite() || self.size < 0.0 || !radius_ok {
            return Err(MotionError::InvalidCategorySize {
                name: self.name.clone(),
                size: self.size,
            });
        }
        Ok(())
    }
}

/// Ordered category list plus the fallback
#[derive(Clone, Debug)]
pub struct HoverClassifier {
    categories: Vec<(HoverCategory, Selector)>,
    fallback: HoverCategory,
}

impl HoverClassifier {
    /// Compile `categories` (highest precedence first)
    pub fn new(categories: Vec<HoverCategory>, fallback: HoverCategory) -> Result<Self> {
        fallback.validate()?;
        let categories = categories
            .into_iter()
            .map(|category| {
                category.validate()?;
                let selector: Selector = category.selector.parse()?;
                Ok((category, selector))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            categories,
            fallback,
        })
    }

    pub fn categories(&self) -> impl Iterator<Item = &HoverCategory> {
        self.categories.iter().map(|(c, _)| c)
    }

    pub fn fallback(&self) -> &HoverCategory {
        &self.fallback
    }

    /// Category for a hover path (target first, then ancestors)
    pub fn classify(&self, path: &[NodeId], tree: &NodeTree) -> &HoverCategory {
        let matched = self.categories.iter().find(|(_, selector)| {
            path.iter()
                .filter_map(|id| tree.get(*id))
                .any(|element| selector.matches(element))
        });
        match matched {
            Some((category, _)) => {
                debug!(category = %category.name, "hover classified");
                category
            }
            None => &self.fallback,
        }
    }
}

impl Default for HoverClassifier {
    /// `interactive` over `project`, falling back to `none`
    fn default() -> Self {
        Self::new(
            vec![HoverCategory::interactive(), HoverCategory::project()],
            HoverCategory::none(),
        )
        .unwrap_or_else(|_| Self {
            categories: Vec::new(),
            fallback: HoverCategory::none(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aethel_core::{Element, Rect};

    fn tree_with_link_in_card() -> (NodeTree, NodeId, NodeId, NodeId) {
        let mut tree = NodeTree::new();
        let card = tree
            .insert(
                None,
                Element::new("div")
                    .class("project-card")
                    .bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
            )
            .unwrap();
        let title = tree
            .insert(Some(card), Element::new("h3").bounds(Rect::new(10.0, 10.0, 200.0, 40.0)))
            .unwrap();
        let link = tree
            .insert(Some(card), Element::new("a").bounds(Rect::new(10.0, 200.0, 80.0, 20.0)))
            .unwrap();
        (tree, card, title, link)
    }

    #[test]
    fn ancestors_are_matched() {
        let (tree, _, title, _) = tree_with_link_in_card();
        let classifier = HoverClassifier::default();
        let category = classifier.classify(&tree.path(title), &tree);
        assert_eq!(category.name, "project");
        assert_eq!(category.label.as_deref(), Some("View"));
    }

    #[test]
    fn precedence_beats_nesting_depth() {
        let (tree, _, _, link) = tree_with_link_in_card();
        let classifier = HoverClassifier::default();
        assert_eq!(classifier.classify(&tree.path(link), &tree).name, "interactive");

        // same path, project listed first
        let reordered = HoverClassifier::new(
            vec![HoverCategory::project(), HoverCategory::interactive()],
            HoverCategory::none(),
        )
        .unwrap();
        assert_eq!(reordered.classify(&tree.path(link), &tree).name, "project");
    }

    #[test]
    fn empty_path_falls_back() {
        let (tree, ..) = tree_with_link_in_card();
        let classifier = HoverClassifier::default();
        let category = classifier.classify(&[], &tree);
        assert_eq!(category.name, "none");
        assert_eq!(category.size, 16.0);
        assert_eq!(category.target_radius(), 8.0);
    }

    #[test]
    fn role_matching() {
        let mut tree = NodeTree::new();
        let div = tree
            .insert(None, Element::new("div").role("button"))
            .unwrap();
        let classifier = HoverClassifier::default();
        assert_eq!(classifier.classify(&tree.path(div), &tree).name, "interactive");
    }

    #[test]
    fn invalid_categories_are_rejected() {
        let unnamed = HoverCategory::new(" ", "a", 10.0);
        assert_eq!(
            HoverClassifier::new(vec![unnamed], HoverCategory::none()).unwrap_err(),
            MotionError::EmptyCategoryName
        );

        let negative = HoverCategory::new("tiny", "a", -1.0);
        assert!(matches!(
            HoverClassifier::new(vec![negative], HoverCategory::none()),
            Err(MotionError::InvalidCategorySize { .. })
        ));

        let bad_selector = HoverCategory::new("broken", "[role=", 10.0);
        assert!(matches!(
            HoverClassifier::new(vec![bad_selector], HoverCategory::none()),
            Err(MotionError::Core(_))
        ));
    }

    #[test]
    fn categories_deserialize() {
        let category: HoverCategory = serde_json::from_str(
            r#"{ "name": "project", "selector": ".project-card", "size": 100, "corner_radius": 12, "label": "View" }"#,
        )
        .unwrap();
        assert_eq!(category, HoverCategory::project());
    }
}
