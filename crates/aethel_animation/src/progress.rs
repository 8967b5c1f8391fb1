//! Scroll progress sources
//!
//! Turns raw scroll geometry into the progress scalar consumed by
//! [`ScrollMapper`](crate::scroll::ScrollMapper). Three modes exist:
//!
//! - **Page**: `scroll_y / (content_height - viewport_height)`
//! - **Absolute**: raw `scroll_y` in pixels, for ranges like `[0, 500]` px
//! - **Target**: progress of one element through the viewport, described by
//!   two [`ScrollOffset`]s such as `"start 0.8"` and `"end 0.2"`
//!
//! An offset pairs an edge of the target with an edge of the viewport. The
//! offset is crossed when the two edges line up, so the scroll position at
//! which that happens is
//! `top + target_edge * height - viewport_edge * viewport_height`.

use crate::error::{AnimationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A position along an element or the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    /// Fraction of the length: `start` = 0, `center` = 0.5, `end` = 1
    Fraction(f32),
    /// Pixels from the leading edge
    Pixels(f32),
}

impl Edge {
    pub const START: Edge = Edge::Fraction(0.0);
    pub const CENTER: Edge = Edge::Fraction(0.5);
    pub const END: Edge = Edge::Fraction(1.0);

    /// Distance from the leading edge for an element of `length` pixels
    pub fn resolve(&self, length: f32) -> f32 {
        match *self {
            Edge::Fraction(f) => f * length,
            Edge::Pixels(px) => px,
        }
    }
}

impl FromStr for Edge {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AnimationError::InvalidOffset(s.to_string());
        let token = s.trim();
        let edge = match token {
            "start" => Edge::START,
            "center" => Edge::CENTER,
            "end" => Edge::END,
            _ => {
                if let Some(px) = token.strip_suffix("px") {
                    Edge::Pixels(px.trim().parse().map_err(|_| invalid())?)
                } else if let Some(pct) = token.strip_suffix('%') {
                    let pct: f32 = pct.trim().parse().map_err(|_| invalid())?;
                    Edge::Fraction(pct / 100.0)
                } else {
                    Edge::Fraction(token.parse().map_err(|_| invalid())?)
                }
            }
        };
        match edge {
            Edge::Fraction(v) | Edge::Pixels(v) if !v.is_finite() => Err(invalid()),
            _ => Ok(edge),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Edge::Fraction(v) if v == 0.0 => f.write_str("start"),
            Edge::Fraction(v) if v == 0.5 => f.write_str("center"),
            Edge::Fraction(v) if v == 1.0 => f.write_str("end"),
            Edge::Fraction(v) => write!(f, "{v}"),
            Edge::Pixels(v) => write!(f, "{v}px"),
        }
    }
}

/// Where a target edge meets a viewport edge
///
/// Parsed from `"<target> <viewport>"`; a single token uses the same edge
/// for both.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScrollOffset {
    pub target: Edge,
    pub viewport: Edge,
}

impl ScrollOffset {
    /// Target top meets viewport top
    pub const START_START: ScrollOffset = ScrollOffset::new(Edge::START, Edge::START);
    /// Target bottom meets viewport bottom
    pub const END_END: ScrollOffset = ScrollOffset::new(Edge::END, Edge::END);
    /// Target top enters at viewport bottom
    pub const START_END: ScrollOffset = ScrollOffset::new(Edge::START, Edge::END);
    /// Target bottom leaves at viewport top
    pub const END_START: ScrollOffset = ScrollOffset::new(Edge::END, Edge::START);

    pub const fn new(target: Edge, viewport: Edge) -> Self {
        Self { target, viewport }
    }

    /// Scroll position at which this offset is crossed
    pub fn scroll_position(&self, bounds: TargetBounds, viewport_height: f32) -> f32 {
        bounds.top + self.target.resolve(bounds.height) - self.viewport.resolve(viewport_height)
    }
}

impl FromStr for ScrollOffset {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let target: Edge = parts
            .next()
            .ok_or_else(|| AnimationError::InvalidOffset(s.to_string()))?
            .parse()?;
        let viewport = match parts.next() {
            Some(token) => token.parse()?,
            None => target,
        };
        if parts.next().is_some() {
            return Err(AnimationError::InvalidOffset(s.to_string()));
        }
        Ok(Self { target, viewport })
    }
}

impl TryFrom<String> for ScrollOffset {
    type Error = AnimationError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ScrollOffset> for String {
    fn from(offset: ScrollOffset) -> Self {
        offset.to_string()
    }
}

impl fmt::Display for ScrollOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.target, self.viewport)
    }
}

/// Scroll state of the page
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollGeometry {
    pub scroll_y: f32,
    pub viewport_height: f32,
    pub content_height: f32,
}

impl ScrollGeometry {
    pub fn max_scroll(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }
}

/// Document-space vertical extent of a tracked element
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetBounds {
    pub top: f32,
    pub height: f32,
}

/// How progress is derived from scroll geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollProgressSource {
    /// Whole page, 0 at the top and 1 at the bottom
    Page,
    /// Raw scroll position in pixels
    Absolute,
    /// Passage of one element between two offsets
    Target {
        bounds: TargetBounds,
        offsets: [ScrollOffset; 2],
    },
}

impl ScrollProgressSource {
    /// Element tracking with the default `["start end", "end start"]` offsets
    pub fn target(bounds: TargetBounds) -> Self {
        Self::Target {
            bounds,
            offsets: [ScrollOffset::START_END, ScrollOffset::END_START],
        }
    }

    pub fn target_with(bounds: TargetBounds, offsets: [ScrollOffset; 2]) -> Self {
        Self::Target { bounds, offsets }
    }

    /// Progress for the given geometry; `Page` and `Target` are clamped to
    /// `[0, 1]`, non-finite input yields `None`
    pub fn progress(&self, geometry: &ScrollGeometry) -> Option<f32> {
        let scroll = geometry.scroll_y;
        if !scroll.is_finite() {
            return None;
        }
        let progress = match self {
            ScrollProgressSource::Absolute => scroll,
            ScrollProgressSource::Page => {
                let max = geometry.max_scroll();
                if max <= 0.0 {
                    0.0
                } else {
                    (scroll / max).clamp(0.0, 1.0)
                }
            }
            ScrollProgressSource::Target { bounds, offsets } => {
                let s0 = offsets[0].scroll_position(*bounds, geometry.viewport_height);
                let s1 = offsets[1].scroll_position(*bounds, geometry.viewport_height);
                let span = s1 - s0;
                if span.abs() <= f32::EPSILON {
                    if scroll >= s0 {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    ((scroll - s0) / span).clamp(0.0, 1.0)
                }
            }
        };
        progress.is_finite().then_some(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(scroll_y: f32) -> ScrollGeometry {
        ScrollGeometry {
            scroll_y,
            viewport_height: 1000.0,
            content_height: 5000.0,
        }
    }

    #[test]
    fn parses_named_and_numeric_offsets() {
        let offset: ScrollOffset = "start 0.8".parse().unwrap();
        assert_eq!(offset, ScrollOffset::new(Edge::START, Edge::Fraction(0.8)));

        assert_eq!("end end".parse::<ScrollOffset>().unwrap(), ScrollOffset::END_END);
        assert_eq!(
            "center".parse::<ScrollOffset>().unwrap(),
            ScrollOffset::new(Edge::CENTER, Edge::CENTER)
        );
        assert_eq!(
            "100px 50%".parse::<ScrollOffset>().unwrap(),
            ScrollOffset::new(Edge::Pixels(100.0), Edge::Fraction(0.5))
        );
    }

    #[test]
    fn rejects_malformed_offsets() {
        for bad in ["", "middle", "start end start", "12pt", "NaN", "inf"] {
            assert!(
                matches!(
                    bad.parse::<ScrollOffset>(),
                    Err(AnimationError::InvalidOffset(_))
                ),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn offsets_deserialize_from_strings() {
        let offsets: [ScrollOffset; 2] = serde_json::from_str(r#"["start 0.8", "end 0.2"]"#).unwrap();
        assert_eq!(offsets[1], ScrollOffset::new(Edge::END, Edge::Fraction(0.2)));
        assert_eq!(offsets[0].to_string(), "start 0.8");
    }

    #[test]
    fn page_progress() {
        let source = ScrollProgressSource::Page;
        assert_eq!(source.progress(&geometry(0.0)), Some(0.0));
        assert_eq!(source.progress(&geometry(2000.0)), Some(0.5));
        assert_eq!(source.progress(&geometry(9000.0)), Some(1.0));
        assert_eq!(source.progress(&geometry(f32::NAN)), None);

        let short = ScrollGeometry {
            scroll_y: 0.0,
            viewport_height: 1000.0,
            content_height: 600.0,
        };
        assert_eq!(source.progress(&short), Some(0.0));
    }

    #[test]
    fn absolute_progress_is_raw_pixels() {
        assert_eq!(
            ScrollProgressSource::Absolute.progress(&geometry(250.0)),
            Some(250.0)
        );
    }

    #[test]
    fn target_progress_between_offsets() {
        // section at 2000..3000 px, revealed from "start 0.8" to "end 0.2"
        let bounds = TargetBounds {
            top: 2000.0,
            height: 1000.0,
        };
        let offsets = ["start 0.8".parse().unwrap(), "end 0.2".parse().unwrap()];
        let source = ScrollProgressSource::target_with(bounds, offsets);

        // s0 = 2000 - 800 = 1200, s1 = 3000 - 200 = 2800
        assert_eq!(source.progress(&geometry(1200.0)), Some(0.0));
        assert_eq!(source.progress(&geometry(2000.0)), Some(0.5));
        assert_eq!(source.progress(&geometry(2800.0)), Some(1.0));
        assert_eq!(source.progress(&geometry(0.0)), Some(0.0));
        assert_eq!(source.progress(&geometry(4000.0)), Some(1.0));
    }

    #[test]
    fn sticky_container_progress() {
        // 300vh carousel container pinned with "start start" / "end end"
        let bounds = TargetBounds {
            top: 1000.0,
            height: 3000.0,
        };
        let source = ScrollProgressSource::target_with(
            bounds,
            [ScrollOffset::START_START, ScrollOffset::END_END],
        );
        assert_eq!(source.progress(&geometry(1000.0)), Some(0.0));
        assert_eq!(source.progress(&geometry(2000.0)), Some(0.5));
        assert_eq!(source.progress(&geometry(3000.0)), Some(1.0));
    }

    #[test]
    fn degenerate_target_span_is_a_step() {
        let bounds = TargetBounds {
            top: 500.0,
            height: 0.0,
        };
        let source = ScrollProgressSource::target_with(
            bounds,
            [ScrollOffset::START_START, ScrollOffset::END_START],
        );
        assert_eq!(source.progress(&geometry(499.0)), Some(0.0));
        assert_eq!(source.progress(&geometry(500.0)), Some(1.0));
    }
}
