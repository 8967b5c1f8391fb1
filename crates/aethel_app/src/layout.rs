//! Page layout
//!
//! A fixed, hand-laid page: nav bar, hero, about copy, pinned work carousel,
//! skills cloud and footer. Boxes are computed once per viewport size in document space
//! and resolved to viewport space on every scroll, which is what hit-testing
//! and magnetic centres read.
//!
//! Element bounds include the carousel track shift for the cards riding on
//! it; the track's own shift lives in its style transform.

use crate::config::SiteConfig;
use aethel_animation::TargetBounds;
use aethel_core::{Element, Rect, Size};

const NAV_HEIGHT: f32 = 96.0;
const NAV_PADDING: f32 = 48.0;
const NAV_ITEM_WIDTH: f32 = 80.0;
const NAV_ITEM_GAP: f32 = 40.0;

const ABOUT_PADDING_Y: f32 = 160.0;
const ABOUT_PADDING_X: f32 = 96.0;
const ABOUT_MAX_WIDTH: f32 = 1152.0;
const ABOUT_LABEL_SPACE: f32 = 64.0;

const CARD_GAP: f32 = 80.0;

const SKILLS_PADDING_Y: f32 = 128.0;
const SKILLS_HEADING_HEIGHT: f32 = 72.0;
const SKILLS_HEADING_GAP: f32 = 80.0;
const CLOUD_HEIGHT: f32 = 600.0;
const CLOUD_MAX_WIDTH: f32 = 1152.0;
const CHIP_GAP: f32 = 24.0;
const CHIP_PADDING_X: f32 = 32.0;
const CHIP_HEIGHT: f32 = 64.0;
const CHIP_FONT: f32 = 24.0;

/// How a document rect maps into the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Pinned to the viewport
    Fixed,
    /// Scrolls with the document
    Flow,
    /// Pinned while `container` passes; the rect is relative to the pinned
    /// viewport-sized box
    Sticky { container: TargetBounds },
}

/// One element of the page
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutBox {
    /// Stable name, e.g. `nav.work` or `about.word.3`
    pub key: String,
    /// Index of the parent box
    pub parent: Option<usize>,
    pub tag: &'static str,
    pub classes: Vec<&'static str>,
    pub role: Option<&'static str>,
    pub rect: Rect,
    pub anchor: Anchor,
    /// Follows the carousel track translation
    pub on_track: bool,
}

impl LayoutBox {
    fn new(key: impl Into<String>, tag: &'static str, rect: Rect, anchor: Anchor) -> Self {
        Self {
            key: key.into(),
            parent: None,
            tag,
            classes: Vec::new(),
            role: None,
            rect,
            anchor,
            on_track: false,
        }
    }

    fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    fn child_of(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    fn role(mut self, role: &'static str) -> Self {
        self.role = Some(role);
        self
    }

    fn on_track(mut self) -> Self {
        self.on_track = true;
        self
    }

    /// Element to insert into the tree; bounds are filled in on relayout
    pub fn element(&self) -> Element {
        let mut element = Element::new(self.tag);
        for class in &self.classes {
            element = element.class(*class);
        }
        if let Some(role) = self.role {
            element = element.role(role);
        }
        element
    }
}

/// Laid-out page for one viewport size
#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    pub boxes: Vec<LayoutBox>,
    pub about: TargetBounds,
    pub work: TargetBounds,
    pub skills: TargetBounds,
    pub track_width: f32,
    pub content_height: f32,
}

/// URL-style slug for a nav label
pub fn slug(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

fn push(boxes: &mut Vec<LayoutBox>, layout_box: LayoutBox) -> usize {
    boxes.push(layout_box);
    boxes.len() - 1
}

/// Greedy wrap of chip widths into rows no wider than `width`
fn chip_rows<'a>(labels: impl Iterator<Item = &'a str>, width: f32) -> Vec<Vec<f32>> {
    let mut rows: Vec<Vec<f32>> = Vec::new();
    let mut used = 0.0;
    for label in labels {
        let chip = (label.chars().count() as f32 * 0.55 * CHIP_FONT + 2.0 * CHIP_PADDING_X)
            .min(width);
        match rows.last_mut() {
            Some(row) if used + CHIP_GAP + chip <= width => {
                row.push(chip);
                used += CHIP_GAP + chip;
            }
            _ => {
                rows.push(vec![chip]);
                used = chip;
            }
        }
    }
    rows
}

impl PageLayout {
    pub fn compute(config: &SiteConfig, viewport: Size) -> Self {
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        let mut boxes = Vec::new();

        // hero
        let hero = push(
            &mut boxes,
            LayoutBox::new("hero", "section", Rect::new(0.0, 0.0, w, h), Anchor::Flow),
        );
        let line_height = 0.1 * w;
        let content = push(
            &mut boxes,
            LayoutBox::new(
                "hero.content",
                "div",
                Rect::new(0.1 * w, 0.5 * h - line_height, 0.8 * w, 2.0 * line_height + 96.0),
                Anchor::Flow,
            )
            .child_of(hero),
        );
        push(
            &mut boxes,
            LayoutBox::new(
                "hero.line_1",
                "h1",
                Rect::new(0.1 * w, 0.5 * h - line_height, 0.8 * w, line_height),
                Anchor::Flow,
            )
            .class("hero-letter")
            .child_of(content),
        );
        push(
            &mut boxes,
            LayoutBox::new(
                "hero.line_2",
                "h1",
                Rect::new(0.1 * w, 0.5 * h - 0.04 * w, 0.8 * w, line_height),
                Anchor::Flow,
            )
            .class("hero-letter")
            .child_of(content),
        );
        push(
            &mut boxes,
            LayoutBox::new(
                "hero.hint",
                "div",
                Rect::new(0.5 * w - 60.0, h - 40.0 - 80.0, 120.0, 80.0),
                Anchor::Flow,
            )
            .child_of(hero),
        );

        // about: words flow left to right inside a centred column
        let about_top = h;
        let column = (w - 2.0 * ABOUT_PADDING_X).min(ABOUT_MAX_WIDTH).max(1.0);
        let column_x = (w - column) / 2.0;
        let font = config.about.font_size.max(1.0);
        let gap_x = 0.3 * font;
        let row_height = 1.2 * font;
        let words_top = about_top + ABOUT_PADDING_Y + ABOUT_LABEL_SPACE;

        let about = push(
            &mut boxes,
            LayoutBox::new("about", "section", Rect::ZERO, Anchor::Flow),
        );
        push(
            &mut boxes,
            LayoutBox::new(
                "about.label",
                "span",
                Rect::new(column_x, about_top + ABOUT_PADDING_Y, 160.0, 16.0),
                Anchor::Flow,
            )
            .child_of(about),
        );
        let (mut x, mut row) = (0.0_f32, 0usize);
        for (i, word) in config.about.words().enumerate() {
            let width = (word.chars().count() as f32 * 0.55 * font).min(column);
            if x > 0.0 && x + width > column {
                x = 0.0;
                row += 1;
            }
            push(
                &mut boxes,
                LayoutBox::new(
                    format!("about.word.{i}"),
                    "span",
                    Rect::new(
                        column_x + x,
                        words_top + row as f32 * row_height,
                        width,
                        1.1 * font,
                    ),
                    Anchor::Flow,
                )
                .class("word")
                .child_of(about),
            );
            x += width + gap_x;
        }
        let text_height = (row + 1) as f32 * row_height;
        let about_height = h.max(2.0 * ABOUT_PADDING_Y + ABOUT_LABEL_SPACE + text_height);
        boxes[about].rect = Rect::new(0.0, about_top, w, about_height);

        // work: a tall container whose inner box stays pinned
        let work = TargetBounds {
            top: about_top + about_height,
            height: (config.work.container_vh * h).max(h),
        };
        let pinned = Anchor::Sticky { container: work };
        let card_h = (1.25 * 0.35 * w).min(0.8 * h);
        let card_w = card_h / 1.25;
        let cards = config.work.projects.len();
        let track_width = 0.4 * w
            + cards as f32 * card_w
            + cards.saturating_sub(1) as f32 * CARD_GAP
            + 0.2 * w;

        let container = push(
            &mut boxes,
            LayoutBox::new("work", "div", Rect::new(0.0, work.top, w, work.height), Anchor::Flow),
        );
        let pin = push(
            &mut boxes,
            LayoutBox::new("work.pin", "div", Rect::new(0.0, 0.0, w, h), pinned)
                .child_of(container),
        );
        push(
            &mut boxes,
            LayoutBox::new("work.heading", "h2", Rect::new(80.0, 80.0, 0.3 * w, 0.2 * h), pinned)
                .child_of(pin),
        );
        let track = push(
            &mut boxes,
            LayoutBox::new(
                "work.track",
                "div",
                Rect::new(0.0, (h - card_h) / 2.0, track_width, card_h),
                pinned,
            )
            .child_of(pin),
        );
        for i in 0..cards {
            push(
                &mut boxes,
                LayoutBox::new(
                    format!("work.card.{i}"),
                    "article",
                    Rect::new(
                        0.4 * w + i as f32 * (card_w + CARD_GAP),
                        (h - card_h) / 2.0,
                        card_w,
                        card_h,
                    ),
                    pinned,
                )
                .class("project-card")
                .class("glass")
                .child_of(track)
                .on_track(),
            );
        }

        // skills: chips wrap into centred rows inside a fixed-height cloud
        let skills = TargetBounds {
            top: work.top + work.height,
            height: h.max(
                2.0 * SKILLS_PADDING_Y
                    + SKILLS_HEADING_HEIGHT
                    + 2.0 * SKILLS_HEADING_GAP
                    + CLOUD_HEIGHT,
            ),
        };
        let section = push(
            &mut boxes,
            LayoutBox::new(
                "skills",
                "section",
                Rect::new(0.0, skills.top, w, skills.height),
                Anchor::Flow,
            ),
        );
        push(
            &mut boxes,
            LayoutBox::new(
                "skills.heading",
                "h2",
                Rect::new(0.1 * w, skills.top + SKILLS_PADDING_Y, 0.8 * w, SKILLS_HEADING_HEIGHT),
                Anchor::Flow,
            )
            .child_of(section),
        );
        let cloud_width = (w - 2.0 * NAV_PADDING).min(CLOUD_MAX_WIDTH).max(1.0);
        let cloud_top =
            skills.top + SKILLS_PADDING_Y + SKILLS_HEADING_HEIGHT + SKILLS_HEADING_GAP;
        let cloud = push(
            &mut boxes,
            LayoutBox::new(
                "skills.cloud",
                "div",
                Rect::new((w - cloud_width) / 2.0, cloud_top, cloud_width, CLOUD_HEIGHT),
                Anchor::Flow,
            )
            .child_of(section),
        );
        let rows = chip_rows(config.skills.items.iter().map(String::as_str), cloud_width);
        let block = rows.len() as f32 * (CHIP_HEIGHT + CHIP_GAP) - CHIP_GAP;
        let mut y = cloud_top + (CLOUD_HEIGHT - block.max(0.0)) / 2.0;
        let mut index = 0;
        for row in rows {
            let row_width = row.iter().sum::<f32>() + (row.len() - 1) as f32 * CHIP_GAP;
            let mut x = (w - row_width) / 2.0;
            for width in row {
                push(
                    &mut boxes,
                    LayoutBox::new(
                        format!("skills.chip.{index}"),
                        "div",
                        Rect::new(x, y, width, CHIP_HEIGHT),
                        Anchor::Flow,
                    )
                    .class("glass")
                    .class("skill")
                    .child_of(cloud),
                );
                x += width + CHIP_GAP;
                index += 1;
            }
            y += CHIP_HEIGHT + CHIP_GAP;
        }

        // footer
        let footer_top = skills.top + skills.height;
        let footer_height = 0.6 * h;
        let footer = push(
            &mut boxes,
            LayoutBox::new(
                "footer",
                "footer",
                Rect::new(0.0, footer_top, w, footer_height),
                Anchor::Flow,
            ),
        );
        push(
            &mut boxes,
            LayoutBox::new(
                "footer.contact",
                "div",
                Rect::new(0.5 * w - 150.0, footer_top + 0.25 * h, 300.0, 60.0),
                Anchor::Flow,
            )
            .role("button")
            .child_of(footer),
        );

        // nav last: it paints over everything and wins hit-tests
        let nav = push(
            &mut boxes,
            LayoutBox::new("nav", "nav", Rect::new(0.0, 0.0, w, NAV_HEIGHT), Anchor::Fixed),
        );
        push(
            &mut boxes,
            LayoutBox::new(
                "nav.logo",
                "div",
                Rect::new(NAV_PADDING, 32.0, 160.0, 32.0),
                Anchor::Fixed,
            )
            .class("logo")
            .child_of(nav),
        );
        let items = config.nav.items.len();
        for (i, label) in config.nav.items.iter().enumerate() {
            let from_right =
                (items - i) as f32 * NAV_ITEM_WIDTH + (items - 1 - i) as f32 * NAV_ITEM_GAP;
            push(
                &mut boxes,
                LayoutBox::new(
                    format!("nav.{}", slug(label)),
                    "a",
                    Rect::new(w - NAV_PADDING - from_right, 36.0, NAV_ITEM_WIDTH, 24.0),
                    Anchor::Fixed,
                )
                .class("nav-link")
                .child_of(nav),
            );
        }

        Self {
            boxes,
            about: TargetBounds {
                top: about_top,
                height: about_height,
            },
            work,
            skills,
            track_width,
            content_height: footer_top + footer_height,
        }
    }

    /// Viewport-space rect of `layout_box` at the given scroll position
    pub fn client_rect(
        &self,
        layout_box: &LayoutBox,
        scroll_y: f32,
        viewport_height: f32,
        track_shift: f32,
    ) -> Rect {
        let rect = layout_box.rect;
        let y = match layout_box.anchor {
            Anchor::Fixed => rect.y(),
            Anchor::Flow => rect.y() - scroll_y,
            Anchor::Sticky { container } => {
                let travel = (container.height - viewport_height).max(0.0);
                let pinned = (scroll_y - container.top).clamp(0.0, travel);
                container.top + pinned + rect.y() - scroll_y
            }
        };
        let x = if layout_box.on_track {
            rect.x() + track_shift
        } else {
            rect.x()
        };
        Rect::new(x, y, rect.width(), rect.height())
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.boxes.iter().position(|b| b.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PageLayout {
        PageLayout::compute(&SiteConfig::default(), Size::new(1440.0, 900.0))
    }

    #[test]
    fn sections_stack_in_document_order() {
        let page = layout();
        assert_eq!(page.about.top, 900.0);
        assert!(page.about.height >= 900.0);
        assert_eq!(page.work.top, page.about.top + page.about.height);
        assert_eq!(page.work.height, 3600.0);
        assert_eq!(page.skills.top, page.work.top + page.work.height);
        assert_eq!(page.skills.height, 1088.0);
        assert_eq!(page.content_height, page.skills.top + page.skills.height + 540.0);
    }

    #[test]
    fn nav_items_are_right_aligned() {
        let page = layout();
        let contact = &page.boxes[page.index_of("nav.contact").unwrap()];
        assert_eq!(contact.rect.x() + contact.rect.width(), 1440.0 - NAV_PADDING);
        let work = &page.boxes[page.index_of("nav.work").unwrap()];
        assert_eq!(work.rect.x(), 1440.0 - NAV_PADDING - 3.0 * 80.0 - 2.0 * 40.0);
        assert_eq!(work.anchor, Anchor::Fixed);
    }

    #[test]
    fn words_wrap_inside_the_column() {
        let page = layout();
        let words: Vec<&LayoutBox> = page
            .boxes
            .iter()
            .filter(|b| b.key.starts_with("about.word."))
            .collect();
        assert_eq!(words.len(), 69);
        let column_x = (1440.0 - 1152.0) / 2.0;
        for word in &words {
            assert!(word.rect.x() >= column_x);
            assert!(word.rect.x() + word.rect.width() <= column_x + 1152.0 + 1e-3);
        }
        // later words never sit above earlier ones
        assert!(words.windows(2).all(|w| w[1].rect.y() >= w[0].rect.y()));
    }

    #[test]
    fn flow_boxes_scroll_and_fixed_boxes_stay() {
        let page = layout();
        let hero = &page.boxes[page.index_of("hero").unwrap()];
        let nav = &page.boxes[page.index_of("nav").unwrap()];
        assert_eq!(page.client_rect(hero, 300.0, 900.0, 0.0).y(), -300.0);
        assert_eq!(page.client_rect(nav, 300.0, 900.0, 0.0).y(), 0.0);
    }

    #[test]
    fn pinned_boxes_hold_while_container_passes() {
        let page = layout();
        let pin = &page.boxes[page.index_of("work.pin").unwrap()];
        let top = page.work.top;
        let y = |scroll: f32| page.client_rect(pin, scroll, 900.0, 0.0).y();

        assert!((y(top - 450.0) - 450.0).abs() < 1e-2);
        assert!(y(top).abs() < 1e-2);
        assert!(y(top + 1500.0).abs() < 1e-2);
        assert!(y(top + 2700.0).abs() < 1e-2);
        // released once the container bottom reaches the viewport bottom
        assert!((y(top + 2800.0) + 100.0).abs() < 1e-2);
    }

    #[test]
    fn cards_ride_the_track() {
        let page = layout();
        let card = &page.boxes[page.index_of("work.card.0").unwrap()];
        let track = &page.boxes[page.index_of("work.track").unwrap()];
        let at_rest = page.client_rect(card, page.work.top, 900.0, 0.0);
        let shifted = page.client_rect(card, page.work.top, 900.0, -500.0);
        assert_eq!(shifted.x(), at_rest.x() - 500.0);
        assert_eq!(page.client_rect(track, page.work.top, 900.0, -500.0).x(), 0.0);
    }

    #[test]
    fn skill_chips_wrap_into_centred_rows() {
        let page = layout();
        let chips: Vec<&LayoutBox> = page
            .boxes
            .iter()
            .filter(|b| b.key.starts_with("skills.chip."))
            .collect();
        assert_eq!(chips.len(), 14);

        let cloud = page.boxes[page.index_of("skills.cloud").unwrap()].rect;
        for chip in &chips {
            assert!(chip.rect.x() >= cloud.x() - 1e-3);
            assert!(chip.rect.x() + chip.rect.width() <= cloud.x() + cloud.width() + 1e-3);
            assert!(chip.rect.y() >= cloud.y());
            assert!(chip.rect.y() + chip.rect.height() <= cloud.y() + cloud.height());
            assert!(chip.classes.contains(&"glass"));
        }
        // the first row is centred on the page
        let first = chips[0].rect;
        let row: Vec<Rect> = chips
            .iter()
            .map(|c| c.rect)
            .filter(|r| r.y() == first.y())
            .collect();
        let last = row[row.len() - 1];
        let left = first.x();
        let right = 1440.0 - (last.x() + last.width());
        assert!((left - right).abs() < 1e-2);
        assert!(row.len() < chips.len());
    }

    #[test]
    fn slugs_are_lowercase_and_dashed() {
        assert_eq!(slug("Work"), "work");
        assert_eq!(slug(" Say Hello "), "say-hello");
    }
}
