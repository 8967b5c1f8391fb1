//! Site configuration file handling
//!
//! Everything the page animates is data: section content, scroll bindings,
//! spring presets and hover categories all live in `aethel.toml`. Every table
//! is optional; a missing table or field falls back to the studio site.

use aethel_animation::{Color, Easing, Edge, MotionValue, ScrollOffset, SpringConfig};
use aethel_core::Size;
use aethel_motion::{
    AmbientConfig, CursorConfig, DragConfig, HoverCategory, HoverClassifier, MagneticConfig,
    OverlayConfig,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up by [`SiteConfig::load_from_dir`]
pub const CONFIG_FILE: &str = "aethel.toml";

/// Top-level site configuration (aethel.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub headless: HeadlessConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub hover: HoverConfig,
    #[serde(default)]
    pub nav: NavConfig,
    #[serde(default)]
    pub ambient: AmbientConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub hero: HeroConfig,
    #[serde(default)]
    pub about: AboutConfig,
    #[serde(default)]
    pub work: WorkConfig,
    #[serde(default)]
    pub skills: SkillsConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// Logical viewport the page is laid out for
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1440.0
}

fn default_height() -> f32 {
    900.0
}

impl ViewportConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Deterministic frame pacing for headless runs
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct HeadlessConfig {
    /// Logical milliseconds between frames
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Snapshot sampling interval in frames
    #[serde(default = "default_probe_every")]
    pub probe_every_frames: u32,
}

fn default_tick_ms() -> u64 {
    16
}

fn default_probe_every() -> u32 {
    4
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            probe_every_frames: default_probe_every(),
        }
    }
}

/// Ordered hover categories; earlier entries take precedence
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HoverConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<HoverCategory>,
    #[serde(default = "HoverCategory::none")]
    pub fallback: HoverCategory,
}

fn default_categories() -> Vec<HoverCategory> {
    vec![HoverCategory::interactive(), HoverCategory::project()]
}

impl HoverConfig {
    /// Compile the category selectors
    pub fn classifier(&self) -> Result<HoverClassifier> {
        HoverClassifier::new(self.categories.clone(), self.fallback.clone())
            .context("Invalid hover category")
    }
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            fallback: HoverCategory::none(),
        }
    }
}

/// Navigation bar
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NavConfig {
    #[serde(default = "default_nav_items")]
    pub items: Vec<String>,
    #[serde(default)]
    pub magnetic: MagneticConfig,
}

fn default_nav_items() -> Vec<String> {
    ["Work", "About", "Contact"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            items: default_nav_items(),
            magnetic: MagneticConfig::default(),
        }
    }
}

/// Whole-page progress
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScrollConfig {
    /// Spring for the inertial copy of page progress
    #[serde(default = "default_progress_spring")]
    pub smoothing: SpringConfig,
}

fn default_progress_spring() -> SpringConfig {
    SpringConfig::new(100.0, 30.0, 1.0).with_rest(0.001, 0.001)
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smoothing: default_progress_spring(),
        }
    }
}

/// One scroll-driven output
///
/// `output` names `<element>.<property>`; properties `x`, `y`, `scale` and
/// `opacity` are written to the element, anything else is only reported.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScrollBinding {
    pub output: String,
    pub range: [f32; 2],
    pub from: MotionValue,
    pub to: MotionValue,
    #[serde(default)]
    pub easing: Easing,
}

impl ScrollBinding {
    pub fn new(
        output: &str,
        range: [f32; 2],
        from: impl Into<MotionValue>,
        to: impl Into<MotionValue>,
    ) -> Self {
        Self {
            output: output.to_string(),
            range,
            from: from.into(),
            to: to.into(),
            easing: Easing::Linear,
        }
    }
}

/// Hero section: parallax layers over raw scroll pixels
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HeroConfig {
    #[serde(default = "default_hero_lines")]
    pub lines: [String; 2],
    /// Bindings whose ranges are scroll offsets in pixels
    #[serde(default = "default_hero_bindings")]
    pub bindings: Vec<ScrollBinding>,
    /// Scroll hint bob height in pixels
    #[serde(default = "default_hint_bob")]
    pub hint_bob: f32,
    /// Seconds per bob
    #[serde(default = "default_hint_period")]
    pub hint_period: f32,
}

fn default_hero_lines() -> [String; 2] {
    ["Creative".to_string(), "Visionary".to_string()]
}

fn default_hero_bindings() -> Vec<ScrollBinding> {
    vec![
        ScrollBinding::new("hero.line_1.y", [0.0, 500.0], 0.0, -200.0),
        ScrollBinding::new("hero.line_2.y", [0.0, 500.0], 0.0, 200.0),
        ScrollBinding::new("hero.content.opacity", [0.0, 300.0], 1.0, 0.0),
        ScrollBinding::new("hero.content.scale", [0.0, 500.0], 1.0, 1.2),
    ]
}

fn default_hint_bob() -> f32 {
    10.0
}

fn default_hint_period() -> f32 {
    2.0
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            lines: default_hero_lines(),
            bindings: default_hero_bindings(),
            hint_bob: default_hint_bob(),
            hint_period: default_hint_period(),
        }
    }
}

/// About section: word-by-word reveal
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AboutConfig {
    #[serde(default = "default_about_text")]
    pub text: String,
    #[serde(default = "default_about_offsets")]
    pub offsets: [ScrollOffset; 2],
    #[serde(default = "default_color_from")]
    pub color_from: Color,
    #[serde(default = "default_color_to")]
    pub color_to: Color,
    #[serde(default = "default_opacity_from")]
    pub opacity_from: f32,
    #[serde(default = "default_opacity_to")]
    pub opacity_to: f32,
    /// Words each reveal range spans
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default)]
    pub easing: Easing,
    /// Text size in pixels; drives the word layout
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

fn default_about_text() -> String {
    "I sit at the intersection of human emotion and digital precision. \
     To me, a website isn't a collection of pages\u{2014}it\u{2019}s a living, breathing ecosystem. \
     I specialize in turning complex problems into 'how-did-they-do-that' digital experiences. \
     My philosophy is simple: If it\u{2019}s been done before, it\u{2019}s already obsolete. \
     I build for the future, obsessed with the details that 99% of people miss, \
     creating the 1% of work that the world remembers."
        .to_string()
}

fn default_about_offsets() -> [ScrollOffset; 2] {
    [
        ScrollOffset::new(Edge::START, Edge::Fraction(0.8)),
        ScrollOffset::new(Edge::END, Edge::Fraction(0.2)),
    ]
}

fn default_color_from() -> Color {
    Color::from_hex(0x333333)
}

fn default_color_to() -> Color {
    Color::WHITE
}

fn default_opacity_from() -> f32 {
    0.3
}

fn default_opacity_to() -> f32 {
    1.0
}

fn default_window() -> usize {
    1
}

fn default_font_size() -> f32 {
    72.0
}

impl AboutConfig {
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

impl Default for AboutConfig {
    fn default() -> Self {
        Self {
            text: default_about_text(),
            offsets: default_about_offsets(),
            color_from: default_color_from(),
            color_to: default_color_to(),
            opacity_from: default_opacity_from(),
            opacity_to: default_opacity_to(),
            window: default_window(),
            easing: Easing::Linear,
            font_size: default_font_size(),
        }
    }
}

/// One carousel card
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectConfig {
    pub title: String,
    #[serde(default)]
    pub category: String,
}

impl ProjectConfig {
    pub fn new(title: &str, category: &str) -> Self {
        Self {
            title: title.to_string(),
            category: category.to_string(),
        }
    }
}

/// Work section: horizontal carousel pinned while its container scrolls
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WorkConfig {
    #[serde(default = "default_projects")]
    pub projects: Vec<ProjectConfig>,
    /// Container height in viewport heights
    #[serde(default = "default_container_vh")]
    pub container_vh: f32,
    #[serde(default = "default_work_offsets")]
    pub offsets: [ScrollOffset; 2],
    /// Track translation at progress 0 and 1, percent of the track width
    #[serde(default = "default_track_x")]
    pub track_x: [f32; 2],
    #[serde(default)]
    pub easing: Easing,
}

fn default_projects() -> Vec<ProjectConfig> {
    vec![
        ProjectConfig::new("Neon Nexus", "Creative Tech"),
        ProjectConfig::new("Aura UI", "Interface Design"),
        ProjectConfig::new("Ether Cloud", "Data Viz"),
        ProjectConfig::new("Synthetix", "AI Tools"),
        ProjectConfig::new("Origin Zero", "Branding"),
    ]
}

fn default_container_vh() -> f32 {
    4.0
}

fn default_work_offsets() -> [ScrollOffset; 2] {
    [ScrollOffset::START_START, ScrollOffset::END_END]
}

fn default_track_x() -> [f32; 2] {
    [0.0, -80.0]
}

impl Default for WorkConfig {
    fn default() -> Self {
        Self {
            projects: default_projects(),
            container_vh: default_container_vh(),
            offsets: default_work_offsets(),
            track_x: default_track_x(),
            easing: Easing::Linear,
        }
    }
}

/// Skills section: a cloud of draggable chips
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SkillsConfig {
    #[serde(default = "default_skills")]
    pub items: Vec<String>,
    #[serde(default)]
    pub drag: DragConfig,
    /// Seconds between one chip starting to fade in and the next
    #[serde(default = "default_stagger")]
    pub stagger: f32,
    /// Seconds each chip takes to fade in
    #[serde(default = "default_fade")]
    pub fade: f32,
}

fn default_skills() -> Vec<String> {
    [
        "React",
        "TypeScript",
        "WebGL",
        "Three.js",
        "Framer Motion",
        "Tailwind",
        "Next.js",
        "Creative Coding",
        "UI/UX",
        "System Design",
        "Node.js",
        "D3.js",
        "Interaction Design",
        "Animation",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_stagger() -> f32 {
    0.05
}

fn default_fade() -> f32 {
    0.3
}

impl SkillsConfig {
    /// Opacity of chip `index`, `elapsed` seconds after the page opened
    pub fn reveal(&self, index: usize, elapsed: f32) -> f32 {
        let local = elapsed - index as f32 * self.stagger.max(0.0);
        if self.fade <= 0.0 {
            return if local >= 0.0 { 1.0 } else { 0.0 };
        }
        (local / self.fade).clamp(0.0, 1.0)
    }
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            items: default_skills(),
            drag: DragConfig::default(),
            stagger: default_stagger(),
            fade: default_fade(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file, or from `aethel.toml` in a directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!("No {} found in {}", CONFIG_FILE, path.display());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
