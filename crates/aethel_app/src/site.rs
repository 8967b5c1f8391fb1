//! Site assembly
//!
//! [`AethelSite`] owns the runtime, lays out the page, mounts the pointer
//! components and binds every scroll-driven output. Each frame it advances
//! the runtime, recomputes section progress from the scroll geometry,
//! re-resolves element bounds and writes animated values back into element
//! styles.
//!
//! Outputs are addressed by name: `<element>.<property>` for scroll bindings
//! (`hero.line_1.y`, `about.word.3.opacity`, `work.track.x_percent`),
//! `<section>.progress` for each progress source, plus `cursor.*`,
//! `ambient.*`, `nav.<item>.offset` and `skills.chip.<i>.{offset,scale,opacity}`.

use crate::config::SiteConfig;
use crate::layout::{slug, PageLayout};
use aethel_animation::{
    BindingId, InterpolationSpec, KeyframeTrack, MotionValue, Repeat, ScrollGeometry,
    ScrollMapper, ScrollProgressSource, ScrollRange, SmoothedProgress, Timeline,
};
use aethel_core::{AethelRuntime, NodeId, Point, Rect, Selector, Size, Vec2};
use aethel_motion::{
    AmbientFollower, AmbientFrame, BodyFrame, CursorFollower, CursorFrame, Draggable,
    MagneticPull, OverlayHandle, PhysicsOverlay, RigidBodyEngine,
};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Where a section reads its progress from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SectionKind {
    Hero,
    About,
    Work,
    Page,
}

impl SectionKind {
    fn name(self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::About => "about",
            SectionKind::Work => "work",
            SectionKind::Page => "page",
        }
    }

    fn source(self, config: &SiteConfig, layout: &PageLayout) -> ScrollProgressSource {
        match self {
            SectionKind::Hero => ScrollProgressSource::Absolute,
            SectionKind::About => {
                ScrollProgressSource::target_with(layout.about, config.about.offsets)
            }
            SectionKind::Work => {
                ScrollProgressSource::target_with(layout.work, config.work.offsets)
            }
            SectionKind::Page => ScrollProgressSource::Page,
        }
    }
}

/// One progress source with the outputs it drives
struct ScrollSection {
    kind: SectionKind,
    source: ScrollProgressSource,
    mapper: ScrollMapper,
    outputs: Vec<(String, BindingId)>,
}

impl ScrollSection {
    fn new(kind: SectionKind, config: &SiteConfig, layout: &PageLayout) -> Self {
        Self {
            kind,
            source: kind.source(config, layout),
            mapper: ScrollMapper::new(),
            outputs: Vec::new(),
        }
    }

    fn bind(&mut self, output: String, spec: InterpolationSpec<MotionValue>) -> Result<()> {
        let id = self
            .mapper
            .bind(spec)
            .with_context(|| format!("Invalid binding for '{output}'"))?;
        self.outputs.push((output, id));
        Ok(())
    }

    fn output(&self, name: &str) -> Option<MotionValue> {
        self.outputs
            .iter()
            .find(|(output, _)| output == name)
            .and_then(|(_, id)| self.mapper.value(*id))
    }
}

/// Every animated value at one instant
#[derive(Debug, Clone, Serialize)]
pub struct SiteSnapshot {
    pub frame: u64,
    pub scroll_y: f32,
    /// Current hover category name
    pub category: String,
    pub cursor: CursorFrame,
    pub ambient: AmbientFrame,
    pub outputs: BTreeMap<String, MotionValue>,
}

impl SiteSnapshot {
    pub fn output(&self, name: &str) -> Option<MotionValue> {
        self.outputs.get(name).copied()
    }
}

/// The assembled, running page
pub struct AethelSite {
    config: SiteConfig,
    runtime: AethelRuntime,
    layout: PageLayout,
    /// Node for each layout box, same order
    layout_nodes: Vec<NodeId>,
    nodes: FxHashMap<String, NodeId>,
    cursor: CursorFollower,
    magnets: Vec<(String, MagneticPull)>,
    /// Skill chips, in item order
    chips: Vec<Draggable>,
    ambient: AmbientFollower,
    sections: Vec<ScrollSection>,
    smoothed: SmoothedProgress,
    hint: Timeline<f32>,
    /// A real pointer position has been seen
    pointer_seen: bool,
    frames: u64,
    /// Seconds of frame time since the site opened
    elapsed: f32,
}

impl AethelSite {
    /// Build the page and mount everything `config` describes
    pub fn new(config: SiteConfig) -> Result<Self> {
        let viewport = config.viewport.size();
        let mut runtime = AethelRuntime::new(viewport);
        let layout = PageLayout::compute(&config, viewport);

        let mut layout_nodes: Vec<NodeId> = Vec::with_capacity(layout.boxes.len());
        let mut nodes = FxHashMap::default();
        for layout_box in &layout.boxes {
            let parent = layout_box.parent.and_then(|i| layout_nodes.get(i).copied());
            let id = runtime
                .tree_mut()
                .insert(parent, layout_box.element())
                .with_context(|| format!("Failed to insert '{}'", layout_box.key))?;
            layout_nodes.push(id);
            nodes.insert(layout_box.key.clone(), id);
        }

        let classifier = config.hover.classifier()?;
        let pointer = runtime.pointer();
        let cursor = CursorFollower::mount(&mut runtime, pointer, classifier, &config.cursor);

        let mut magnets = Vec::with_capacity(config.nav.items.len());
        for label in &config.nav.items {
            let key = slug(label);
            let node = nodes
                .get(&format!("nav.{key}"))
                .copied()
                .with_context(|| format!("Missing nav item '{label}'"))?;
            let magnet = MagneticPull::mount(&mut runtime, node, config.nav.magnetic)
                .with_context(|| format!("Failed to mount magnetic pull on '{label}'"))?;
            magnets.push((key, magnet));
        }

        let mut chips = Vec::with_capacity(config.skills.items.len());
        for (i, skill) in config.skills.items.iter().enumerate() {
            let node = nodes
                .get(&format!("skills.chip.{i}"))
                .copied()
                .with_context(|| format!("Missing skill chip '{skill}'"))?;
            let chip = Draggable::mount(&mut runtime, node, config.skills.drag)
                .with_context(|| format!("Failed to make '{skill}' draggable"))?;
            chips.push(chip);
        }

        let ambient = AmbientFollower::mount(&mut runtime, &config.ambient);
        let sections = Self::bind_sections(&config, &layout)?;

        let bob = config.hero.hint_bob;
        let hint = Timeline::new(KeyframeTrack::evenly(&[0.0, bob, 0.0])?, config.hero.hint_period)
            .repeat(Repeat::Forever);
        let smoothed = SmoothedProgress::new(config.scroll.smoothing, 0.0);

        debug!(
            elements = layout_nodes.len(),
            bindings = sections.iter().map(|s| s.mapper.len()).sum::<usize>(),
            "site assembled"
        );

        let mut site = Self {
            config,
            runtime,
            layout,
            layout_nodes,
            nodes,
            cursor,
            magnets,
            chips,
            ambient,
            sections,
            smoothed,
            hint,
            pointer_seen: false,
            frames: 0,
            elapsed: 0.0,
        };
        site.sync();
        Ok(site)
    }

    fn bind_sections(config: &SiteConfig, layout: &PageLayout) -> Result<Vec<ScrollSection>> {
        let mut hero = ScrollSection::new(SectionKind::Hero, config, layout);
        for binding in &config.hero.bindings {
            let range = ScrollRange::new(binding.range[0], binding.range[1])
                .with_context(|| format!("Invalid range for '{}'", binding.output))?;
            hero.bind(
                binding.output.clone(),
                InterpolationSpec::new(range, binding.from, binding.to).with_easing(binding.easing),
            )?;
        }

        let about_config = &config.about;
        let mut about = ScrollSection::new(SectionKind::About, config, layout);
        let words = about_config.words().count();
        for i in 0..words {
            let range = ScrollRange::windowed(i, words, about_config.window)?;
            about.bind(
                format!("about.word.{i}.color"),
                InterpolationSpec::new(
                    range,
                    about_config.color_from.into(),
                    about_config.color_to.into(),
                )
                .with_easing(about_config.easing),
            )?;
            about.bind(
                format!("about.word.{i}.opacity"),
                InterpolationSpec::new(
                    range,
                    about_config.opacity_from.into(),
                    about_config.opacity_to.into(),
                )
                .with_easing(about_config.easing),
            )?;
        }

        let mut work = ScrollSection::new(SectionKind::Work, config, layout);
        let [x_from, x_to] = config.work.track_x;
        work.bind(
            "work.track.x_percent".to_string(),
            InterpolationSpec::new(ScrollRange::FULL, x_from.into(), x_to.into())
                .with_easing(config.work.easing),
        )?;

        let page = ScrollSection::new(SectionKind::Page, config, layout);
        Ok(vec![hero, about, work, page])
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn runtime(&self) -> &AethelRuntime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut AethelRuntime {
        &mut self.runtime
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Node for a layout key such as `nav.work` or `work.card.2`
    pub fn node(&self, key: &str) -> Option<NodeId> {
        self.nodes.get(key).copied()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn geometry(&self) -> ScrollGeometry {
        ScrollGeometry {
            scroll_y: self.runtime.scroll_y().get(),
            viewport_height: self.runtime.viewport().get().height,
            content_height: self.layout.content_height,
        }
    }

    pub fn pointer_move(&mut self, position: Point) {
        self.pointer_seen |= position.is_finite();
        self.runtime.pointer_move(position);
        if self.chips.iter().any(Draggable::is_dragging) {
            self.sync();
        }
    }

    pub fn pointer_down(&mut self, position: Point) {
        self.pointer_seen |= position.is_finite();
        self.runtime.pointer_down(position);
        self.sync();
    }

    pub fn pointer_up(&mut self, position: Point) {
        self.pointer_seen |= position.is_finite();
        self.runtime.pointer_up(position);
        self.sync();
    }

    /// Chip for skill `index`
    pub fn chip(&self, index: usize) -> Option<&Draggable> {
        self.chips.get(index)
    }

    /// Content moved under a resting pointer: re-run hit-testing so hover
    /// state matches what is now under it
    fn refresh_hover(&mut self) {
        if self.pointer_seen {
            let position = self.runtime.pointer().get();
            self.runtime.pointer_move(position);
        }
    }

    pub fn orientation(&mut self, alpha: Option<f32>, beta: Option<f32>, gamma: Option<f32>) {
        self.runtime.orientation(alpha, beta, gamma);
    }

    /// Scroll to `scroll_y`, clamped to the scrollable range
    pub fn scroll_to(&mut self, scroll_y: f32) {
        if !scroll_y.is_finite() {
            return;
        }
        let max = self.geometry().max_scroll();
        self.runtime.scroll_to(scroll_y.clamp(0.0, max));
        self.sync();
        self.refresh_hover();
    }

    /// Re-lay the page for a new viewport
    pub fn resize(&mut self, viewport: Size) {
        if !(viewport.width.is_finite() && viewport.height.is_finite()) {
            return;
        }
        self.runtime.resize(viewport);
        self.layout = PageLayout::compute(&self.config, viewport);
        for section in &mut self.sections {
            section.source = section.kind.source(&self.config, &self.layout);
        }
        let max = self.geometry().max_scroll();
        let scroll = self.runtime.scroll_y().get();
        if scroll > max {
            self.runtime.scroll_to(max);
        }
        debug!(width = viewport.width, height = viewport.height, "site relaid");
        self.sync();
        self.refresh_hover();
    }

    /// Run one display frame of `dt` seconds
    pub fn frame(&mut self, dt: f32) {
        let time = self.runtime.frame(dt);
        self.sync();

        if let Some(page) = self.section(SectionKind::Page) {
            let progress = page.mapper.progress();
            self.smoothed.set_raw(progress);
        }
        self.smoothed.step(time.dt);
        self.hint.tick(time.dt);
        self.elapsed += time.dt;
        self.apply_pointer_outputs();
        self.frames += 1;
        trace!(frame = self.frames, dt = time.dt, "site frame");
    }

    fn section(&self, kind: SectionKind) -> Option<&ScrollSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    fn track_shift(&self) -> f32 {
        self.section(SectionKind::Work)
            .and_then(|s| s.output("work.track.x_percent"))
            .and_then(|v| v.as_scalar())
            .map_or(0.0, |pct| pct / 100.0 * self.layout.track_width)
    }

    /// Recompute progress, element bounds and scroll-driven styles
    fn sync(&mut self) {
        let geometry = self.geometry();
        for section in &mut self.sections {
            if let Some(progress) = section.source.progress(&geometry) {
                section.mapper.update(progress);
            }
        }

        let shift = self.track_shift();
        let tree = self.runtime.tree_mut();
        for (layout_box, id) in self.layout.boxes.iter().zip(&self.layout_nodes) {
            if let Some(element) = tree.get_mut(*id) {
                element.bounds = self.layout.client_rect(
                    layout_box,
                    geometry.scroll_y,
                    geometry.viewport_height,
                    shift,
                );
            }
        }
        // dragged chips are hit where they are drawn
        for chip in &self.chips {
            if let Some(element) = tree.get_mut(chip.node()) {
                let (b, offset) = (element.bounds, chip.offset());
                element.bounds =
                    Rect::new(b.x() + offset.x, b.y() + offset.y, b.width(), b.height());
            }
        }

        for section in &self.sections {
            for (output, id) in &section.outputs {
                let Some(value) = section.mapper.value(*id) else {
                    continue;
                };
                let Some((key, property)) = output.rsplit_once('.') else {
                    continue;
                };
                let Some(element) = self.nodes.get(key).and_then(|n| tree.get_mut(*n)) else {
                    continue;
                };
                let Some(v) = value.as_scalar() else {
                    continue;
                };
                let style = &mut element.style;
                match property {
                    "x" => style.transform.translate.x = v,
                    "y" => style.transform.translate.y = v,
                    "x_percent" => style.transform.translate.x = v / 100.0 * element.bounds.width(),
                    "scale" => style.transform.scale = v,
                    "opacity" => style.opacity = v,
                    _ => {}
                }
            }
        }
        self.apply_pointer_outputs();
    }

    fn apply_pointer_outputs(&mut self) {
        let hint = self.hint.value();
        let tree = self.runtime.tree_mut();
        if let Some(element) = self.nodes.get("hero.hint").and_then(|n| tree.get_mut(*n)) {
            element.style.transform.translate.y = hint;
        }
        for (_, magnet) in &self.magnets {
            magnet.apply(tree);
        }
        for (i, chip) in self.chips.iter().enumerate() {
            chip.apply(tree);
            if let Some(element) = tree.get_mut(chip.node()) {
                element.style.opacity = self.config.skills.reveal(i, self.elapsed);
            }
        }
    }

    /// Current value of one named output
    pub fn output(&self, name: &str) -> Option<MotionValue> {
        self.snapshot().output(name)
    }

    pub fn snapshot(&self) -> SiteSnapshot {
        let cursor = self.cursor.snapshot();
        let ambient = self.ambient.snapshot();
        let mut outputs = BTreeMap::new();

        for section in &self.sections {
            outputs.insert(
                format!("{}.progress", section.kind.name()),
                MotionValue::Scalar(section.mapper.progress()),
            );
            for (output, id) in &section.outputs {
                if let Some(value) = section.mapper.value(*id) {
                    outputs.insert(output.clone(), value);
                }
            }
        }
        outputs.insert(
            "page.progress_smoothed".to_string(),
            MotionValue::Scalar(self.smoothed.value()),
        );
        outputs.insert("hero.hint.y".to_string(), MotionValue::Scalar(self.hint.value()));
        for (key, magnet) in &self.magnets {
            outputs.insert(format!("nav.{key}.offset"), MotionValue::Offset(magnet.offset()));
        }
        for (i, chip) in self.chips.iter().enumerate() {
            let opacity = self.config.skills.reveal(i, self.elapsed);
            outputs.insert(format!("skills.chip.{i}.offset"), MotionValue::Offset(chip.offset()));
            outputs.insert(format!("skills.chip.{i}.scale"), MotionValue::Scalar(chip.scale()));
            outputs.insert(format!("skills.chip.{i}.opacity"), MotionValue::Scalar(opacity));
        }

        let scalars = [
            ("cursor.x", cursor.position.x),
            ("cursor.y", cursor.position.y),
            ("cursor.size", cursor.size),
            ("cursor.radius", cursor.corner_radius),
            ("ambient.x", ambient.input.x),
            ("ambient.y", ambient.input.y),
        ];
        for (name, value) in scalars {
            outputs.insert(name.to_string(), MotionValue::Scalar(value));
        }
        if let Some(ring) = cursor.ring {
            outputs.insert("cursor.ring.scale".to_string(), MotionValue::Scalar(ring.scale));
            outputs.insert("cursor.ring.opacity".to_string(), MotionValue::Scalar(ring.opacity));
        }

        SiteSnapshot {
            frame: self.frames,
            scroll_y: self.runtime.scroll_y().get(),
            category: cursor.category.clone(),
            cursor,
            ambient,
            outputs,
        }
    }

    /// Hand every element matching the overlay selector to `engine`
    ///
    /// Overlay frames must run after [`AethelSite::frame`] so body poses win
    /// over scroll-driven transforms.
    pub fn start_overlay<E: RigidBodyEngine>(&mut self, engine: E) -> Result<ActiveOverlay<E>> {
        let selector: Selector = self
            .config
            .overlay
            .selector
            .parse()
            .context("Invalid overlay selector")?;
        let viewport = self.runtime.viewport().get();
        let mut overlay = PhysicsOverlay::new(engine, self.config.overlay.clone());
        let handle = overlay.activate(self.runtime.tree_mut(), &selector, viewport);
        debug!(bodies = handle.len(), "overlay started");
        Ok(ActiveOverlay { overlay, handle })
    }

    /// Unmount every component and hand back the bare runtime
    pub fn teardown(self) -> AethelRuntime {
        let mut runtime = self.runtime;
        self.cursor.unmount(&mut runtime);
        for (_, magnet) in self.magnets {
            magnet.unmount(&mut runtime);
        }
        for chip in self.chips {
            chip.unmount(&mut runtime);
        }
        self.ambient.unmount(&mut runtime);
        debug!("site torn down");
        runtime
    }
}

/// A running physics overlay over the site's elements
pub struct ActiveOverlay<E: RigidBodyEngine> {
    overlay: PhysicsOverlay<E>,
    handle: OverlayHandle,
}

impl<E: RigidBodyEngine> ActiveOverlay<E> {
    pub fn len(&self) -> usize {
        self.handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handle.is_empty()
    }

    pub fn engine(&self) -> &E {
        self.overlay.engine()
    }

    /// Step the engine and write body poses into the tree
    pub fn frame(&mut self, site: &mut AethelSite, dt: f32) -> Vec<BodyFrame> {
        self.overlay
            .on_frame(&self.handle, site.runtime.tree_mut(), dt)
    }

    /// Restore every element to its pre-overlay style
    pub fn stop(mut self, site: &mut AethelSite) {
        self.overlay.deactivate(self.handle, site.runtime.tree_mut());
        debug!("overlay stopped");
    }
}

/// Offset of a nav item, zero when the item does not exist
pub fn nav_offset(snapshot: &SiteSnapshot, item: &str) -> Vec2 {
    snapshot
        .output(&format!("nav.{}.offset", slug(item)))
        .and_then(|v| v.as_offset())
        .unwrap_or(Vec2::ZERO)
}
