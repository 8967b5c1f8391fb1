//! Integration tests for the assembled site
//!
//! These tests verify that:
//! - Section progress drives the word reveal and carousel from one scroll
//! - Hover state follows content that scrolls under a resting pointer
//! - Recorded scenarios pass and fail with precise reports
//! - The physics overlay restores every element it touched

use aethel_app::prelude::*;
use aethel_app::{run_loaded_scenario, HeadlessRunConfig, ReportStatus};
use aethel_motion::{BodyDesc, BodyId, BodyPose, RigidBodyEngine};
use aethel_core::Rect;

const DT: f32 = 1.0 / 60.0;

fn site() -> AethelSite {
    AethelSite::new(SiteConfig::default()).unwrap()
}

fn scalar(site: &AethelSite, name: &str) -> f32 {
    site.output(name).and_then(|v| v.as_scalar()).unwrap()
}

fn settle(site: &mut AethelSite) {
    for _ in 0..180 {
        site.frame(DT);
    }
}

/// Scroll position where the about section reaches `progress`
fn about_scroll(site: &AethelSite, progress: f32) -> f32 {
    let about = site.layout().about;
    let start = about.top - 0.8 * 900.0;
    let end = about.top + about.height - 0.2 * 900.0;
    start + (end - start) * progress
}

/// Words reveal one after another as the about section passes
#[test]
fn test_word_reveal_follows_section_progress() {
    let mut site = site();

    site.scroll_to(about_scroll(&site, 0.5));
    assert!((scalar(&site, "about.progress") - 0.5).abs() < 1e-3);

    // 69 words: the first 34 are done, word 34 is half way
    assert!((scalar(&site, "about.word.0.opacity") - 1.0).abs() < 1e-4);
    assert!((scalar(&site, "about.word.33.opacity") - 1.0).abs() < 1e-2);
    assert!((scalar(&site, "about.word.34.opacity") - 0.65).abs() < 2e-2);
    assert!((scalar(&site, "about.word.68.opacity") - 0.3).abs() < 1e-4);
    assert_eq!(
        site.output("about.word.68.color"),
        Some(MotionValue::Color(Color::from_hex(0x333333)))
    );

    let word = site.runtime().tree().get(site.node("about.word.0").unwrap()).unwrap();
    assert!((word.style.opacity - 1.0).abs() < 1e-4);

    // scrolling back restores the same state
    site.scroll_to(about_scroll(&site, 1.0));
    site.scroll_to(about_scroll(&site, 0.5));
    assert!((scalar(&site, "about.word.34.opacity") - 0.65).abs() < 2e-2);
}

/// Hovering a card, then scrolling the carousel under the resting pointer
#[test]
fn test_hover_tracks_content_scrolling_under_pointer() {
    let mut site = site();
    let work = site.layout().work;

    site.scroll_to(work.top);
    site.pointer_move(Point::new(700.0, 400.0));
    settle(&mut site);

    let snapshot = site.snapshot();
    assert_eq!(snapshot.category, "project");
    assert_eq!(snapshot.cursor.label.as_deref(), Some("View"));
    assert!((snapshot.cursor.size - 100.0).abs() < 1e-3);
    assert_eq!(site.runtime().hover_target(), site.node("work.card.0"));

    // halfway through the pin, card 2 has slid under the pointer
    site.scroll_to(work.top + (work.height - 900.0) / 2.0);
    assert_eq!(site.runtime().hover_target(), site.node("work.card.2"));
    assert_eq!(site.snapshot().category, "project");

    // past the carousel nothing interactive is under the pointer
    site.scroll_to(work.top + work.height + 100.0);
    settle(&mut site);
    let snapshot = site.snapshot();
    assert_eq!(snapshot.category, "none");
    assert!((snapshot.cursor.size - 16.0).abs() < 1e-3);
}

/// A full recorded tour passes and reports the final outputs
#[test]
fn test_recorded_tour_passes() {
    let mut site = site();
    let about_mid = about_scroll(&site, 0.5);
    let about = site.node("nav.about").unwrap();
    let center = site.runtime().tree().get(about).unwrap().bounds.center();

    let scenario = HeadlessScenario::from_json(&format!(
        r##"{{ "steps": [
            {{ "type": "pointer_move", "x": {x}, "y": {y} }},
            {{ "type": "wait", "ms": 2000 }},
            {{ "type": "assert_category", "category": "interactive" }},
            {{ "type": "assert_near", "output": "cursor.size", "value": 80, "tolerance": 0.01 }},
            {{ "type": "assert_near", "output": "nav.about.offset", "value": {{ "x": 10, "y": 0 }}, "tolerance": 0.01 }},
            {{ "type": "scroll", "y": 250 }},
            {{ "type": "assert_near", "output": "hero.line_2.y", "value": 100 }},
            {{ "type": "scroll", "y": {about_mid} }},
            {{ "type": "assert_near", "output": "about.word.0.color", "value": "#ffffff" }},
            {{ "type": "orientation", "beta": 0, "gamma": 0 }},
            {{ "type": "tick", "frames": 600 }},
            {{ "type": "assert_near", "output": "ambient.x", "value": 0.5, "tolerance": 0.01 }}
        ] }}"##,
        x = center.x + 20.0,
        y = center.y,
    ))
    .unwrap();

    let outcome = run_loaded_scenario(&mut site, &scenario, HeadlessRunConfig::default()).unwrap();
    let report = outcome.report();
    assert!(!outcome.is_failed(), "{report:?}");
    assert_eq!(report.status, ReportStatus::Passed);
    assert_eq!(report.elapsed_frames, 125 + 600);
    assert_eq!(report.category.as_deref(), Some("interactive"));
    assert!(report.outputs.contains_key("work.track.x_percent"));
}

/// The first failing assertion stops the run
#[test]
fn test_failing_assertion_stops_the_run() {
    let mut site = site();
    let outcome = run_scenario(
        &mut site,
        r#"{ "steps": [
            { "type": "scroll", "y": 100 },
            { "type": "assert_near", "output": "hero.content.opacity", "value": 1.0 },
            { "type": "tick", "frames": 10 }
        ] }"#,
    )
    .unwrap();

    assert!(outcome.is_failed());
    let report = outcome.report();
    assert_eq!(report.failed_step_index, Some(1));
    assert_eq!(report.elapsed_frames, 0);
    assert!(report
        .message
        .as_deref()
        .is_some_and(|m| m.contains("hero.content.opacity")));
}

/// Bodies drift straight down
#[derive(Default)]
struct DriftEngine {
    bodies: Vec<BodyPose>,
    statics: usize,
}

impl RigidBodyEngine for DriftEngine {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        self.bodies.push(BodyPose {
            position: desc.bounds.center(),
            angle: 0.0,
        });
        BodyId(self.bodies.len() as u64 - 1)
    }

    fn add_static(&mut self, _bounds: Rect) {
        self.statics += 1;
    }

    fn step(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.position.y += 50.0 * dt;
            body.angle += dt;
        }
    }

    fn pose(&self, body: BodyId) -> Option<BodyPose> {
        self.bodies.get(body.0 as usize).copied()
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.statics = 0;
    }
}

/// Overlay captures headings and cards, then hands them back untouched
#[test]
fn test_overlay_round_trip() {
    let mut site = site();
    site.scroll_to(120.0);
    site.frame(DT);

    let line = site.node("hero.line_1").unwrap();
    let before = site.runtime().tree().get(line).unwrap().style.clone();

    let mut overlay = site.start_overlay(DriftEngine::default()).unwrap();
    // two hero lines, two headings, five cards, fourteen skill chips and the
    // contact button
    assert_eq!(overlay.len(), 24);
    assert_eq!(overlay.engine().statics, 3);

    site.frame(DT);
    let frames = overlay.frame(&mut site, 0.5);
    assert_eq!(frames.len(), 24);
    let style = &site.runtime().tree().get(line).unwrap().style;
    assert!((style.transform.translate.y - 25.0).abs() < 1e-4);
    assert!(!style.pointer_events);

    overlay.stop(&mut site);
    assert_eq!(site.runtime().tree().get(line).unwrap().style, before);
}

/// Tearing the site down leaves the runtime clean
#[test]
fn test_teardown_after_a_run() {
    let mut site = site();
    run_scenario(
        &mut site,
        r#"{ "steps": [ { "type": "pointer_move", "x": 10, "y": 10 }, { "type": "tick", "frames": 5 } ] }"#,
    )
    .unwrap();

    let runtime = site.teardown();
    assert_eq!(runtime.listener_count(), 0);
    assert_eq!(runtime.frame_callback_count(), 0);
}

/// The shipped demo configuration and tour stay in sync with the defaults
#[test]
fn test_demo_tour_passes() {
    let config = SiteConfig::from_toml(include_str!("../../../demos/aethel.toml")).unwrap();
    assert_eq!(config.hover, SiteConfig::default().hover);
    assert_eq!(config.hero.bindings.len(), 4);
    assert_eq!(config.skills, SiteConfig::default().skills);

    let mut site = AethelSite::new(config).unwrap();
    let outcome = run_scenario(&mut site, include_str!("../../../demos/tour.json")).unwrap();
    assert!(!outcome.is_failed(), "{:?}", outcome.report());
}
