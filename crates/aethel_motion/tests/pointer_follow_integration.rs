//! Integration tests for the pointer-reactive components
//!
//! These tests verify that:
//! - Cursor, magnetic items and the ambient glow share one runtime cleanly
//! - Hover classification and pointer moves interleave with "latest wins"
//! - Tearing everything down leaves no listeners or frame callbacks behind

use aethel_core::{AethelRuntime, Element, NodeId, Point, Rect, Size, Vec2};
use aethel_motion::{
    AmbientConfig, AmbientFollower, CursorConfig, CursorFollower, HoverClassifier, MagneticConfig,
    MagneticPull,
};

const DT: f32 = 1.0 / 60.0;

struct Page {
    runtime: AethelRuntime,
    nav_items: Vec<NodeId>,
    card: NodeId,
}

fn page() -> Page {
    let mut runtime = AethelRuntime::new(Size::new(1440.0, 900.0));
    let tree = runtime.tree_mut();
    let nav = tree
        .insert(None, Element::new("nav").bounds(Rect::new(0.0, 0.0, 1440.0, 80.0)))
        .unwrap();
    let nav_items = (0..3)
        .map(|i| {
            tree.insert(
                Some(nav),
                Element::new("a").bounds(Rect::new(1000.0 + i as f32 * 120.0, 20.0, 100.0, 40.0)),
            )
            .unwrap()
        })
        .collect();
    let card = tree
        .insert(
            None,
            Element::new("article")
                .class("project-card")
                .bounds(Rect::new(100.0, 200.0, 500.0, 400.0)),
        )
        .unwrap();

    Page {
        runtime,
        nav_items,
        card,
    }
}

fn settle(runtime: &mut AethelRuntime) {
    for _ in 0..180 {
        runtime.frame(DT);
    }
}

#[test]
fn test_components_share_one_runtime() {
    let mut page = page();
    let runtime = &mut page.runtime;

    let pointer = runtime.pointer();
    let cursor = CursorFollower::mount(
        runtime,
        pointer,
        HoverClassifier::default(),
        &CursorConfig::default(),
    );
    let magnets: Vec<MagneticPull> = page
        .nav_items
        .iter()
        .map(|id| MagneticPull::mount(runtime, *id, MagneticConfig::new(0.3).unwrap()).unwrap())
        .collect();
    let ambient = AmbientFollower::mount(runtime, &AmbientConfig::default());

    // hover the second nav item, 20 px right of its centre
    runtime.pointer_move(Point::new(1190.0, 40.0));
    settle(runtime);

    assert_eq!(cursor.category(), "interactive");
    assert_eq!(cursor.snapshot().size, 80.0);
    assert_eq!(cursor.snapshot().position, Point::new(1190.0, 40.0));

    assert_eq!(magnets[0].offset(), Vec2::ZERO);
    assert!((magnets[1].offset().x - 6.0).abs() < 1e-4);
    assert_eq!(magnets[2].offset(), Vec2::ZERO);

    let glow = ambient.position();
    assert!((glow.x - 1190.0 / 1440.0).abs() < 1e-3);
    assert!((glow.y - 40.0 / 900.0).abs() < 1e-3);

    // over the card: nav item releases, cursor grows
    runtime.pointer_move(Point::new(300.0, 300.0));
    settle(runtime);
    assert_eq!(cursor.category(), "project");
    assert_eq!(cursor.snapshot().size, 100.0);
    assert_eq!(magnets[1].offset(), Vec2::ZERO);

    let removed = page.card;
    assert!(runtime.tree().get(removed).is_some());

    cursor.unmount(runtime);
    for magnet in magnets {
        magnet.unmount(runtime);
    }
    ambient.unmount(runtime);
    assert_eq!(runtime.listener_count(), 0);
    assert_eq!(runtime.frame_callback_count(), 0);
}

#[test]
fn test_latest_classification_wins_within_a_frame() {
    let mut page = page();
    let runtime = &mut page.runtime;
    let pointer = runtime.pointer();
    let cursor = CursorFollower::mount(
        runtime,
        pointer,
        HoverClassifier::default(),
        &CursorConfig::default(),
    );

    // several pointer events land between two frames
    runtime.pointer_move(Point::new(300.0, 300.0));
    runtime.pointer_move(Point::new(1050.0, 40.0));
    runtime.pointer_move(Point::new(700.0, 700.0));
    settle(runtime);

    let frame = cursor.snapshot();
    assert_eq!(frame.category, "none");
    assert_eq!(frame.size, 16.0);
    assert_eq!(frame.position, Point::new(700.0, 700.0));
}

#[test]
fn test_remounting_does_not_accumulate_listeners() {
    let mut page = page();
    let runtime = &mut page.runtime;
    let item = page.nav_items[0];

    for _ in 0..5 {
        let magnet = MagneticPull::mount(runtime, item, MagneticConfig::default()).unwrap();
        runtime.pointer_move(Point::new(1010.0, 30.0));
        runtime.frame(DT);
        magnet.unmount(runtime);
    }
    assert_eq!(runtime.listener_count(), 0);
    assert_eq!(runtime.frame_callback_count(), 0);
}

#[test]
fn test_removing_a_node_drops_its_listeners() {
    let mut page = page();
    let runtime = &mut page.runtime;
    let item = page.nav_items[2];

    let _magnet = MagneticPull::mount(runtime, item, MagneticConfig::default()).unwrap();
    assert_eq!(runtime.listener_count(), 2);

    runtime.remove_node(item);
    assert_eq!(runtime.listener_count(), 0);
}
