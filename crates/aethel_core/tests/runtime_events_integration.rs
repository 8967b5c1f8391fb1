//! Integration tests for the runtime host
//!
//! These tests verify that:
//! - Pointer input derives hover paths and leave events like a browser
//! - Listeners and frame callbacks come off cleanly when removed
//! - Input signals and the frame clock stay consistent with each other

use aethel_core::{
    event_types, AethelRuntime, Element, ListenerTarget, Point, Rect, Size, MAX_FRAME_DT,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A page with a section holding one card, plus a fixed header painted last
fn page() -> (AethelRuntime, [aethel_core::NodeId; 3]) {
    let mut runtime = AethelRuntime::new(Size::new(800.0, 600.0));
    let tree = runtime.tree_mut();
    let section = tree
        .insert(None, Element::new("section").bounds(Rect::new(0.0, 0.0, 800.0, 600.0)))
        .unwrap();
    let card = tree
        .insert(
            Some(section),
            Element::new("article")
                .class("card")
                .bounds(Rect::new(100.0, 100.0, 200.0, 200.0)),
        )
        .unwrap();
    let header = tree
        .insert(None, Element::new("nav").bounds(Rect::new(0.0, 0.0, 800.0, 60.0)))
        .unwrap();
    (runtime, [section, card, header])
}

/// Moving across nested elements fires leave only on what was actually left
#[test]
fn test_pointer_leave_follows_hover_path() {
    let (mut runtime, [section, card, header]) = page();
    let left = Rc::new(RefCell::new(Vec::new()));
    for node in [section, card, header] {
        let log = left.clone();
        runtime.events_mut().register(
            ListenerTarget::Node(node),
            event_types::POINTER_LEAVE,
            move |event, _| log.borrow_mut().push(event.target),
        );
    }

    runtime.pointer_move(Point::new(150.0, 150.0));
    assert_eq!(runtime.hover_target(), Some(card));
    assert!(left.borrow().is_empty());

    // card to its parent: only the card is left
    runtime.pointer_move(Point::new(500.0, 400.0));
    assert_eq!(runtime.hover_target(), Some(section));
    assert_eq!(*left.borrow(), vec![Some(card)]);

    // the header paints over the section
    runtime.pointer_move(Point::new(500.0, 30.0));
    assert_eq!(runtime.hover_target(), Some(header));
    assert_eq!(*left.borrow(), vec![Some(card), Some(section)]);
}

/// Moves bubble from the window down the path; hover changes fire once
#[test]
fn test_pointer_move_bubbles_and_over_fires_on_change() {
    let (mut runtime, [section, _, _]) = page();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let overs = Rc::new(Cell::new(0));

    let log = seen.clone();
    runtime.events_mut().register(
        ListenerTarget::Node(section),
        event_types::POINTER_MOVE,
        move |event, tree| {
            let tag = event.target.and_then(|t| tree.get(t)).map(|e| e.tag.clone());
            log.borrow_mut().push(tag);
        },
    );
    let count = overs.clone();
    runtime.events_mut().register(
        ListenerTarget::Window,
        event_types::POINTER_OVER,
        move |_, _| count.set(count.get() + 1),
    );

    runtime.pointer_move(Point::new(150.0, 150.0));
    runtime.pointer_move(Point::new(160.0, 150.0));
    runtime.pointer_move(Point::new(500.0, 400.0));

    assert_eq!(
        *seen.borrow(),
        vec![
            Some("article".to_string()),
            Some("article".to_string()),
            Some("section".to_string())
        ]
    );
    assert_eq!(overs.get(), 2);
    assert_eq!(runtime.pointer().get(), Point::new(500.0, 400.0));

    // non-finite input is dropped entirely
    runtime.pointer_move(Point::new(f32::NAN, 0.0));
    assert_eq!(runtime.hover_target(), Some(section));
    assert_eq!(seen.borrow().len(), 3);
}

/// Removing a subtree drops its listeners and its place in the hover path
#[test]
fn test_remove_node_cleans_up() {
    let (mut runtime, [section, card, _]) = page();
    runtime
        .events_mut()
        .register(ListenerTarget::Node(card), event_types::POINTER_MOVE, |_, _| {});
    runtime
        .events_mut()
        .register(ListenerTarget::Node(section), event_types::POINTER_MOVE, |_, _| {});
    runtime
        .events_mut()
        .register(ListenerTarget::Window, event_types::SCROLL, |_, _| {});
    runtime.pointer_move(Point::new(150.0, 150.0));

    runtime.remove_node(section);
    assert_eq!(runtime.listener_count(), 1);
    assert_eq!(runtime.hover_target(), None);
    assert!(runtime.tree().get(card).is_none());
}

/// Frame deltas are clamped and the event clock follows clamped time
#[test]
fn test_frame_clock_and_callbacks() {
    let mut runtime = AethelRuntime::new(Size::new(800.0, 600.0));
    let deltas = Rc::new(RefCell::new(Vec::new()));
    let log = deltas.clone();
    let id = runtime
        .frames_mut()
        .request(move |time| log.borrow_mut().push(time.dt));

    runtime.frame(1.0 / 60.0);
    runtime.frame(5.0);
    runtime.frame(-1.0);
    assert_eq!(*deltas.borrow(), vec![1.0 / 60.0, MAX_FRAME_DT, 0.0]);

    let stamp = Rc::new(Cell::new(0));
    let seen = stamp.clone();
    runtime
        .events_mut()
        .register(ListenerTarget::Window, event_types::SCROLL, move |event, _| {
            seen.set(event.timestamp)
        });
    runtime.scroll_to(120.0);
    // 16.6 ms + 33.3 ms of clamped time
    assert_eq!(stamp.get(), 50);
    assert_eq!(runtime.scroll_y().get(), 120.0);

    assert!(runtime.frames_mut().cancel(id));
    runtime.frame(1.0 / 60.0);
    assert_eq!(deltas.borrow().len(), 3);
    assert_eq!(runtime.frame_callback_count(), 0);
}
