use super::*;
use crate::reveal::observer::{ElementTree, RevealKind, RevealObserver};

fn vp() -> Viewport {
    Viewport::new(1000, 800).unwrap()
}

#[test]
fn navbar_switches_eighty_pixels_before_hero_end() {
    assert!(!navbar_scrolled(0.0, 900.0));
    assert!(!navbar_scrolled(820.0, 900.0));
    assert!(navbar_scrolled(820.5, 900.0));
    // A hero shorter than the offset counts as scrolled from the top.
    assert!(navbar_scrolled(0.0, 40.0));
}

#[test]
fn ratio_of_partial_overlap() {
    let root = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(intersection_ratio(Rect::new(0.0, 50.0, 100.0, 150.0), root), 0.5);
    assert_eq!(intersection_ratio(Rect::new(10.0, 10.0, 20.0, 20.0), root), 1.0);
    assert_eq!(intersection_ratio(Rect::new(0.0, 200.0, 10.0, 300.0), root), 0.0);
}

#[test]
fn degenerate_elements_are_visible_when_touching() {
    let root = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(intersection_ratio(Rect::new(5.0, 5.0, 5.0, 5.0), root), 1.0);
    assert_eq!(intersection_ratio(Rect::new(500.0, 5.0, 500.0, 5.0), root), 0.0);
}

#[test]
fn scrolled_viewport_moves_down_the_document() {
    let r = scrolled_viewport(vp(), 250.0);
    assert_eq!(r, Rect::new(0.0, 250.0, 1000.0, 1050.0));
}

#[test]
fn reports_on_first_sight_then_only_on_crossings() {
    let mut tracker = IntersectionTracker::new(0.25).unwrap();
    let section = (ElementId(1), Rect::new(0.0, 1000.0, 1000.0, 1400.0));

    let first = tracker.observe(&[section], scrolled_viewport(vp(), 0.0));
    assert_eq!(first.len(), 1);
    assert!(!first[0].is_intersecting);

    // 50 px of 400 visible: still below threshold.
    assert!(tracker.observe(&[section], scrolled_viewport(vp(), 250.0)).is_empty());

    // 200 px of 400 visible.
    let entered = tracker.observe(&[section], scrolled_viewport(vp(), 400.0));
    assert_eq!(entered.len(), 1);
    assert!(entered[0].is_intersecting);
    assert_eq!(entered[0].ratio, 0.5);

    assert!(tracker.observe(&[section], scrolled_viewport(vp(), 500.0)).is_empty());

    let left = tracker.observe(&[section], scrolled_viewport(vp(), 2000.0));
    assert_eq!(left.len(), 1);
    assert!(!left[0].is_intersecting);

    tracker.forget(ElementId(1));
    assert_eq!(
        tracker
            .observe(&[section], scrolled_viewport(vp(), 2000.0))
            .len(),
        1
    );
}

#[test]
fn tracker_feeds_observer_while_scrolling() {
    let mut tree = ElementTree::new();
    let container = tree.add(None);
    let child = tree.add(Some(container));
    let mut observer = RevealObserver::new(0.25).unwrap();
    observer.watch(&[(container, RevealKind::Staggered)]);
    let mut tracker = IntersectionTracker::new(observer.threshold()).unwrap();
    let layout = [(container, Rect::new(0.0, 1200.0, 1000.0, 1600.0))];

    for scroll in [0.0, 300.0, 600.0, 900.0] {
        let entries = tracker.observe(&layout, scrolled_viewport(vp(), scroll));
        observer.on_intersections(&entries, &mut tree);
    }
    assert!(tree.has_class(container, "in-view"));
    assert!(tree.has_class(child, "in-view-child"));

    for scroll in [300.0, 0.0] {
        let entries = tracker.observe(&layout, scrolled_viewport(vp(), scroll));
        observer.on_intersections(&entries, &mut tree);
    }
    assert!(!tree.has_class(container, "in-view"));
    assert!(!tree.has_class(child, "in-view-child"));
}

#[test]
fn tracker_rejects_thresholds_outside_unit_range() {
    assert!(IntersectionTracker::new(f64::NAN).is_err());
    assert!(IntersectionTracker::new(-0.1).is_err());
    assert!(IntersectionTracker::new(1.5).is_err());
    assert_eq!(IntersectionTracker::new(0.0).unwrap().threshold(), 0.0);
    assert_eq!(IntersectionTracker::new(1.0).unwrap().threshold(), 1.0);
}
