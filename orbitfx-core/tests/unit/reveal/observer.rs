use super::*;

struct Page {
    tree: ElementTree,
    hero: ElementId,
    about: ElementId,
    about_children: Vec<ElementId>,
}

fn page() -> Page {
    let mut tree = ElementTree::new();
    let hero = tree.add(None);
    let about = tree.add(None);
    let about_children = (0..3).map(|_| tree.add(Some(about))).collect();
    Page {
        tree,
        hero,
        about,
        about_children,
    }
}

fn entry(id: ElementId, ratio: f64) -> IntersectionEntry {
    IntersectionEntry::at_ratio(id, ratio, 0.25)
}

#[test]
fn new_validates_threshold() {
    assert_eq!(RevealObserver::new(0.25).unwrap().threshold(), 0.25);
    assert!(RevealObserver::new(1.5).is_err());
    assert!(matches!(
        RevealObserver::new(-0.1),
        Err(FxError::Validation(_))
    ));
    assert!(RevealObserver::new(f64::NAN).is_err());
}

#[test]
fn entering_and_leaving_toggle_in_view() {
    let mut p = page();
    let mut obs = RevealObserver::new(0.25).unwrap();
    obs.watch(&[(p.hero, RevealKind::Single)]);

    assert_eq!(obs.on_intersections(&[entry(p.hero, 0.3)], &mut p.tree), 1);
    assert!(p.tree.has_class(p.hero, "in-view"));
    assert_eq!(obs.is_revealed(p.hero), Some(true));

    obs.on_intersections(&[entry(p.hero, 0.1)], &mut p.tree);
    assert!(!p.tree.has_class(p.hero, "in-view"));
    assert_eq!(obs.is_revealed(p.hero), Some(false));
}

#[test]
fn staggered_children_mirror_parent() {
    let mut p = page();
    let mut obs = RevealObserver::new(0.25).unwrap();
    obs.watch(&[(p.about, RevealKind::Staggered)]);

    obs.on_intersections(&[entry(p.about, 0.25)], &mut p.tree);
    assert!(p.tree.has_class(p.about, "in-view"));
    for &c in &p.about_children {
        assert!(p.tree.has_class(c, "in-view-child"));
        assert!(!p.tree.has_class(c, "in-view"));
    }

    obs.on_intersections(&[entry(p.about, 0.0)], &mut p.tree);
    assert!(!p.tree.has_class(p.about, "in-view"));
    for &c in &p.about_children {
        assert!(p.tree.classes(c).is_empty());
    }
}

#[test]
fn single_containers_leave_children_alone() {
    let mut p = page();
    let mut obs = RevealObserver::new(0.25).unwrap();
    obs.watch(&[(p.about, RevealKind::Single)]);
    obs.on_intersections(&[entry(p.about, 1.0)], &mut p.tree);
    assert!(p.about_children.iter().all(|&c| p.tree.classes(c).is_empty()));
}

#[test]
fn unwatched_entries_are_ignored() {
    let mut p = page();
    let mut obs = RevealObserver::new(0.25).unwrap();
    obs.watch(&[(p.hero, RevealKind::Single)]);
    assert_eq!(obs.on_intersections(&[entry(p.about, 1.0)], &mut p.tree), 0);
    assert!(!p.tree.has_class(p.about, "in-view"));
    assert_eq!(obs.is_revealed(p.about), None);
}

#[test]
fn watch_returns_one_registration_per_element() {
    let p = page();
    let mut obs = RevealObserver::new(0.25).unwrap();
    let regs = obs.watch(&[(p.hero, RevealKind::Single), (p.about, RevealKind::Staggered)]);
    assert_eq!(regs.len(), 2);
    assert_eq!(
        regs[1],
        Registration {
            target: Target::Observer,
            handler: Handler::Observe(p.about),
        }
    );
    assert_eq!(obs.watched(), 2);
}

#[test]
fn unwatch_and_dispose_detach() {
    let mut p = page();
    let mut obs = RevealObserver::new(0.25).unwrap();
    obs.watch(&[(p.hero, RevealKind::Single), (p.about, RevealKind::Staggered)]);

    assert_eq!(obs.unwatch(&[p.hero, ElementId(999)]).len(), 1);
    assert!(!obs.is_watching(p.hero));
    obs.on_intersections(&[entry(p.hero, 1.0)], &mut p.tree);
    assert!(!p.tree.has_class(p.hero, "in-view"));

    assert_eq!(obs.dispose().len(), 1);
    assert_eq!(obs.watched(), 0);
    assert_eq!(obs.on_intersections(&[entry(p.about, 1.0)], &mut p.tree), 0);
    assert!(!p.tree.has_class(p.about, "in-view"));
}

#[test]
fn custom_class_names() {
    let mut p = page();
    let cfg = RevealConfig {
        class: "shown".into(),
        child_class: "shown-child".into(),
        ..RevealConfig::default()
    };
    let mut obs = RevealObserver::from_config(cfg).unwrap();
    obs.watch(&[(p.about, RevealKind::Staggered)]);
    obs.on_intersections(&[entry(p.about, 0.9)], &mut p.tree);
    assert_eq!(p.tree.classes(p.about), vec!["shown"]);
    assert_eq!(p.tree.classes(p.about_children[0]), vec!["shown-child"]);
}

#[test]
fn zero_threshold_means_any_overlap() {
    assert!(IntersectionEntry::at_ratio(ElementId(0), 0.01, 0.0).is_intersecting);
    assert!(!IntersectionEntry::at_ratio(ElementId(0), 0.0, 0.0).is_intersecting);
    assert!(IntersectionEntry::at_ratio(ElementId(0), 0.25, 0.25).is_intersecting);
    assert!(!IntersectionEntry::at_ratio(ElementId(0), 0.2499, 0.25).is_intersecting);
}
