use super::*;
use crate::foundation::core::{Point, Size};
use crate::orbit::controller::MarkerBoard;
use crate::orbit::model::{OrbitMarker, css_translate};
use crate::runtime::clock::ManualClock;
use crate::runtime::stage::{Stage, StageOpts};
use std::cell::RefCell;
use std::rc::Rc;

/// Shares a board between the stage-owned effect and the test.
#[derive(Clone, Default)]
struct SharedBoard(Rc<RefCell<MarkerBoard>>);

impl MarkerSink for SharedBoard {
    fn marker_size(&self, id: &str) -> Option<Size> {
        self.0.borrow().marker_size(id)
    }

    fn apply_transform(&mut self, id: &str, transform: &str) {
        self.0.borrow_mut().apply_transform(id, transform);
    }
}

fn vp(w: u32, h: u32) -> Viewport {
    Viewport::new(w, h).unwrap()
}

fn shared() -> SharedBoard {
    let board = MarkerBoard::for_config(&OrbitConfig::default(), Size::new(48.0, 48.0));
    SharedBoard(Rc::new(RefCell::new(board)))
}

fn stage(viewport: Viewport) -> Stage<ManualClock> {
    let opts = StageOpts {
        frame_interval: Millis(16.0),
    };
    Stage::new(ManualClock::new(), viewport, opts)
}

#[test]
fn missing_sink_is_a_noop() {
    assert!(
        OrbitEffect::<MarkerBoard>::mount(None, OrbitConfig::default(), vp(1280, 800)).is_none()
    );
}

#[test]
fn too_many_markers_is_a_noop() {
    let mut cfg = OrbitConfig::default();
    let extra = cfg.markers[0].clone();
    cfg.markers.push(OrbitMarker {
        id: "x".into(),
        ..extra
    });
    assert!(OrbitEffect::mount(Some(MarkerBoard::new()), cfg, vp(1280, 800)).is_none());
}

#[test]
fn narrow_viewport_stays_idle() {
    let board = shared();
    let effect = OrbitEffect::mount(Some(board.clone()), OrbitConfig::default(), vp(768, 1024))
        .unwrap();
    assert!(!effect.is_enabled());

    let mut stage = stage(vp(768, 1024));
    let id = stage.mount(Box::new(effect));
    assert_eq!(stage.pending_tasks_for(id), 0);
    let run = stage.run_until(Millis(500.0));
    assert_eq!(run.frames, 0);
    assert_eq!(board.0.borrow().writes(), 0);
}

#[test]
fn wide_viewport_moves_markers_every_frame() {
    let board = shared();
    let effect =
        OrbitEffect::mount(Some(board.clone()), OrbitConfig::default(), vp(1280, 800)).unwrap();
    let mut stage = stage(vp(1280, 800));
    stage.mount(Box::new(effect));

    let run = stage.run_until(Millis(160.0));
    assert_eq!(run.frames, 10);
    assert_eq!(board.0.borrow().writes(), 40);

    let about = OrbitMarker::new("nav-about", 250.0, 0.0048, 45.0);
    let size = Size::new(48.0, 48.0);
    let expected = css_translate(about.offset(Millis(160.0), size, Point::ORIGIN));
    assert_eq!(board.0.borrow().transform("nav-about"), Some(expected.as_str()));
}

#[test]
fn resize_across_breakpoint_toggles_motion() {
    let board = shared();
    let effect =
        OrbitEffect::mount(Some(board.clone()), OrbitConfig::default(), vp(1280, 800)).unwrap();
    let mut stage = stage(vp(1280, 800));
    let id = stage.mount(Box::new(effect));
    stage.run_until(Millis(32.0));
    let writes = board.0.borrow().writes();
    assert_eq!(writes, 8);

    stage.resize(vp(600, 800));
    assert_eq!(stage.pending_tasks_for(id), 0);
    stage.run_until(Millis(200.0));
    assert_eq!(board.0.borrow().writes(), writes);

    stage.resize(vp(1024, 800));
    assert_eq!(stage.pending_tasks_for(id), 1);
    stage.run_until(Millis(216.0));
    assert_eq!(board.0.borrow().writes(), writes + 4);
}

#[test]
fn resize_within_same_side_keeps_the_loop() {
    let mut effect =
        OrbitEffect::mount(Some(MarkerBoard::new()), OrbitConfig::default(), vp(1280, 800))
            .unwrap();
    assert_eq!(effect.resize(vp(1920, 1080), Millis(0.0)), None);
    assert_eq!(effect.resize(vp(700, 1080), Millis(0.0)), Some(Wake::Idle));
    assert_eq!(effect.resize(vp(500, 1080), Millis(0.0)), None);
    assert_eq!(effect.resize(vp(800, 1080), Millis(0.0)), Some(Wake::NextFrame));
}

#[test]
fn unmount_cancels_the_frame_request() {
    let effect =
        OrbitEffect::mount(Some(shared()), OrbitConfig::default(), vp(1280, 800)).unwrap();
    let mut stage = stage(vp(1280, 800));
    let id = stage.mount(Box::new(effect));
    stage.run_until(Millis(48.0));
    stage.unmount(id);
    assert_eq!(stage.pending_tasks(), 0);
    assert_eq!(stage.run_until(Millis(1000.0)).frames, 0);
}
