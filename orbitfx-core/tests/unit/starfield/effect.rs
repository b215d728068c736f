use super::*;
use crate::render::cpu::CpuSurface;
use crate::render::recording::RecordingSurface;
use crate::runtime::clock::ManualClock;
use crate::runtime::stage::{Stage, StageOpts};
use std::cell::RefCell;
use std::rc::Rc;

fn vp(w: u32, h: u32) -> Viewport {
    Viewport::new(w, h).unwrap()
}

fn stage(viewport: Viewport) -> Stage<ManualClock> {
    let opts = StageOpts {
        frame_interval: Millis(16.0),
    };
    Stage::new(ManualClock::new(), viewport, opts)
}

#[test]
fn missing_surface_is_a_noop() {
    let effect =
        StarfieldEffect::<RecordingSurface>::mount(None, StarfieldConfig::default(), 1);
    assert!(effect.is_none());
}

#[test]
fn invalid_config_is_a_noop() {
    let mut cfg = StarfieldConfig::default();
    cfg.comet.fade_step = 0.0;
    let effect = StarfieldEffect::mount(Some(RecordingSurface::new(vp(10, 10))), cfg, 1);
    assert!(effect.is_none());
}

#[test]
fn unallocatable_cpu_surface_is_a_noop() {
    let surface = CpuSurface::new(vp(100_000, 10)).ok();
    assert!(StarfieldEffect::mount(surface, StarfieldConfig::default(), 1).is_none());
}

#[test]
fn start_draws_immediately() {
    let mut effect = StarfieldEffect::mount(
        Some(RecordingSurface::new(vp(320, 200))),
        StarfieldConfig::default(),
        3,
    )
    .unwrap();
    assert_eq!(effect.start(Millis(0.0)), Wake::NextFrame);
    assert_eq!(effect.frames(), 1);
    assert_eq!(effect.surface().clears(), 1);
    assert_eq!(effect.surface().radial_gradients(), 3);
    assert!(effect.listens_to_resize());
}

#[test]
fn redraws_on_every_stage_frame() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let effect = StarfieldEffect::mount(
        Some(RecordingSurface::new(vp(640, 480))),
        StarfieldConfig::default(),
        11,
    )
    .unwrap()
    .on_frame(move |stats, _| sink.borrow_mut().push(stats.total_accounted()));

    let mut stage = stage(vp(640, 480));
    let id = stage.mount(Box::new(effect));
    let run = stage.run_until(Millis(160.0));

    assert_eq!(run.frames, 10);
    // One draw on mount plus one per frame.
    assert_eq!(seen.borrow().len(), 11);
    assert!(seen.borrow().iter().all(|&n| n == 540));
    assert_eq!(stage.pending_tasks_for(id), 1);
}

#[test]
fn stage_resize_reaches_surface_and_engine() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let effect = StarfieldEffect::mount(
        Some(RecordingSurface::new(vp(640, 480))),
        StarfieldConfig::default(),
        11,
    )
    .unwrap()
    .on_frame(move |stats, surface: &RecordingSurface| {
        sink.borrow_mut()
            .push((surface.viewport(), stats.total_accounted()));
    });

    let mut stage = stage(vp(640, 480));
    stage.mount(Box::new(effect));
    stage.run_until(Millis(20.0));
    stage.resize(vp(1024, 768));
    stage.run_until(Millis(40.0));

    let seen = seen.borrow();
    assert_eq!(seen.first().unwrap().0, vp(640, 480));
    assert_eq!(seen.last().unwrap(), &(vp(1024, 768), 540));
}

#[test]
fn unmount_stops_the_frame_loop() {
    let count = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&count);
    let effect = StarfieldEffect::mount(
        Some(RecordingSurface::new(vp(200, 200))),
        StarfieldConfig::default(),
        5,
    )
    .unwrap()
    .on_frame(move |_, _| *sink.borrow_mut() += 1);

    let mut stage = stage(vp(200, 200));
    let id = stage.mount(Box::new(effect));
    stage.run_until(Millis(50.0));
    assert!(stage.unmount(id));
    let drawn = *count.borrow();

    assert_eq!(stage.pending_tasks(), 0);
    assert!(stage.registrations(id).is_empty());
    let run = stage.run_until(Millis(500.0));
    assert_eq!(run.frames, 0);
    assert_eq!(*count.borrow(), drawn);
}

#[test]
fn two_starfields_run_side_by_side() {
    let a = Rc::new(RefCell::new(Vec::new()));
    let b = Rc::new(RefCell::new(Vec::new()));
    let (sa, sb) = (Rc::clone(&a), Rc::clone(&b));
    let mut stage = stage(vp(300, 300));
    for (seed, sink) in [(9, sa), (9, sb)] {
        let effect = StarfieldEffect::mount(
            Some(RecordingSurface::new(vp(300, 300))),
            StarfieldConfig::default(),
            seed,
        )
        .unwrap()
        .on_frame(move |_, surface: &RecordingSurface| {
            sink.borrow_mut().push(surface.ops().to_vec());
        });
        stage.mount(Box::new(effect));
    }
    stage.run_until(Millis(100.0));
    assert_eq!(*a.borrow(), *b.borrow());
}
