//! orbitfx is the procedural animation engine behind a portfolio hero section.
//!
//! It drives four independent effects from a single-threaded page host ([`Stage`]):
//!
//! - **Starfield**: layered rotating stars, nebula glows and occasional comets, redrawn every
//!   frame onto a 2D [`Surface`] ([`StarfieldEngine`], [`StarfieldEffect`]).
//! - **Orbit**: up to four navigation markers circling a shared center ([`OrbitController`],
//!   [`OrbitEffect`]).
//! - **Typewriter**: types and deletes an ordered phrase list forever ([`TypewriterState`],
//!   [`TypewriterEffect`]).
//! - **Reveal**: toggles `in-view` classes as watched elements cross a visibility threshold
//!   ([`RevealObserver`], [`IntersectionTracker`]).
//!
//! # Host model
//!
//! Browser primitives are traits: time is a [`Clock`], frame and timer callbacks go through the
//! stage's scheduler, drawing targets a [`Surface`], and document writes go to [`TextSink`],
//! [`MarkerSink`] and [`ClassList`]. Mounting an effect returns an id; unmounting it detaches
//! every registration and cancels every pending task.
//!
//! With a [`ManualClock`] and a [`RecordingSurface`] everything is deterministic, which is how
//! the test-suite runs. [`CpuSurface`] rasterizes to premultiplied RGBA8 via `vello_cpu`.
#![forbid(unsafe_code)]

mod config;
mod foundation;
mod orbit;
mod render;
mod reveal;
mod runtime;
mod starfield;
mod typewriter;

pub use config::HeroConfig;
pub use foundation::core::{ElementId, Millis, Point, Rect, Rgba, Size, Vec2, Viewport};
pub use foundation::error::{FxError, FxResult};
pub use foundation::math::Rng64;
pub use orbit::controller::{MarkerBoard, MarkerSink, OrbitController};
pub use orbit::effect::OrbitEffect;
pub use orbit::model::{MAX_MARKERS, OrbitConfig, OrbitMarker, css_translate};
pub use render::cpu::CpuSurface;
pub use render::recording::{DrawOp, RecordingSurface};
pub use render::surface::{FrameRGBA, Surface};
pub use reveal::observer::{
    ClassList, ElementTree, IntersectionEntry, RevealConfig, RevealKind, RevealObserver,
};
pub use reveal::tracker::{
    IntersectionTracker, NAVBAR_SCROLL_OFFSET, intersection_ratio, navbar_scrolled,
    scrolled_viewport,
};
pub use runtime::clock::{Clock, ManualClock, SystemClock};
pub use runtime::scheduler::{EffectId, Scheduler, TaskHandle, TaskKind};
pub use runtime::stage::{
    Effect, Handler, Registration, RunStats, Stage, StageOpts, Target, Wake,
};
pub use starfield::effect::StarfieldEffect;
pub use starfield::engine::{FrameStats, StarfieldEngine};
pub use starfield::model::{
    Comet, CometConfig, CometSpawn, Nebula, Span, Star, StarLayer, StarfieldConfig,
};
pub use typewriter::effect::{TextBuffer, TextSink, TypewriterConfig, TypewriterEffect};
pub use typewriter::machine::{Phase, Phrases, TypewriterState, TypewriterTiming};
