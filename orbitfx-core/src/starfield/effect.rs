use crate::foundation::core::{Millis, Viewport};
use crate::render::surface::Surface;
use crate::runtime::stage::{Effect, Wake};
use crate::starfield::engine::{FrameStats, StarfieldEngine};
use crate::starfield::model::StarfieldConfig;

type FrameHook<S> = Box<dyn FnMut(&FrameStats, &S)>;

/// Stage adapter redrawing a [`StarfieldEngine`] onto an owned surface every frame.
pub struct StarfieldEffect<S: Surface> {
    engine: StarfieldEngine,
    surface: S,
    on_frame: Option<FrameHook<S>>,
    frames: u64,
}

impl<S: Surface> StarfieldEffect<S> {
    /// Build the effect, or `None` when there is nothing to draw on.
    ///
    /// A missing surface or an invalid config is logged and mounting becomes a no-op.
    pub fn mount(surface: Option<S>, config: StarfieldConfig, seed: u64) -> Option<Self> {
        let Some(surface) = surface else {
            tracing::debug!("starfield surface unavailable, skipping");
            return None;
        };
        let engine = match StarfieldEngine::initialize(config, surface.viewport(), seed) {
            Ok(engine) => engine,
            Err(err) => {
                tracing::warn!(%err, "starfield disabled");
                return None;
            }
        };
        Some(Self {
            engine,
            surface,
            on_frame: None,
            frames: 0,
        })
    }

    /// Observe every rendered frame together with the surface it was drawn on.
    pub fn on_frame(mut self, hook: impl FnMut(&FrameStats, &S) + 'static) -> Self {
        self.on_frame = Some(Box::new(hook));
        self
    }

    pub fn engine(&self) -> &StarfieldEngine {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn draw(&mut self, now: Millis) {
        let stats = self.engine.render_frame(now, &mut self.surface);
        self.frames += 1;
        if let Some(hook) = self.on_frame.as_mut() {
            hook(&stats, &self.surface);
        }
    }
}

impl<S: Surface> Effect for StarfieldEffect<S> {
    fn name(&self) -> &'static str {
        "starfield"
    }

    fn listens_to_resize(&self) -> bool {
        true
    }

    fn start(&mut self, now: Millis) -> Wake {
        self.draw(now);
        Wake::NextFrame
    }

    fn wake(&mut self, now: Millis) -> Wake {
        self.draw(now);
        Wake::NextFrame
    }

    fn resize(&mut self, viewport: Viewport, _now: Millis) -> Option<Wake> {
        if let Err(err) = self.surface.resize(viewport) {
            // Old size stays in effect.
            tracing::warn!(%err, "starfield surface resize failed");
            return None;
        }
        self.engine.on_resize(viewport);
        None
    }

    fn stop(&mut self) {
        tracing::debug!(frames = self.frames, "starfield stopped");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/starfield/effect.rs"]
mod tests;
