use crate::foundation::core::{Millis, Viewport};
use crate::orbit::controller::{MarkerSink, OrbitController};
use crate::orbit::model::OrbitConfig;
use crate::runtime::stage::{Effect, Wake};

/// Stage adapter moving orbit markers every frame above the width breakpoint.
pub struct OrbitEffect<M: MarkerSink> {
    controller: OrbitController,
    sink: M,
    enabled: bool,
    ticks: u64,
}

impl<M: MarkerSink> OrbitEffect<M> {
    /// Build the effect for the current `viewport`, or `None` when there is nothing to move.
    ///
    /// The effect is still returned below the breakpoint; it stays idle until a resize crosses it.
    pub fn mount(sink: Option<M>, config: OrbitConfig, viewport: Viewport) -> Option<Self> {
        let Some(sink) = sink else {
            tracing::debug!("orbit markers unavailable, skipping");
            return None;
        };
        let controller = match OrbitController::new(config) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(%err, "orbit disabled");
                return None;
            }
        };
        let enabled = controller.enabled_for(viewport);
        Some(Self {
            controller,
            sink,
            enabled,
            ticks: 0,
        })
    }

    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    pub fn sink(&self) -> &M {
        &self.sink
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn next(&mut self, now: Millis) -> Wake {
        if !self.enabled {
            return Wake::Idle;
        }
        self.controller.tick(now, &mut self.sink);
        self.ticks += 1;
        Wake::NextFrame
    }
}

impl<M: MarkerSink> Effect for OrbitEffect<M> {
    fn name(&self) -> &'static str {
        "orbit"
    }

    fn listens_to_resize(&self) -> bool {
        true
    }

    fn start(&mut self, _now: Millis) -> Wake {
        if !self.enabled {
            tracing::debug!("viewport at or below breakpoint, orbit idle");
            return Wake::Idle;
        }
        // First positions land on the first frame, like a requestAnimationFrame kick-off.
        Wake::NextFrame
    }

    fn wake(&mut self, now: Millis) -> Wake {
        self.next(now)
    }

    fn resize(&mut self, viewport: Viewport, _now: Millis) -> Option<Wake> {
        let enabled = self.controller.enabled_for(viewport);
        if enabled == self.enabled {
            return None;
        }
        self.enabled = enabled;
        tracing::debug!(enabled, width = viewport.width, "orbit breakpoint crossed");
        Some(if enabled { Wake::NextFrame } else { Wake::Idle })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/orbit/effect.rs"]
mod tests;
