use crate::foundation::core::{Millis, Rgba, Viewport};
use crate::foundation::error::FxResult;
use crate::foundation::math::Rng64;
use crate::render::surface::Surface;
use crate::starfield::model::{Comet, Star, StarfieldConfig};

/// Bookkeeping for one rendered frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Stars painted, per layer.
    pub drawn: Vec<u32>,
    /// Stars outside the visible surface, per layer.
    pub culled: Vec<u32>,
    pub comets_drawn: u32,
    pub comet_spawned: bool,
    pub comets_retired: u32,
}

impl FrameStats {
    fn for_layers(n: usize) -> Self {
        Self {
            drawn: vec![0; n],
            culled: vec![0; n],
            ..Self::default()
        }
    }

    /// Drawn plus culled stars of `layer`; equals the layer's count on every frame.
    pub fn accounted(&self, layer: usize) -> u32 {
        self.drawn.get(layer).copied().unwrap_or(0) + self.culled.get(layer).copied().unwrap_or(0)
    }

    pub fn total_accounted(&self) -> u32 {
        self.drawn.iter().sum::<u32>() + self.culled.iter().sum::<u32>()
    }
}

/// Layered rotating starfield with nebulae and comets.
///
/// All state is owned by the instance; two engines never influence each other.
#[derive(Clone, Debug)]
pub struct StarfieldEngine {
    config: StarfieldConfig,
    viewport: Viewport,
    rng: Rng64,
    stars: Vec<Star>,
    comets: Vec<Comet>,
    rotation: f64,
    rotation_step: f64,
    last_frame: Option<Millis>,
    generation: u64,
}

impl StarfieldEngine {
    /// Validate `config` and populate every layer for `viewport`.
    pub fn initialize(config: StarfieldConfig, viewport: Viewport, seed: u64) -> FxResult<Self> {
        config.validate()?;
        let rotation_step = config.rotation_step();
        let mut engine = Self {
            config,
            viewport,
            rng: Rng64::new(seed),
            stars: Vec::new(),
            comets: Vec::new(),
            rotation: 0.0,
            rotation_step,
            last_frame: None,
            generation: 0,
        };
        engine.regenerate();
        Ok(engine)
    }

    /// Throw away every star and regenerate for the new viewport diagonal.
    ///
    /// Rotation and live comets carry over.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.regenerate();
    }

    #[tracing::instrument(skip(self), fields(w = self.viewport.width, h = self.viewport.height))]
    fn regenerate(&mut self) {
        let max_dist = self.viewport.diagonal();
        let mut stars = Vec::with_capacity(self.config.total_stars());
        for (idx, layer) in self.config.layers.iter().enumerate() {
            for _ in 0..layer.count {
                stars.push(Star::generate(
                    &mut self.rng,
                    idx,
                    layer,
                    &self.config,
                    max_dist,
                ));
            }
        }
        self.stars = stars;
        self.generation += 1;
        tracing::debug!(
            stars = self.stars.len(),
            generation = self.generation,
            "generated star population"
        );
    }

    /// Draw one frame at wall-clock `now`.
    pub fn render_frame(&mut self, now: Millis, surface: &mut dyn Surface) -> FrameStats {
        let mut stats = FrameStats::for_layers(self.config.layers.len());
        let vp = self.viewport;

        surface.clear();
        self.rotation += self.rotation_step;

        for nebula in &self.config.nebulae {
            surface.fill_radial_gradient(
                nebula.center_in(vp),
                nebula.radius_in(vp),
                nebula.color,
                Rgba::transparent(),
            );
        }

        let center = vp.center();
        let color = self.config.star_color;
        for star in &self.stars {
            let p = star.position(center, self.rotation);
            if vp.contains_strict(p) {
                surface.fill_circle(p, star.radius, color.with_alpha(star.alpha_at(now.0)));
                stats.drawn[star.layer] += 1;
            } else {
                stats.culled[star.layer] += 1;
            }
        }

        stats.comet_spawned = self.maybe_spawn_comet(now);

        let comet_cfg = &self.config.comet;
        let mut retired = 0;
        for comet in &mut self.comets {
            surface.stroke_gradient_line(
                comet.head,
                comet.tail(),
                comet.radius,
                comet_cfg.color.with_alpha(comet.alpha),
                comet_cfg.color.with_alpha(0.0),
            );
            stats.comets_drawn += 1;
        }
        self.comets.retain_mut(|comet| {
            let faded = comet.advance(comet_cfg.fade_step);
            if faded {
                retired += 1;
            }
            !faded
        });
        stats.comets_retired = retired;
        if retired > 0 {
            tracing::trace!(retired, "comet faded out");
        }

        surface.present(now);
        self.last_frame = Some(now);
        stats
    }

    fn maybe_spawn_comet(&mut self, now: Millis) -> bool {
        if self.comets.len() >= self.config.comet.max_live {
            return false;
        }
        let dt_secs = match self.last_frame {
            Some(prev) => (now - prev).as_secs().max(0.0),
            None => 1.0 / self.config.reference_fps,
        };
        let p = self.config.comet.spawn.probability(dt_secs);
        if self.rng.next_f64_01() > 1.0 - p {
            let comet = Comet::generate(&mut self.rng, self.viewport, &self.config.comet);
            tracing::trace!(x = comet.head.x, y = comet.head.y, "comet spawned");
            self.comets.push(comet);
            return true;
        }
        false
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn layer_count(&self, layer: usize) -> usize {
        self.stars.iter().filter(|s| s.layer == layer).count()
    }

    pub fn comets(&self) -> &[Comet] {
        &self.comets
    }

    /// Shared rotation accumulator, radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn rotation_step(&self) -> f64 {
        self.rotation_step
    }

    /// Number of wholesale star regenerations (1 after initialize).
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
#[path = "../../tests/unit/starfield/engine.rs"]
mod tests;
