use crate::foundation::core::{Point, Rgba, Viewport};
use crate::foundation::error::{FxError, FxResult};
use crate::foundation::math::Rng64;
use std::f64::consts::TAU;

/// Closed-open numeric range `[min, max)` used for randomized particle parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample(self, rng: &mut Rng64) -> f64 {
        rng.range(self.min, self.max)
    }

    fn validate(self, what: &str) -> FxResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(FxError::validation(format!(
                "{what}: expected finite min <= max, got {}..{}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// One parallax layer of stars.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StarLayer {
    pub name: String,
    pub count: u32,
    pub radius: Span,
    /// Multiplier applied to the shared rotation accumulator.
    pub speed: f64,
    pub twinkle: bool,
}

impl StarLayer {
    pub fn new(name: &str, count: u32, radius: Span, speed: f64, twinkle: bool) -> Self {
        Self {
            name: name.to_owned(),
            count,
            radius,
            speed,
            twinkle,
        }
    }

    pub fn validate(&self) -> FxResult<()> {
        self.radius.validate(&format!("star layer '{}' radius", self.name))?;
        if self.radius.min < 0.0 {
            return Err(FxError::validation(format!(
                "star layer '{}' radius must be >= 0",
                self.name
            )));
        }
        if !self.speed.is_finite() {
            return Err(FxError::validation(format!(
                "star layer '{}' speed must be finite",
                self.name
            )));
        }
        Ok(())
    }
}

/// Static colored glow painted as a radial gradient every frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Nebula {
    /// Normalized center, `[0, 1]` of the viewport width.
    pub x: f64,
    /// Normalized center, `[0, 1]` of the viewport height.
    pub y: f64,
    /// Radius relative to `min(width, height)`.
    pub radius: f64,
    pub color: Rgba,
}

impl Nebula {
    pub fn new(x: f64, y: f64, radius: f64, color: Rgba) -> FxResult<Self> {
        let n = Self {
            x,
            y,
            radius,
            color,
        };
        n.validate()?;
        Ok(n)
    }

    pub fn validate(&self) -> FxResult<()> {
        let unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !unit(self.x) || !unit(self.y) {
            return Err(FxError::validation("nebula center must lie in [0, 1]"));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(FxError::validation("nebula radius must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.color.a) {
            return Err(FxError::validation("nebula alpha must lie in [0, 1]"));
        }
        Ok(())
    }

    pub fn center_in(&self, viewport: Viewport) -> Point {
        Point::new(
            self.x * f64::from(viewport.width),
            self.y * f64::from(viewport.height),
        )
    }

    pub fn radius_in(&self, viewport: Viewport) -> f64 {
        self.radius * viewport.min_side()
    }
}

/// How often a comet may appear.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CometSpawn {
    /// Fixed chance per rendered frame; the effective rate follows the display refresh rate.
    PerFrame { chance: f64 },
    /// Poisson rate per wall-clock second, independent of refresh rate.
    PerSecond { rate: f64 },
}

impl CometSpawn {
    /// Probability of a spawn attempt succeeding on a frame `dt_secs` after the previous one.
    pub fn probability(self, dt_secs: f64) -> f64 {
        match self {
            Self::PerFrame { chance } => chance,
            Self::PerSecond { rate } => 1.0 - (-rate * dt_secs.max(0.0)).exp(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CometConfig {
    pub spawn: CometSpawn,
    pub max_live: usize,
    /// Alpha removed per frame.
    pub fade_step: f64,
    pub radius: Span,
    pub speed: Span,
    pub length: Span,
    pub color: Rgba,
}

impl Default for CometConfig {
    fn default() -> Self {
        Self {
            spawn: CometSpawn::PerFrame { chance: 0.03 },
            max_live: 1,
            fade_step: 0.008,
            radius: Span::new(0.5, 2.0),
            speed: Span::new(0.3, 1.1),
            length: Span::new(30.0, 90.0),
            color: Rgba::new(213, 183, 112, 1.0),
        }
    }
}

impl CometConfig {
    pub fn validate(&self) -> FxResult<()> {
        match self.spawn {
            CometSpawn::PerFrame { chance } if !(0.0..=1.0).contains(&chance) => {
                return Err(FxError::validation("comet spawn chance must lie in [0, 1]"));
            }
            CometSpawn::PerSecond { rate } if !rate.is_finite() || rate < 0.0 => {
                return Err(FxError::validation("comet spawn rate must be >= 0"));
            }
            _ => {}
        }
        if !self.fade_step.is_finite() || self.fade_step <= 0.0 {
            return Err(FxError::validation("comet fade step must be > 0"));
        }
        self.radius.validate("comet radius")?;
        self.speed.validate("comet speed")?;
        self.length.validate("comet length")?;
        Ok(())
    }
}

/// Starfield parameters. Defaults reproduce the portfolio hero background.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub layers: Vec<StarLayer>,
    pub nebulae: Vec<Nebula>,
    /// Seconds for one full revolution of the accumulator, at `reference_fps`.
    pub rotation_period_secs: f64,
    pub reference_fps: f64,
    pub star_color: Rgba,
    pub star_alpha: Span,
    pub twinkle_speed: Span,
    pub comet: CometConfig,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            layers: vec![
                StarLayer::new("foreground", 40, Span::new(1.5, 2.5), 0.8, true),
                StarLayer::new("midground", 100, Span::new(0.8, 1.5), 0.5, false),
                StarLayer::new("background", 400, Span::new(0.3, 0.8), 0.2, false),
            ],
            nebulae: vec![
                // indigo, teal, purple
                Nebula {
                    x: 0.2,
                    y: 0.3,
                    radius: 0.4,
                    color: Rgba::new(75, 0, 130, 0.15),
                },
                Nebula {
                    x: 0.8,
                    y: 0.7,
                    radius: 0.5,
                    color: Rgba::new(0, 75, 130, 0.12),
                },
                Nebula {
                    x: 0.5,
                    y: 0.8,
                    radius: 0.3,
                    color: Rgba::new(130, 0, 75, 0.15),
                },
            ],
            rotation_period_secs: 240.0,
            reference_fps: 60.0,
            star_color: Rgba::new(222, 226, 230, 1.0),
            star_alpha: Span::new(0.2, 0.6),
            twinkle_speed: Span::new(0.0, 0.02),
            comet: CometConfig::default(),
        }
    }
}

impl StarfieldConfig {
    pub fn validate(&self) -> FxResult<()> {
        for layer in &self.layers {
            layer.validate()?;
        }
        for nebula in &self.nebulae {
            nebula.validate()?;
        }
        if !self.rotation_period_secs.is_finite() || self.rotation_period_secs <= 0.0 {
            return Err(FxError::validation("rotation period must be > 0"));
        }
        if !self.reference_fps.is_finite() || self.reference_fps <= 0.0 {
            return Err(FxError::validation("reference fps must be > 0"));
        }
        self.star_alpha.validate("star alpha")?;
        self.twinkle_speed.validate("twinkle speed")?;
        self.comet.validate()
    }

    /// Sum of configured per-layer counts.
    pub fn total_stars(&self) -> usize {
        self.layers.iter().map(|l| l.count as usize).sum()
    }

    /// Accumulator increment per frame.
    pub fn rotation_step(&self) -> f64 {
        TAU / (self.rotation_period_secs * self.reference_fps)
    }
}

/// A star in polar coordinates around the viewport center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub layer: usize,
    pub dist: f64,
    pub angle: f64,
    pub radius: f64,
    pub alpha: f64,
    pub twinkle: bool,
    pub twinkle_speed: f64,
    pub twinkle_phase: f64,
    pub speed_multiplier: f64,
}

impl Star {
    /// Draw order matters for reproducibility: dist, angle, radius, alpha, twinkle speed, phase.
    pub(crate) fn generate(
        rng: &mut Rng64,
        layer_idx: usize,
        layer: &StarLayer,
        cfg: &StarfieldConfig,
        max_dist: f64,
    ) -> Self {
        let u = rng.next_f64_01();
        Self {
            layer: layer_idx,
            dist: u * u * max_dist / 2.0,
            angle: rng.next_f64_01() * TAU,
            radius: layer.radius.sample(rng),
            alpha: cfg.star_alpha.sample(rng),
            twinkle: layer.twinkle,
            twinkle_speed: cfg.twinkle_speed.sample(rng),
            twinkle_phase: rng.next_f64_01() * TAU,
            speed_multiplier: layer.speed,
        }
    }

    pub fn position(&self, center: Point, rotation: f64) -> Point {
        let a = self.angle + rotation * self.speed_multiplier;
        Point::new(
            center.x + a.cos() * self.dist,
            center.y + a.sin() * self.dist,
        )
    }

    /// Alpha at wall-clock `now_ms`, sine-modulated for twinkling stars.
    pub fn alpha_at(&self, now_ms: f64) -> f64 {
        if !self.twinkle {
            return self.alpha;
        }
        let wave = (self.twinkle_phase + now_ms * 0.001 * self.twinkle_speed).sin();
        self.alpha * (wave * 0.4 + 0.6)
    }
}

/// Short-lived streak crossing the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comet {
    pub head: Point,
    pub radius: f64,
    pub speed: f64,
    pub angle: f64,
    pub length: f64,
    pub alpha: f64,
}

impl Comet {
    pub(crate) fn generate(rng: &mut Rng64, viewport: Viewport, cfg: &CometConfig) -> Self {
        let x = rng.next_f64_01() * f64::from(viewport.width);
        let y = rng.next_f64_01() * f64::from(viewport.height);
        Self {
            head: Point::new(x, y),
            radius: cfg.radius.sample(rng),
            speed: cfg.speed.sample(rng),
            angle: rng.next_f64_01() * TAU,
            length: cfg.length.sample(rng),
            alpha: 1.0,
        }
    }

    pub fn tail(&self) -> Point {
        Point::new(
            self.head.x - self.length * self.angle.cos(),
            self.head.y - self.length * self.angle.sin(),
        )
    }

    /// Move one frame along the heading and fade. Returns true once fully faded.
    pub fn advance(&mut self, fade_step: f64) -> bool {
        self.head.x += self.angle.cos() * self.speed;
        self.head.y += self.angle.sin() * self.speed;
        self.alpha -= fade_step;
        self.alpha <= 0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/starfield/model.rs"]
mod tests;
