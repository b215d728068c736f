use crate::foundation::core::{Millis, Size, Viewport};
use crate::foundation::error::FxResult;
use crate::orbit::model::{OrbitConfig, OrbitMarker, css_translate};
use std::collections::BTreeMap;

/// Host elements the orbit controller positions.
pub trait MarkerSink {
    /// Rendered size of the marker element, or `None` when it is not in the document.
    fn marker_size(&self, id: &str) -> Option<Size>;

    /// Replace the marker's CSS `transform`.
    fn apply_transform(&mut self, id: &str, transform: &str);
}

/// In-memory [`MarkerSink`] keeping the last transform written per marker.
#[derive(Clone, Debug, Default)]
pub struct MarkerBoard {
    markers: BTreeMap<String, BoardEntry>,
    writes: u64,
}

#[derive(Clone, Debug)]
struct BoardEntry {
    size: Size,
    transform: Option<String>,
}

impl MarkerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board holding one element of `size` for every marker in `config`.
    pub fn for_config(config: &OrbitConfig, size: Size) -> Self {
        let mut board = Self::new();
        for m in &config.markers {
            board.insert(&m.id, size);
        }
        board
    }

    pub fn insert(&mut self, id: &str, size: Size) {
        self.markers.insert(
            id.to_string(),
            BoardEntry {
                size,
                transform: None,
            },
        );
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.markers.remove(id).is_some()
    }

    pub fn transform(&self, id: &str) -> Option<&str> {
        self.markers.get(id)?.transform.as_deref()
    }

    /// Total `apply_transform` calls that hit a present element.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl MarkerSink for MarkerBoard {
    fn marker_size(&self, id: &str) -> Option<Size> {
        self.markers.get(id).map(|e| e.size)
    }

    fn apply_transform(&mut self, id: &str, transform: &str) {
        if let Some(entry) = self.markers.get_mut(id) {
            entry.transform = Some(transform.to_string());
            self.writes += 1;
        }
    }
}

/// Positions every orbit marker as a pure function of time.
#[derive(Clone, Debug)]
pub struct OrbitController {
    config: OrbitConfig,
}

impl OrbitController {
    pub fn new(config: OrbitConfig) -> FxResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn markers(&self) -> &[OrbitMarker] {
        &self.config.markers
    }

    pub fn enabled_for(&self, viewport: Viewport) -> bool {
        self.config.enabled_for(viewport)
    }

    /// Write the current transform of every present marker. Returns how many were positioned.
    pub fn tick(&self, now: Millis, sink: &mut dyn MarkerSink) -> usize {
        let mut applied = 0;
        for marker in &self.config.markers {
            let Some(size) = sink.marker_size(&marker.id) else {
                continue;
            };
            let p = marker.offset(now, size, self.config.center);
            sink.apply_transform(&marker.id, &css_translate(p));
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
#[path = "../../tests/unit/orbit/controller.rs"]
mod tests;
