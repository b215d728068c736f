use crate::foundation::core::{ElementId, Rect, Viewport};
use crate::foundation::error::FxResult;
use crate::reveal::observer::{IntersectionEntry, crosses, validate_threshold};
use std::collections::BTreeMap;

/// Pixels below the hero's bottom edge at which the navbar switches to its scrolled style.
pub const NAVBAR_SCROLL_OFFSET: f64 = 80.0;

/// Whether the navbar shows its solid "scrolled" style.
pub fn navbar_scrolled(scroll_y: f64, hero_height: f64) -> bool {
    scroll_y > hero_height - NAVBAR_SCROLL_OFFSET
}

/// Visible fraction of `element` inside `root`.
///
/// Degenerate (zero-area) elements count as fully visible while they touch the root.
pub fn intersection_ratio(element: Rect, root: Rect) -> f64 {
    let area = element.area();
    if area <= 0.0 {
        let touching = element.x0 <= root.x1
            && element.x1 >= root.x0
            && element.y0 <= root.y1
            && element.y1 >= root.y0;
        return if touching { 1.0 } else { 0.0 };
    }
    let overlap = element.intersect(root);
    (overlap.area() / area).clamp(0.0, 1.0)
}

/// Document-space rectangle of the viewport scrolled to `scroll_y`.
pub fn scrolled_viewport(viewport: Viewport, scroll_y: f64) -> Rect {
    Rect::new(
        0.0,
        scroll_y,
        f64::from(viewport.width),
        scroll_y + f64::from(viewport.height),
    )
}

/// Turns element geometry into threshold-crossing reports for a [`crate::RevealObserver`].
///
/// Each element reports once when first seen, then only when it crosses the threshold.
#[derive(Clone, Debug)]
pub struct IntersectionTracker {
    threshold: f64,
    last: BTreeMap<ElementId, bool>,
}

impl IntersectionTracker {
    pub fn new(threshold: f64) -> FxResult<Self> {
        validate_threshold(threshold)?;
        Ok(Self {
            threshold,
            last: BTreeMap::new(),
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Measure `elements` against `root` and return the reports that changed.
    pub fn observe(
        &mut self,
        elements: &[(ElementId, Rect)],
        root: Rect,
    ) -> Vec<IntersectionEntry> {
        let mut out = Vec::new();
        for &(id, rect) in elements {
            let ratio = intersection_ratio(rect, root);
            let visible = crosses(ratio, self.threshold);
            if self.last.insert(id, visible) != Some(visible) {
                out.push(IntersectionEntry::at_ratio(id, ratio, self.threshold));
            }
        }
        out
    }

    /// Drop remembered state so `id` reports again on its next observation.
    pub fn forget(&mut self, id: ElementId) {
        self.last.remove(&id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/tracker.rs"]
mod tests;
