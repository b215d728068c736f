use crate::foundation::core::ElementId;
use crate::foundation::error::{FxError, FxResult};
use crate::runtime::stage::{Handler, Registration, Target};
use std::collections::{BTreeMap, BTreeSet};

/// How a watched element reveals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealKind {
    /// Only the element itself toggles.
    Single,
    /// The element toggles and every direct child mirrors it.
    Staggered,
}

/// One visibility report for a watched element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    /// Visible fraction of the element, `0..=1`.
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Entry whose `is_intersecting` flag is derived from `ratio` against `threshold`.
    pub fn at_ratio(target: ElementId, ratio: f64, threshold: f64) -> Self {
        Self {
            target,
            ratio,
            is_intersecting: crosses(ratio, threshold),
        }
    }
}

pub(crate) fn validate_threshold(threshold: f64) -> FxResult<()> {
    // NaN fails the range check too.
    if !(0.0..=1.0).contains(&threshold) {
        return Err(FxError::validation(format!(
            "reveal threshold must lie in [0, 1], got {threshold}"
        )));
    }
    Ok(())
}

/// Whether `ratio` counts as visible for `threshold`. A zero threshold means any overlap.
pub(crate) fn crosses(ratio: f64, threshold: f64) -> bool {
    if threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio >= threshold
    }
}

/// Class and child access on the host document.
pub trait ClassList {
    /// Direct children of `id`, in document order. Unknown ids have none.
    fn children(&self, id: ElementId) -> Vec<ElementId>;

    /// Add (`on`) or remove a class. Idempotent.
    fn set_class(&mut self, id: ElementId, class: &str, on: bool);
}

#[derive(Clone, Debug, Default)]
struct Node {
    children: Vec<ElementId>,
    classes: BTreeSet<String>,
}

/// In-memory element tree implementing [`ClassList`].
#[derive(Clone, Debug, Default)]
pub struct ElementTree {
    nodes: BTreeMap<ElementId, Node>,
    next: u32,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new element under `parent` (or at the root) and return its id.
    pub fn add(&mut self, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        self.nodes.insert(id, Node::default());
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.push(id);
        }
        id
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|n| n.classes.contains(class))
    }

    pub fn classes(&self, id: ElementId) -> Vec<&str> {
        self.nodes
            .get(&id)
            .map(|n| n.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl ClassList for ElementTree {
    fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn set_class(&mut self, id: ElementId, class: &str, on: bool) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if on {
            node.classes.insert(class.to_string());
        } else {
            node.classes.remove(class);
        }
    }
}

/// Scroll reveal settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Visible fraction at which an element counts as in view.
    pub threshold: f64,
    pub class: String,
    /// Class mirrored onto children of staggered containers.
    pub child_class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.25,
            class: "in-view".to_string(),
            child_class: "in-view-child".to_string(),
        }
    }
}

impl RevealConfig {
    pub fn validate(&self) -> FxResult<()> {
        validate_threshold(self.threshold)?;
        if self.class.is_empty() || self.child_class.is_empty() {
            return Err(FxError::validation("reveal class names must not be empty"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct Watch {
    kind: RevealKind,
    in_view: bool,
}

/// Toggles reveal classes on watched elements as intersection reports arrive.
#[derive(Clone, Debug)]
pub struct RevealObserver {
    config: RevealConfig,
    watched: BTreeMap<ElementId, Watch>,
}

impl RevealObserver {
    pub fn new(threshold: f64) -> FxResult<Self> {
        Self::from_config(RevealConfig {
            threshold,
            ..RevealConfig::default()
        })
    }

    pub fn from_config(config: RevealConfig) -> FxResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            watched: BTreeMap::new(),
        })
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Start watching `items`. Re-watching an element updates its kind and keeps its state.
    pub fn watch(&mut self, items: &[(ElementId, RevealKind)]) -> Vec<Registration> {
        items
            .iter()
            .map(|&(id, kind)| {
                self.watched
                    .entry(id)
                    .and_modify(|w| w.kind = kind)
                    .or_insert(Watch {
                        kind,
                        in_view: false,
                    });
                Registration {
                    target: Target::Observer,
                    handler: Handler::Observe(id),
                }
            })
            .collect()
    }

    pub fn is_watching(&self, id: ElementId) -> bool {
        self.watched.contains_key(&id)
    }

    pub fn watched(&self) -> usize {
        self.watched.len()
    }

    /// Last applied state of `id`; `None` when not watched.
    pub fn is_revealed(&self, id: ElementId) -> Option<bool> {
        self.watched.get(&id).map(|w| w.in_view)
    }

    /// Apply a batch of reports. Entries for unwatched elements are ignored.
    ///
    /// Returns how many entries were applied.
    pub fn on_intersections(
        &mut self,
        entries: &[IntersectionEntry],
        classes: &mut dyn ClassList,
    ) -> usize {
        let mut applied = 0;
        for entry in entries {
            let Some(watch) = self.watched.get_mut(&entry.target) else {
                tracing::trace!(id = entry.target.0, "intersection for unwatched element");
                continue;
            };
            let on = entry.is_intersecting;
            classes.set_class(entry.target, &self.config.class, on);
            if watch.kind == RevealKind::Staggered {
                for child in classes.children(entry.target) {
                    classes.set_class(child, &self.config.child_class, on);
                }
            }
            watch.in_view = on;
            applied += 1;
        }
        applied
    }

    /// Stop watching `ids`. Returns the detached registrations.
    pub fn unwatch(&mut self, ids: &[ElementId]) -> Vec<Registration> {
        ids.iter()
            .filter(|id| self.watched.remove(id).is_some())
            .map(|&id| Registration {
                target: Target::Observer,
                handler: Handler::Observe(id),
            })
            .collect()
    }

    /// Stop watching everything. Classes already applied stay as they are.
    pub fn dispose(&mut self) -> Vec<Registration> {
        let ids: Vec<ElementId> = self.watched.keys().copied().collect();
        let detached = self.unwatch(&ids);
        tracing::debug!(detached = detached.len(), "reveal observer disposed");
        detached
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/observer.rs"]
mod tests;
