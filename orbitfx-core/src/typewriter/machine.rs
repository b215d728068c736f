use crate::foundation::core::Millis;
use crate::foundation::error::{FxError, FxResult};

/// Where the cycler is within the current phrase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Typing,
    PausedAtFull,
    Deleting,
    PausedAtEmpty,
}

/// Delays between ticks.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TypewriterTiming {
    pub type_interval: Millis,
    pub hold_full: Millis,
    pub delete_interval: Millis,
    pub hold_empty: Millis,
    /// Delay before the very first tick after mount.
    pub start_delay: Millis,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            type_interval: Millis(100.0),
            hold_full: Millis(2000.0),
            delete_interval: Millis(50.0),
            hold_empty: Millis(500.0),
            start_delay: Millis(1000.0),
        }
    }
}

impl TypewriterTiming {
    /// Tick delays must be positive; only `start_delay` may be zero.
    pub fn validate(&self) -> FxResult<()> {
        let ticks = [
            ("type_interval", self.type_interval),
            ("hold_full", self.hold_full),
            ("delete_interval", self.delete_interval),
            ("hold_empty", self.hold_empty),
        ];
        for (name, d) in ticks {
            if !d.0.is_finite() || d.0 <= 0.0 {
                return Err(FxError::validation(format!(
                    "typewriter {name} must be finite and > 0"
                )));
            }
        }
        if !self.start_delay.0.is_finite() || self.start_delay.0 < 0.0 {
            return Err(FxError::validation(
                "typewriter start_delay must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Non-empty list of non-empty phrases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phrases {
    items: Vec<String>,
    // Cached char counts; indices are counted in Unicode scalar values.
    lens: Vec<usize>,
}

impl Phrases {
    pub fn new<I, S>(items: I) -> FxResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return Err(FxError::validation("typewriter needs at least one phrase"));
        }
        if let Some(i) = items.iter().position(|p| p.is_empty()) {
            return Err(FxError::validation(format!(
                "typewriter phrase {i} is empty"
            )));
        }
        let lens = items.iter().map(|p| p.chars().count()).collect();
        Ok(Self { items, lens })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> &str {
        &self.items[index % self.items.len()]
    }

    /// Length of phrase `index` in chars.
    pub fn char_len(&self, index: usize) -> usize {
        self.lens[index % self.lens.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

/// Typewriter cursor: which phrase, how much of it is shown, and what happens next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypewriterState {
    pub phrase: usize,
    pub chars: usize,
    pub phase: Phase,
}

impl Default for TypewriterState {
    fn default() -> Self {
        Self::initial()
    }
}

impl TypewriterState {
    pub const fn initial() -> Self {
        Self {
            phrase: 0,
            chars: 0,
            phase: Phase::Typing,
        }
    }

    /// One tick: returns the next state and the delay until the following tick.
    ///
    /// Pure; `chars` never leaves `0..=len(phrase)`.
    pub fn step(&self, phrases: &Phrases, timing: &TypewriterTiming) -> (Self, Millis) {
        let phrase = self.phrase % phrases.len();
        let len = phrases.char_len(phrase);
        match self.phase {
            Phase::Typing | Phase::PausedAtEmpty => {
                let chars = (self.chars + 1).min(len);
                if chars == len {
                    let next = Self {
                        phrase,
                        chars,
                        phase: Phase::PausedAtFull,
                    };
                    (next, timing.hold_full)
                } else {
                    let next = Self {
                        phrase,
                        chars,
                        phase: Phase::Typing,
                    };
                    (next, timing.type_interval)
                }
            }
            Phase::PausedAtFull | Phase::Deleting => {
                let chars = self.chars.min(len).saturating_sub(1);
                if chars == 0 {
                    let next = Self {
                        phrase: (phrase + 1) % phrases.len(),
                        chars: 0,
                        phase: Phase::PausedAtEmpty,
                    };
                    (next, timing.hold_empty)
                } else {
                    let next = Self {
                        phrase,
                        chars,
                        phase: Phase::Deleting,
                    };
                    (next, timing.delete_interval)
                }
            }
        }
    }

    /// The prefix of the current phrase that is on screen.
    pub fn visible_text<'a>(&self, phrases: &'a Phrases) -> &'a str {
        let text = phrases.get(self.phrase);
        match text.char_indices().nth(self.chars) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/typewriter/machine.rs"]
mod tests;
