use crate::foundation::core::Millis;
use crate::foundation::error::FxResult;
use crate::runtime::stage::{Effect, Wake};
use crate::typewriter::machine::{Phrases, TypewriterState, TypewriterTiming};

/// Text node the cycler writes into.
pub trait TextSink {
    fn set_text(&mut self, text: &str);
}

/// In-memory [`TextSink`] remembering the current text and how often it was written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    writes: u64,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl TextSink for TextBuffer {
    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.writes += 1;
    }
}

/// Phrases and timing for the hero tagline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub phrases: Vec<String>,
    pub timing: TypewriterTiming,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "responsive websites.",
                "engaging user interfaces.",
                "creative web applications.",
                "unique digital designs.",
                "seamless user experiences.",
                "modern landing pages.",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            timing: TypewriterTiming::default(),
        }
    }
}

impl TypewriterConfig {
    pub fn validate(&self) -> FxResult<()> {
        self.timing.validate()?;
        Phrases::new(self.phrases.iter().cloned()).map(|_| ())
    }
}

/// Timer-driven typewriter writing into a [`TextSink`].
pub struct TypewriterEffect<T: TextSink> {
    phrases: Phrases,
    timing: TypewriterTiming,
    state: TypewriterState,
    sink: T,
}

impl<T: TextSink> TypewriterEffect<T> {
    /// Build the effect, or `None` when there is no text node or nothing to type.
    pub fn mount(sink: Option<T>, config: &TypewriterConfig) -> Option<Self> {
        let Some(sink) = sink else {
            tracing::debug!("typewriter text node unavailable, skipping");
            return None;
        };
        if let Err(err) = config.timing.validate() {
            tracing::warn!(%err, "typewriter disabled");
            return None;
        }
        let phrases = match Phrases::new(config.phrases.iter().cloned()) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(%err, "typewriter disabled");
                return None;
            }
        };
        Some(Self {
            phrases,
            timing: config.timing,
            state: TypewriterState::initial(),
            sink,
        })
    }

    pub fn state(&self) -> TypewriterState {
        self.state
    }

    pub fn phrases(&self) -> &Phrases {
        &self.phrases
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    pub fn visible_text(&self) -> &str {
        self.state.visible_text(&self.phrases)
    }
}

impl<T: TextSink> Effect for TypewriterEffect<T> {
    fn name(&self) -> &'static str {
        "typewriter"
    }

    fn start(&mut self, _now: Millis) -> Wake {
        Wake::After(self.timing.start_delay)
    }

    fn wake(&mut self, now: Millis) -> Wake {
        let (next, delay) = self.state.step(&self.phrases, &self.timing);
        if next.phrase != self.state.phrase {
            tracing::trace!(phrase = next.phrase, at = now.0, "typewriter next phrase");
        }
        self.state = next;
        self.sink.set_text(self.state.visible_text(&self.phrases));
        Wake::After(delay)
    }

    fn stop(&mut self) {
        tracing::debug!(
            phrase = self.state.phrase,
            chars = self.state.chars,
            "typewriter stopped"
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/typewriter/effect.rs"]
mod tests;
