use crate::foundation::error::{FxError, FxResult};
use crate::orbit::model::OrbitConfig;
use crate::reveal::observer::RevealConfig;
use crate::runtime::stage::StageOpts;
use crate::starfield::model::StarfieldConfig;
use crate::typewriter::effect::TypewriterConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Everything the hero section needs, loadable from JSON.
///
/// Every field is optional in the document; missing sections fall back to the page defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeroConfig {
    pub starfield: StarfieldConfig,
    pub orbit: OrbitConfig,
    pub typewriter: TypewriterConfig,
    pub reveal: RevealConfig,
    pub stage: StageOpts,
    /// Seed for the starfield's random draws.
    pub seed: u64,
}

impl HeroConfig {
    /// Parse a config from a JSON reader. Does not validate.
    pub fn from_reader<R: std::io::Read>(r: R) -> FxResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| FxError::config(format!("parse hero config JSON: {e}")))
    }

    pub fn from_json_str(s: &str) -> FxResult<Self> {
        serde_json::from_str(s).map_err(|e| FxError::config(format!("parse hero config JSON: {e}")))
    }

    /// Parse and validate a config file.
    pub fn from_path(path: impl AsRef<Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| FxError::config(format!("open hero config '{}': {e}", path.display())))?;
        let cfg = Self::from_reader(BufReader::new(f))?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "loaded hero config");
        Ok(cfg)
    }

    pub fn validate(&self) -> FxResult<()> {
        self.starfield.validate()?;
        self.orbit.validate()?;
        self.typewriter.validate()?;
        self.reveal.validate()?;
        self.stage.validate()
    }

    pub fn to_json_pretty(&self) -> FxResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FxError::config(format!("serialize hero config: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/mod.rs"]
mod tests;
