use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::pseudo_label::{PseudoLabelAssigner, DEFAULT_PREFIX};
use crate::error::CurateError;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "LABEL_CURATOR_CONFIG";

/// Runtime settings. Every field has a default, so a config file only needs
/// the keys it changes:
///
/// ```json
/// { "delimiter": ";", "pseudo_label_prefix": "unk" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurateConfig {
    /// Field separator of input and output files.
    pub delimiter: char,
    /// Lines starting with this character are skipped on load.
    pub comment: Option<char>,
    pub pseudo_label_prefix: String,
    /// Fail the filter step on tables without `target_classification`
    /// instead of pseudo-labeling every record.
    pub reject_unrecognized: bool,
}

impl Default for CurateConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            comment: Some('#'),
            pseudo_label_prefix: DEFAULT_PREFIX.to_string(),
            reject_unrecognized: false,
        }
    }
}

impl CurateConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: CurateConfig = serde_json::from_str(&text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by [`CONFIG_ENV`], or fall back to defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;
        self.comment_byte()?;
        if self.pseudo_label_prefix.is_empty() {
            bail!("pseudo_label_prefix must not be empty");
        }
        Ok(())
    }

    /// Delimiter as the single byte the csv reader and writer expect.
    pub fn delimiter_byte(&self) -> crate::Result<u8> {
        ascii_byte(self.delimiter, "delimiter")
    }

    pub fn comment_byte(&self) -> crate::Result<Option<u8>> {
        self.comment.map(|c| ascii_byte(c, "comment marker")).transpose()
    }

    pub fn assigner(&self) -> PseudoLabelAssigner {
        PseudoLabelAssigner::new(self.pseudo_label_prefix.clone())
    }
}

fn ascii_byte(c: char, what: &str) -> crate::Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(CurateError::InvalidConfig(format!(
            "{what} must be an ASCII character, got {c:?}"
        )))
    }
}
