//! Validation policy
//!
//! Thresholds and word lists consulted by the rules. Layers, later ones
//! winning:
//!
//! 1. built-in defaults (the reference policy),
//! 2. an optional policy file (`.toml`, `.yaml`/`.yml` or `.json`),
//! 3. `SKILLKIT_*` environment variables, e.g. `SKILLKIT_BODY_MIN_LEN=50`
//!    or `SKILLKIT_GUIDANCE_KEYWORDS=when,use,trigger`.
//!
//! Strict mode is deliberately absent here; it only affects the exit signal.

use crate::error::{SkillError, SkillResult};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable prefix for policy overrides
pub const ENV_PREFIX: &str = "SKILLKIT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Longest accepted skill name, in characters
    pub name_max_len: usize,
    /// Descriptions shorter than this draw a warning
    pub description_min_len: usize,
    /// Descriptions longer than this are an error
    pub description_max_len: usize,
    /// Bodies shorter than this (after trimming) draw a warning
    pub body_min_len: usize,
    /// Literal markers that flag unedited template text
    pub placeholder_markers: Vec<String>,
    /// Case-insensitive words that signal usage guidance in a description
    pub guidance_keywords: Vec<String>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            name_max_len: 64,
            description_min_len: 20,
            description_max_len: 1024,
            body_min_len: 100,
            placeholder_markers: vec![
                "TODO".to_string(),
                "[Add your".to_string(),
                "[Provide".to_string(),
            ],
            guidance_keywords: vec!["when".to_string(), "use".to_string()],
        }
    }
}

impl ValidationPolicy {
    /// Load the layered policy, reading `path` when given
    pub fn load(path: Option<&Path>) -> SkillResult<Self> {
        let defaults = serde_json::to_string(&Self::default())
            .map_err(|e| SkillError::Config(e.to_string()))?;

        let mut builder =
            Config::builder().add_source(File::from_str(&defaults, FileFormat::Json));

        if let Some(path) = path {
            let format = detect_format(path)?;
            builder = builder.add_source(File::from(path).format(format).required(true));
            debug!("Loading validation policy from {}", path.display());
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("placeholder_markers")
                .with_list_parse_key("guidance_keywords"),
        );

        let policy: Self = builder.build()?.try_deserialize()?;
        policy.check()?;
        Ok(policy)
    }

    fn check(&self) -> SkillResult<()> {
        if self.description_min_len > self.description_max_len {
            return Err(SkillError::Config(format!(
                "description_min_len ({}) exceeds description_max_len ({})",
                self.description_min_len, self.description_max_len
            )));
        }
        Ok(())
    }
}

/// Detect a policy file format from its extension
pub fn detect_format(path: &Path) -> SkillResult<FileFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| SkillError::UnsupportedFormat("No file extension found".to_string()))?;

    match ext.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "toml" => Ok(FileFormat::Toml),
        "json" => Ok(FileFormat::Json),
        _ => Err(SkillError::UnsupportedFormat(ext.to_string())),
    }
}
