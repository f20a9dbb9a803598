//! Verifier configuration
//!
//! Read from `.docverifier.toml` at the root of the analyzed tree. Every field
//! is optional in the file.

use crate::analysis::side_effects::default_side_effect_keywords;
use crate::analysis::signature::default_implicit_parameters;
use crate::diagnostics::DiagnosticCode;
use crate::docstring::style::DEFAULT_SAMPLE_SIZE;
use crate::docstring::StyleSetting;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file
pub const CONFIG_FILE: &str = ".docverifier.toml";

/// Configuration for one verification run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Docstring dialect, or `auto` to detect it
    #[serde(default)]
    pub style: StyleSetting,

    /// Parameters never expected in a docstring
    #[serde(default = "default_implicit_parameters")]
    pub implicit_parameters: Vec<String>,

    /// Do not require `*args` / `**kwargs` to be documented
    #[serde(default)]
    pub skip_variadic: bool,

    /// Functions without a docstring produce no diagnostics
    #[serde(default = "default_skip_undocumented")]
    pub skip_undocumented: bool,

    /// Docstrings sampled for the file-level style vote
    #[serde(default = "default_style_sample_size")]
    pub style_sample_size: usize,

    /// Words in the notes that document a side effect
    #[serde(default = "default_side_effect_keywords")]
    pub side_effect_keywords: Vec<String>,

    /// Diagnostic codes that are never reported
    #[serde(default)]
    pub disabled_codes: Vec<DiagnosticCode>,

    /// Report paths skipped when walking a directory (glob patterns)
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

fn default_skip_undocumented() -> bool {
    true
}

fn default_style_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        "target/**".to_string(),
        "node_modules/**".to_string(),
        ".git/**".to_string(),
        ".venv/**".to_string(),
    ]
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            style: StyleSetting::default(),
            implicit_parameters: default_implicit_parameters(),
            skip_variadic: false,
            skip_undocumented: default_skip_undocumented(),
            style_sample_size: default_style_sample_size(),
            side_effect_keywords: default_side_effect_keywords(),
            disabled_codes: Vec::new(),
            ignore_patterns: default_ignore_patterns(),
        }
    }
}

impl VerifierConfig {
    /// Path of the configuration file under `root`
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Load configuration from `root` or return defaults
    pub fn load_or_default(root: &Path) -> Result<Self, Error> {
        let config_path = Self::path(root);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|source| Error::Io {
                path: config_path.clone(),
                source,
            })?;
            Self::from_toml(&content).map_err(|message| Error::Config {
                path: config_path,
                message,
            })
        } else {
            Ok(Self::default())
        }
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Save configuration under `root`
    pub fn save(&self, root: &Path) -> Result<(), Error> {
        let config_path = Self::path(root);
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config {
            path: config_path.clone(),
            message: e.to_string(),
        })?;

        std::fs::write(&config_path, content).map_err(|source| Error::Io {
            path: config_path,
            source,
        })
    }

    pub fn is_enabled(&self, code: DiagnosticCode) -> bool {
        !self.disabled_codes.contains(&code)
    }

    /// Check if a report path should be skipped
    pub fn should_ignore(&self, path: &str) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| glob_match_simple(pattern, path))
    }
}

/// Simple glob matching helper
fn glob_match_simple(pattern: &str, path: &str) -> bool {
    if let Some((prefix, suffix)) = pattern.split_once("**") {
        let prefix = prefix.trim_end_matches('/');
        let suffix = suffix.trim_start_matches('/');
        let in_prefix = prefix.is_empty()
            || path.starts_with(prefix)
            || path.contains(&format!("/{}/", prefix));
        return in_prefix && (suffix.is_empty() || glob_match_simple(suffix, path));
    }

    if let Some((head, tail)) = pattern.split_once('*') {
        let name = path.rsplit('/').next().unwrap_or(path);
        return (path.starts_with(head) || name.starts_with(head))
            && path.ends_with(tail)
            && !tail.contains('*');
    }

    path == pattern || path.ends_with(&format!("/{}", pattern))
}
