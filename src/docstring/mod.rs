//! Docstring parsing
//!
//! This module turns raw docstring text into a [`DocDescriptor`]:
//! - Section-header docstrings (`Args:`, `Returns:`, ...) via [`google`]
//! - Directive docstrings (`:param x:`, `:rtype:`, ...) via [`sphinx`]
//! - Automatic dialect detection via [`style`]
//!
//! Parsing is total: text that cannot be understood degrades to an emptier
//! descriptor, never to an error.

pub mod google;
pub mod grammar;
pub mod sphinx;
pub mod style;

pub use grammar::SectionKind;
pub use style::{detect_file_style, detect_style, DetectedStyle};

use serde::{Deserialize, Serialize};

/// What the docstring says about whether a parameter may be omitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optionality {
    /// The docstring does not say
    #[default]
    Unspecified,
    Required,
    Optional,
}

impl Optionality {
    /// `Some(true)` for optional, `Some(false)` for required, `None` when unspecified
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Optionality::Unspecified => None,
            Optionality::Required => Some(false),
            Optionality::Optional => Some(true),
        }
    }
}

/// A documented parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_hint: Option<String>,
    pub description: String,
    pub optionality: Optionality,
}

impl DocParameter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_hint: None,
            description: String::new(),
            optionality: Optionality::Unspecified,
        }
    }

    /// Name without the leading stars of `*args` / `**kwargs`
    pub fn bare_name(&self) -> &str {
        self.name.trim_start_matches('*')
    }
}

/// A documented return or yield value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocReturns {
    #[serde(rename = "type")]
    pub type_hint: Option<String>,
    pub description: String,
}

/// A documented exception
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocException {
    pub exception: String,
    pub description: String,
}

/// Structured view of one docstring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocDescriptor {
    /// Free text before the first section or directive
    pub summary: Option<String>,
    pub parameters: Vec<DocParameter>,
    pub returns: Option<DocReturns>,
    pub yields: Option<DocReturns>,
    pub raises: Vec<DocException>,
    pub notes: Option<String>,
}

impl DocDescriptor {
    /// Look up a documented parameter. Names compare without leading stars,
    /// and the first entry wins when a name is documented twice.
    pub fn parameter(&self, name: &str) -> Option<&DocParameter> {
        let name = name.trim_start_matches('*');
        self.parameters.iter().find(|p| p.bare_name() == name)
    }

    pub fn has_returns(&self) -> bool {
        self.returns.is_some()
    }
}

/// The two docstring dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocstringStyle {
    /// Section headers followed by indented blocks
    Google,
    /// Inline `:field:` directives
    Sphinx,
}

impl std::fmt::Display for DocstringStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocstringStyle::Google => write!(f, "google"),
            DocstringStyle::Sphinx => write!(f, "sphinx"),
        }
    }
}

/// Configured dialect, `Auto` runs detection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StyleSetting {
    #[default]
    Auto,
    Google,
    Sphinx,
}

impl StyleSetting {
    /// Resolve the dialect for one docstring. `fallback` is used when
    /// detection is inconclusive.
    pub fn resolve(&self, text: &str, fallback: DocstringStyle) -> DocstringStyle {
        match self {
            StyleSetting::Google => DocstringStyle::Google,
            StyleSetting::Sphinx => DocstringStyle::Sphinx,
            StyleSetting::Auto => detect_style(text).style().unwrap_or(fallback),
        }
    }
}

impl std::fmt::Display for StyleSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleSetting::Auto => write!(f, "auto"),
            StyleSetting::Google => write!(f, "google"),
            StyleSetting::Sphinx => write!(f, "sphinx"),
        }
    }
}

/// Parse a docstring in the given dialect
pub fn parse(text: &str, style: DocstringStyle) -> DocDescriptor {
    match style {
        DocstringStyle::Google => google::parse(text),
        DocstringStyle::Sphinx => sphinx::parse(text),
    }
}

/// Join description fragments with single spaces, skipping empty ones
pub(crate) fn append_text(target: &mut String, fragment: &str) {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(fragment);
}
