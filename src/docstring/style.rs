//! Docstring dialect detection

use super::grammar::{directive_line, indent_of, HeaderScanner, SectionKind};
use super::DocstringStyle;
use serde::{Deserialize, Serialize};

/// Number of docstrings sampled for a file-level vote
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// Outcome of classifying one docstring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedStyle {
    Google,
    Sphinx,
    Unknown,
}

impl DetectedStyle {
    pub fn style(&self) -> Option<DocstringStyle> {
        match self {
            DetectedStyle::Google => Some(DocstringStyle::Google),
            DetectedStyle::Sphinx => Some(DocstringStyle::Sphinx),
            DetectedStyle::Unknown => None,
        }
    }
}

impl std::fmt::Display for DetectedStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectedStyle::Google => write!(f, "google"),
            DetectedStyle::Sphinx => write!(f, "sphinx"),
            DetectedStyle::Unknown => write!(f, "unknown"),
        }
    }
}

/// Headers that only occur in section-header docstrings. Free-form headers
/// such as `Note:` are also common in directive docstrings and are not counted.
fn is_signature_header(kind: SectionKind) -> bool {
    matches!(
        kind,
        SectionKind::Args | SectionKind::Returns | SectionKind::Yields | SectionKind::Raises
    )
}

/// Classify one docstring by counting section headers against directives
pub fn detect_style(text: &str) -> DetectedStyle {
    let lines: Vec<&str> = text.lines().collect();

    let mut headers = HeaderScanner::new();
    let header_lines: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| headers.header(line).is_some_and(is_signature_header))
        .map(|(i, _)| i)
        .collect();
    let directive_count = lines
        .iter()
        .filter(|line| directive_line(line).is_some_and(|d| d.directive.is_known()))
        .count();

    let header_count = header_lines.len();
    if header_count > directive_count {
        return DetectedStyle::Google;
    }
    if directive_count > header_count {
        return DetectedStyle::Sphinx;
    }
    if header_count == 0 {
        return DetectedStyle::Unknown;
    }

    // Tie: headers introduce an indented block, directives carry their text inline
    let blocks = header_lines
        .iter()
        .filter(|&&i| introduces_indented_block(&lines, i))
        .count();
    let inline = lines
        .iter()
        .filter_map(|line| directive_line(line))
        .filter(|d| d.directive.is_known() && !d.text.is_empty())
        .count();

    if blocks > inline {
        DetectedStyle::Google
    } else if inline > blocks {
        DetectedStyle::Sphinx
    } else {
        DetectedStyle::Unknown
    }
}

fn introduces_indented_block(lines: &[&str], header: usize) -> bool {
    let header_indent = indent_of(lines[header]);
    lines[header + 1..]
        .iter()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|next| indent_of(next) > header_indent)
}

/// Pick one dialect for a whole file by majority vote over the first
/// `sample_size` docstrings.
///
/// Inconclusive docstrings do not vote. A tie, or no votes at all, resolves
/// to the section-header dialect.
pub fn detect_file_style<'a, I>(docstrings: I, sample_size: usize) -> DocstringStyle
where
    I: IntoIterator<Item = &'a str>,
{
    let mut google = 0usize;
    let mut sphinx = 0usize;

    for text in docstrings.into_iter().take(sample_size) {
        match detect_style(text) {
            DetectedStyle::Google => google += 1,
            DetectedStyle::Sphinx => sphinx += 1,
            DetectedStyle::Unknown => {}
        }
    }

    tracing::debug!(google, sphinx, "file-level docstring style vote");

    if sphinx > google {
        DocstringStyle::Sphinx
    } else {
        DocstringStyle::Google
    }
}
