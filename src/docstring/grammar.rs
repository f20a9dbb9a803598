//! The docstring grammar shared by the parsers, the style detector and the editor
//!
//! Header synonyms and directive aliases live here and nowhere else, so that
//! parsing and editing always agree on what a line means.

use super::Optionality;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A named block of a section-header docstring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Args,
    Returns,
    Yields,
    Raises,
    Note,
    Example,
    Attributes,
    Warning,
    Todo,
    SeeAlso,
    References,
}

impl SectionKind {
    /// Header text used when a section has to be created
    pub fn header(&self) -> &'static str {
        match self {
            SectionKind::Args => "Args",
            SectionKind::Returns => "Returns",
            SectionKind::Yields => "Yields",
            SectionKind::Raises => "Raises",
            SectionKind::Note => "Note",
            SectionKind::Example => "Example",
            SectionKind::Attributes => "Attributes",
            SectionKind::Warning => "Warning",
            SectionKind::Todo => "Todo",
            SectionKind::SeeAlso => "See Also",
            SectionKind::References => "References",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// Header synonyms, lowercase
const SECTION_HEADERS: &[(&str, SectionKind)] = &[
    ("args", SectionKind::Args),
    ("arguments", SectionKind::Args),
    ("parameters", SectionKind::Args),
    ("params", SectionKind::Args),
    ("keyword args", SectionKind::Args),
    ("keyword arguments", SectionKind::Args),
    ("returns", SectionKind::Returns),
    ("return", SectionKind::Returns),
    ("yields", SectionKind::Yields),
    ("yield", SectionKind::Yields),
    ("raises", SectionKind::Raises),
    ("raise", SectionKind::Raises),
    ("throws", SectionKind::Raises),
    ("note", SectionKind::Note),
    ("notes", SectionKind::Note),
    ("example", SectionKind::Example),
    ("examples", SectionKind::Example),
    ("attributes", SectionKind::Attributes),
    ("warning", SectionKind::Warning),
    ("warnings", SectionKind::Warning),
    ("todo", SectionKind::Todo),
    ("see also", SectionKind::SeeAlso),
    ("references", SectionKind::References),
];

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z][A-Za-z ]*?)\s*:\s*$").unwrap());

/// Classify a line as a section header
pub fn section_header(line: &str) -> Option<SectionKind> {
    let caps = HEADER_RE.captures(line)?;
    let name = caps[1].to_lowercase();
    SECTION_HEADERS
        .iter()
        .find(|(synonym, _)| *synonym == name)
        .map(|(_, kind)| *kind)
}

/// Finds section headers line by line.
///
/// Once a section is open, a line indented deeper than its header belongs to
/// that section, so an entry such as `note:` under `Args:` is not a header.
#[derive(Debug, Clone, Default)]
pub struct HeaderScanner {
    header_indent: Option<usize>,
}

impl HeaderScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the next line
    pub fn header(&mut self, line: &str) -> Option<SectionKind> {
        let indent = indent_of(line);
        if self.header_indent.is_some_and(|open| indent > open) {
            return None;
        }
        let kind = section_header(line)?;
        self.header_indent = Some(indent);
        Some(kind)
    }
}

/// A field of a directive-style docstring
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Param,
    Type,
    Returns,
    ReturnType,
    Raises,
    Yields,
    YieldType,
    Note,
    Other(String),
}

/// Directive aliases, lowercase
const DIRECTIVE_ALIASES: &[(&str, Directive)] = &[
    ("param", Directive::Param),
    ("parameter", Directive::Param),
    ("arg", Directive::Param),
    ("argument", Directive::Param),
    ("key", Directive::Param),
    ("keyword", Directive::Param),
    ("type", Directive::Type),
    ("returns", Directive::Returns),
    ("return", Directive::Returns),
    ("rtype", Directive::ReturnType),
    ("raises", Directive::Raises),
    ("raise", Directive::Raises),
    ("except", Directive::Raises),
    ("exception", Directive::Raises),
    ("yields", Directive::Yields),
    ("yield", Directive::Yields),
    ("ytype", Directive::YieldType),
    ("note", Directive::Note),
    ("notes", Directive::Note),
];

impl Directive {
    pub fn from_name(name: &str) -> Directive {
        let lowered = name.to_lowercase();
        DIRECTIVE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map(|(_, directive)| directive.clone())
            .unwrap_or(Directive::Other(lowered))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Directive::Other(_))
    }
}

/// One `:name argument: text` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveLine {
    pub directive: Directive,
    pub argument: Option<String>,
    pub text: String,
}

static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*:([A-Za-z_]+)(?:\s+([^:]+?))?\s*:(.*)$").unwrap());

/// Split a directive line into its parts
pub fn directive_line(line: &str) -> Option<DirectiveLine> {
    let caps = DIRECTIVE_RE.captures(line)?;
    Some(DirectiveLine {
        directive: Directive::from_name(&caps[1]),
        argument: caps.get(2).map(|m| m.as_str().trim().to_string()),
        text: caps[3].trim().to_string(),
    })
}

/// `name (type): description` in an args section
pub struct ParameterLine<'a> {
    pub name: &'a str,
    pub type_text: Option<&'a str>,
    pub description: &'a str,
}

static PARAMETER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\*{0,2}[A-Za-z_][A-Za-z0-9_]*)\s*(?:\(([^)]*)\))?\s*:\s*(.*)$").unwrap()
});

pub fn parameter_line(line: &str) -> Option<ParameterLine<'_>> {
    let caps = PARAMETER_RE.captures(line)?;
    Some(ParameterLine {
        name: caps.get(1)?.as_str(),
        type_text: caps.get(2).map(|m| m.as_str()),
        description: caps.get(3).map(|m| m.as_str().trim()).unwrap_or(""),
    })
}

static EXCEPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_.]*)\s*:\s*(.*)$").unwrap());

/// `ExceptionName: description` in a raises section
pub fn exception_line(line: &str) -> Option<(&str, &str)> {
    let caps = EXCEPTION_RE.captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str().trim()))
}

/// Words that mark the text before a colon as prose rather than a type
const DESCRIPTION_WORDS: &[&str] = &[
    "the", "a", "an", "returns", "return", "returned", "provides", "gives", "contains", "if",
    "when", "whether", "this", "that", "will", "is", "are",
];

/// Longest text accepted as a return type before the first colon
const MAX_TYPE_CANDIDATE_LEN: usize = 50;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").unwrap());

/// Split the first line of a returns/yields section into `(type, rest)` when
/// the text before the colon looks like a type
pub fn return_type_prefix(line: &str) -> Option<(&str, &str)> {
    let (candidate, rest) = line.trim().split_once(':')?;
    let candidate = candidate.trim();
    if candidate.is_empty() || candidate.len() > MAX_TYPE_CANDIDATE_LEN {
        return None;
    }
    let has_prose = WORD_RE.find_iter(candidate).any(|word| {
        let word = word.as_str().to_lowercase();
        DESCRIPTION_WORDS.contains(&word.as_str())
    });
    if has_prose {
        return None;
    }
    Some((candidate, rest.trim()))
}

static TRAILING_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*,\s*(optional|required)\s*$").unwrap());
static LEADING_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(optional|required)\s*,\s*").unwrap());

fn marker_optionality(marker: &str) -> Optionality {
    if marker.eq_ignore_ascii_case("optional") {
        Optionality::Optional
    } else {
        Optionality::Required
    }
}

/// Separate the optionality marker from the parenthesized text of an args entry.
///
/// The marker only counts when comma-adjacent to the type (`int, optional`,
/// `optional, int`) or when it is the entire text (`(optional)`), so a type
/// such as `Optional[int]` is never mistaken for it.
pub fn split_optional_marker(type_text: &str) -> (Option<String>, Optionality) {
    let trimmed = type_text.trim();
    if trimmed.eq_ignore_ascii_case("optional") || trimmed.eq_ignore_ascii_case("required") {
        return (None, marker_optionality(trimmed));
    }
    if let Some(caps) = TRAILING_MARKER_RE.captures(trimmed) {
        let optionality = marker_optionality(&caps[1]);
        let rest = trimmed[..caps.get(0).map_or(0, |m| m.start())].trim();
        return (non_empty(rest), optionality);
    }
    if let Some(caps) = LEADING_MARKER_RE.captures(trimmed) {
        let optionality = marker_optionality(&caps[1]);
        let rest = trimmed[caps.get(0).map_or(0, |m| m.end())..].trim();
        return (non_empty(rest), optionality);
    }
    (non_empty(trimmed), Optionality::Unspecified)
}

static OPTIONAL_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\boptional\b").unwrap());

/// Strip a whole-word `optional` from directive-style `:type:` text.
///
/// `Optional[...]` is a type, not a marker, and is left alone.
pub fn strip_optional_word(type_text: &str) -> (Option<String>, Optionality) {
    let mut found = false;
    let mut stripped = String::with_capacity(type_text.len());
    let mut last = 0;
    for m in OPTIONAL_WORD_RE.find_iter(type_text) {
        if type_text[m.end()..].trim_start().starts_with('[') {
            continue;
        }
        found = true;
        stripped.push_str(&type_text[last..m.start()]);
        last = m.end();
    }
    stripped.push_str(&type_text[last..]);

    if !found {
        return (non_empty(type_text.trim()), Optionality::Unspecified);
    }

    let cleaned = stripped
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    (non_empty(&cleaned), Optionality::Optional)
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Number of leading whitespace characters
pub fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Comparison key for exception names: `requests.HTTPError` and `httperror`
/// name the same exception
pub fn exception_key(name: &str) -> String {
    let name = name.trim();
    let name = name.rsplit('.').next().unwrap_or(name);
    name.to_lowercase()
}
