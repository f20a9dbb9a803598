//! Code facts supplied by an external extractor
//!
//! The extractor analyzes Python source and emits, per function:
//! - The parameter list with annotations and defaults
//! - Return, yield and raise statements
//! - The docstring and its location
//! - Side-effect signals (I/O, global state mutation)
//!
//! Everything here is plain data deserialized from the extractor's camelCase JSON.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A zero-based position in a source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A zero-based, end-exclusive source range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range covering the start of a one-based source line, as reported for
    /// return and raise statements
    pub fn at_line(line: u32) -> Self {
        let line = line.saturating_sub(1);
        Self::new(Position::new(line, 0), Position::new(line, 0))
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line + 1,
            self.start.character + 1,
            self.end.line + 1,
            self.end.character + 1
        )
    }
}

/// A parameter as declared in the function signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterFacts {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_hint: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
    /// True iff the parameter has a default value
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub is_var_arg: bool,
    #[serde(default)]
    pub is_kw_arg: bool,
}

impl ParameterFacts {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_hint: None,
            default_value: None,
            is_optional: false,
            is_var_arg: false,
            is_kw_arg: false,
        }
    }

    pub fn with_type(mut self, type_hint: &str) -> Self {
        self.type_hint = Some(type_hint.to_string());
        self
    }

    pub fn with_default(mut self, default_value: &str) -> Self {
        self.default_value = Some(default_value.to_string());
        self.is_optional = true;
        self
    }

    /// `*args` / `**kwargs` style parameter. The extractor spells these with
    /// leading stars and does not always set the flags.
    pub fn is_variadic(&self) -> bool {
        self.is_var_arg || self.is_kw_arg || self.name.starts_with('*')
    }

    /// Name without the leading stars of a variadic parameter
    pub fn bare_name(&self) -> &str {
        self.name.trim_start_matches('*')
    }
}

/// A `return` statement and the type the extractor could infer for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSite {
    #[serde(rename = "type", default)]
    pub type_hint: Option<String>,
    pub line: u32,
}

/// A `yield` statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldSite {
    pub line: u32,
}

/// One `raise` statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaiseSite {
    #[serde(rename = "type")]
    pub exception: String,
    pub line: u32,
}

/// Everything known about one function, independently of its docstring text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFacts {
    pub name: String,
    #[serde(default)]
    pub range: Range,
    #[serde(default)]
    pub parameters: Vec<ParameterFacts>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub return_statements: Vec<ReturnSite>,
    #[serde(default)]
    pub yield_statements: Vec<YieldSite>,
    #[serde(default)]
    pub is_generator: bool,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub raises: Vec<RaiseSite>,
    #[serde(default)]
    pub docstring: Option<String>,
    #[serde(default)]
    pub docstring_range: Option<Range>,
    #[serde(rename = "hasIO", default)]
    pub has_io: bool,
    #[serde(default)]
    pub has_global_mods: bool,
}

impl CodeFacts {
    /// Create facts for a function with no parameters and no docstring
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            range: Range::default(),
            parameters: Vec::new(),
            return_type: None,
            return_statements: Vec::new(),
            yield_statements: Vec::new(),
            is_generator: false,
            is_async: false,
            raises: Vec::new(),
            docstring: None,
            docstring_range: None,
            has_io: false,
            has_global_mods: false,
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterFacts) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_return_type(mut self, return_type: &str) -> Self {
        self.return_type = Some(return_type.to_string());
        self
    }

    pub fn with_docstring(mut self, docstring: &str) -> Self {
        self.docstring = Some(docstring.to_string());
        self
    }

    pub fn with_raise(mut self, exception: &str, line: u32) -> Self {
        self.raises.push(RaiseSite {
            exception: exception.to_string(),
            line,
        });
        self
    }

    /// Where docstring-level diagnostics are anchored: the docstring itself
    /// when its location is known, the whole function otherwise
    pub fn anchor(&self) -> Range {
        self.docstring_range.unwrap_or(self.range)
    }

    /// Parameter names in signature order
    pub fn parameter_order(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|p| p.bare_name().to_string())
            .collect()
    }
}

/// The extractor's per-file output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub success: bool,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub functions: Vec<CodeFacts>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ExtractionReport {
    /// Parse a report from the extractor's JSON output
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a report file
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Functions whose facts are usable. A failed extraction contributes
    /// nothing, so no diagnostics are ever fabricated for it.
    pub fn usable_functions(&self) -> &[CodeFacts] {
        if self.success {
            &self.functions
        } else {
            &[]
        }
    }

    /// Turn a failed extraction into an error for callers that need the facts
    pub fn ensure_success(&self) -> Result<(), Error> {
        if self.success {
            return Ok(());
        }
        Err(Error::Extraction {
            file: self.file.clone().unwrap_or_else(|| "<unknown>".to_string()),
            message: match (&self.error, &self.message) {
                (Some(kind), Some(message)) => format!("{}: {}", kind, message),
                (Some(kind), None) => kind.clone(),
                (None, Some(message)) => message.clone(),
                (None, None) => "no details reported".to_string(),
            },
        })
    }
}
