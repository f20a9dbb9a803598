//! Diagnostic records
//!
//! Every mismatch category is a variant of a closed enum grouped by concern,
//! and each variant maps to exactly one stable `DSVnnn` code, one severity and
//! one message template:
//! - 1xx: parameters
//! - 2xx: returns
//! - 3xx: exceptions
//! - 4xx: side effects

use crate::analysis::Mismatch;
use crate::facts::Range;
use serde::{Deserialize, Serialize};

/// Source tag attached to every diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "docstring-verifier";

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Structural or contractual disagreement
    Warning,
    /// Heuristic signal
    Information,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Information => write!(f, "information"),
        }
    }
}

/// Stable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticCode {
    ParamMissingInCode,
    ParamMissingInDocstring,
    ParamTypeMismatch,
    ParamOptionalMismatch,
    ReturnTypeMismatch,
    ReturnMissingInDocstring,
    ReturnVoidButDocumented,
    ReturnInconsistentTypes,
    GeneratorDocumentsReturns,
    ExceptionUndocumented,
    ExceptionNotRaised,
    SideEffectsUndocumented,
}

impl DiagnosticCode {
    pub const ALL: [DiagnosticCode; 12] = [
        DiagnosticCode::ParamMissingInCode,
        DiagnosticCode::ParamMissingInDocstring,
        DiagnosticCode::ParamTypeMismatch,
        DiagnosticCode::ParamOptionalMismatch,
        DiagnosticCode::ReturnTypeMismatch,
        DiagnosticCode::ReturnMissingInDocstring,
        DiagnosticCode::ReturnVoidButDocumented,
        DiagnosticCode::ReturnInconsistentTypes,
        DiagnosticCode::GeneratorDocumentsReturns,
        DiagnosticCode::ExceptionUndocumented,
        DiagnosticCode::ExceptionNotRaised,
        DiagnosticCode::SideEffectsUndocumented,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::ParamMissingInCode => "DSV101",
            DiagnosticCode::ParamMissingInDocstring => "DSV102",
            DiagnosticCode::ParamTypeMismatch => "DSV103",
            DiagnosticCode::ParamOptionalMismatch => "DSV104",
            DiagnosticCode::ReturnTypeMismatch => "DSV201",
            DiagnosticCode::ReturnMissingInDocstring => "DSV202",
            DiagnosticCode::ReturnVoidButDocumented => "DSV203",
            DiagnosticCode::ReturnInconsistentTypes => "DSV204",
            DiagnosticCode::GeneratorDocumentsReturns => "DSV205",
            DiagnosticCode::ExceptionUndocumented => "DSV301",
            DiagnosticCode::ExceptionNotRaised => "DSV302",
            DiagnosticCode::SideEffectsUndocumented => "DSV401",
        }
    }

    pub fn parse(code: &str) -> Option<DiagnosticCode> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DiagnosticCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        DiagnosticCode::parse(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown diagnostic code: {}", code)))
    }
}

/// Disagreements about the parameter list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterMismatch {
    /// Documented but not in the signature
    MissingInCode { name: String },
    /// In the signature but not documented
    MissingInDocs { name: String },
    TypeMismatch {
        name: String,
        code_type: String,
        doc_type: String,
    },
    /// The docstring's explicit optional/required marking disagrees with
    /// whether the code declares a default
    OptionalMismatch { name: String, code_optional: bool },
}

/// Disagreements about the return value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnMismatch {
    TypeMismatch { code_type: String, doc_type: String },
    MissingInDocs { code_type: String },
    DocumentedButVoid { doc_type: Option<String> },
    InconsistentReturns { types: Vec<String> },
    GeneratorShouldYield,
}

/// Disagreements about raised exceptions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExceptionMismatch {
    Undocumented { exception: String },
    NotRaised { exception: String },
}

/// Side effects the docstring does not mention
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffectMismatch {
    Undocumented { io: bool, global_state: bool },
}

/// Every mismatch category, grouped by concern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchKind {
    Parameter(ParameterMismatch),
    Return(ReturnMismatch),
    Exception(ExceptionMismatch),
    SideEffect(SideEffectMismatch),
}

impl MismatchKind {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            MismatchKind::Parameter(m) => match m {
                ParameterMismatch::MissingInCode { .. } => DiagnosticCode::ParamMissingInCode,
                ParameterMismatch::MissingInDocs { .. } => DiagnosticCode::ParamMissingInDocstring,
                ParameterMismatch::TypeMismatch { .. } => DiagnosticCode::ParamTypeMismatch,
                ParameterMismatch::OptionalMismatch { .. } => DiagnosticCode::ParamOptionalMismatch,
            },
            MismatchKind::Return(m) => match m {
                ReturnMismatch::TypeMismatch { .. } => DiagnosticCode::ReturnTypeMismatch,
                ReturnMismatch::MissingInDocs { .. } => DiagnosticCode::ReturnMissingInDocstring,
                ReturnMismatch::DocumentedButVoid { .. } => DiagnosticCode::ReturnVoidButDocumented,
                ReturnMismatch::InconsistentReturns { .. } => {
                    DiagnosticCode::ReturnInconsistentTypes
                }
                ReturnMismatch::GeneratorShouldYield => DiagnosticCode::GeneratorDocumentsReturns,
            },
            MismatchKind::Exception(m) => match m {
                ExceptionMismatch::Undocumented { .. } => DiagnosticCode::ExceptionUndocumented,
                ExceptionMismatch::NotRaised { .. } => DiagnosticCode::ExceptionNotRaised,
            },
            MismatchKind::SideEffect(SideEffectMismatch::Undocumented { .. }) => {
                DiagnosticCode::SideEffectsUndocumented
            }
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            MismatchKind::Parameter(ParameterMismatch::OptionalMismatch { .. })
            | MismatchKind::Return(ReturnMismatch::InconsistentReturns { .. })
            | MismatchKind::Exception(ExceptionMismatch::NotRaised { .. })
            | MismatchKind::SideEffect(_) => Severity::Information,
            _ => Severity::Warning,
        }
    }

    /// Human-readable message for a mismatch found in `function`
    pub fn message(&self, function: &str) -> String {
        match self {
            MismatchKind::Parameter(m) => match m {
                ParameterMismatch::MissingInCode { name } => format!(
                    "Parameter '{}' is documented but not present in the signature of '{}'",
                    name, function
                ),
                ParameterMismatch::MissingInDocs { name } => format!(
                    "Parameter '{}' of '{}' is missing from the docstring",
                    name, function
                ),
                ParameterMismatch::TypeMismatch {
                    name,
                    code_type,
                    doc_type,
                } => format!(
                    "Parameter '{}' has type '{}' in code but '{}' in the docstring",
                    name, code_type, doc_type
                ),
                ParameterMismatch::OptionalMismatch {
                    name,
                    code_optional: true,
                } => format!(
                    "Parameter '{}' has a default value but the docstring does not mark it as optional",
                    name
                ),
                ParameterMismatch::OptionalMismatch {
                    name,
                    code_optional: false,
                } => format!(
                    "Parameter '{}' is required but the docstring marks it as optional",
                    name
                ),
            },
            MismatchKind::Return(m) => match m {
                ReturnMismatch::TypeMismatch {
                    code_type,
                    doc_type,
                } => format!(
                    "Return type mismatch in '{}': code returns '{}' but the docstring says '{}'",
                    function, code_type, doc_type
                ),
                ReturnMismatch::MissingInDocs { code_type } => format!(
                    "'{}' returns '{}' but the docstring has no Returns section",
                    function, code_type
                ),
                ReturnMismatch::DocumentedButVoid {
                    doc_type: Some(doc_type),
                } => format!(
                    "'{}' does not return a value but the docstring documents a return of '{}'",
                    function, doc_type
                ),
                ReturnMismatch::DocumentedButVoid { doc_type: None } => format!(
                    "'{}' does not return a value but the docstring has a Returns section",
                    function
                ),
                ReturnMismatch::InconsistentReturns { types } => format!(
                    "'{}' returns values of inconsistent types: {}",
                    function,
                    types.join(", ")
                ),
                ReturnMismatch::GeneratorShouldYield => format!(
                    "'{}' is a generator; document it with a Yields section instead of Returns",
                    function
                ),
            },
            MismatchKind::Exception(m) => match m {
                ExceptionMismatch::Undocumented { exception } => format!(
                    "Exception '{}' is raised but not documented in the docstring of '{}'",
                    exception, function
                ),
                ExceptionMismatch::NotRaised { exception } => format!(
                    "Exception '{}' is documented but never raised in '{}'",
                    exception, function
                ),
            },
            MismatchKind::SideEffect(SideEffectMismatch::Undocumented { io, global_state }) => {
                let mut effects = Vec::new();
                if *io {
                    effects.push("I/O operations");
                }
                if *global_state {
                    effects.push("global state modification");
                }
                format!(
                    "'{}' has undocumented side effects: {}",
                    function,
                    effects.join(", ")
                )
            }
        }
    }
}

/// A secondary location relevant to a diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedLocation {
    pub range: Range,
    pub message: String,
}

/// A rendered, machine-readable diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub severity: Severity,
    pub range: Range,
    pub source: String,
    /// Function the diagnostic belongs to
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<RelatedLocation>,
}

/// Renders mismatches into diagnostics
#[derive(Debug, Clone)]
pub struct DiagnosticEmitter {
    source: String,
}

impl DiagnosticEmitter {
    pub fn new() -> Self {
        Self {
            source: DIAGNOSTIC_SOURCE.to_string(),
        }
    }

    /// Render one mismatch found in `function`
    pub fn emit(&self, function: &str, mismatch: &Mismatch) -> Diagnostic {
        Diagnostic {
            code: mismatch.kind.code(),
            message: mismatch.kind.message(function),
            severity: mismatch.kind.severity(),
            range: mismatch.range,
            source: self.source.clone(),
            function: function.to_string(),
            related: mismatch.related.clone(),
        }
    }
}

impl Default for DiagnosticEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Position;

    #[test]
    fn test_codes_are_stable_and_grouped() {
        let codes: Vec<&str> = DiagnosticCode::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "DSV101", "DSV102", "DSV103", "DSV104", "DSV201", "DSV202", "DSV203", "DSV204",
                "DSV205", "DSV301", "DSV302", "DSV401"
            ]
        );
        assert_eq!(DiagnosticCode::parse("dsv302"), Some(DiagnosticCode::ExceptionNotRaised));
        assert_eq!(DiagnosticCode::parse("DSV999"), None);
    }

    #[test]
    fn test_severity_policy() {
        let warning = MismatchKind::Parameter(ParameterMismatch::MissingInDocs {
            name: "x".to_string(),
        });
        let info = MismatchKind::Parameter(ParameterMismatch::OptionalMismatch {
            name: "x".to_string(),
            code_optional: true,
        });
        let not_raised = MismatchKind::Exception(ExceptionMismatch::NotRaised {
            exception: "KeyError".to_string(),
        });
        let generator = MismatchKind::Return(ReturnMismatch::GeneratorShouldYield);

        assert_eq!(warning.severity(), Severity::Warning);
        assert_eq!(info.severity(), Severity::Information);
        assert_eq!(not_raised.severity(), Severity::Information);
        assert_eq!(generator.severity(), Severity::Warning);
    }

    #[test]
    fn test_emit_diagnostic() {
        let range = Range::new(Position::new(4, 4), Position::new(9, 7));
        let mismatch = Mismatch::new(
            MismatchKind::SideEffect(SideEffectMismatch::Undocumented {
                io: true,
                global_state: true,
            }),
            range,
        );

        let diagnostic = DiagnosticEmitter::new().emit("log_and_count", &mismatch);
        assert_eq!(diagnostic.code, DiagnosticCode::SideEffectsUndocumented);
        assert_eq!(diagnostic.severity, Severity::Information);
        assert_eq!(diagnostic.range, range);
        assert_eq!(diagnostic.source, DIAGNOSTIC_SOURCE);
        assert_eq!(
            diagnostic.message,
            "'log_and_count' has undocumented side effects: I/O operations, global state modification"
        );

        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["code"], "DSV401");
        assert_eq!(json["severity"], "Information");
        assert!(json.get("related").is_none());
    }
}
