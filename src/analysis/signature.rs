//! Parameter checks

use super::{Analyzer, Mismatch};
use crate::diagnostics::{MismatchKind, ParameterMismatch};
use crate::docstring::{DocDescriptor, DocParameter, Optionality};
use crate::editor::Fix;
use crate::facts::{CodeFacts, ParameterFacts, Range};
use crate::normalize::types_match;
use std::collections::HashSet;

/// Parameters that are never documented
pub fn default_implicit_parameters() -> Vec<String> {
    vec!["self".to_string(), "cls".to_string()]
}

/// Compares the signature with the documented parameters
#[derive(Debug, Clone)]
pub struct SignatureAnalyzer {
    implicit_parameters: Vec<String>,
    skip_variadic: bool,
}

impl SignatureAnalyzer {
    pub fn new() -> Self {
        Self {
            implicit_parameters: default_implicit_parameters(),
            skip_variadic: false,
        }
    }

    pub fn with_implicit_parameters(mut self, names: Vec<String>) -> Self {
        self.implicit_parameters = names;
        self
    }

    /// Leave `*args` / `**kwargs` out of the missing-in-docs check
    pub fn with_skip_variadic(mut self, skip: bool) -> Self {
        self.skip_variadic = skip;
        self
    }

    fn is_checked(&self, parameter: &ParameterFacts) -> bool {
        let implicit = self
            .implicit_parameters
            .iter()
            .any(|name| name == parameter.bare_name());
        !implicit && !(self.skip_variadic && parameter.is_variadic())
    }
}

impl Default for SignatureAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for SignatureAnalyzer {
    fn name(&self) -> &str {
        "signature"
    }

    fn analyze(&self, facts: &CodeFacts, doc: &DocDescriptor, anchor: Range) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();
        let checked: Vec<&ParameterFacts> = facts
            .parameters
            .iter()
            .filter(|p| self.is_checked(p))
            .collect();
        let order: Vec<String> = checked.iter().map(|p| p.bare_name().to_string()).collect();

        for parameter in &checked {
            let Some(documented) = doc.parameter(parameter.bare_name()) else {
                let entry = DocParameter {
                    name: parameter.name.clone(),
                    type_hint: parameter.type_hint.clone(),
                    description: String::new(),
                    optionality: if parameter.is_optional {
                        Optionality::Optional
                    } else {
                        Optionality::Unspecified
                    },
                };
                mismatches.push(
                    Mismatch::new(
                        MismatchKind::Parameter(ParameterMismatch::MissingInDocs {
                            name: parameter.name.clone(),
                        }),
                        anchor,
                    )
                    .with_fix(Fix::AddParameter {
                        parameter: entry,
                        order: order.clone(),
                    }),
                );
                continue;
            };

            if let (Some(code_type), Some(doc_type)) =
                (parameter.type_hint.as_deref(), documented.type_hint.as_deref())
            {
                if !types_match(code_type, doc_type) {
                    mismatches.push(
                        Mismatch::new(
                            MismatchKind::Parameter(ParameterMismatch::TypeMismatch {
                                name: parameter.name.clone(),
                                code_type: code_type.to_string(),
                                doc_type: doc_type.to_string(),
                            }),
                            anchor,
                        )
                        .with_fix(Fix::UpdateParameterType {
                            name: documented.name.clone(),
                            type_hint: code_type.to_string(),
                        }),
                    );
                }
            }

            if let Some(doc_optional) = documented.optionality.as_flag() {
                if doc_optional != parameter.is_optional {
                    mismatches.push(
                        Mismatch::new(
                            MismatchKind::Parameter(ParameterMismatch::OptionalMismatch {
                                name: parameter.name.clone(),
                                code_optional: parameter.is_optional,
                            }),
                            anchor,
                        )
                        .with_fix(Fix::UpdateParameterOptional {
                            name: documented.name.clone(),
                            optional: parameter.is_optional,
                        }),
                    );
                }
            }
        }

        // Documented names are matched against the full signature, so a
        // documented `self` is not reported
        let mut seen = HashSet::new();
        for documented in &doc.parameters {
            let name = documented.bare_name();
            if !seen.insert(name) {
                continue;
            }
            if facts.parameters.iter().any(|p| p.bare_name() == name) {
                continue;
            }
            mismatches.push(
                Mismatch::new(
                    MismatchKind::Parameter(ParameterMismatch::MissingInCode {
                        name: documented.name.clone(),
                    }),
                    anchor,
                )
                .with_fix(Fix::RemoveParameter {
                    name: documented.name.clone(),
                }),
            );
        }

        mismatches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;
    use crate::docstring::google;
    use indoc::indoc;

    fn codes(mismatches: &[Mismatch]) -> Vec<&'static str> {
        mismatches.iter().map(|m| m.code().as_str()).collect()
    }

    #[test]
    fn test_missing_parameter_in_docstring() {
        let facts = CodeFacts::new("add")
            .with_parameter(ParameterFacts::new("x").with_type("int"))
            .with_parameter(ParameterFacts::new("y").with_type("int"));
        let doc = google::parse(indoc! {"
            Add two numbers.

            Args:
                y (int): Second number

            Returns:
                int: Sum of the numbers
        "});

        let mismatches = SignatureAnalyzer::new().analyze(&facts, &doc, Range::default());
        assert_eq!(mismatches.len(), 1);
        assert_eq!(
            mismatches[0].kind,
            MismatchKind::Parameter(ParameterMismatch::MissingInDocs {
                name: "x".to_string()
            })
        );
        assert_eq!(mismatches[0].code(), DiagnosticCode::ParamMissingInDocstring);

        match &mismatches[0].fix {
            Some(Fix::AddParameter { parameter, order }) => {
                assert_eq!(parameter.type_hint.as_deref(), Some("int"));
                assert_eq!(order, &vec!["x".to_string(), "y".to_string()]);
            }
            other => panic!("unexpected fix: {:?}", other),
        }
    }

    #[test]
    fn test_documented_parameter_missing_in_code() {
        let facts = CodeFacts::new("process").with_parameter(ParameterFacts::new("data"));
        let doc = google::parse("Args:\n    data: Input\n    verbose (bool): Gone\n    verbose: Again");

        let mismatches = SignatureAnalyzer::new().analyze(&facts, &doc, Range::default());
        assert_eq!(codes(&mismatches), vec!["DSV101"]);
        assert_eq!(
            mismatches[0].fix,
            Some(Fix::RemoveParameter {
                name: "verbose".to_string()
            })
        );
    }

    #[test]
    fn test_type_mismatch_uses_normalized_types() {
        let facts = CodeFacts::new("process")
            .with_parameter(ParameterFacts::new("items").with_type("List[str]"))
            .with_parameter(ParameterFacts::new("name").with_type("str"))
            .with_parameter(ParameterFacts::new("limit").with_type("Optional[int]"));
        let doc = google::parse(indoc! {"
            Args:
                items (dict): Items
                name (string): Name
                limit (int or None): Limit
        "});

        let mismatches = SignatureAnalyzer::new().analyze(&facts, &doc, Range::default());
        assert_eq!(codes(&mismatches), vec!["DSV103"]);
        assert_eq!(
            mismatches[0].kind.message("process"),
            "Parameter 'items' has type 'List[str]' in code but 'dict' in the docstring"
        );
    }

    #[test]
    fn test_optional_mismatch_only_when_specified() {
        let facts = CodeFacts::new("connect")
            .with_parameter(ParameterFacts::new("host"))
            .with_parameter(ParameterFacts::new("port").with_default("80"))
            .with_parameter(ParameterFacts::new("timeout").with_default("None"));
        let doc = google::parse(indoc! {"
            Args:
                host (str, optional): Host
                port (int): Port
                timeout (float, required): Timeout
        "});

        let mismatches = SignatureAnalyzer::new().analyze(&facts, &doc, Range::default());
        assert_eq!(codes(&mismatches), vec!["DSV104", "DSV104"]);
        assert!(mismatches
            .iter()
            .all(|m| m.severity() == crate::diagnostics::Severity::Information));
        assert_eq!(
            mismatches[1].fix,
            Some(Fix::UpdateParameterOptional {
                name: "timeout".to_string(),
                optional: true
            })
        );
    }

    #[test]
    fn test_implicit_and_variadic_parameters() {
        let facts = CodeFacts::new("method")
            .with_parameter(ParameterFacts::new("self"))
            .with_parameter(ParameterFacts::new("*args"))
            .with_parameter(ParameterFacts::new("**kwargs"));
        let doc = google::parse("Do something.\n\nArgs:\n    *args: Positional");

        let default = SignatureAnalyzer::new().analyze(&facts, &doc, Range::default());
        assert_eq!(codes(&default), vec!["DSV102"]);

        let skipping = SignatureAnalyzer::new()
            .with_skip_variadic(true)
            .analyze(&facts, &doc, Range::default());
        assert!(skipping.is_empty());

        let explicit_self = SignatureAnalyzer::new()
            .with_implicit_parameters(Vec::new())
            .with_skip_variadic(true)
            .analyze(&facts, &doc, Range::default());
        assert_eq!(codes(&explicit_self), vec!["DSV102"]);
    }

    #[test]
    fn test_missing_and_type_mismatch_are_exclusive() {
        let facts = CodeFacts::new("f")
            .with_parameter(ParameterFacts::new("a").with_type("int"))
            .with_parameter(ParameterFacts::new("b").with_type("str"));
        let doc = google::parse("Args:\n    b (int): B\n    c (int): C");

        let mismatches = SignatureAnalyzer::new().analyze(&facts, &doc, Range::default());
        for name in ["a", "b", "c"] {
            let kinds: Vec<_> = mismatches
                .iter()
                .filter_map(|m| match &m.kind {
                    MismatchKind::Parameter(ParameterMismatch::MissingInDocs { name: n })
                    | MismatchKind::Parameter(ParameterMismatch::TypeMismatch { name: n, .. })
                        if n == name =>
                    {
                        Some(m.code())
                    }
                    _ => None,
                })
                .collect();
            assert!(kinds.len() <= 1, "{} reported {:?}", name, kinds);
        }
        assert_eq!(codes(&mismatches), vec!["DSV102", "DSV103", "DSV101"]);
    }
}
