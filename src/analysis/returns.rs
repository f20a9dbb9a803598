//! Return value checks

use super::{Analyzer, Mismatch};
use crate::diagnostics::{MismatchKind, ReturnMismatch};
use crate::docstring::DocDescriptor;
use crate::editor::Fix;
use crate::facts::{CodeFacts, Range};
use crate::normalize::{normalize, types_match};

/// Compares return statements and annotations with the returns section
#[derive(Debug, Clone, Default)]
pub struct ReturnAnalyzer;

impl ReturnAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

fn is_void(type_hint: Option<&str>) -> bool {
    type_hint.map_or(true, |t| normalize(t) == "none")
}

impl Analyzer for ReturnAnalyzer {
    fn name(&self) -> &str {
        "returns"
    }

    fn analyze(&self, facts: &CodeFacts, doc: &DocDescriptor, anchor: Range) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();
        let code_type = facts.return_type.as_deref();
        let documented = doc.returns.as_ref();
        let void = is_void(code_type);

        if facts.is_generator && documented.is_some() {
            mismatches.push(
                Mismatch::new(
                    MismatchKind::Return(ReturnMismatch::GeneratorShouldYield),
                    anchor,
                )
                .with_fix(Fix::UseYields),
            );
        }

        if !facts.is_generator && facts.return_statements.len() >= 2 {
            let mut types: Vec<String> = Vec::new();
            for site in &facts.return_statements {
                if let Some(type_hint) = site.type_hint.as_deref() {
                    let normalized = normalize(type_hint);
                    if !types.contains(&normalized) {
                        types.push(normalized);
                    }
                }
            }
            if types.len() > 1 {
                mismatches.push(Mismatch::new(
                    MismatchKind::Return(ReturnMismatch::InconsistentReturns { types }),
                    facts.range,
                ));
            }
        }

        let doc_type = documented.and_then(|returns| returns.type_hint.as_deref());
        if let (Some(code_type), Some(doc_type)) = (code_type, doc_type) {
            if !types_match(code_type, doc_type) {
                let mismatch = Mismatch::new(
                    MismatchKind::Return(ReturnMismatch::TypeMismatch {
                        code_type: code_type.to_string(),
                        doc_type: doc_type.to_string(),
                    }),
                    anchor,
                );
                // A void or generator section is removed or renamed by its own fix
                mismatches.push(if void || facts.is_generator {
                    mismatch
                } else {
                    mismatch.with_fix(Fix::UpdateReturnType {
                        type_hint: code_type.to_string(),
                    })
                });
            }
        }

        match (code_type, documented) {
            (Some(code_type), None) if !void => {
                let mismatch = Mismatch::new(
                    MismatchKind::Return(ReturnMismatch::MissingInDocs {
                        code_type: code_type.to_string(),
                    }),
                    anchor,
                );
                mismatches.push(if facts.is_generator {
                    mismatch
                } else {
                    mismatch.with_fix(Fix::AddReturn {
                        type_hint: code_type.to_string(),
                    })
                });
            }
            (_, Some(returns)) if void => {
                mismatches.push(
                    Mismatch::new(
                        MismatchKind::Return(ReturnMismatch::DocumentedButVoid {
                            doc_type: returns.type_hint.clone(),
                        }),
                        anchor,
                    )
                    .with_fix(Fix::RemoveReturn),
                );
            }
            _ => {}
        }

        mismatches
    }
}
