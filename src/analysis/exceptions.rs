//! Exception checks

use super::{Analyzer, Mismatch};
use crate::diagnostics::{ExceptionMismatch, MismatchKind};
use crate::docstring::grammar::exception_key;
use crate::docstring::DocDescriptor;
use crate::editor::Fix;
use crate::facts::{CodeFacts, Range};
use std::collections::HashSet;

/// Compares raise statements with the raises section
#[derive(Debug, Clone, Default)]
pub struct ExceptionAnalyzer;

impl ExceptionAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for ExceptionAnalyzer {
    fn name(&self) -> &str {
        "exceptions"
    }

    fn analyze(&self, facts: &CodeFacts, doc: &DocDescriptor, anchor: Range) -> Vec<Mismatch> {
        if facts.docstring.is_none() {
            return Vec::new();
        }

        let documented: HashSet<String> =
            doc.raises.iter().map(|e| exception_key(&e.exception)).collect();
        let raised: HashSet<String> = facts
            .raises
            .iter()
            .map(|r| exception_key(&r.exception))
            .collect();

        let mut mismatches = Vec::new();

        // One report per raise site
        for site in &facts.raises {
            if documented.contains(&exception_key(&site.exception)) {
                continue;
            }
            mismatches.push(
                Mismatch::new(
                    MismatchKind::Exception(ExceptionMismatch::Undocumented {
                        exception: site.exception.clone(),
                    }),
                    Range::at_line(site.line),
                )
                .with_related(anchor, "Docstring")
                .with_fix(Fix::AddException {
                    exception: site.exception.clone(),
                }),
            );
        }

        let mut reported = HashSet::new();
        for entry in &doc.raises {
            let key = exception_key(&entry.exception);
            if raised.contains(&key) || !reported.insert(key) {
                continue;
            }
            mismatches.push(
                Mismatch::new(
                    MismatchKind::Exception(ExceptionMismatch::NotRaised {
                        exception: entry.exception.clone(),
                    }),
                    anchor,
                )
                .with_fix(Fix::RemoveException {
                    exception: entry.exception.clone(),
                }),
            );
        }

        mismatches
    }
}
