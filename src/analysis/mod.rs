//! Docstring analysis
//!
//! Analyzers compare the facts extracted from a function with what its
//! docstring says and report each disagreement as a [`Mismatch`]:
//! - [`SignatureAnalyzer`]: parameter names, types and optionality
//! - [`ReturnAnalyzer`]: return values and generators
//! - [`ExceptionAnalyzer`]: raised versus documented exceptions
//! - [`SideEffectAnalyzer`]: I/O and global state the notes do not mention
//!
//! The [`Verifier`] runs them for whole extraction reports.

pub mod exceptions;
pub mod returns;
pub mod side_effects;
pub mod signature;
pub mod verifier;

pub use exceptions::ExceptionAnalyzer;
pub use returns::ReturnAnalyzer;
pub use side_effects::SideEffectAnalyzer;
pub use signature::SignatureAnalyzer;
pub use verifier::{FunctionReport, Verifier};

use crate::diagnostics::{DiagnosticCode, MismatchKind, RelatedLocation, Severity};
use crate::docstring::DocDescriptor;
use crate::editor::Fix;
use crate::facts::{CodeFacts, Range};

/// A disagreement between code and docstring
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub kind: MismatchKind,
    pub range: Range,
    pub related: Option<RelatedLocation>,
    /// Docstring edit that resolves the mismatch, when one is known
    pub fix: Option<Fix>,
}

impl Mismatch {
    pub fn new(kind: MismatchKind, range: Range) -> Self {
        Self {
            kind,
            range,
            related: None,
            fix: None,
        }
    }

    pub fn with_related(mut self, range: Range, message: &str) -> Self {
        self.related = Some(RelatedLocation {
            range,
            message: message.to_string(),
        });
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn code(&self) -> DiagnosticCode {
        self.kind.code()
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// A comparator between code facts and a parsed docstring
pub trait Analyzer: Send + Sync {
    /// Analyzer name
    fn name(&self) -> &str;

    /// Report every mismatch for one function. `anchor` is where
    /// docstring-level mismatches are reported.
    fn analyze(&self, facts: &CodeFacts, doc: &DocDescriptor, anchor: Range) -> Vec<Mismatch>;
}
