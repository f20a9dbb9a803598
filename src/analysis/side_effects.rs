//! Side-effect checks

use super::{Analyzer, Mismatch};
use crate::diagnostics::{MismatchKind, SideEffectMismatch};
use crate::docstring::DocDescriptor;
use crate::facts::{CodeFacts, Range};

/// Words in the notes that count as documenting a side effect
pub fn default_side_effect_keywords() -> Vec<String> {
    [
        "side effect",
        "side-effect",
        "modifies",
        "mutates",
        "writes to",
        "prints",
        "stdout",
        "global",
        "file",
        "i/o",
        "saves",
        "creates file",
        "deletes file",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

/// Reports I/O and global state changes the notes do not mention
#[derive(Debug, Clone)]
pub struct SideEffectAnalyzer {
    keywords: Vec<String>,
}

impl SideEffectAnalyzer {
    pub fn new() -> Self {
        Self {
            keywords: default_side_effect_keywords(),
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    fn mentions_side_effects(&self, notes: &str) -> bool {
        let notes = notes.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| notes.contains(&keyword.to_lowercase()))
    }
}

impl Default for SideEffectAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for SideEffectAnalyzer {
    fn name(&self) -> &str {
        "side_effects"
    }

    fn analyze(&self, facts: &CodeFacts, doc: &DocDescriptor, anchor: Range) -> Vec<Mismatch> {
        if facts.docstring.is_none() || !(facts.has_io || facts.has_global_mods) {
            return Vec::new();
        }
        if doc
            .notes
            .as_deref()
            .is_some_and(|notes| self.mentions_side_effects(notes))
        {
            return Vec::new();
        }

        vec![Mismatch::new(
            MismatchKind::SideEffect(SideEffectMismatch::Undocumented {
                io: facts.has_io,
                global_state: facts.has_global_mods,
            }),
            anchor,
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticCode, Severity};
    use crate::docstring::google;
    use indoc::indoc;

    fn writer(docstring: &str) -> CodeFacts {
        let mut facts = CodeFacts::new("write_log").with_docstring(docstring);
        facts.has_io = true;
        facts
    }

    #[test]
    fn test_undocumented_io() {
        let text = "Write a log message.\n\nArgs:\n    message: The message";
        let mismatches =
            SideEffectAnalyzer::new().analyze(&writer(text), &google::parse(text), Range::default());

        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].code(), DiagnosticCode::SideEffectsUndocumented);
        assert_eq!(mismatches[0].severity(), Severity::Information);
        assert_eq!(
            mismatches[0].kind,
            MismatchKind::SideEffect(SideEffectMismatch::Undocumented {
                io: true,
                global_state: false
            })
        );
    }

    #[test]
    fn test_notes_mention_side_effect() {
        let text = indoc! {"
            Write a log message to a file.

            Note:
                This function writes to the 'log.txt' FILE.
        "};
        assert!(SideEffectAnalyzer::new()
            .analyze(&writer(text), &google::parse(text), Range::default())
            .is_empty());
    }

    #[test]
    fn test_keywords_outside_notes_do_not_count() {
        let text = "Writes to a global file.";
        let mismatches =
            SideEffectAnalyzer::new().analyze(&writer(text), &google::parse(text), Range::default());
        assert_eq!(mismatches.len(), 1);
    }

    #[test]
    fn test_custom_keywords_and_global_state() {
        let text = "Count.\n\nNote:\n    Bumps the counter.";
        let mut facts = CodeFacts::new("increment").with_docstring(text);
        facts.has_global_mods = true;

        let default = SideEffectAnalyzer::new().analyze(&facts, &google::parse(text), Range::default());
        assert_eq!(default.len(), 1);

        let custom = SideEffectAnalyzer::new()
            .with_keywords(vec!["Bumps".to_string()])
            .analyze(&facts, &google::parse(text), Range::default());
        assert!(custom.is_empty());
    }

    #[test]
    fn test_no_effects_or_no_docstring() {
        let pure = CodeFacts::new("pure").with_docstring("Pure.");
        assert!(SideEffectAnalyzer::new()
            .analyze(&pure, &google::parse("Pure."), Range::default())
            .is_empty());

        let mut undocumented = CodeFacts::new("raw");
        undocumented.has_io = true;
        assert!(SideEffectAnalyzer::new()
            .analyze(&undocumented, &DocDescriptor::default(), Range::default())
            .is_empty());
    }
}
