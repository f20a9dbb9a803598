//! Main verification engine
//!
//! Coordinates one pass over a function or a whole extraction report:
//! - Docstring style selection
//! - Parsing
//! - Running every analyzer and rendering diagnostics

use super::{
    Analyzer, ExceptionAnalyzer, Mismatch, ReturnAnalyzer, SideEffectAnalyzer, SignatureAnalyzer,
};
use crate::config::VerifierConfig;
use crate::diagnostics::{Diagnostic, DiagnosticEmitter};
use crate::docstring::{self, DocDescriptor, DocstringStyle};
use crate::facts::{CodeFacts, ExtractionReport};
use serde::Serialize;

/// Outcome for one function
#[derive(Debug, Clone, Serialize)]
pub struct FunctionReport {
    pub function: String,
    /// Dialect the docstring was parsed as, `None` without a docstring
    pub style: Option<DocstringStyle>,
    #[serde(skip)]
    pub mismatches: Vec<Mismatch>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FunctionReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Main verification engine
pub struct Verifier {
    config: VerifierConfig,
    analyzers: Vec<Box<dyn Analyzer>>,
    emitter: DiagnosticEmitter,
}

impl Verifier {
    /// Create a verifier with default configuration
    pub fn new() -> Self {
        Self::with_config(VerifierConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(config: VerifierConfig) -> Self {
        let analyzers: Vec<Box<dyn Analyzer>> = vec![
            Box::new(
                SignatureAnalyzer::new()
                    .with_implicit_parameters(config.implicit_parameters.clone())
                    .with_skip_variadic(config.skip_variadic),
            ),
            Box::new(ReturnAnalyzer::new()),
            Box::new(ExceptionAnalyzer::new()),
            Box::new(SideEffectAnalyzer::new().with_keywords(config.side_effect_keywords.clone())),
        ];
        Self {
            config,
            analyzers,
            emitter: DiagnosticEmitter::new(),
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Dialect for a whole file, by vote over its docstrings
    pub fn file_style(&self, functions: &[CodeFacts]) -> DocstringStyle {
        match self.config.style {
            docstring::StyleSetting::Google => DocstringStyle::Google,
            docstring::StyleSetting::Sphinx => DocstringStyle::Sphinx,
            docstring::StyleSetting::Auto => docstring::detect_file_style(
                functions.iter().filter_map(|f| f.docstring.as_deref()),
                self.config.style_sample_size,
            ),
        }
    }

    /// Parse a function's docstring. `fallback` is the file-level dialect,
    /// used when the docstring itself is inconclusive.
    pub fn parse_docstring(
        &self,
        facts: &CodeFacts,
        fallback: DocstringStyle,
    ) -> Option<(DocstringStyle, DocDescriptor)> {
        let text = facts.docstring.as_deref()?;
        let style = self.config.style.resolve(text, fallback);
        Some((style, docstring::parse(text, style)))
    }

    /// Verify one function
    pub fn verify_function(&self, facts: &CodeFacts, fallback: DocstringStyle) -> FunctionReport {
        let parsed = self.parse_docstring(facts, fallback);
        let style = parsed.as_ref().map(|(style, _)| *style);

        if parsed.is_none() && self.config.skip_undocumented {
            tracing::debug!(function = %facts.name, "skipping function without docstring");
            return FunctionReport {
                function: facts.name.clone(),
                style,
                mismatches: Vec::new(),
                diagnostics: Vec::new(),
            };
        }

        let doc = parsed.map(|(_, doc)| doc).unwrap_or_default();
        let anchor = facts.anchor();

        let mismatches: Vec<Mismatch> = self
            .analyzers
            .iter()
            .flat_map(|analyzer| {
                let found = analyzer.analyze(facts, &doc, anchor);
                tracing::debug!(
                    function = %facts.name,
                    analyzer = analyzer.name(),
                    count = found.len(),
                    "analyzer finished"
                );
                found
            })
            .filter(|m| self.config.is_enabled(m.code()))
            .collect();

        let diagnostics = mismatches
            .iter()
            .map(|m| self.emitter.emit(&facts.name, m))
            .collect();

        FunctionReport {
            function: facts.name.clone(),
            style,
            mismatches,
            diagnostics,
        }
    }

    /// Verify every function of an extraction report. A failed extraction
    /// yields no reports.
    pub fn verify_report(&self, report: &ExtractionReport) -> Vec<FunctionReport> {
        let functions = report.usable_functions();
        if functions.is_empty() {
            if !report.success {
                tracing::debug!(file = ?report.file, "extraction failed, nothing to verify");
            }
            return Vec::new();
        }

        let fallback = self.file_style(functions);
        tracing::debug!(file = ?report.file, style = %fallback, "verifying report");

        functions
            .iter()
            .map(|facts| self.verify_function(facts, fallback))
            .collect()
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticCode, Severity};
    use crate::docstring::StyleSetting;
    use crate::editor::apply_all;
    use crate::facts::ParameterFacts;
    use indoc::indoc;

    fn codes(report: &FunctionReport) -> Vec<&'static str> {
        report.diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn test_missing_parameter_scenario() {
        let facts = CodeFacts::new("add")
            .with_parameter(ParameterFacts::new("x").with_type("int"))
            .with_parameter(ParameterFacts::new("y").with_type("int"))
            .with_return_type("int")
            .with_docstring(indoc! {"
                Add two numbers.

                Args:
                    y (int): Second number

                Returns:
                    int: Sum of the numbers
            "});

        let report = Verifier::new().verify_function(&facts, DocstringStyle::Google);
        assert_eq!(report.style, Some(DocstringStyle::Google));
        assert_eq!(codes(&report), vec!["DSV102"]);
        assert_eq!(report.diagnostics[0].severity, Severity::Warning);
        assert!(report.diagnostics[0].message.contains("'x'"));
    }

    #[test]
    fn test_sphinx_docstring_detected_per_function() {
        let facts = CodeFacts::new("process_items")
            .with_parameter(ParameterFacts::new("items").with_type("list"))
            .with_return_type("list")
            .with_docstring(indoc! {"
                Process items.

                :param items: Items to process
                :type items: dict
                :returns: Processed items
                :rtype: dict
            "});

        let report = Verifier::new().verify_function(&facts, DocstringStyle::Google);
        assert_eq!(report.style, Some(DocstringStyle::Sphinx));
        assert_eq!(codes(&report), vec!["DSV103", "DSV201"]);
    }

    #[test]
    fn test_undocumented_functions() {
        let facts = CodeFacts::new("helper")
            .with_parameter(ParameterFacts::new("x"))
            .with_return_type("int");

        let skipped = Verifier::new().verify_function(&facts, DocstringStyle::Google);
        assert!(skipped.is_clean());
        assert_eq!(skipped.style, None);

        let config = VerifierConfig {
            skip_undocumented: false,
            ..Default::default()
        };
        let strict = Verifier::with_config(config).verify_function(&facts, DocstringStyle::Google);
        assert_eq!(codes(&strict), vec!["DSV102", "DSV202"]);
    }

    #[test]
    fn test_disabled_codes_are_filtered() {
        let mut facts = CodeFacts::new("save")
            .with_docstring("Save data.")
            .with_raise("OSError", 4);
        facts.has_io = true;

        let all = Verifier::new().verify_function(&facts, DocstringStyle::Google);
        assert_eq!(codes(&all), vec!["DSV301", "DSV401"]);

        let config = VerifierConfig {
            disabled_codes: vec![DiagnosticCode::SideEffectsUndocumented],
            ..Default::default()
        };
        let filtered = Verifier::with_config(config).verify_function(&facts, DocstringStyle::Google);
        assert_eq!(codes(&filtered), vec!["DSV301"]);
        assert_eq!(filtered.mismatches.len(), 1);
    }

    #[test]
    fn test_report_uses_file_level_style() {
        let report = ExtractionReport {
            success: true,
            file: Some("mixed.py".to_string()),
            functions: vec![
                CodeFacts::new("a").with_docstring(":param x: X\n:type x: int"),
                CodeFacts::new("b").with_docstring(":returns: nothing"),
                CodeFacts::new("c").with_docstring("Just a summary."),
            ],
            error: None,
            message: None,
        };

        let verifier = Verifier::new();
        assert_eq!(verifier.file_style(&report.functions), DocstringStyle::Sphinx);

        let reports = verifier.verify_report(&report);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[2].style, Some(DocstringStyle::Sphinx));
        assert_eq!(codes(&reports[0]), vec!["DSV101"]);
        assert_eq!(codes(&reports[1]), vec!["DSV203"]);
    }

    #[test]
    fn test_forced_style() {
        let config = VerifierConfig {
            style: StyleSetting::Google,
            ..Default::default()
        };
        let facts = CodeFacts::new("a").with_docstring(":param x: X");
        let report = Verifier::with_config(config).verify_function(&facts, DocstringStyle::Sphinx);
        assert_eq!(report.style, Some(DocstringStyle::Google));
        assert!(report.is_clean());
    }

    #[test]
    fn test_failed_report_has_no_diagnostics() {
        let report = ExtractionReport::from_json(
            r#"{"success": false, "error": "SyntaxError", "message": "invalid syntax"}"#,
        )
        .unwrap();
        assert!(Verifier::new().verify_report(&report).is_empty());
    }

    #[test]
    fn test_verifier_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Verifier>();
    }

    #[test]
    fn test_fixes_in_keyword_args_clear_mismatches() {
        let facts = CodeFacts::new("connect")
            .with_parameter(ParameterFacts::new("host").with_type("str"))
            .with_parameter(ParameterFacts::new("port").with_type("int"))
            .with_docstring(indoc! {"
                Connect.

                Args:
                    host (str): Host

                Keyword Args:
                    port (str): Port
                    old (int): Legacy
            "});

        let verifier = Verifier::new();
        let report = verifier.verify_function(&facts, DocstringStyle::Google);
        assert_eq!(codes(&report), vec!["DSV103", "DSV101"]);

        let fixed = apply_all(
            facts.docstring.as_deref().unwrap_or_default(),
            report.mismatches.iter().filter_map(|m| m.fix.as_ref()),
        );
        let refixed = facts.clone().with_docstring(&fixed);
        assert!(verifier
            .verify_function(&refixed, DocstringStyle::Google)
            .is_clean());
    }

    #[test]
    fn test_fixed_docstring_verifies_clean() {
        let facts = CodeFacts::new("log")
            .with_parameter(ParameterFacts::new("message").with_type("str"))
            .with_parameter(ParameterFacts::new("note"))
            .with_parameter(ParameterFacts::new("level"))
            .with_docstring("Log.\n\nArgs:\n    message (str): Text\n");

        let verifier = Verifier::new();
        let report = verifier.verify_function(&facts, DocstringStyle::Google);
        assert_eq!(codes(&report), vec!["DSV102", "DSV102"]);

        let fixed = apply_all(
            facts.docstring.as_deref().unwrap_or_default(),
            report.mismatches.iter().filter_map(|m| m.fix.as_ref()),
        );
        assert_eq!(fixed, "Log.\n\nArgs:\n    message (str): Text\n    note:\n    level:\n");

        let refixed = facts.clone().with_docstring(&fixed);
        assert!(verifier
            .verify_function(&refixed, DocstringStyle::Google)
            .is_clean());
    }
}
