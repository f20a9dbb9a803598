//! Command implementations

use super::FailOn;
use crate::analysis::{FunctionReport, Verifier};
use crate::config::VerifierConfig;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Severity};
use crate::docstring::{self, detect_style, DetectedStyle, DocDescriptor, DocstringStyle, StyleSetting};
use crate::editor::apply_all;
use crate::facts::ExtractionReport;
use crate::normalize::normalize;
use anyhow::{Context, Result};
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};

/// Diagnostics for one extraction report
#[derive(Debug, Serialize)]
pub struct FileResult {
    pub file: String,
    pub functions: Vec<FunctionReport>,
}

impl FileResult {
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.functions.iter().flat_map(|f| f.diagnostics.iter())
    }
}

/// Load the configuration of the project at `root`
pub fn load_config(root: &Path) -> Result<VerifierConfig> {
    VerifierConfig::load_or_default(root)
        .with_context(|| format!("Failed to load configuration from {:?}", root))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

/// Resolve check targets to report files. Directories are walked for
/// `*.json` files, skipping hidden entries and ignored paths.
pub fn collect_reports(
    root: &Path,
    targets: &[PathBuf],
    config: &VerifierConfig,
) -> Result<Vec<PathBuf>> {
    let targets: Vec<PathBuf> = if targets.is_empty() {
        vec![root.to_path_buf()]
    } else {
        targets.iter().map(|t| root.join(t)).collect()
    };

    let mut reports = Vec::new();
    for target in targets {
        if target.is_file() {
            reports.push(target);
            continue;
        }
        if !target.is_dir() {
            anyhow::bail!("No such report or directory: {:?}", target);
        }

        for entry in walkdir::WalkDir::new(&target)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_str().unwrap_or("");
                e.depth() == 0 || !name.starts_with('.')
            })
        {
            let entry = entry.with_context(|| format!("Failed to walk {:?}", target))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("json")
            {
                continue;
            }

            let relative = path
                .strip_prefix(&target)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            if config.should_ignore(&relative) {
                tracing::debug!(path = %relative, "ignoring report");
                continue;
            }
            reports.push(path.to_path_buf());
        }
    }

    Ok(reports)
}

/// Verify extraction reports
pub fn check(root: &Path, targets: &[PathBuf], only_codes: &[String]) -> Result<Vec<FileResult>> {
    let mut config = load_config(root)?;

    if !only_codes.is_empty() {
        let wanted = only_codes
            .iter()
            .map(|code| {
                DiagnosticCode::parse(code)
                    .ok_or_else(|| anyhow::anyhow!("Unknown diagnostic code: {}", code))
            })
            .collect::<Result<Vec<_>>>()?;
        config.disabled_codes.extend(
            DiagnosticCode::ALL
                .iter()
                .copied()
                .filter(|code| !wanted.contains(code)),
        );
    }

    let verifier = Verifier::with_config(config);
    let mut results = Vec::new();

    for path in collect_reports(root, targets, verifier.config())? {
        let report = match ExtractionReport::from_path(&path) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", path, e);
                continue;
            }
        };
        if let Err(e) = report.ensure_success() {
            tracing::warn!("{}", e);
        }

        let file = report
            .file
            .clone()
            .unwrap_or_else(|| path.display().to_string());
        results.push(FileResult {
            file,
            functions: verifier.verify_report(&report),
        });
    }

    Ok(results)
}

/// Whether any diagnostic reaches the failure threshold
pub fn should_fail(results: &[FileResult], fail_on: Option<FailOn>) -> bool {
    let Some(fail_on) = fail_on else {
        return false;
    };
    results
        .iter()
        .flat_map(|r| r.diagnostics())
        .any(|d| fail_on.is_triggered_by(d.severity))
}

/// Detect the style of a docstring file
pub fn detect(file: &Path) -> Result<DetectedStyle> {
    let text = read_text(file)?;
    Ok(detect_style(&text))
}

/// Parse a docstring file
pub fn parse(
    root: &Path,
    file: &Path,
    style: Option<StyleSetting>,
) -> Result<(DocstringStyle, DocDescriptor)> {
    let text = read_text(file)?;
    let setting = match style {
        Some(style) => style,
        None => load_config(root)?.style,
    };
    let style = setting.resolve(&text, DocstringStyle::Google);
    Ok((style, docstring::parse(&text, style)))
}

/// A type spelling and its normalized form
#[derive(Debug, Serialize)]
pub struct NormalizedType {
    pub input: String,
    pub normalized: String,
}

/// Normalize type spellings
pub fn normalize_types(types: &[String]) -> Vec<NormalizedType> {
    types
        .iter()
        .map(|input| NormalizedType {
            input: input.clone(),
            normalized: normalize(input),
        })
        .collect()
}

/// Outcome of fixing one docstring
#[derive(Debug, Serialize)]
pub struct FixOutcome {
    pub function: String,
    /// Titles of the applied fixes, in order
    pub applied: Vec<String>,
    pub original: String,
    pub fixed: String,
}

impl FixOutcome {
    pub fn diff(&self) -> String {
        generate_unified_diff(&self.original, &self.fixed)
    }
}

/// Apply every suggested fix to one function's docstring
pub fn fix(
    root: &Path,
    report_path: &Path,
    function: &str,
    write: Option<&Path>,
) -> Result<FixOutcome> {
    let config = load_config(root)?;
    let report_path = root.join(report_path);
    let report = ExtractionReport::from_path(&report_path)
        .with_context(|| format!("Failed to load report {:?}", report_path))?;
    report.ensure_success()?;

    let facts = report
        .functions
        .iter()
        .find(|f| f.name == function)
        .ok_or_else(|| anyhow::anyhow!("Function not found in report: {}", function))?;
    let original = facts
        .docstring
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Function '{}' has no docstring", function))?;

    let verifier = Verifier::with_config(config);
    let result = verifier.verify_function(facts, verifier.file_style(&report.functions));
    if result.style == Some(DocstringStyle::Sphinx) {
        anyhow::bail!(
            "Fixes are only supported for section-header docstrings; '{}' uses directives",
            function
        );
    }

    let fixes: Vec<_> = result
        .mismatches
        .iter()
        .filter_map(|m| m.fix.as_ref())
        .collect();
    let fixed = apply_all(&original, fixes.iter().copied());

    if let Some(out) = write {
        let out = root.join(out);
        std::fs::write(&out, &fixed)
            .with_context(|| format!("Failed to write fixed docstring to {:?}", out))?;
        tracing::info!("Wrote fixed docstring to {:?}", out);
    }

    Ok(FixOutcome {
        function: function.to_string(),
        applied: fixes.iter().map(|f| f.title()).collect(),
        original,
        fixed,
    })
}

/// Show or reset the configuration
pub fn config(root: &Path, show: bool, reset: bool) -> Result<VerifierConfig> {
    if reset {
        let default_config = VerifierConfig::default();
        default_config
            .save(root)
            .context("Failed to reset configuration")?;
        println!("✓ Configuration reset to defaults");
        if !show {
            return Ok(default_config);
        }
    }
    load_config(root)
}

/// Generate a unified diff between two strings
pub fn generate_unified_diff(original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "⚠",
        Severity::Information => "ℹ",
    }
}

/// Print any serializable result as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print check results in text format
pub fn print_results_text(results: &[FileResult]) {
    let mut total = 0usize;

    for result in results {
        for function in &result.functions {
            for d in &function.diagnostics {
                total += 1;
                println!(
                    "{} {}:{}:{} {} {}",
                    severity_icon(d.severity),
                    result.file,
                    d.range.start.line + 1,
                    d.range.start.character + 1,
                    d.code,
                    d.message
                );
                if let Some(ref related) = d.related {
                    println!("   {} at line {}", related.message, related.range.start.line + 1);
                }
            }
        }
    }

    if total == 0 {
        println!("✓ No docstring mismatches found");
    } else {
        println!("\nFound {} diagnostic(s) in {} report(s)", total, results.len());
    }
}

/// Print a parsed docstring in text format
pub fn print_descriptor_text(style: DocstringStyle, doc: &DocDescriptor) {
    println!("Style: {}", style);
    if let Some(ref summary) = doc.summary {
        println!("Summary: {}", summary.replace('\n', " "));
    }

    if !doc.parameters.is_empty() {
        println!("\nParameters:");
        for p in &doc.parameters {
            let type_hint = p.type_hint.as_deref().unwrap_or("-");
            let optional = match p.optionality.as_flag() {
                Some(true) => " [optional]",
                Some(false) => " [required]",
                None => "",
            };
            println!("  - {} ({}){}: {}", p.name, type_hint, optional, p.description);
        }
    }

    for (label, section) in [("Returns", &doc.returns), ("Yields", &doc.yields)] {
        if let Some(r) = section {
            println!(
                "\n{}: {}: {}",
                label,
                r.type_hint.as_deref().unwrap_or("-"),
                r.description
            );
        }
    }

    if !doc.raises.is_empty() {
        println!("\nRaises:");
        for e in &doc.raises {
            println!("  - {}: {}", e.exception, e.description);
        }
    }

    if let Some(ref notes) = doc.notes {
        println!("\nNotes: {}", notes.replace('\n', " "));
    }
}

/// Print a fix outcome in text format
pub fn print_fix_text(outcome: &FixOutcome) {
    if outcome.applied.is_empty() {
        println!("✓ No fixes needed for '{}'", outcome.function);
        return;
    }

    for title in &outcome.applied {
        println!("• {}", title);
    }
    println!();
    print!("{}", outcome.diff());
}

/// Print configuration in text format
pub fn print_config_text(config: &VerifierConfig) {
    println!("docverifier Configuration");
    println!("=========================\n");

    println!("Style: {}", config.style);
    println!("Implicit parameters: {}", config.implicit_parameters.join(", "));
    println!("Skip variadic: {}", config.skip_variadic);
    println!("Skip undocumented: {}", config.skip_undocumented);
    println!("Style sample size: {}", config.style_sample_size);

    println!("\nSide-effect keywords:");
    for keyword in &config.side_effect_keywords {
        println!("  - {}", keyword);
    }

    println!("\nIgnore patterns:");
    for pattern in &config.ignore_patterns {
        println!("  - {}", pattern);
    }

    if !config.disabled_codes.is_empty() {
        let codes: Vec<&str> = config.disabled_codes.iter().map(|c| c.as_str()).collect();
        println!("\nDisabled codes: {}", codes.join(", "));
    }
}
