//! Section-header docstring parser
//!
//! Parses docstrings laid out as:
//!
//! ```text
//! Summary line.
//!
//! Args:
//!     name (str): Description that may
//!         continue on following lines.
//!     age (int, optional): Another parameter.
//!
//! Returns:
//!     str: What comes back.
//!
//! Raises:
//!     ValueError: When it fails.
//! ```

use super::grammar::{
    exception_line, indent_of, parameter_line, return_type_prefix, split_optional_marker,
    HeaderScanner, SectionKind,
};
use super::{append_text, DocDescriptor, DocException, DocParameter, DocReturns};

/// Lines collected under one header
struct SectionBlock<'a> {
    kind: SectionKind,
    lines: Vec<&'a str>,
}

/// Parse a section-header docstring
pub fn parse(text: &str) -> DocDescriptor {
    let mut doc = DocDescriptor::default();
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut blocks: Vec<SectionBlock> = Vec::new();
    let mut headers = HeaderScanner::new();

    for line in text.lines() {
        if let Some(kind) = headers.header(line) {
            blocks.push(SectionBlock {
                kind,
                lines: Vec::new(),
            });
            continue;
        }
        match blocks.last_mut() {
            Some(block) => block.lines.push(line),
            None => summary_lines.push(line),
        }
    }

    doc.summary = join_lines(&summary_lines);

    for block in &blocks {
        match block.kind {
            SectionKind::Args => doc.parameters.extend(parse_args(&block.lines)),
            SectionKind::Returns => {
                if doc.returns.is_none() {
                    doc.returns = Some(parse_returns(&block.lines));
                }
            }
            SectionKind::Yields => {
                if doc.yields.is_none() {
                    doc.yields = Some(parse_returns(&block.lines));
                }
            }
            SectionKind::Raises => doc.raises.extend(parse_raises(&block.lines)),
            SectionKind::Note => {
                if let Some(text) = join_lines(&block.lines) {
                    doc.notes = Some(match doc.notes.take() {
                        Some(existing) => format!("{}\n{}", existing, text),
                        None => text,
                    });
                }
            }
            _ => {}
        }
    }

    doc
}

/// Parse the entries of an args section.
///
/// A line indented deeper than the entry above it, or any non-empty line that
/// does not look like an entry, continues the previous description.
fn parse_args(lines: &[&str]) -> Vec<DocParameter> {
    let mut parameters: Vec<DocParameter> = Vec::new();
    let mut entry_indent: Option<usize> = None;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let indent = indent_of(line);
        let continues_entry = matches!(entry_indent, Some(base) if indent > base);

        if !continues_entry {
            if let Some(entry) = parameter_line(line) {
                let (type_hint, optionality) = match entry.type_text {
                    Some(type_text) => split_optional_marker(type_text),
                    None => (None, Default::default()),
                };
                parameters.push(DocParameter {
                    name: entry.name.to_string(),
                    type_hint,
                    description: entry.description.to_string(),
                    optionality,
                });
                entry_indent = Some(indent);
                continue;
            }
        }

        if let Some(last) = parameters.last_mut() {
            append_text(&mut last.description, line);
        }
    }

    parameters
}

/// Parse a returns or yields section.
///
/// The text before the first colon is taken as the type only when it looks
/// like one; otherwise the whole section is description.
fn parse_returns(lines: &[&str]) -> DocReturns {
    let mut returns = DocReturns {
        type_hint: None,
        description: String::new(),
    };
    let mut content = lines.iter().filter(|line| !line.trim().is_empty());

    if let Some(first) = content.next() {
        match return_type_prefix(first) {
            Some((type_hint, rest)) => {
                returns.type_hint = Some(type_hint.to_string());
                append_text(&mut returns.description, rest);
            }
            None => append_text(&mut returns.description, first),
        }
    }
    for line in content {
        append_text(&mut returns.description, line);
    }

    returns
}

fn parse_raises(lines: &[&str]) -> Vec<DocException> {
    let mut exceptions: Vec<DocException> = Vec::new();
    let mut entry_indent: Option<usize> = None;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let indent = indent_of(line);
        let continues_entry = matches!(entry_indent, Some(base) if indent > base);

        if !continues_entry {
            if let Some((exception, description)) = exception_line(line) {
                exceptions.push(DocException {
                    exception: exception.to_string(),
                    description: description.to_string(),
                });
                entry_indent = Some(indent);
                continue;
            }
        }

        if let Some(last) = exceptions.last_mut() {
            append_text(&mut last.description, line);
        }
    }

    exceptions
}

fn join_lines(lines: &[&str]) -> Option<String> {
    let text = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
