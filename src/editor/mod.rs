//! Structural docstring editing
//!
//! The editor keeps a docstring as an ordered list of typed line nodes and
//! performs targeted edits on the sections of a section-header docstring.
//! Lines an operation does not touch are rendered back exactly as loaded.
//!
//! Section bounds are never stored. Every operation locates its section by
//! scanning the nodes, so earlier edits cannot leave stale line numbers behind.

pub mod fix;

pub use fix::{apply_all, Fix};

use crate::docstring::grammar::{
    exception_key, exception_line, indent_of, parameter_line, return_type_prefix,
    split_optional_marker, HeaderScanner, SectionKind,
};
use crate::docstring::{DocParameter, Optionality};
use once_cell::sync::Lazy;
use regex::Regex;

/// Indentation of entries relative to their header when none exist yet
const ENTRY_INDENT: &str = "    ";

/// One line of the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Header { kind: SectionKind, line: String },
    /// First line of a parameter, return or exception entry
    Entry(String),
    /// Anything else: summary, continuation and blank lines
    Text(String),
}

impl Node {
    fn line(&self) -> &str {
        match self {
            Node::Header { line, .. } | Node::Entry(line) | Node::Text(line) => line,
        }
    }

    fn header_kind(&self) -> Option<SectionKind> {
        match self {
            Node::Header { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Node::Text(line) if line.trim().is_empty())
    }
}

/// A section located in the node list
#[derive(Debug, Clone, Copy)]
struct Section {
    header: usize,
    /// Index of the next header, or the number of nodes
    end: usize,
}

impl Section {
    fn at(nodes: &[Node], header: usize) -> Section {
        let end = nodes[header + 1..]
            .iter()
            .position(|n| n.header_kind().is_some())
            .map_or(nodes.len(), |offset| header + 1 + offset);
        Section { header, end }
    }

    /// First section of a kind
    fn find(nodes: &[Node], kind: SectionKind) -> Option<Section> {
        let header = nodes.iter().position(|n| n.header_kind() == Some(kind))?;
        Some(Section::at(nodes, header))
    }

    /// Every section of a kind, e.g. `Args:` and `Keyword Args:`
    fn find_all(nodes: &[Node], kind: SectionKind) -> Vec<Section> {
        (0..nodes.len())
            .filter(|&i| nodes[i].header_kind() == Some(kind))
            .map(|header| Section::at(nodes, header))
            .collect()
    }

    /// Section holding the node at `idx`
    fn containing(nodes: &[Node], idx: usize) -> Option<Section> {
        let header = (0..=idx).rev().find(|&i| nodes[i].header_kind().is_some())?;
        Some(Section::at(nodes, header))
    }

    /// One past the last non-blank line of the section
    fn content_end(&self, nodes: &[Node]) -> usize {
        (self.header + 1..self.end)
            .rev()
            .find(|&i| !nodes[i].is_blank())
            .map_or(self.header + 1, |i| i + 1)
    }

    fn entries(&self, nodes: &[Node]) -> Vec<usize> {
        (self.header + 1..self.end)
            .filter(|&i| matches!(nodes[i], Node::Entry(_)))
            .collect()
    }

    fn is_empty(&self, nodes: &[Node]) -> bool {
        nodes[self.header + 1..self.end].iter().all(Node::is_blank)
    }

    /// Prefix for a new entry: that of the existing entries, or the header's
    /// indentation plus one level
    fn entry_prefix(&self, nodes: &[Node]) -> String {
        match self.entries(nodes).first() {
            Some(&i) => leading_whitespace(nodes[i].line()).to_string(),
            None => format!(
                "{}{}",
                leading_whitespace(nodes[self.header].line()),
                ENTRY_INDENT
            ),
        }
    }

    /// Lines of the entry at `idx`: the entry line and its continuations,
    /// without trailing blank lines
    fn entry_span(&self, nodes: &[Node], idx: usize) -> std::ops::Range<usize> {
        let mut end = idx + 1;
        while end < self.end && matches!(nodes[end], Node::Text(_)) {
            end += 1;
        }
        while end > idx + 1 && nodes[end - 1].is_blank() {
            end -= 1;
        }
        idx..end
    }
}

fn leading_whitespace(line: &str) -> &str {
    &line[..indent_of(line)]
}

/// Canonical order of the signature sections
fn section_rank(kind: SectionKind) -> Option<u8> {
    match kind {
        SectionKind::Args => Some(0),
        SectionKind::Returns => Some(1),
        SectionKind::Yields => Some(2),
        SectionKind::Raises => Some(3),
        _ => None,
    }
}

/// Split text into typed nodes, classifying entries the same way the
/// section-header parser does
fn classify(text: &str, newline: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut headers = HeaderScanner::new();
    let mut section: Option<SectionKind> = None;
    let mut entry_indent: Option<usize> = None;

    for line in text.split(newline) {
        if let Some(kind) = headers.header(line) {
            nodes.push(Node::Header {
                kind,
                line: line.to_string(),
            });
            section = Some(kind);
            entry_indent = None;
            continue;
        }
        if line.trim().is_empty() {
            nodes.push(Node::Text(line.to_string()));
            continue;
        }

        let indent = indent_of(line);
        let continues_entry = matches!(entry_indent, Some(base) if indent > base);
        let is_entry = match section {
            Some(SectionKind::Args) => !continues_entry && parameter_line(line).is_some(),
            Some(SectionKind::Raises) => !continues_entry && exception_line(line).is_some(),
            Some(SectionKind::Returns) | Some(SectionKind::Yields) => entry_indent.is_none(),
            _ => false,
        };

        if is_entry {
            entry_indent = Some(indent);
            nodes.push(Node::Entry(line.to_string()));
        } else {
            nodes.push(Node::Text(line.to_string()));
        }
    }

    nodes
}

/// Prefix for headers of new sections: that of existing headers, otherwise
/// that of the last line of text
fn section_prefix(nodes: &[Node]) -> String {
    nodes
        .iter()
        .find(|n| n.header_kind().is_some())
        .or_else(|| nodes.iter().rev().find(|n| !n.is_blank()))
        .map(|n| leading_whitespace(n.line()).to_string())
        .unwrap_or_default()
}

/// Insert a new section holding one entry. It goes before the first section
/// that canonically follows it, otherwise after the last line of text.
fn create_section(nodes: &mut Vec<Node>, kind: SectionKind, entry: &str) {
    let prefix = section_prefix(nodes);
    let header = Node::Header {
        kind,
        line: format!("{}{}:", prefix, kind.header()),
    };
    let entry = Node::Entry(format!("{}{}{}", prefix, ENTRY_INDENT, entry));

    let rank = section_rank(kind);
    let follower = nodes.iter().position(|n| {
        n.header_kind()
            .and_then(section_rank)
            .is_some_and(|other| rank.is_some_and(|rank| other > rank))
    });

    match follower {
        Some(at) => {
            nodes.splice(at..at, [header, entry, Node::Text(String::new())]);
        }
        None => match nodes.iter().rposition(|n| !n.is_blank()) {
            Some(last) => {
                nodes.splice(
                    last + 1..last + 1,
                    [Node::Text(String::new()), header, entry],
                );
            }
            None => {
                nodes.splice(0..0, [header, entry]);
            }
        },
    }
}

/// Remove a whole section. A section followed by another loses its
/// trailing blank lines; the last section loses the blank lines before it.
fn remove_section(nodes: &mut Vec<Node>, section: Section) {
    if section.end < nodes.len() {
        nodes.drain(section.header..section.end);
    } else {
        let end = section.content_end(nodes);
        let mut start = section.header;
        while start > 0 && nodes[start - 1].is_blank() {
            start -= 1;
        }
        nodes.drain(start..end);
    }
}

/// Remove one entry, and its section with it when nothing else is left
fn remove_entry(nodes: &mut Vec<Node>, idx: usize) {
    let Some(section) = Section::containing(nodes, idx) else {
        return;
    };
    let span = section.entry_span(nodes, idx);
    nodes.drain(span);

    let section = Section::at(nodes, section.header);
    if section.is_empty(nodes) {
        remove_section(nodes, section);
    }
}

fn entry_parameter_name(node: &Node) -> Option<&str> {
    match node {
        Node::Entry(line) => parameter_line(line).map(|p| p.name.trim_start_matches('*')),
        _ => None,
    }
}

/// Entries of every section of a kind, in text order
fn entries_of(nodes: &[Node], kind: SectionKind) -> Vec<usize> {
    Section::find_all(nodes, kind)
        .iter()
        .flat_map(|section| section.entries(nodes))
        .collect()
}

fn find_parameter(nodes: &[Node], name: &str) -> Option<usize> {
    let name = name.trim_start_matches('*');
    entries_of(nodes, SectionKind::Args)
        .into_iter()
        .find(|&i| entry_parameter_name(&nodes[i]) == Some(name))
}

fn find_exception(nodes: &[Node], exception: &str) -> Option<usize> {
    let key = exception_key(exception);
    entries_of(nodes, SectionKind::Raises).into_iter().find(|&i| {
        exception_line(nodes[i].line()).is_some_and(|(name, _)| exception_key(name) == key)
    })
}

/// Text inside the parentheses of a parameter entry
fn parenthesized(type_hint: Option<&str>, optionality: Optionality) -> Option<String> {
    let marker = match optionality {
        Optionality::Optional => Some("optional"),
        Optionality::Required => Some("required"),
        Optionality::Unspecified => None,
    };
    match (type_hint, marker) {
        (Some(type_hint), Some(marker)) => Some(format!("{}, {}", type_hint, marker)),
        (Some(type_hint), None) => Some(type_hint.to_string()),
        (None, Some(marker)) => Some(marker.to_string()),
        (None, None) => None,
    }
}

fn format_parameter(parameter: &DocParameter) -> String {
    let mut line = parameter.name.clone();
    if let Some(inner) = parenthesized(parameter.type_hint.as_deref(), parameter.optionality) {
        line.push_str(&format!(" ({})", inner));
    }
    line.push(':');
    if !parameter.description.is_empty() {
        line.push(' ');
        line.push_str(&parameter.description);
    }
    line
}

fn format_described(head: &str, description: &str) -> String {
    if description.is_empty() {
        format!("{}:", head)
    } else {
        format!("{}: {}", head, description)
    }
}

static ENTRY_PARTS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)(\*{0,2}[A-Za-z_][A-Za-z0-9_]*)\s*(?:\(([^)]*)\))?\s*:(.*)$").unwrap()
});

/// Rewrite the parenthesized part of a parameter entry line. Everything
/// after the colon is kept as is.
fn rewrite_parameter_line<F>(line: &str, rewrite: F) -> Option<String>
where
    F: FnOnce(Option<String>, Optionality) -> (Option<String>, Optionality),
{
    let caps = ENTRY_PARTS_RE.captures(line)?;
    let (type_hint, optionality) = match caps.get(3) {
        Some(inner) => split_optional_marker(inner.as_str()),
        None => (None, Optionality::Unspecified),
    };
    let (type_hint, optionality) = rewrite(type_hint, optionality);
    let parens = parenthesized(type_hint.as_deref(), optionality)
        .map(|inner| format!(" ({})", inner))
        .unwrap_or_default();
    Some(format!(
        "{}{}{}:{}",
        &caps[1],
        &caps[2],
        parens,
        caps.get(4).map_or("", |m| m.as_str())
    ))
}

/// A structural, section-aware docstring buffer
#[derive(Debug, Clone, Default)]
pub struct DocstringEditor {
    nodes: Option<Vec<Node>>,
    /// The loaded text uses `\r\n` line endings
    crlf: bool,
    modified: bool,
}

impl DocstringEditor {
    /// Create an editor with nothing loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor with `text` loaded
    pub fn from_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.load(text);
        editor
    }

    /// Load `text`, discarding any previous buffer and edits
    pub fn load(&mut self, text: &str) {
        self.crlf = text.contains("\r\n");
        self.nodes = Some(classify(text, self.newline()));
        self.modified = false;
    }

    fn newline(&self) -> &'static str {
        if self.crlf {
            "\r\n"
        } else {
            "\n"
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.nodes.is_some()
    }

    /// Whether any operation changed the buffer since it was loaded
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Current text. Empty when nothing is loaded.
    pub fn text(&self) -> String {
        match &self.nodes {
            Some(nodes) => nodes
                .iter()
                .map(Node::line)
                .collect::<Vec<_>>()
                .join(self.newline()),
            None => String::new(),
        }
    }

    /// Add a parameter entry to the args section.
    ///
    /// `order` lists parameter names in signature order; the entry is placed
    /// before the first documented parameter that comes after it there, or at
    /// the end of the section. Nothing happens if the parameter is already
    /// documented.
    pub fn add_parameter(&mut self, parameter: &DocParameter, order: &[String]) {
        let Some(nodes) = self.nodes.as_mut() else {
            return;
        };
        let name = parameter.bare_name();
        let line = format_parameter(parameter);

        let Some(section) = Section::find(nodes, SectionKind::Args) else {
            create_section(nodes, SectionKind::Args, &line);
            tracing::debug!(parameter = name, "created args section");
            self.modified = true;
            return;
        };

        if find_parameter(nodes, name).is_some() {
            return;
        }
        let entries = section.entries(nodes);

        let order_of = |candidate: &str| {
            order
                .iter()
                .position(|n| n.trim_start_matches('*') == candidate)
        };
        let at = order_of(name)
            .and_then(|own| {
                entries.iter().copied().find(|&i| {
                    entry_parameter_name(&nodes[i])
                        .and_then(&order_of)
                        .is_some_and(|other| other > own)
                })
            })
            .unwrap_or_else(|| section.content_end(nodes));

        let prefix = section.entry_prefix(nodes);
        nodes.insert(at, Node::Entry(format!("{}{}", prefix, line)));
        tracing::debug!(parameter = name, line = at, "added parameter entry");
        self.modified = true;
    }

    /// Remove a parameter entry and its continuation lines
    pub fn remove_parameter(&mut self, name: &str) {
        let Some(nodes) = self.nodes.as_mut() else {
            return;
        };
        if let Some(idx) = find_parameter(nodes, name) {
            remove_entry(nodes, idx);
            tracing::debug!(parameter = name, "removed parameter entry");
            self.modified = true;
        }
    }

    /// Replace the documented type of a parameter, keeping any optional marker
    pub fn update_parameter_type(&mut self, name: &str, type_hint: &str) {
        self.rewrite_parameter(name, |_, optionality| {
            (Some(type_hint.to_string()), optionality)
        });
    }

    /// Mark a parameter optional, or drop its optional marker
    pub fn update_parameter_optional(&mut self, name: &str, optional: bool) {
        self.rewrite_parameter(name, |type_hint, _| {
            let optionality = if optional {
                Optionality::Optional
            } else {
                Optionality::Unspecified
            };
            (type_hint, optionality)
        });
    }

    fn rewrite_parameter<F>(&mut self, name: &str, rewrite: F)
    where
        F: FnOnce(Option<String>, Optionality) -> (Option<String>, Optionality),
    {
        let Some(nodes) = self.nodes.as_mut() else {
            return;
        };
        let Some(idx) = find_parameter(nodes, name) else {
            return;
        };
        if let Some(line) = rewrite_parameter_line(nodes[idx].line(), rewrite) {
            tracing::debug!(parameter = name, "rewrote parameter entry");
            nodes[idx] = Node::Entry(line);
            self.modified = true;
        }
    }

    /// Add a returns section unless one exists
    pub fn add_return(&mut self, type_hint: &str, description: &str) {
        let Some(nodes) = self.nodes.as_mut() else {
            return;
        };
        if Section::find(nodes, SectionKind::Returns).is_some() {
            return;
        }
        create_section(
            nodes,
            SectionKind::Returns,
            &format_described(type_hint, description),
        );
        tracing::debug!(type_hint, "added returns section");
        self.modified = true;
    }

    /// Remove the returns section
    pub fn remove_return(&mut self) {
        let Some(nodes) = self.nodes.as_mut() else {
            return;
        };
        if let Some(section) = Section::find(nodes, SectionKind::Returns) {
            remove_section(nodes, section);
            tracing::debug!("removed returns section");
            self.modified = true;
        }
    }

    /// Replace the documented return type, or prefix the description with
    /// one when the section has none
    pub fn update_return_type(&mut self, type_hint: &str) {
        let Some(nodes) = self.nodes.as_mut() else {
            return;
        };
        let Some(section) = Section::find(nodes, SectionKind::Returns) else {
            return;
        };

        match section.entries(nodes).first().copied() {
            Some(idx) => {
                let line = nodes[idx].line();
                let prefix = leading_whitespace(line);
                let rewritten = match return_type_prefix(line) {
                    Some((_, rest)) => format!("{}{}", prefix, format_described(type_hint, rest)),
                    None => format!("{}{}: {}", prefix, type_hint, line.trim()),
                };
                nodes[idx] = Node::Entry(rewritten);
            }
            None => {
                let prefix = section.entry_prefix(nodes);
                nodes.insert(
                    section.header + 1,
                    Node::Entry(format!("{}{}:", prefix, type_hint)),
                );
            }
        }
        tracing::debug!(type_hint, "updated return type");
        self.modified = true;
    }

    /// Turn the returns section into a yields section. When a yields section
    /// already exists the returns section is dropped instead.
    pub fn rename_returns_to_yields(&mut self) {
        let Some(nodes) = self.nodes.as_mut() else {
            return;
        };
        let Some(section) = Section::find(nodes, SectionKind::Returns) else {
            return;
        };

        if Section::find(nodes, SectionKind::Yields).is_some() {
            remove_section(nodes, section);
        } else {
            let prefix = leading_whitespace(nodes[section.header].line()).to_string();
            nodes[section.header] = Node::Header {
                kind: SectionKind::Yields,
                line: format!("{}{}:", prefix, SectionKind::Yields.header()),
            };
        }
        tracing::debug!("replaced returns section with yields");
        self.modified = true;
    }

    /// Add an exception entry unless the exception is already documented
    pub fn add_exception(&mut self, exception: &str, description: &str) {
        let Some(nodes) = self.nodes.as_mut() else {
            return;
        };
        let line = format_described(exception.trim(), description);

        match Section::find(nodes, SectionKind::Raises) {
            Some(section) => {
                if find_exception(nodes, exception).is_some() {
                    return;
                }
                let at = section.content_end(nodes);
                let prefix = section.entry_prefix(nodes);
                nodes.insert(at, Node::Entry(format!("{}{}", prefix, line)));
            }
            None => create_section(nodes, SectionKind::Raises, &line),
        }
        tracing::debug!(exception, "added exception entry");
        self.modified = true;
    }

    /// Remove an exception entry and its continuation lines
    pub fn remove_exception(&mut self, exception: &str) {
        let Some(nodes) = self.nodes.as_mut() else {
            return;
        };
        if let Some(idx) = find_exception(nodes, exception) {
            remove_entry(nodes, idx);
            tracing::debug!(exception, "removed exception entry");
            self.modified = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docstring::google;
    use indoc::indoc;

    const ADD: &str = indoc! {"
        Add two numbers.

        Args:
            x (int): First number

        Returns:
            int: Sum of the numbers"};

    fn param(name: &str, type_hint: &str, description: &str) -> DocParameter {
        DocParameter {
            name: name.to_string(),
            type_hint: Some(type_hint.to_string()),
            description: description.to_string(),
            optionality: Optionality::Unspecified,
        }
    }

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_load_and_render_is_byte_identical() {
        let texts = [
            ADD,
            "",
            "Summary only.\n",
            "  Indented.\n\n    Args:\n        x: value\n    ",
            ":param x: value\r\n:type x: int\r\n",
            "Returns:\n\n\nTrailing blank lines\n\n",
        ];
        for text in texts {
            let editor = DocstringEditor::from_text(text);
            assert_eq!(editor.text(), text);
            assert!(!editor.is_modified());
        }
    }

    #[test]
    fn test_load_is_idempotent_and_resets() {
        let mut editor = DocstringEditor::from_text(ADD);
        editor.remove_parameter("x");
        assert!(editor.is_modified());

        editor.load(ADD);
        editor.load(ADD);
        assert_eq!(editor.text(), ADD);
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_unloaded_editor_ignores_operations() {
        let mut editor = DocstringEditor::new();
        editor.add_parameter(&param("x", "int", ""), &[]);
        editor.add_return("int", "");
        assert!(!editor.is_loaded());
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn test_add_parameter_after_existing_in_code_order() {
        let mut editor = DocstringEditor::from_text(ADD);
        editor.add_parameter(&param("y", "int", "Second number"), &order(&["x", "y"]));

        assert_eq!(
            editor.text(),
            indoc! {"
                Add two numbers.

                Args:
                    x (int): First number
                    y (int): Second number

                Returns:
                    int: Sum of the numbers"}
        );
    }

    #[test]
    fn test_add_parameter_before_later_parameter() {
        let text = "Do it.\n\nArgs:\n    y (int): Second\n    z: Third\n";
        let mut editor = DocstringEditor::from_text(text);
        editor.add_parameter(&param("x", "int", "First"), &order(&["self", "x", "y", "z"]));

        assert_eq!(
            editor.text(),
            "Do it.\n\nArgs:\n    x (int): First\n    y (int): Second\n    z: Third\n"
        );
    }

    #[test]
    fn test_add_existing_parameter_is_noop() {
        let mut editor = DocstringEditor::from_text(ADD);
        editor.add_parameter(&param("x", "str", "Other"), &order(&["x"]));
        assert_eq!(editor.text(), ADD);
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_add_parameter_creates_section_before_returns() {
        let text = "Sum.\n\nReturns:\n    int: s";
        let mut editor = DocstringEditor::from_text(text);
        editor.add_parameter(&param("x", "int", "X"), &order(&["x"]));
        assert_eq!(
            editor.text(),
            "Sum.\n\nArgs:\n    x (int): X\n\nReturns:\n    int: s"
        );

        editor.remove_parameter("x");
        assert_eq!(editor.text(), text);
    }

    #[test]
    fn test_add_parameter_creates_section_at_end() {
        for text in ["Sum.", "Sum.\n"] {
            let mut editor = DocstringEditor::from_text(text);
            editor.add_parameter(&param("x", "int", "X"), &[]);
            assert!(editor.text().starts_with("Sum.\n\nArgs:\n    x (int): X"));

            editor.remove_parameter("x");
            assert_eq!(editor.text(), text);
        }
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let mut editor = DocstringEditor::from_text(ADD);
        editor.add_parameter(&param("y", "int", "Second number"), &order(&["x", "y"]));
        editor.remove_parameter("y");
        assert_eq!(editor.text(), ADD);
    }

    #[test]
    fn test_new_section_follows_existing_indentation() {
        let text = "Sum.\n\n    Returns:\n        int: s\n    ";
        let mut editor = DocstringEditor::from_text(text);
        editor.add_parameter(&param("x", "int", "X"), &[]);
        assert_eq!(
            editor.text(),
            "Sum.\n\n    Args:\n        x (int): X\n\n    Returns:\n        int: s\n    "
        );
    }

    #[test]
    fn test_remove_parameter_with_continuation_lines() {
        let mut editor = DocstringEditor::from_text(indoc! {"
            Fetch.

            Args:
                path (str): Path
                    continued here
                timeout (int, optional): Timeout

            Returns:
                dict: Config
        "});
        editor.remove_parameter("path");

        assert_eq!(
            editor.text(),
            indoc! {"
                Fetch.

                Args:
                    timeout (int, optional): Timeout

                Returns:
                    dict: Config
            "}
        );
    }

    #[test]
    fn test_removing_last_parameter_removes_section() {
        let mut editor =
            DocstringEditor::from_text("Do it.\n\nArgs:\n    x: value\n\nReturns:\n    int: r\n");
        editor.remove_parameter("x");
        assert_eq!(editor.text(), "Do it.\n\nReturns:\n    int: r\n");

        let mut editor = DocstringEditor::from_text("Do it.\n\nArgs:\n    **kwargs: extra\n");
        editor.remove_parameter("kwargs");
        assert_eq!(editor.text(), "Do it.\n");
    }

    #[test]
    fn test_unknown_names_are_noops() {
        let mut editor = DocstringEditor::from_text(ADD);
        editor.remove_parameter("missing");
        editor.update_parameter_type("missing", "str");
        editor.remove_exception("KeyError");
        assert_eq!(editor.text(), ADD);
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_update_parameter_type_and_optional() {
        let mut editor = DocstringEditor::from_text(indoc! {"
            Args:
                items (dict): Items to process
                timeout (int): Timeout
                flag: A flag
                retries (int, optional): Retries
        "});
        editor.update_parameter_type("items", "list");
        editor.update_parameter_optional("timeout", true);
        editor.update_parameter_optional("flag", true);
        editor.update_parameter_optional("retries", false);

        let text = editor.text();
        assert_eq!(
            text,
            indoc! {"
                Args:
                    items (list): Items to process
                    timeout (int, optional): Timeout
                    flag (optional): A flag
                    retries (int): Retries
            "}
        );

        let doc = google::parse(&text);
        assert_eq!(doc.parameters[1].optionality, Optionality::Optional);
        assert_eq!(doc.parameters[1].type_hint.as_deref(), Some("int"));
        assert_eq!(doc.parameters[2].optionality, Optionality::Optional);
        assert_eq!(doc.parameters[3].optionality, Optionality::Unspecified);
    }

    #[test]
    fn test_update_type_keeps_optional_marker() {
        let mut editor = DocstringEditor::from_text("Args:\n    t (int, optional): T");
        editor.update_parameter_type("t", "float");
        assert_eq!(editor.text(), "Args:\n    t (float, optional): T");
    }

    #[test]
    fn test_return_operations() {
        let mut editor = DocstringEditor::from_text("Compute.\n\nRaises:\n    ValueError: bad");
        editor.add_return("int", "The result");
        assert_eq!(
            editor.text(),
            "Compute.\n\nReturns:\n    int: The result\n\nRaises:\n    ValueError: bad"
        );

        editor.add_return("str", "ignored");
        editor.update_return_type("float");
        assert_eq!(
            editor.text(),
            "Compute.\n\nReturns:\n    float: The result\n\nRaises:\n    ValueError: bad"
        );

        editor.remove_return();
        assert_eq!(editor.text(), "Compute.\n\nRaises:\n    ValueError: bad");
    }

    #[test]
    fn test_update_return_type_without_type_prefix() {
        let mut editor = DocstringEditor::from_text("Returns:\n    The computed value");
        editor.update_return_type("int");
        assert_eq!(editor.text(), "Returns:\n    int: The computed value");
    }

    #[test]
    fn test_remove_last_returns_section() {
        let mut editor = DocstringEditor::from_text("Log it.\n\nReturns:\n    bool: Success\n");
        editor.remove_return();
        assert_eq!(editor.text(), "Log it.\n");
    }

    #[test]
    fn test_rename_returns_to_yields() {
        let mut editor = DocstringEditor::from_text(indoc! {"
            Count up.

            Returns:
                Generator[int, None, None]: Numbers
        "});
        editor.rename_returns_to_yields();
        assert_eq!(
            editor.text(),
            "Count up.\n\nYields:\n    Generator[int, None, None]: Numbers\n"
        );

        let doc = google::parse(&editor.text());
        assert!(doc.returns.is_none());
        assert!(doc.yields.is_some());
    }

    #[test]
    fn test_rename_drops_returns_when_yields_exists() {
        let mut editor =
            DocstringEditor::from_text("Gen.\n\nReturns:\n    int: x\n\nYields:\n    int: y");
        editor.rename_returns_to_yields();
        assert_eq!(editor.text(), "Gen.\n\nYields:\n    int: y");
    }

    #[test]
    fn test_exception_operations() {
        let mut editor = DocstringEditor::from_text("Divide.\n\nArgs:\n    a (int): A\n");
        editor.add_exception("ZeroDivisionError", "If b is zero");
        assert_eq!(
            editor.text(),
            "Divide.\n\nArgs:\n    a (int): A\n\nRaises:\n    ZeroDivisionError: If b is zero\n"
        );

        editor.add_exception("TypeError", "");
        editor.add_exception("builtins.ZeroDivisionError", "duplicate");
        assert_eq!(
            editor.text(),
            "Divide.\n\nArgs:\n    a (int): A\n\nRaises:\n    ZeroDivisionError: If b is zero\n    TypeError:\n"
        );

        editor.remove_exception("zerodivisionerror");
        editor.remove_exception("TypeError");
        assert_eq!(editor.text(), "Divide.\n\nArgs:\n    a (int): A\n");
    }

    #[test]
    fn test_directive_text_gets_new_section_only() {
        let text = ":param x: value\n:type x: int";
        let mut editor = DocstringEditor::from_text(text);
        editor.remove_parameter("x");
        assert_eq!(editor.text(), text);

        editor.add_exception("ValueError", "bad");
        assert_eq!(editor.text(), format!("{}\n\nRaises:\n    ValueError: bad", text));
    }

    #[test]
    fn test_keyword_args_section_entries() {
        let text = "Connect.\n\nArgs:\n    host (str): Host\n\nKeyword Args:\n    port (str): Port\n    old (int): Legacy\n";
        let mut editor = DocstringEditor::from_text(text);

        editor.update_parameter_type("port", "int");
        editor.remove_parameter("old");
        editor.add_parameter(&param("port", "int", ""), &order(&["host", "port"]));
        assert_eq!(
            editor.text(),
            "Connect.\n\nArgs:\n    host (str): Host\n\nKeyword Args:\n    port (int): Port\n"
        );

        editor.remove_parameter("port");
        assert_eq!(editor.text(), "Connect.\n\nArgs:\n    host (str): Host\n");
    }

    #[test]
    fn test_entries_named_like_headers_stay_entries() {
        let mut editor = DocstringEditor::from_text("Log.\n\nArgs:\n    message (str): Text\n");
        let names = order(&["message", "note", "level"]);
        editor.add_parameter(&DocParameter::new("note"), &names);
        editor.add_parameter(&DocParameter::new("level"), &names);

        let fixed = editor.text();
        assert_eq!(fixed, "Log.\n\nArgs:\n    message (str): Text\n    note:\n    level:\n");

        let documented: Vec<String> = google::parse(&fixed)
            .parameters
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(documented, names);

        let mut reloaded = DocstringEditor::from_text(&fixed);
        reloaded.add_parameter(&DocParameter::new("note"), &names);
        reloaded.remove_parameter("note");
        assert_eq!(reloaded.text(), "Log.\n\nArgs:\n    message (str): Text\n    level:\n");
    }

    #[test]
    fn test_crlf_line_endings_are_kept() {
        let text = "Add.\r\n\r\nArgs:\r\n    x (int): X\r\n\r\nReturns:\r\n    int: Sum\r\n";
        let mut editor = DocstringEditor::from_text(text);
        assert_eq!(editor.text(), text);

        editor.add_parameter(&param("y", "int", ""), &order(&["x", "y"]));
        editor.add_exception("ValueError", "");
        assert_eq!(
            editor.text(),
            "Add.\r\n\r\nArgs:\r\n    x (int): X\r\n    y (int):\r\n\r\nReturns:\r\n    int: Sum\r\n\r\nRaises:\r\n    ValueError:\r\n"
        );
    }
}
