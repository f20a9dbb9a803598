//! Directive docstring parser
//!
//! Parses docstrings built from reST field lists:
//!
//! ```text
//! Summary line.
//!
//! :param name: Name of the person
//! :type name: str
//! :param greeting: Greeting message
//! :type greeting: str, optional
//! :returns: Formatted greeting
//! :rtype: str
//! :raises ValueError: If name is empty
//! ```

use super::grammar::{directive_line, strip_optional_word, Directive};
use super::{append_text, DocDescriptor, DocException, DocParameter, DocReturns, Optionality};

/// Which record non-directive lines currently continue
#[derive(Debug, Clone, Copy)]
enum Continuation {
    Summary,
    Parameter(usize),
    Returns,
    Yields,
    Raises(usize),
    Note,
    Ignored,
}

/// Parameter records merged from `:param:` and `:type:` lines
#[derive(Default)]
struct ParameterTable {
    entries: Vec<DocParameter>,
    /// Whether a `:param:` line has been seen for the entry at the same index
    described: Vec<bool>,
}

impl ParameterTable {
    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|p| p.name == name)
    }

    fn push(&mut self, name: &str, described: bool) -> usize {
        self.entries.push(DocParameter::new(name));
        self.described.push(described);
        self.entries.len() - 1
    }

    /// Entry for a `:param NAME:` line. A name already described by an
    /// earlier `:param:` gets a second entry; lookups keep using the first.
    fn for_param(&mut self, name: &str) -> usize {
        match self.position(name) {
            Some(idx) if !self.described[idx] => {
                self.described[idx] = true;
                idx
            }
            _ => self.push(name, true),
        }
    }

    /// Entry for a `:type NAME:` line, created if no `:param:` came first
    fn for_type(&mut self, name: &str) -> usize {
        match self.position(name) {
            Some(idx) => idx,
            None => self.push(name, false),
        }
    }

    fn apply_type(&mut self, idx: usize, type_text: &str) {
        let (type_hint, optionality) = strip_optional_word(type_text);
        let entry = &mut self.entries[idx];
        if type_hint.is_some() {
            entry.type_hint = type_hint;
        }
        if optionality != Optionality::Unspecified {
            entry.optionality = optionality;
        }
    }
}

/// Parse a directive docstring
pub fn parse(text: &str) -> DocDescriptor {
    let mut doc = DocDescriptor::default();
    let mut summary = String::new();
    let mut parameters = ParameterTable::default();
    let mut returns_text: Option<String> = None;
    let mut returns_type: Option<String> = None;
    let mut yields_text: Option<String> = None;
    let mut yields_type: Option<String> = None;
    let mut notes: Option<String> = None;
    let mut current = Continuation::Summary;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix(".. note::") {
            append_text(notes.get_or_insert_with(String::new), rest);
            current = Continuation::Note;
            continue;
        }

        let Some(field) = directive_line(line) else {
            if trimmed.is_empty() {
                continue;
            }
            match current {
                Continuation::Summary => {
                    if !summary.is_empty() {
                        summary.push('\n');
                    }
                    summary.push_str(trimmed);
                }
                Continuation::Parameter(idx) => {
                    append_text(&mut parameters.entries[idx].description, trimmed)
                }
                Continuation::Returns => {
                    append_text(returns_text.get_or_insert_with(String::new), trimmed)
                }
                Continuation::Yields => {
                    append_text(yields_text.get_or_insert_with(String::new), trimmed)
                }
                Continuation::Raises(idx) => {
                    append_text(&mut doc.raises[idx].description, trimmed)
                }
                Continuation::Note => append_text(notes.get_or_insert_with(String::new), trimmed),
                Continuation::Ignored => {}
            }
            continue;
        };

        current = match field.directive {
            Directive::Param => match field.argument.as_deref() {
                Some(argument) => {
                    // `:param int count:` carries the type before the name
                    let (type_text, name) = match argument.rsplit_once(char::is_whitespace) {
                        Some((type_text, name)) => (Some(type_text.trim()), name),
                        None => (None, argument),
                    };
                    let idx = parameters.for_param(name);
                    append_text(&mut parameters.entries[idx].description, &field.text);
                    if let Some(type_text) = type_text {
                        parameters.apply_type(idx, type_text);
                    }
                    Continuation::Parameter(idx)
                }
                None => Continuation::Ignored,
            },
            Directive::Type => {
                if let Some(name) = field.argument.as_deref() {
                    let idx = parameters.for_type(name);
                    parameters.apply_type(idx, &field.text);
                }
                Continuation::Ignored
            }
            Directive::Returns => {
                append_text(returns_text.get_or_insert_with(String::new), &field.text);
                Continuation::Returns
            }
            Directive::ReturnType => {
                if !field.text.is_empty() {
                    returns_type = Some(field.text.clone());
                }
                Continuation::Ignored
            }
            Directive::Yields => {
                append_text(yields_text.get_or_insert_with(String::new), &field.text);
                Continuation::Yields
            }
            Directive::YieldType => {
                if !field.text.is_empty() {
                    yields_type = Some(field.text.clone());
                }
                Continuation::Ignored
            }
            Directive::Raises => match field.argument.as_deref() {
                Some(argument) => {
                    let before = doc.raises.len();
                    for exception in argument.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                        doc.raises.push(DocException {
                            exception: exception.to_string(),
                            description: field.text.clone(),
                        });
                    }
                    if doc.raises.len() == before {
                        Continuation::Ignored
                    } else {
                        Continuation::Raises(doc.raises.len() - 1)
                    }
                }
                None => Continuation::Ignored,
            },
            Directive::Note => {
                append_text(notes.get_or_insert_with(String::new), &field.text);
                Continuation::Note
            }
            Directive::Other(_) => Continuation::Ignored,
        };
    }

    doc.summary = if summary.is_empty() { None } else { Some(summary) };
    doc.parameters = parameters.entries;
    doc.returns = merge_returns(returns_text, returns_type);
    doc.yields = merge_returns(yields_text, yields_type);
    doc.notes = notes.filter(|n| !n.is_empty());
    doc
}

/// A returns record exists if either the description or the type was given
fn merge_returns(text: Option<String>, type_hint: Option<String>) -> Option<DocReturns> {
    if text.is_none() && type_hint.is_none() {
        return None;
    }
    Some(DocReturns {
        type_hint,
        description: text.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_parse_params_types_and_returns() {
        let doc = parse(indoc! {"
            Greet a person.

            :param name: Name of the person
            :type name: str
            :param greeting: Greeting message
                that spans two lines
            :type greeting: str, optional
            :returns: Formatted greeting
            :rtype: str
        "});

        assert_eq!(doc.summary.as_deref(), Some("Greet a person."));
        assert_eq!(doc.parameters.len(), 2);
        assert_eq!(doc.parameters[0].type_hint.as_deref(), Some("str"));
        assert_eq!(doc.parameters[0].optionality, Optionality::Unspecified);
        assert_eq!(doc.parameters[1].type_hint.as_deref(), Some("str"));
        assert_eq!(doc.parameters[1].optionality, Optionality::Optional);
        assert_eq!(
            doc.parameters[1].description,
            "Greeting message that spans two lines"
        );

        let returns = doc.returns.unwrap();
        assert_eq!(returns.type_hint.as_deref(), Some("str"));
        assert_eq!(returns.description, "Formatted greeting");
    }

    #[test]
    fn test_type_before_param_and_lone_type() {
        let doc = parse(indoc! {"
            :type x: int
            :param x: First
            :type z: optional float
        "});

        assert_eq!(doc.parameters.len(), 2);
        assert_eq!(doc.parameters[0].name, "x");
        assert_eq!(doc.parameters[0].type_hint.as_deref(), Some("int"));
        assert_eq!(doc.parameters[0].description, "First");
        assert_eq!(doc.parameters[1].name, "z");
        assert_eq!(doc.parameters[1].type_hint.as_deref(), Some("float"));
        assert_eq!(doc.parameters[1].optionality, Optionality::Optional);
        assert!(doc.parameters[1].description.is_empty());
    }

    #[test]
    fn test_aliases_raises_and_notes() {
        let doc = parse(indoc! {"
            Process input data.

            :parameter data: Input data
            :return: Processed result
            :raise ValueError: If data is empty
            :raises: missing exception name
            :notes: This function modifies the input
                data in-place
        "});

        assert_eq!(doc.parameters[0].name, "data");
        assert_eq!(doc.returns.unwrap().type_hint, None);
        assert_eq!(doc.raises.len(), 1);
        assert_eq!(doc.raises[0].exception, "ValueError");
        assert_eq!(
            doc.notes.as_deref(),
            Some("This function modifies the input data in-place")
        );
    }

    #[test]
    fn test_rtype_alone_creates_returns() {
        let doc = parse(":rtype: dict or None");
        let returns = doc.returns.unwrap();
        assert_eq!(returns.type_hint.as_deref(), Some("dict or None"));
        assert!(returns.description.is_empty());
    }

    #[test]
    fn test_typed_param_form_and_yields() {
        let doc = parse(indoc! {"
            :param int start: Starting number
            :yields: Numbers in the range
            :ytype: int
        "});

        assert_eq!(doc.parameters[0].name, "start");
        assert_eq!(doc.parameters[0].type_hint.as_deref(), Some("int"));
        assert!(doc.returns.is_none());
        let yields = doc.yields.unwrap();
        assert_eq!(yields.type_hint.as_deref(), Some("int"));
        assert_eq!(yields.description, "Numbers in the range");
    }

    #[test]
    fn test_duplicate_param_keeps_both_entries() {
        let doc = parse(":param x: first\n:param x: second\n:type x: int");
        assert_eq!(doc.parameters.len(), 2);
        assert_eq!(doc.parameter("x").unwrap().description, "first");
        assert_eq!(doc.parameter("x").unwrap().type_hint.as_deref(), Some("int"));
    }

    #[test]
    fn test_raises_without_names_drops_continuation() {
        let doc = parse(indoc! {"
            :raises ValueError: bad input
            :raises ,: stray
                continued text
        "});

        assert_eq!(doc.raises.len(), 1);
        assert_eq!(doc.raises[0].exception, "ValueError");
        assert_eq!(doc.raises[0].description, "bad input");
    }

    #[test]
    fn test_minimal_docstring() {
        let doc = parse("A minimal docstring without any Sphinx directives.");
        assert!(doc.parameters.is_empty());
        assert!(doc.returns.is_none());
        assert_eq!(
            doc.summary.as_deref(),
            Some("A minimal docstring without any Sphinx directives.")
        );
    }
}
