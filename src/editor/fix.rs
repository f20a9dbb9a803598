//! Suggested fixes
//!
//! A [`Fix`] records the docstring edit that resolves one mismatch. Applying
//! it drives a [`DocstringEditor`].

use super::DocstringEditor;
use crate::docstring::DocParameter;
use serde::Serialize;

/// One docstring edit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Fix {
    AddParameter {
        parameter: DocParameter,
        /// Parameter names in signature order
        order: Vec<String>,
    },
    RemoveParameter {
        name: String,
    },
    UpdateParameterType {
        name: String,
        type_hint: String,
    },
    UpdateParameterOptional {
        name: String,
        optional: bool,
    },
    AddReturn {
        type_hint: String,
    },
    RemoveReturn,
    UpdateReturnType {
        type_hint: String,
    },
    UseYields,
    AddException {
        exception: String,
    },
    RemoveException {
        exception: String,
    },
}

impl Fix {
    /// Short title for listing the fix
    pub fn title(&self) -> String {
        match self {
            Fix::AddParameter { parameter, .. } => {
                format!("Add parameter '{}' to docstring", parameter.name)
            }
            Fix::RemoveParameter { name } => {
                format!("Remove parameter '{}' from docstring", name)
            }
            Fix::UpdateParameterType { name, type_hint } => {
                format!("Change type of '{}' to '{}'", name, type_hint)
            }
            Fix::UpdateParameterOptional {
                name,
                optional: true,
            } => format!("Mark '{}' as optional", name),
            Fix::UpdateParameterOptional {
                name,
                optional: false,
            } => format!("Remove optional marker from '{}'", name),
            Fix::AddReturn { type_hint } => format!("Document return value of type '{}'", type_hint),
            Fix::RemoveReturn => "Remove Returns section".to_string(),
            Fix::UpdateReturnType { type_hint } => format!("Change return type to '{}'", type_hint),
            Fix::UseYields => "Replace Returns with Yields".to_string(),
            Fix::AddException { exception } => format!("Document exception '{}'", exception),
            Fix::RemoveException { exception } => {
                format!("Remove exception '{}' from docstring", exception)
            }
        }
    }

    /// Perform the edit on a loaded editor
    pub fn apply(&self, editor: &mut DocstringEditor) {
        match self {
            Fix::AddParameter { parameter, order } => editor.add_parameter(parameter, order),
            Fix::RemoveParameter { name } => editor.remove_parameter(name),
            Fix::UpdateParameterType { name, type_hint } => {
                editor.update_parameter_type(name, type_hint)
            }
            Fix::UpdateParameterOptional { name, optional } => {
                editor.update_parameter_optional(name, *optional)
            }
            Fix::AddReturn { type_hint } => editor.add_return(type_hint, ""),
            Fix::RemoveReturn => editor.remove_return(),
            Fix::UpdateReturnType { type_hint } => editor.update_return_type(type_hint),
            Fix::UseYields => editor.rename_returns_to_yields(),
            Fix::AddException { exception } => editor.add_exception(exception, ""),
            Fix::RemoveException { exception } => editor.remove_exception(exception),
        }
    }
}

/// Apply every fix in order to `text` and return the edited docstring
pub fn apply_all<'a, I>(text: &str, fixes: I) -> String
where
    I: IntoIterator<Item = &'a Fix>,
{
    let mut editor = DocstringEditor::from_text(text);
    for fix in fixes {
        fix.apply(&mut editor);
    }
    editor.text()
}
