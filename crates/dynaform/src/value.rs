// File: src/value.rs
// Purpose: Raw field values as held by the form state

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::field::FieldKind;

/// Opaque reference to a file picked in a file control.
///
/// The contents are never read; the reference is carried through to the
/// submission record as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl FileRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            content_type: None,
        }
    }
}

/// Current value of one field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Never touched, or absent from a submission
    #[default]
    Empty,
    Checked(bool),
    Text(String),
    File(FileRef),
}

impl FieldValue {
    /// True for values a `required` rule rejects
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Checked(checked) => !checked,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::File(file) => file.name.is_empty(),
        }
    }

    /// Text seen by the rule validators. `None` means nothing was supplied.
    pub fn as_submitted(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Empty | FieldValue::Checked(false) => None,
            FieldValue::Checked(true) => Some(Cow::Borrowed("true")),
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            FieldValue::File(file) => Some(Cow::Borrowed(file.name.as_str())),
        }
    }

    /// Text to show inside a control
    pub fn display(&self) -> &str {
        match self {
            FieldValue::Text(s) => s.as_str(),
            FieldValue::File(file) => file.name.as_str(),
            FieldValue::Empty | FieldValue::Checked(_) => "",
        }
    }

    pub fn is_checked(&self) -> bool {
        match self {
            FieldValue::Checked(checked) => *checked,
            FieldValue::Text(s) => matches!(s.as_str(), "true" | "on" | "yes" | "1"),
            _ => false,
        }
    }

    /// Decode a raw value posted by an HTML form for a field of `kind`.
    ///
    /// Browsers omit unchecked checkboxes entirely, so a missing checkbox
    /// value means unchecked rather than untouched.
    pub fn from_submitted(kind: &FieldKind, raw: Option<&str>) -> Self {
        match (kind, raw) {
            (FieldKind::Checkbox, raw) => {
                let checked = raw.is_some_and(|r| !matches!(r, "" | "false" | "off"));
                FieldValue::Checked(checked)
            }
            (_, None) => FieldValue::Empty,
            (FieldKind::File, Some("")) => FieldValue::Empty,
            (FieldKind::File, Some(name)) => FieldValue::File(FileRef::new(name)),
            (_, Some(text)) => FieldValue::Text(text.to_string()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Checked(b)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<FileRef> for FieldValue {
    fn from(file: FileRef) -> Self {
        FieldValue::File(file)
    }
}
