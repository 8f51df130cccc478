//! Field definitions and the form configuration that orders them.
//!
//! A configuration is the only input the core needs. It is usually written
//! by the authoring collaborator or loaded from a TOML/JSON file:
//!
//! ```toml
//! [[fields]]
//! type = "text"
//! name = "firstName"
//! label = "First Name"
//! layoutHint = "grid-1"
//! validations = [{ type = "required" }, { type = "minLength", value = 2 }]
//!
//! [[fields]]
//! type = "select"
//! name = "gender"
//! label = "Gender"
//! options = [{ value = "male", label = "Male" }, { value = "female", label = "Female" }]
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::rule::ValidationRule;

/// One selectable entry of a select or radio field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The type of a field, carrying only the attributes that type needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Select {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    Radio {
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    Checkbox,
    File,
    Slider {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    /// A type token this version cannot render. The field is kept but
    /// produces no control and no validator chain.
    #[serde(other)]
    Unsupported,
}

impl FieldKind {
    /// Options for choice fields, empty for everything else
    pub fn options(&self) -> &[FieldOption] {
        match self {
            FieldKind::Select { options } | FieldKind::Radio { options } => options.as_slice(),
            _ => &[],
        }
    }

    pub fn requires_options(&self) -> bool {
        matches!(self, FieldKind::Select { .. } | FieldKind::Radio { .. })
    }

    /// Fields whose value is a quantity rather than free text
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Number | FieldKind::Slider { .. })
    }

    pub fn token(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Select { .. } => "select",
            FieldKind::Radio { .. } => "radio",
            FieldKind::Checkbox => "checkbox",
            FieldKind::File => "file",
            FieldKind::Slider { .. } => "slider",
            FieldKind::Unsupported => "unsupported",
        }
    }
}

/// A named, typed description of one form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub label: String,
    /// Grouping token for the styling layer; never interpreted here
    #[serde(default, alias = "gridLayout")]
    pub layout_hint: String,
    #[serde(default)]
    pub validations: Vec<ValidationRule>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            layout_hint: String::new(),
            validations: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_layout_hint(mut self, hint: impl Into<String>) -> Self {
        self.layout_hint = hint.into();
        self
    }

    pub fn with_rule(mut self, rule: impl Into<ValidationRule>) -> Self {
        self.validations.push(rule.into());
        self
    }

    pub fn options(&self) -> &[FieldOption] {
        self.kind.options()
    }

    /// Element id of one radio option. Whitespace in the value becomes `_`.
    pub fn option_id(&self, value: &str) -> String {
        let value: String = value
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        format!("{}-{}", self.name, value)
    }

    /// Ids of the elements this field renders
    pub fn element_ids(&self) -> Vec<String> {
        match &self.kind {
            FieldKind::Radio { options } => options.iter().map(|o| self.option_id(&o.value)).collect(),
            FieldKind::Unsupported => Vec::new(),
            _ => vec![self.name.clone()],
        }
    }

    /// Check the invariants a single field must hold on its own
    fn check_shape(&self, index: usize) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName { index });
        }

        if self.kind.requires_options() {
            let options = self.kind.options();
            if options.is_empty() {
                return Err(ConfigError::MissingOptions {
                    name: self.name.clone(),
                });
            }

            let mut seen = HashSet::new();
            for option in options {
                if option.value.is_empty() {
                    return Err(ConfigError::EmptyOptionValue {
                        name: self.name.clone(),
                    });
                }
                if !seen.insert(option.value.as_str()) {
                    return Err(ConfigError::DuplicateOption {
                        name: self.name.clone(),
                        value: option.value.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Every rendered element id must be unique across the form
fn check_element_ids<'a>(fields: impl IntoIterator<Item = &'a FieldDefinition>) -> Result<()> {
    let mut ids = HashSet::new();
    for field in fields {
        for id in field.element_ids() {
            if !ids.insert(id.clone()) {
                return Err(ConfigError::DuplicateElementId {
                    name: field.name.clone(),
                    id,
                });
            }
        }
    }
    Ok(())
}

/// Ordered field definitions; order is render order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FormConfiguration {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self {
            title: None,
            fields,
        }
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reject configurations that cannot produce a working form
    pub fn check(&self) -> Result<()> {
        let mut names = HashSet::new();
        for (index, field) in self.fields.iter().enumerate() {
            field.check_shape(index)?;
            if !names.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateFieldName {
                    name: field.name.clone(),
                });
            }
        }
        check_element_ids(&self.fields)
    }

    /// Append a field, keeping names unique
    pub fn push(&mut self, field: FieldDefinition) -> Result<()> {
        field.check_shape(self.fields.len())?;
        if self.contains(&field.name) {
            return Err(ConfigError::DuplicateFieldName { name: field.name });
        }
        check_element_ids(self.fields.iter().chain(std::iter::once(&field)))?;
        tracing::debug!(field = %field.name, kind = field.kind.token(), "field added");
        self.fields.push(field);
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: FormConfiguration =
            toml::from_str(content).context("Failed to parse form configuration as TOML")?;
        config.check()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let config: FormConfiguration = serde_json::from_str(content)
            .context("Failed to parse form configuration as JSON")?;
        config.check()?;
        Ok(config)
    }

    /// Load a configuration file; `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read form configuration: {:?}", path))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };

        config.with_context(|| format!("Invalid form configuration: {:?}", path))
    }
}

impl From<Vec<FieldDefinition>> for FormConfiguration {
    fn from(fields: Vec<FieldDefinition>) -> Self {
        Self::new(fields)
    }
}
