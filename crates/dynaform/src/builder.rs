//! Field authoring helper.
//!
//! Produces [`FieldDefinition`] values the way an "add a field" screen does:
//! a name, a type token picked from a list, a few ticked rules and, for
//! selects, options typed one at a time.
//!
//! ```
//! use dynaform::FieldBuilder;
//!
//! let field = FieldBuilder::new("nickname", "text")
//!     .required()
//!     .max_length(12)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(field.label, "Nickname Field");
//! assert_eq!(field.layout_hint, "grid-2");
//! ```

use crate::error::{ConfigError, Result};
use crate::field::{FieldDefinition, FieldKind, FieldOption};
use crate::rule::ValidationRule;

const DEFAULT_LAYOUT_HINT: &str = "grid-2";

pub struct FieldBuilder {
    name: String,
    type_token: String,
    label: Option<String>,
    layout_hint: String,
    rules: Vec<ValidationRule>,
    options: Vec<FieldOption>,
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>, type_token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_token: type_token.into(),
            label: None,
            layout_hint: DEFAULT_LAYOUT_HINT.to_string(),
            rules: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn layout_hint(mut self, hint: impl Into<String>) -> Self {
        self.layout_hint = hint.into();
        self
    }

    pub fn rule(mut self, rule: impl Into<ValidationRule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    pub fn required(self) -> Self {
        self.rule(ValidationRule::required())
    }

    pub fn min_length(self, n: usize) -> Self {
        self.rule(ValidationRule::min_length(n))
    }

    pub fn max_length(self, n: usize) -> Self {
        self.rule(ValidationRule::max_length(n))
    }

    pub fn email(self) -> Self {
        self.rule(ValidationRule::email())
    }

    pub fn min(self, value: f64) -> Self {
        self.rule(ValidationRule::min(value))
    }

    pub fn max(self, value: f64) -> Self {
        self.rule(ValidationRule::max(value))
    }

    /// Add a select option; the value doubles as its label. Blank input is
    /// ignored.
    pub fn option(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.options.push(FieldOption::new(value.clone(), value));
        }
        self
    }

    pub fn build(self) -> Result<FieldDefinition> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingName);
        }
        if self.type_token.trim().is_empty() {
            return Err(ConfigError::MissingType { name: self.name });
        }

        let mut rules = self.rules;
        let kind = match self.type_token.trim().to_ascii_lowercase().as_str() {
            "text" => FieldKind::Text,
            "number" => FieldKind::Number,
            "select" => FieldKind::Select {
                options: self.options,
            },
            "radio" => FieldKind::Radio {
                options: vec![FieldOption::new("yes", "Yes"), FieldOption::new("no", "No")],
            },
            "checkbox" => FieldKind::Checkbox,
            "file" => FieldKind::File,
            "slider" => FieldKind::Slider {
                min: None,
                max: None,
                step: None,
            },
            "email" => {
                rules.push(ValidationRule::email());
                FieldKind::Text
            }
            other => {
                tracing::warn!(field = %self.name, kind = other, "unsupported field type");
                FieldKind::Unsupported
            }
        };

        let label = self
            .label
            .unwrap_or_else(|| format!("{} Field", capitalize(&self.name)));

        Ok(FieldDefinition {
            name: self.name,
            kind,
            label,
            layout_hint: self.layout_hint,
            validations: rules,
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FormConfiguration;
    use crate::rule::RuleKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let field = FieldBuilder::new("age", "number").build().unwrap();
        assert_eq!(field.kind, FieldKind::Number);
        assert_eq!(field.label, "Age Field");
        assert_eq!(field.layout_hint, "grid-2");
        assert!(field.validations.is_empty());
    }

    #[test]
    fn test_radio_gets_yes_no() {
        let field = FieldBuilder::new("newsletter", "radio").build().unwrap();
        let values: Vec<_> = field.options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["yes", "no"]);
    }

    #[test]
    fn test_select_collects_options() {
        let field = FieldBuilder::new("colour", "select")
            .option("red")
            .option("")
            .option("blue")
            .required()
            .build()
            .unwrap();

        assert_eq!(
            field.options(),
            &[FieldOption::new("red", "red"), FieldOption::new("blue", "blue")]
        );
        assert_eq!(field.validations, vec![ValidationRule::required()]);
    }

    #[test]
    fn test_email_type_adds_email_rule() {
        let field = FieldBuilder::new("contact", "email").required().build().unwrap();
        assert_eq!(field.kind, FieldKind::Text);
        let kinds: Vec<_> = field.validations.iter().map(|r| r.kind.clone()).collect();
        assert_eq!(kinds, vec![RuleKind::Required, RuleKind::Email]);
    }

    #[test]
    fn test_missing_name_or_type() {
        assert_eq!(
            FieldBuilder::new(" ", "text").build().unwrap_err(),
            ConfigError::MissingName
        );
        assert_eq!(
            FieldBuilder::new("x", "").build().unwrap_err(),
            ConfigError::MissingType { name: "x".into() }
        );
    }

    #[test]
    fn test_empty_select_is_caught_when_added() {
        let field = FieldBuilder::new("colour", "select").build().unwrap();
        let mut config = FormConfiguration::default();
        assert_eq!(
            config.push(field),
            Err(ConfigError::MissingOptions {
                name: "colour".into()
            })
        );
    }
}
