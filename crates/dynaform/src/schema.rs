// File: src/schema.rs
// Purpose: Compile a form configuration into per-field validator chains

use std::collections::HashMap;
use std::sync::Arc;

use dynaform_validation::{
    validate_email, validate_max, validate_max_length, validate_min, validate_min_length,
    validate_required,
};

use crate::error::Result;
use crate::field::FormConfiguration;
use crate::rule::{RuleKind, ValidationRule};
use crate::value::FieldValue;

/// A compiled assertion. Each variant is a pure predicate over a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Email,
    Min(f64),
    Max(f64),
}

impl Check {
    /// `Err` carries the default message for the failure
    fn run(&self, value: &FieldValue) -> std::result::Result<(), String> {
        let submitted = value.as_submitted();

        if let Check::Required = self {
            return validate_required(submitted.as_deref());
        }

        // Everything below only constrains values that were supplied
        let Some(text) = submitted else {
            return Ok(());
        };

        match self {
            Check::Required => Ok(()),
            Check::MinLength(min) => validate_min_length(&text, *min),
            Check::MaxLength(max) => validate_max_length(&text, *max),
            Check::Email => validate_email(&text),
            Check::Min(_) | Check::Max(_) if text.is_empty() => Ok(()),
            Check::Min(min) => validate_min(&text, *min),
            Check::Max(max) => validate_max(&text, *max),
        }
    }
}

/// Predicate plus the message reported when it fails
#[derive(Debug, Clone, PartialEq)]
pub struct Validator {
    pub check: Check,
    pub message: Option<String>,
}

impl Validator {
    /// `None` for rule kinds with no compiled form
    fn from_rule(rule: &ValidationRule) -> Option<Self> {
        let check = match rule.kind {
            RuleKind::Required => Check::Required,
            RuleKind::MinLength { value } => Check::MinLength(value),
            RuleKind::MaxLength { value } => Check::MaxLength(value),
            RuleKind::Email => Check::Email,
            RuleKind::Min { value } => Check::Min(value),
            RuleKind::Max { value } => Check::Max(value),
            RuleKind::Unknown => return None,
        };

        Some(Self {
            check,
            message: rule.message.clone(),
        })
    }

    /// Error message if `value` fails this validator
    pub fn evaluate(&self, value: &FieldValue) -> Option<String> {
        self.check
            .run(value)
            .err()
            .map(|default| self.message.clone().unwrap_or(default))
    }
}

/// Validators of one field, evaluated in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatorChain {
    validators: Vec<Validator>,
}

impl ValidatorChain {
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Message of the first failing validator; later ones are not run
    pub fn first_failure(&self, value: &FieldValue) -> Option<String> {
        self.validators.iter().find_map(|v| v.evaluate(value))
    }
}

/// Field name to validator chain, in configuration order.
///
/// Fields without rules are absent and always valid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationSchema {
    chains: Vec<(String, ValidatorChain)>,
}

impl ValidationSchema {
    pub fn get(&self, name: &str) -> Option<&ValidatorChain> {
        self.chains
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, chain)| chain)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidatorChain)> {
        self.chains.iter().map(|(name, chain)| (name.as_str(), chain))
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Run every chain against `values`, collecting the first failure per
    /// field. Fields missing from `values` are checked as empty.
    pub fn evaluate(&self, values: &HashMap<String, FieldValue>) -> HashMap<String, String> {
        let empty = FieldValue::Empty;
        self.iter()
            .filter_map(|(name, chain)| {
                let value = values.get(name).unwrap_or(&empty);
                chain
                    .first_failure(value)
                    .map(|message| (name.to_string(), message))
            })
            .collect()
    }
}

/// Compile a configuration into its validation schema.
///
/// Malformed configurations are rejected; unknown rule kinds are skipped.
pub fn compile(config: &FormConfiguration) -> Result<ValidationSchema> {
    config.check()?;

    let mut chains = Vec::new();
    for field in config.fields() {
        if field.validations.is_empty() {
            continue;
        }

        let mut validators = Vec::with_capacity(field.validations.len());
        for rule in &field.validations {
            match Validator::from_rule(rule) {
                Some(validator) => {
                    if rule.kind.is_length() && field.kind.is_numeric() {
                        tracing::warn!(
                            field = %field.name,
                            rule = rule.kind.token(),
                            "length rule on a numeric field counts characters; use min/max for numeric bounds"
                        );
                    }
                    validators.push(validator);
                }
                None => {
                    tracing::warn!(field = %field.name, "skipping unrecognised validation rule");
                }
            }
        }

        chains.push((field.name.clone(), ValidatorChain { validators }));
    }

    tracing::debug!(fields = config.len(), validated = chains.len(), "compiled validation schema");

    Ok(ValidationSchema { chains })
}

/// Holds the schema of the most recently compiled configuration.
///
/// The cache is keyed by configuration identity: handing in the same `Arc`
/// returns the cached schema, any other configuration is recompiled.
#[derive(Debug, Default)]
pub struct SchemaCache {
    slot: Option<(Arc<FormConfiguration>, Arc<ValidationSchema>)>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(&mut self, config: &Arc<FormConfiguration>) -> Result<Arc<ValidationSchema>> {
        if let Some((cached, schema)) = &self.slot {
            if Arc::ptr_eq(cached, config) {
                return Ok(Arc::clone(schema));
            }
        }

        let schema = Arc::new(compile(config)?);
        self.slot = Some((Arc::clone(config), Arc::clone(&schema)));
        Ok(schema)
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDefinition, FieldKind, FieldOption};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn sample_config() -> FormConfiguration {
        FormConfiguration::new(vec![
            FieldDefinition::new("firstName", FieldKind::Text)
                .with_rule(ValidationRule::required())
                .with_rule(ValidationRule::min_length(2)),
            FieldDefinition::new("resume", FieldKind::File),
            FieldDefinition::new("age", FieldKind::Number).with_rule(ValidationRule::required()),
        ])
    }

    #[test]
    fn test_compile_skips_unvalidated_fields() {
        let schema = compile(&sample_config()).unwrap();

        assert_eq!(schema.len(), 2);
        assert!(schema.contains("firstName"));
        assert!(schema.contains("age"));
        assert!(!schema.contains("resume"));
        assert_eq!(schema.get("firstName").unwrap().len(), 2);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let config = sample_config();
        assert_eq!(compile(&config).unwrap(), compile(&config.clone()).unwrap());
    }

    #[test]
    fn test_unknown_rules_are_skipped() {
        let config = FormConfiguration::new(vec![FieldDefinition::new("nick", FieldKind::Text)
            .with_rule(RuleKind::Unknown)
            .with_rule(ValidationRule::max_length(3))]);

        let chain = compile(&config).unwrap().get("nick").cloned().unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.validators()[0].check, Check::MaxLength(3));
    }

    #[test]
    fn test_compile_rejects_bad_configuration() {
        let config = FormConfiguration::new(vec![FieldDefinition::new(
            "gender",
            FieldKind::Radio { options: vec![] },
        )]);
        assert!(compile(&config).is_err());
    }

    #[test]
    fn test_short_circuit_reports_first_failure() {
        let chain = ValidatorChain {
            validators: vec![
                Validator::from_rule(&ValidationRule::min_length(5)).unwrap(),
                Validator::from_rule(&ValidationRule::email()).unwrap(),
            ],
        };

        assert_eq!(
            chain.first_failure(&FieldValue::from("ab")).as_deref(),
            Some("Must be at least 5 characters long.")
        );
        assert_eq!(
            chain.first_failure(&FieldValue::from("abcdef")).as_deref(),
            Some("Invalid email address.")
        );
        assert_eq!(chain.first_failure(&FieldValue::from("al@example.com")), None);
    }

    #[test]
    fn test_custom_message_wins() {
        let validator =
            Validator::from_rule(&ValidationRule::required().with_message("Tell us your name")).unwrap();
        assert_eq!(
            validator.evaluate(&FieldValue::Empty).as_deref(),
            Some("Tell us your name")
        );
    }

    #[rstest]
    #[case(Check::Required, FieldValue::Empty, false)]
    #[case(Check::Required, FieldValue::from(""), false)]
    #[case(Check::Required, FieldValue::from(false), false)]
    #[case(Check::Required, FieldValue::from(true), true)]
    #[case(Check::MinLength(2), FieldValue::Empty, true)]
    #[case(Check::MinLength(2), FieldValue::from(""), false)]
    #[case(Check::MinLength(2), FieldValue::from("Al"), true)]
    #[case(Check::MaxLength(2), FieldValue::from("Ala"), false)]
    #[case(Check::Email, FieldValue::from(""), true)]
    #[case(Check::Email, FieldValue::from("not-an-email"), false)]
    #[case(Check::Min(18.0), FieldValue::from(""), true)]
    #[case(Check::Min(18.0), FieldValue::from("17"), false)]
    #[case(Check::Min(18.0), FieldValue::from("thirty"), false)]
    #[case(Check::Max(10.0), FieldValue::from("7"), true)]
    fn test_check_semantics(#[case] check: Check, #[case] value: FieldValue, #[case] ok: bool) {
        assert_eq!(check.run(&value).is_ok(), ok);
    }

    #[test]
    fn test_evaluate_treats_missing_values_as_empty() {
        let schema = compile(&sample_config()).unwrap();
        let errors = schema.evaluate(&HashMap::new());

        assert_eq!(errors.get("firstName").map(String::as_str), Some("This field is required."));
        assert_eq!(errors.get("age").map(String::as_str), Some("This field is required."));
        assert!(!errors.contains_key("resume"));
    }

    #[test]
    fn test_select_required() {
        let config = FormConfiguration::new(vec![FieldDefinition::new(
            "gender",
            FieldKind::Select {
                options: vec![FieldOption::new("male", "Male"), FieldOption::new("female", "Female")],
            },
        )
        .with_rule(ValidationRule::required())]);
        let schema = compile(&config).unwrap();

        let mut values = HashMap::new();
        assert!(schema.evaluate(&values).contains_key("gender"));

        values.insert("gender".to_string(), FieldValue::from("female"));
        assert!(schema.evaluate(&values).is_empty());
    }

    #[test]
    fn test_cache_is_keyed_by_identity() {
        let mut cache = SchemaCache::new();
        let config = Arc::new(sample_config());

        let first = cache.get_or_compile(&config).unwrap();
        let again = cache.get_or_compile(&config).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        // Equal content, different identity
        let copy = Arc::new(sample_config());
        let recompiled = cache.get_or_compile(&copy).unwrap();
        assert!(!Arc::ptr_eq(&first, &recompiled));
        assert_eq!(*first, *recompiled);
    }
}
