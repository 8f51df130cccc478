//! Validation rules as authored in a field configuration.
//!
//! A rule is serialized the way the authoring collaborator writes it:
//! `{ "type": "minLength", "value": 2, "message": "Too short" }`. The
//! `value` of a length rule may arrive as a number or a numeric string.

use serde::{Deserialize, Deserializer, Serialize};

/// The constraint a rule asserts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength {
        #[serde(deserialize_with = "count_param")]
        value: usize,
    },
    MaxLength {
        #[serde(deserialize_with = "count_param")]
        value: usize,
    },
    Email,
    /// Numeric lower bound, for number and slider fields
    Min {
        #[serde(deserialize_with = "number_param")]
        value: f64,
    },
    /// Numeric upper bound, for number and slider fields
    Max {
        #[serde(deserialize_with = "number_param")]
        value: f64,
    },
    /// Any rule token this version does not know. Skipped when compiling.
    #[serde(other)]
    Unknown,
}

impl RuleKind {
    /// Camel-case token used in configurations
    pub fn token(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MinLength { .. } => "minLength",
            RuleKind::MaxLength { .. } => "maxLength",
            RuleKind::Email => "email",
            RuleKind::Min { .. } => "min",
            RuleKind::Max { .. } => "max",
            RuleKind::Unknown => "unknown",
        }
    }

    pub fn is_length(&self) -> bool {
        matches!(self, RuleKind::MinLength { .. } | RuleKind::MaxLength { .. })
    }
}

/// A single named constraint with an optional custom failure message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(flatten)]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Replace the default failure message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn required() -> Self {
        Self::new(RuleKind::Required)
    }

    pub fn min_length(value: usize) -> Self {
        Self::new(RuleKind::MinLength { value })
    }

    pub fn max_length(value: usize) -> Self {
        Self::new(RuleKind::MaxLength { value })
    }

    pub fn email() -> Self {
        Self::new(RuleKind::Email)
    }

    pub fn min(value: f64) -> Self {
        Self::new(RuleKind::Min { value })
    }

    pub fn max(value: f64) -> Self {
        Self::new(RuleKind::Max { value })
    }
}

impl From<RuleKind> for ValidationRule {
    fn from(kind: RuleKind) -> Self {
        Self::new(kind)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Unsigned(u64),
    Float(f64),
    Text(String),
}

fn count_param<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Unsigned(n) => usize::try_from(n).map_err(D::Error::custom),
        NumberOrText::Float(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as usize),
        NumberOrText::Float(f) => Err(D::Error::custom(format!("invalid length: {}", f))),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<usize>()
            .map_err(|_| D::Error::custom(format!("invalid length: {:?}", s))),
    }
}

fn number_param<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Unsigned(n) => Ok(n as f64),
        NumberOrText::Float(f) => Ok(f),
        NumberOrText::Text(s) => dynaform_validation::parse_number(&s)
            .ok_or_else(|| D::Error::custom(format!("invalid number: {:?}", s))),
    }
}
