//! Submission pipeline.
//!
//! `submit` always validates first. A valid form produces a
//! [`SubmissionRecord`] that is handed to the host's handler exactly once;
//! an invalid form reports nothing beyond the controller's error map.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::state::{FormController, FormPhase};
use crate::value::FieldValue;

/// Immutable snapshot of validated field values
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SubmissionRecord {
    values: BTreeMap<String, FieldValue>,
}

impl SubmissionRecord {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.values).unwrap_or(serde_json::Value::Null)
    }

    pub fn into_inner(self) -> BTreeMap<String, FieldValue> {
        self.values
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for SubmissionRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// What happened to a submit intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation passed and the handler received the record
    Submitted,
    /// Validation failed; errors are on the controller
    Rejected,
    /// Another validation pass was still held by its caller
    Ignored,
}

/// Validate the form and, when valid, hand a record to `on_success`.
///
/// Errors returned by `on_success` are passed back untouched.
pub fn submit<F, E>(controller: &mut FormController, on_success: F) -> Result<SubmitOutcome, E>
where
    F: FnOnce(SubmissionRecord) -> Result<(), E>,
{
    if controller.validation_in_flight() {
        tracing::debug!("submit ignored while a validation is pending");
        return Ok(SubmitOutcome::Ignored);
    }
    if controller.phase() == FormPhase::Validating {
        tracing::debug!("superseding an abandoned validation pass");
    }

    controller.rearm();

    if !controller.validate().is_valid() {
        tracing::debug!(errors = controller.errors().len(), "submission rejected");
        return Ok(SubmitOutcome::Rejected);
    }

    let config = controller.config();
    let record: SubmissionRecord = controller
        .values()
        .iter()
        .filter(|(name, _)| config.contains(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    tracing::debug!(fields = record.len(), "submitting record");
    on_success(record)?;
    controller.notify_submitted();

    Ok(SubmitOutcome::Submitted)
}
