// File: src/state.rs
// Purpose: Form state controller - values, errors and the validation lifecycle

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;

use crate::error::Result;
use crate::field::FormConfiguration;
use crate::schema::{SchemaCache, ValidationSchema};
use crate::value::FieldValue;

/// Capacity of the per-controller event channel
const EVENT_CAPACITY: usize = 64;

/// Lifecycle of one form instance.
///
/// Editing a field while `Invalid` clears that field's error but keeps the
/// phase; only the next validation pass or a reset leaves `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    #[default]
    Idle,
    Validating,
    Valid,
    Invalid,
}

impl std::fmt::Display for FormPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormPhase::Idle => write!(f, "idle"),
            FormPhase::Validating => write!(f, "validating"),
            FormPhase::Valid => write!(f, "valid"),
            FormPhase::Invalid => write!(f, "invalid"),
        }
    }
}

/// Result of one validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid,
}

impl ValidationOutcome {
    pub fn is_valid(self) -> bool {
        self == ValidationOutcome::Valid
    }
}

/// A control reporting a new value for the field it is bound to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueChange {
    pub name: String,
    pub value: FieldValue,
}

impl ValueChange {
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Notifications for the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    ValueChanged { name: String },
    ErrorsChanged { errors: HashMap<String, String> },
    PhaseChanged(FormPhase),
    /// A record was handed to the submit handler
    Submitted,
}

/// Values, errors and phase of one form instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: HashMap<String, FieldValue>,
    errors: HashMap<String, String>,
    phase: FormPhase,
}

impl FormState {
    pub fn values(&self) -> &HashMap<String, FieldValue> {
        &self.values
    }

    pub fn errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }
}

/// Snapshot taken when a validation pass starts.
///
/// Committing it is refused once the values it was taken from have moved on.
/// While it is alive the controller counts the pass as in flight; dropping it
/// without a commit abandons the pass.
#[derive(Debug)]
pub struct PendingValidation {
    revision: u64,
    values: HashMap<String, FieldValue>,
    _live: Arc<()>,
}

impl PendingValidation {
    pub fn values(&self) -> &HashMap<String, FieldValue> {
        &self.values
    }
}

/// Owns the state of one form and runs its validation schema.
pub struct FormController {
    config: Arc<FormConfiguration>,
    schema: Arc<ValidationSchema>,
    state: FormState,
    /// Bumped on every value change and every new validation pass
    revision: u64,
    /// Liveness of the most recent pass
    in_flight: Weak<()>,
    events: broadcast::Sender<FormEvent>,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("fields", &self.config.len())
            .field("phase", &self.state.phase)
            .field("revision", &self.revision)
            .finish()
    }
}

impl FormController {
    /// Create a controller for an already compiled schema
    pub fn new(config: Arc<FormConfiguration>, schema: Arc<ValidationSchema>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            schema,
            state: FormState::default(),
            revision: 0,
            in_flight: Weak::new(),
            events,
        }
    }

    /// Create a controller, reusing the cached schema when `config` is the
    /// configuration the cache last compiled.
    pub fn from_config(config: Arc<FormConfiguration>, cache: &mut SchemaCache) -> Result<Self> {
        let schema = cache.get_or_compile(&config)?;
        Ok(Self::new(config, schema))
    }

    pub fn config(&self) -> &Arc<FormConfiguration> {
        &self.config
    }

    pub fn schema(&self) -> &Arc<ValidationSchema> {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn phase(&self) -> FormPhase {
        self.state.phase
    }

    pub fn values(&self) -> &HashMap<String, FieldValue> {
        &self.state.values
    }

    /// Current value of `name`, `Empty` if never set
    pub fn value(&self, name: &str) -> &FieldValue {
        static EMPTY: FieldValue = FieldValue::Empty;
        self.state.values.get(name).unwrap_or(&EMPTY)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.state.errors.get(name).map(String::as_str)
    }

    /// Snapshot of the current errors
    pub fn errors(&self) -> HashMap<String, String> {
        self.state.errors.clone()
    }

    pub fn has_errors(&self) -> bool {
        !self.state.errors.is_empty()
    }

    /// Receive value, error and phase notifications
    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: FormEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn set_phase(&mut self, phase: FormPhase) {
        if self.state.phase != phase {
            tracing::trace!(from = %self.state.phase, to = %phase, "form phase");
            self.state.phase = phase;
            self.emit(FormEvent::PhaseChanged(phase));
        }
    }

    /// Write a field value.
    ///
    /// While the form is invalid, the error of the changed field is cleared
    /// at once; other fields keep theirs until the next validation pass. A
    /// validation in flight is superseded and the form returns to idle.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        self.state.values.insert(name.clone(), value.into());
        self.revision += 1;

        self.emit(FormEvent::ValueChanged { name: name.clone() });

        match self.state.phase {
            FormPhase::Invalid => {
                if self.state.errors.remove(&name).is_some() {
                    self.emit(FormEvent::ErrorsChanged {
                        errors: self.state.errors.clone(),
                    });
                }
            }
            FormPhase::Validating => self.set_phase(FormPhase::Idle),
            FormPhase::Idle | FormPhase::Valid => {}
        }
    }

    /// Consume a change message from a bound control
    pub fn apply(&mut self, change: ValueChange) {
        self.set_value(change.name, change.value);
    }

    /// Start a validation pass over a snapshot of the current values.
    ///
    /// Starting a new pass supersedes any pass still pending.
    pub fn begin_validation(&mut self) -> PendingValidation {
        self.revision += 1;
        self.set_phase(FormPhase::Validating);

        let live = Arc::new(());
        self.in_flight = Arc::downgrade(&live);
        PendingValidation {
            revision: self.revision,
            values: self.state.values.clone(),
            _live: live,
        }
    }

    /// Whether a pass is validating and its snapshot is still held.
    pub fn validation_in_flight(&self) -> bool {
        self.state.phase == FormPhase::Validating && self.in_flight.strong_count() > 0
    }

    /// Abandon a pass without recording anything. The form returns to idle
    /// if `pending` was the current pass.
    pub fn cancel(&mut self, pending: PendingValidation) {
        if pending.revision == self.revision && self.state.phase == FormPhase::Validating {
            tracing::debug!(revision = pending.revision, "validation cancelled");
            self.set_phase(FormPhase::Idle);
        }
    }

    /// Evaluate the schema against a pending snapshot
    pub fn evaluate(&self, pending: &PendingValidation) -> HashMap<String, String> {
        self.schema.evaluate(&pending.values)
    }

    /// Apply a finished pass. Returns `None` and leaves state untouched when
    /// the values changed since `pending` was taken.
    pub fn commit(
        &mut self,
        pending: PendingValidation,
        errors: HashMap<String, String>,
    ) -> Option<ValidationOutcome> {
        if pending.revision != self.revision {
            tracing::debug!(
                pending = pending.revision,
                current = self.revision,
                "discarding stale validation result"
            );
            return None;
        }

        let outcome = if errors.is_empty() {
            ValidationOutcome::Valid
        } else {
            ValidationOutcome::Invalid
        };

        tracing::debug!(errors = errors.len(), ?outcome, "validation finished");

        if self.state.errors != errors {
            self.state.errors = errors;
            self.emit(FormEvent::ErrorsChanged {
                errors: self.state.errors.clone(),
            });
        }

        self.set_phase(match outcome {
            ValidationOutcome::Valid => FormPhase::Valid,
            ValidationOutcome::Invalid => FormPhase::Invalid,
        });

        Some(outcome)
    }

    /// Run the schema against the current values and record the errors
    pub fn validate(&mut self) -> ValidationOutcome {
        let pending = self.begin_validation();
        let errors = self.evaluate(&pending);
        // Nothing can change the values between these calls
        self.commit(pending, errors)
            .unwrap_or(ValidationOutcome::Invalid)
    }

    /// Leave the valid state ahead of a new submission
    pub(crate) fn rearm(&mut self) {
        if self.state.phase == FormPhase::Valid {
            self.set_phase(FormPhase::Idle);
        }
    }

    pub(crate) fn notify_submitted(&self) {
        self.emit(FormEvent::Submitted);
    }

    /// Clear values and errors and return to idle
    pub fn reset(&mut self) {
        self.state.values.clear();
        self.revision += 1;
        if !self.state.errors.is_empty() {
            self.state.errors.clear();
            self.emit(FormEvent::ErrorsChanged {
                errors: HashMap::new(),
            });
        }
        self.set_phase(FormPhase::Idle);
    }
}
