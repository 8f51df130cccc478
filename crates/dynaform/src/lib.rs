// Dynaform - declarative forms
// Field configurations compiled into validation schemas and bound controls

pub mod builder;
pub mod config;
pub mod control;
pub mod error;
pub mod field;
pub mod rule;
pub mod schema;
pub mod state;
pub mod submit;
pub mod value;

// Re-export the core API so hosts can just `use dynaform::*`
pub use builder::FieldBuilder;
pub use config::Config;
pub use control::{dispatch, Choice, Control, FormView, InputKind, Widget};
pub use error::{ConfigError, Result};
pub use field::{FieldDefinition, FieldKind, FieldOption, FormConfiguration};
pub use rule::{RuleKind, ValidationRule};
pub use schema::{compile, Check, SchemaCache, ValidationSchema, Validator, ValidatorChain};
pub use state::{
    FormController, FormEvent, FormPhase, FormState, PendingValidation, ValidationOutcome,
    ValueChange,
};
pub use submit::{submit, SubmissionRecord, SubmitOutcome};
pub use value::{FieldValue, FileRef};

// Re-export Maud for hosts that embed controls in their own pages
pub use maud::{html, Markup, PreEscaped, Render, DOCTYPE};
