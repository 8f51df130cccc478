// File: src/control.rs
// Purpose: Bind field definitions to interactive controls and render them with Maud

use maud::{html, Markup, Render};

use crate::field::{FieldDefinition, FieldKind};
use crate::state::{FormController, ValueChange};
use crate::value::{FieldValue, FileRef};

/// HTML input type of a free-entry control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Number => "number",
        }
    }
}

/// One entry of a select or radio group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Element id; only radio entries have their own
    pub id: Option<String>,
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// The interactive part of a control
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Input {
        kind: InputKind,
        value: String,
    },
    Select {
        choices: Vec<Choice>,
    },
    Radio {
        choices: Vec<Choice>,
    },
    Checkbox {
        checked: bool,
    },
    File {
        file: Option<FileRef>,
    },
    Slider {
        value: String,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
}

/// A field bound to its current value and error
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    /// Field the control writes back to
    pub name: String,
    /// Element id the label points at
    pub id: String,
    pub label: String,
    pub layout_hint: String,
    pub error: Option<String>,
    pub widget: Widget,
}

impl Control {
    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    /// Message reporting a new value for the bound field
    pub fn change(&self, value: impl Into<FieldValue>) -> ValueChange {
        ValueChange::new(self.name.clone(), value)
    }

    /// Change message selecting one entry of a select or radio group.
    /// `None` if `value` is not one of the control's choices.
    pub fn choose(&self, value: &str) -> Option<ValueChange> {
        self.choices()
            .iter()
            .find(|choice| choice.value == value)
            .map(|choice| self.change(choice.value.as_str()))
    }

    pub fn choices(&self) -> &[Choice] {
        match &self.widget {
            Widget::Select { choices } | Widget::Radio { choices } => choices.as_slice(),
            _ => &[],
        }
    }

    fn feedback(&self) -> Markup {
        html! {
            @if let Some(error) = &self.error {
                div.invalid-feedback { (error) }
            }
        }
    }
}

fn choices(field: &FieldDefinition, current: &str, with_ids: bool) -> Vec<Choice> {
    field
        .options()
        .iter()
        .map(|option| Choice {
            id: with_ids.then(|| field.option_id(&option.value)),
            value: option.value.clone(),
            label: option.label.clone(),
            selected: option.value == current,
        })
        .collect()
}

/// Bind a field to a control.
///
/// Unsupported field types produce no control.
pub fn dispatch(field: &FieldDefinition, value: &FieldValue, error: Option<&str>) -> Option<Control> {
    let widget = match &field.kind {
        FieldKind::Text => Widget::Input {
            kind: InputKind::Text,
            value: value.display().to_string(),
        },
        FieldKind::Number => Widget::Input {
            kind: InputKind::Number,
            value: value.display().to_string(),
        },
        FieldKind::Select { .. } => Widget::Select {
            choices: choices(field, value.display(), false),
        },
        FieldKind::Radio { .. } => Widget::Radio {
            choices: choices(field, value.display(), true),
        },
        FieldKind::Checkbox => Widget::Checkbox {
            checked: value.is_checked(),
        },
        FieldKind::File => Widget::File {
            file: match value {
                FieldValue::File(file) => Some(file.clone()),
                _ => None,
            },
        },
        FieldKind::Slider { min, max, step } => Widget::Slider {
            value: value.display().to_string(),
            min: *min,
            max: *max,
            step: *step,
        },
        FieldKind::Unsupported => {
            tracing::trace!(field = %field.name, "no control for unsupported field type");
            return None;
        }
    };

    Some(Control {
        name: field.name.clone(),
        id: field.name.clone(),
        label: field.label.clone(),
        layout_hint: field.layout_hint.clone(),
        error: error.map(str::to_string),
        widget,
    })
}

impl Render for Control {
    fn render(&self) -> Markup {
        let invalid = self.is_invalid();

        html! {
            div class={ "mb-3 " (self.layout_hint) } data-field=(self.name) {
                @match &self.widget {
                    Widget::Input { kind, value } => {
                        label.form-label for=(self.id) { (self.label) }
                        input.form-control.is-invalid[invalid]
                            type=(kind.as_str()) id=(self.id) name=(self.name) value=(value);
                    }
                    Widget::Select { choices } => {
                        label.form-label for=(self.id) { (self.label) }
                        select.form-select.is-invalid[invalid] id=(self.id) name=(self.name) {
                            @if !choices.iter().any(|c| c.selected) {
                                option value="" selected { "" }
                            }
                            @for choice in choices {
                                option value=(choice.value) selected[choice.selected] { (choice.label) }
                            }
                        }
                    }
                    Widget::Radio { choices } => {
                        label.form-label { (self.label) }
                        div {
                            @for choice in choices {
                                @let id = choice.id.as_deref().unwrap_or(self.id.as_str());
                                div.form-check {
                                    input.form-check-input.is-invalid[invalid]
                                        type="radio" id=(id) name=(self.name) value=(choice.value)
                                        checked[choice.selected];
                                    label.form-check-label for=(id) { (choice.label) }
                                }
                            }
                        }
                    }
                    Widget::Checkbox { checked } => {
                        div.form-check {
                            input.form-check-input.is-invalid[invalid]
                                type="checkbox" id=(self.id) name=(self.name) value="true"
                                checked[*checked];
                            label.form-check-label for=(self.id) { (self.label) }
                        }
                    }
                    Widget::File { file } => {
                        label.form-label for=(self.id) { (self.label) }
                        input.form-control.is-invalid[invalid] type="file" id=(self.id) name=(self.name);
                        @if let Some(file) = file {
                            div.form-text { (file.name) }
                        }
                    }
                    Widget::Slider { value, min, max, step } => {
                        label.form-label for=(self.id) { (self.label) }
                        input.form-range.is-invalid[invalid]
                            type="range" id=(self.id) name=(self.name) value=(value)
                            min=[min] max=[max] step=[step];
                    }
                }
                (self.feedback())
            }
        }
    }
}

/// Whole form: every bound control in configuration order plus a submit button
pub struct FormView<'a> {
    pub controller: &'a FormController,
    pub action: &'a str,
    pub submit_label: &'a str,
}

impl<'a> FormView<'a> {
    pub fn new(controller: &'a FormController) -> Self {
        Self {
            controller,
            action: "",
            submit_label: "Submit",
        }
    }

    pub fn action(mut self, action: &'a str) -> Self {
        self.action = action;
        self
    }

    pub fn submit_label(mut self, label: &'a str) -> Self {
        self.submit_label = label;
        self
    }

    /// Bound controls for the controller's current state
    pub fn controls(&self) -> Vec<Control> {
        let form = self.controller;
        form.config()
            .fields()
            .iter()
            .filter_map(|field| dispatch(field, form.value(&field.name), form.error(&field.name)))
            .collect()
    }
}

impl Render for FormView<'_> {
    fn render(&self) -> Markup {
        html! {
            div.form-container {
                form.needs-validation method="post" action=(self.action) novalidate {
                    @for control in self.controls() {
                        (control)
                    }
                    button.btn.btn-primary type="submit" { (self.submit_label) }
                }
            }
        }
    }
}
