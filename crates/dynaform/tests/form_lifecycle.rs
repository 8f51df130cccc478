/// End-to-end behaviour of a configured form: compile, bind, edit, submit.
///
/// Each test builds its configuration the way a host would, from TOML, and
/// drives the controller only through its public operations.
use dynaform::{
    compile, dispatch, submit, FieldBuilder, FieldValue, FormConfiguration, FormController,
    FormPhase, FormView, Render, SchemaCache, SubmissionRecord, SubmitOutcome,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::convert::Infallible;
use std::sync::Arc;

const PERSON: &str = r#"
    [[fields]]
    type = "text"
    name = "firstName"
    label = "First Name"
    gridLayout = "grid-1"
    validations = [{ type = "required" }, { type = "minLength", value = 2 }]

    [[fields]]
    type = "number"
    name = "age"
    label = "Age"
    gridLayout = "grid-2"
    validations = [{ type = "required" }]

    [[fields]]
    type = "text"
    name = "nickname"
    label = "Nickname"
"#;

fn person_form() -> FormController {
    let config = Arc::new(FormConfiguration::from_toml_str(PERSON).unwrap());
    FormController::from_config(config, &mut SchemaCache::new()).unwrap()
}

fn collect(form: &mut FormController) -> (SubmitOutcome, Vec<SubmissionRecord>) {
    let mut records = Vec::new();
    let outcome = submit(form, |record| {
        records.push(record);
        Ok::<_, Infallible>(())
    })
    .unwrap();
    (outcome, records)
}

#[test]
fn test_round_trip_submission() {
    let mut form = person_form();
    form.set_value("firstName", "Al");
    form.set_value("age", "30");

    let (outcome, records) = collect(&mut form);

    assert_eq!(outcome, SubmitOutcome::Submitted);
    assert_eq!(form.phase(), FormPhase::Valid);
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].to_json(),
        serde_json::json!({"firstName": "Al", "age": "30"})
    );
}

#[test]
fn test_rejected_submission_reports_both_fields() {
    let mut form = person_form();
    form.set_value("firstName", "A");
    form.set_value("age", "");

    let (outcome, records) = collect(&mut form);

    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert!(records.is_empty());
    assert_eq!(form.phase(), FormPhase::Invalid);

    let errors = form.errors();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors["firstName"], "Must be at least 2 characters long.");
    assert_eq!(errors["age"], "This field is required.");
}

#[test]
fn test_editing_one_field_leaves_others_alone() {
    let mut form = person_form();
    form.set_value("firstName", "Alice");
    form.validate();
    assert_eq!(form.error("firstName"), None);
    assert_eq!(form.error("age"), Some("This field is required."));

    form.set_value("age", "41");
    form.validate();
    assert_eq!(form.error("firstName"), None);
    assert!(!form.has_errors());
}

#[rstest]
#[case("")]
#[case("x")]
#[case("a very long nickname indeed")]
fn test_unvalidated_field_never_errors(#[case] nickname: &str) {
    let mut form = person_form();
    form.set_value("nickname", nickname);
    form.validate();
    assert!(!form.errors().contains_key("nickname"));
}

#[test]
fn test_added_select_field_required() {
    let mut config = FormConfiguration::from_toml_str(PERSON).unwrap();
    config
        .push(
            FieldBuilder::new("gender", "select")
                .option("male")
                .option("female")
                .required()
                .build()
                .unwrap(),
        )
        .unwrap();

    let schema = Arc::new(compile(&config).unwrap());
    let mut form = FormController::new(Arc::new(config), schema);
    form.set_value("firstName", "Al");
    form.set_value("age", "30");

    let (outcome, _) = collect(&mut form);
    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert_eq!(form.error("gender"), Some("This field is required."));

    for option in ["male", "female"] {
        let field = form.config().field("gender").unwrap().clone();
        let control = dispatch(&field, form.value("gender"), form.error("gender")).unwrap();
        form.apply(control.choose(option).unwrap());

        let (outcome, records) = collect(&mut form);
        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert_eq!(records[0].get("gender"), Some(&FieldValue::from(option)));
    }
}

#[test]
fn test_compile_twice_is_equal() {
    let config = FormConfiguration::from_toml_str(PERSON).unwrap();
    assert_eq!(compile(&config).unwrap(), compile(&config).unwrap());
}

#[test]
fn test_rendered_form_shows_inline_errors() {
    let mut form = person_form();
    form.set_value("firstName", "A");
    form.validate();

    let html = FormView::new(&form).action("/").render().into_string();
    assert!(html.contains("Must be at least 2 characters long."));
    assert!(html.contains("This field is required."));
    assert!(html.contains(r#"class="mb-3 grid-1""#));
    assert!(html.contains(r#"value="A""#));
}

#[test]
fn test_fresh_controller_per_instance() {
    let config = Arc::new(FormConfiguration::from_toml_str(PERSON).unwrap());
    let mut cache = SchemaCache::new();
    let mut a = FormController::from_config(Arc::clone(&config), &mut cache).unwrap();
    let b = FormController::from_config(Arc::clone(&config), &mut cache).unwrap();

    a.set_value("firstName", "Al");
    a.validate();

    assert!(Arc::ptr_eq(a.schema(), b.schema()));
    assert!(b.values().is_empty());
    assert!(b.errors().is_empty());
    assert_eq!(b.phase(), FormPhase::Idle);
}
