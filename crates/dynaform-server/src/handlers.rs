// File: src/handlers.rs
// Purpose: HTTP routes - render the configured form and run submissions

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Form, Router,
};
use dynaform::{
    submit, Config, FieldKind, FieldValue, FormConfiguration, FormController, SchemaCache,
    SubmissionRecord, SubmitOutcome, ValidationSchema,
};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::pages;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    form: Arc<FormConfiguration>,
    schema: Arc<ValidationSchema>,
    settings: Arc<Config>,
}

impl AppState {
    pub fn new(form: FormConfiguration, settings: Config) -> dynaform::Result<Self> {
        let form = Arc::new(form);
        let schema = SchemaCache::new().get_or_compile(&form)?;
        Ok(Self {
            form,
            schema,
            settings: Arc::new(settings),
        })
    }

    /// Each request gets its own form state
    fn controller(&self) -> FormController {
        FormController::new(Arc::clone(&self.form), Arc::clone(&self.schema))
    }

    fn title(&self) -> &str {
        self.form
            .title
            .as_deref()
            .unwrap_or(self.settings.form.title.as_str())
    }

    fn render_form(&self, form: &FormController) -> Html<String> {
        let settings = &self.settings.form;
        Html(pages::form_page(self.title(), form, &settings.action, &settings.submit_label).into_string())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit_form))
        .route("/config.json", get(show_config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn show_form(State(state): State<AppState>) -> Html<String> {
    state.render_form(&state.controller())
}

async fn show_config(State(state): State<AppState>) -> Json<FormConfiguration> {
    Json(state.form.as_ref().clone())
}

async fn submit_form(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let mut form = state.controller();

    for field in state.form.fields() {
        let raw = pairs
            .iter()
            .find(|(name, _)| name == &field.name)
            .map(|(_, value)| value.as_str());

        // Missing keys are untouched fields, except checkboxes which the
        // browser leaves out when unchecked
        if raw.is_none() && field.kind != FieldKind::Checkbox {
            continue;
        }
        form.set_value(field.name.clone(), FieldValue::from_submitted(&field.kind, raw));
    }

    let mut accepted: Option<SubmissionRecord> = None;
    let outcome = match submit(&mut form, |record| {
        tracing::info!(record = %record.to_json(), "form submitted");
        accepted = Some(record);
        Ok::<_, Infallible>(())
    }) {
        Ok(outcome) => outcome,
        Err(never) => match never {},
    };

    match (outcome, accepted) {
        (SubmitOutcome::Submitted, Some(record)) => {
            Html(pages::submitted_page(state.title(), &record).into_string()).into_response()
        }
        (SubmitOutcome::Rejected, _) => {
            tracing::info!(errors = ?form.errors(), "submission rejected");
            (StatusCode::UNPROCESSABLE_ENTITY, state.render_form(&form)).into_response()
        }
        _ => state.render_form(&form).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use pretty_assertions::assert_eq;

    const FORM: &str = r#"
        title = "Sign up"

        [[fields]]
        type = "text"
        name = "firstName"
        label = "First Name"
        layoutHint = "grid-1"
        validations = [{ type = "required" }, { type = "minLength", value = 2 }]

        [[fields]]
        type = "checkbox"
        name = "terms"
        label = "I agree"
        validations = [{ type = "required" }]

        [[fields]]
        type = "file"
        name = "resume"
        label = "Upload Resume"
    "#;

    fn server() -> TestServer {
        let form = FormConfiguration::from_toml_str(FORM).unwrap();
        let state = AppState::new(form, Config::default()).unwrap();
        TestServer::new(router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_get_renders_form() {
        let response = server().get("/").await;
        response.assert_status_ok();

        let body = response.text();
        assert!(body.contains("<h1 class=\"text-center\">Sign up</h1>"));
        assert!(body.contains(r#"for="firstName""#));
        assert!(body.contains(r#"type="checkbox""#));
        assert!(!body.contains("invalid-feedback"));
    }

    #[tokio::test]
    async fn test_invalid_post_rerenders_with_errors() {
        let response = server().post("/").form(&[("firstName", "A")]).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body = response.text();
        assert!(body.contains("Must be at least 2 characters long."));
        assert!(body.contains("This field is required."));
        assert!(body.contains(r#"value="A""#));
    }

    #[tokio::test]
    async fn test_valid_post_shows_record() {
        let response = server()
            .post("/")
            .form(&[("firstName", "Al"), ("terms", "true"), ("resume", "cv.pdf"), ("extra", "x")])
            .await;
        response.assert_status_ok();

        let body = response.text();
        assert!(body.contains("Form submitted successfully!"));
        assert!(body.contains("cv.pdf"));
        assert!(!body.contains("extra"));
    }

    #[tokio::test]
    async fn test_config_json() {
        let response = server().get("/config.json").await;
        response.assert_status_ok();

        let config: FormConfiguration = response.json();
        assert_eq!(config.len(), 3);
        assert_eq!(config.fields()[0].name, "firstName");
    }
}
