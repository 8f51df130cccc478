// File: src/pages.rs
// Purpose: Page shells around the rendered form

use dynaform::{FormController, FormView, SubmissionRecord};
use maud::{html, Markup, DOCTYPE};

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href=(BOOTSTRAP_CSS);
            }
            body {
                div.container.mt-5 {
                    h1.text-center { (title) }
                    (body)
                }
            }
        }
    }
}

pub fn form_page(title: &str, form: &FormController, action: &str, submit_label: &str) -> Markup {
    let view = FormView::new(form).action(action).submit_label(submit_label);
    layout(title, html! { (view) })
}

pub fn submitted_page(title: &str, record: &SubmissionRecord) -> Markup {
    let json = serde_json::to_string_pretty(&record.to_json()).unwrap_or_default();
    layout(
        title,
        html! {
            div.alert.alert-success role="alert" { "Form submitted successfully!" }
            pre { code { (json) } }
            a.btn.btn-secondary href="/" { "Back" }
        },
    )
}
