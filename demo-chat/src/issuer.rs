//! Stand-in identity issuer for the local demo.
//!
//! The real deployment delegates `/authorize` and credential collection to
//! an external issuer, which calls the completion entry point with a
//! verified email. This stub skips verification entirely and treats any
//! submitted email as verified; do not deploy it.

use askama::Template;
use axum::{
    Router,
    extract::{Form, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::get,
};
use serde::Deserialize;

use chat_gate_axum::{GateState, complete_authentication_response};

#[derive(Template)]
#[template(path = "authorize.j2")]
struct AuthorizeTemplate;

#[derive(Deserialize)]
struct AuthorizeForm {
    email: String,
}

pub(crate) fn router(state: GateState) -> Router {
    Router::new()
        .route("/authorize", get(authorize_form).post(authorize_submit))
        .with_state(state)
}

async fn authorize_form() -> Result<Html<String>, (StatusCode, String)> {
    let template = AuthorizeTemplate;
    let html = template
        .render()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Html(html))
}

async fn authorize_submit(
    State(state): State<GateState>,
    Form(form): Form<AuthorizeForm>,
) -> Result<Redirect, (StatusCode, String)> {
    tracing::debug!("Stub issuer completing authentication");
    complete_authentication_response(&state.gate, &form.email).await
}
