use std::collections::HashMap;

use askama::Template;
use axum::{
    Json,
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use serde::Deserialize;

use chat_gate::{AuthGate, ProfileSubmission};

use super::error::IntoResponseError;
use super::state::GateState;

#[derive(Template)]
#[template(path = "complete_profile.j2")]
struct CompleteProfileTemplate<'a> {
    email: &'a str,
    state: &'a str,
    profile_path: &'a str,
}

#[derive(Deserialize)]
pub(super) struct StateQuery {
    state: Option<String>,
}

/// Form fields posted by the completion page. Everything is optional at the
/// extraction layer so that missing fields reach the gate's own validation
/// and come back as 400s rather than extractor rejections.
#[derive(Deserialize)]
pub(super) struct ProfileFormBody {
    state: Option<String>,
    username: Option<String>,
    #[serde(rename = "fullName")]
    full_name: Option<String>,
}

/// Entry point: send the user off to the issuer's authorize endpoint.
pub(super) async fn login(State(state): State<GateState>) -> Redirect {
    let auth_url = state.gate.authorize_url();
    tracing::debug!("Redirecting login entry to issuer");
    Redirect::to(&auth_url)
}

/// Demo completion endpoint; echoes the received query parameters as JSON.
pub(super) async fn callback(
    Query(params): Query<HashMap<String, String>>,
) -> Json<HashMap<String, String>> {
    Json(params)
}

/// Render the profile completion form for a continuation token.
pub(super) async fn profile_form(
    State(state): State<GateState>,
    Query(query): Query<StateQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let token = query.state.unwrap_or_default();
    let form = state
        .gate
        .profile_form(&token)
        .await
        .into_response_error()?;

    let template = CompleteProfileTemplate {
        email: &form.email,
        state: &form.state,
        profile_path: &state.gate.config().profile_path,
    };
    let html = template
        .render()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Html(html))
}

/// Accept the completion form and forward the user downstream.
pub(super) async fn submit_profile(
    State(state): State<GateState>,
    Form(form): Form<ProfileFormBody>,
) -> Result<Redirect, (StatusCode, String)> {
    let token = form.state.unwrap_or_default();
    let submission = ProfileSubmission {
        username: form.username.unwrap_or_default(),
        full_name: form.full_name,
    };

    let location = state
        .gate
        .submit_profile(&token, submission)
        .await
        .into_response_error()?;

    Ok(Redirect::to(&location))
}

pub(super) async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Completion callback for issuer integrations: turn a verified email into
/// the redirect that continues the flow. This is the single entry point an
/// issuer needs; it captures no state beyond the gate handle itself.
pub async fn complete_authentication_response(
    gate: &AuthGate,
    email: &str,
) -> Result<Redirect, (StatusCode, String)> {
    let completion = gate
        .complete_authentication(email)
        .await
        .into_response_error()?;
    Ok(Redirect::to(completion.location()))
}
