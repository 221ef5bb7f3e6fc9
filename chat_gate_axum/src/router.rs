use axum::{Router, routing::get};

use super::handlers;
use super::state::GateState;

/// The gate's own HTTP surface. Issuer-owned paths (authorize, credential
/// collection) are not served here; mount the issuer's router alongside.
pub fn router(state: GateState) -> Router {
    Router::new()
        .route("/", get(handlers::login))
        .route("/callback", get(handlers::callback))
        .route(
            "/complete-profile",
            get(handlers::profile_form).post(handlers::submit_profile),
        )
        .fallback(handlers::not_found)
        .with_state(state)
}
