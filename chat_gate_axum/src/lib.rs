//! Axum integration for the chat-gate authentication front-end.
//!
//! [`router`] serves the gate's own paths: the login entry redirect, the
//! demo callback echo, and the profile completion form. The identity
//! issuer's paths are not ours; the embedding application mounts the
//! issuer's router next to this one, and the issuer finishes by calling
//! [`complete_authentication_response`] with the verified email.

mod error;
mod handlers;
mod router;
mod state;

pub use handlers::complete_authentication_response;
pub use router::router;
pub use state::GateState;
