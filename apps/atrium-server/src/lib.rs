//! Atrium HTTP application.
//!
//! Thin axum wiring over the portal module: every handler authenticates the
//! principal, gates the realm, and hands off to the operation protocol's
//! `endpoint` dispatcher. Business logic never lives here.

pub mod authn;
pub mod config;
pub mod respond;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::app;
pub use state::AppState;
