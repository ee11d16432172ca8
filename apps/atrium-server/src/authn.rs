//! Principal extraction.
//!
//! Authentication is an external collaborator; the [`Authenticator`] trait
//! marks the seam. The bundled implementation resolves a principal id
//! header against the directory: enough for development and tests, and a
//! stand-in for a real session or token validator.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::HeaderMap;
use uuid::Uuid;

use opkit_auth::SecurityContext;
use portal::Directory;

use crate::state::AppState;

/// Resolves request credentials to a security context.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> SecurityContext;
}

/// Header name carrying the principal id.
pub const PRINCIPAL_HEADER: &str = "x-principal-id";

/// Looks up `x-principal-id` in the directory; anonymous otherwise.
pub struct HeaderAuthenticator {
    store: Arc<Directory>,
}

impl HeaderAuthenticator {
    #[must_use]
    pub fn new(store: Arc<Directory>) -> Self {
        Self { store }
    }
}

impl Authenticator for HeaderAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> SecurityContext {
        let Some(id) = headers
            .get(PRINCIPAL_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
        else {
            return SecurityContext::anonymous();
        };
        match self.store.find_user(id) {
            Ok(user) => SecurityContext::for_principal(user.principal()),
            Err(_) => {
                tracing::debug!(principal_id = %id, "unknown principal header, treating as anonymous");
                SecurityContext::anonymous()
            }
        }
    }
}

/// Middleware: resolve the principal once and insert the
/// [`SecurityContext`] as a request extension.
pub async fn authn_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = state.authenticator.authenticate(req.headers());
    req.extensions_mut().insert(ctx);
    next.run(req).await
}
