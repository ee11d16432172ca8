//! Shared application state.

use std::sync::Arc;

use portal::{Directory, PortalEnv};

use crate::authn::Authenticator;

/// Everything the handlers need: the operation environment and the
/// authentication port.
#[derive(Clone)]
pub struct AppState {
    pub env: PortalEnv,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    /// State over a fresh store with the bundled header authenticator.
    #[must_use]
    pub fn new(store: Arc<Directory>) -> Self {
        let authenticator: Arc<dyn Authenticator> =
            Arc::new(crate::authn::HeaderAuthenticator::new(Arc::clone(&store)));
        Self {
            env: PortalEnv::new(store),
            authenticator,
        }
    }
}
