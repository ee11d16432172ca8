//! The dependency container operations run against.

use std::sync::Arc;

use opkit::OpEnv;
use opkit_auth::PolicyOracle;

use crate::models::Record;
use crate::policies::PortalPolicies;
use crate::storage::Directory;

/// Directory store plus the policy oracle, shared across requests.
#[derive(Clone)]
pub struct PortalEnv {
    store: Arc<Directory>,
    policies: PortalPolicies,
}

impl PortalEnv {
    #[must_use]
    pub fn new(store: Arc<Directory>) -> Self {
        Self {
            store,
            policies: PortalPolicies::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Directory {
        &self.store
    }
}

impl OpEnv for PortalEnv {
    type Entity = Record;

    fn oracle(&self) -> &dyn PolicyOracle {
        &self.policies
    }
}
