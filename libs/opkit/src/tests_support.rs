//! Shared fixtures for the crate's unit tests.

use uuid::Uuid;

use opkit_auth::access_scope::AccessScope;
use opkit_auth::{Action, NotAuthorized, PolicyName, PolicyOracle, ResourceRef, SecurityContext};

use crate::operation::{Entity, OpEnv};
use crate::params::Params;
use crate::result::{ErrorBag, SearchHit};

/// Minimal record for exercising the protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Widget {
    pub id: Uuid,
    pub name: String,
    pub errors: ErrorBag,
}

impl Widget {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            errors: ErrorBag::new(),
        }
    }
}

impl Entity for Widget {
    fn record_errors(&self) -> &ErrorBag {
        &self.errors
    }

    fn resource(&self) -> ResourceRef {
        ResourceRef::new("test.widget").with_id(self.id)
    }

    fn search_hit(&self) -> SearchHit {
        SearchHit {
            id: self.id,
            text: self.name.clone(),
        }
    }
}

/// Oracle that allows everything and scopes nothing out.
struct AllowAllOracle;

impl PolicyOracle for AllowAllOracle {
    fn can(
        &self,
        _ctx: &SecurityContext,
        _action: Action,
        _resource: &ResourceRef,
    ) -> Result<(), NotAuthorized> {
        Ok(())
    }

    fn scope_for(&self, _ctx: &SecurityContext, _kind: &str) -> AccessScope {
        AccessScope::allow_all()
    }
}

/// Oracle that denies everything under a fixed policy name.
struct DenyAllOracle {
    policy: PolicyName,
}

impl PolicyOracle for DenyAllOracle {
    fn can(
        &self,
        _ctx: &SecurityContext,
        action: Action,
        _resource: &ResourceRef,
    ) -> Result<(), NotAuthorized> {
        Err(NotAuthorized::new(self.policy, action))
    }

    fn scope_for(&self, _ctx: &SecurityContext, _kind: &str) -> AccessScope {
        AccessScope::deny_all()
    }
}

/// Test dependency container.
pub(crate) struct TestEnv {
    oracle: Box<dyn PolicyOracle>,
}

impl TestEnv {
    pub fn allow_all() -> Self {
        Self {
            oracle: Box::new(AllowAllOracle),
        }
    }

    pub fn deny_all(policy: PolicyName) -> Self {
        Self {
            oracle: Box::new(DenyAllOracle { policy }),
        }
    }
}

impl OpEnv for TestEnv {
    type Entity = Widget;

    fn oracle(&self) -> &dyn PolicyOracle {
        self.oracle.as_ref()
    }
}

pub(crate) fn widget_params() -> Params {
    Params::new()
}
