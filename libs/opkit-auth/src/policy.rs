//! The policy evaluation model and the authorization oracle trait.
//!
//! Policies are consulted with a (subject, action, resource) triple and
//! answer with a decision or a row-level [`AccessScope`]. Realms implement
//! [`PolicyOracle`] with their own rule sets.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::access_scope::AccessScope;
use crate::context::SecurityContext;

/// The action being performed against a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Index,
    Show,
    Create,
    Update,
    Destroy,
    /// Realm entry gate ("may this principal use this realm at all").
    Access,
}

impl Action {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Show => "show",
            Self::Create => "create",
            Self::Update => "update",
            Self::Destroy => "destroy",
            Self::Access => "access",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The policy-facing projection of a record.
///
/// Carries the resource kind, optional identity, and the authorization
/// properties a rule may need (ownership, membership). Built by domain
/// records; policies never see the records themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRef {
    kind: &'static str,
    id: Option<Uuid>,
    properties: BTreeMap<&'static str, Uuid>,
}

impl ResourceRef {
    /// Create a resource reference for a kind, without identity.
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            id: None,
            properties: BTreeMap::new(),
        }
    }

    /// Set the resource identity.
    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach an authorization property (e.g. `owner_id`).
    #[must_use]
    pub fn with_property(mut self, name: &'static str, value: Uuid) -> Self {
        self.properties.insert(name, value);
        self
    }

    /// The resource kind (e.g. `"portal.company"`).
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The resource identity, if known.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Look up an authorization property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Uuid> {
        self.properties.get(name).copied()
    }
}

/// Which rule set rejected a request.
///
/// The centralized failure handler branches on this to pick the redirect
/// target and message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyName {
    /// CRM realm entry gate.
    CrmAccess,
    /// Screener realm entry gate.
    ScreenerAccess,
    /// Admin realm entry gate.
    AdminAccess,
    /// Admin user resource rules.
    AdminUser,
    /// CRM company resource rules.
    CrmCompany,
    /// Default application rule set: denies anything no realm claims.
    Application,
}

/// Authorization was denied.
///
/// Distinct from validation failures: this fault unwinds past the operation
/// boundary to a centralized handler that turns it into a redirect plus
/// flash alert chosen by [`PolicyName`].
#[derive(Clone, Debug, thiserror::Error)]
#[error("not authorized: {policy:?} denied {action}")]
pub struct NotAuthorized {
    pub policy: PolicyName,
    pub action: Action,
    /// Optional override for the user-facing message.
    pub message: Option<String>,
}

impl NotAuthorized {
    #[must_use]
    pub fn new(policy: PolicyName, action: Action) -> Self {
        Self {
            policy,
            action,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// The authorization oracle.
///
/// One implementation per application, dispatching on resource kind to the
/// realm rule sets. Evaluations are synchronous, in-process predicate checks
/// against the current principal; nothing is cached across requests.
pub trait PolicyOracle: Send + Sync {
    /// May the principal perform `action` on `resource`?
    ///
    /// # Errors
    ///
    /// [`NotAuthorized`] naming the rejecting rule set.
    fn can(
        &self,
        ctx: &SecurityContext,
        action: Action,
        resource: &ResourceRef,
    ) -> Result<(), NotAuthorized>;

    /// Row-level scope for listing resources of `kind`.
    ///
    /// Always returns a scope; "nothing visible" is [`AccessScope::deny_all`],
    /// not an error; a principal without access sees empty listings.
    fn scope_for(&self, ctx: &SecurityContext, kind: &str) -> AccessScope;
}
