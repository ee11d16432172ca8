//! Realm rule sets behind the authorization oracle.
//!
//! | realm | who gets in |
//! |---|---|
//! | Admin | admin |
//! | CRM | admin, owner, employee, manager |
//! | Screener | anonymous, customer, admin |
//!
//! Resource rules dispatch on the resource kind: user records answer to the
//! admin rules, company records to the CRM rules. Scopes are row filters,
//! not denials — a principal without access gets a deny-all scope and sees
//! empty listings.

use opkit_auth::access_scope::{AccessScope, properties};
use opkit_auth::{
    Action, NotAuthorized, PolicyName, PolicyOracle, ResourceRef, Role, SecurityContext,
};

use crate::models::{COMPANY_KIND, USER_KIND};

/// The three isolated application areas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Realm {
    Admin,
    Crm,
    Screener,
}

impl Realm {
    /// Resource kind of the realm's entry gate.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::Admin => "portal.admin",
            Self::Crm => "portal.crm",
            Self::Screener => "portal.screener",
        }
    }

    fn policy(self) -> PolicyName {
        match self {
            Self::Admin => PolicyName::AdminAccess,
            Self::Crm => PolicyName::CrmAccess,
            Self::Screener => PolicyName::ScreenerAccess,
        }
    }
}

/// The portal's policy oracle.
#[derive(Clone, Copy, Debug, Default)]
pub struct PortalPolicies;

impl PortalPolicies {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// May the principal enter the realm at all?
    #[must_use]
    pub fn realm_access(ctx: &SecurityContext, realm: Realm) -> bool {
        match realm {
            Realm::Admin => matches!(ctx.role(), Some(Role::Admin)),
            Realm::Crm => matches!(
                ctx.role(),
                Some(Role::Admin | Role::Owner | Role::Employee | Role::Manager)
            ),
            Realm::Screener => {
                ctx.is_anonymous() || matches!(ctx.role(), Some(Role::Customer | Role::Admin))
            }
        }
    }

    /// Realm gate as a fault, for handler before-actions.
    pub fn ensure_realm_access(
        ctx: &SecurityContext,
        realm: Realm,
    ) -> Result<(), NotAuthorized> {
        if Self::realm_access(ctx, realm) {
            Ok(())
        } else {
            Err(NotAuthorized::new(realm.policy(), Action::Access))
        }
    }

    fn can_user(ctx: &SecurityContext, action: Action) -> Result<(), NotAuthorized> {
        if Self::realm_access(ctx, Realm::Admin) {
            Ok(())
        } else {
            Err(NotAuthorized::new(PolicyName::AdminUser, action))
        }
    }

    fn can_company(
        ctx: &SecurityContext,
        action: Action,
        resource: &ResourceRef,
    ) -> Result<(), NotAuthorized> {
        let deny = || Err(NotAuthorized::new(PolicyName::CrmCompany, action));
        if !Self::realm_access(ctx, Realm::Crm) {
            return deny();
        }
        let Some(principal) = ctx.principal() else {
            return deny();
        };
        match action {
            Action::Index | Action::Show | Action::Access => Ok(()),
            Action::Create => {
                if principal.role.is_owner() || principal.role.is_admin() {
                    Ok(())
                } else {
                    deny()
                }
            }
            Action::Update | Action::Destroy => {
                if principal.role.is_admin() {
                    return Ok(());
                }
                if principal.role.is_owner()
                    && resource.property(properties::OWNER_ID) == Some(principal.id)
                {
                    return Ok(());
                }
                deny()
            }
        }
    }
}

impl PolicyOracle for PortalPolicies {
    fn can(
        &self,
        ctx: &SecurityContext,
        action: Action,
        resource: &ResourceRef,
    ) -> Result<(), NotAuthorized> {
        match resource.kind() {
            USER_KIND => Self::can_user(ctx, action),
            COMPANY_KIND => Self::can_company(ctx, action, resource),
            kind if kind == Realm::Admin.kind() => Self::ensure_realm_access(ctx, Realm::Admin),
            kind if kind == Realm::Crm.kind() => Self::ensure_realm_access(ctx, Realm::Crm),
            kind if kind == Realm::Screener.kind() => {
                Self::ensure_realm_access(ctx, Realm::Screener)
            }
            _ => Err(NotAuthorized::new(PolicyName::Application, action)),
        }
    }

    fn scope_for(&self, ctx: &SecurityContext, kind: &str) -> AccessScope {
        match kind {
            USER_KIND => {
                if Self::realm_access(ctx, Realm::Admin) {
                    AccessScope::allow_all()
                } else {
                    AccessScope::deny_all()
                }
            }
            COMPANY_KIND => {
                if !Self::realm_access(ctx, Realm::Crm) {
                    return AccessScope::deny_all();
                }
                let Some(principal) = ctx.principal() else {
                    return AccessScope::deny_all();
                };
                match principal.role {
                    Role::Admin => AccessScope::allow_all(),
                    Role::Owner => AccessScope::for_owner(principal.id),
                    Role::Employee | Role::Manager => principal
                        .company_id
                        .map_or_else(AccessScope::deny_all, AccessScope::for_resource),
                    Role::Customer => AccessScope::deny_all(),
                }
            }
            _ => AccessScope::deny_all(),
        }
    }
}
