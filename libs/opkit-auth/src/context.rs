//! The acting subject: roles, principals, and the per-request security context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a principal within the portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Customer,
    Owner,
    Employee,
    Manager,
}

impl Role {
    #[inline]
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    #[inline]
    #[must_use]
    pub fn is_customer(self) -> bool {
        matches!(self, Self::Customer)
    }

    #[inline]
    #[must_use]
    pub fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }

    /// Display name used in listings and cards.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
            Self::Owner => "owner",
            Self::Employee => "employee",
            Self::Manager => "manager",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            "owner" => Ok(Self::Owner),
            "employee" => Ok(Self::Employee),
            "manager" => Ok(Self::Manager),
            _ => Err(()),
        }
    }
}

/// The authenticated actor making a request.
///
/// A projection of the subject's directory record, enough for policy
/// evaluation without a store lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub company_id: Option<Uuid>,
}

/// Per-request security context: the acting principal, or anonymous.
///
/// Threaded explicitly through every operation and dispatcher call; there is
/// no ambient current-user state.
#[derive(Clone, Debug, Default)]
pub struct SecurityContext {
    principal: Option<Principal>,
}

impl SecurityContext {
    /// Context for an unauthenticated request.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    /// Context for an authenticated principal.
    #[must_use]
    pub fn for_principal(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    /// The acting principal, if authenticated.
    #[inline]
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// The acting principal's role, if authenticated.
    #[inline]
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.principal.as_ref().map(|p| p.role)
    }

    #[inline]
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.principal.is_none()
    }
}
