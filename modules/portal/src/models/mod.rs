//! Domain records.

mod company;
mod user;

pub use company::Company;
pub use user::User;

use opkit::{Entity, ErrorBag, SearchHit};
use opkit_auth::access_scope::{Scopable, properties};
use opkit_auth::ResourceRef;
use uuid::Uuid;

/// Resource kind of user records, as seen by policies.
pub const USER_KIND: &str = "portal.user";

/// Resource kind of company records, as seen by policies.
pub const COMPANY_KIND: &str = "portal.company";

/// The record union carried through results and component input.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    User(User),
    Company(Company),
}

impl Record {
    #[must_use]
    pub fn id(&self) -> Uuid {
        match self {
            Self::User(user) => user.id,
            Self::Company(company) => company.id,
        }
    }

    #[must_use]
    pub fn as_user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            Self::Company(_) => None,
        }
    }

    #[must_use]
    pub fn as_company(&self) -> Option<&Company> {
        match self {
            Self::Company(company) => Some(company),
            Self::User(_) => None,
        }
    }
}

impl Entity for Record {
    fn record_errors(&self) -> &ErrorBag {
        match self {
            Self::User(user) => &user.errors,
            Self::Company(company) => &company.errors,
        }
    }

    fn resource(&self) -> ResourceRef {
        match self {
            Self::User(user) => {
                let mut resource = ResourceRef::new(USER_KIND).with_id(user.id);
                if let Some(company_id) = user.company_id {
                    resource = resource.with_property(properties::COMPANY_ID, company_id);
                }
                resource
            }
            Self::Company(company) => ResourceRef::new(COMPANY_KIND)
                .with_id(company.id)
                .with_property(properties::OWNER_ID, company.owner_id),
        }
    }

    fn search_hit(&self) -> SearchHit {
        match self {
            Self::User(user) => SearchHit {
                id: user.id,
                text: format!("{} ({})", user.name, user.email),
            },
            Self::Company(company) => SearchHit {
                id: company.id,
                text: company.name.clone(),
            },
        }
    }
}

impl Scopable for Record {
    fn resolve_property(&self, property: &str) -> Option<Uuid> {
        match self {
            Self::User(user) => user.resolve_property(property),
            Self::Company(company) => company.resolve_property(property),
        }
    }
}
