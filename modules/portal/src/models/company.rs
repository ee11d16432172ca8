use time::OffsetDateTime;
use uuid::Uuid;

use opkit::ErrorBag;
use opkit_auth::access_scope::{Scopable, properties};

/// A company owned by one principal.
#[derive(Clone, Debug, PartialEq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: OffsetDateTime,
    pub errors: ErrorBag,
}

impl Company {
    #[must_use]
    pub fn new(name: impl Into<String>, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            owner_id,
            created_at: OffsetDateTime::now_utc(),
            errors: ErrorBag::new(),
        }
    }

    /// Local field validations. Name uniqueness and the owner-role rule are
    /// the store's responsibility.
    pub fn validate(&mut self) {
        if self.name.trim().is_empty() {
            self.errors.add("name", "Name can't be blank");
        }
    }
}

impl Scopable for Company {
    fn resolve_property(&self, property: &str) -> Option<Uuid> {
        match property {
            properties::RESOURCE_ID => Some(self.id),
            properties::OWNER_ID => Some(self.owner_id),
            _ => None,
        }
    }
}
