use time::OffsetDateTime;
use uuid::Uuid;

use opkit::ErrorBag;
use opkit_auth::access_scope::{Scopable, properties};
use opkit_auth::{Principal, Role};

use super::Company;

/// A directory user.
///
/// Carries its own validation error collection, populated by
/// [`validate`](Self::validate) and the store's relational checks.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub errors: ErrorBag,
}

impl User {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            role,
            company_id: None,
            created_at: OffsetDateTime::now_utc(),
            errors: ErrorBag::new(),
        }
    }

    /// Local field validations. Relational rules (email uniqueness, company
    /// requirements) are the store's responsibility.
    pub fn validate(&mut self) {
        if self.name.trim().is_empty() {
            self.errors.add("name", "Name can't be blank");
        }
        if self.email.is_empty() || !self.email.contains('@') || !self.email.contains('.') {
            self.errors.add("email", "Email is invalid");
        }
    }

    /// Role-dependent company rules, checked against the user's owned
    /// company if any.
    pub fn validate_company_requirements(&mut self, owned_company: Option<&Company>) {
        match self.role {
            Role::Owner => {
                if self.company_id.is_none() && owned_company.is_none() {
                    self.errors
                        .add("company", "Company must be present for owner role");
                } else if let Some(owned) = owned_company
                    && let Some(company_id) = self.company_id
                    && company_id != owned.id
                {
                    self.errors.add_base("Owner can have only one company");
                }
            }
            Role::Employee | Role::Manager => {
                if self.company_id.is_none() {
                    self.errors.add(
                        "company",
                        format!("Company must be present for {} role", self.role),
                    );
                }
            }
            Role::Admin | Role::Customer => {}
        }
    }

    /// The policy-facing projection of this user as an acting subject.
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            company_id: self.company_id,
        }
    }

    /// First letter of the name, for avatar circles.
    #[must_use]
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }
}

impl Scopable for User {
    fn resolve_property(&self, property: &str) -> Option<Uuid> {
        match property {
            properties::RESOURCE_ID => Some(self.id),
            properties::COMPANY_ID => self.company_id,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_user_collects_no_errors() {
        let mut user = User::new("One", "one@example.com", Role::Customer);
        user.validate();
        user.validate_company_requirements(None);
        assert!(user.errors.is_empty());
    }

    #[test]
    fn blank_name_and_bad_email_are_flagged() {
        let mut user = User::new("  ", "nope", Role::Customer);
        user.validate();
        assert!(!user.errors.messages_for("name").is_empty());
        assert!(!user.errors.messages_for("email").is_empty());
    }

    #[test]
    fn owner_requires_some_company() {
        let mut user = User::new("One", "one@example.com", Role::Owner);
        user.validate_company_requirements(None);
        assert!(!user.errors.messages_for("company").is_empty());
    }

    #[test]
    fn owner_with_owned_company_is_fine() {
        let mut user = User::new("One", "one@example.com", Role::Owner);
        let owned = Company::new("Acme", user.id);
        user.validate_company_requirements(Some(&owned));
        assert!(user.errors.is_empty());
    }

    #[test]
    fn owner_cannot_reference_a_second_company() {
        let mut user = User::new("One", "one@example.com", Role::Owner);
        let owned = Company::new("Acme", user.id);
        user.company_id = Some(Uuid::new_v4());
        user.validate_company_requirements(Some(&owned));
        assert!(
            user.errors
                .contains(opkit::result::BASE, "Owner can have only one company")
        );
    }

    #[test]
    fn employee_requires_company_reference() {
        let mut user = User::new("One", "one@example.com", Role::Employee);
        user.validate_company_requirements(None);
        assert!(!user.errors.messages_for("company").is_empty());
    }
}
