//! In-memory directory store.
//!
//! Stands in for the external relational store: tables keyed by id, unique
//! indexes, referential actions, and snapshot transactions. Operations see
//! only scoped reads and validating saves, the same surface a repository
//! over a real store would expose.
//!
//! ## Referential actions
//!
//! - deleting a company nullifies its members' `company_id`
//! - deleting a user cascades to the company they own

use std::collections::BTreeMap;

use parking_lot::RwLock;
use uuid::Uuid;

use opkit::{ErrorBag, Halt, PerformError};
use opkit_auth::access_scope::AccessScope;

use crate::models::{Company, User};

/// Store failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} not found")]
    NotFound { kind: &'static str, id: Uuid },

    /// Validation failed; the bag mirrors the record's own errors.
    #[error("record invalid")]
    RecordInvalid(ErrorBag),
}

impl From<StoreError> for PerformError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { kind, id } => Self::Halt(Halt::not_found(kind, id)),
            StoreError::RecordInvalid(bag) => Self::Invalid(bag),
        }
    }
}

#[derive(Clone, Default)]
struct Tables {
    users: BTreeMap<Uuid, User>,
    companies: BTreeMap<Uuid, Company>,
}

/// The directory: users and companies behind one lock.
#[derive(Default)]
pub struct Directory {
    state: RwLock<Tables>,
}

impl Directory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Point reads ─────────────────────────────────────────────────

    pub fn find_user(&self, id: Uuid) -> Result<User, StoreError> {
        self.state
            .read()
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: "user", id })
    }

    pub fn find_company(&self, id: Uuid) -> Result<Company, StoreError> {
        self.state
            .read()
            .companies
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { kind: "company", id })
    }

    /// The company owned by the given user, if any.
    #[must_use]
    pub fn company_owned_by(&self, owner_id: Uuid) -> Option<Company> {
        self.state
            .read()
            .companies
            .values()
            .find(|c| c.owner_id == owner_id)
            .cloned()
    }

    // ── Scoped reads ────────────────────────────────────────────────

    /// Users visible under the scope, ordered by creation time.
    #[must_use]
    pub fn users_scoped(&self, scope: &AccessScope) -> Vec<User> {
        let mut users: Vec<User> = self
            .state
            .read()
            .users
            .values()
            .filter(|u| scope.permits(*u))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        users
    }

    /// Companies visible under the scope, ordered by creation time.
    #[must_use]
    pub fn companies_scoped(&self, scope: &AccessScope) -> Vec<Company> {
        let mut companies: Vec<Company> = self
            .state
            .read()
            .companies
            .values()
            .filter(|c| scope.permits(*c))
            .cloned()
            .collect();
        companies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        companies
    }

    // ── Writes ──────────────────────────────────────────────────────

    /// Validate and upsert a user.
    ///
    /// Runs field validations, the role-dependent company rules, the unique
    /// email index (case-insensitive), and the company reference check. On
    /// failure the record keeps its populated error collection and nothing
    /// is written.
    pub fn save_user(&self, user: &mut User) -> Result<(), StoreError> {
        user.errors = ErrorBag::new();
        user.validate();
        let owned = self.company_owned_by(user.id);
        user.validate_company_requirements(owned.as_ref());

        {
            let state = self.state.read();
            let email = user.email.to_lowercase();
            if state
                .users
                .values()
                .any(|other| other.id != user.id && other.email.to_lowercase() == email)
            {
                user.errors.add("email", "Email has already been taken");
            }
            if let Some(company_id) = user.company_id
                && !state.companies.contains_key(&company_id)
            {
                user.errors.add("company", "Company must exist");
            }
        }

        if !user.errors.is_empty() {
            return Err(StoreError::RecordInvalid(user.errors.clone()));
        }

        let mut stored = user.clone();
        stored.errors = ErrorBag::new();
        self.state.write().users.insert(stored.id, stored);
        Ok(())
    }

    /// Validate and upsert a company.
    pub fn save_company(&self, company: &mut Company) -> Result<(), StoreError> {
        if !self.company_valid(company) {
            return Err(StoreError::RecordInvalid(company.errors.clone()));
        }
        self.insert_company(company);
        Ok(())
    }

    /// Upsert a company without validations.
    ///
    /// The registration workflow writes the company before its owner holds
    /// the owner role and re-validates afterwards.
    pub fn save_company_unchecked(&self, company: &Company) {
        self.insert_company(company);
    }

    /// Re-run a company's validations against current store state,
    /// populating its error collection. Returns `true` when valid.
    pub fn company_valid(&self, company: &mut Company) -> bool {
        company.errors = ErrorBag::new();
        company.validate();

        let state = self.state.read();
        if state
            .companies
            .values()
            .any(|other| other.id != company.id && other.name == company.name)
        {
            company.errors.add("name", "Name has already been taken");
        }
        match state.users.get(&company.owner_id) {
            Some(owner) => {
                if !owner.role.is_owner() {
                    company.errors.add("owner", "Owner must have 'owner' role");
                }
            }
            None => company.errors.add("owner", "Owner must exist"),
        }

        company.errors.is_empty()
    }

    fn insert_company(&self, company: &Company) {
        let mut stored = company.clone();
        stored.errors = ErrorBag::new();
        self.state.write().companies.insert(stored.id, stored);
    }

    // ── Deletes ─────────────────────────────────────────────────────

    /// Delete a company, nullifying its members' company reference.
    pub fn delete_company(&self, id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if state.companies.remove(&id).is_none() {
            return Err(StoreError::NotFound { kind: "company", id });
        }
        for user in state.users.values_mut() {
            if user.company_id == Some(id) {
                user.company_id = None;
            }
        }
        Ok(())
    }

    /// Delete a user, cascading to their owned company.
    pub fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let owned = self.company_owned_by(id);
        {
            let mut state = self.state.write();
            if state.users.remove(&id).is_none() {
                return Err(StoreError::NotFound { kind: "user", id });
            }
        }
        if let Some(company) = owned {
            self.delete_company(company.id)?;
        }
        Ok(())
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Run `f` atomically: on error every write since the snapshot is
    /// discarded. Store calls inside `f` use the normal methods.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let snapshot = self.state.read().clone();
        match f() {
            Ok(value) => Ok(value),
            Err(e) => {
                *self.state.write() = snapshot;
                Err(e)
            }
        }
    }
}
