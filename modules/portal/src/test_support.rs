//! Builders shared by this module's tests and the server's black-box suite.

use std::sync::Arc;

use opkit_auth::{Role, SecurityContext};
use uuid::Uuid;

use crate::env::PortalEnv;
use crate::models::{Company, User};
use crate::storage::Directory;

/// Empty environment.
#[must_use]
pub fn env() -> PortalEnv {
    PortalEnv::new(Arc::new(Directory::new()))
}

/// Persist a user with the given role.
pub fn seed_user(store: &Directory, name: &str, email: &str, role: Role) -> User {
    let mut user = User::new(name, email, role);
    store.save_user(&mut user).expect("seed user saves");
    user
}

/// Persist a company owned by the given user.
pub fn seed_company(store: &Directory, name: &str, owner_id: Uuid) -> Company {
    let company = Company::new(name, owner_id);
    store.save_company_unchecked(&company);
    company
}

/// Persist an owner with their company, wired both ways.
pub fn seed_owner_with_company(
    store: &Directory,
    name: &str,
    email: &str,
    company_name: &str,
) -> (User, Company) {
    let mut owner = User::new(name, email, Role::Customer);
    store.save_user(&mut owner).expect("owner saves");
    let company = seed_company(store, company_name, owner.id);
    owner.role = Role::Owner;
    store.save_user(&mut owner).expect("owner promotes");
    (owner, company)
}

/// Security context acting as the given user.
#[must_use]
pub fn ctx_for(user: &User) -> SecurityContext {
    SecurityContext::for_principal(user.principal())
}
