//! Black-box operation scenarios through the public protocol.

use std::sync::Arc;

use opkit::{Field, Halt, Model, Params, run};
use opkit_auth::{Role, SecurityContext};

use portal::operations::{admin, crm, registration};
use portal::storage::Directory;
use portal::test_support::{ctx_for, env, seed_owner_with_company, seed_user};
use portal::{PortalEnv, Record};

fn field_listing_len(model: &Model<Record>, name: &str) -> usize {
    model
        .field(name)
        .and_then(Field::as_listing)
        .map_or(0, |listing| listing.items.len())
}

fn user_field(model: &Model<Record>) -> &portal::User {
    model
        .field("user")
        .and_then(Field::as_record)
        .and_then(Record::as_user)
        .expect("user field present")
}

// ── Create-organization workflow ───────────────────────────────────

#[test]
fn customer_registers_company_and_becomes_owner() {
    let env = env();
    let customer = seed_user(env.store(), "One", "one@example.com", Role::Customer);

    let params = Params::new()
        .with("user_id", customer.id.to_string())
        .with("company_name", "Acme");
    let result = run(&crm::company::Create, &env, &params, &ctx_for(&customer))
        .expect("no halt");

    assert!(result.is_success());
    assert_eq!(result.redirect_path(), Some("/crm"));
    assert_eq!(result.message(), Some("Successfully registered!"));

    let stored = env.store().find_user(customer.id).expect("still present");
    assert_eq!(stored.role, Role::Owner);
    let company = env.store().company_owned_by(customer.id).expect("company exists");
    assert_eq!(company.name, "Acme");
}

#[test]
fn company_name_defaults_to_owner_name() {
    let env = env();
    let customer = seed_user(env.store(), "One", "one@example.com", Role::Customer);

    let params = Params::new().with("user_id", customer.id.to_string());
    let result = run(&crm::company::Create, &env, &params, &ctx_for(&customer))
        .expect("no halt");

    assert!(result.is_success());
    let company = env.store().company_owned_by(customer.id).expect("company exists");
    assert_eq!(company.name, "One's Company");
}

#[test]
fn duplicate_company_name_rolls_back_the_promotion() {
    let env = env();
    seed_owner_with_company(env.store(), "Zero", "zero@example.com", "Acme");
    let customer = seed_user(env.store(), "One", "one@example.com", Role::Customer);

    let params = Params::new()
        .with("user_id", customer.id.to_string())
        .with("company_name", "Acme");
    let result = run(&crm::company::Create, &env, &params, &ctx_for(&customer))
        .expect("validation failures do not halt");

    assert!(result.is_failure());
    assert!(result.error_message().contains("Name has already been taken"));

    // Transaction rollback: the role transition and the company write are gone.
    let stored = env.store().find_user(customer.id).expect("still present");
    assert_eq!(stored.role, Role::Customer);
    assert!(env.store().company_owned_by(customer.id).is_none());

    // The failed record is reshaped for the form and keeps its errors.
    assert!(!user_field(result.model()).errors.is_empty());
}

// ── Scope filtering, not denial ────────────────────────────────────

#[test]
fn customer_sees_empty_admin_dashboard() {
    let env = env();
    seed_user(env.store(), "Root", "root@example.com", Role::Admin);
    let customer = seed_user(env.store(), "One", "one@example.com", Role::Customer);

    let result = run(
        &admin::dashboard::Index,
        &env,
        &Params::new(),
        &ctx_for(&customer),
    )
    .expect("scoping filters instead of denying");

    assert!(result.is_success());
    assert_eq!(field_listing_len(result.model(), "users"), 0);
    assert_eq!(field_listing_len(result.model(), "companies"), 0);
    assert_eq!(field_listing_len(result.model(), "admins"), 0);
}

#[test]
fn admin_sees_the_whole_directory() {
    let env = env();
    let admin_user = seed_user(env.store(), "Root", "root@example.com", Role::Admin);
    seed_user(env.store(), "One", "one@example.com", Role::Customer);
    seed_owner_with_company(env.store(), "Two", "two@example.com", "Acme");

    let result = run(
        &admin::dashboard::Index,
        &env,
        &Params::new(),
        &ctx_for(&admin_user),
    )
    .expect("no halt");

    assert_eq!(field_listing_len(result.model(), "users"), 3);
    assert_eq!(field_listing_len(result.model(), "companies"), 1);
    assert_eq!(field_listing_len(result.model(), "admins"), 1);
}

// ── Admin user directory ───────────────────────────────────────────

#[test]
fn user_listing_honors_sort_params() {
    let env = env();
    let admin_user = seed_user(env.store(), "Root", "root@example.com", Role::Admin);
    seed_user(env.store(), "Alpha", "alpha@example.com", Role::Customer);
    seed_user(env.store(), "Zulu", "zulu@example.com", Role::Customer);

    let params = Params::new().with("sort_by", "name").with("sort_direction", "asc");
    let result = run(&admin::user::Index, &env, &params, &ctx_for(&admin_user))
        .expect("no halt");

    let listing = result
        .model()
        .field("users")
        .and_then(Field::as_listing)
        .expect("users listing");
    let names: Vec<_> = listing
        .items
        .iter()
        .filter_map(Record::as_user)
        .map(|u| u.name.as_str())
        .collect();
    assert_eq!(names, ["Alpha", "Root", "Zulu"]);
}

#[test]
fn showing_a_user_requires_admin() {
    let env = env();
    let admin_user = seed_user(env.store(), "Root", "root@example.com", Role::Admin);
    let customer = seed_user(env.store(), "One", "one@example.com", Role::Customer);

    let params = Params::new().with("id", admin_user.id.to_string());
    let halt = run(&admin::user::Show, &env, &params, &ctx_for(&customer))
        .expect_err("denial unwinds");
    assert!(matches!(halt, Halt::NotAuthorized(_)));

    let result = run(&admin::user::Show, &env, &params, &ctx_for(&admin_user))
        .expect("admin may look");
    assert!(result.is_success());
    assert_eq!(user_field(result.model()).id, admin_user.id);
}

#[test]
fn showing_a_missing_user_is_a_not_found_fault() {
    let env = env();
    let admin_user = seed_user(env.store(), "Root", "root@example.com", Role::Admin);

    let params = Params::new().with("id", uuid::Uuid::new_v4().to_string());
    let halt = run(&admin::user::Show, &env, &params, &ctx_for(&admin_user))
        .expect_err("missing record unwinds");
    assert!(matches!(halt, Halt::NotFound { .. }));
}

// ── CRM company edit ───────────────────────────────────────────────

#[test]
fn owner_edits_their_own_company() {
    let env = env();
    let (owner, company) =
        seed_owner_with_company(env.store(), "One", "one@example.com", "Acme");

    let result = run(&crm::company::Edit, &env, &Params::new(), &ctx_for(&owner))
        .expect("no halt");

    assert!(result.is_success());
    let found = result
        .model()
        .field("company")
        .and_then(Field::as_record)
        .and_then(Record::as_company)
        .expect("company present");
    assert_eq!(found.id, company.id);
}

#[test]
fn employee_sees_their_company_read_only_scope() {
    let env = env();
    let (_, company) = seed_owner_with_company(env.store(), "One", "one@example.com", "Acme");
    let mut employee = portal::User::new("Two", "two@example.com", Role::Employee);
    employee.company_id = Some(company.id);
    env.store().save_user(&mut employee).expect("employee saves");

    // The scope reaches the company, but update authorization rejects.
    let halt = run(&crm::company::Edit, &env, &Params::new(), &ctx_for(&employee))
        .expect_err("employees may not edit");
    assert!(matches!(halt, Halt::NotAuthorized(_)));
}

#[test]
fn user_without_company_gets_the_empty_state() {
    let env = env();
    let admin_user = seed_user(env.store(), "Root", "root@example.com", Role::Admin);
    // Admin scope is allow-all; with no companies stored the field is empty.
    let result = run(&crm::company::Edit, &env, &Params::new(), &ctx_for(&admin_user))
        .expect("no halt");
    assert!(result.is_success());
    assert!(
        result
            .model()
            .field("company")
            .and_then(Field::as_record)
            .is_none()
    );
}

// ── Registration ───────────────────────────────────────────────────

fn signup_params(register_company: bool) -> Params {
    let params = Params::new()
        .with("name", "One")
        .with("email", "one@example.com")
        .with("password", "correct horse")
        .with("password_confirmation", "correct horse");
    if register_company {
        params
            .with("register_company", "1")
            .with("company_name", "Acme")
    } else {
        params
    }
}

#[test]
fn plain_signup_creates_a_customer() {
    let env = env();
    let result = run(
        &registration::Create,
        &env,
        &signup_params(false),
        &SecurityContext::anonymous(),
    )
    .expect("no halt");

    assert!(result.is_success());
    assert_eq!(result.redirect_path(), Some("/"));
    let user = user_field(result.model());
    assert_eq!(user.role, Role::Customer);
    assert!(env.store().find_user(user.id).is_ok());
}

#[test]
fn company_signup_composes_the_create_workflow() {
    let env = env();
    let result = run(
        &registration::Create,
        &env,
        &signup_params(true),
        &SecurityContext::anonymous(),
    )
    .expect("no halt");

    assert!(result.is_success());
    assert_eq!(result.redirect_path(), Some("/crm/company/edit"));
    assert_eq!(result.sub_results().len(), 1);
    assert!(result.sub_results()[0].is_success());

    let user = user_field(result.model());
    assert_eq!(user.role, Role::Owner);
    assert!(env.store().company_owned_by(user.id).is_some());
}

#[test]
fn short_password_fails_before_any_write() {
    let env = env();
    let params = Params::new()
        .with("name", "One")
        .with("email", "one@example.com")
        .with("password", "short")
        .with("password_confirmation", "short");
    let result = run(
        &registration::Create,
        &env,
        &params,
        &SecurityContext::anonymous(),
    )
    .expect("validation failures do not halt");

    assert!(result.is_failure());
    let user = user_field(result.model());
    assert!(!user.errors.messages_for("password").is_empty());
    assert!(env.store().users_scoped(&opkit_auth::AccessScope::allow_all()).is_empty());
}

#[test]
fn failed_company_signup_reports_through_one_channel() {
    let env = env();
    seed_owner_with_company(env.store(), "Zero", "zero@example.com", "Acme");

    let result = run(
        &registration::Create,
        &env,
        &signup_params(true),
        &SecurityContext::anonymous(),
    )
    .expect("no halt");

    assert!(result.is_failure());
    assert!(result.error_message().contains("Name has already been taken"));
    assert_eq!(result.sub_results().len(), 1);
    assert!(result.sub_results()[0].is_failure());

    // Nothing committed.
    let store: &Directory = env.store();
    assert!(store.users_scoped(&opkit_auth::AccessScope::allow_all()).len() == 1);
}

// ── Env plumbing ───────────────────────────────────────────────────

#[test]
fn env_shares_one_store() {
    let store = Arc::new(Directory::new());
    let env = PortalEnv::new(Arc::clone(&store));
    seed_user(env.store(), "One", "one@example.com", Role::Customer);
    assert_eq!(store.users_scoped(&opkit_auth::AccessScope::allow_all()).len(), 1);
}
