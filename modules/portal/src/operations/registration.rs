//! Sign-up workflow.
//!
//! Credential parameters are validated here; credential storage and session
//! establishment belong to the external authentication collaborator.

use opkit::{
    ErrorBag, Exec, Field, Model, NoticeLevel, OpResult, Operation, Params, PerformError,
    ResourceName,
};
use opkit_auth::Role;

use crate::env::PortalEnv;
use crate::models::{Record, User};
use crate::operations::crm;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Register a new user; with `register_company` set, compose the
/// create-organization workflow as a sub-operation.
pub struct Create;

impl Create {
    fn validate_credentials(params: &Params, user: &mut User) {
        let password = params.get("password").unwrap_or_default();
        let confirmation = params.get("password_confirmation").unwrap_or_default();

        if password.is_empty() {
            user.errors.add("password", "Password can't be blank");
        } else if password.len() < MIN_PASSWORD_LENGTH {
            user.errors.add(
                "password",
                format!("Password is too short (minimum is {MIN_PASSWORD_LENGTH} characters)"),
            );
        }
        if password != confirmation {
            user.errors.add(
                "password_confirmation",
                "Password confirmation doesn't match Password",
            );
        }
    }
}

impl Operation for Create {
    type Env = PortalEnv;

    fn resource(&self) -> ResourceName {
        ResourceName::new("user", "users")
    }

    fn perform(
        &self,
        x: &mut Exec<'_, PortalEnv>,
        params: &Params,
    ) -> Result<(), PerformError> {
        // Sign-up is public by definition.
        x.skip_authorize();
        x.skip_policy_scope();

        let mut user = User::new(
            params.get("name").unwrap_or_default(),
            params.get("email").unwrap_or_default(),
            Role::Customer,
        );
        Self::validate_credentials(params, &mut user);
        if !user.errors.is_empty() {
            x.set_model(Model::Record(Record::User(user)));
            return Err(PerformError::Invalid(ErrorBag::new()));
        }

        tracing::info!(register_company = params.flag("register_company"), "signing up user");

        if params.flag("register_company") {
            let sub = x.run_sub_manual(&crm::company::Create, params)?;
            if sub.is_failure() {
                // Re-render the form with the sub-workflow's user record.
                if let Some(record) = sub.model().field("user").and_then(Field::as_record) {
                    x.set_model(Model::Record(record.clone()));
                }
                let sub_errors = sub.errors().clone();
                x.add_errors(&sub_errors);
                return Err(PerformError::Invalid(ErrorBag::new()));
            }
            if let Some(record) = sub.model().field("user").and_then(Field::as_record) {
                x.set_model(Model::fields(vec![("user", Field::record(record.clone()))]));
            }
            // Owners land on their company's edit screen.
            x.set_redirect_path("/crm/company/edit");
        } else {
            let store = x.env().store();
            if let Err(e) = store.save_user(&mut user) {
                match e {
                    crate::storage::StoreError::RecordInvalid(_) => {
                        x.set_model(Model::Record(Record::User(user)));
                        return Err(PerformError::Invalid(ErrorBag::new()));
                    }
                    other => return Err(other.into()),
                }
            }
            x.set_model(Model::fields(vec![(
                "user",
                Field::record(Record::User(user)),
            )]));
            x.set_redirect_path("/");
        }

        x.notice("Welcome! You have signed up successfully.", NoticeLevel::Notice);
        Ok(())
    }

    /// Failed sign-ups keep the user record shape the form expects.
    fn finish(&self, result: &mut OpResult<Record>) {
        if let Model::Record(record) = result.model() {
            let record = record.clone();
            result.set_model(Model::fields(vec![("user", Field::record(record))]));
        }
    }
}
