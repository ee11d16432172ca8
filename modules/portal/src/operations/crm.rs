//! CRM realm operations: company management for business users.

pub mod dashboard {
    use opkit::{Exec, Field, Model, Operation, Params, PerformError, ResourceName};

    use crate::env::PortalEnv;
    use crate::models::Record;

    /// CRM landing: the acting principal's record.
    pub struct Index;

    impl Operation for Index {
        type Env = PortalEnv;

        fn resource(&self) -> ResourceName {
            ResourceName::new("dashboard", "dashboards")
        }

        fn perform(
            &self,
            x: &mut Exec<'_, PortalEnv>,
            _params: &Params,
        ) -> Result<(), PerformError> {
            x.skip_authorize();
            x.skip_policy_scope();

            let user = x
                .ctx()
                .principal()
                .and_then(|p| x.env().store().find_user(p.id).ok());
            x.set_model(Model::fields(vec![(
                "user",
                Field::Record(user.map(Record::User)),
            )]));
            Ok(())
        }
    }
}

pub mod company {
    use opkit::{
        ErrorBag, Exec, Field, Model, NoticeLevel, OpResult, Operation, Params, PerformError,
        ResourceName,
    };
    use opkit_auth::{Action, Role};

    use crate::env::PortalEnv;
    use crate::models::{COMPANY_KIND, Company, Record, User};
    use crate::storage::StoreError;

    /// Edit screen for the principal's company: first match of the scoped
    /// listing, authorized for update when present.
    pub struct Edit;

    impl Operation for Edit {
        type Env = PortalEnv;

        fn resource(&self) -> ResourceName {
            ResourceName::new("company", "companies")
        }

        fn perform(
            &self,
            x: &mut Exec<'_, PortalEnv>,
            _params: &Params,
        ) -> Result<(), PerformError> {
            let scope = x.policy_scope(COMPANY_KIND);
            let company = x.env().store().companies_scoped(&scope).into_iter().next();

            match &company {
                Some(found) => x.authorize(&Record::Company(found.clone()), Action::Update)?,
                None => x.skip_authorize(),
            }

            x.set_model(Model::fields(vec![(
                "company",
                Field::Record(company.map(Record::Company)),
            )]));
            Ok(())
        }
    }

    /// The create-organization workflow.
    ///
    /// Inside one store transaction: save the user as customer, write the
    /// owned company, promote to owner, re-validate the company. A failure
    /// anywhere rolls back every write and surfaces the accumulated errors
    /// on the user record.
    pub struct Create;

    impl Create {
        fn build_user(
            x: &Exec<'_, PortalEnv>,
            params: &Params,
        ) -> Result<User, PerformError> {
            match params.uuid("user_id") {
                Some(id) => Ok(x.env().store().find_user(id)?),
                None => Ok(User::new(
                    params.get("name").unwrap_or_default(),
                    params.get("email").unwrap_or_default(),
                    Role::Customer,
                )),
            }
        }
    }

    impl Operation for Create {
        type Env = PortalEnv;

        fn resource(&self) -> ResourceName {
            ResourceName::new("company", "companies")
        }

        fn perform(
            &self,
            x: &mut Exec<'_, PortalEnv>,
            params: &Params,
        ) -> Result<(), PerformError> {
            // Public registration path: no acting principal to check.
            x.skip_authorize();
            x.skip_policy_scope();

            let mut user = Self::build_user(x, params)?;
            let company_name = params
                .get("company_name")
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| format!("{}'s Company", user.name));

            tracing::info!(company = %company_name, "registering company owner");
            x.set_model(Model::Record(Record::User(user.clone())));

            let store = x.env().store();
            let outcome = store.transaction(|| {
                let mut staged = user.clone();
                staged.role = Role::Customer;
                store.save_user(&mut staged)?;

                let mut company = Company::new(company_name.clone(), staged.id);
                store.save_company_unchecked(&company);

                staged.role = Role::Owner;
                store.save_user(&mut staged)?;

                if !store.company_valid(&mut company) {
                    staged
                        .errors
                        .add_base(company.errors.all_messages().join(", "));
                    return Err(StoreError::RecordInvalid(staged.errors.clone()));
                }
                Ok(staged)
            });

            match outcome {
                Ok(saved) => {
                    tracing::info!(user_id = %saved.id, "company registered");
                    x.set_redirect_path("/crm");
                    x.notice("Successfully registered!", NoticeLevel::Notice);
                    x.set_model(Model::fields(vec![(
                        "user",
                        Field::record(Record::User(saved)),
                    )]));
                    Ok(())
                }
                Err(StoreError::RecordInvalid(bag)) => {
                    user.errors = bag;
                    x.set_model(Model::Record(Record::User(user)));
                    Err(PerformError::Invalid(ErrorBag::new()))
                }
                Err(e) => Err(e.into()),
            }
        }

        /// Fold the failed user record into the named-fields shape the edit
        /// form consumes, after its errors were copied to `base`.
        fn finish(&self, result: &mut OpResult<Record>) {
            if let Model::Record(record) = result.model() {
                let record = record.clone();
                result.set_model(Model::fields(vec![("user", Field::record(record))]));
            }
        }
    }
}
