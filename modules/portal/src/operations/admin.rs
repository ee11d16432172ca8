//! Admin realm operations: user directory administration.

pub mod user {
    use opkit::{
        Exec, Field, Halt, Model, Operation, Params, PerformError, ResourceName, SortColumn,
        SortDirection, apply_sorting,
    };
    use opkit_auth::Action;

    use crate::env::PortalEnv;
    use crate::models::{Record, USER_KIND, User};

    fn sort_columns() -> Vec<SortColumn<User>> {
        vec![
            SortColumn::new("id", |a, b| a.id.cmp(&b.id)),
            SortColumn::new("name", |a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            SortColumn::new("email", |a, b| a.email.cmp(&b.email)),
            SortColumn::new("role", |a, b| a.role.as_str().cmp(b.role.as_str())),
            SortColumn::new("created_at", |a, b| a.created_at.cmp(&b.created_at)),
        ]
    }

    /// Scoped, sortable user listing.
    pub struct Index;

    impl Operation for Index {
        type Env = PortalEnv;

        fn resource(&self) -> ResourceName {
            ResourceName::new("user", "users")
        }

        fn perform(
            &self,
            x: &mut Exec<'_, PortalEnv>,
            params: &Params,
        ) -> Result<(), PerformError> {
            tracing::debug!("listing users");
            x.skip_authorize();
            let scope = x.policy_scope(USER_KIND);
            let mut users = x.env().store().users_scoped(&scope);
            apply_sorting(&mut users, params, &sort_columns(), "id", SortDirection::Desc);

            x.set_model(Model::fields(vec![(
                "users",
                Field::listing(users.into_iter().map(Record::User).collect()),
            )]));
            Ok(())
        }
    }

    /// Single user lookup, authorized per record.
    pub struct Show;

    impl Operation for Show {
        type Env = PortalEnv;

        fn resource(&self) -> ResourceName {
            ResourceName::new("user", "users")
        }

        fn perform(
            &self,
            x: &mut Exec<'_, PortalEnv>,
            params: &Params,
        ) -> Result<(), PerformError> {
            let id = params.uuid("id").ok_or(Halt::NotFound {
                kind: "user",
                id: None,
            })?;
            tracing::debug!(user_id = %id, "showing user");

            let user = x.env().store().find_user(id)?;
            let record = Record::User(user);
            x.authorize(&record, Action::Show)?;
            x.skip_policy_scope();

            x.set_model(Model::fields(vec![("user", Field::record(record))]));
            Ok(())
        }
    }
}

pub mod dashboard {
    use opkit::{Exec, Field, Model, Operation, Params, PerformError, ResourceName};

    use crate::env::PortalEnv;
    use crate::models::{COMPANY_KIND, Record, USER_KIND};

    /// Admin landing: scoped counts and listings.
    ///
    /// A principal without admin access gets empty listings through the
    /// deny-all scope, not a denial.
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
            tracing::debug!("building admin dashboard");
            x.skip_authorize();
            let user_scope = x.policy_scope(USER_KIND);
            let company_scope = x.policy_scope(COMPANY_KIND);

            let store = x.env().store();
            let users = store.users_scoped(&user_scope);
            let companies = store.companies_scoped(&company_scope);
            let admins: Vec<_> = users.iter().filter(|u| u.role.is_admin()).cloned().collect();

            x.set_model(Model::fields(vec![
                (
                    "users",
                    Field::listing(users.into_iter().map(Record::User).collect()),
                ),
                (
                    "companies",
                    Field::listing(companies.into_iter().map(Record::Company).collect()),
                ),
                (
                    "admins",
                    Field::listing(admins.into_iter().map(Record::User).collect()),
                ),
            ]));
            Ok(())
        }
    }
}
