//! Screener realm operations: the consumer-facing area.

pub mod home {
    use opkit::{Exec, Field, Model, Operation, Params, PerformError, ResourceName};

    use crate::env::PortalEnv;
    use crate::models::Record;

    /// Public landing page; anonymous access is part of the realm policy.
    pub struct Index;

    impl Operation for Index {
        type Env = PortalEnv;

        fn resource(&self) -> ResourceName {
            ResourceName::new("user", "users")
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
