//! Screener realm components.

pub mod home {
    use opkit::{Component, ComponentInput};
    use opkit_ui::{BtnConfig, BtnType, TitleRowConfig, View};

    use crate::models::Record;

    /// Consumer landing page.
    pub struct Home;

    impl Component for Home {
        type Entity = Record;

        fn build(&self, input: &ComponentInput<Record>) -> View {
            let title = View::TitleRow(TitleRowConfig::new("Welcome to Atrium").divider());

            match input.record("user").and_then(Record::as_user) {
                Some(user) => View::Fragment(vec![
                    title,
                    View::TitleRow(TitleRowConfig::new(format!("Hello, {}", user.name))),
                ]),
                None => View::Fragment(vec![
                    title,
                    View::Btn(
                        BtnConfig::new(BtnType::Next)
                            .text("Sign up")
                            .path("/users/sign_up"),
                    ),
                ]),
            }
        }
    }
}
