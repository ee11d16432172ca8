//! Sign-up form component.

use opkit::{Component, ComponentInput};
use opkit_ui::{BtnConfig, BtnType, FieldKind, FormConfig, FormField, TitleRowConfig, View};

use crate::models::Record;

/// The registration form, re-rendered with errors on failed submissions.
pub struct SignupForm;

impl Component for SignupForm {
    type Entity = Record;

    fn build(&self, input: &ComponentInput<Record>) -> View {
        let user = input.record("user").and_then(Record::as_user);

        let value_of = |param: &str, stored: Option<&str>| {
            input
                .params
                .get(param)
                .or(stored)
                .map(ToOwned::to_owned)
                .unwrap_or_default()
        };

        let errors_for = |field: &str| {
            user.map(|u| u.errors.messages_for(field).to_vec())
                .unwrap_or_default()
        };

        let mut form = FormConfig::new("/users", "post")
            .submit(BtnConfig::new(BtnType::Save).text("Sign up").submit())
            .error_summary(
                user.map(|u| u.errors.all_messages()).unwrap_or_default(),
            );

        form.add_field(
            FormField::new("name", "Name", FieldKind::Text)
                .value(value_of("name", user.map(|u| u.name.as_str())))
                .errors(errors_for("name")),
        );
        form.add_field(
            FormField::new("email", "Email", FieldKind::Email)
                .value(value_of("email", user.map(|u| u.email.as_str())))
                .errors(errors_for("email")),
        );
        form.add_field(
            FormField::new("password", "Password", FieldKind::Password).errors(errors_for("password")),
        );
        form.add_field(
            FormField::new(
                "password_confirmation",
                "Password confirmation",
                FieldKind::Password,
            )
            .errors(errors_for("password_confirmation")),
        );
        form.add_field(
            FormField::new("register_company", "Register a company", FieldKind::Checkbox)
                .value(value_of("register_company", None))
                .errors(errors_for("company")),
        );
        form.add_field(
            FormField::new("company_name", "Company name", FieldKind::Text)
                .value(value_of("company_name", None)),
        );

        View::Fragment(vec![
            View::TitleRow(TitleRowConfig::new("Sign up").divider()),
            View::Form(form),
        ])
    }
}
