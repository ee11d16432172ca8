//! CRM realm components.

pub mod dashboard {
    use opkit::{Component, ComponentInput};
    use opkit_ui::{InfoItem, InformationCardConfig, TitleRowConfig, View};

    use crate::components::format_date;
    use crate::models::Record;

    /// CRM landing for the signed-in business user.
    pub struct Index;

    impl Component for Index {
        type Entity = Record;

        fn build(&self, input: &ComponentInput<Record>) -> View {
            let title = View::TitleRow(TitleRowConfig::new("CRM dashboard").divider());

            let Some(user) = input.record("user").and_then(Record::as_user) else {
                return title;
            };

            let mut card = InformationCardConfig::new()
                .avatar(user.initial())
                .header(&user.name, &user.email)
                .badge(user.role.as_str());
            card.add_section(
                Some("Account"),
                vec![
                    InfoItem::new("shield", "Role", user.role.as_str()),
                    InfoItem::new("calendar", "Member since", format_date(user.created_at)),
                ],
            );

            View::Fragment(vec![title, View::Card(card)])
        }
    }
}

pub mod company {
    use opkit::{Component, ComponentInput, Entity};
    use opkit_ui::{BtnConfig, BtnType, FieldKind, FormConfig, FormField, TitleRowConfig, View};

    use crate::models::Record;

    /// Company settings form; renders the scoped company or an empty state.
    pub struct EditForm;

    impl Component for EditForm {
        type Entity = Record;

        fn build(&self, input: &ComponentInput<Record>) -> View {
            let title = View::TitleRow(TitleRowConfig::new("Company settings").divider());

            let Some(company) = input.record("company").and_then(Record::as_company) else {
                return View::Fragment(vec![
                    title,
                    View::TitleRow(TitleRowConfig::new("No company yet")),
                ]);
            };

            let record = Record::Company(company.clone());
            let mut form = FormConfig::new("/crm/company", "patch")
                .submit(BtnConfig::new(BtnType::Save).text("Save").submit())
                .error_summary(record.record_errors().all_messages());
            form.add_field(
                FormField::new("company_name", "Company name", FieldKind::Text)
                    .value(&company.name)
                    .errors(company.errors.messages_for("name").to_vec()),
            );

            View::Fragment(vec![title, View::Form(form)])
        }
    }
}
