//! Admin realm components.

pub mod user {
    use opkit::{Component, ComponentInput};
    use opkit_ui::{
        Breakpoint, BtnConfig, BtnSize, BtnType, Cell, InfoItem, InformationCardConfig,
        TableColumn, TableConfig, TableSort, TitleRowConfig, View,
    };

    use crate::components::format_date;
    use crate::models::Record;

    const SORTING_PATH: &str = "/admin/users";

    fn current_sort(input: &ComponentInput<Record>) -> Option<TableSort> {
        input.params.get("sort_by").map(|field| TableSort {
            field: field.to_owned(),
            direction: input
                .params
                .get("sort_direction")
                .unwrap_or("desc")
                .to_owned(),
        })
    }

    /// Sortable user directory table.
    pub struct UsersTable;

    impl Component for UsersTable {
        type Entity = Record;

        fn build(&self, input: &ComponentInput<Record>) -> View {
            let mut table = TableConfig::new()
                .with_sort(current_sort(input))
                .with_empty_text("No users yet");

            table.add_column(TableColumn::new("Id").sortable("id", SORTING_PATH));
            table.add_column(
                TableColumn::new("Name")
                    .sortable("name", SORTING_PATH)
                    .stack_into("mobile"),
            );
            table.add_column(TableColumn::new("Email").sortable("email", SORTING_PATH));
            table.add_column(
                TableColumn::new("Role")
                    .sortable("role", SORTING_PATH)
                    .hide_below(Breakpoint::Md)
                    .stack_into("mobile"),
            );
            table.add_column(
                TableColumn::new("Created at")
                    .sortable("created_at", SORTING_PATH)
                    .hide_below(Breakpoint::Xl),
            );
            table.add_column(TableColumn::new("Actions"));

            for record in input.listing("users") {
                let Some(user) = record.as_user() else {
                    continue;
                };
                table.add_row(
                    user.id.to_string(),
                    vec![
                        Cell::text(user.id.to_string()),
                        Cell::text(&user.name),
                        Cell::text(&user.email),
                        Cell::text(user.role.as_str()),
                        Cell::text(format_date(user.created_at)),
                        Cell::Buttons(vec![
                            BtnConfig::new(BtnType::Show)
                                .text("View")
                                .path(format!("/admin/users/{}", user.id))
                                .size(BtnSize::Xs),
                            BtnConfig::new(BtnType::Remove)
                                .text("Delete")
                                .method("delete")
                                .confirm("Are you sure?")
                                .size(BtnSize::Xs),
                        ]),
                    ],
                );
            }

            View::Fragment(vec![
                View::TitleRow(TitleRowConfig::new("Users").divider()),
                View::Table(table),
            ])
        }
    }

    /// Single-user information card.
    pub struct UserCard;

    impl Component for UserCard {
        type Entity = Record;

        fn build(&self, input: &ComponentInput<Record>) -> View {
            let Some(user) = input.record("user").and_then(Record::as_user) else {
                return View::Empty;
            };

            let mut card = InformationCardConfig::new()
                .avatar(user.initial())
                .header(&user.name, &user.email)
                .badge(user.role.as_str());

            card.add_section(
                Some("Personal information"),
                vec![
                    InfoItem::new("person", "Name", &user.name),
                    InfoItem::new("envelope", "Email", &user.email),
                    InfoItem::new("shield", "Role", user.role.as_str()),
                    InfoItem::new("calendar", "Created", format_date(user.created_at)),
                ],
            );

            View::Fragment(vec![
                View::TitleRow(
                    TitleRowConfig::new(&user.name).back("/admin/users", "Back to users"),
                ),
                View::Card(card),
            ])
        }
    }
}

pub mod dashboard {
    use opkit::{Component, ComponentInput};
    use opkit_ui::{TitleRowConfig, View};

    use crate::models::Record;

    /// Admin landing: directory counts.
    pub struct Index;

    impl Component for Index {
        type Entity = Record;

        fn build(&self, input: &ComponentInput<Record>) -> View {
            let stat = |label: &str, count: usize| View::Stat {
                label: label.to_owned(),
                value: count as u64,
            };

            View::Fragment(vec![
                View::TitleRow(TitleRowConfig::new("Admin dashboard").divider()),
                stat("Users", input.listing("users").len()),
                stat("Companies", input.listing("companies").len()),
                stat("Admins", input.listing("admins").len()),
            ])
        }
    }
}
