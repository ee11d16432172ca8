//! Shared chrome: navbar and sidebars, realm-aware.

use opkit_auth::{Principal, Role, SecurityContext};
use opkit_ui::{NavConfig, NavItem, View};

use crate::policies::{PortalPolicies, Realm};

fn is_active(current_path: &str, path: &str) -> bool {
    // The admin root doubles as the dashboard path.
    if path == "/admin/dashboard" {
        return current_path == "/admin" || current_path.starts_with("/admin/dashboard");
    }
    current_path.starts_with(path)
}

fn display_name(principal: &Principal) -> String {
    if principal.name.is_empty() {
        principal
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_owned()
    } else {
        principal.name.clone()
    }
}

/// Top navigation: realm entries the principal may actually enter.
#[must_use]
pub fn navbar(ctx: &SecurityContext, current_path: &str) -> View {
    let mut nav = NavConfig::new("Atrium");

    if PortalPolicies::realm_access(ctx, Realm::Screener) {
        nav.add_item(
            NavItem::new("Screener", "/screener")
                .icon("search")
                .active(is_active(current_path, "/screener")),
        );
    }
    if PortalPolicies::realm_access(ctx, Realm::Crm) {
        nav.add_item(
            NavItem::new("CRM", "/crm")
                .icon("briefcase")
                .active(is_active(current_path, "/crm")),
        );
    }
    if PortalPolicies::realm_access(ctx, Realm::Admin) {
        nav.add_item(
            NavItem::new("Admin", "/admin")
                .icon("gear")
                .active(current_path.starts_with("/admin")),
        );
    }
    match ctx.principal() {
        Some(principal) => nav.add_item(NavItem::new(display_name(principal), "/crm")),
        None => nav.add_item(NavItem::new("Sign up", "/users/sign_up")),
    }

    View::Nav(nav)
}

/// Realm sidebar.
#[must_use]
pub fn sidebar(ctx: &SecurityContext, realm: Realm, current_path: &str) -> View {
    let mut nav = NavConfig::new(match realm {
        Realm::Admin => "Administration",
        Realm::Crm => "CRM",
        Realm::Screener => "Screener",
    });

    match realm {
        Realm::Admin => {
            nav.add_item(
                NavItem::new("Dashboard", "/admin/dashboard")
                    .icon("speedometer")
                    .active(is_active(current_path, "/admin/dashboard")),
            );
            nav.add_item(
                NavItem::new("Users", "/admin/users")
                    .icon("people")
                    .active(is_active(current_path, "/admin/users")),
            );
        }
        Realm::Crm => {
            nav.add_item(
                NavItem::new("Dashboard", "/crm")
                    .icon("speedometer")
                    .active(current_path == "/crm"),
            );
            if matches!(ctx.role(), Some(Role::Owner | Role::Admin)) {
                nav.add_item(
                    NavItem::new("Company", "/crm/company/edit")
                        .icon("building")
                        .active(is_active(current_path, "/crm/company")),
                );
            }
        }
        Realm::Screener => {
            nav.add_item(
                NavItem::new("Home", "/screener")
                    .icon("house")
                    .active(is_active(current_path, "/screener")),
            );
        }
    }

    View::Nav(nav)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ctx(role: Role) -> SecurityContext {
        SecurityContext::for_principal(Principal {
            id: Uuid::new_v4(),
            email: "one@example.com".to_owned(),
            name: "One".to_owned(),
            role,
            company_id: None,
        })
    }

    fn items(view: &View) -> Vec<String> {
        match view {
            View::Nav(nav) => nav.items.iter().map(|i| i.text.clone()).collect(),
            _ => panic!("expected nav"),
        }
    }

    #[test]
    fn navbar_shows_only_accessible_realms() {
        let admin_items = items(&navbar(&ctx(Role::Admin), "/admin"));
        assert!(admin_items.contains(&"Admin".to_owned()));
        assert!(admin_items.contains(&"CRM".to_owned()));

        let customer_items = items(&navbar(&ctx(Role::Customer), "/"));
        assert!(!customer_items.contains(&"Admin".to_owned()));
        assert!(!customer_items.contains(&"CRM".to_owned()));
        assert!(customer_items.contains(&"Screener".to_owned()));

        let anonymous_items = items(&navbar(&SecurityContext::anonymous(), "/"));
        assert!(anonymous_items.contains(&"Sign up".to_owned()));
    }

    #[test]
    fn admin_root_marks_dashboard_active() {
        let view = sidebar(&ctx(Role::Admin), Realm::Admin, "/admin");
        let View::Nav(nav) = view else { panic!("expected nav") };
        let dashboard = nav.items.iter().find(|i| i.text == "Dashboard").unwrap();
        assert!(dashboard.active);
    }

    #[test]
    fn crm_sidebar_hides_company_from_employees() {
        let view = sidebar(&ctx(Role::Employee), Realm::Crm, "/crm");
        let View::Nav(nav) = view else { panic!("expected nav") };
        assert!(!nav.items.iter().any(|i| i.text == "Company"));
    }
}
