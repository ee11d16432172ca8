//! Navigation config for navbars and sidebars.

use serde::{Deserialize, Serialize};

/// One navigation entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub text: String,
    pub path: String,
    pub icon: Option<String>,
    pub active: bool,
}

impl NavItem {
    #[must_use]
    pub fn new(text: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            path: path.into(),
            icon: None,
            active: false,
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Navbar/sidebar config: a branded list of entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavConfig {
    pub brand: Option<String>,
    pub items: Vec<NavItem>,
}

impl NavConfig {
    #[must_use]
    pub fn new(brand: impl Into<String>) -> Self {
        Self {
            brand: Some(brand.into()),
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: NavItem) {
        self.items.push(item);
    }
}
