//! Page title row config.

use serde::{Deserialize, Serialize};

/// Title row with an optional back link and divider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRowConfig {
    pub title: Option<String>,
    pub back_path: Option<String>,
    pub back_text: Option<String>,
    pub divider: bool,
}

impl TitleRowConfig {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn back(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.back_path = Some(path.into());
        self.back_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn divider(mut self) -> Self {
        self.divider = true;
        self
    }
}
