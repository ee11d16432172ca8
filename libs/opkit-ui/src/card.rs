//! Labeled-information-card config.

use serde::{Deserialize, Serialize};

use crate::btn::BtnConfig;

/// One icon/label/value triple in a grid section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoItem {
    pub icon: Option<String>,
    pub label: Option<String>,
    pub value: Option<String>,
}

impl InfoItem {
    #[must_use]
    pub fn new(
        icon: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            icon: Some(icon.into()),
            label: Some(label.into()),
            value: Some(value.into()),
        }
    }
}

/// How a section's content is laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[default]
    Grid,
    Actions,
}

/// One card section: a titled grid of items or a row of actions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSection {
    pub title: Option<String>,
    pub kind: SectionKind,
    pub items: Vec<InfoItem>,
    pub actions: Vec<BtnConfig>,
}

/// Generic labeled-information-card config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformationCardConfig {
    /// Short avatar text (initials) for the header circle.
    pub avatar: Option<String>,
    pub header_title: Option<String>,
    pub header_subtitle: Option<String>,
    pub badge: Option<String>,
    pub sections: Vec<CardSection>,
}

impl InformationCardConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn header(
        mut self,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        self.header_title = Some(title.into());
        self.header_subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    #[must_use]
    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn add_section(&mut self, title: Option<&str>, items: Vec<InfoItem>) {
        self.sections.push(CardSection {
            title: title.map(ToOwned::to_owned),
            kind: SectionKind::Grid,
            items,
            actions: Vec::new(),
        });
    }

    pub fn add_actions(&mut self, title: Option<&str>, actions: Vec<BtnConfig>) {
        self.sections.push(CardSection {
            title: title.map(ToOwned::to_owned),
            kind: SectionKind::Actions,
            items: Vec::new(),
            actions,
        });
    }
}
