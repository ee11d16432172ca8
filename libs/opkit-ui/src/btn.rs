//! Input-control button config.

use serde::{Deserialize, Serialize};

/// Semantic button type; selects the icon and the visual treatment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BtnType {
    Add,
    Cancel,
    Check,
    Edit,
    Next,
    Save,
    Search,
    Show,
    Remove,
}

impl BtnType {
    /// Icon name for the external renderer's icon set.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Add => "plus-circle",
            Self::Cancel => "x-circle",
            Self::Check => "check-circle",
            Self::Edit => "pencil",
            Self::Next => "arrow-right-circle",
            Self::Save => "save",
            Self::Search => "search",
            Self::Show => "eye",
            Self::Remove => "trash",
        }
    }

    /// Whether this type gets the destructive visual treatment.
    #[must_use]
    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Remove)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BtnSize {
    Xs,
    #[default]
    Sm,
    Md,
}

/// Button config: link-style when `path` is set, form-control otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtnConfig {
    #[serde(rename = "type")]
    pub kind: Option<BtnType>,
    pub text: Option<String>,
    pub path: Option<String>,
    pub disabled: bool,
    /// Target modal element id; the renderer wires the toggle.
    pub modal_target: Option<String>,
    pub submit: bool,
    /// HTTP method override for link buttons (e.g. `"delete"`).
    pub method: Option<String>,
    pub size: BtnSize,
    /// Confirmation prompt shown before the action fires.
    pub confirm: Option<String>,
}

impl BtnConfig {
    #[must_use]
    pub fn new(kind: BtnType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn modal_target(mut self, target: impl Into<String>) -> Self {
        self.modal_target = Some(target.into());
        self
    }

    #[must_use]
    pub fn submit(mut self) -> Self {
        self.submit = true;
        self
    }

    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    #[must_use]
    pub fn size(mut self, size: BtnSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn confirm(mut self, prompt: impl Into<String>) -> Self {
        self.confirm = Some(prompt.into());
        self
    }
}
