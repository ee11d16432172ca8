//! The renderable view tree.

use serde::{Deserialize, Serialize};

use crate::btn::BtnConfig;
use crate::card::InformationCardConfig;
use crate::form::FormConfig;
use crate::nav::NavConfig;
use crate::table::TableConfig;
use crate::title_row::TitleRowConfig;

/// A node of renderable config.
///
/// Serialized as-is to the external template collaborator, which turns the
/// tree into markup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Empty,
    TitleRow(TitleRowConfig),
    Table(TableConfig),
    Card(InformationCardConfig),
    Btn(BtnConfig),
    Form(FormConfig),
    Nav(NavConfig),
    /// A labeled count tile for dashboards.
    Stat { label: String, value: u64 },
    /// Ordered children rendered in sequence.
    Fragment(Vec<View>),
}

impl View {
    /// Depth-first search for the first node matching a predicate.
    pub fn find(&self, predicate: &impl Fn(&View) -> bool) -> Option<&View> {
        if predicate(self) {
            return Some(self);
        }
        if let Self::Fragment(children) = self {
            children.iter().find_map(|child| child.find(predicate))
        } else {
            None
        }
    }
}

impl Default for View {
    fn default() -> Self {
        Self::Empty
    }
}
