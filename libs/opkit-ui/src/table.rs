//! Tabular renderer config.

use serde::{Deserialize, Serialize};

use crate::btn::BtnConfig;

/// Horizontal cell alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

/// Responsive breakpoint below which a column stacks or hides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Sm,
    Md,
    Lg,
    Xl,
}

/// Current sort state, for rendering the header arrow and the next link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSort {
    pub field: String,
    pub direction: String,
}

/// One column: header, optional sort link, responsive rules.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub header: Option<String>,
    /// Sort key; a column without one renders a plain header.
    pub sort_field: Option<String>,
    /// Base path the sort link points at.
    pub sort_path: Option<String>,
    pub align: Align,
    /// Hide the column entirely below this breakpoint.
    pub hide_below: Option<Breakpoint>,
    /// Stack this column's values into the named column below the breakpoint.
    pub stack_into: Option<String>,
}

impl TableColumn {
    #[must_use]
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sortable(mut self, field: impl Into<String>, path: impl Into<String>) -> Self {
        self.sort_field = Some(field.into());
        self.sort_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn hide_below(mut self, breakpoint: Breakpoint) -> Self {
        self.hide_below = Some(breakpoint);
        self
    }

    #[must_use]
    pub fn stack_into(mut self, column: impl Into<String>) -> Self {
        self.stack_into = Some(column.into());
        self
    }
}

/// One rendered cell value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Text(String),
    /// Action cell: a row of buttons, end-aligned by the renderer.
    Buttons(Vec<BtnConfig>),
}

impl Cell {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// One table row: cells in column order, plus a stable row id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<Cell>,
}

/// Generic tabular renderer config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    /// The sort currently applied, if any.
    pub sort: Option<TableSort>,
    /// Shown when `rows` is empty.
    pub empty_text: Option<String>,
}

impl TableConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(&mut self, column: TableColumn) {
        self.columns.push(column);
    }

    pub fn add_row(&mut self, id: impl Into<String>, cells: Vec<Cell>) {
        self.rows.push(TableRow {
            id: id.into(),
            cells,
        });
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Option<TableSort>) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn with_empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = Some(text.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btn::{BtnConfig, BtnType};

    #[test]
    fn table_assembles_columns_and_rows() {
        let mut table = TableConfig::new().with_empty_text("No users yet");
        table.add_column(TableColumn::new("Name").sortable("name", "/admin/users"));
        table.add_column(TableColumn::new("Email").hide_below(Breakpoint::Md));
        table.add_column(TableColumn::default().align(Align::End));

        table.add_row(
            "row-1",
            vec![
                Cell::text("One"),
                Cell::text("one@example.com"),
                Cell::Buttons(vec![BtnConfig::new(BtnType::Show).path("/admin/users/1")]),
            ],
        );

        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.columns[0].sort_field.as_deref(), Some("name"));
        assert_eq!(table.columns[1].hide_below, Some(Breakpoint::Md));
    }
}
