//! Parameter-driven sorting for record listings.

use std::cmp::Ordering;

use crate::params::Params;

/// Sort direction, parsed from the `sort_direction` parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `"asc"` sorts ascending; anything else descends.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A sortable column: its parameter name and comparator.
pub struct SortColumn<T> {
    pub name: &'static str,
    pub cmp: fn(&T, &T) -> Ordering,
}

impl<T> SortColumn<T> {
    #[must_use]
    pub fn new(name: &'static str, cmp: fn(&T, &T) -> Ordering) -> Self {
        Self { name, cmp }
    }
}

/// Sort `items` by the `sort_by`/`sort_direction` parameters against an
/// allow-list of columns.
///
/// Unknown columns and absent parameters fall back to the default column and
/// direction. Returns the `(column, direction)` actually applied, or `None`
/// when the default column is not in the allow-list.
pub fn apply_sorting<T>(
    items: &mut [T],
    params: &Params,
    allowed: &[SortColumn<T>],
    default_column: &'static str,
    default_direction: SortDirection,
) -> Option<(&'static str, SortDirection)> {
    let requested = params.get("sort_by");
    let (column, direction) = match requested
        .and_then(|name| allowed.iter().find(|c| c.name == name))
    {
        Some(column) => (
            column,
            SortDirection::parse(params.get("sort_direction")),
        ),
        None => (
            allowed.iter().find(|c| c.name == default_column)?,
            default_direction,
        ),
    };

    items.sort_by(|a, b| {
        let ordering = (column.cmp)(a, b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    Some((column.name, direction))
}
