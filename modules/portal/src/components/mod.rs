//! View-config builders, one per screen plus the shared chrome.

pub mod admin;
pub mod crm;
pub mod registration;
pub mod screener;
pub mod shared;

use time::OffsetDateTime;
use time::macros::format_description;

/// Dates render as `dd.mm.yyyy` across every table and card.
#[must_use]
pub fn format_date(date: OffsetDateTime) -> String {
    date.format(format_description!("[day].[month].[year]"))
        .unwrap_or_default()
}
