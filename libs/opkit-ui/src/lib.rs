//! View component configs.
//!
//! Pure data describing what to render: buttons, tables, information cards,
//! title rows, forms, and navigation. Components build these trees; the
//! template renderer that turns them into markup is an external collaborator
//! and never appears here.

pub mod btn;
pub mod card;
pub mod form;
pub mod nav;
pub mod table;
pub mod title_row;
pub mod view;

pub use btn::{BtnConfig, BtnSize, BtnType};
pub use card::{CardSection, InfoItem, InformationCardConfig, SectionKind};
pub use form::{FieldKind, FormConfig, FormField};
pub use nav::{NavConfig, NavItem};
pub use table::{Align, Breakpoint, Cell, TableColumn, TableConfig, TableRow, TableSort};
pub use title_row::TitleRowConfig;
pub use view::View;
