//! Operation framework.
//!
//! The request-handling protocol shared by every realm:
//!
//! - [`OpResult`] - the typed outcome container (model, redirect, notice,
//!   errors, sub-results)
//! - [`Operation`] - a single business-logic unit producing an [`OpResult`],
//!   with authorization helpers and sub-operation composition on [`Exec`]
//! - [`endpoint`] - the dispatcher mapping an operation's result to a
//!   response shape (redirect, rendered component, script directive, search
//!   payload) by requested format and controller action
//! - [`Component`] - pure view-config builders consumed by the dispatcher's
//!   render path
//!
//! Data flow: request → handler → `endpoint(op, component, ..)` →
//! `run(op, ..)` → [`OpResult`] → response selection.

pub mod component;
pub mod endpoint;
pub mod operation;
pub mod params;
pub mod result;
pub mod sortable;

#[cfg(test)]
pub(crate) mod tests_support;

pub use component::{Component, ComponentInput, InputData};
pub use endpoint::{
    ActionKind, ActionName, EndpointCall, Flash, Pagination, Response, ResponseFormat, Script,
    SearchPayload, endpoint, guard_satisfied,
};
pub use operation::{Entity, Exec, Halt, OpEnv, Operation, PerformError, ResourceName, run};
pub use params::Params;
pub use result::{ErrorBag, Field, Listing, Model, Notice, NoticeLevel, OpResult, SearchHit};
pub use sortable::{SortColumn, SortDirection, apply_sorting};
