//! Security primitives for the opkit operation framework.
//!
//! - [`Principal`], [`Role`], [`SecurityContext`] - the acting subject
//! - [`Action`], [`ResourceRef`] - the policy evaluation model
//! - [`PolicyOracle`] - the authorization oracle trait realms implement
//! - [`AccessScope`] - row-level filter describing what a principal may see
//! - [`NotAuthorized`] - the authorization-denied fault

pub mod access_scope;
pub mod context;
pub mod policy;

pub use access_scope::{AccessScope, FilterOp, Scopable, ScopeConstraint, ScopeFilter, properties};
pub use context::{Principal, Role, SecurityContext};
pub use policy::{Action, NotAuthorized, PolicyName, PolicyOracle, ResourceRef};
