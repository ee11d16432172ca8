//! Portal domain module.
//!
//! Three access realms share one operation protocol:
//!
//! - **Admin** - user directory administration (admin role only)
//! - **CRM** - company management for business users (admin, owner,
//!   employee, manager)
//! - **Screener** - the consumer-facing area (anonymous, customer, admin)
//!
//! ## Layering
//!
//! - `models` - `User`, `Company`, and the `Record` enum the protocol
//!   carries
//! - `storage` - the in-memory directory standing in for the external
//!   relational store (unique indexes, referential actions, snapshot
//!   transactions)
//! - `policies` - the realm rule sets behind the `PolicyOracle` trait
//! - `operations` - business-logic units per realm
//! - `components` - view-config builders per realm

pub mod components;
pub mod env;
pub mod models;
pub mod operations;
pub mod policies;
pub mod storage;
pub mod test_support;

pub use env::PortalEnv;
pub use models::{COMPANY_KIND, Company, Record, USER_KIND, User};
pub use policies::{PortalPolicies, Realm};
pub use storage::{Directory, StoreError};
