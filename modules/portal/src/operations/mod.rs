//! Business-logic units, one per controller action.
//!
//! Every operation either consults the oracle (authorize / policy-scope) or
//! explicitly skips the checks; the dispatcher's guard verifies the
//! bookkeeping.

pub mod admin;
pub mod crm;
pub mod registration;
pub mod screener;
