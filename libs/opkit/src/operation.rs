//! The operation protocol: single-use business-logic units producing an
//! [`OpResult`].
//!
//! ## Failure semantics
//!
//! `perform` returns an explicit error instead of unwinding:
//!
//! | `perform` returns | Meaning | Handling |
//! |---|---|---|
//! | `Ok(())` | unit of work done | result finalized as-is |
//! | `Err(PerformError::Invalid(bag))` | record/business validation failed | [`run`] absorbs the bag into a failed result |
//! | `Err(PerformError::Halt(..))` | not-authorized / not-found / unexpected | propagates past the operation boundary |
//!
//! Authorization and scoping must be either performed or explicitly skipped
//! in every `perform`; the dispatcher verifies the bookkeeping flags
//! ([`crate::endpoint::guard_satisfied`]).

use uuid::Uuid;

use opkit_auth::{Action, NotAuthorized, PolicyOracle, ResourceRef, SecurityContext};
use opkit_auth::access_scope::AccessScope;

use crate::params::Params;
use crate::result::{ErrorBag, Model, NoticeLevel, OpResult, SearchHit};

/// A domain record usable by the operation protocol.
///
/// Records expose their own validation error collection (participating in
/// the result's success derivation), a policy-facing projection, and a
/// search projection for typeahead payloads.
pub trait Entity: Clone + std::fmt::Debug {
    /// The record's own validation errors.
    fn record_errors(&self) -> &ErrorBag;

    /// Policy-facing projection for authorization checks.
    fn resource(&self) -> ResourceRef;

    /// Lightweight projection for search widgets.
    fn search_hit(&self) -> SearchHit;
}

/// The application dependency container operations run against.
///
/// Exposes the authorization oracle; applications extend it with their own
/// collaborators (stores, clocks) on the concrete type.
pub trait OpEnv {
    type Entity: Entity;

    /// The authorization oracle consulted by [`Exec::authorize`] and
    /// [`Exec::policy_scope`].
    fn oracle(&self) -> &dyn PolicyOracle;
}

/// A fault that unwinds past the operation boundary.
///
/// Not caught by [`run`]; the outer handler translates it (redirect + flash
/// for denials, 404 for missing records).
#[derive(Debug, thiserror::Error)]
pub enum Halt {
    #[error(transparent)]
    NotAuthorized(#[from] NotAuthorized),

    #[error("{kind} not found")]
    NotFound {
        kind: &'static str,
        id: Option<Uuid>,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl Halt {
    #[must_use]
    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            kind,
            id: Some(id),
        }
    }
}

/// Error returned by [`Operation::perform`].
#[derive(Debug, thiserror::Error)]
pub enum PerformError {
    /// The recoverable "record invalid" signal: absorbed by [`run`] into a
    /// failed result instead of propagating.
    #[error("record invalid")]
    Invalid(ErrorBag),

    /// Unwinds past the operation boundary uncaught.
    #[error(transparent)]
    Halt(#[from] Halt),
}

impl From<NotAuthorized> for PerformError {
    fn from(e: NotAuthorized) -> Self {
        Self::Halt(Halt::NotAuthorized(e))
    }
}

impl PerformError {
    /// An invalid signal carrying a single whole-record message.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        let mut bag = ErrorBag::new();
        bag.add_base(message);
        Self::Invalid(bag)
    }
}

/// Name pair the dispatcher uses to key component input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceName {
    pub singular: &'static str,
    pub plural: &'static str,
}

impl ResourceName {
    #[must_use]
    pub const fn new(singular: &'static str, plural: &'static str) -> Self {
        Self { singular, plural }
    }
}

/// A single business-logic unit.
///
/// Instances are single-use: [`run`] invokes `perform` exactly once and the
/// instance is discarded with its result.
pub trait Operation {
    type Env: OpEnv;

    /// The name pair used to key component input for this operation's model.
    fn resource(&self) -> ResourceName;

    /// The unit of work. Mutates the owned result through [`Exec`] setters.
    fn perform(
        &self,
        x: &mut Exec<'_, Self::Env>,
        params: &Params,
    ) -> Result<(), PerformError>;

    /// Post-run hook invoked after error finalization, for operations that
    /// reshape their model once the outcome is known.
    fn finish(&self, result: &mut OpResult<<Self::Env as OpEnv>::Entity>) {
        let _ = result;
    }
}

/// Execution context handed to [`Operation::perform`].
///
/// Owns the in-progress result and provides the protected setters plus the
/// authorization helpers and sub-operation composition.
pub struct Exec<'a, V: OpEnv> {
    env: &'a V,
    ctx: &'a SecurityContext,
    result: OpResult<V::Entity>,
}

impl<'a, V: OpEnv> Exec<'a, V> {
    fn new(env: &'a V, ctx: &'a SecurityContext) -> Self {
        Self {
            env,
            ctx,
            result: OpResult::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn env(&self) -> &'a V {
        self.env
    }

    #[inline]
    #[must_use]
    pub fn ctx(&self) -> &'a SecurityContext {
        self.ctx
    }

    // ── Result setters ──────────────────────────────────────────────

    pub fn set_model(&mut self, model: Model<V::Entity>) {
        self.result.set_model(model);
    }

    #[must_use]
    pub fn model(&self) -> &Model<V::Entity> {
        self.result.model()
    }

    pub fn set_redirect_path(&mut self, path: impl Into<String>) {
        self.result.set_redirect_path(path);
    }

    pub fn notice(&mut self, text: impl Into<String>, level: NoticeLevel) {
        self.result.set_notice(text, level);
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.result.add_error(field, message);
    }

    pub fn add_errors(&mut self, from: &ErrorBag) {
        self.result.add_errors(from);
    }

    pub fn force_invalid(&mut self) {
        self.result.force_invalid();
    }

    pub fn set_ext(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.result.set_ext(key, value);
    }

    // ── Authorization helpers ───────────────────────────────────────

    /// Consult the oracle for (principal, record, action).
    ///
    /// Records on the result that authorization was attempted; a denial
    /// halts the operation and propagates to the centralized handler.
    pub fn authorize(
        &mut self,
        record: &V::Entity,
        action: Action,
    ) -> Result<(), PerformError> {
        self.env.oracle().can(self.ctx, action, &record.resource())?;
        self.result.mark_authorized();
        Ok(())
    }

    /// Ask the oracle for a pre-filtered scope over `kind`.
    ///
    /// Records on the result that scoping was attempted.
    pub fn policy_scope(&mut self, kind: &str) -> AccessScope {
        self.result.mark_scoped();
        self.env.oracle().scope_for(self.ctx, kind)
    }

    /// Explicitly declare that no authorization check is needed.
    pub fn skip_authorize(&mut self) {
        self.result.mark_authorized();
    }

    /// Explicitly declare that no scoping is needed.
    pub fn skip_policy_scope(&mut self) {
        self.result.mark_scoped();
    }

    // ── Sub-operation composition ───────────────────────────────────

    /// Run a nested operation and append its result to the sub-results.
    ///
    /// A failing sub-operation copies its errors into this result and
    /// returns the same invalid signal the outer [`run`] wrapper absorbs —
    /// one error-reporting channel for the whole workflow. On success the
    /// sub-result is returned for further use.
    pub fn run_sub<O>(
        &mut self,
        op: &O,
        params: &Params,
    ) -> Result<OpResult<V::Entity>, PerformError>
    where
        O: Operation<Env = V>,
    {
        let sub = execute(op, self.env, params, self.ctx)?;
        let failed = sub.is_failure();
        let sub_errors = sub.errors().clone();
        self.result.push_sub_result(sub.clone());
        if failed {
            self.result.add_errors(&sub_errors);
            return Err(PerformError::Invalid(ErrorBag::new()));
        }
        Ok(sub)
    }

    /// Like [`run_sub`](Self::run_sub), but the caller handles failures:
    /// the sub-result is recorded and returned without propagating errors.
    pub fn run_sub_manual<O>(
        &mut self,
        op: &O,
        params: &Params,
    ) -> Result<OpResult<V::Entity>, PerformError>
    where
        O: Operation<Env = V>,
    {
        let sub = execute(op, self.env, params, self.ctx)?;
        self.result.push_sub_result(sub.clone());
        Ok(sub)
    }
}

/// Run an operation to completion, producing its result.
///
/// The static entry point of the protocol: builds the execution context,
/// invokes `perform` exactly once, finalizes error bookkeeping, and hands
/// back the result. Validation failures are absorbed into a failed result;
/// [`Halt`] faults propagate to the caller.
pub fn run<O: Operation>(
    op: &O,
    env: &O::Env,
    params: &Params,
    ctx: &SecurityContext,
) -> Result<OpResult<<O::Env as OpEnv>::Entity>, Halt> {
    execute(op, env, params, ctx)
}

fn execute<O: Operation>(
    op: &O,
    env: &O::Env,
    params: &Params,
    ctx: &SecurityContext,
) -> Result<OpResult<<O::Env as OpEnv>::Entity>, Halt> {
    let mut x = Exec::new(env, ctx);
    match op.perform(&mut x, params) {
        Ok(()) => {}
        Err(PerformError::Invalid(bag)) => {
            x.result.add_errors(&bag);
        }
        Err(PerformError::Halt(halt)) => return Err(halt),
    }
    let mut result = x.result;
    copy_record_errors_to_result(&mut result);
    op.finish(&mut result);
    Ok(result)
}

/// Copy errors attached to the model record into the result's `base` list,
/// deduplicated by message text, so `error_message()` surfaces every
/// user-facing problem regardless of where it originated.
fn copy_record_errors_to_result<E: Entity>(result: &mut OpResult<E>) {
    let Model::Record(record) = result.model() else {
        return;
    };
    let messages: Vec<String> = record.record_errors().all_messages();
    for message in messages {
        if !result.errors().contains(crate::result::BASE, &message) {
            result.add_base_error(message);
        }
    }
}
