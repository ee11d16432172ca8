//! The typed outcome container produced by every operation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::operation::Entity;

/// Field key for whole-record errors.
pub const BASE: &str = "base";

/// Severity of a user-facing notice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    #[default]
    Notice,
    Success,
    Warning,
    Alert,
}

/// Flash-style user feedback attached to a result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
}

/// Lightweight projection of a record for search widgets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub text: String,
}

/// Error collection keyed by field name, in insertion order.
///
/// `base` ([`BASE`]) is the convention for errors not tied to a specific
/// attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBag(Vec<(String, Vec<String>)>);

impl ErrorBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message under a field key.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        if let Some((_, messages)) = self.0.iter_mut().find(|(f, _)| *f == field) {
            messages.push(message);
        } else {
            self.0.push((field, vec![message]));
        }
    }

    /// Append a whole-record error.
    pub fn add_base(&mut self, message: impl Into<String>) {
        self.add(BASE, message);
    }

    /// Merge another bag into this one, field by field.
    pub fn merge(&mut self, other: &ErrorBag) {
        for (field, messages) in &other.0 {
            for message in messages {
                self.add(field.clone(), message.clone());
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, messages)| messages.is_empty())
    }

    /// Messages recorded under one field.
    #[must_use]
    pub fn messages_for(&self, field: &str) -> &[String] {
        self.0
            .iter()
            .find(|(f, _)| f == field)
            .map_or(&[], |(_, messages)| messages.as_slice())
    }

    #[must_use]
    pub fn contains(&self, field: &str, message: &str) -> bool {
        self.messages_for(field).iter().any(|m| m == message)
    }

    /// Every message across every field, in field insertion order.
    #[must_use]
    pub fn all_messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(_, messages)| messages.iter().cloned())
            .collect()
    }

    /// Iterate `(field, messages)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

/// A record listing plus the "more pages exist" flag for search payloads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing<E> {
    pub items: Vec<E>,
    pub has_more: bool,
}

impl<E> Default for Listing<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
        }
    }
}

impl<E> Listing<E> {
    #[must_use]
    pub fn new(items: Vec<E>) -> Self {
        Self {
            items,
            has_more: false,
        }
    }

    #[must_use]
    pub fn with_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<E> From<Vec<E>> for Listing<E> {
    fn from(items: Vec<E>) -> Self {
        Self::new(items)
    }
}

/// Value of a single named model field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field<E> {
    Record(Option<E>),
    Listing(Listing<E>),
}

impl<E> Field<E> {
    #[must_use]
    pub fn record(record: E) -> Self {
        Self::Record(Some(record))
    }

    #[must_use]
    pub fn listing(items: Vec<E>) -> Self {
        Self::Listing(Listing::new(items))
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&E> {
        match self {
            Self::Record(record) => record.as_ref(),
            Self::Listing(_) => None,
        }
    }

    #[must_use]
    pub fn as_listing(&self) -> Option<&Listing<E>> {
        match self {
            Self::Listing(listing) => Some(listing),
            Self::Record(_) => None,
        }
    }
}

/// The model carried by a result.
///
/// A tagged variant the dispatcher pattern-matches on: either one record,
/// one scoped listing, or a set of named fields, never an untyped bag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Model<E> {
    None,
    /// A single persisted record; its own error collection participates in
    /// the success derivation.
    Record(E),
    /// A scoped record listing.
    Listing(Listing<E>),
    /// Named fields for composite screens (dashboards, forms).
    Fields(Vec<(&'static str, Field<E>)>),
}

impl<E> Default for Model<E> {
    fn default() -> Self {
        Self::None
    }
}

impl<E> Model<E> {
    #[must_use]
    pub fn fields(fields: Vec<(&'static str, Field<E>)>) -> Self {
        Self::Fields(fields)
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The single record, if this model is one.
    #[must_use]
    pub fn as_record(&self) -> Option<&E> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Look up a named field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field<E>> {
        match self {
            Self::Fields(fields) => fields
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

/// Outcome of one operation invocation.
///
/// Created empty at the start of a run, mutated through [`Exec`] setters
/// during `perform`, and treated as immutable once returned.
///
/// [`Exec`]: crate::operation::Exec
#[derive(Clone, Debug)]
pub struct OpResult<E> {
    model: Model<E>,
    redirect_path: Option<String>,
    notice: Option<Notice>,
    errors: ErrorBag,
    sub_results: Vec<OpResult<E>>,
    forced_invalid: bool,
    authorization_checked: bool,
    scope_checked: bool,
    ext: BTreeMap<String, serde_json::Value>,
}

impl<E> Default for OpResult<E> {
    fn default() -> Self {
        Self {
            model: Model::None,
            redirect_path: None,
            notice: None,
            errors: ErrorBag::new(),
            sub_results: Vec::new(),
            forced_invalid: false,
            authorization_checked: false,
            scope_checked: false,
            ext: BTreeMap::new(),
        }
    }
}

impl<E> OpResult<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Model / redirect / notice ───────────────────────────────────

    #[inline]
    #[must_use]
    pub fn model(&self) -> &Model<E> {
        &self.model
    }

    pub fn set_model(&mut self, model: Model<E>) {
        self.model = model;
    }

    /// Take the model out, leaving [`Model::None`].
    #[must_use]
    pub fn take_model(&mut self) -> Model<E> {
        std::mem::take(&mut self.model)
    }

    #[inline]
    #[must_use]
    pub fn redirect_path(&self) -> Option<&str> {
        self.redirect_path.as_deref()
    }

    pub fn set_redirect_path(&mut self, path: impl Into<String>) {
        self.redirect_path = Some(path.into());
    }

    pub fn set_notice(&mut self, text: impl Into<String>, level: NoticeLevel) {
        self.notice = Some(Notice {
            text: text.into(),
            level,
        });
    }

    /// The notice text, for flash-style display.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.text.as_str())
    }

    /// The notice severity.
    #[must_use]
    pub fn message_level(&self) -> Option<NoticeLevel> {
        self.notice.as_ref().map(|n| n.level)
    }

    // ── Errors ──────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    pub fn add_base_error(&mut self, message: impl Into<String>) {
        self.errors.add_base(message);
    }

    pub fn add_errors(&mut self, from: &ErrorBag) {
        self.errors.merge(from);
    }

    /// Mark the result failed regardless of the error collection state.
    pub fn force_invalid(&mut self) {
        self.forced_invalid = true;
    }

    /// All `base` messages joined with a single space, for one-line display.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.errors.messages_for(BASE).join(" ")
    }

    /// Every message across every field, for structured display.
    #[must_use]
    pub fn all_error_messages(&self) -> Vec<String> {
        self.errors.all_messages()
    }

    // ── Sub-results ─────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn sub_results(&self) -> &[OpResult<E>] {
        &self.sub_results
    }

    pub fn push_sub_result(&mut self, sub: OpResult<E>) {
        self.sub_results.push(sub);
    }

    // ── Authorization bookkeeping ───────────────────────────────────

    pub fn mark_authorized(&mut self) {
        self.authorization_checked = true;
    }

    pub fn mark_scoped(&mut self) {
        self.scope_checked = true;
    }

    #[inline]
    #[must_use]
    pub fn authorization_checked(&self) -> bool {
        self.authorization_checked
    }

    #[inline]
    #[must_use]
    pub fn scope_checked(&self) -> bool {
        self.scope_checked
    }

    // ── Extension point ─────────────────────────────────────────────

    /// Ad hoc signaling between an operation and its caller.
    pub fn set_ext(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.ext.insert(key.into(), value);
    }

    #[must_use]
    pub fn ext(&self, key: &str) -> Option<&serde_json::Value> {
        self.ext.get(key)
    }
}

impl<E: Entity> OpResult<E> {
    /// Whether this result is a success.
    ///
    /// Holds iff the result was not forced invalid, the error collection is
    /// empty, the model's own record errors (when the model is a single
    /// record) are empty, and every sub-result is itself successful.
    #[must_use]
    pub fn is_success(&self) -> bool {
        if self.forced_invalid || !self.errors.is_empty() {
            return false;
        }
        if let Model::Record(record) = &self.model
            && !record.record_errors().is_empty()
        {
            return false;
        }
        self.sub_results.iter().all(OpResult::is_success)
    }

    /// The negation of [`is_success`](Self::is_success), always.
    #[inline]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }
}
