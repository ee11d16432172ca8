use uuid::Uuid;

/// Well-known authorization property names.
///
/// Shared between policy scope construction and record-side resolution
/// ([`Scopable::resolve_property()`]), ensuring a single source of truth
/// for property names.
pub mod properties {
    /// Ownership property. Maps to an `owner_id` field.
    pub const OWNER_ID: &str = "owner_id";

    /// Organization membership property. Maps to a `company_id` field.
    pub const COMPANY_ID: &str = "company_id";

    /// Resource identity property. Maps to the primary key.
    pub const RESOURCE_ID: &str = "id";
}

/// Predicate operation type for scope filters.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FilterOp {
    /// `property IN (values)` — flat set membership.
    In,
}

/// A single scope filter — a condition on a named resource property.
///
/// The property name (e.g., `"owner_id"`, `"id"`) is an authorization
/// concept. Mapping to record fields is done by [`Scopable::resolve_property()`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScopeFilter {
    property: String,
    op: FilterOp,
    values: Vec<Uuid>,
}

impl ScopeFilter {
    /// Create a new scope filter.
    #[must_use]
    pub fn new(property: impl Into<String>, op: FilterOp, values: Vec<Uuid>) -> Self {
        Self {
            property: property.into(),
            op,
            values,
        }
    }

    /// The authorization property name.
    #[inline]
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The filter operation.
    #[inline]
    #[must_use]
    pub fn op(&self) -> &FilterOp {
        &self.op
    }

    /// The filter values.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[Uuid] {
        &self.values
    }
}

/// A conjunction (AND) of scope filters — one access path.
///
/// All filters within a constraint must match simultaneously for a record
/// to be accessible via this path.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScopeConstraint {
    filters: Vec<ScopeFilter>,
}

impl ScopeConstraint {
    /// Create a new scope constraint from a list of filters.
    #[must_use]
    pub fn new(filters: Vec<ScopeFilter>) -> Self {
        Self { filters }
    }

    /// The filters in this constraint (AND-ed together).
    #[inline]
    #[must_use]
    pub fn filters(&self) -> &[ScopeFilter] {
        &self.filters
    }

    /// Returns `true` if this constraint has no filters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// A record that can resolve authorization property names to field values.
///
/// Implemented by domain records so scopes can be evaluated in-process.
/// Returning `None` for a property means the record does not carry it;
/// a filter on an unresolvable property fails its constraint (fail-closed).
pub trait Scopable {
    /// Resolve an authorization property name to this record's value for it.
    fn resolve_property(&self, property: &str) -> Option<Uuid>;
}

/// A disjunction (OR) of scope constraints defining what data is accessible.
///
/// Each constraint is an independent access path (OR-ed). Filters within a
/// constraint are AND-ed. An unconstrained scope bypasses row-level filtering.
///
/// # Examples
///
/// ```
/// use opkit_auth::access_scope::{AccessScope, properties};
/// use uuid::Uuid;
///
/// // deny-all (default)
/// let scope = AccessScope::deny_all();
/// assert!(scope.is_deny_all());
///
/// // records owned by one principal
/// let owner = Uuid::new_v4();
/// let scope = AccessScope::for_owner(owner);
/// assert!(!scope.is_deny_all());
/// assert!(scope.contains_value(properties::OWNER_ID, owner));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessScope {
    constraints: Vec<ScopeConstraint>,
    unconstrained: bool,
}

impl Default for AccessScope {
    /// Default is deny-all: no constraints and not unconstrained.
    fn default() -> Self {
        Self::deny_all()
    }
}

impl AccessScope {
    // ── Constructors ────────────────────────────────────────────────

    /// Create an access scope from a list of constraints (OR-ed).
    #[must_use]
    pub fn from_constraints(constraints: Vec<ScopeConstraint>) -> Self {
        Self {
            constraints,
            unconstrained: false,
        }
    }

    /// Create an access scope with a single constraint.
    #[must_use]
    pub fn single(constraint: ScopeConstraint) -> Self {
        Self::from_constraints(vec![constraint])
    }

    /// Create an "allow all" (unconstrained) scope.
    ///
    /// This represents a legitimate policy decision with no row-level
    /// filtering. Not a bypass — it's a valid authorization outcome.
    #[must_use]
    pub fn allow_all() -> Self {
        Self {
            constraints: Vec::new(),
            unconstrained: true,
        }
    }

    /// Create a "deny all" scope (no access).
    #[must_use]
    pub fn deny_all() -> Self {
        Self {
            constraints: Vec::new(),
            unconstrained: false,
        }
    }

    // ── Convenience constructors ────────────────────────────────────

    /// Create a scope for records owned by the given principal.
    #[must_use]
    pub fn for_owner(id: Uuid) -> Self {
        Self::single(ScopeConstraint::new(vec![ScopeFilter::new(
            properties::OWNER_ID,
            FilterOp::In,
            vec![id],
        )]))
    }

    /// Create a scope for records belonging to the given company.
    #[must_use]
    pub fn for_company(id: Uuid) -> Self {
        Self::single(ScopeConstraint::new(vec![ScopeFilter::new(
            properties::COMPANY_ID,
            FilterOp::In,
            vec![id],
        )]))
    }

    /// Create a scope for a set of specific resource IDs.
    #[must_use]
    pub fn for_resources(ids: Vec<Uuid>) -> Self {
        Self::single(ScopeConstraint::new(vec![ScopeFilter::new(
            properties::RESOURCE_ID,
            FilterOp::In,
            ids,
        )]))
    }

    /// Create a scope for a single resource ID.
    #[must_use]
    pub fn for_resource(id: Uuid) -> Self {
        Self::for_resources(vec![id])
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// The constraints in this scope (OR-ed).
    #[inline]
    #[must_use]
    pub fn constraints(&self) -> &[ScopeConstraint] {
        &self.constraints
    }

    /// Returns `true` if this scope is unconstrained (allow-all).
    #[inline]
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.unconstrained
    }

    /// Returns `true` if this scope denies all access.
    ///
    /// A scope is deny-all when it is not unconstrained and has no constraints.
    #[must_use]
    pub fn is_deny_all(&self) -> bool {
        !self.unconstrained && self.constraints.is_empty()
    }

    /// Check if any constraint has a filter matching the given property and value.
    #[must_use]
    pub fn contains_value(&self, property: &str, id: Uuid) -> bool {
        self.constraints.iter().any(|c| {
            c.filters().iter().any(|f| {
                f.property() == property && *f.op() == FilterOp::In && f.values().contains(&id)
            })
        })
    }

    // ── Evaluation ──────────────────────────────────────────────────

    /// Evaluate this scope against a single record.
    ///
    /// # OR/AND Semantics
    ///
    /// - Multiple constraints are OR-ed (alternative access paths)
    /// - Filters within a constraint are AND-ed (all must match)
    /// - Unknown properties fail that constraint (fail-closed)
    /// - Deny-all permits nothing; unconstrained permits everything
    #[must_use]
    pub fn permits(&self, record: &impl Scopable) -> bool {
        if self.unconstrained {
            return true;
        }
        self.constraints
            .iter()
            .any(|constraint| constraint_permits(constraint, record))
    }
}

/// Evaluate a single constraint (AND of filters) against a record.
///
/// Returns `false` if any filter references a property the record cannot
/// resolve (fail-closed).
fn constraint_permits(constraint: &ScopeConstraint, record: &impl Scopable) -> bool {
    constraint.filters().iter().all(|filter| {
        let Some(value) = record.resolve_property(filter.property()) else {
            return false;
        };
        match filter.op() {
            FilterOp::In => filter.values().contains(&value),
        }
    })
}
