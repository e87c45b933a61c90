// guard-logic/src/group.rs
// ============================================================================
// Module: Guard Groups
// Description: Flat condition groups with a single operator and member negation.
// Purpose: Fold ordered predicate members into a deterministic guard verdict.
// Dependencies: serde::{Deserialize, Serialize}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! A guard is an ordered sequence of groups joined by logical AND. Each group
//! folds its members under one operator (`and` or `or`) after applying
//! per-member negation. Nesting is intentionally unsupported: complex
//! expressions are built from the group sequence, keeping authored guards
//! flat and auditable.
//!
//! Vacuity is pinned here once for every consumer: an empty guard is true, an
//! empty `and` group is true, and an empty `or` group is false (the fold
//! identities of the respective operators).

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::traits::PredicateEval;

// ============================================================================
// SECTION: Group Operator
// ============================================================================

/// Logical operator applied across the members of a single group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupOperator {
    /// Every member must hold.
    #[default]
    And,
    /// At least one member must hold.
    Or,
}

impl GroupOperator {
    /// Returns the truth value of a group with no members.
    #[must_use]
    pub const fn vacuous_value(self) -> bool {
        matches!(self, Self::And)
    }

    /// Returns the member value that decides the group early.
    ///
    /// `and` groups short-circuit on the first false member, `or` groups on
    /// the first true member.
    #[must_use]
    pub const fn absorbing_value(self) -> bool {
        matches!(self, Self::Or)
    }
}

// ============================================================================
// SECTION: Guard Members
// ============================================================================

/// One predicate slot within a group, with optional negation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuardMember<P> {
    /// Inverts the evaluated truth value when set.
    pub negate: bool,
    /// Domain predicate evaluated for this member.
    pub predicate: P,
}

impl<P> GuardMember<P> {
    /// Creates a non-negated member.
    #[must_use]
    pub const fn new(predicate: P) -> Self {
        Self {
            negate: false,
            predicate,
        }
    }

    /// Creates a negated member.
    #[must_use]
    pub const fn negated(predicate: P) -> Self {
        Self {
            negate: true,
            predicate,
        }
    }

    /// Applies this member's negation to a raw predicate result.
    #[must_use]
    pub const fn apply(&self, raw: bool) -> bool {
        if self.negate { !raw } else { raw }
    }
}

// ============================================================================
// SECTION: Guard Groups
// ============================================================================

/// Ordered group of members folded under one operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuardGroup<P> {
    /// Operator applied across members.
    pub operator: GroupOperator,
    /// Members evaluated in declaration order.
    pub members: SmallVec<[GuardMember<P>; 4]>,
}

impl<P> GuardGroup<P> {
    /// Creates a group from an operator and members.
    #[must_use]
    pub fn new(operator: GroupOperator, members: impl IntoIterator<Item = GuardMember<P>>) -> Self {
        Self {
            operator,
            members: members.into_iter().collect(),
        }
    }

    /// Evaluates the group with short-circuiting and trace callbacks.
    ///
    /// Members are evaluated in order; once a member produces the operator's
    /// absorbing value the remaining members are skipped. Predicates are pure,
    /// so skipping never drops side effects.
    pub fn eval<T>(&self, reader: &P::Reader<'_>, trace: &mut T) -> bool
    where
        P: PredicateEval,
        T: GuardTrace<P>,
    {
        let absorbing = self.operator.absorbing_value();
        let mut value = self.operator.vacuous_value();

        for member in &self.members {
            let raw = member.predicate.eval(reader);
            let effective = member.apply(raw);
            trace.on_predicate_evaluated(&member.predicate, raw, effective);

            value = effective;
            if effective == absorbing {
                break;
            }
        }

        trace.on_group_evaluated(self.operator, value);
        value
    }
}

// ============================================================================
// SECTION: Guard
// ============================================================================

/// Ordered sequence of groups joined by logical AND.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guard<P> {
    /// Groups evaluated in declaration order.
    pub groups: Vec<GuardGroup<P>>,
}

impl<P> Default for Guard<P> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
        }
    }
}

impl<P> Guard<P> {
    /// Creates a guard from a group sequence.
    #[must_use]
    pub const fn new(groups: Vec<GuardGroup<P>>) -> Self {
        Self {
            groups,
        }
    }

    /// Returns true when the guard holds no groups and is vacuously true.
    #[must_use]
    pub fn is_vacuous(&self) -> bool {
        self.groups.is_empty()
    }

    /// Evaluates the guard: AND over all group results, short-circuiting on
    /// the first false group. An empty guard is unconditionally true.
    pub fn eval<T>(&self, reader: &P::Reader<'_>, trace: &mut T) -> bool
    where
        P: PredicateEval,
        T: GuardTrace<P>,
    {
        for group in &self.groups {
            if !group.eval(reader, trace) {
                return false;
            }
        }
        true
    }
}

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Observer for guard evaluation steps.
///
/// Both hooks default to no-ops so callers opt into only the granularity
/// they need.
pub trait GuardTrace<P> {
    /// Called after each member predicate is evaluated.
    ///
    /// `raw` is the predicate result before negation, `effective` the value
    /// folded into the group.
    fn on_predicate_evaluated(&mut self, predicate: &P, raw: bool, effective: bool) {
        let _ = (predicate, raw, effective);
    }

    /// Called after a group finishes folding.
    fn on_group_evaluated(&mut self, operator: GroupOperator, value: bool) {
        let _ = (operator, value);
    }
}

/// Trace implementation that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrace;

impl<P> GuardTrace<P> for NoopTrace {}
