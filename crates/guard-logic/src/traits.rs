// guard-logic/src/traits.rs
// ============================================================================
// Module: Guard Evaluation Traits
// Description: Predicate evaluation contract for guard folding.
// Purpose: Define the boundary where domain-specific condition semantics are injected.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The guard algebra never interprets predicates itself. Domains implement
//! [`PredicateEval`] for their predicate type and supply a reader holding
//! whatever state the predicates need. Evaluation must be pure: the same
//! reader and predicate always produce the same truth value.

// ============================================================================
// SECTION: Predicate Trait
// ============================================================================

/// Evaluation contract for guard predicates.
///
/// The reader is a domain-supplied bundle of state (a game snapshot, a test
/// fixture, a probe callback). Guard folding calls [`PredicateEval::eval`]
/// once per member in declaration order.
///
/// # Invariants
/// - Implementations are pure; re-evaluation over the same reader is
///   idempotent.
pub trait PredicateEval {
    /// Domain-specific reader the predicate evaluates against.
    type Reader<'a>;

    /// Evaluates the predicate against the reader, before negation.
    fn eval(&self, reader: &Self::Reader<'_>) -> bool;
}
