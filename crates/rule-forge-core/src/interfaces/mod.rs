// rule-forge-core/src/interfaces/mod.rs
// ============================================================================
// Module: Rule Forge Interfaces
// Description: Host integration traits for option resolvers and condition probes.
// Purpose: Keep the core pure while hosts inject dynamic behavior explicitly.
// Dependencies: crate::core, std::collections
// ============================================================================

//! ## Overview
//! The core never owns dynamic behavior: option lists that cannot be declared
//! statically are produced by named resolvers registered here, and guard
//! previews evaluate conditions through a caller-supplied probe. Every
//! implementation must be pure and deterministic so re-resolution and
//! re-validation stay idempotent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::identifiers::ResolverId;
use crate::core::registry::ParamOption;
use crate::core::rule::Condition;
use crate::core::value::ParamValues;

// ============================================================================
// SECTION: Option Resolvers
// ============================================================================

/// Zero-argument option resolver.
///
/// # Invariants
/// - Implementations are pure: no external state, identical output on every
///   call.
pub trait ComputeOptions: Send + Sync {
    /// Produces the option list.
    fn options(&self) -> Vec<ParamOption>;
}

/// Option resolver derived from sibling parameter values.
///
/// # Invariants
/// - Implementations are pure functions of the sibling mapping.
pub trait DeriveOptions: Send + Sync {
    /// Produces the option list for the given sibling values.
    fn options(&self, siblings: &ParamValues) -> Vec<ParamOption>;
}

impl<F> ComputeOptions for F
where
    F: Fn() -> Vec<ParamOption> + Send + Sync,
{
    fn options(&self) -> Vec<ParamOption> {
        self()
    }
}

impl<F> DeriveOptions for F
where
    F: Fn(&ParamValues) -> Vec<ParamOption> + Send + Sync,
{
    fn options(&self, siblings: &ParamValues) -> Vec<ParamOption> {
        self(siblings)
    }
}

// ============================================================================
// SECTION: Resolver Registry
// ============================================================================

/// Host-registered option resolvers keyed by resolver id.
///
/// Catalogs reference resolvers by name because loaded definition tables
/// cannot carry functions; the host wires the names to implementations once
/// at startup.
#[derive(Default)]
pub struct ResolverRegistry {
    /// Zero-argument resolvers.
    computed: BTreeMap<ResolverId, Box<dyn ComputeOptions>>,
    /// Sibling-dependent resolvers.
    derived: BTreeMap<ResolverId, Box<dyn DeriveOptions>>,
}

impl ResolverRegistry {
    /// Creates an empty resolver registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a zero-argument resolver under the id.
    pub fn register_computed(
        &mut self,
        id: impl Into<ResolverId>,
        resolver: impl ComputeOptions + 'static,
    ) {
        self.computed.insert(id.into(), Box::new(resolver));
    }

    /// Registers a sibling-dependent resolver under the id.
    pub fn register_derived(
        &mut self,
        id: impl Into<ResolverId>,
        resolver: impl DeriveOptions + 'static,
    ) {
        self.derived.insert(id.into(), Box::new(resolver));
    }

    /// Returns the zero-argument resolver registered under the id.
    #[must_use]
    pub fn computed(&self, id: &ResolverId) -> Option<&dyn ComputeOptions> {
        self.computed.get(id).map(Box::as_ref)
    }

    /// Returns the sibling-dependent resolver registered under the id.
    #[must_use]
    pub fn derived(&self, id: &ResolverId) -> Option<&dyn DeriveOptions> {
        self.derived.get(id).map(Box::as_ref)
    }
}

// ============================================================================
// SECTION: Condition Probe
// ============================================================================

/// Caller-supplied truth source for guard previews.
///
/// The probe reports the truth of the condition's predicate itself; negation
/// is applied by the guard algebra, never by the probe.
pub trait ConditionProbe {
    /// Returns the raw truth value of the condition.
    fn truth(&self, condition: &Condition) -> bool;
}

impl<F> ConditionProbe for F
where
    F: Fn(&Condition) -> bool,
{
    fn truth(&self, condition: &Condition) -> bool {
        self(condition)
    }
}
