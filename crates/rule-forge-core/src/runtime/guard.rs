// rule-forge-core/src/runtime/guard.rs
// ============================================================================
// Module: Rule Forge Guard Evaluation
// Description: Guard construction and preview evaluation with trace collection.
// Purpose: Bridge rule condition groups to the guard algebra deterministically.
// Dependencies: crate::core, crate::interfaces, guard-logic
// ============================================================================

//! ## Overview
//! Guard evaluation turns a rule's condition groups into a [`Guard`] over
//! condition predicates and folds it against a caller-supplied probe. The
//! core never evaluates game state itself; hosts and tests inject truth via
//! [`ConditionProbe`], and the collected trace records each evaluated
//! condition before and after negation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use guard_logic::GroupOperator;
use guard_logic::Guard;
use guard_logic::GuardGroup;
use guard_logic::GuardMember;
use guard_logic::GuardTrace;
use guard_logic::PredicateEval;

use crate::core::identifiers::NodeId;
use crate::core::rule::Condition;
use crate::core::rule::Rule;
use crate::interfaces::ConditionProbe;

// ============================================================================
// SECTION: Condition Predicates
// ============================================================================

/// Guard predicate wrapping one condition snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionPredicate {
    /// Snapshot of the authored condition.
    pub condition: Condition,
}

/// Reader handing predicate evaluation to the injected probe.
pub struct ProbeReader<'a> {
    /// Caller-supplied truth source.
    probe: &'a dyn ConditionProbe,
}

impl<'a> ProbeReader<'a> {
    /// Creates a reader over the probe.
    #[must_use]
    pub const fn new(probe: &'a dyn ConditionProbe) -> Self {
        Self {
            probe,
        }
    }
}

impl PredicateEval for ConditionPredicate {
    type Reader<'a> = ProbeReader<'a>;

    fn eval(&self, reader: &Self::Reader<'_>) -> bool {
        reader.probe.truth(&self.condition)
    }
}

// ============================================================================
// SECTION: Guard Construction
// ============================================================================

/// Builds the guard for a rule's condition groups.
///
/// Member negation mirrors each condition's `negate` flag; the probe always
/// sees the raw condition.
#[must_use]
pub fn build_guard(rule: &Rule) -> Guard<ConditionPredicate> {
    Guard::new(
        rule.condition_groups
            .iter()
            .map(|group| {
                GuardGroup::new(
                    group.operator,
                    group.conditions.iter().map(|condition| GuardMember {
                        negate: condition.negate,
                        predicate: ConditionPredicate {
                            condition: condition.clone(),
                        },
                    }),
                )
            })
            .collect(),
    )
}

// ============================================================================
// SECTION: Guard Evaluation
// ============================================================================

/// One evaluated condition in a guard trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardTraceEntry {
    /// Condition node identifier.
    pub node_id: NodeId,
    /// Truth value before negation.
    pub raw: bool,
    /// Truth value folded into the group.
    pub effective: bool,
}

/// Result of one guard preview evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardEvaluation {
    /// Whether the guard passed.
    pub satisfied: bool,
    /// Evaluated conditions in evaluation order.
    pub trace: Vec<GuardTraceEntry>,
}

/// Trace collector recording per-condition outcomes.
#[derive(Default)]
struct TraceCollector {
    /// Collected entries in evaluation order.
    entries: Vec<GuardTraceEntry>,
}

impl GuardTrace<ConditionPredicate> for TraceCollector {
    fn on_predicate_evaluated(&mut self, predicate: &ConditionPredicate, raw: bool, effective: bool) {
        self.entries.push(GuardTraceEntry {
            node_id: predicate.condition.id.clone(),
            raw,
            effective,
        });
    }

    fn on_group_evaluated(&mut self, _operator: GroupOperator, _value: bool) {}
}

/// Evaluates a rule's guard against the probe.
///
/// A rule without condition groups is unconditionally satisfied.
#[must_use]
pub fn evaluate_guard(rule: &Rule, probe: &dyn ConditionProbe) -> GuardEvaluation {
    let guard = build_guard(rule);
    let reader = ProbeReader::new(probe);
    let mut trace = TraceCollector::default();
    let satisfied = guard.eval(&reader, &mut trace);
    GuardEvaluation {
        satisfied,
        trace: trace.entries,
    }
}
