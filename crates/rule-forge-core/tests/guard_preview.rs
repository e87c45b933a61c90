// rule-forge-core/tests/guard_preview.rs
// ============================================================================
// Module: Guard Preview Tests
// Description: Tests for guard construction and probe-driven evaluation.
// Purpose: Pin vacuity, negation, and trace behavior of rule guards.
// Dependencies: rule-forge-core
// ============================================================================
//! ## Overview
//! Evaluates rule guards against constant probes and checks the evaluation
//! order contract: AND across groups, per-group operators over negated
//! members, and unconditional truth for rules without condition groups.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

mod common;

use rule_forge_core::Condition;
use rule_forge_core::ConditionGroup;
use rule_forge_core::GroupOperator;
use rule_forge_core::NodeId;
use rule_forge_core::Rule;
use rule_forge_core::TriggerId;
use rule_forge_core::evaluate_guard;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Probe holding every condition true.
fn always_true(_condition: &Condition) -> bool {
    true
}

/// Probe holding every condition false.
fn always_false(_condition: &Condition) -> bool {
    false
}

// ============================================================================
// SECTION: Vacuity
// ============================================================================

#[test]
fn rule_without_condition_groups_is_unconditionally_true() {
    let rule = Rule::new(NodeId::from("r1"), TriggerId::from("hand_played"));
    assert!(evaluate_guard(&rule, &always_false).satisfied);
    assert!(evaluate_guard(&rule, &always_true).satisfied);
}

#[test]
fn empty_and_group_passes_empty_or_group_fails() {
    let mut rule = Rule::new(NodeId::from("r1"), TriggerId::from("hand_played"));
    rule.condition_groups = vec![ConditionGroup {
        id: NodeId::from("g1"),
        operator: GroupOperator::And,
        conditions: Vec::new(),
    }];
    assert!(evaluate_guard(&rule, &always_false).satisfied);

    rule.condition_groups[0].operator = GroupOperator::Or;
    assert!(!evaluate_guard(&rule, &always_false).satisfied);
    assert!(!evaluate_guard(&rule, &always_true).satisfied);
}

// ============================================================================
// SECTION: Negation
// ============================================================================

#[test]
fn negated_true_condition_fails_an_and_group() {
    let mut rule = common::pair_rule();
    rule.condition_groups[0].conditions[0].negate = true;

    let evaluation = evaluate_guard(&rule, &always_true);
    assert!(!evaluation.satisfied);

    let entry = evaluation.trace.first().unwrap();
    assert_eq!(entry.node_id, NodeId::from("c1"));
    assert!(entry.raw);
    assert!(!entry.effective);
}

// ============================================================================
// SECTION: Group Composition
// ============================================================================

#[test]
fn groups_join_by_and_with_per_group_operators() {
    let mut rule = Rule::new(NodeId::from("r1"), TriggerId::from("hand_played"));
    rule.condition_groups = vec![
        ConditionGroup {
            id: NodeId::from("g1"),
            operator: GroupOperator::Or,
            conditions: vec![
                common::condition("c1", "contains_pair"),
                common::condition("c2", "poker_hand"),
            ],
        },
        ConditionGroup {
            id: NodeId::from("g2"),
            operator: GroupOperator::And,
            conditions: vec![common::condition("c3", "hand_size")],
        },
    ];

    // First condition true satisfies the OR group; c3 decides the guard.
    let probe = |condition: &Condition| condition.id == NodeId::from("c1");
    let evaluation = evaluate_guard(&rule, &probe);
    assert!(!evaluation.satisfied);

    let probe = |condition: &Condition| {
        condition.id == NodeId::from("c1") || condition.id == NodeId::from("c3")
    };
    assert!(evaluate_guard(&rule, &probe).satisfied);
}

#[test]
fn trace_respects_short_circuit_across_groups() {
    let mut rule = Rule::new(NodeId::from("r1"), TriggerId::from("hand_played"));
    rule.condition_groups = vec![
        ConditionGroup {
            id: NodeId::from("g1"),
            operator: GroupOperator::And,
            conditions: vec![common::condition("c1", "contains_pair")],
        },
        ConditionGroup {
            id: NodeId::from("g2"),
            operator: GroupOperator::And,
            conditions: vec![common::condition("c2", "hand_size")],
        },
    ];

    // The first group fails, so the second group is never evaluated.
    let evaluation = evaluate_guard(&rule, &always_false);
    assert!(!evaluation.satisfied);
    assert_eq!(evaluation.trace.len(), 1);
    assert_eq!(evaluation.trace[0].node_id, NodeId::from("c1"));
}
