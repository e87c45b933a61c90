// rule-forge-core/tests/compatibility.rs
// ============================================================================
// Module: Compatibility Validation Tests
// Description: Tests for registry-driven legality checks and finding kinds.
// Purpose: Ensure every finding kind fires exactly where the rule demands.
// Dependencies: rule-forge-core, serde_json
// ============================================================================
//! ## Overview
//! Covers the ordered compatibility checks: trigger legality, per-trigger
//! applicability, object users, variable kinds, exemptions, and the
//! warning-severity option and range checks, plus validation idempotence.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

mod common;

use rule_forge_core::CompatibilityValidator;
use rule_forge_core::EffectSlot;
use rule_forge_core::FindingKind;
use rule_forge_core::NodeId;
use rule_forge_core::ParamId;
use rule_forge_core::Severity;
use rule_forge_core::TriggerId;
use rule_forge_core::ValueCell;

// ============================================================================
// SECTION: Clean Rules
// ============================================================================

#[test]
fn pair_rule_validates_clean_for_joker() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    let report = validator.validate(&common::pair_rule(), &common::joker());
    assert!(report.is_clean());
    assert!(report.is_exportable());
}

#[test]
fn validation_is_idempotent() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    let mut rule = common::pair_rule();
    // Break several things at once for a non-trivial report.
    rule.trigger = TriggerId::from("card_scored");
    rule.slots.push(EffectSlot::Effect(common::effect("e5", "no_such_effect")));

    let first = validator.validate(&rule, &common::consumable());
    let second = validator.validate(&rule, &common::consumable());
    assert_eq!(first, second);
    assert!(!first.is_clean());
}

// ============================================================================
// SECTION: Trigger Legality
// ============================================================================

#[test]
fn undefined_trigger_is_reported_on_the_rule_node() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    let mut rule = common::pair_rule();
    rule.trigger = TriggerId::from("no_such_trigger");
    let report = validator.validate(&rule, &common::joker());

    let finding = report.findings.first().unwrap();
    assert_eq!(finding.kind, FindingKind::IncompatibleTrigger);
    assert_eq!(finding.node_id, NodeId::from("r1"));
}

#[test]
fn trigger_object_users_are_enforced() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    // hand_played permits jokers only.
    let report = validator.validate(&common::pair_rule(), &common::consumable());
    assert!(
        report
            .findings
            .iter()
            .any(|finding| finding.kind == FindingKind::IncompatibleTrigger
                && finding.node_id == NodeId::from("r1"))
    );
}

#[test]
fn effect_outside_applicable_triggers_yields_exactly_one_finding_on_the_effect() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    // destroy_card is restricted to card_scored; the rule fires on hand_played.
    let mut rule = common::pair_rule();
    rule.slots = vec![EffectSlot::Effect(common::effect("e1", "destroy_card"))];
    let report = validator.validate(&rule, &common::joker());

    let incompatible: Vec<_> = report
        .findings
        .iter()
        .filter(|finding| finding.kind == FindingKind::IncompatibleTrigger)
        .collect();
    assert_eq!(incompatible.len(), 1);
    assert_eq!(incompatible[0].node_id, NodeId::from("e1"));
    assert!(!report.is_exportable());
}

// ============================================================================
// SECTION: Object and Type Legality
// ============================================================================

#[test]
fn unknown_condition_type_is_reported() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    let mut rule = common::pair_rule();
    rule.condition_groups[0].conditions[0].condition_type = "no_such_condition".into();
    let report = validator.validate(&rule, &common::joker());

    assert!(
        report
            .findings
            .iter()
            .any(|finding| finding.kind == FindingKind::UnknownType
                && finding.node_id == NodeId::from("c1"))
    );
}

#[test]
fn effect_object_users_are_enforced() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    // add_mult permits jokers only; run the rule as a consumable on a trigger
    // both the rule and condition cannot satisfy either, so filter for the
    // effect's finding specifically.
    let report = validator.validate(&common::pair_rule(), &common::consumable());
    assert!(
        report
            .findings
            .iter()
            .any(|finding| finding.kind == FindingKind::IncompatibleObject
                && finding.node_id == NodeId::from("e1"))
    );
}

// ============================================================================
// SECTION: Variable Kinds
// ============================================================================

#[test]
fn variable_kind_outside_declared_types_is_reported() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    let rule = common::pair_rule();
    // amount accepts only the mult kind.
    let mut patched = rule.clone();
    let effect = patched.slots.first_mut().unwrap();
    if let EffectSlot::Effect(effect) = effect {
        effect
            .params
            .insert(ParamId::from("amount"), ValueCell::variable("suit", "scored_suit"));
    }
    let report = validator.validate(&patched, &common::joker());

    let finding = report
        .findings
        .iter()
        .find(|finding| finding.kind == FindingKind::InvalidVariableType)
        .unwrap();
    assert_eq!(finding.node_id, NodeId::from("e1"));
    assert_eq!(finding.param, Some(ParamId::from("amount")));

    // An accepted kind passes.
    let mut accepted = rule;
    if let Some(EffectSlot::Effect(effect)) = accepted.slots.first_mut() {
        effect.params.insert(ParamId::from("amount"), ValueCell::variable("mult", "hand_mult"));
    }
    assert!(validator.validate(&accepted, &common::joker()).is_clean());
}

// ============================================================================
// SECTION: Warnings
// ============================================================================

#[test]
fn out_of_range_literal_is_a_warning_and_does_not_block_export() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    let mut rule = common::pair_rule();
    if let Some(EffectSlot::Effect(effect)) = rule.slots.first_mut() {
        effect.params.insert(ParamId::from("amount"), ValueCell::number(500.0));
    }
    let report = validator.validate(&rule, &common::joker());

    let finding = report.findings.first().unwrap();
    assert_eq!(finding.kind, FindingKind::OutOfRange);
    assert_eq!(finding.severity(), Severity::Warning);
    assert!(report.is_exportable());
}

#[test]
fn unknown_select_value_is_a_warning() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    let mut rule = common::pair_rule();
    rule.trigger = TriggerId::from("card_scored");
    let mut suit_condition = common::condition("c2", "card_suit");
    suit_condition.params.insert(ParamId::from("suit"), ValueCell::string("stars"));
    rule.condition_groups[0].conditions = vec![suit_condition];
    rule.slots.clear();

    let report = validator.validate(&rule, &common::joker());
    assert!(
        report
            .findings
            .iter()
            .any(|finding| finding.kind == FindingKind::UnknownOption
                && finding.node_id == NodeId::from("c2"))
    );
    assert!(report.is_exportable());
}

#[test]
fn undeclared_stored_parameter_is_a_warning() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    let mut rule = common::pair_rule();
    if let Some(EffectSlot::Effect(effect)) = rule.slots.first_mut() {
        effect.params.insert(ParamId::from("ghost"), ValueCell::number(1.0));
    }
    let report = validator.validate(&rule, &common::joker());
    assert!(report.findings.iter().any(|finding| finding.kind == FindingKind::UnknownOption
        && finding.param == Some(ParamId::from("ghost"))));
}

// ============================================================================
// SECTION: Group Cells
// ============================================================================

#[test]
fn zero_denominator_yields_a_range_warning_on_the_group() {
    let registry = common::registry();
    let resolvers = common::resolvers();
    let validator = CompatibilityValidator::new(&registry, &resolvers);

    let mut rule = common::pair_rule();
    rule.slots.push(EffectSlot::Random(rule_forge_core::RandomGroup {
        id: NodeId::from("rg1"),
        chance_numerator: ValueCell::number(1.0),
        chance_denominator: ValueCell::number(0.0),
        respect_probability_effects: false,
        custom_key: None,
        effects: Vec::new(),
    }));
    let report = validator.validate(&rule, &common::joker());
    assert!(report.findings.iter().any(|finding| finding.kind == FindingKind::OutOfRange
        && finding.node_id == NodeId::from("rg1")));
}
