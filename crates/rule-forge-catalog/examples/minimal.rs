// crates/rule-forge-catalog/examples/minimal.rs
// ============================================================================
// Module: Rule Forge Minimal Example
// Description: Minimal end-to-end rule authoring flow over the builtin catalog.
// Purpose: Demonstrate patch editing, validation feedback, and export.
// Dependencies: rule-forge-catalog, rule-forge-core
// ============================================================================

//! ## Overview
//! Authors the canonical pair rule through patches, reads editor feedback,
//! and exports the normalized wire JSON. The example is silent on success
//! and fails with a descriptive error otherwise.

use rule_forge_catalog::builtin_registry;
use rule_forge_catalog::builtin_resolvers;
use rule_forge_core::Condition;
use rule_forge_core::ConditionGroup;
use rule_forge_core::Effect;
use rule_forge_core::EffectSlot;
use rule_forge_core::GroupOperator;
use rule_forge_core::NodeId;
use rule_forge_core::ObjectKind;
use rule_forge_core::ParamId;
use rule_forge_core::ParamValues;
use rule_forge_core::Rule;
use rule_forge_core::RulePatch;
use rule_forge_core::TriggerId;
use rule_forge_core::ValueCell;
use rule_forge_core::apply_patch;
use rule_forge_core::export_rule;
use rule_forge_core::node_feedback;

/// Error type for example preconditions.
#[derive(Debug)]
struct ExampleError(String);

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ExampleError {}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = builtin_registry();
    let resolvers = builtin_resolvers();
    let joker = ObjectKind::from("joker");

    // Author the rule the way the editor does: start empty, patch pieces in.
    let rule = Rule::new(NodeId::from("rule-pair-mult"), TriggerId::from("hand_played"));
    let rule = apply_patch(
        &rule,
        RulePatch::AddConditionGroup {
            group: ConditionGroup {
                id: NodeId::from("group-1"),
                operator: GroupOperator::And,
                conditions: vec![Condition {
                    id: NodeId::from("cond-pair"),
                    condition_type: "contains_pair".into(),
                    negate: false,
                    params: ParamValues::new(),
                    operator: None,
                }],
            },
        },
    )?;
    let rule = apply_patch(
        &rule,
        RulePatch::AddSlot {
            slot: EffectSlot::Effect(Effect {
                id: NodeId::from("effect-mult"),
                effect_type: "add_mult".into(),
                params: ParamValues::new(),
                custom_message: None,
            }),
        },
    )?;
    let rule = apply_patch(
        &rule,
        RulePatch::SetParam {
            node_id: NodeId::from("effect-mult"),
            param: ParamId::from("amount"),
            value: ValueCell::number(4.0),
        },
    )?;

    // The editor reads per-parameter state after each edit.
    let feedback =
        node_feedback(&rule, &NodeId::from("effect-mult"), &joker, &registry, &resolvers)?;
    if !feedback.findings.is_empty() {
        return Err(Box::new(ExampleError("expected a clean effect node".to_owned())));
    }

    // Export gates on validation and emits the normalized wire form.
    let exported = export_rule(&rule, &joker, &registry, &resolvers)?;
    if exported.json["trigger"] != serde_json::json!("hand_played") {
        return Err(Box::new(ExampleError("unexpected trigger in export".to_owned())));
    }
    Ok(())
}
