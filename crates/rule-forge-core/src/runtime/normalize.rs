// rule-forge-core/src/runtime/normalize.rs
// ============================================================================
// Module: Rule Forge Normalization
// Description: Dead-code-free, option-pruned rule form for codegen hand-off.
// Purpose: Strip hidden cells and statically dead slots without touching semantics.
// Dependencies: crate::core, crate::runtime::visibility
// ============================================================================

//! ## Overview
//! Normalization prepares a validated rule for the code generator: hidden
//! parameter cells are excluded from the forwarded value cells, vacuously
//! true condition groups disappear, and slots that can never fire (literal
//! zero-chance random groups, literal zero-repetition loops) are dropped
//! with an audit trail. A guard that is statically false marks the whole
//! rule dead rather than silently deleting authored content.
//!
//! Normalization never mutates its input; the editor's copy keeps every
//! hidden value so visibility toggles restore prior input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use guard_logic::GroupOperator;
use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::NodeId;
use crate::core::identifiers::ParamId;
use crate::core::registry::DefinitionRegistry;
use crate::core::registry::TypeDefinition;
use crate::core::rule::EffectSlot;
use crate::core::rule::Rule;
use crate::core::value::ParamValues;
use crate::runtime::visibility::is_visible;

// ============================================================================
// SECTION: Drop Records
// ============================================================================

/// Why a node or cell was removed during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Cell hidden by its `showWhen` gate.
    HiddenParam,
    /// Condition group with no conditions under `and`; vacuously true.
    VacuousGroup,
    /// Random group whose literal numerator is zero.
    ZeroChance,
    /// Loop group whose literal repetitions floor to zero.
    ZeroRepetitions,
}

/// Audit record for one normalization removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedItem {
    /// Node the removal concerns.
    pub node_id: NodeId,
    /// Parameter removed, when cell-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<ParamId>,
    /// Removal reason.
    pub reason: DropReason,
}

// ============================================================================
// SECTION: Normalized Rule
// ============================================================================

/// Result of normalizing one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRule {
    /// Pruned rule ready for hand-off.
    pub rule: Rule,
    /// True when the guard is statically false and the rule can never fire.
    pub dead: bool,
    /// Removals performed, in walk order.
    pub dropped: Vec<DroppedItem>,
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes a rule against the registry.
///
/// Nodes whose type is absent from the registry are left untouched; the
/// compatibility validator reports those separately and export never reaches
/// this point with unknown types.
#[must_use]
pub fn normalize(rule: &Rule, registry: &DefinitionRegistry) -> NormalizedRule {
    let mut normalized = rule.clone();
    let mut dropped = Vec::new();

    for group in &mut normalized.condition_groups {
        for condition in &mut group.conditions {
            if let Ok(definition) = registry.condition_type(&condition.condition_type) {
                prune_hidden_params(definition, &condition.id, &mut condition.params, &mut dropped);
            }
        }
    }
    for slot in &mut normalized.slots {
        match slot {
            EffectSlot::Effect(effect) => {
                if let Ok(definition) = registry.effect_type(&effect.effect_type) {
                    prune_hidden_params(definition, &effect.id, &mut effect.params, &mut dropped);
                }
            }
            EffectSlot::Random(group) => {
                for effect in &mut group.effects {
                    if let Ok(definition) = registry.effect_type(&effect.effect_type) {
                        prune_hidden_params(definition, &effect.id, &mut effect.params, &mut dropped);
                    }
                }
            }
            EffectSlot::Loop(group) => {
                for effect in &mut group.effects {
                    if let Ok(definition) = registry.effect_type(&effect.effect_type) {
                        prune_hidden_params(definition, &effect.id, &mut effect.params, &mut dropped);
                    }
                }
            }
        }
    }

    let dead = prune_condition_groups(&mut normalized, &mut dropped);
    prune_dead_slots(&mut normalized, &mut dropped);

    NormalizedRule {
        rule: normalized,
        dead,
        dropped,
    }
}

/// Removes hidden parameter cells from one node's stored values.
///
/// Visibility is computed against a snapshot of the stored values so the
/// removal order cannot cascade through chained `showWhen` gates.
fn prune_hidden_params<D: TypeDefinition>(
    definition: &D,
    node_id: &NodeId,
    params: &mut ParamValues,
    dropped: &mut Vec<DroppedItem>,
) {
    let snapshot = params.clone();
    let hidden: Vec<ParamId> = snapshot
        .keys()
        .filter(|param_id| {
            definition
                .param(param_id)
                .is_some_and(|param| !is_visible(param, &snapshot))
        })
        .cloned()
        .collect();
    for param_id in hidden {
        params.remove(&param_id);
        dropped.push(DroppedItem {
            node_id: node_id.clone(),
            param: Some(param_id),
            reason: DropReason::HiddenParam,
        });
    }
}

/// Drops vacuously true groups; returns true when the guard is statically false.
fn prune_condition_groups(rule: &mut Rule, dropped: &mut Vec<DroppedItem>) -> bool {
    let mut dead = false;
    let mut kept = Vec::with_capacity(rule.condition_groups.len());
    for group in rule.condition_groups.drain(..) {
        if group.conditions.is_empty() {
            match group.operator {
                // Empty AND is the fold identity: the group is always true.
                GroupOperator::And => dropped.push(DroppedItem {
                    node_id: group.id.clone(),
                    param: None,
                    reason: DropReason::VacuousGroup,
                }),
                // Empty OR can never pass; the whole guard is dead.
                GroupOperator::Or => {
                    dead = true;
                    kept.push(group);
                }
            }
        } else {
            kept.push(group);
        }
    }
    rule.condition_groups = kept;
    dead
}

/// Drops slots that can never fire with literal parameters.
fn prune_dead_slots(rule: &mut Rule, dropped: &mut Vec<DroppedItem>) {
    rule.slots.retain(|slot| match slot {
        EffectSlot::Effect(_) => true,
        EffectSlot::Random(group) => {
            let zero = group
                .chance_numerator
                .as_number()
                .is_some_and(|numerator| numerator <= 0.0);
            if zero {
                dropped.push(DroppedItem {
                    node_id: group.id.clone(),
                    param: None,
                    reason: DropReason::ZeroChance,
                });
            }
            !zero
        }
        EffectSlot::Loop(group) => {
            let zero = group
                .repetitions
                .as_number()
                .is_some_and(|repetitions| repetitions.floor() <= 0.0);
            if zero {
                dropped.push(DroppedItem {
                    node_id: group.id.clone(),
                    param: None,
                    reason: DropReason::ZeroRepetitions,
                });
            }
            !zero
        }
    });
}
