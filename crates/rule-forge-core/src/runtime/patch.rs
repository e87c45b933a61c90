// rule-forge-core/src/runtime/patch.rs
// ============================================================================
// Module: Rule Forge Patch Editing
// Description: Targeted node patches applied copy-on-write.
// Purpose: Express editor mutations as data so every edit yields a fresh rule.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The editor mutates rules through patches rather than in place: applying a
//! patch produces a new rule value and leaves the input untouched, so
//! concurrent readers (live preview, validator) always observe a consistent
//! snapshot. Patches never correct silently; clearing an option that is no
//! longer legal is an explicit [`RulePatch::ClearParam`], issued by the
//! caller after reading the validation report.

// ============================================================================
// SECTION: Imports
// ============================================================================

use guard_logic::GroupOperator;
use thiserror::Error;

use crate::core::identifiers::NodeId;
use crate::core::identifiers::ParamId;
use crate::core::identifiers::TriggerId;
use crate::core::rule::CompareOp;
use crate::core::rule::Condition;
use crate::core::rule::ConditionGroup;
use crate::core::rule::EffectSlot;
use crate::core::rule::MalformedRuleError;
use crate::core::rule::Position;
use crate::core::rule::Rule;
use crate::core::value::ValueCell;

// ============================================================================
// SECTION: Patches
// ============================================================================

/// One targeted mutation of a rule graph.
#[derive(Debug, Clone, PartialEq)]
pub enum RulePatch {
    /// Replaces the rule's trigger.
    SetTrigger {
        /// New trigger reference.
        trigger: TriggerId,
    },
    /// Sets the codegen compatibility flag.
    SetBlueprintCompatible {
        /// New flag value.
        value: bool,
    },
    /// Replaces the editor layout coordinate.
    SetPosition {
        /// New position, or none to clear.
        position: Option<Position>,
    },
    /// Appends a condition group.
    AddConditionGroup {
        /// Group to append.
        group: ConditionGroup,
    },
    /// Removes a condition group by id.
    RemoveConditionGroup {
        /// Group node id.
        group_id: NodeId,
    },
    /// Replaces a group's logical operator.
    SetGroupOperator {
        /// Group node id.
        group_id: NodeId,
        /// New operator.
        operator: GroupOperator,
    },
    /// Appends a condition to a group.
    AddCondition {
        /// Group node id.
        group_id: NodeId,
        /// Condition to append.
        condition: Condition,
    },
    /// Removes a condition by id.
    RemoveCondition {
        /// Condition node id.
        condition_id: NodeId,
    },
    /// Sets a condition's negation flag.
    SetNegate {
        /// Condition node id.
        condition_id: NodeId,
        /// New negation flag.
        negate: bool,
    },
    /// Sets a condition's internal comparison operator.
    SetCompareOp {
        /// Condition node id.
        condition_id: NodeId,
        /// New operator, or none to clear.
        operator: Option<CompareOp>,
    },
    /// Appends an effect slot.
    AddSlot {
        /// Slot to append.
        slot: EffectSlot,
    },
    /// Removes an effect slot by id.
    RemoveSlot {
        /// Slot node id.
        node_id: NodeId,
    },
    /// Moves an effect slot to a new index.
    MoveSlot {
        /// Slot node id.
        node_id: NodeId,
        /// Target index after removal.
        index: usize,
    },
    /// Stores a value cell on a condition or effect parameter.
    SetParam {
        /// Condition or effect node id.
        node_id: NodeId,
        /// Parameter id.
        param: ParamId,
        /// New value cell.
        value: ValueCell,
    },
    /// Removes a stored value cell from a condition or effect parameter.
    ClearParam {
        /// Condition or effect node id.
        node_id: NodeId,
        /// Parameter id.
        param: ParamId,
    },
    /// Sets an effect's user-facing message override.
    SetCustomMessage {
        /// Effect node id.
        effect_id: NodeId,
        /// New message, or none to clear.
        message: Option<String>,
    },
    /// Replaces a random group's chance cells.
    SetChance {
        /// Random group node id.
        random_id: NodeId,
        /// New numerator cell.
        numerator: ValueCell,
        /// New denominator cell.
        denominator: ValueCell,
    },
    /// Replaces a loop group's repetition cell.
    SetRepetitions {
        /// Loop group node id.
        loop_id: NodeId,
        /// New repetition cell.
        repetitions: ValueCell,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while applying a patch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The referenced node does not exist.
    #[error("patch references unknown node: {0}")]
    UnknownNode(String),
    /// The referenced parameter holds no stored value.
    #[error("node {node} holds no value for parameter {param}")]
    UnknownParam {
        /// Node the patch targeted.
        node: String,
        /// Parameter the patch targeted.
        param: String,
    },
    /// A slot index is outside the slot list.
    #[error("slot index {index} is out of range for {len} slots")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Slot count after removal.
        len: usize,
    },
    /// The patched rule violates structural invariants.
    #[error(transparent)]
    Malformed(#[from] MalformedRuleError),
}

// ============================================================================
// SECTION: Application
// ============================================================================

/// Applies a patch copy-on-write, returning the patched rule.
///
/// The input rule is never mutated.
///
/// # Errors
///
/// Returns [`PatchError`] when the patch references a missing node or
/// parameter, uses an out-of-range index, or would produce a structurally
/// malformed rule (duplicate or empty node ids).
pub fn apply_patch(rule: &Rule, patch: RulePatch) -> Result<Rule, PatchError> {
    let mut next = rule.clone();
    match patch {
        RulePatch::SetTrigger {
            trigger,
        } => next.trigger = trigger,
        RulePatch::SetBlueprintCompatible {
            value,
        } => next.blueprint_compatible = value,
        RulePatch::SetPosition {
            position,
        } => next.position = position,
        RulePatch::AddConditionGroup {
            group,
        } => {
            next.condition_groups.push(group);
            next.ensure_well_formed()?;
        }
        RulePatch::RemoveConditionGroup {
            group_id,
        } => {
            let before = next.condition_groups.len();
            next.condition_groups.retain(|group| group.id != group_id);
            if next.condition_groups.len() == before {
                return Err(PatchError::UnknownNode(group_id.to_string()));
            }
        }
        RulePatch::SetGroupOperator {
            group_id,
            operator,
        } => {
            next.find_group_mut(&group_id)
                .ok_or_else(|| PatchError::UnknownNode(group_id.to_string()))?
                .operator = operator;
        }
        RulePatch::AddCondition {
            group_id,
            condition,
        } => {
            next.find_group_mut(&group_id)
                .ok_or_else(|| PatchError::UnknownNode(group_id.to_string()))?
                .conditions
                .push(condition);
            next.ensure_well_formed()?;
        }
        RulePatch::RemoveCondition {
            condition_id,
        } => {
            let mut removed = false;
            for group in &mut next.condition_groups {
                let before = group.conditions.len();
                group.conditions.retain(|condition| condition.id != condition_id);
                removed |= group.conditions.len() != before;
            }
            if !removed {
                return Err(PatchError::UnknownNode(condition_id.to_string()));
            }
        }
        RulePatch::SetNegate {
            condition_id,
            negate,
        } => {
            next.find_condition_mut(&condition_id)
                .ok_or_else(|| PatchError::UnknownNode(condition_id.to_string()))?
                .negate = negate;
        }
        RulePatch::SetCompareOp {
            condition_id,
            operator,
        } => {
            next.find_condition_mut(&condition_id)
                .ok_or_else(|| PatchError::UnknownNode(condition_id.to_string()))?
                .operator = operator;
        }
        RulePatch::AddSlot {
            slot,
        } => {
            next.slots.push(slot);
            next.ensure_well_formed()?;
        }
        RulePatch::RemoveSlot {
            node_id,
        } => {
            let before = next.slots.len();
            next.slots.retain(|slot| slot.node_id() != &node_id);
            if next.slots.len() == before {
                return Err(PatchError::UnknownNode(node_id.to_string()));
            }
        }
        RulePatch::MoveSlot {
            node_id,
            index,
        } => {
            let from = next
                .slots
                .iter()
                .position(|slot| slot.node_id() == &node_id)
                .ok_or_else(|| PatchError::UnknownNode(node_id.to_string()))?;
            let slot = next.slots.remove(from);
            if index > next.slots.len() {
                return Err(PatchError::IndexOutOfRange {
                    index,
                    len: next.slots.len(),
                });
            }
            next.slots.insert(index, slot);
        }
        RulePatch::SetParam {
            node_id,
            param,
            value,
        } => {
            next.params_mut(&node_id)
                .ok_or_else(|| PatchError::UnknownNode(node_id.to_string()))?
                .insert(param, value);
        }
        RulePatch::ClearParam {
            node_id,
            param,
        } => {
            let params = next
                .params_mut(&node_id)
                .ok_or_else(|| PatchError::UnknownNode(node_id.to_string()))?;
            if params.remove(&param).is_none() {
                return Err(PatchError::UnknownParam {
                    node: node_id.to_string(),
                    param: param.to_string(),
                });
            }
        }
        RulePatch::SetCustomMessage {
            effect_id,
            message,
        } => {
            next.find_effect_mut(&effect_id)
                .ok_or_else(|| PatchError::UnknownNode(effect_id.to_string()))?
                .custom_message = message;
        }
        RulePatch::SetChance {
            random_id,
            numerator,
            denominator,
        } => {
            let group = next
                .slots
                .iter_mut()
                .find_map(|slot| match slot {
                    EffectSlot::Random(group) if group.id == random_id => Some(group),
                    _ => None,
                })
                .ok_or_else(|| PatchError::UnknownNode(random_id.to_string()))?;
            group.chance_numerator = numerator;
            group.chance_denominator = denominator;
        }
        RulePatch::SetRepetitions {
            loop_id,
            repetitions,
        } => {
            let group = next
                .slots
                .iter_mut()
                .find_map(|slot| match slot {
                    EffectSlot::Loop(group) if group.id == loop_id => Some(group),
                    _ => None,
                })
                .ok_or_else(|| PatchError::UnknownNode(loop_id.to_string()))?;
            group.repetitions = repetitions;
        }
    }
    Ok(next)
}
