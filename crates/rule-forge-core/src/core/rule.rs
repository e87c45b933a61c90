// rule-forge-core/src/core/rule.rs
// ============================================================================
// Module: Rule Forge Graph Model
// Description: Rule, condition group, effect, and effect-slot structures.
// Purpose: Define the canonical rule IR with its wire encoding and invariants.
// Dependencies: crate::core::{hashing, identifiers, value}, guard-logic, serde
// ============================================================================

//! ## Overview
//! A rule is one trigger-gated behavior definition attached to a game object:
//! ordered condition groups joined by AND, followed by an ordered sequence of
//! effect slots. In memory the three legacy effect containers (plain effects,
//! random groups, loop groups) are unified into a single slot list so the
//! execution interleave is explicit; the wire form keeps the three arrays
//! byte-compatible with previously authored content and records the
//! interleave in a `slotOrder` field.
//!
//! The model defines evaluation order but never executes behavior: the guard
//! is AND over group results in array order, effects fire in slot order, each
//! random group performs exactly one roll, and loop groups repeat their
//! effects a bounded number of times.

// ============================================================================
// SECTION: Imports
// ============================================================================

use guard_logic::GroupOperator;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashDigest;
use crate::core::hashing::HashError;
use crate::core::hashing::hash_canonical_json;
use crate::core::identifiers::ConditionTypeId;
use crate::core::identifiers::EffectTypeId;
use crate::core::identifiers::NodeId;
use crate::core::identifiers::TriggerId;
use crate::core::value::ParamValues;
use crate::core::value::ValueCell;

// ============================================================================
// SECTION: Comparison Operators
// ============================================================================

/// Comparison operator for conditions with an internal numeric threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Value equality comparison.
    Equals,
    /// Value inequality comparison.
    NotEquals,
    /// Numeric greater-than comparison.
    GreaterThan,
    /// Numeric greater-than-or-equal comparison.
    GreaterThanOrEqual,
    /// Numeric less-than comparison.
    LessThan,
    /// Numeric less-than-or-equal comparison.
    LessThanOrEqual,
}

// ============================================================================
// SECTION: Conditions
// ============================================================================

/// One boolean predicate gating effect execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Node identifier.
    pub id: NodeId,
    /// Condition type reference.
    #[serde(rename = "type")]
    pub condition_type: ConditionTypeId,
    /// Inverts the evaluated truth value when set.
    #[serde(default)]
    pub negate: bool,
    /// Stored parameter value cells.
    #[serde(default, skip_serializing_if = "ParamValues::is_empty")]
    pub params: ParamValues,
    /// Internal comparison operator for threshold conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<CompareOp>,
}

/// Ordered conditions folded under a single logical operator.
///
/// Mixed `and`/`or` inside one group is unsupported by design; complex
/// boolean shapes are expressed through the group sequence, which joins by
/// AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    /// Node identifier.
    pub id: NodeId,
    /// Operator applied across this group's conditions.
    pub operator: GroupOperator,
    /// Conditions evaluated in declaration order.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

// ============================================================================
// SECTION: Effects
// ============================================================================

/// One unit of behavior applied when a rule fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Node identifier.
    pub id: NodeId,
    /// Effect type reference.
    #[serde(rename = "type")]
    pub effect_type: EffectTypeId,
    /// Stored parameter value cells.
    #[serde(default, skip_serializing_if = "ParamValues::is_empty")]
    pub params: ParamValues,
    /// User-facing override text shown when the effect fires.
    #[serde(rename = "customMessage", default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

/// Probability-gated bundle of effects.
///
/// Each random group performs exactly one roll, independent of other groups
/// and of the main guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomGroup {
    /// Node identifier.
    pub id: NodeId,
    /// Roll numerator; literal or bound variable.
    pub chance_numerator: ValueCell,
    /// Roll denominator; literal or bound variable.
    pub chance_denominator: ValueCell,
    /// Whether global probability modifiers apply to this roll.
    #[serde(default)]
    pub respect_probability_effects: bool,
    /// Stable identifier for the chance roll; derived from the node id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_key: Option<String>,
    /// Effects gated behind the roll, in declaration order.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl RandomGroup {
    /// Returns the stable key identifying this group's probability roll.
    ///
    /// Uses `custom_key` when present and non-empty, otherwise derives a
    /// digest-based key from the node id so saves stay replay-compatible.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when key derivation fails to canonicalize.
    pub fn roll_key(&self) -> Result<String, HashError> {
        if let Some(key) = &self.custom_key
            && !key.is_empty()
        {
            return Ok(key.clone());
        }
        let digest = hash_canonical_json(DEFAULT_HASH_ALGORITHM, &self.id)?;
        Ok(format!("roll_{}", digest.short(12)))
    }
}

/// Bundle of effects executed a bounded number of times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopGroup {
    /// Node identifier.
    pub id: NodeId,
    /// Repetition count; literal or bound variable, floored to zero.
    pub repetitions: ValueCell,
    /// Effects executed once per repetition, in declaration order.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

// ============================================================================
// SECTION: Effect Slots
// ============================================================================

/// One entry in a rule's ordered effect sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectSlot {
    /// Plain effect applied unconditionally once the guard passes.
    Effect(Effect),
    /// Probability-gated effect bundle.
    Random(RandomGroup),
    /// Bounded repetition effect bundle.
    Loop(LoopGroup),
}

impl EffectSlot {
    /// Returns the slot's node identifier.
    #[must_use]
    pub const fn node_id(&self) -> &NodeId {
        match self {
            Self::Effect(effect) => &effect.id,
            Self::Random(group) => &group.id,
            Self::Loop(group) => &group.id,
        }
    }
}

// ============================================================================
// SECTION: Editor Position
// ============================================================================

/// Editor-only layout coordinate; carries no behavioral semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal canvas coordinate.
    pub x: f64,
    /// Vertical canvas coordinate.
    pub y: f64,
}

// ============================================================================
// SECTION: Rule
// ============================================================================

/// One trigger-gated behavior definition attached to a game object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleWire", into = "RuleWire")]
pub struct Rule {
    /// Node identifier, stable across edits.
    pub id: NodeId,
    /// Trigger this rule fires on.
    pub trigger: TriggerId,
    /// Flag consumed by codegen; no structural effect on the IR.
    pub blueprint_compatible: bool,
    /// Condition groups joined by AND, in declaration order.
    pub condition_groups: Vec<ConditionGroup>,
    /// Ordered effect slots (plain effects, random groups, loop groups).
    pub slots: Vec<EffectSlot>,
    /// Editor layout coordinate.
    pub position: Option<Position>,
}

impl Rule {
    /// Creates an empty rule listening on the trigger.
    #[must_use]
    pub const fn new(id: NodeId, trigger: TriggerId) -> Self {
        Self {
            id,
            trigger,
            blueprint_compatible: false,
            condition_groups: Vec::new(),
            slots: Vec::new(),
            position: None,
        }
    }

    /// Parses a rule from wire JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRuleError`] when the document is structurally
    /// invalid (missing fields, duplicate ids, bad slot order, malformed
    /// value cells).
    pub fn from_json_str(text: &str) -> Result<Self, MalformedRuleError> {
        serde_json::from_str(text).map_err(|err| MalformedRuleError::Parse(err.to_string()))
    }

    /// Parses a rule from a wire JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRuleError`] as for [`Rule::from_json_str`].
    pub fn from_json_value(value: Value) -> Result<Self, MalformedRuleError> {
        serde_json::from_value(value).map_err(|err| MalformedRuleError::Parse(err.to_string()))
    }

    /// Serializes the rule to its wire JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRuleError::Parse`] when serialization fails, which
    /// only occurs for non-finite literals injected via raw JSON values.
    pub fn to_json_value(&self) -> Result<Value, MalformedRuleError> {
        serde_json::to_value(self.clone()).map_err(|err| MalformedRuleError::Parse(err.to_string()))
    }

    /// Computes the canonical content hash of this rule.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    pub fn canonical_hash(&self) -> Result<HashDigest, HashError> {
        hash_canonical_json(DEFAULT_HASH_ALGORITHM, self)
    }

    /// Iterates all conditions across all groups in evaluation order.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.condition_groups.iter().flat_map(|group| group.conditions.iter())
    }

    /// Iterates plain effect slots in slot order.
    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.slots.iter().filter_map(|slot| match slot {
            EffectSlot::Effect(effect) => Some(effect),
            EffectSlot::Random(_) | EffectSlot::Loop(_) => None,
        })
    }

    /// Iterates random groups in slot order.
    pub fn random_groups(&self) -> impl Iterator<Item = &RandomGroup> {
        self.slots.iter().filter_map(|slot| match slot {
            EffectSlot::Random(group) => Some(group),
            EffectSlot::Effect(_) | EffectSlot::Loop(_) => None,
        })
    }

    /// Iterates loop groups in slot order.
    pub fn loops(&self) -> impl Iterator<Item = &LoopGroup> {
        self.slots.iter().filter_map(|slot| match slot {
            EffectSlot::Loop(group) => Some(group),
            EffectSlot::Effect(_) | EffectSlot::Random(_) => None,
        })
    }

    /// Iterates every effect, including those nested in random and loop groups.
    pub fn all_effects(&self) -> impl Iterator<Item = &Effect> {
        self.slots.iter().flat_map(|slot| match slot {
            EffectSlot::Effect(effect) => std::slice::from_ref(effect).iter(),
            EffectSlot::Random(group) => group.effects.iter(),
            EffectSlot::Loop(group) => group.effects.iter(),
        })
    }

    /// Finds a condition by node id.
    #[must_use]
    pub fn find_condition(&self, id: &NodeId) -> Option<&Condition> {
        self.conditions().find(|condition| &condition.id == id)
    }

    /// Finds an effect (including nested effects) by node id.
    #[must_use]
    pub fn find_effect(&self, id: &NodeId) -> Option<&Effect> {
        self.all_effects().find(|effect| &effect.id == id)
    }

    /// Finds an effect slot by node id.
    #[must_use]
    pub fn find_slot(&self, id: &NodeId) -> Option<&EffectSlot> {
        self.slots.iter().find(|slot| slot.node_id() == id)
    }

    /// Finds a condition group by node id, mutably.
    pub(crate) fn find_group_mut(&mut self, id: &NodeId) -> Option<&mut ConditionGroup> {
        self.condition_groups.iter_mut().find(|group| &group.id == id)
    }

    /// Finds a condition by node id, mutably.
    pub(crate) fn find_condition_mut(&mut self, id: &NodeId) -> Option<&mut Condition> {
        self.condition_groups
            .iter_mut()
            .flat_map(|group| group.conditions.iter_mut())
            .find(|condition| &condition.id == id)
    }

    /// Finds an effect (including nested effects) by node id, mutably.
    pub(crate) fn find_effect_mut(&mut self, id: &NodeId) -> Option<&mut Effect> {
        self.slots
            .iter_mut()
            .flat_map(|slot| match slot {
                EffectSlot::Effect(effect) => std::slice::from_mut(effect).iter_mut(),
                EffectSlot::Random(group) => group.effects.iter_mut(),
                EffectSlot::Loop(group) => group.effects.iter_mut(),
            })
            .find(|effect| &effect.id == id)
    }

    /// Finds the stored parameter map of a condition or effect node, mutably.
    pub(crate) fn params_mut(&mut self, id: &NodeId) -> Option<&mut ParamValues> {
        if self.find_condition(id).is_some() {
            return self.find_condition_mut(id).map(|condition| &mut condition.params);
        }
        self.find_effect_mut(id).map(|effect| &mut effect.params)
    }

    /// Re-checks structural invariants after an in-crate mutation.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRuleError`] when a node id is empty or duplicated.
    pub(crate) fn ensure_well_formed(&self) -> Result<(), MalformedRuleError> {
        ensure_nonempty_ids(self)?;
        ensure_unique_node_ids(self)
    }

    /// Collects every node id in the rule, including the rule's own id.
    fn node_ids(&self) -> Vec<&NodeId> {
        let mut ids = vec![&self.id];
        for group in &self.condition_groups {
            ids.push(&group.id);
            for condition in &group.conditions {
                ids.push(&condition.id);
            }
        }
        for slot in &self.slots {
            ids.push(slot.node_id());
            match slot {
                EffectSlot::Effect(_) => {}
                EffectSlot::Random(group) => {
                    for effect in &group.effects {
                        ids.push(&effect.id);
                    }
                }
                EffectSlot::Loop(group) => {
                    for effect in &group.effects {
                        ids.push(&effect.id);
                    }
                }
            }
        }
        ids
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Structural rule errors; these reject the document outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRuleError {
    /// The document failed to parse against the wire shape.
    #[error("malformed rule document: {0}")]
    Parse(String),
    /// A node id is the empty string.
    #[error("rule contains an empty node id")]
    EmptyNodeId,
    /// Two nodes share an identifier.
    #[error("duplicate node identifier: {0}")]
    DuplicateNodeId(String),
    /// `slotOrder` references a node that is not an effect slot.
    #[error("slot order references unknown node: {0}")]
    UnknownSlotEntry(String),
    /// `slotOrder` does not cover every effect slot exactly once.
    #[error("slot order lists {listed} entries for {present} slots")]
    IncompleteSlotOrder {
        /// Entries present in `slotOrder`.
        listed: usize,
        /// Effect slots present in the document.
        present: usize,
    },
}

// ============================================================================
// SECTION: Wire Shape
// ============================================================================

/// Exact wire form of a rule.
///
/// The three effect containers stay separate arrays for compatibility with
/// previously authored content; `slotOrder` records the merged interleave.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RuleWire {
    /// Node identifier.
    id: NodeId,
    /// Trigger reference.
    trigger: TriggerId,
    /// Codegen compatibility flag.
    #[serde(rename = "blueprintCompatible", default)]
    blueprint_compatible: bool,
    /// Condition groups in declaration order.
    #[serde(rename = "conditionGroups", default)]
    condition_groups: Vec<ConditionGroup>,
    /// Plain effects in declaration order.
    #[serde(default)]
    effects: Vec<Effect>,
    /// Random groups in declaration order.
    #[serde(rename = "randomGroups", default)]
    random_groups: Vec<RandomGroup>,
    /// Loop groups in declaration order.
    #[serde(default)]
    loops: Vec<LoopGroup>,
    /// Merged slot interleave; legacy documents omit it.
    #[serde(rename = "slotOrder", default, skip_serializing_if = "Option::is_none")]
    slot_order: Option<Vec<NodeId>>,
    /// Editor layout coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
}

impl TryFrom<RuleWire> for Rule {
    type Error = MalformedRuleError;

    fn try_from(wire: RuleWire) -> Result<Self, Self::Error> {
        let slots = assemble_slots(
            wire.effects,
            wire.random_groups,
            wire.loops,
            wire.slot_order.as_deref(),
        )?;
        let rule = Self {
            id: wire.id,
            trigger: wire.trigger,
            blueprint_compatible: wire.blueprint_compatible,
            condition_groups: wire.condition_groups,
            slots,
            position: wire.position,
        };
        ensure_nonempty_ids(&rule)?;
        ensure_unique_node_ids(&rule)?;
        Ok(rule)
    }
}

impl From<Rule> for RuleWire {
    fn from(rule: Rule) -> Self {
        let slot_order = rule.slots.iter().map(|slot| slot.node_id().clone()).collect();
        let mut effects = Vec::new();
        let mut random_groups = Vec::new();
        let mut loops = Vec::new();
        for slot in rule.slots {
            match slot {
                EffectSlot::Effect(effect) => effects.push(effect),
                EffectSlot::Random(group) => random_groups.push(group),
                EffectSlot::Loop(group) => loops.push(group),
            }
        }
        Self {
            id: rule.id,
            trigger: rule.trigger,
            blueprint_compatible: rule.blueprint_compatible,
            condition_groups: rule.condition_groups,
            effects,
            random_groups,
            loops,
            slot_order: Some(slot_order),
            position: rule.position,
        }
    }
}

// ============================================================================
// SECTION: Slot Assembly
// ============================================================================

/// Merges the three wire arrays into the ordered slot list.
///
/// Without `slotOrder` the legacy interleave applies: plain effects, then
/// random groups, then loop groups, each in array order.
fn assemble_slots(
    effects: Vec<Effect>,
    random_groups: Vec<RandomGroup>,
    loops: Vec<LoopGroup>,
    slot_order: Option<&[NodeId]>,
) -> Result<Vec<EffectSlot>, MalformedRuleError> {
    let mut slots: Vec<EffectSlot> = effects.into_iter().map(EffectSlot::Effect).collect();
    slots.extend(random_groups.into_iter().map(EffectSlot::Random));
    slots.extend(loops.into_iter().map(EffectSlot::Loop));

    let Some(order) = slot_order else {
        return Ok(slots);
    };

    if order.len() != slots.len() {
        return Err(MalformedRuleError::IncompleteSlotOrder {
            listed: order.len(),
            present: slots.len(),
        });
    }

    let mut ordered = Vec::with_capacity(slots.len());
    for id in order {
        let index = slots
            .iter()
            .position(|slot| slot.node_id() == id)
            .ok_or_else(|| MalformedRuleError::UnknownSlotEntry(id.to_string()))?;
        ordered.push(slots.swap_remove(index));
    }
    Ok(ordered)
}

// ============================================================================
// SECTION: Structural Checks
// ============================================================================

/// Ensures no node carries an empty identifier.
fn ensure_nonempty_ids(rule: &Rule) -> Result<(), MalformedRuleError> {
    if rule.node_ids().iter().any(|id| id.as_str().is_empty()) {
        return Err(MalformedRuleError::EmptyNodeId);
    }
    Ok(())
}

/// Ensures node identifiers are unique across the whole rule.
fn ensure_unique_node_ids(rule: &Rule) -> Result<(), MalformedRuleError> {
    let ids = rule.node_ids();
    for (index, id) in ids.iter().enumerate() {
        if ids.iter().skip(index + 1).any(|other| other == id) {
            return Err(MalformedRuleError::DuplicateNodeId(id.to_string()));
        }
    }
    Ok(())
}
