// rule-forge-core/src/core/registry.rs
// ============================================================================
// Module: Rule Forge Definition Registry
// Description: Trigger, condition-type, and effect-type definitions.
// Purpose: Provide the read-only catalog rules are resolved and validated against.
// Dependencies: crate::core::{identifiers, text, value}, serde, serde_json
// ============================================================================

//! ## Overview
//! The definition registry is the static catalog describing which triggers
//! exist, which condition and effect types may be authored, and which
//! parameters each type accepts. Definitions are loaded once at process start
//! and injected into resolvers and validators; nothing in this module mutates
//! after construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::ConditionTypeId;
use crate::core::identifiers::EffectTypeId;
use crate::core::identifiers::ObjectKind;
use crate::core::identifiers::ParamId;
use crate::core::identifiers::ResolverId;
use crate::core::identifiers::TriggerId;
use crate::core::identifiers::VariableKind;
use crate::core::text::LocalizedText;

// ============================================================================
// SECTION: Trigger Definitions
// ============================================================================

/// Definition of one trigger event rules may listen for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDefinition {
    /// Trigger identifier.
    pub id: TriggerId,
    /// Localized display label.
    #[serde(default)]
    pub label: LocalizedText,
    /// Localized description.
    #[serde(default)]
    pub description: LocalizedText,
    /// Optional grouping category for editor palettes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Object kinds permitted to use this trigger.
    #[serde(rename = "objectUsers")]
    pub object_users: Vec<ObjectKind>,
}

impl TriggerDefinition {
    /// Returns true when the object kind may use this trigger.
    #[must_use]
    pub fn allows_object(&self, object: &ObjectKind) -> bool {
        self.object_users.contains(object)
    }
}

// ============================================================================
// SECTION: Condition and Effect Type Definitions
// ============================================================================

/// Definition of one condition type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTypeDefinition {
    /// Condition type identifier.
    pub id: ConditionTypeId,
    /// Localized display label.
    #[serde(default)]
    pub label: LocalizedText,
    /// Localized description.
    #[serde(default)]
    pub description: LocalizedText,
    /// Optional grouping category for editor palettes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Accepted parameters in declaration order.
    #[serde(default)]
    pub params: Vec<ParameterDefinition>,
    /// Restricts this type to a trigger subset when present.
    #[serde(rename = "applicableTriggers", default, skip_serializing_if = "Option::is_none")]
    pub applicable_triggers: Option<Vec<TriggerId>>,
    /// Object kinds permitted to use this type.
    #[serde(rename = "objectUsers")]
    pub object_users: Vec<ObjectKind>,
}

/// Definition of one effect type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectTypeDefinition {
    /// Effect type identifier.
    pub id: EffectTypeId,
    /// Localized display label.
    #[serde(default)]
    pub label: LocalizedText,
    /// Localized description.
    #[serde(default)]
    pub description: LocalizedText,
    /// Optional grouping category for editor palettes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Accepted parameters in declaration order.
    #[serde(default)]
    pub params: Vec<ParameterDefinition>,
    /// Restricts this type to a trigger subset when present.
    #[serde(rename = "applicableTriggers", default, skip_serializing_if = "Option::is_none")]
    pub applicable_triggers: Option<Vec<TriggerId>>,
    /// Object kinds permitted to use this type.
    #[serde(rename = "objectUsers")]
    pub object_users: Vec<ObjectKind>,
}

// ============================================================================
// SECTION: Type Definition Access
// ============================================================================

/// Shared accessors over condition and effect type definitions.
///
/// The compatibility validator walks conditions and effects with the same
/// checks; this trait keeps that walk monomorphic instead of duplicating it.
pub trait TypeDefinition {
    /// Returns the accepted parameters in declaration order.
    fn params(&self) -> &[ParameterDefinition];

    /// Returns the trigger restriction when present.
    fn applicable_triggers(&self) -> Option<&[TriggerId]>;

    /// Returns the permitted object kinds.
    fn object_users(&self) -> &[ObjectKind];

    /// Returns the parameter definition with the given id.
    fn param(&self, id: &ParamId) -> Option<&ParameterDefinition> {
        self.params().iter().find(|param| &param.id == id)
    }

    /// Returns true when the object kind may use this type.
    fn allows_object(&self, object: &ObjectKind) -> bool {
        self.object_users().contains(object)
    }

    /// Returns true when this type may be used under the trigger.
    ///
    /// An absent restriction list permits every trigger.
    fn allows_trigger(&self, trigger: &TriggerId) -> bool {
        self.applicable_triggers().is_none_or(|triggers| triggers.contains(trigger))
    }
}

impl TypeDefinition for ConditionTypeDefinition {
    fn params(&self) -> &[ParameterDefinition] {
        &self.params
    }

    fn applicable_triggers(&self) -> Option<&[TriggerId]> {
        self.applicable_triggers.as_deref()
    }

    fn object_users(&self) -> &[ObjectKind] {
        &self.object_users
    }
}

impl TypeDefinition for EffectTypeDefinition {
    fn params(&self) -> &[ParameterDefinition] {
        &self.params
    }

    fn applicable_triggers(&self) -> Option<&[TriggerId]> {
        self.applicable_triggers.as_deref()
    }

    fn object_users(&self) -> &[ObjectKind] {
        &self.object_users
    }
}

// ============================================================================
// SECTION: Parameter Definitions
// ============================================================================

/// Input widget class of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Choice from a resolved option list.
    Select,
    /// Free numeric input.
    Number,
    /// Numeric input bounded to a slider range.
    Range,
    /// Free text input.
    Text,
    /// Boolean toggle; effect parameters only.
    Checkbox,
}

/// Visibility gate tying a parameter to a sibling's current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowWhen {
    /// Sibling parameter whose value controls visibility.
    pub parameter: ParamId,
    /// Accepted sibling values (string-coerced).
    pub values: Vec<String>,
}

/// One legal choice for a select parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamOption {
    /// Stored value when this option is chosen.
    pub value: Value,
    /// Localized display label.
    #[serde(default)]
    pub label: LocalizedText,
    /// Variable kind produced by choosing this option, when any.
    #[serde(rename = "valueType", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<VariableKind>,
    /// Object kinds for which this option is treated as absent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exempt: Vec<ObjectKind>,
}

impl ParamOption {
    /// Returns true when the option is exempt for the object kind.
    #[must_use]
    pub fn is_exempt_for(&self, object: &ObjectKind) -> bool {
        self.exempt.contains(object)
    }
}

/// Source of a select parameter's legal options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionsSource {
    /// Fixed option list declared inline.
    Static {
        /// Options in declaration order.
        options: Vec<ParamOption>,
    },
    /// Named zero-argument resolver registered by the host.
    Computed {
        /// Resolver identifier.
        resolver: ResolverId,
    },
    /// Named resolver computed from sibling parameter values.
    Derived {
        /// Resolver identifier.
        resolver: ResolverId,
    },
}

/// Definition of one parameter accepted by a condition or effect type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Parameter identifier.
    pub id: ParamId,
    /// Input widget class.
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    /// Localized display label.
    #[serde(default)]
    pub label: LocalizedText,
    /// Option source for select parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsSource>,
    /// Inclusive lower bound for numeric parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound for numeric parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Default value materialized by the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Visibility gate referencing a sibling parameter.
    #[serde(rename = "showWhen", default, skip_serializing_if = "Option::is_none")]
    pub show_when: Option<ShowWhen>,
    /// Variable kinds acceptable in this parameter's value cell.
    #[serde(rename = "variableTypes", default, skip_serializing_if = "Vec::is_empty")]
    pub variable_types: Vec<VariableKind>,
    /// Object kinds for which this parameter does not apply.
    #[serde(rename = "exemptObjects", default, skip_serializing_if = "Vec::is_empty")]
    pub exempt_objects: Vec<ObjectKind>,
}

impl ParameterDefinition {
    /// Returns true when the parameter is treated as absent for the object kind.
    #[must_use]
    pub fn is_exempt_for(&self, object: &ObjectKind) -> bool {
        self.exempt_objects.contains(object)
    }

    /// Returns true when the variable kind is acceptable here.
    #[must_use]
    pub fn accepts_variable(&self, kind: &VariableKind) -> bool {
        self.variable_types.contains(kind)
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Read-only catalog of trigger, condition-type, and effect-type definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DefinitionRegistry {
    /// Trigger definitions.
    #[serde(default)]
    pub triggers: Vec<TriggerDefinition>,
    /// Condition type definitions.
    #[serde(default)]
    pub conditions: Vec<ConditionTypeDefinition>,
    /// Effect type definitions.
    #[serde(default)]
    pub effects: Vec<EffectTypeDefinition>,
}

impl DefinitionRegistry {
    /// Creates a registry from definition tables.
    #[must_use]
    pub const fn new(
        triggers: Vec<TriggerDefinition>,
        conditions: Vec<ConditionTypeDefinition>,
        effects: Vec<EffectTypeDefinition>,
    ) -> Self {
        Self {
            triggers,
            conditions,
            effects,
        }
    }

    /// Looks up a trigger definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownTrigger`] when the id is not defined.
    pub fn trigger(&self, id: &TriggerId) -> Result<&TriggerDefinition, RegistryError> {
        self.triggers
            .iter()
            .find(|definition| &definition.id == id)
            .ok_or_else(|| RegistryError::UnknownTrigger(id.to_string()))
    }

    /// Looks up a condition type definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownConditionType`] when the id is not defined.
    pub fn condition_type(
        &self,
        id: &ConditionTypeId,
    ) -> Result<&ConditionTypeDefinition, RegistryError> {
        self.conditions
            .iter()
            .find(|definition| &definition.id == id)
            .ok_or_else(|| RegistryError::UnknownConditionType(id.to_string()))
    }

    /// Looks up an effect type definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownEffectType`] when the id is not defined.
    pub fn effect_type(&self, id: &EffectTypeId) -> Result<&EffectTypeDefinition, RegistryError> {
        self.effects
            .iter()
            .find(|definition| &definition.id == id)
            .ok_or_else(|| RegistryError::UnknownEffectType(id.to_string()))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No trigger definition carries the id.
    #[error("unknown trigger: {0}")]
    UnknownTrigger(String),
    /// No condition type definition carries the id.
    #[error("unknown condition type: {0}")]
    UnknownConditionType(String),
    /// No effect type definition carries the id.
    #[error("unknown effect type: {0}")]
    UnknownEffectType(String),
}
