// rule-forge-catalog/src/catalog.rs
// ============================================================================
// Module: Rule Forge Catalog Documents
// Description: Catalog parsing and integrity validation.
// Purpose: Turn untrusted definition documents into a verified registry.
// Dependencies: rule-forge-core, serde, serde_json, toml
// ============================================================================

//! ## Overview
//! A catalog document carries the trigger, condition-type, and effect-type
//! tables in the registry wire shape. Documents are parsed from TOML or JSON
//! and cross-validated before a [`DefinitionRegistry`] is produced: duplicate
//! identifiers, dangling `showWhen` references, trigger restrictions naming
//! unknown triggers, select parameters without option sources, checkbox
//! parameters on condition types, inverted ranges, and static defaults
//! outside their option list all reject the document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use rule_forge_core::ConditionTypeDefinition;
use rule_forge_core::DefinitionRegistry;
use rule_forge_core::EffectTypeDefinition;
use rule_forge_core::ObjectKind;
use rule_forge_core::OptionsSource;
use rule_forge_core::ParameterDefinition;
use rule_forge_core::ParameterKind;
use rule_forge_core::TriggerDefinition;
use rule_forge_core::TriggerId;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Catalog Document
// ============================================================================

/// Definition tables as loaded from a catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatalogDocument {
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

impl CatalogDocument {
    /// Parses a catalog document from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] when the text is not a valid catalog.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        toml::from_str(text).map_err(|err| CatalogError::Parse(err.to_string()))
    }

    /// Parses a catalog document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] when the text is not a valid catalog.
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(text).map_err(|err| CatalogError::Parse(err.to_string()))
    }

    /// Loads a catalog document from a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] when the file cannot be read,
    /// [`CatalogError::UnsupportedFormat`] for other extensions, and
    /// [`CatalogError::Parse`] when the content is invalid.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        let content = fs::read_to_string(path).map_err(|err| CatalogError::Io(err.to_string()))?;
        match extension {
            "toml" => Self::from_toml_str(&content),
            "json" => Self::from_json_str(&content),
            other => Err(CatalogError::UnsupportedFormat(other.to_owned())),
        }
    }

    /// Validates catalog integrity.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] encountered in table order.
    pub fn validate(&self) -> Result<(), CatalogError> {
        ensure_unique_triggers(&self.triggers)?;
        ensure_unique_condition_types(&self.conditions)?;
        ensure_unique_effect_types(&self.effects)?;

        for trigger in &self.triggers {
            if trigger.object_users.is_empty() {
                return Err(CatalogError::EmptyObjectUsers(trigger.id.to_string()));
            }
        }
        for condition in &self.conditions {
            validate_type_table(
                condition.id.as_str(),
                &condition.params,
                condition.applicable_triggers.as_deref(),
                &condition.object_users,
                &self.triggers,
                false,
            )?;
        }
        for effect in &self.effects {
            validate_type_table(
                effect.id.as_str(),
                &effect.params,
                effect.applicable_triggers.as_deref(),
                &effect.object_users,
                &self.triggers,
                true,
            )?;
        }
        Ok(())
    }

    /// Validates the document and produces the definition registry.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`CatalogDocument::validate`].
    pub fn into_registry(self) -> Result<DefinitionRegistry, CatalogError> {
        self.validate()?;
        Ok(DefinitionRegistry::new(self.triggers, self.conditions, self.effects))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catalog loading and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The document could not be read.
    #[error("failed to read catalog: {0}")]
    Io(String),
    /// The document could not be parsed.
    #[error("failed to parse catalog: {0}")]
    Parse(String),
    /// The file extension names no supported format.
    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(String),
    /// Duplicate trigger identifiers detected.
    #[error("duplicate trigger identifier: {0}")]
    DuplicateTrigger(String),
    /// Duplicate condition type identifiers detected.
    #[error("duplicate condition type identifier: {0}")]
    DuplicateConditionType(String),
    /// Duplicate effect type identifiers detected.
    #[error("duplicate effect type identifier: {0}")]
    DuplicateEffectType(String),
    /// Duplicate parameter identifiers within one type.
    #[error("type {type_id} declares duplicate parameter: {param}")]
    DuplicateParameter {
        /// Owning type identifier.
        type_id: String,
        /// Duplicated parameter identifier.
        param: String,
    },
    /// A definition permits no object kinds.
    #[error("definition {0} lists no object users")]
    EmptyObjectUsers(String),
    /// A trigger restriction names an unknown trigger.
    #[error("type {type_id} restricts to unknown trigger: {trigger}")]
    UnknownApplicableTrigger {
        /// Owning type identifier.
        type_id: String,
        /// Unknown trigger identifier.
        trigger: String,
    },
    /// A `showWhen` gate references a missing sibling parameter.
    #[error("type {type_id} parameter {param} gates on unknown sibling: {target}")]
    DanglingShowWhen {
        /// Owning type identifier.
        type_id: String,
        /// Gated parameter identifier.
        param: String,
        /// Missing sibling identifier.
        target: String,
    },
    /// A checkbox parameter appears on a condition type.
    #[error("condition type {type_id} declares checkbox parameter: {param}")]
    CheckboxOnCondition {
        /// Owning type identifier.
        type_id: String,
        /// Offending parameter identifier.
        param: String,
    },
    /// A select parameter declares no option source.
    #[error("type {type_id} select parameter {param} declares no options")]
    MissingOptions {
        /// Owning type identifier.
        type_id: String,
        /// Offending parameter identifier.
        param: String,
    },
    /// A numeric range is inverted.
    #[error("type {type_id} parameter {param} declares min greater than max")]
    InvalidRange {
        /// Owning type identifier.
        type_id: String,
        /// Offending parameter identifier.
        param: String,
    },
    /// A static default value is outside the static option list.
    #[error("type {type_id} parameter {param} defaults outside its options")]
    DefaultOutsideOptions {
        /// Owning type identifier.
        type_id: String,
        /// Offending parameter identifier.
        param: String,
    },
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Ensures trigger identifiers are unique.
fn ensure_unique_triggers(triggers: &[TriggerDefinition]) -> Result<(), CatalogError> {
    for (index, trigger) in triggers.iter().enumerate() {
        if triggers.iter().skip(index + 1).any(|other| other.id == trigger.id) {
            return Err(CatalogError::DuplicateTrigger(trigger.id.to_string()));
        }
    }
    Ok(())
}

/// Ensures condition type identifiers are unique.
fn ensure_unique_condition_types(
    conditions: &[ConditionTypeDefinition],
) -> Result<(), CatalogError> {
    for (index, condition) in conditions.iter().enumerate() {
        if conditions.iter().skip(index + 1).any(|other| other.id == condition.id) {
            return Err(CatalogError::DuplicateConditionType(condition.id.to_string()));
        }
    }
    Ok(())
}

/// Ensures effect type identifiers are unique.
fn ensure_unique_effect_types(effects: &[EffectTypeDefinition]) -> Result<(), CatalogError> {
    for (index, effect) in effects.iter().enumerate() {
        if effects.iter().skip(index + 1).any(|other| other.id == effect.id) {
            return Err(CatalogError::DuplicateEffectType(effect.id.to_string()));
        }
    }
    Ok(())
}

/// Validates one condition or effect type table.
fn validate_type_table(
    type_id: &str,
    params: &[ParameterDefinition],
    applicable_triggers: Option<&[TriggerId]>,
    object_users: &[ObjectKind],
    triggers: &[TriggerDefinition],
    checkbox_allowed: bool,
) -> Result<(), CatalogError> {
    if object_users.is_empty() {
        return Err(CatalogError::EmptyObjectUsers(type_id.to_owned()));
    }
    if let Some(restricted) = applicable_triggers {
        for trigger in restricted {
            if !triggers.iter().any(|definition| &definition.id == trigger) {
                return Err(CatalogError::UnknownApplicableTrigger {
                    type_id: type_id.to_owned(),
                    trigger: trigger.to_string(),
                });
            }
        }
    }

    for (index, param) in params.iter().enumerate() {
        if params.iter().skip(index + 1).any(|other| other.id == param.id) {
            return Err(CatalogError::DuplicateParameter {
                type_id: type_id.to_owned(),
                param: param.id.to_string(),
            });
        }
        validate_param(type_id, param, params, checkbox_allowed)?;
    }
    Ok(())
}

/// Validates one parameter definition against its siblings.
fn validate_param(
    type_id: &str,
    param: &ParameterDefinition,
    siblings: &[ParameterDefinition],
    checkbox_allowed: bool,
) -> Result<(), CatalogError> {
    if param.kind == ParameterKind::Checkbox && !checkbox_allowed {
        return Err(CatalogError::CheckboxOnCondition {
            type_id: type_id.to_owned(),
            param: param.id.to_string(),
        });
    }
    if param.kind == ParameterKind::Select && param.options.is_none() {
        return Err(CatalogError::MissingOptions {
            type_id: type_id.to_owned(),
            param: param.id.to_string(),
        });
    }
    if let (Some(min), Some(max)) = (param.min, param.max)
        && min > max
    {
        return Err(CatalogError::InvalidRange {
            type_id: type_id.to_owned(),
            param: param.id.to_string(),
        });
    }
    if let Some(gate) = &param.show_when {
        let target_exists =
            siblings.iter().any(|other| other.id == gate.parameter && other.id != param.id);
        if !target_exists {
            return Err(CatalogError::DanglingShowWhen {
                type_id: type_id.to_owned(),
                param: param.id.to_string(),
                target: gate.parameter.to_string(),
            });
        }
    }
    if let (Some(default), Some(OptionsSource::Static { options })) =
        (&param.default, &param.options)
        && !options.iter().any(|option| &option.value == default)
    {
        return Err(CatalogError::DefaultOutsideOptions {
            type_id: type_id.to_owned(),
            param: param.id.to_string(),
        });
    }
    Ok(())
}
