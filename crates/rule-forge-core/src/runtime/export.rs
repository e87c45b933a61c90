// rule-forge-core/src/runtime/export.rs
// ============================================================================
// Module: Rule Forge Export Gate
// Description: Strictly gated hand-off of validated rules to codegen.
// Purpose: Guarantee the generator only ever receives clean, normalized rules.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! Export is the one path from the editor to the code generator. A rule with
//! any unresolved error finding is refused outright; warnings travel with
//! the export so hosts can surface them, and the emitted JSON is the
//! normalized wire form (hidden cells stripped, statically dead slots
//! dropped) plus a canonical content hash for change detection.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::hashing::HashDigest;
use crate::core::hashing::HashError;
use crate::core::identifiers::NodeId;
use crate::core::identifiers::ObjectKind;
use crate::core::registry::DefinitionRegistry;
use crate::core::rule::Rule;
use crate::interfaces::ResolverRegistry;
use crate::runtime::normalize::DroppedItem;
use crate::runtime::normalize::normalize;
use crate::runtime::validate::CompatibilityValidator;
use crate::runtime::validate::Finding;

// ============================================================================
// SECTION: Exported Rule
// ============================================================================

/// Validated, normalized rule ready for the code generator.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedRule {
    /// Normalized wire JSON.
    pub json: Value,
    /// Canonical content hash of the normalized rule.
    pub content_hash: HashDigest,
    /// True when the guard is statically false; the generator may skip the rule.
    pub dead: bool,
    /// Warning-severity findings that did not block export.
    pub warnings: Vec<Finding>,
    /// Normalization removals, for audit display.
    pub dropped: Vec<DroppedItem>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when exporting a rule.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Unresolved error findings block the hand-off.
    #[error("rule {rule_id} has {} unresolved error findings", findings.len())]
    Blocked {
        /// Rule node identifier.
        rule_id: NodeId,
        /// Blocking error findings.
        findings: Vec<Finding>,
    },
    /// The normalized rule failed to serialize.
    #[error("failed to serialize rule: {0}")]
    Serialize(String),
    /// Canonical hashing failed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

// ============================================================================
// SECTION: Export
// ============================================================================

/// Validates, normalizes, and serializes a rule for codegen.
///
/// # Errors
///
/// Returns [`ExportError::Blocked`] when any error-severity finding is
/// unresolved, [`ExportError::Serialize`] when the wire encoding fails, and
/// [`ExportError::Hash`] when canonical hashing fails.
pub fn export_rule(
    rule: &Rule,
    object: &ObjectKind,
    registry: &DefinitionRegistry,
    resolvers: &ResolverRegistry,
) -> Result<ExportedRule, ExportError> {
    let report = CompatibilityValidator::new(registry, resolvers).validate(rule, object);
    if !report.is_exportable() {
        return Err(ExportError::Blocked {
            rule_id: rule.id.clone(),
            findings: report.errors().cloned().collect(),
        });
    }

    let normalized = normalize(rule, registry);
    let json = normalized
        .rule
        .to_json_value()
        .map_err(|err| ExportError::Serialize(err.to_string()))?;
    let content_hash = normalized.rule.canonical_hash()?;

    Ok(ExportedRule {
        json,
        content_hash,
        dead: normalized.dead,
        warnings: report.warnings().cloned().collect(),
        dropped: normalized.dropped,
    })
}
