// rule-forge-core/src/runtime/feedback.rs
// ============================================================================
// Module: Rule Forge Editor Feedback
// Description: Per-parameter visibility, options, and findings for one node.
// Purpose: Give the editor everything it needs to render a node after an edit.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! After each edit the editor asks for the resolved state of the touched
//! node: which parameters are currently visible, which options each select
//! parameter legally offers, and which validation findings attach to the
//! node or its parameters. The computation is read-only; the rule is never
//! mutated here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::NodeId;
use crate::core::identifiers::ObjectKind;
use crate::core::identifiers::ParamId;
use crate::core::registry::DefinitionRegistry;
use crate::core::registry::ParamOption;
use crate::core::registry::ParameterDefinition;
use crate::core::registry::ParameterKind;
use crate::core::registry::RegistryError;
use crate::core::registry::TypeDefinition;
use crate::core::rule::Rule;
use crate::core::value::ParamValues;
use crate::interfaces::ResolverRegistry;
use crate::runtime::options::resolve_options;
use crate::runtime::validate::CompatibilityValidator;
use crate::runtime::validate::Finding;
use crate::runtime::visibility::is_visible;

// ============================================================================
// SECTION: Feedback Shapes
// ============================================================================

/// Resolved editor state for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamFeedback {
    /// Parameter identifier.
    pub param_id: ParamId,
    /// Whether the parameter is currently visible.
    pub visible: bool,
    /// Resolved options for visible select parameters.
    pub options: Option<Vec<ParamOption>>,
    /// Findings scoped to this parameter.
    pub findings: Vec<Finding>,
}

/// Resolved editor state for one condition or effect node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFeedback {
    /// Node identifier.
    pub node_id: NodeId,
    /// Findings scoped to the node itself.
    pub findings: Vec<Finding>,
    /// Per-parameter state in declaration order.
    pub params: Vec<ParamFeedback>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while computing node feedback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    /// The node id names no condition or effect in the rule.
    #[error("feedback requested for unknown node: {0}")]
    UnknownNode(String),
    /// The node's type is absent from the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

// ============================================================================
// SECTION: Computation
// ============================================================================

/// Computes editor feedback for one condition or effect node.
///
/// # Errors
///
/// Returns [`FeedbackError::UnknownNode`] when the node is absent and
/// [`FeedbackError::Registry`] when its type is not defined.
pub fn node_feedback(
    rule: &Rule,
    node_id: &NodeId,
    object: &ObjectKind,
    registry: &DefinitionRegistry,
    resolvers: &ResolverRegistry,
) -> Result<NodeFeedback, FeedbackError> {
    let report = CompatibilityValidator::new(registry, resolvers).validate(rule, object);

    let (params, declared) = if let Some(condition) = rule.find_condition(node_id) {
        let definition = registry.condition_type(&condition.condition_type)?;
        (&condition.params, definition.params().to_vec())
    } else if let Some(effect) = rule.find_effect(node_id) {
        let definition = registry.effect_type(&effect.effect_type)?;
        (&effect.params, definition.params().to_vec())
    } else {
        return Err(FeedbackError::UnknownNode(node_id.to_string()));
    };

    let param_feedback = declared
        .iter()
        .map(|param| {
            let visible = is_visible(param, params);
            let options = resolve_param_options(param, params, object, resolvers, visible);
            let findings = report
                .for_node(node_id)
                .filter(|finding| finding.param.as_ref() == Some(&param.id))
                .cloned()
                .collect();
            ParamFeedback {
                param_id: param.id.clone(),
                visible,
                options,
                findings,
            }
        })
        .collect();

    let node_findings =
        report.for_node(node_id).filter(|finding| finding.param.is_none()).cloned().collect();

    Ok(NodeFeedback {
        node_id: node_id.clone(),
        findings: node_findings,
        params: param_feedback,
    })
}

/// Resolves presented options for a select parameter, when applicable.
fn resolve_param_options(
    param: &ParameterDefinition,
    siblings: &ParamValues,
    object: &ObjectKind,
    resolvers: &ResolverRegistry,
    visible: bool,
) -> Option<Vec<ParamOption>> {
    if !visible || param.kind != ParameterKind::Select {
        return None;
    }
    resolve_options(param, siblings, object, resolvers).ok()
}
