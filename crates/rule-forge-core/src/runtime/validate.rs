// rule-forge-core/src/runtime/validate.rs
// ============================================================================
// Module: Rule Forge Compatibility Validation
// Description: Registry-driven legality checks over a whole rule graph.
// Purpose: Accumulate per-node findings without mutating or rejecting the rule.
// Dependencies: crate::core, crate::interfaces, crate::runtime::{options, visibility}
// ============================================================================

//! ## Overview
//! The compatibility validator walks a rule against the injected definition
//! registry and reports findings per node: trigger legality, per-trigger
//! applicability of conditions and effects, object-user legality, variable
//! kind legality, and exemptions. Recoverable findings never raise errors;
//! they accumulate in a [`ValidationReport`] while the rule stays editable.
//! Structurally malformed documents are rejected earlier, at the wire
//! boundary.
//!
//! Validation is pure over the rule and registry snapshot, so running it
//! twice without intervening edits yields identical findings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::NodeId;
use crate::core::identifiers::ObjectKind;
use crate::core::identifiers::ParamId;
use crate::core::identifiers::TriggerId;
use crate::core::registry::DefinitionRegistry;
use crate::core::registry::ParameterDefinition;
use crate::core::registry::ParameterKind;
use crate::core::registry::TypeDefinition;
use crate::core::rule::LoopGroup;
use crate::core::rule::RandomGroup;
use crate::core::rule::Rule;
use crate::core::value::ParamValues;
use crate::core::value::ValueCell;
use crate::interfaces::ResolverRegistry;
use crate::runtime::options::OptionError;
use crate::runtime::options::resolve_options_unfiltered;
use crate::runtime::visibility::is_visible;

// ============================================================================
// SECTION: Findings
// ============================================================================

/// Severity class of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks export until resolved.
    Error,
    /// Advisory; never blocks export.
    Warning,
}

/// Kind of validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// A node references a type absent from the registry.
    UnknownType,
    /// The trigger is undefined, or a node is not applicable under it.
    IncompatibleTrigger,
    /// The owning object kind may not use the referenced definition.
    IncompatibleObject,
    /// A value cell's variable kind is not accepted by its parameter.
    InvalidVariableType,
    /// A stored value references a parameter or option exempt for the object.
    ExemptValue,
    /// A stored select value is absent from the resolved option list.
    UnknownOption,
    /// A numeric literal falls outside the parameter's declared bounds.
    OutOfRange,
}

impl FindingKind {
    /// Returns the severity class of this finding kind.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::UnknownType
            | Self::IncompatibleTrigger
            | Self::IncompatibleObject
            | Self::InvalidVariableType
            | Self::ExemptValue => Severity::Error,
            Self::UnknownOption | Self::OutOfRange => Severity::Warning,
        }
    }
}

/// One validation finding attached to a rule-graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Node the finding attaches to.
    pub node_id: NodeId,
    /// Parameter the finding concerns, when parameter-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<ParamId>,
    /// Finding kind.
    pub kind: FindingKind,
    /// Human-readable detail message.
    pub detail: String,
}

impl Finding {
    /// Creates a node-scoped finding.
    #[must_use]
    pub fn new(node_id: NodeId, kind: FindingKind, detail: impl Into<String>) -> Self {
        Self {
            node_id,
            param: None,
            kind,
            detail: detail.into(),
        }
    }

    /// Creates a parameter-scoped finding.
    #[must_use]
    pub fn for_param(
        node_id: NodeId,
        param: ParamId,
        kind: FindingKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            node_id,
            param: Some(param),
            kind,
            detail: detail.into(),
        }
    }

    /// Returns the finding's severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

// ============================================================================
// SECTION: Validation Report
// ============================================================================

/// Accumulated findings for one rule validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidationReport {
    /// Findings in deterministic walk order.
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// Returns true when no findings were produced.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns true when no error-severity finding blocks export.
    #[must_use]
    pub fn is_exportable(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Iterates error-severity findings.
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|finding| finding.severity() == Severity::Error)
    }

    /// Iterates warning-severity findings.
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|finding| finding.severity() == Severity::Warning)
    }

    /// Iterates findings attached to one node.
    pub fn for_node<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |finding| &finding.node_id == node_id)
    }
}

// ============================================================================
// SECTION: Compatibility Validator
// ============================================================================

/// Validates rules against an injected registry and resolver set.
pub struct CompatibilityValidator<'a> {
    /// Definition registry snapshot.
    registry: &'a DefinitionRegistry,
    /// Host option resolvers.
    resolvers: &'a ResolverRegistry,
}

impl<'a> CompatibilityValidator<'a> {
    /// Creates a validator over the registry and resolvers.
    #[must_use]
    pub const fn new(registry: &'a DefinitionRegistry, resolvers: &'a ResolverRegistry) -> Self {
        Self {
            registry,
            resolvers,
        }
    }

    /// Validates the rule for the owning object kind.
    ///
    /// Findings are accumulated in deterministic walk order: the trigger,
    /// then conditions group by group, then effects in slot order, then the
    /// chance and repetition cells of random and loop groups.
    #[must_use]
    pub fn validate(&self, rule: &Rule, object: &ObjectKind) -> ValidationReport {
        let mut findings = Vec::new();

        self.check_trigger(rule, object, &mut findings);

        for condition in rule.conditions() {
            match self.registry.condition_type(&condition.condition_type) {
                Err(_) => findings.push(Finding::new(
                    condition.id.clone(),
                    FindingKind::UnknownType,
                    format!("condition type {} is not defined", condition.condition_type),
                )),
                Ok(definition) => check_node(
                    definition,
                    &condition.id,
                    &condition.params,
                    &rule.trigger,
                    object,
                    self.resolvers,
                    &mut findings,
                ),
            }
        }

        for effect in rule.all_effects() {
            match self.registry.effect_type(&effect.effect_type) {
                Err(_) => findings.push(Finding::new(
                    effect.id.clone(),
                    FindingKind::UnknownType,
                    format!("effect type {} is not defined", effect.effect_type),
                )),
                Ok(definition) => check_node(
                    definition,
                    &effect.id,
                    &effect.params,
                    &rule.trigger,
                    object,
                    self.resolvers,
                    &mut findings,
                ),
            }
        }

        for group in rule.random_groups() {
            check_random_group(group, &mut findings);
        }
        for group in rule.loops() {
            check_loop_group(group, &mut findings);
        }

        ValidationReport {
            findings,
        }
    }

    /// Checks trigger existence and object-user legality.
    fn check_trigger(&self, rule: &Rule, object: &ObjectKind, findings: &mut Vec<Finding>) {
        match self.registry.trigger(&rule.trigger) {
            Err(_) => findings.push(Finding::new(
                rule.id.clone(),
                FindingKind::IncompatibleTrigger,
                format!("trigger {} is not defined", rule.trigger),
            )),
            Ok(definition) if !definition.allows_object(object) => findings.push(Finding::new(
                rule.id.clone(),
                FindingKind::IncompatibleTrigger,
                format!("trigger {} does not permit object kind {object}", rule.trigger),
            )),
            Ok(_) => {}
        }
    }
}

// ============================================================================
// SECTION: Node Checks
// ============================================================================

/// Checks one condition or effect node against its type definition.
fn check_node<D: TypeDefinition>(
    definition: &D,
    node_id: &NodeId,
    params: &ParamValues,
    trigger: &TriggerId,
    object: &ObjectKind,
    resolvers: &ResolverRegistry,
    findings: &mut Vec<Finding>,
) {
    if !definition.allows_trigger(trigger) {
        findings.push(Finding::new(
            node_id.clone(),
            FindingKind::IncompatibleTrigger,
            format!("type is not applicable under trigger {trigger}"),
        ));
    }
    if !definition.allows_object(object) {
        findings.push(Finding::new(
            node_id.clone(),
            FindingKind::IncompatibleObject,
            format!("type does not permit object kind {object}"),
        ));
    }

    for (param_id, cell) in params {
        let Some(param) = definition.param(param_id) else {
            findings.push(Finding::for_param(
                node_id.clone(),
                param_id.clone(),
                FindingKind::UnknownOption,
                "stored parameter is not declared by the type definition",
            ));
            continue;
        };

        if param.is_exempt_for(object) {
            findings.push(Finding::for_param(
                node_id.clone(),
                param_id.clone(),
                FindingKind::ExemptValue,
                format!("parameter does not apply to object kind {object}"),
            ));
            continue;
        }

        // Hidden parameters keep their stored value but are not validated.
        if !is_visible(param, params) {
            continue;
        }

        check_cell(param, node_id, param_id, cell, params, object, resolvers, findings);
    }
}

/// Checks one visible value cell against its parameter definition.
#[allow(clippy::too_many_arguments, reason = "Validation context is threaded explicitly.")]
fn check_cell(
    param: &ParameterDefinition,
    node_id: &NodeId,
    param_id: &ParamId,
    cell: &ValueCell,
    siblings: &ParamValues,
    object: &ObjectKind,
    resolvers: &ResolverRegistry,
    findings: &mut Vec<Finding>,
) {
    if let Some(kind) = cell.variable_kind() {
        if !param.accepts_variable(kind) {
            findings.push(Finding::for_param(
                node_id.clone(),
                param_id.clone(),
                FindingKind::InvalidVariableType,
                format!("variable kind {kind} is not accepted here"),
            ));
        }
        return;
    }

    match param.kind {
        ParameterKind::Select => {
            check_select_value(param, node_id, param_id, cell, siblings, object, resolvers, findings);
        }
        ParameterKind::Number | ParameterKind::Range => {
            check_numeric_value(param, node_id, param_id, cell, findings);
        }
        ParameterKind::Text | ParameterKind::Checkbox => {}
    }
}

/// Checks a stored select value against the resolved option list.
#[allow(clippy::too_many_arguments, reason = "Validation context is threaded explicitly.")]
fn check_select_value(
    param: &ParameterDefinition,
    node_id: &NodeId,
    param_id: &ParamId,
    cell: &ValueCell,
    siblings: &ParamValues,
    object: &ObjectKind,
    resolvers: &ResolverRegistry,
    findings: &mut Vec<Finding>,
) {
    let options = match resolve_options_unfiltered(param, siblings, resolvers) {
        Ok(options) => options,
        Err(OptionError::NoOptions(_)) => {
            findings.push(Finding::for_param(
                node_id.clone(),
                param_id.clone(),
                FindingKind::UnknownOption,
                "select parameter declares no options source",
            ));
            return;
        }
        Err(OptionError::UnknownResolver(resolver)) => {
            findings.push(Finding::for_param(
                node_id.clone(),
                param_id.clone(),
                FindingKind::UnknownOption,
                format!("options unresolvable: unknown resolver {resolver}"),
            ));
            return;
        }
        // Visibility was checked before descending into the cell.
        Err(OptionError::HiddenParameter(_)) => return,
    };

    let Some(value) = cell.as_literal() else {
        return;
    };
    match options.iter().find(|option| &option.value == value) {
        Some(option) if option.is_exempt_for(object) => findings.push(Finding::for_param(
            node_id.clone(),
            param_id.clone(),
            FindingKind::ExemptValue,
            format!("selected option is exempt for object kind {object}"),
        )),
        Some(_) => {}
        None => findings.push(Finding::for_param(
            node_id.clone(),
            param_id.clone(),
            FindingKind::UnknownOption,
            "stored value is absent from the resolved option list",
        )),
    }
}

/// Checks a numeric literal against declared bounds.
fn check_numeric_value(
    param: &ParameterDefinition,
    node_id: &NodeId,
    param_id: &ParamId,
    cell: &ValueCell,
    findings: &mut Vec<Finding>,
) {
    let Some(value) = cell.as_number() else {
        findings.push(Finding::for_param(
            node_id.clone(),
            param_id.clone(),
            FindingKind::OutOfRange,
            "expected a numeric literal",
        ));
        return;
    };
    if let Some(min) = param.min
        && value < min
    {
        findings.push(Finding::for_param(
            node_id.clone(),
            param_id.clone(),
            FindingKind::OutOfRange,
            format!("value {value} is below the minimum {min}"),
        ));
    }
    if let Some(max) = param.max
        && value > max
    {
        findings.push(Finding::for_param(
            node_id.clone(),
            param_id.clone(),
            FindingKind::OutOfRange,
            format!("value {value} is above the maximum {max}"),
        ));
    }
}

// ============================================================================
// SECTION: Group Cell Checks
// ============================================================================

/// Checks the chance cells of a random group.
fn check_random_group(group: &RandomGroup, findings: &mut Vec<Finding>) {
    if let Some(numerator) = group.chance_numerator.as_literal() {
        match numerator.as_f64() {
            None => findings.push(Finding::new(
                group.id.clone(),
                FindingKind::OutOfRange,
                "chance numerator must be a numeric literal or variable",
            )),
            Some(value) if value < 0.0 => findings.push(Finding::new(
                group.id.clone(),
                FindingKind::OutOfRange,
                format!("chance numerator {value} is negative"),
            )),
            Some(_) => {}
        }
    }
    if let Some(denominator) = group.chance_denominator.as_literal() {
        match denominator.as_f64() {
            None => findings.push(Finding::new(
                group.id.clone(),
                FindingKind::OutOfRange,
                "chance denominator must be a numeric literal or variable",
            )),
            Some(value) if value <= 0.0 => findings.push(Finding::new(
                group.id.clone(),
                FindingKind::OutOfRange,
                format!("chance denominator {value} must be positive"),
            )),
            Some(_) => {}
        }
    }
}

/// Checks the repetition cell of a loop group.
fn check_loop_group(group: &LoopGroup, findings: &mut Vec<Finding>) {
    if let Some(repetitions) = group.repetitions.as_literal() {
        match repetitions.as_f64() {
            None => findings.push(Finding::new(
                group.id.clone(),
                FindingKind::OutOfRange,
                "repetitions must be a numeric literal or variable",
            )),
            Some(value) if value < 0.0 => findings.push(Finding::new(
                group.id.clone(),
                FindingKind::OutOfRange,
                format!("repetitions {value} is negative; it will clamp to zero"),
            )),
            Some(_) => {}
        }
    }
}
