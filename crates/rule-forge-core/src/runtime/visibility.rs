// rule-forge-core/src/runtime/visibility.rs
// ============================================================================
// Module: Rule Forge Visibility Resolution
// Description: Conditional parameter display driven by sibling values.
// Purpose: Decide which parameters are relevant without touching stored data.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! A parameter is visible when it declares no `showWhen` gate, or when the
//! referenced sibling's current value (coerced to string) is a member of the
//! gate's accepted values. Hidden parameters drop out of validation and of
//! exported cells, but their stored values are never deleted: toggling the
//! controlling sibling back restores the prior input without data loss.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::registry::ParameterDefinition;
use crate::core::value::ParamValues;

// ============================================================================
// SECTION: Visibility
// ============================================================================

/// Returns true when the parameter is visible under the sibling values.
///
/// A gate whose referenced sibling holds no value is closed: the membership
/// test has nothing to match against.
#[must_use]
pub fn is_visible(param: &ParameterDefinition, siblings: &ParamValues) -> bool {
    let Some(gate) = &param.show_when else {
        return true;
    };
    siblings
        .get(&gate.parameter)
        .is_some_and(|cell| gate.values.iter().any(|value| value == &cell.display_key()))
}

/// Returns the visible subset of the declared parameters, in declaration order.
#[must_use]
pub fn visible_params<'a>(
    params: &'a [ParameterDefinition],
    siblings: &ParamValues,
) -> Vec<&'a ParameterDefinition> {
    params.iter().filter(|param| is_visible(param, siblings)).collect()
}
