// rule-forge-core/src/runtime/options.rs
// ============================================================================
// Module: Rule Forge Option Resolution
// Description: Legal value set computation for select parameters.
// Purpose: Resolve static, computed, and derived option sources deterministically.
// Dependencies: crate::core, crate::interfaces, crate::runtime::visibility
// ============================================================================

//! ## Overview
//! Option resolution turns a parameter's declared option source into the
//! concrete list the editor presents and the validator checks against.
//! Static lists pass through unchanged, named resolvers are dispatched
//! through the injected [`ResolverRegistry`], and options exempt for the
//! current object kind are filtered out of the presented list. Resolution of
//! a hidden parameter is a defined error: callers check visibility first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::ObjectKind;
use crate::core::registry::OptionsSource;
use crate::core::registry::ParamOption;
use crate::core::registry::ParameterDefinition;
use crate::core::value::ParamValues;
use crate::interfaces::ResolverRegistry;
use crate::runtime::visibility::is_visible;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while resolving a parameter's option list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// The parameter is hidden by its `showWhen` gate.
    #[error("parameter {0} is hidden; resolve visibility before options")]
    HiddenParameter(String),
    /// The parameter declares no option source.
    #[error("parameter {0} declares no options")]
    NoOptions(String),
    /// The named resolver is not registered.
    #[error("unknown option resolver: {0}")]
    UnknownResolver(String),
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves the presented option list for a visible parameter.
///
/// Options exempt for `object` are filtered out. The result is deterministic:
/// resolvers are required to be pure, so re-resolution with unchanged
/// siblings is idempotent.
///
/// # Errors
///
/// Returns [`OptionError::HiddenParameter`] when the parameter is hidden,
/// [`OptionError::NoOptions`] when it declares no source, and
/// [`OptionError::UnknownResolver`] when a named resolver is missing.
pub fn resolve_options(
    param: &ParameterDefinition,
    siblings: &ParamValues,
    object: &ObjectKind,
    resolvers: &ResolverRegistry,
) -> Result<Vec<ParamOption>, OptionError> {
    let mut options = resolve_options_unfiltered(param, siblings, resolvers)?;
    options.retain(|option| !option.is_exempt_for(object));
    Ok(options)
}

/// Resolves the full option list without exemption filtering.
///
/// The compatibility validator needs exempt options present so a stored
/// value referencing one is reported as an exemption error rather than an
/// unknown value.
///
/// # Errors
///
/// Returns the same errors as [`resolve_options`].
pub fn resolve_options_unfiltered(
    param: &ParameterDefinition,
    siblings: &ParamValues,
    resolvers: &ResolverRegistry,
) -> Result<Vec<ParamOption>, OptionError> {
    if !is_visible(param, siblings) {
        return Err(OptionError::HiddenParameter(param.id.to_string()));
    }
    let Some(source) = &param.options else {
        return Err(OptionError::NoOptions(param.id.to_string()));
    };
    match source {
        OptionsSource::Static {
            options,
        } => Ok(options.clone()),
        OptionsSource::Computed {
            resolver,
        } => resolvers
            .computed(resolver)
            .map(|compute| compute.options())
            .ok_or_else(|| OptionError::UnknownResolver(resolver.to_string())),
        OptionsSource::Derived {
            resolver,
        } => resolvers
            .derived(resolver)
            .map(|derive| derive.options(siblings))
            .ok_or_else(|| OptionError::UnknownResolver(resolver.to_string())),
    }
}
