// rule-forge-core/src/runtime/mod.rs
// ============================================================================
// Module: Rule Forge Runtime
// Description: Resolution, validation, normalization, and editing over rules.
// Purpose: Provide the pure algorithms invoked on every editor interaction.
// Dependencies: crate::{core, interfaces}, guard-logic
// ============================================================================

//! ## Overview
//! The runtime layer holds every operation the editor invokes after an edit:
//! visibility and option resolution for the touched node, compatibility
//! validation of the whole graph, guard previews, normalization, patch
//! application, and the export gate. All operations are synchronous pure
//! functions over the current rule and registry snapshot.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod export;
pub mod feedback;
pub mod guard;
pub mod normalize;
pub mod options;
pub mod patch;
pub mod validate;
pub mod visibility;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use export::ExportError;
pub use export::ExportedRule;
pub use export::export_rule;
pub use feedback::FeedbackError;
pub use feedback::NodeFeedback;
pub use feedback::ParamFeedback;
pub use feedback::node_feedback;
pub use guard::ConditionPredicate;
pub use guard::GuardEvaluation;
pub use guard::GuardTraceEntry;
pub use guard::ProbeReader;
pub use guard::build_guard;
pub use guard::evaluate_guard;
pub use normalize::DropReason;
pub use normalize::DroppedItem;
pub use normalize::NormalizedRule;
pub use normalize::normalize;
pub use options::OptionError;
pub use options::resolve_options;
pub use options::resolve_options_unfiltered;
pub use patch::PatchError;
pub use patch::RulePatch;
pub use patch::apply_patch;
pub use validate::CompatibilityValidator;
pub use validate::Finding;
pub use validate::FindingKind;
pub use validate::Severity;
pub use validate::ValidationReport;
pub use visibility::is_visible;
pub use visibility::visible_params;
