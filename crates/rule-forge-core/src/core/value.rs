// rule-forge-core/src/core/value.rs
// ============================================================================
// Module: Rule Forge Value Cells
// Description: Literal-or-variable value containers for rule parameters.
// Purpose: Preserve the wire shape while exposing an explicit two-variant model.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A value cell is the leaf of the rule IR: either a literal JSON value or a
//! reference to a game variable of a declared kind. On the wire a cell is
//! `{value, valueType?}`; an absent `valueType` marks a literal, a present
//! `valueType` marks a variable reference whose `value` must be a string key.
//! The tagging is resolved at construction time so every later read dispatches
//! on an explicit variant instead of inspecting raw JSON.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::ParamId;
use crate::core::identifiers::VariableKind;

// ============================================================================
// SECTION: Type Aliases
// ============================================================================

/// Ordered mapping from parameter id to stored value cell.
pub type ParamValues = BTreeMap<ParamId, ValueCell>;

// ============================================================================
// SECTION: Value Cell
// ============================================================================

/// Literal-or-variable container for a single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValueCell", into = "RawValueCell")]
pub enum ValueCell {
    /// Literal JSON value stored as authored.
    Literal(Value),
    /// Reference to a game variable.
    Variable {
        /// Declared kind of the referenced variable.
        kind: VariableKind,
        /// Stable key of the referenced variable.
        key: String,
    },
}

impl ValueCell {
    /// Creates a literal cell from any JSON value.
    #[must_use]
    pub const fn literal(value: Value) -> Self {
        Self::Literal(value)
    }

    /// Creates a literal cell from a number.
    #[must_use]
    pub fn number(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Self::Literal(Value::Null), |number| {
            Self::Literal(Value::Number(number))
        })
    }

    /// Creates a literal cell from a string.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Value::String(value.into()))
    }

    /// Creates a variable reference cell.
    #[must_use]
    pub fn variable(kind: impl Into<VariableKind>, key: impl Into<String>) -> Self {
        Self::Variable {
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Returns the literal value when this cell is a literal.
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Variable { .. } => None,
        }
    }

    /// Returns the variable kind when this cell is a variable reference.
    #[must_use]
    pub const fn variable_kind(&self) -> Option<&VariableKind> {
        match self {
            Self::Literal(_) => None,
            Self::Variable {
                kind, ..
            } => Some(kind),
        }
    }

    /// Returns the literal as a finite number when possible.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        self.as_literal().and_then(Value::as_f64)
    }

    /// Returns the string form used for `showWhen` membership tests.
    ///
    /// Literals coerce to their natural string representation (strings
    /// verbatim, scalars via their JSON text); variable references coerce to
    /// the referenced key.
    #[must_use]
    pub fn display_key(&self) -> String {
        match self {
            Self::Literal(Value::String(text)) => text.clone(),
            Self::Literal(value) => value.to_string(),
            Self::Variable {
                key, ..
            } => key.clone(),
        }
    }
}

// ============================================================================
// SECTION: Wire Shape
// ============================================================================

/// Exact wire form of a value cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawValueCell {
    /// Literal value or variable key.
    pub value: Value,
    /// Variable kind tag; absent for literals.
    #[serde(rename = "valueType", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

/// Errors raised when interpreting a raw value cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueCellError {
    /// A variable reference carried a non-string key.
    #[error("variable reference of kind {kind} must store a string key")]
    NonStringVariableKey {
        /// Declared variable kind on the offending cell.
        kind: String,
    },
}

impl TryFrom<RawValueCell> for ValueCell {
    type Error = ValueCellError;

    fn try_from(raw: RawValueCell) -> Result<Self, Self::Error> {
        match raw.value_type {
            None => Ok(Self::Literal(raw.value)),
            Some(kind) => match raw.value {
                Value::String(key) => Ok(Self::Variable {
                    kind: VariableKind::new(kind),
                    key,
                }),
                _ => Err(ValueCellError::NonStringVariableKey {
                    kind,
                }),
            },
        }
    }
}

impl From<ValueCell> for RawValueCell {
    fn from(cell: ValueCell) -> Self {
        match cell {
            ValueCell::Literal(value) => Self {
                value,
                value_type: None,
            },
            ValueCell::Variable {
                kind,
                key,
            } => Self {
                value: Value::String(key),
                value_type: Some(kind.as_str().to_owned()),
            },
        }
    }
}
