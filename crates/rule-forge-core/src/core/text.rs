// rule-forge-core/src/core/text.rs
// ============================================================================
// Module: Rule Forge Localized Text
// Description: Locale-keyed label and description maps for definitions.
// Purpose: Provide deterministic localized lookup with a stable fallback chain.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Definition labels and descriptions are locale-keyed maps supplied by the
//! catalog. Lookup falls back from the requested locale to the default locale
//! and finally to the first available entry, so a partially translated
//! catalog still renders.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fallback locale used when the requested locale is absent.
pub const DEFAULT_LOCALE: &str = "en";

// ============================================================================
// SECTION: Localized Text
// ============================================================================

/// Locale-keyed text map with deterministic fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    /// Creates an empty text map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns true when no locale entries exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Inserts or replaces the entry for a locale.
    pub fn insert(&mut self, locale: impl Into<String>, text: impl Into<String>) {
        self.0.insert(locale.into(), text.into());
    }

    /// Resolves text for a locale.
    ///
    /// Falls back to [`DEFAULT_LOCALE`], then to the first entry in locale
    /// order. Returns `None` only when the map is empty.
    #[must_use]
    pub fn resolve(&self, locale: &str) -> Option<&str> {
        self.0
            .get(locale)
            .or_else(|| self.0.get(DEFAULT_LOCALE))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
    }
}

impl From<&str> for LocalizedText {
    /// Builds a map holding the text under [`DEFAULT_LOCALE`].
    fn from(text: &str) -> Self {
        let mut map = Self::new();
        map.insert(DEFAULT_LOCALE, text);
        map
    }
}
