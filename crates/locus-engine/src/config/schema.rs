use crate::identifier::IdentifierKind;
use crate::search::DEFAULT_MAX_WILDCARDS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub finder: FinderConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Worker threads; 0 uses the available parallelism.
    #[serde(default)]
    pub workers: usize,
    /// Match elements no identifier claims by their id and visible text.
    #[serde(default = "default_true")]
    pub generic_elements: bool,
    /// Return the first settable field when the locator is empty.
    #[serde(default = "default_true")]
    pub empty_locator_fallback: bool,
    #[serde(default = "default_identifiers")]
    pub identifiers: Vec<IdentifierKind>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            generic_elements: default_true(),
            empty_locator_fallback: default_true(),
            identifiers: default_identifiers(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_identifiers() -> Vec<IdentifierKind> {
    IdentifierKind::ALL.to_vec()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_max_wildcards")]
    pub max_wildcards: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_wildcards: default_max_wildcards(),
        }
    }
}

fn default_max_wildcards() -> usize {
    DEFAULT_MAX_WILDCARDS
}
