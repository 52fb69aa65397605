//! Configuration: which bibliography goes into which region

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One render call: a bibliography source and the region it fills
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBinding {
    /// Path or URL of the BibTeX file
    pub source: String,
    /// Id of the container element on the page
    pub region: String,
}

impl SourceBinding {
    pub fn new(source: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            region: region.into(),
        }
    }
}

/// Setup configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitecardsConfig {
    pub sources: Vec<SourceBinding>,
}

impl Default for CitecardsConfig {
    /// The publications page layout: journals and conference papers
    fn default() -> Self {
        Self {
            sources: vec![
                SourceBinding::new("publications/journals.bib", "journal-list"),
                SourceBinding::new("publications/conferences.bib", "conference-list"),
            ],
        }
    }
}

impl CitecardsConfig {
    pub fn new(sources: Vec<SourceBinding>) -> Self {
        Self { sources }
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check the bindings before any render starts
    ///
    /// Each region may be bound once: two render calls must never share a
    /// container.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut regions = HashSet::new();
        for binding in &self.sources {
            if binding.source.trim().is_empty() {
                return Err(ConfigError::BlankField("source"));
            }
            if binding.region.trim().is_empty() {
                return Err(ConfigError::BlankField("region"));
            }
            if !regions.insert(binding.region.as_str()) {
                return Err(ConfigError::DuplicateRegion(binding.region.clone()));
            }
        }

        Ok(())
    }
}

/// Configuration loading or validation error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(String),
    #[error("No sources configured")]
    Empty,
    #[error("Blank {0} in source binding")]
    BlankField(&'static str),
    #[error("Region `{0}` is bound to more than one source")]
    DuplicateRegion(String),
}
