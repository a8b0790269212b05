//! Graph configuration.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling graph bookkeeping.
///
/// Loadable from TOML; missing keys take their defaults:
///
/// ```toml
/// name = "camera-pipeline"
/// self_loops = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Optional graph name, used in logs and renderings.
    pub name: Option<String>,
    /// Mark every newly added node as connected to itself.
    pub self_loops: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            name: None,
            self_loops: true,
        }
    }
}

impl GraphOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the graph name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Enable/disable self-loops on add.
    pub fn with_self_loops(mut self, self_loops: bool) -> Self {
        self.self_loops = self_loops;
        self
    }

    /// Parse options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = GraphOptions::default();
        assert!(options.self_loops);
        assert!(options.name.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let options = GraphOptions::from_toml_str("name = \"lab\"").unwrap();
        assert_eq!(options, GraphOptions::new().with_name("lab"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = GraphOptions::from_toml_str("self_loops = \"sometimes\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "self_loops = false").unwrap();

        let options = GraphOptions::load(file.path()).unwrap();
        assert!(!options.self_loops);

        assert!(matches!(
            GraphOptions::load("/definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
