//! Survey manifest
//!
//! Loaded once at session start: the component categories under
//! comparison and the candidate extraction methods with their content
//! files. Both lists are immutable for the lifetime of a session.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A candidate extraction method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    /// Short code used in votes and seeds, e.g. "hybrid".
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Content file under the methods directory, relative.
    pub file: String,
}

/// The survey manifest: components and methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub components: Vec<String>,
    pub methods: Vec<Method>,
}

impl Manifest {
    /// Load and validate a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let manifest: Manifest = serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!("invalid manifest {}: {}", path.display(), e))
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Look up a method by id.
    pub fn method(&self, id: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.id == id)
    }

    fn validate(&self) -> Result<()> {
        if self.components.is_empty() {
            return Err(Error::Config("manifest lists no components".to_string()));
        }
        if self.methods.len() < 2 {
            return Err(Error::Config(
                "manifest must list at least two methods to compare".to_string(),
            ));
        }
        for (i, method) in self.methods.iter().enumerate() {
            if method.id.is_empty() {
                return Err(Error::Config(format!("method #{} has an empty id", i)));
            }
            if self.methods[..i].iter().any(|m| m.id == method.id) {
                return Err(Error::Config(format!(
                    "duplicate method id '{}' in manifest",
                    method.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "components": ["action_space", "conversation_state", "cautions", "user_profile"],
            "methods": [
                {"id": "hybrid", "name": "Hybrid (rules + LLM)", "file": "hybrid.json"},
                {"id": "rule_based", "name": "Rule-based", "file": "rule_based.json"}
            ]
        }"#
    }

    #[test]
    fn test_parse_and_lookup() {
        let manifest: Manifest = serde_json::from_str(sample_json()).unwrap();
        manifest.validate().unwrap();
        assert_eq!(manifest.components.len(), 4);
        assert_eq!(manifest.method("hybrid").unwrap().name, "Hybrid (rules + LLM)");
        assert!(manifest.method("missing").is_none());
    }

    #[test]
    fn test_rejects_duplicate_method_ids() {
        let manifest = Manifest {
            components: vec!["cautions".to_string()],
            methods: vec![
                Method {
                    id: "hybrid".to_string(),
                    name: "Hybrid".to_string(),
                    file: "a.json".to_string(),
                },
                Method {
                    id: "hybrid".to_string(),
                    name: "Hybrid again".to_string(),
                    file: "b.json".to_string(),
                },
            ],
        };
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_lists() {
        let manifest = Manifest {
            components: vec![],
            methods: vec![],
        };
        assert!(manifest.validate().is_err());

        let manifest = Manifest {
            components: vec!["cautions".to_string()],
            methods: vec![Method {
                id: "only".to_string(),
                name: "Only".to_string(),
                file: "only.json".to_string(),
            }],
        };
        assert!(manifest.validate().is_err(), "one method leaves nothing to compare");
    }
}
