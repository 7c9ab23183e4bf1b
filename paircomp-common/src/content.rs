//! Per-method extracted content
//!
//! Each method's content file holds one JSON document keyed by component
//! name. A method is eligible for a component only when its section is
//! non-empty; emptiness is recursive, so `{"items": []}` or a
//! whitespace-only string count as empty.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::manifest::Manifest;
use crate::{Error, Result};

/// In-memory store of every method's content document.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    docs: HashMap<String, Value>,
}

impl ContentStore {
    /// Load the content file of every manifest method from `dir`.
    pub fn load(dir: &Path, manifest: &Manifest) -> Result<Self> {
        let mut docs = HashMap::with_capacity(manifest.methods.len());
        for method in &manifest.methods {
            let path = dir.join(&method.file);
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!(
                    "cannot read content file {} for method '{}': {}",
                    path.display(),
                    method.id,
                    e
                ))
            })?;
            let doc: Value = serde_json::from_str(&raw).map_err(|e| {
                Error::Config(format!(
                    "invalid content file {} for method '{}': {}",
                    path.display(),
                    method.id,
                    e
                ))
            })?;
            docs.insert(method.id.clone(), doc);
        }
        Ok(Self { docs })
    }

    /// Build a store from pre-loaded documents. Test seam; also used when
    /// content arrives from somewhere other than the filesystem.
    pub fn from_docs(docs: HashMap<String, Value>) -> Self {
        Self { docs }
    }

    /// Full content document for a method.
    pub fn document(&self, method_id: &str) -> Option<&Value> {
        self.docs.get(method_id)
    }

    /// Content section of one method for one component.
    pub fn section(&self, method_id: &str, component: &str) -> Option<&Value> {
        self.docs.get(method_id).and_then(|doc| doc.get(component))
    }

    /// Methods with non-empty content for `component`, in manifest order.
    pub fn eligible_methods(&self, manifest: &Manifest, component: &str) -> Vec<String> {
        manifest
            .methods
            .iter()
            .filter(|m| {
                self.section(&m.id, component)
                    .map(|v| !is_empty_value(v))
                    .unwrap_or(false)
            })
            .map(|m| m.id.clone())
            .collect()
    }
}

/// Recursive emptiness check over a JSON value.
///
/// Empty: null, a whitespace-only string, an array whose every element is
/// empty (including `[]`), an object whose every value is empty
/// (including `{}`). Numbers and booleans are never empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_empty_value),
        Value::Object(map) => map.values().all(is_empty_value),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
