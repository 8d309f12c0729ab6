//! Tool Catalog
//!
//! Read-only lookup of the tools discovered from the provider at
//! session start. The catalog is pure metadata: execution happens
//! behind [`ToolProvider`](crate::ToolProvider), so there are no
//! handlers here, only descriptors for lookup and prompt rendering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// Parameter of a discovered tool
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
}

/// A discovered tool, as advertised by the provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to the model)
    pub description: String,

    /// Parameter definitions, in the provider's declared order
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
}

/// Immutable name-keyed catalog, built once per session.
#[derive(Clone, Debug, Default)]
pub struct ToolCatalog {
    // Descriptors keep discovery order so `describe` is deterministic;
    // the index map serves name lookup.
    descriptors: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Build a catalog from discovered descriptors.
    ///
    /// Fails with [`AgentError::DuplicateTool`] if two descriptors
    /// share a name; a session must not proceed with an ambiguous
    /// catalog.
    pub fn build(descriptors: Vec<ToolDescriptor>) -> Result<Self> {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (i, descriptor) in descriptors.iter().enumerate() {
            if index.insert(descriptor.name.clone(), i).is_some() {
                return Err(AgentError::DuplicateTool(descriptor.name.clone()));
            }
        }
        Ok(Self { descriptors, index })
    }

    /// Look up a tool by name. Total; a miss is an explicit `None`.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    /// Tool names in discovery order
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    /// Number of tools
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Render the tool listing embedded into the system prompt.
    ///
    /// One line per tool, one indented line per parameter, in declared
    /// order. Same input always renders the same string.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for descriptor in &self.descriptors {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("- {}: {}", descriptor.name, descriptor.description));
            for param in &descriptor.parameters {
                let marker = if param.required { "required" } else { "optional" };
                out.push_str(&format!(
                    "\n    - {}: {} ({})",
                    param.name, param.param_type, marker
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: name.into(),
            description: format!("{name} tool"),
            parameters: vec![],
        }
    }

    #[test]
    fn test_build_and_lookup() {
        let catalog =
            ToolCatalog::build(vec![descriptor("random_joke"), descriptor("book_recs")]).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("random_joke").is_some());
        assert!(catalog.get("missing").is_none());
        assert_eq!(catalog.names(), vec!["random_joke", "book_recs"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = ToolCatalog::build(vec![descriptor("joke"), descriptor("joke")]).unwrap_err();
        assert!(matches!(err, AgentError::DuplicateTool(name) if name == "joke"));
    }

    #[test]
    fn test_describe_format_and_determinism() {
        let catalog = ToolCatalog::build(vec![
            ToolDescriptor {
                name: "book_recs".into(),
                description: "Recommend books".into(),
                parameters: vec![
                    ToolParameter {
                        name: "topic".into(),
                        param_type: "string".into(),
                        required: true,
                    },
                    ToolParameter {
                        name: "limit".into(),
                        param_type: "number".into(),
                        required: false,
                    },
                ],
            },
            descriptor("random_joke"),
        ])
        .unwrap();

        let expected = "- book_recs: Recommend books\n    - topic: string (required)\n    - limit: number (optional)\n- random_joke: random_joke tool";
        assert_eq!(catalog.describe(), expected);
        // Stable across repeated calls on the same catalog.
        assert_eq!(catalog.describe(), catalog.describe());
    }
}
