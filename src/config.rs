use serde::{Deserialize, Serialize};

use crate::error::StructuredSearchError;
use crate::query::reference::ContainerRef;
use crate::query::types::QueryBuilderMode;
use crate::Result;

/// Query builder configuration
///
/// Lets an application declare its container references once, e.g. in a JSON
/// file shipped next to its search options, instead of registering them in code.
///
/// ```json
/// {
///   "mode": "json",
///   "default_xml_namespace": "http://example.com/products",
///   "references": [
///     { "name": "price", "target": "price", "kind": "json_property", "range_type": "xs:decimal" },
///     { "name": "sku", "target": "sku", "kind": "xml_element" }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub mode: QueryBuilderMode,
    pub default_xml_namespace: String,
    pub references: Vec<ContainerRef>,
}

impl BuilderConfig {
    /// Load configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| StructuredSearchError::Config(format!("Invalid builder config: {}", e)))
    }

    /// Add a reference declaration
    pub fn with_reference(mut self, reference: ContainerRef) -> Self {
        self.references.push(reference);
        self
    }
}
