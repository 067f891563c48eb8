//! Named container references
//!
//! A container is the JSON property or XML element a value or range query is
//! evaluated against. Callers register containers under a reference name once,
//! then build queries by naming the reference.

use crate::error::StructuredSearchError;
use crate::query::encode::{push_json_string, push_xml_element, push_xml_text};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Range type written when a reference does not declare one
pub const DEFAULT_RANGE_TYPE: &str = "xs:string";

/// Where a container comes from in the document shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    JsonProperty,
    XmlElement,
}

/// A registered, named container reference
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRef {
    /// Name callers use to refer to this container
    pub name: String,
    /// JSON property name or XML element local name
    pub target: String,
    pub kind: ContainerKind,
    /// XML namespace of the element. Falls back to the builder default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Range index type, e.g. `xs:int`. Defaults to `xs:string`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_type: Option<String>,
}

impl ContainerRef {
    /// Reference a JSON property
    pub fn json_property(name: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: property.into(),
            kind: ContainerKind::JsonProperty,
            namespace: None,
            range_type: None,
        }
    }

    /// Reference an XML element
    pub fn xml_element(
        name: impl Into<String>,
        element: impl Into<String>,
        namespace: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: element.into(),
            kind: ContainerKind::XmlElement,
            namespace,
            range_type: None,
        }
    }

    /// Set the range index type used by range queries on this container
    pub fn with_range_type(mut self, range_type: impl Into<String>) -> Self {
        self.range_type = Some(range_type.into());
        self
    }

    pub fn range_type(&self) -> &str {
        self.range_type.as_deref().unwrap_or(DEFAULT_RANGE_TYPE)
    }

    /// Bind this reference as the given kind of container
    ///
    /// An XML element without its own namespace stays unqualified here; the
    /// builder's default namespace is applied when the query is written.
    pub fn resolve(&self, kind: ContainerKind) -> Container {
        match kind {
            ContainerKind::JsonProperty => Container::JsonProperty(self.target.clone()),
            ContainerKind::XmlElement => Container::Element(ElementName {
                name: self.target.clone(),
                ns: self.namespace.clone().filter(|ns| !ns.is_empty()),
            }),
        }
    }
}

/// Qualified XML element name
///
/// `ns` is `None` until a namespace is known. An unqualified element is written
/// with an empty namespace unless a default is applied first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementName {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns: Option<String>,
}

impl ElementName {
    /// Element in namespace `ns`. An empty `ns` leaves the element unqualified.
    pub fn new(name: impl Into<String>, ns: impl Into<String>) -> Self {
        let ns = ns.into();
        Self {
            name: name.into(),
            ns: (!ns.is_empty()).then_some(ns),
        }
    }

    /// Element with no namespace of its own
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ns: None,
        }
    }

    pub fn namespace(&self) -> &str {
        self.ns.as_deref().unwrap_or("")
    }

    /// Qualify an unqualified element with `default_namespace`
    pub fn apply_default_namespace(&mut self, default_namespace: &str) {
        if self.ns.is_none() && !default_namespace.is_empty() {
            self.ns = Some(default_namespace.to_string());
        }
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        out.push_str("\"element\":{\"name\":");
        push_json_string(out, &self.name);
        out.push_str(",\"ns\":");
        push_json_string(out, self.namespace());
        out.push('}');
    }

    pub(crate) fn write_xml(&self, out: &mut String) {
        out.push_str("<element ns=\"");
        push_xml_text(out, self.namespace());
        out.push_str("\" name=\"");
        push_xml_text(out, &self.name);
        out.push_str("\"/>");
    }
}

/// A resolved container, ready to be written into a query
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    JsonProperty(String),
    Element(ElementName),
}

impl Container {
    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::JsonProperty(_) => ContainerKind::JsonProperty,
            Container::Element(_) => ContainerKind::XmlElement,
        }
    }

    pub fn apply_default_namespace(&mut self, default_namespace: &str) {
        if let Container::Element(element) = self {
            element.apply_default_namespace(default_namespace);
        }
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        match self {
            Container::JsonProperty(property) => {
                out.push_str("\"json-property\":");
                push_json_string(out, property);
            }
            Container::Element(element) => element.write_json(out),
        }
    }

    pub(crate) fn write_xml(&self, out: &mut String) {
        match self {
            Container::JsonProperty(property) => push_xml_element(out, "json-property", property),
            Container::Element(element) => element.write_xml(out),
        }
    }
}

/// Table of container references, keyed by reference name
#[derive(Clone, Debug, Default)]
pub struct ReferenceTable {
    refs: HashMap<String, ContainerRef>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reference. Names must be unique within the table.
    pub fn register(&mut self, reference: ContainerRef) -> Result<()> {
        if self.refs.contains_key(&reference.name) {
            return Err(StructuredSearchError::DuplicateReference(reference.name));
        }
        debug!(
            name = %reference.name,
            target = %reference.target,
            kind = ?reference.kind,
            "registered container reference"
        );
        self.refs.insert(reference.name.clone(), reference);
        Ok(())
    }

    /// Look up a reference by name
    pub fn resolve(&self, name: &str) -> Result<&ContainerRef> {
        self.refs
            .get(name)
            .ok_or_else(|| StructuredSearchError::UnknownReference(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.refs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContainerRef> {
        self.refs.values()
    }
}
