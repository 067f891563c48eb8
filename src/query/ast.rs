//! Abstract Syntax Tree for structured queries
//!
//! `QueryNode` is the closed set of query kinds the builder can produce. A tree
//! is serialized in two steps: `validate` rejects trees the database would not
//! accept (empty composites, unset range comparisons, fragments in the wrong
//! encoding), then the writer appends each node's fragment to a single buffer.

use crate::models::Format;
use crate::query::nodes::{
    BoolQuery, ElementValueQuery, GenericQuery, NotQuery, PropertyValueQuery, RangeQuery,
    SetQuery,
};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of a structured query tree
///
/// Nodes own their children, so a tree is built by moving child nodes into the
/// combinator that wraps them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryNode {
    /// Caller-supplied query text
    Generic(GenericQuery),
    /// Exact match on a JSON property
    PropertyValue(PropertyValueQuery),
    /// Exact match on an XML element
    ElementValue(ElementValueQuery),
    /// Comparison against a range index
    Range(RangeQuery),
    /// All children must match
    And(BoolQuery),
    /// At least one child must match
    Or(BoolQuery),
    /// The child must not match
    Not(NotQuery),
    /// Document is in at least one of the collections
    CollectionSet(SetQuery),
    /// Document has one of the URIs
    DocumentSet(SetQuery),
}

impl QueryNode {
    /// Structured query name of this node, for debugging and logging
    pub fn query_type(&self) -> &'static str {
        match self {
            QueryNode::Generic(_) => "generic",
            QueryNode::PropertyValue(_) | QueryNode::ElementValue(_) => "value-query",
            QueryNode::Range(_) => "range-query",
            QueryNode::And(_) => "and-query",
            QueryNode::Or(_) => "or-query",
            QueryNode::Not(_) => "not-query",
            QueryNode::CollectionSet(_) => "collection-query",
            QueryNode::DocumentSet(_) => "document-query",
        }
    }

    /// Direct children of this node
    pub fn children(&self) -> &[QueryNode] {
        match self {
            QueryNode::And(q) | QueryNode::Or(q) => &q.queries,
            QueryNode::Not(q) => std::slice::from_ref(&*q.query),
            _ => &[],
        }
    }

    /// Qualify every unqualified XML element in the tree with `default_namespace`
    pub fn apply_default_namespace(&mut self, default_namespace: &str) {
        match self {
            QueryNode::ElementValue(q) => q.element.apply_default_namespace(default_namespace),
            QueryNode::Range(q) => q.container.apply_default_namespace(default_namespace),
            QueryNode::And(q) | QueryNode::Or(q) => q
                .queries
                .iter_mut()
                .for_each(|child| child.apply_default_namespace(default_namespace)),
            QueryNode::Not(q) => q.query.apply_default_namespace(default_namespace),
            QueryNode::Generic(_)
            | QueryNode::PropertyValue(_)
            | QueryNode::CollectionSet(_)
            | QueryNode::DocumentSet(_) => {}
        }
    }

    /// Check that the whole tree can be written in `format`
    pub fn validate(&self, format: Format) -> Result<()> {
        match self {
            QueryNode::Generic(q) => q.validate(format),
            QueryNode::Range(q) => q.validate(),
            QueryNode::And(q) => q.validate("and-query", format),
            QueryNode::Or(q) => q.validate("or-query", format),
            QueryNode::Not(q) => q.validate(format),
            QueryNode::PropertyValue(_)
            | QueryNode::ElementValue(_)
            | QueryNode::CollectionSet(_)
            | QueryNode::DocumentSet(_) => Ok(()),
        }
    }

    /// Validate the tree, then write it in `format`
    pub fn serialize(&self, format: Format) -> Result<String> {
        self.validate(format)?;
        let mut out = String::new();
        self.write(format, &mut out);
        Ok(out)
    }

    /// Serialize as JSON
    pub fn to_json(&self) -> Result<String> {
        self.serialize(Format::Json)
    }

    /// Serialize as XML
    pub fn to_xml(&self) -> Result<String> {
        self.serialize(Format::Xml)
    }

    /// Append this tree to `out` without validating it
    pub fn write(&self, format: Format, out: &mut String) {
        match format {
            Format::Json => self.write_json(out),
            Format::Xml => self.write_xml(out),
        }
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        match self {
            QueryNode::Generic(q) => q.write(out),
            QueryNode::PropertyValue(q) => q.write_json(out),
            QueryNode::ElementValue(q) => q.write_json(out),
            QueryNode::Range(q) => q.write_json(out),
            QueryNode::And(q) => q.write_json("and-query", out),
            QueryNode::Or(q) => q.write_json("or-query", out),
            QueryNode::Not(q) => q.write_json(out),
            QueryNode::CollectionSet(q) => q.write_json("collection-query", out),
            QueryNode::DocumentSet(q) => q.write_json("document-query", out),
        }
    }

    pub(crate) fn write_xml(&self, out: &mut String) {
        match self {
            QueryNode::Generic(q) => q.write(out),
            QueryNode::PropertyValue(q) => q.write_xml(out),
            QueryNode::ElementValue(q) => q.write_xml(out),
            QueryNode::Range(q) => q.write_xml(out),
            QueryNode::And(q) => q.write_xml("and-query", out),
            QueryNode::Or(q) => q.write_xml("or-query", out),
            QueryNode::Not(q) => q.write_xml(out),
            QueryNode::CollectionSet(q) => q.write_xml("collection-query", out),
            QueryNode::DocumentSet(q) => q.write_xml("document-query", out),
        }
    }
}

/// Writes the JSON encoding. Display never validates; use `serialize` for that.
impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_json(&mut out);
        f.write_str(&out)
    }
}

impl From<GenericQuery> for QueryNode {
    fn from(query: GenericQuery) -> Self {
        QueryNode::Generic(query)
    }
}

impl From<PropertyValueQuery> for QueryNode {
    fn from(query: PropertyValueQuery) -> Self {
        QueryNode::PropertyValue(query)
    }
}

impl From<ElementValueQuery> for QueryNode {
    fn from(query: ElementValueQuery) -> Self {
        QueryNode::ElementValue(query)
    }
}

impl From<RangeQuery> for QueryNode {
    fn from(query: RangeQuery) -> Self {
        QueryNode::Range(query)
    }
}

impl From<NotQuery> for QueryNode {
    fn from(query: NotQuery) -> Self {
        QueryNode::Not(query)
    }
}
