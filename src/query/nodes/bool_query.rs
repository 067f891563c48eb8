//! Boolean queries - combine child queries with AND, OR, NOT semantics

use crate::error::StructuredSearchError;
use crate::models::Format;
use crate::query::ast::QueryNode;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Ordered set of child queries combined by an and-query or or-query
///
/// # Example
///
/// ```json
/// {
///   "and-query": {
///     "queries": [
///       { "range-query": { "json-property": "price", "value": ["10"], "range-operator": "GE" } },
///       { "value-query": { "json-property": "title", "text": ["widget"] } }
///     ]
///   }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolQuery {
    /// Child queries, written in insertion order
    pub queries: Vec<QueryNode>,
}

impl BoolQuery {
    pub fn new(queries: Vec<QueryNode>) -> Self {
        Self { queries }
    }

    /// Add a child query
    pub fn push(mut self, query: impl Into<QueryNode>) -> Self {
        self.queries.push(query.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn clause_count(&self) -> usize {
        self.queries.len()
    }

    pub(crate) fn validate(&self, tag: &'static str, format: Format) -> Result<()> {
        if self.queries.is_empty() {
            return Err(StructuredSearchError::EmptyComposite(tag));
        }
        self.queries.iter().try_for_each(|q| q.validate(format))
    }

    pub(crate) fn write_json(&self, tag: &str, out: &mut String) {
        out.push_str("{\"");
        out.push_str(tag);
        out.push_str("\":{\"queries\":[");
        for (i, query) in self.queries.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            query.write_json(out);
        }
        out.push_str("]}}");
    }

    pub(crate) fn write_xml(&self, tag: &str, out: &mut String) {
        out.push('<');
        out.push_str(tag);
        out.push('>');
        for query in &self.queries {
            query.write_xml(out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

/// Negation of a single child query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotQuery {
    pub query: Box<QueryNode>,
}

impl NotQuery {
    pub fn new(query: impl Into<QueryNode>) -> Self {
        Self {
            query: Box::new(query.into()),
        }
    }

    pub(crate) fn validate(&self, format: Format) -> Result<()> {
        self.query.validate(format)
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        out.push_str("{\"not-query\":");
        self.query.write_json(out);
        out.push('}');
    }

    pub(crate) fn write_xml(&self, out: &mut String) {
        out.push_str("<not-query>");
        self.query.write_xml(out);
        out.push_str("</not-query>");
    }
}
