//! Structured query parser
//!
//! Parses JSON structured query text back into query AST nodes. Accepts either
//! a bare query (`{"and-query": {...}}`) or a full query document
//! (`{"query": {"queries": [...]}}`). Query kinds the builder has no node for
//! are kept as generic queries holding their JSON text.

use crate::error::StructuredSearchError;
use crate::query::ast::QueryNode;
use crate::query::nodes::{
    BoolQuery, ElementValueQuery, GenericQuery, NotQuery, PropertyValueQuery, RangeQuery,
    SetQuery,
};
use crate::query::reference::{Container, ElementName, DEFAULT_RANGE_TYPE};
use crate::query::types::RangeOperation;
use crate::Result;
use serde_json::{Map, Value};

/// Query parser for JSON structured queries
pub struct QueryParser;

impl QueryParser {
    /// Parse a JSON structured query into an AST node
    ///
    /// # Example
    ///
    /// ```json
    /// {
    ///   "and-query": {
    ///     "queries": [
    ///       { "collection-query": { "uri": ["products"] } },
    ///       { "range-query": { "json-property": "price", "value": ["10"], "range-operator": "GE" } }
    ///     ]
    ///   }
    /// }
    /// ```
    pub fn parse(json: &Value) -> Result<QueryNode> {
        match json {
            Value::Object(map) => Self::parse_query_object(map),
            _ => Err(StructuredSearchError::Parse(
                "Query must be a JSON object".to_string(),
            )),
        }
    }

    /// Parse a JSON string into an AST node
    pub fn parse_str(json_str: &str) -> Result<QueryNode> {
        let value: Value = serde_json::from_str(json_str)
            .map_err(|e| StructuredSearchError::Parse(format!("Invalid JSON: {}", e)))?;
        Self::parse(&value)
    }

    fn parse_query_object(map: &Map<String, Value>) -> Result<QueryNode> {
        // Handle query document: { "query": { "queries": [ ... ] } }
        if let Some(query) = map.get("query") {
            return Self::parse_document(query);
        }

        let mut entries = map.iter();
        let (kind, body) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(StructuredSearchError::Parse(format!(
                    "Query object must have exactly one key. Got keys: {:?}",
                    map.keys().collect::<Vec<_>>()
                )))
            }
        };

        match kind.as_str() {
            "and-query" => Ok(QueryNode::And(Self::parse_composite(kind, body)?)),
            "or-query" => Ok(QueryNode::Or(Self::parse_composite(kind, body)?)),
            "not-query" => Ok(NotQuery::new(Self::parse(body)?).into()),
            "value-query" => Self::parse_value(body),
            "range-query" => Self::parse_range(body),
            "collection-query" => Ok(QueryNode::CollectionSet(Self::parse_set(kind, body)?)),
            "document-query" => Ok(QueryNode::DocumentSet(Self::parse_set(kind, body)?)),
            _ => Ok(GenericQuery::new(Value::Object(map.clone()).to_string()).into()),
        }
    }

    /// Parse a query document. Several top-level queries are ANDed.
    fn parse_document(value: &Value) -> Result<QueryNode> {
        let mut queries = value
            .get("queries")
            .ok_or_else(|| {
                StructuredSearchError::Parse("query document must have 'queries'".to_string())
            })
            .and_then(Self::parse_clause_array)?;

        match queries.len() {
            0 => Err(StructuredSearchError::Parse(
                "query document has no queries".to_string(),
            )),
            1 => Ok(queries.remove(0)),
            _ => Ok(QueryNode::And(BoolQuery::new(queries))),
        }
    }

    /// Parse an and-query or or-query body
    fn parse_composite(kind: &str, value: &Value) -> Result<BoolQuery> {
        let queries = value
            .get("queries")
            .ok_or_else(|| StructuredSearchError::Parse(format!("{} must have 'queries'", kind)))
            .and_then(Self::parse_clause_array)?;
        Ok(BoolQuery::new(queries))
    }

    /// Parse an array of query clauses
    fn parse_clause_array(value: &Value) -> Result<Vec<QueryNode>> {
        match value {
            Value::Array(arr) => arr.iter().map(Self::parse).collect(),
            // Single clause can be provided without array wrapper
            obj @ Value::Object(_) => Ok(vec![Self::parse(obj)?]),
            _ => Err(StructuredSearchError::Parse(
                "Clause must be an array or object".to_string(),
            )),
        }
    }

    /// Parse a value query. Several texts become an or-query of value queries.
    fn parse_value(value: &Value) -> Result<QueryNode> {
        let body = value.as_object().ok_or_else(|| {
            StructuredSearchError::Parse("value-query must be an object".to_string())
        })?;
        let container = Self::parse_container("value-query", body)?;
        let texts = body
            .get("text")
            .map(Self::parse_strings)
            .transpose()?
            .unwrap_or_default();

        let mut queries: Vec<QueryNode> = texts
            .into_iter()
            .map(|text| match &container {
                Container::JsonProperty(property) => {
                    QueryNode::from(PropertyValueQuery::new(property.clone(), text))
                }
                Container::Element(element) => {
                    QueryNode::from(ElementValueQuery::new(element.clone(), text))
                }
            })
            .collect();

        match queries.len() {
            0 => Err(StructuredSearchError::Parse(
                "value-query must have 'text'".to_string(),
            )),
            1 => Ok(queries.remove(0)),
            _ => Ok(QueryNode::Or(BoolQuery::new(queries))),
        }
    }

    /// Parse a range query. Several values become an or-query of range queries.
    fn parse_range(value: &Value) -> Result<QueryNode> {
        let body = value.as_object().ok_or_else(|| {
            StructuredSearchError::Parse("range-query must be an object".to_string())
        })?;
        let container = Self::parse_container("range-query", body)?;
        let range_type = body
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_RANGE_TYPE);
        // The database compares with EQ when no operator is given
        let operation = match body.get("range-operator").and_then(|v| v.as_str()) {
            Some(token) => token.parse::<RangeOperation>()?,
            None => RangeOperation::Eq,
        };
        let values = body
            .get("value")
            .map(Self::parse_strings)
            .transpose()?
            .unwrap_or_default();

        let mut queries: Vec<QueryNode> = values
            .into_iter()
            .map(|v| {
                QueryNode::from(
                    RangeQuery::new(container.clone(), operation, v).with_range_type(range_type),
                )
            })
            .collect();

        match queries.len() {
            0 => Err(StructuredSearchError::Parse(
                "range-query must have 'value'".to_string(),
            )),
            1 => Ok(queries.remove(0)),
            _ => Ok(QueryNode::Or(BoolQuery::new(queries))),
        }
    }

    /// Parse a collection-query or document-query body
    fn parse_set(kind: &str, value: &Value) -> Result<SetQuery> {
        let uris = match value.get("uri") {
            Some(uri) => Self::parse_strings(uri)?,
            None => {
                return Err(StructuredSearchError::Parse(format!(
                    "{} must have 'uri'",
                    kind
                )))
            }
        };
        Ok(SetQuery::new(uris))
    }

    /// Parse the container of a value or range query
    fn parse_container(kind: &str, body: &Map<String, Value>) -> Result<Container> {
        if let Some(property) = body.get("json-property") {
            let property = property.as_str().ok_or_else(|| {
                StructuredSearchError::Parse(format!("{} json-property must be a string", kind))
            })?;
            return Ok(Container::JsonProperty(property.to_string()));
        }
        if let Some(element) = body.get("element") {
            let name = element.get("name").and_then(|v| v.as_str()).ok_or_else(|| {
                StructuredSearchError::Parse(format!("{} element must have a 'name'", kind))
            })?;
            let ns = element.get("ns").and_then(|v| v.as_str()).unwrap_or("");
            return Ok(Container::Element(ElementName::new(name, ns)));
        }
        Err(StructuredSearchError::Parse(format!(
            "{} must specify a json-property or element",
            kind
        )))
    }

    /// Parse a string or array of scalars into strings
    fn parse_strings(value: &Value) -> Result<Vec<String>> {
        match value {
            Value::Array(arr) => arr.iter().map(Self::parse_scalar).collect(),
            other => Ok(vec![Self::parse_scalar(other)?]),
        }
    }

    fn parse_scalar(value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(StructuredSearchError::Parse(format!(
                "Expected a string, number or boolean, got {}",
                value
            ))),
        }
    }
}
