//! Structured query construction
//!
//! This module builds queries in the database's structured query grammar:
//! - Boolean queries (and-query, or-query, not-query)
//! - Value queries (exact match on a JSON property or XML element)
//! - Range queries (comparison against a range index)
//! - Collection and document set queries
//! - Generic queries (caller-supplied structured query text)
//!
//! # Example
//!
//! ```json
//! {
//!   "query": {
//!     "queries": [
//!       { "and-query": { "queries": [
//!         { "range-query": { "type": "xs:string", "json-property": "price", "value": ["10"], "range-operator": "GE" } },
//!         { "value-query": { "type": "string", "json-property": "title", "text": ["widget"] } }
//!       ] } }
//!     ]
//!   }
//! }
//! ```

pub mod ast;
pub mod builder;
pub(crate) mod encode;
pub mod nodes;
pub mod parser;
pub mod reference;
pub mod types;

pub use ast::QueryNode;
pub use builder::{SearchBuilder, SEARCH_NAMESPACE};
pub use nodes::{
    BoolQuery, ElementValueQuery, GenericQuery, NotQuery, PropertyValueQuery, RangeQuery,
    SetQuery,
};
pub use parser::QueryParser;
pub use reference::{Container, ContainerKind, ContainerRef, ElementName, ReferenceTable};
pub use types::*;
