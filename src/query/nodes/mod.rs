//! Concrete query node implementations
//!
//! Each type here is the payload of one `QueryNode` variant and knows how to
//! write itself in both encodings.

mod bool_query;
mod generic_query;
mod range_query;
mod set_query;
mod value_query;

pub use bool_query::{BoolQuery, NotQuery};
pub use generic_query::GenericQuery;
pub use range_query::RangeQuery;
pub use set_query::SetQuery;
pub use value_query::{ElementValueQuery, PropertyValueQuery};
