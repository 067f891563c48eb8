pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod search;

pub use config::BuilderConfig;
pub use error::{Result, StructuredSearchError};
pub use models::*;
pub use query::{QueryBuilderMode, QueryNode, QueryParser, RangeOperation, SearchBuilder};
pub use search::SearchDescription;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
