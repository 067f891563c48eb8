//! Generic query - a pre-formed structured query fragment

use crate::error::StructuredSearchError;
use crate::models::Format;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Query holding caller-supplied structured query text
///
/// Useful when the caller already has the low-level text for a query the
/// builder has no factory for. The text is written verbatim and never
/// inspected, except that it must not be blank and can only be written in the
/// format it was authored in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericQuery {
    /// Structured query text
    pub query: String,
    /// Encoding of `query`
    #[serde(default)]
    pub format: Format,
}

impl GenericQuery {
    /// Create a generic query from JSON structured query text
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            format: Format::Json,
        }
    }

    /// Create a generic query from XML structured query text
    pub fn xml(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            format: Format::Xml,
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn validate(&self, format: Format) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(StructuredSearchError::InvalidQuery(
                "generic query text is empty".to_string(),
            ));
        }
        if self.format != format {
            return Err(StructuredSearchError::UnsupportedMode(format!(
                "generic {:?} query text cannot be written as {:?}",
                self.format, format
            )));
        }
        Ok(())
    }

    pub(crate) fn write(&self, out: &mut String) {
        out.push_str(&self.query);
    }
}
