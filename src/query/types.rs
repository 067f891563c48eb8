//! Core types for the query system

use crate::error::StructuredSearchError;
use crate::models::Format;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison applied by a range query
///
/// `UnknownType` is the value a range query holds before it has been told which
/// comparison to perform. It has a wire token so it can be displayed, but it is
/// never accepted in a finalized query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum RangeOperation {
    #[default]
    #[serde(rename = "UNKNOWN")]
    UnknownType = 0,
    #[serde(rename = "GE")]
    Ge = 1,
    #[serde(rename = "GT")]
    Gt = 2,
    #[serde(rename = "LT")]
    Lt = 3,
    #[serde(rename = "LE")]
    Le = 4,
    #[serde(rename = "EQ")]
    Eq = 5,
    #[serde(rename = "NE")]
    Ne = 6,
}

impl RangeOperation {
    /// Every operation that may appear in a finalized query
    pub const COMPARISONS: [RangeOperation; 6] = [
        RangeOperation::Ge,
        RangeOperation::Gt,
        RangeOperation::Lt,
        RangeOperation::Le,
        RangeOperation::Eq,
        RangeOperation::Ne,
    ];

    /// The `range-operator` token written into the structured query
    pub fn as_token(&self) -> &'static str {
        match self {
            RangeOperation::UnknownType => "UNKNOWN",
            RangeOperation::Ge => "GE",
            RangeOperation::Gt => "GT",
            RangeOperation::Lt => "LT",
            RangeOperation::Le => "LE",
            RangeOperation::Eq => "EQ",
            RangeOperation::Ne => "NE",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, RangeOperation::UnknownType)
    }
}

impl fmt::Display for RangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for RangeOperation {
    type Err = StructuredSearchError;

    /// Parse a wire token. The `UNKNOWN` sentinel is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeOperation::COMPARISONS
            .iter()
            .copied()
            .find(|op| op.as_token().eq_ignore_ascii_case(s))
            .ok_or_else(|| StructuredSearchError::InvalidRangeOperation(s.to_string()))
    }
}

/// Output mode of the query builder
///
/// `All` writes JSON, but reference-based value and range queries match both
/// the JSON property and the XML element form of the container. Useful when a
/// database holds a mix of both document types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryBuilderMode {
    All,
    Xml,
    #[default]
    Json,
}

impl QueryBuilderMode {
    /// Encoding used when serializing in this mode
    pub fn format(&self) -> Format {
        match self {
            QueryBuilderMode::All | QueryBuilderMode::Json => Format::Json,
            QueryBuilderMode::Xml => Format::Xml,
        }
    }
}
