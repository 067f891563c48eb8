//! Range query - compares a container's value against a bound

use crate::error::StructuredSearchError;
use crate::query::encode::{push_json_string, push_json_string_array, push_xml_element, push_xml_text};
use crate::query::reference::{Container, DEFAULT_RANGE_TYPE};
use crate::query::types::RangeOperation;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Query that matches documents whose container value satisfies a comparison
///
/// Evaluated by the database against a range index, so `range_type` must name
/// the type of that index (e.g. `xs:int`, `xs:date`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeQuery {
    /// Container the range index is built on
    pub container: Container,
    /// Comparison to perform
    pub operation: RangeOperation,
    /// Value to compare against, in the lexical form of `range_type`
    pub value: String,
    /// Range index type
    #[serde(default = "default_range_type")]
    pub range_type: String,
}

fn default_range_type() -> String {
    DEFAULT_RANGE_TYPE.to_string()
}

impl RangeQuery {
    /// Create a range query with an `xs:string` range type
    pub fn new(container: Container, operation: RangeOperation, value: impl Into<String>) -> Self {
        Self {
            container,
            operation,
            value: value.into(),
            range_type: default_range_type(),
        }
    }

    /// Set the range index type
    pub fn with_range_type(mut self, range_type: impl Into<String>) -> Self {
        self.range_type = range_type.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.operation.is_unknown() {
            return Err(StructuredSearchError::InvalidRangeOperation(format!(
                "range query on {:?} has no comparison set",
                self.container
            )));
        }
        Ok(())
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        out.push_str("{\"range-query\":{\"type\":");
        push_json_string(out, &self.range_type);
        out.push(',');
        self.container.write_json(out);
        out.push_str(",\"value\":");
        push_json_string_array(out, [self.value.as_str()]);
        out.push_str(",\"range-operator\":");
        push_json_string(out, self.operation.as_token());
        out.push_str("}}");
    }

    pub(crate) fn write_xml(&self, out: &mut String) {
        out.push_str("<range-query type=\"");
        push_xml_text(out, &self.range_type);
        out.push_str("\">");
        self.container.write_xml(out);
        push_xml_element(out, "value", &self.value);
        push_xml_element(out, "range-operator", self.operation.as_token());
        out.push_str("</range-query>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::reference::ElementName;

    fn price() -> Container {
        Container::JsonProperty("price".to_string())
    }

    #[test]
    fn test_range_query_creation() {
        let query = RangeQuery::new(price(), RangeOperation::Ge, "10");
        assert_eq!(query.range_type, "xs:string");
        assert_eq!(query.operation, RangeOperation::Ge);

        let query = query.with_range_type("xs:int");
        assert_eq!(query.range_type, "xs:int");
    }

    #[test]
    fn test_range_query_json() {
        let mut out = String::new();
        RangeQuery::new(price(), RangeOperation::Ge, "10")
            .with_range_type("xs:int")
            .write_json(&mut out);
        assert_eq!(
            out,
            r#"{"range-query":{"type":"xs:int","json-property":"price","value":["10"],"range-operator":"GE"}}"#
        );
    }

    #[test]
    fn test_range_query_xml() {
        let mut out = String::new();
        RangeQuery::new(
            Container::Element(ElementName::unqualified("price")),
            RangeOperation::Lt,
            "5",
        )
        .write_xml(&mut out);
        assert_eq!(
            out,
            r#"<range-query type="xs:string"><element ns="" name="price"/><value>5</value><range-operator>LT</range-operator></range-query>"#
        );
    }

    #[test]
    fn test_range_query_unknown_operation() {
        let query = RangeQuery::new(price(), RangeOperation::UnknownType, "10");
        assert!(matches!(
            query.validate(),
            Err(StructuredSearchError::InvalidRangeOperation(_))
        ));

        // Writing never validates
        let mut out = String::new();
        query.write_json(&mut out);
        assert!(out.contains(r#""range-operator":"UNKNOWN""#));
    }
}
