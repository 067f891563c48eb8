//! Value queries - exact match of a container's value

use crate::query::encode::{push_json_string, push_json_string_array, push_xml_element};
use crate::query::reference::ElementName;
use serde::{Deserialize, Serialize};

/// Matches documents whose JSON property has exactly the given value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValueQuery {
    pub property: String,
    pub value: String,
}

impl PropertyValueQuery {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        out.push_str("{\"value-query\":{\"type\":\"string\",\"json-property\":");
        push_json_string(out, &self.property);
        out.push_str(",\"text\":");
        push_json_string_array(out, [self.value.as_str()]);
        out.push_str("}}");
    }

    pub(crate) fn write_xml(&self, out: &mut String) {
        out.push_str("<value-query type=\"string\">");
        push_xml_element(out, "json-property", &self.property);
        push_xml_element(out, "text", &self.value);
        out.push_str("</value-query>");
    }
}

/// Matches documents whose XML element has exactly the given value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementValueQuery {
    pub element: ElementName,
    pub value: String,
}

impl ElementValueQuery {
    pub fn new(element: ElementName, value: impl Into<String>) -> Self {
        Self {
            element,
            value: value.into(),
        }
    }

    pub(crate) fn write_json(&self, out: &mut String) {
        out.push_str("{\"value-query\":{\"type\":\"string\",");
        self.element.write_json(out);
        out.push_str(",\"text\":");
        push_json_string_array(out, [self.value.as_str()]);
        out.push_str("}}");
    }

    pub(crate) fn write_xml(&self, out: &mut String) {
        out.push_str("<value-query type=\"string\">");
        self.element.write_xml(out);
        push_xml_element(out, "text", &self.value);
        out.push_str("</value-query>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_value_json() {
        let mut out = String::new();
        PropertyValueQuery::new("title", "widget").write_json(&mut out);
        assert_eq!(
            out,
            r#"{"value-query":{"type":"string","json-property":"title","text":["widget"]}}"#
        );
    }

    #[test]
    fn test_element_value_xml() {
        let mut out = String::new();
        ElementValueQuery::new(ElementName::new("title", "urn:shop"), "a<b").write_xml(&mut out);
        assert_eq!(
            out,
            r#"<value-query type="string"><element ns="urn:shop" name="title"/><text>a&lt;b</text></value-query>"#
        );
    }

    #[test]
    fn test_value_escaped_in_json() {
        let mut out = String::new();
        PropertyValueQuery::new("quote", "say \"hi\"").write_json(&mut out);
        assert!(out.contains(r#""text":["say \"hi\""]"#));
    }
}
