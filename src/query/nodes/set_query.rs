//! Set queries - match documents by collection membership or URI

use crate::query::encode::{push_json_string_array, push_xml_element};
use serde::{Deserialize, Serialize};

/// OR-evaluated list of collection names or document URIs
///
/// An empty list is written as an empty `uri` array, which the database
/// evaluates as matching no documents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetQuery {
    pub uris: Vec<String>,
}

impl SetQuery {
    pub fn new<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            uris: uris.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a URI to the set
    pub fn add_uri(mut self, uri: impl Into<String>) -> Self {
        self.uris.push(uri.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    pub(crate) fn write_json(&self, tag: &str, out: &mut String) {
        out.push_str("{\"");
        out.push_str(tag);
        out.push_str("\":{\"uri\":");
        push_json_string_array(out, self.uris.iter().map(String::as_str));
        out.push_str("}}");
    }

    pub(crate) fn write_xml(&self, tag: &str, out: &mut String) {
        out.push('<');
        out.push_str(tag);
        out.push('>');
        for uri in &self.uris {
            push_xml_element(out, "uri", uri);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_query_json() {
        let query = SetQuery::new(["/docs/a.json"]).add_uri("/docs/b.json");
        let mut out = String::new();
        query.write_json("document-query", &mut out);
        assert_eq!(
            out,
            r#"{"document-query":{"uri":["/docs/a.json","/docs/b.json"]}}"#
        );
    }

    #[test]
    fn test_empty_set_query() {
        let query = SetQuery::default();
        assert!(query.is_empty());

        let mut json = String::new();
        query.write_json("collection-query", &mut json);
        assert_eq!(json, r#"{"collection-query":{"uri":[]}}"#);

        let mut xml = String::new();
        query.write_xml("collection-query", &mut xml);
        assert_eq!(xml, "<collection-query></collection-query>");
    }
}
