use serde::{Deserialize, Serialize};

/// MIME type of JSON structured queries, options and payloads
pub const MIME_JSON: &str = "application/json";

/// MIME type of XML structured queries, options and payloads
pub const MIME_XML: &str = "application/xml";

/// Textual encoding of a structured query document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    /// MIME type used when a document in this format is sent
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Json => MIME_JSON,
            Format::Xml => MIME_XML,
        }
    }

    /// Map a MIME type back to a format. Only the two exact constants are recognised.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type {
            MIME_JSON => Some(Format::Json),
            MIME_XML => Some(Format::Xml),
            _ => None,
        }
    }
}

/// Text content tagged with a MIME type
///
/// An empty MIME type means "not decided yet"; the payload assembler fills it in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocument {
    content: String,
    mime_type: String,
}

impl TextDocument {
    /// Create an empty document with no MIME type
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with the given content and MIME type
    pub fn with_mime_type(content: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Create a JSON document
    pub fn json(content: impl Into<String>) -> Self {
        Self::with_mime_type(content, MIME_JSON)
    }

    /// Create an XML document
    pub fn xml(content: impl Into<String>) -> Self {
        Self::with_mime_type(content, MIME_XML)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) {
        self.mime_type = mime_type.into();
    }

    /// The recognised format of this document, if its MIME type is one of the known constants
    pub fn format(&self) -> Option<Format> {
        Format::from_mime_type(&self.mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mime_types() {
        assert_eq!(Format::Json.mime_type(), "application/json");
        assert_eq!(Format::Xml.mime_type(), "application/xml");
        assert_eq!(Format::from_mime_type(MIME_XML), Some(Format::Xml));
        assert_eq!(Format::from_mime_type("text/plain"), None);
        assert_eq!(Format::from_mime_type(""), None);
    }

    #[test]
    fn test_text_document_accessors() {
        let mut doc = TextDocument::new();
        assert!(doc.mime_type().is_empty());
        assert_eq!(doc.format(), None);

        doc.set_content("{}");
        doc.set_mime_type(MIME_JSON);
        assert_eq!(doc.content(), "{}");
        assert_eq!(doc.format(), Some(Format::Json));
        assert_eq!(doc, TextDocument::json("{}"));
    }
}
