//! Combined search payload
//!
//! A search request body can carry a structured query, search options and a
//! free-text query together. `SearchDescription` holds the three parts and
//! merges them into one document.

use crate::error::StructuredSearchError;
use crate::models::{Format, TextDocument, MIME_JSON};
use crate::query::encode::{escape_json_text, push_xml_text};
use crate::Result;
use tracing::{debug, warn};

/// Query, options and free text for one search request
///
/// The query and options documents are embedded verbatim, so their content
/// must already be in the form the combined envelope expects. For JSON that is
/// a sequence of members, each ending in a comma, e.g. `"query":{...},` (see
/// `SearchBuilder::to_search_fragment`).
///
/// # Example
///
/// ```
/// use structured_search::{SearchDescription, TextDocument};
///
/// let mut search = SearchDescription::new();
/// search.set_query(TextDocument::json(r#""query":{"queries":[]},"#));
/// search.set_query_text("hello");
///
/// let payload = search.payload()?;
/// assert_eq!(
///     payload.content(),
///     r#"{"search": {"query":{"queries":[]},"qtext": "hello"}}"#
/// );
/// # Ok::<(), structured_search::StructuredSearchError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SearchDescription {
    query: TextDocument,
    options: TextDocument,
    query_text: String,
}

impl SearchDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, query: TextDocument) {
        self.query = query;
    }

    pub fn query(&self) -> &TextDocument {
        &self.query
    }

    pub fn set_options(&mut self, options: TextDocument) {
        self.options = options;
    }

    pub fn options(&self) -> &TextDocument {
        &self.options
    }

    /// Set the free-text query. It is embedded in the payload as given; see
    /// `escape_query_text` for text that may contain quotes or markup.
    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.query_text = text.into();
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    /// Escape free text so it can be embedded in a payload of `format`
    ///
    /// JSON text gets string-literal escaping without the surrounding quotes;
    /// XML text gets its markup characters replaced by entities.
    pub fn escape_query_text(text: &str, format: Format) -> String {
        match format {
            Format::Json => escape_json_text(text),
            Format::Xml => {
                let mut out = String::with_capacity(text.len());
                push_xml_text(&mut out, text);
                out
            }
        }
    }

    /// Merge query, options and free text into one payload document
    ///
    /// First reconciles the MIME types of the query and options documents:
    /// an unset type takes the other document's type, and two unset types both
    /// become JSON. The reconciled types are kept on the stored documents. The
    /// pair must then be both JSON or both XML, otherwise this fails with
    /// `FormatMismatch` and no payload is produced.
    ///
    /// Query, options and free text are concatenated into the envelope as is.
    pub fn payload(&mut self) -> Result<TextDocument> {
        debug!("building search payload");
        let format = self.reconcile_mime_types()?;

        let mut payload = String::with_capacity(
            self.query.content().len() + self.options.content().len() + self.query_text.len() + 32,
        );
        match format {
            Format::Json => {
                payload.push_str("{\"search\": {");
                payload.push_str(self.query.content());
                payload.push_str(self.options.content());
                payload.push_str("\"qtext\": \"");
                payload.push_str(&self.query_text);
                payload.push_str("\"}}");
            }
            Format::Xml => {
                payload.push_str("<search>");
                payload.push_str(self.query.content());
                payload.push_str(self.options.content());
                payload.push_str("<qtext>");
                payload.push_str(&self.query_text);
                payload.push_str("</qtext></search>");
            }
        }

        debug!(?format, len = payload.len(), "built search payload");
        Ok(TextDocument::with_mime_type(payload, format.mime_type()))
    }

    fn reconcile_mime_types(&mut self) -> Result<Format> {
        // Options may be absent: follow the query
        if self.options.mime_type().is_empty() {
            let mime_type = self.query.mime_type().to_string();
            self.options.set_mime_type(mime_type);
        }
        // Query may be absent when only qtext is used: follow the options
        if self.query.mime_type().is_empty() {
            let mime_type = self.options.mime_type().to_string();
            self.query.set_mime_type(mime_type);
        }
        if self.query.mime_type().is_empty() && self.options.mime_type().is_empty() {
            self.query.set_mime_type(MIME_JSON);
            self.options.set_mime_type(MIME_JSON);
        }

        match (self.query.format(), self.options.format()) {
            (Some(query), Some(options)) if query == options => Ok(query),
            _ => {
                warn!(
                    query_mime = self.query.mime_type(),
                    options_mime = self.options.mime_type(),
                    "query and options MIME types do not match"
                );
                Err(StructuredSearchError::FormatMismatch {
                    query: self.query.mime_type().to_string(),
                    options: self.options.mime_type().to_string(),
                })
            }
        }
    }
}
