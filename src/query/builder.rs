//! Structured query builder
//!
//! Factory for query nodes plus the state a search definition needs: the
//! output mode, the default XML namespace, the named container references and
//! the root query.

use crate::config::BuilderConfig;
use crate::error::StructuredSearchError;
use crate::models::{Format, TextDocument};
use crate::query::ast::QueryNode;
use crate::query::nodes::{
    BoolQuery, ElementValueQuery, GenericQuery, NotQuery, PropertyValueQuery, RangeQuery,
    SetQuery,
};
use crate::query::reference::{Container, ContainerKind, ContainerRef, ReferenceTable};
use crate::query::types::{QueryBuilderMode, RangeOperation};
use crate::Result;
use tracing::debug;

/// Namespace of the XML structured query grammar
pub const SEARCH_NAMESPACE: &str = "http://marklogic.com/appservices/search";

/// Builds structured queries and the document that carries them
///
/// Query factories return owned nodes; the builder keeps no reference to them.
/// Factories that name a container check it against this builder's reference
/// table, so they are instance methods. Combinator factories need no state and
/// are associated functions.
///
/// # Example
///
/// ```
/// use structured_search::{RangeOperation, SearchBuilder};
///
/// let mut builder = SearchBuilder::new();
/// builder.register_json_property("price", "price")?;
/// builder.register_json_property("title", "title")?;
///
/// let root = SearchBuilder::and_query(vec![
///     builder.range_query("price", RangeOperation::Ge, "10")?,
///     builder.value_query("title", "widget")?,
/// ])?;
/// let doc = builder.set_query(root).to_document()?;
/// assert!(doc.content().contains("and-query"));
/// # Ok::<(), structured_search::StructuredSearchError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SearchBuilder {
    mode: QueryBuilderMode,
    default_xml_namespace: String,
    references: ReferenceTable,
    root: Option<QueryNode>,
}

impl SearchBuilder {
    /// Create a JSON-mode builder with no references
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from configuration, registering its references
    pub fn from_config(config: &BuilderConfig) -> Result<Self> {
        let mut builder = Self {
            mode: config.mode,
            default_xml_namespace: config.default_xml_namespace.clone(),
            ..Self::default()
        };
        for reference in &config.references {
            builder.register(reference.clone())?;
        }
        Ok(builder)
    }

    // Stateless factories

    /// Match documents in any of the collections
    ///
    /// An empty list builds a query that matches nothing.
    pub fn collection_query<I, S>(collections: I) -> QueryNode
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryNode::CollectionSet(SetQuery::new(collections))
    }

    /// Match documents with any of the URIs
    ///
    /// An empty list builds a query that matches nothing.
    pub fn document_query<I, S>(uris: I) -> QueryNode
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryNode::DocumentSet(SetQuery::new(uris))
    }

    /// AND the queries together
    pub fn and_query(queries: Vec<QueryNode>) -> Result<QueryNode> {
        if queries.is_empty() {
            return Err(StructuredSearchError::EmptyComposite("and-query"));
        }
        Ok(QueryNode::And(BoolQuery::new(queries)))
    }

    /// OR the queries together
    pub fn or_query(queries: Vec<QueryNode>) -> Result<QueryNode> {
        if queries.is_empty() {
            return Err(StructuredSearchError::EmptyComposite("or-query"));
        }
        Ok(QueryNode::Or(BoolQuery::new(queries)))
    }

    /// Negate a query. Pass an or-query to exclude any of a set of matches.
    pub fn not_query(query: Option<QueryNode>) -> Result<QueryNode> {
        query
            .map(|q| QueryNode::Not(NotQuery::new(q)))
            .ok_or(StructuredSearchError::EmptyComposite("not-query"))
    }

    // Reference table

    /// Register a container reference
    pub fn register(&mut self, reference: ContainerRef) -> Result<&mut Self> {
        self.references.register(reference)?;
        Ok(self)
    }

    /// Register `name` as a reference to a JSON property
    pub fn register_json_property(
        &mut self,
        name: impl Into<String>,
        property: impl Into<String>,
    ) -> Result<&mut Self> {
        self.register(ContainerRef::json_property(name, property))
    }

    /// Register `name` as a reference to an XML element
    ///
    /// Without a namespace, the builder's default XML namespace is applied when
    /// the search definition is serialized.
    pub fn register_xml_element(
        &mut self,
        name: impl Into<String>,
        element: impl Into<String>,
        namespace: Option<String>,
    ) -> Result<&mut Self> {
        self.register(ContainerRef::xml_element(name, element, namespace))
    }

    pub fn references(&self) -> &ReferenceTable {
        &self.references
    }

    // Reference based factories

    /// Build a generic query in the encoding of the current mode
    pub fn generic_query(&self, text: impl Into<String>) -> QueryNode {
        match self.mode.format() {
            Format::Json => GenericQuery::new(text).into(),
            Format::Xml => GenericQuery::xml(text).into(),
        }
    }

    /// Exact value match on the named container, using its registered kind
    ///
    /// In `All` mode this matches either the JSON property or the XML element.
    pub fn value_query(&self, reference: &str, value: &str) -> Result<QueryNode> {
        let kinds = self.kinds_for(self.references.resolve(reference)?);
        self.value_query_of_kinds(reference, &kinds, value)
    }

    /// Exact value match on the named container as a JSON property
    pub fn json_value_query(&self, reference: &str, value: &str) -> Result<QueryNode> {
        self.value_query_of_kinds(reference, &[ContainerKind::JsonProperty], value)
    }

    /// Exact value match on the named container as an XML element
    pub fn xml_value_query(&self, reference: &str, value: &str) -> Result<QueryNode> {
        self.value_query_of_kinds(reference, &[ContainerKind::XmlElement], value)
    }

    /// Range comparison on the named container, using its registered kind
    ///
    /// In `All` mode this matches either the JSON property or the XML element.
    pub fn range_query(
        &self,
        reference: &str,
        operation: RangeOperation,
        value: &str,
    ) -> Result<QueryNode> {
        let kinds = self.kinds_for(self.references.resolve(reference)?);
        self.range_query_of_kinds(reference, &kinds, operation, value)
    }

    /// Range comparison on the named container as a JSON property
    pub fn json_range_query(
        &self,
        reference: &str,
        operation: RangeOperation,
        value: &str,
    ) -> Result<QueryNode> {
        self.range_query_of_kinds(reference, &[ContainerKind::JsonProperty], operation, value)
    }

    /// Range comparison on the named container as an XML element
    pub fn xml_range_query(
        &self,
        reference: &str,
        operation: RangeOperation,
        value: &str,
    ) -> Result<QueryNode> {
        self.range_query_of_kinds(reference, &[ContainerKind::XmlElement], operation, value)
    }

    fn kinds_for(&self, reference: &ContainerRef) -> Vec<ContainerKind> {
        match self.mode {
            QueryBuilderMode::All => vec![ContainerKind::JsonProperty, ContainerKind::XmlElement],
            QueryBuilderMode::Json | QueryBuilderMode::Xml => vec![reference.kind],
        }
    }

    fn value_query_of_kinds(
        &self,
        reference: &str,
        kinds: &[ContainerKind],
        value: &str,
    ) -> Result<QueryNode> {
        let reference = self.references.resolve(reference)?;
        let queries = kinds
            .iter()
            .map(|&kind| match reference.resolve(kind) {
                Container::JsonProperty(property) => {
                    QueryNode::from(PropertyValueQuery::new(property, value))
                }
                Container::Element(element) => {
                    QueryNode::from(ElementValueQuery::new(element, value))
                }
            })
            .collect();
        Self::single_or_any(queries)
    }

    fn range_query_of_kinds(
        &self,
        reference: &str,
        kinds: &[ContainerKind],
        operation: RangeOperation,
        value: &str,
    ) -> Result<QueryNode> {
        let reference = self.references.resolve(reference)?;
        if operation.is_unknown() {
            return Err(StructuredSearchError::InvalidRangeOperation(format!(
                "range query on '{}' needs a comparison",
                reference.name
            )));
        }
        let queries = kinds
            .iter()
            .map(|&kind| {
                let container = reference.resolve(kind);
                QueryNode::from(
                    RangeQuery::new(container, operation, value)
                        .with_range_type(reference.range_type()),
                )
            })
            .collect();
        Self::single_or_any(queries)
    }

    fn single_or_any(mut queries: Vec<QueryNode>) -> Result<QueryNode> {
        if queries.len() == 1 {
            if let Some(query) = queries.pop() {
                return Ok(query);
            }
        }
        Self::or_query(queries)
    }

    // Search definition

    /// Set the root query, replacing any previous one
    pub fn set_query(&mut self, query: QueryNode) -> &mut Self {
        debug!(query_type = query.query_type(), "set root query");
        self.root = Some(query);
        self
    }

    /// The current root query
    pub fn query(&self) -> Option<&QueryNode> {
        self.root.as_ref()
    }

    /// Remove and return the root query
    pub fn take_query(&mut self) -> Option<QueryNode> {
        self.root.take()
    }

    /// Set the namespace used for XML elements registered without one
    pub fn set_default_xml_namespace(&mut self, ns: impl Into<String>) {
        self.default_xml_namespace = ns.into();
    }

    pub fn default_xml_namespace(&self) -> &str {
        &self.default_xml_namespace
    }

    pub fn set_mode(&mut self, mode: QueryBuilderMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> QueryBuilderMode {
        self.mode
    }

    /// Serialize the search definition as a standalone structured query document
    ///
    /// JSON: `{"query":{"queries":[root]}}`. XML: `<query xmlns="…">root</query>`.
    /// Without a root the document holds no queries.
    pub fn to_document(&self) -> Result<TextDocument> {
        let format = self.mode.format();
        let mut out = String::new();
        match format {
            Format::Json => {
                out.push_str("{\"query\":");
                self.write_query(format, &mut out)?;
                out.push('}');
            }
            Format::Xml => self.write_query(format, &mut out)?,
        }
        debug!(?format, len = out.len(), "generated structured query document");
        Ok(TextDocument::with_mime_type(out, format.mime_type()))
    }

    /// Serialize the search definition in the form `SearchDescription` embeds
    /// verbatim in a combined search payload
    ///
    /// JSON: `"query":{"queries":[root]},` with the trailing comma, so options
    /// and `qtext` can follow. XML is the same as `to_document`.
    pub fn to_search_fragment(&self) -> Result<TextDocument> {
        let format = self.mode.format();
        let mut out = String::new();
        match format {
            Format::Json => {
                out.push_str("\"query\":");
                self.write_query(format, &mut out)?;
                out.push(',');
            }
            Format::Xml => self.write_query(format, &mut out)?,
        }
        Ok(TextDocument::with_mime_type(out, format.mime_type()))
    }

    /// Write the query object: `{"queries":[root]}` or the XML `<query>` element
    ///
    /// The default XML namespace is applied to a copy of the root here, so
    /// it takes effect however late it is set.
    fn write_query(&self, format: Format, out: &mut String) -> Result<()> {
        let root = self.root.as_ref().map(|root| {
            let mut root = root.clone();
            root.apply_default_namespace(&self.default_xml_namespace);
            root
        });
        if let Some(root) = &root {
            root.validate(format)?;
        }
        match format {
            Format::Json => {
                out.push_str("{\"queries\":[");
                if let Some(root) = &root {
                    root.write_json(out);
                }
                out.push_str("]}");
            }
            Format::Xml => {
                out.push_str("<query xmlns=\"");
                out.push_str(SEARCH_NAMESPACE);
                out.push_str("\">");
                if let Some(root) = &root {
                    root.write_xml(out);
                }
                out.push_str("</query>");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MIME_JSON, MIME_XML};
    use crate::query::reference::ElementName;

    fn create_test_builder() -> SearchBuilder {
        let mut builder = SearchBuilder::new();
        builder
            .register_json_property("price", "price")
            .unwrap()
            .register_json_property("title", "title")
            .unwrap()
            .register_xml_element("author", "author", Some("urn:books".to_string()))
            .unwrap()
            .register_xml_element("isbn", "isbn", None)
            .unwrap();
        builder
    }

    #[test]
    fn test_builder_defaults() {
        let builder = SearchBuilder::new();
        assert_eq!(builder.mode(), QueryBuilderMode::Json);
        assert_eq!(builder.default_xml_namespace(), "");
        assert!(builder.references().is_empty());
        assert!(builder.query().is_none());
    }

    #[test]
    fn test_and_or_reject_empty() {
        assert_eq!(
            SearchBuilder::and_query(vec![]),
            Err(StructuredSearchError::EmptyComposite("and-query"))
        );
        assert_eq!(
            SearchBuilder::or_query(vec![]),
            Err(StructuredSearchError::EmptyComposite("or-query"))
        );
    }

    #[test]
    fn test_not_query() {
        assert_eq!(
            SearchBuilder::not_query(None),
            Err(StructuredSearchError::EmptyComposite("not-query"))
        );
        let not = SearchBuilder::not_query(Some(SearchBuilder::collection_query(["drafts"])))
            .unwrap();
        assert_eq!(
            not.to_json().unwrap(),
            r#"{"not-query":{"collection-query":{"uri":["drafts"]}}}"#
        );
    }

    #[test]
    fn test_value_query_uses_registered_kind() {
        let builder = create_test_builder();
        assert!(matches!(
            builder.value_query("title", "widget").unwrap(),
            QueryNode::PropertyValue(_)
        ));
        assert_eq!(
            builder.value_query("author", "Austen").unwrap(),
            QueryNode::ElementValue(ElementValueQuery::new(
                ElementName::new("author", "urn:books"),
                "Austen"
            ))
        );
    }

    #[test]
    fn test_value_query_idempotent() {
        let builder = create_test_builder();
        let first = builder.value_query("title", "x").unwrap();
        let second = builder.value_query("title", "x").unwrap();
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_unknown_reference() {
        let builder = create_test_builder();
        let expected = StructuredSearchError::UnknownReference("colour".to_string());
        assert_eq!(builder.value_query("colour", "red"), Err(expected.clone()));
        assert_eq!(builder.xml_value_query("colour", "red"), Err(expected.clone()));
        assert_eq!(
            builder.json_range_query("colour", RangeOperation::Eq, "red"),
            Err(expected)
        );
    }

    #[test]
    fn test_forced_kinds() {
        let mut builder = create_test_builder();
        builder.set_default_xml_namespace("urn:shop");

        assert_eq!(
            builder.xml_value_query("title", "widget").unwrap(),
            QueryNode::ElementValue(ElementValueQuery::new(
                ElementName::unqualified("title"),
                "widget"
            ))
        );
        assert_eq!(
            builder.json_value_query("author", "Austen").unwrap(),
            QueryNode::PropertyValue(PropertyValueQuery::new("author", "Austen"))
        );
    }

    #[test]
    fn test_default_namespace_applies_to_xml_only() {
        let mut builder = create_test_builder();
        builder.set_default_xml_namespace("urn:default");
        assert_eq!(builder.default_xml_namespace(), "urn:default");

        let isbn = builder.value_query("isbn", "123").unwrap();
        let doc = builder.set_query(isbn).to_document().unwrap();
        assert!(doc.content().contains(r#""ns":"urn:default""#));

        let author = builder.value_query("author", "Austen").unwrap();
        let doc = builder.set_query(author).to_document().unwrap();
        assert!(doc.content().contains(r#""ns":"urn:books""#));

        let title = builder.value_query("title", "x").unwrap();
        let doc = builder.set_query(title).to_document().unwrap();
        assert!(!doc.content().contains("urn:default"));
    }

    #[test]
    fn test_default_namespace_set_after_query_built() {
        let mut builder = create_test_builder();
        builder.set_mode(QueryBuilderMode::Xml);
        let isbn = builder.value_query("isbn", "123").unwrap();
        builder.set_query(isbn);

        let before = builder.to_document().unwrap();
        assert!(before.content().contains(r#"<element ns="" name="isbn"/>"#));

        builder.set_default_xml_namespace("urn:shop");
        let after = builder.to_document().unwrap();
        assert!(after.content().contains(r#"<element ns="urn:shop" name="isbn"/>"#));

        // The stored root is left unqualified
        assert_eq!(
            builder.query(),
            Some(&QueryNode::ElementValue(ElementValueQuery::new(
                ElementName::unqualified("isbn"),
                "123"
            )))
        );
    }

    #[test]
    fn test_range_query_rejects_unknown_operation() {
        let builder = create_test_builder();
        assert!(matches!(
            builder.range_query("price", RangeOperation::UnknownType, "10"),
            Err(StructuredSearchError::InvalidRangeOperation(_))
        ));
        assert!(matches!(
            builder.xml_range_query("price", RangeOperation::UnknownType, "10"),
            Err(StructuredSearchError::InvalidRangeOperation(_))
        ));
    }

    #[test]
    fn test_range_query_uses_reference_range_type() {
        let mut builder = SearchBuilder::new();
        builder
            .register(ContainerRef::json_property("year", "year").with_range_type("xs:int"))
            .unwrap();
        let query = builder.range_query("year", RangeOperation::Lt, "2000").unwrap();
        assert_eq!(
            query.to_json().unwrap(),
            r#"{"range-query":{"type":"xs:int","json-property":"year","value":["2000"],"range-operator":"LT"}}"#
        );
    }

    #[test]
    fn test_all_mode_matches_both_kinds() {
        let mut builder = create_test_builder();
        builder.set_mode(QueryBuilderMode::All);

        let query = builder.value_query("title", "widget").unwrap();
        assert_eq!(query.query_type(), "or-query");
        assert!(matches!(query.children()[0], QueryNode::PropertyValue(_)));
        assert!(matches!(query.children()[1], QueryNode::ElementValue(_)));

        let range = builder.range_query("price", RangeOperation::Gt, "1").unwrap();
        assert_eq!(range.children().len(), 2);

        // Forced variants are unaffected by All mode
        assert!(matches!(
            builder.json_value_query("title", "widget").unwrap(),
            QueryNode::PropertyValue(_)
        ));
    }

    #[test]
    fn test_set_query_chains() {
        let mut builder = create_test_builder();
        let first = builder.value_query("title", "a").unwrap();
        let second = builder.value_query("title", "b").unwrap();

        let doc = builder
            .set_query(first)
            .set_query(second.clone())
            .to_document()
            .unwrap();
        assert_eq!(builder.query(), Some(&second));
        assert!(doc.content().contains(r#"["b"]"#));
        assert!(!doc.content().contains(r#"["a"]"#));

        assert_eq!(builder.take_query(), Some(second));
        assert!(builder.query().is_none());
    }

    #[test]
    fn test_to_document_without_root() {
        let builder = SearchBuilder::new();
        let doc = builder.to_document().unwrap();
        assert_eq!(doc.content(), r#"{"query":{"queries":[]}}"#);
        assert_eq!(doc.mime_type(), MIME_JSON);
    }

    #[test]
    fn test_to_document_rejects_invalid_root() {
        let mut builder = SearchBuilder::new();
        builder.set_query(QueryNode::Or(BoolQuery::default()));
        assert_eq!(
            builder.to_document(),
            Err(StructuredSearchError::EmptyComposite("or-query"))
        );
    }

    #[test]
    fn test_xml_mode_document() {
        let mut builder = create_test_builder();
        builder.set_mode(QueryBuilderMode::Xml);
        let root = builder.value_query("author", "Austen").unwrap();
        let doc = builder.set_query(root).to_document().unwrap();

        assert_eq!(doc.mime_type(), MIME_XML);
        assert_eq!(
            doc.content(),
            concat!(
                r#"<query xmlns="http://marklogic.com/appservices/search">"#,
                r#"<value-query type="string"><element ns="urn:books" name="author"/><text>Austen</text></value-query>"#,
                "</query>"
            )
        );
    }

    #[test]
    fn test_xml_mode_rejects_json_generic() {
        let mut builder = create_test_builder();
        let generic = builder.generic_query(r#"{"term-query":{"text":["a"]}}"#);
        builder.set_mode(QueryBuilderMode::Xml);
        builder.set_query(generic);
        assert!(matches!(
            builder.to_document(),
            Err(StructuredSearchError::UnsupportedMode(_))
        ));

        let xml_generic = builder.generic_query("<term-query><text>a</text></term-query>");
        builder.set_query(xml_generic);
        assert!(builder.to_document().is_ok());
    }

    #[test]
    fn test_search_fragment() {
        let mut builder = create_test_builder();
        let root = builder.value_query("title", "widget").unwrap();
        let fragment = builder.set_query(root).to_search_fragment().unwrap();
        assert_eq!(
            fragment.content(),
            r#""query":{"queries":[{"value-query":{"type":"string","json-property":"title","text":["widget"]}}]},"#
        );
    }

    #[test]
    fn test_from_config() {
        let config = BuilderConfig {
            mode: QueryBuilderMode::Xml,
            default_xml_namespace: "urn:x".to_string(),
            references: vec![
                ContainerRef::json_property("a", "a"),
                ContainerRef::json_property("a", "b"),
            ],
        };
        assert_eq!(
            SearchBuilder::from_config(&config).unwrap_err(),
            StructuredSearchError::DuplicateReference("a".to_string())
        );

        let config = BuilderConfig {
            references: vec![ContainerRef::json_property("a", "a")],
            ..config
        };
        let builder = SearchBuilder::from_config(&config).unwrap();
        assert_eq!(builder.mode(), QueryBuilderMode::Xml);
        assert_eq!(builder.default_xml_namespace(), "urn:x");
        assert!(builder.references().contains("a"));
    }
}
