//! Documents and the collection they are scanned from.

use crate::error::{WavgError, WavgResult};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use wavg_calculator::FieldResolver;
use wavg_types::ParamValue;

pub type DocumentId = u64;

/// One stored document: an id and its top-level fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: HashMap<String, ParamValue>,
}

impl Document {
    pub fn new(id: DocumentId) -> Self {
        Self { id, fields: HashMap::new() }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Converts a JSON object; any other JSON value is rejected.
    pub fn from_json(id: DocumentId, value: &serde_json::Value) -> WavgResult<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(WavgError::document(
                format!("expected a JSON object, found {}", json_type(value)),
                id as usize,
            ));
        };

        let mut fields = HashMap::with_capacity(map.len());
        for (name, member) in map {
            let converted = ParamValue::try_from(member)
                .map_err(|e| WavgError::document(format!("field '{name}': {e}"), id as usize))?;
            fields.insert(name.clone(), converted);
        }
        Ok(Self { id, fields })
    }
}

impl FieldResolver for Document {
    fn resolve(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(ParamValue::as_f64)
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Set of fields the collection knows about.
///
/// A field outside the schema resolves as absent even when a document carries it, the
/// way a search engine ignores fields it has no mapping for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: HashSet<String>,
}

impl Schema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { fields: fields.into_iter().map(Into::into).collect() }
    }

    pub fn is_mapped(&self, field: &str) -> bool {
        self.fields.contains(field)
    }
}

/// A document seen through the collection schema.
#[derive(Debug, Clone, Copy)]
pub struct DocumentView<'a> {
    document: &'a Document,
    schema: Option<&'a Schema>,
}

impl<'a> DocumentView<'a> {
    pub fn new(document: &'a Document, schema: Option<&'a Schema>) -> Self {
        Self { document, schema }
    }
}

impl FieldResolver for DocumentView<'_> {
    fn resolve(&self, field: &str) -> Option<f64> {
        match self.schema {
            Some(schema) if !schema.is_mapped(field) => None,
            _ => self.document.resolve(field),
        }
    }
}

/// The documents a request scans, plus an optional schema.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    documents: Vec<Document>,
    schema: Option<Schema>,
}

impl Collection {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents, schema: None }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Parses a JSON array of objects; document ids are array positions.
    pub fn from_json_str(source: &str) -> WavgResult<Self> {
        let value: serde_json::Value = serde_json::from_str(source)
            .map_err(|e| WavgError::serialization(e.to_string(), "json"))?;
        let serde_json::Value::Array(items) = value else {
            return Err(WavgError::serialization("documents must be a JSON array", "json"));
        };

        let documents = items
            .iter()
            .enumerate()
            .map(|(i, item)| Document::from_json(i as DocumentId, item))
            .collect::<WavgResult<Vec<_>>>()?;
        debug!(documents = documents.len(), "Parsed document collection");
        Ok(Self::new(documents))
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn view<'a>(&'a self, document: &'a Document) -> DocumentView<'a> {
        DocumentView::new(document, self.schema.as_ref())
    }
}
