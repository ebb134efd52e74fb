//! Request boundary: the capabilities the composer needs from an incoming
//! request-like collaborator, and the thin glue that pulls the selected
//! form, field values, namespace flags, and sort key out of one.

use std::collections::{HashMap, HashSet};

use crate::compose::{FieldValueSet, QueryComposer};
use crate::forms::{FormKind, field_key};
use crate::normalize::MalformedExpression;

/// Request key carrying the selected form name.
pub const FORM_FIELD: &str = "smw-form";
/// Open-mode request key carrying the property names.
pub const OPEN_PROPERTY_FIELD: &str = "property";
/// Open-mode request key carrying the property values.
pub const OPEN_VALUE_FIELD: &str = "pvalue";
/// Open-mode request key carrying the per-pair operators.
pub const OPEN_OPERATOR_FIELD: &str = "op";
/// Request key carrying the sort key.
pub const SORT_FIELD: &str = "sort";

/// What the composer consumes from a request.
pub trait RequestValues {
    fn value(&self, key: &str) -> Option<String>;
    fn values(&self, key: &str) -> Vec<String>;
    fn flag(&self, key: &str) -> bool;
}

impl FieldValueSet {
    /// Extracts the submitted values the resolved form will consume.
    pub fn from_request(request: &impl RequestValues, form: Option<&FormKind>) -> Self {
        match form {
            Some(FormKind::Declared(properties)) => {
                let mut fields = FieldValueSet::new();
                for property in properties {
                    fields = fields.with_field(property, request.values(&field_key(property)));
                }
                fields
            }
            Some(FormKind::Open) => FieldValueSet::new().with_triples(
                request.values(OPEN_PROPERTY_FIELD),
                request.values(OPEN_VALUE_FIELD),
                request.values(OPEN_OPERATOR_FIELD),
            ),
            None => FieldValueSet::new(),
        }
    }
}

impl QueryComposer {
    /// Reads the selected form and its field values from the request, then
    /// composes the query string for the given free-text term.
    pub fn compose_from_request(
        &self,
        request: &impl RequestValues,
        term: &str,
    ) -> Result<String, MalformedExpression> {
        let selected = request.value(FORM_FIELD).unwrap_or_default();
        let fields = FieldValueSet::from_request(request, self.forms().resolve(&selected));
        self.compose(&selected, &fields, term)
    }
}

/// Filters `candidates` down to the namespace ids whose `ns{id}` flag is set
/// on the request. Building the engine-side namespace condition out of the
/// result stays with the query engine.
pub fn enabled_namespaces(request: &impl RequestValues, candidates: &[u32]) -> Vec<u32> {
    candidates
        .iter()
        .copied()
        .filter(|id| request.flag(&format!("ns{id}")))
        .collect()
}

/// The requested sort key, if any.
pub fn sort_key(request: &impl RequestValues) -> Option<String> {
    request.value(SORT_FIELD)
}

/// In-memory [`RequestValues`] backed by plain maps; the request double used
/// throughout the tests and doc examples.
///
/// ```
/// use query_markup::{MapRequest, RequestValues};
///
/// let request = MapRequest::new()
///     .with_value("smw-form", "foo")
///     .with_flag("ns6");
/// assert_eq!(request.value("smw-form").as_deref(), Some("foo"));
/// assert!(request.flag("ns6"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapRequest {
    values: HashMap<String, Vec<String>>,
    flags: HashSet<String>,
}

impl MapRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), vec![value.to_string()]);
        self
    }

    pub fn with_values<I>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item: Into<String>>,
    {
        self.values
            .insert(key.to_string(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_flag(mut self, key: &str) -> Self {
        self.flags.insert(key.to_string());
        self
    }
}

impl RequestValues for MapRequest {
    fn value(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(|entry| entry.first().cloned())
    }

    fn values(&self, key: &str) -> Vec<String> {
        self.values.get(key).cloned().unwrap_or_default()
    }

    fn flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }
}
