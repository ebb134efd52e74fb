//! Field condition composer: turns a form submission into `[[Property::Value]]`
//! conditions and merges the resulting block with the free-text term.

use std::collections::HashMap;

use tracing::debug;

use crate::forms::{FormDefinition, FormKind, field_key};
use crate::normalize::{MalformedExpression, normalize_term};

/// Submitted values for one composition call.
///
/// Declared forms read per-property value arrays keyed by [`field_key`];
/// the open form reads the parallel property/value/operator arrays. Both
/// flavors can be filled; the resolved form decides which one is consumed.
#[derive(Debug, Clone, Default)]
pub struct FieldValueSet {
    keyed: HashMap<String, Vec<String>>,
    properties: Vec<String>,
    values: Vec<String>,
    operators: Vec<String>,
}

impl FieldValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the submitted values for one declared property.
    pub fn with_field<I>(mut self, property: &str, values: I) -> Self
    where
        I: IntoIterator<Item: Into<String>>,
    {
        self.keyed.insert(
            field_key(property),
            values.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Sets the open-mode property/value/operator arrays. The arrays are
    /// zipped positionally; extra entries past the shortest of the property
    /// and value arrays are ignored, and a missing operator is empty.
    pub fn with_triples<P, V, O>(mut self, properties: P, values: V, operators: O) -> Self
    where
        P: IntoIterator<Item: Into<String>>,
        V: IntoIterator<Item: Into<String>>,
        O: IntoIterator<Item: Into<String>>,
    {
        self.properties = properties.into_iter().map(Into::into).collect();
        self.values = values.into_iter().map(Into::into).collect();
        self.operators = operators.into_iter().map(Into::into).collect();
        self
    }

    fn keyed_values(&self, property: &str) -> &[String] {
        self.keyed
            .get(&field_key(property))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Builds the final query string out of form field values and the free-text
/// term. Holds only immutable configuration, so sharing one composer across
/// threads needs no locking.
///
/// ```
/// use query_markup::{FieldValueSet, FormDefinition, QueryComposer};
///
/// let composer = QueryComposer::new(
///     FormDefinition::new().declare("Foo", ["Bar property"]),
/// );
/// let fields = FieldValueSet::new().with_field("Bar property", ["Foobar"]);
/// assert_eq!(
///     composer.compose("Foo", &fields, "Foo").unwrap(),
///     "<q>[[Bar property::Foobar]]</q>  Foo",
/// );
/// ```
#[derive(Debug, Clone)]
pub struct QueryComposer {
    forms: FormDefinition,
    no_check: bool,
}

impl QueryComposer {
    pub fn new(forms: FormDefinition) -> Self {
        Self {
            forms,
            no_check: false,
        }
    }

    /// Disables free-text term normalization; the term is emitted verbatim.
    pub fn no_check(mut self) -> Self {
        self.no_check = true;
        self
    }

    pub(crate) fn forms(&self) -> &FormDefinition {
        &self.forms
    }

    /// Composes the full query string for one submission.
    ///
    /// An unknown form name degrades to a free-text-only query. A malformed
    /// free-text term is propagated, never swallowed.
    pub fn compose(
        &self,
        selected_form: &str,
        fields: &FieldValueSet,
        term: &str,
    ) -> Result<String, MalformedExpression> {
        let (block, op) = match self.forms.resolve(selected_form) {
            Some(FormKind::Declared(properties)) => (declared_block(properties, fields), String::new()),
            Some(FormKind::Open) => open_block(fields),
            None => (String::new(), String::new()),
        };

        let term = if self.no_check {
            term.to_string()
        } else {
            normalize_term(term)?
        };

        let result = if block.is_empty() {
            term
        } else if term.is_empty() {
            block
        } else {
            // An empty operator leaves the double space the downstream
            // parser treats as plain conjunction.
            format!("{block} {op} {term}")
        };
        debug!("composed query string: {result:?}");
        Ok(result)
    }
}

/// Declared form: one condition per non-empty submitted value, in property
/// declaration order, space-joined and wrapped in `<q>...</q>`.
fn declared_block(properties: &[String], fields: &FieldValueSet) -> String {
    let mut conditions = Vec::new();
    for property in properties {
        for value in fields.keyed_values(property) {
            if !value.is_empty() {
                conditions.push(format!("[[{property}::{value}]]"));
            }
        }
    }
    if conditions.is_empty() {
        String::new()
    } else {
        format!("<q>{}</q>", conditions.join(" "))
    }
}

/// Open form: conditions are zipped from the parallel arrays. Each pair's
/// operator joins it to the next surviving condition; the last surviving
/// pair's operator is returned and joins the block to the free-text term.
fn open_block(fields: &FieldValueSet) -> (String, String) {
    let mut inner = String::new();
    let mut carried: Option<String> = None;
    for (i, property) in fields.properties.iter().enumerate() {
        let Some(value) = fields.values.get(i) else {
            break;
        };
        if value.is_empty() {
            continue;
        }
        if let Some(op) = carried.take() {
            if !op.is_empty() {
                inner.push_str(&op);
                inner.push(' ');
            }
        }
        inner.push_str(&format!("[[{property}::{value}]] "));
        carried = Some(fields.operators.get(i).cloned().unwrap_or_default());
    }

    match carried {
        // No surviving condition at all.
        None => (String::new(), String::new()),
        Some(op) => (format!("<q>{inner}</q>"), op),
    }
}
