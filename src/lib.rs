//! # Bracket query markup compiler
//!
//! `query-markup` turns the free-text boolean expressions users type into a
//! search box (`in:foo && (in:bar OR not:baz)`) into the fully bracketed
//! query markup a structured-query engine consumes (`[[...]]` conditions,
//! `<q>...</q>` groups), and composes complete query strings out of dynamic
//! form submissions. Both transformations are pure string/tree rewrites
//! with no I/O; a composer only carries immutable form configuration, so
//! concurrent use needs no locking.
//!
//! ## Example
//! ```
//! use query_markup::{normalize_term, FieldValueSet, FormDefinition, QueryComposer};
//!
//! assert_eq!(
//!     normalize_term("(in:foo && in:bar)||in:foobar").unwrap(),
//!     "<q>[[in:foo]] && [[in:bar]]</q> || [[in:foobar]]",
//! );
//!
//! let composer = QueryComposer::new(
//!     FormDefinition::new()
//!         .declare("Foo", ["Bar property"])
//!         .with_open_form(),
//! );
//! let fields = FieldValueSet::new().with_triples(["Bar"], ["42"], ["OR"]);
//! assert_eq!(
//!     composer.compose("open", &fields, "Foo").unwrap(),
//!     "<q>[[Bar::42]] </q> OR Foo",
//! );
//! ```

mod compose;
mod forms;
mod normalize;
mod request;

pub use crate::compose::{FieldValueSet, QueryComposer};
pub use crate::forms::{FormDefinition, FormKind, OPEN_FORM, field_key};
pub use crate::normalize::{
    Expression, MalformedExpression, Segment, normalize_term, parse_term,
};
pub use crate::request::{
    FORM_FIELD, MapRequest, OPEN_OPERATOR_FIELD, OPEN_PROPERTY_FIELD, OPEN_VALUE_FIELD,
    RequestValues, SORT_FIELD, enabled_namespaces, sort_key,
};
