#![allow(dead_code)]
//! Shared helpers for `query-markup` integration tests.

use query_markup::*;

pub fn norm(input: &str) -> String {
    normalize_term(input).unwrap()
}

pub fn norm_err(input: &str) -> MalformedExpression {
    normalize_term(input).unwrap_err()
}

pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

pub fn demo_forms() -> FormDefinition {
    FormDefinition::new()
        .declare("Foo", ["Bar property"])
        .declare("Foo-1", ["Bar property"])
        .declare("Foo-2", ["Bar property"])
        .with_open_form()
}

pub fn composer() -> QueryComposer {
    QueryComposer::new(demo_forms())
}
