mod common;
use common::*;
use query_markup::*;

#[test]
fn declared_form_wraps_conditions_and_appends_term() {
    let fields = FieldValueSet::new().with_field("Bar property", ["Foobar"]);
    assert_eq!(
        composer().no_check().compose("Foo", &fields, "Foo").unwrap(),
        "<q>[[Bar property::Foobar]]</q>  Foo",
    );
}

#[test]
fn empty_values_are_elided() {
    let fields = FieldValueSet::new().with_field("Bar property", ["", "42"]);
    assert_eq!(
        composer().no_check().compose("Foo-2", &fields, "Foo").unwrap(),
        "<q>[[Bar property::42]]</q>  Foo",
    );
}

#[test]
fn all_empty_values_degrade_to_the_term_alone() {
    let fields = FieldValueSet::new().with_field("Bar property", ["", ""]);
    assert_eq!(
        composer().compose("Foo", &fields, "Foo").unwrap(),
        "Foo",
    );
    assert_eq!(composer().compose("Foo", &fields, "").unwrap(), "");
}

#[test]
fn declared_form_joins_multiple_conditions_with_spaces() {
    let forms = FormDefinition::new().declare("Pair", ["First", "Second prop"]);
    let fields = FieldValueSet::new()
        .with_field("First", ["a"])
        .with_field("Second prop", ["b"]);
    assert_eq!(
        QueryComposer::new(forms).compose("Pair", &fields, "x").unwrap(),
        "<q>[[First::a]] [[Second prop::b]]</q>  x",
    );
}

#[test]
fn unknown_form_degrades_to_free_text_only() {
    let fields = FieldValueSet::new().with_field("Bar property", ["Foobar"]);
    assert_eq!(
        composer().compose("Nope", &fields, "in:foo").unwrap(),
        "[[in:foo]]",
    );
}

#[test]
fn open_form_uses_the_pair_operator_toward_the_term() {
    let fields = FieldValueSet::new().with_triples(["Bar"], ["42"], ["OR"]);
    assert_eq!(
        composer().no_check().compose("open", &fields, "Foo").unwrap(),
        "<q>[[Bar::42]] </q> OR Foo",
    );
}

#[test]
fn open_form_operators_join_neighboring_conditions() {
    let fields = FieldValueSet::new().with_triples(["A", "B"], ["1", "2"], ["OR", "AND"]);
    assert_eq!(
        composer().compose("open", &fields, "Foo").unwrap(),
        "<q>[[A::1]] OR [[B::2]] </q> AND Foo",
    );
}

#[test]
fn open_form_drops_empty_pairs_and_their_operators() {
    let fields =
        FieldValueSet::new().with_triples(["A", "B", "C"], ["1", "", "3"], ["OR", "AND", ""]);
    assert_eq!(
        composer().compose("open", &fields, "Foo").unwrap(),
        "<q>[[A::1]] OR [[C::3]] </q>  Foo",
    );
}

#[test]
fn open_form_truncates_short_parallel_arrays() {
    let fields = FieldValueSet::new().with_triples(["A", "B"], ["1"], Vec::<String>::new());
    assert_eq!(
        composer().compose("open", &fields, "Foo").unwrap(),
        "<q>[[A::1]] </q>  Foo",
    );
}

#[test]
fn open_form_with_no_surviving_pairs_is_free_text_only() {
    let fields = FieldValueSet::new().with_triples(["A"], [""], ["OR"]);
    assert_eq!(composer().compose("open", &fields, "Foo").unwrap(), "Foo");
}

#[test]
fn empty_term_leaves_the_field_block_alone() {
    let fields = FieldValueSet::new().with_field("Bar property", ["Foobar"]);
    assert_eq!(
        composer().compose("Foo", &fields, "").unwrap(),
        "<q>[[Bar property::Foobar]]</q>",
    );
}

#[test]
fn term_is_normalized_unless_no_check() {
    let fields = FieldValueSet::new().with_field("Bar property", ["Foobar"]);
    assert_eq!(
        composer().compose("Foo", &fields, "in:foo").unwrap(),
        "<q>[[Bar property::Foobar]]</q>  [[in:foo]]",
    );
    assert_eq!(
        composer().no_check().compose("Foo", &fields, "in:foo").unwrap(),
        "<q>[[Bar property::Foobar]]</q>  in:foo",
    );
}

#[test]
fn malformed_term_propagates() {
    let fields = FieldValueSet::new();
    let err = composer().compose("Foo", &fields, "(in:foo").unwrap_err();
    assert!(err.message.contains("unclosed"), "{err}");
}

#[test]
fn form_definition_deserializes_from_nested_mapping() {
    let def: FormDefinition = serde_json::from_str(
        r#"{ "forms": { "Foo": ["Bar property"], "Foo-2": ["Bar property"], "open": [] } }"#,
    )
    .unwrap();
    assert!(matches!(
        def.resolve("Foo"),
        Some(FormKind::Declared(props)) if props == &["Bar property".to_string()]
    ));
    assert!(matches!(def.resolve("open"), Some(FormKind::Open)));
    assert!(def.resolve("Bar").is_none());

    // Request-supplied names resolve through the derived key.
    assert!(def.resolve("foo-2").is_some());
}

#[test]
fn field_keys_are_lowercased_without_spaces() {
    assert_eq!(field_key("Bar property"), "barproperty");
    assert_eq!(field_key("Foo-2"), "foo-2");
}
