//! Form configuration: which search forms exist and which properties each
//! one declares. Built once from configuration data, immutable afterwards.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// Reserved form name that switches the composer into open mode, where
/// property/value/operator triples are supplied by the request instead of
/// being predeclared.
pub const OPEN_FORM: &str = "open";

/// Derives the request lookup key for a form or property name: lowercased,
/// spaces removed.
///
/// ```
/// use query_markup::field_key;
/// assert_eq!(field_key("Bar property"), "barproperty");
/// ```
pub fn field_key(name: &str) -> String {
    name.chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// What a resolved form contributes to the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    /// Predeclared, ordered property list; submitted values are looked up
    /// per property.
    Declared(Vec<String>),
    /// Open mode: the request supplies the property/value/operator triples.
    Open,
}

/// Immutable mapping from form name to [`FormKind`].
///
/// Deserializes from the nested-mapping configuration shape; the reserved
/// `open` form becomes [`FormKind::Open`] at construction time so the rest
/// of the crate matches on the variant, never on the name.
///
/// ```
/// use query_markup::{FormDefinition, FormKind};
///
/// let def: FormDefinition = serde_json::from_str(
///     r#"{ "forms": { "Foo": ["Bar property"], "open": [] } }"#,
/// ).unwrap();
/// assert!(matches!(def.resolve("Foo"), Some(FormKind::Declared(_))));
/// assert!(matches!(def.resolve("open"), Some(FormKind::Open)));
/// assert!(def.resolve("nope").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFormDefinition")]
pub struct FormDefinition {
    // Keyed by `field_key` so request-supplied names resolve regardless of
    // casing, matching the property lookup convention.
    forms: HashMap<String, FormKind>,
}

impl FormDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a form with an ordered property list.
    pub fn declare<I>(mut self, name: &str, properties: I) -> Self
    where
        I: IntoIterator<Item: Into<String>>,
    {
        self.forms.insert(
            field_key(name),
            FormKind::Declared(properties.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Enables the open-mode form.
    pub fn with_open_form(mut self) -> Self {
        self.forms.insert(OPEN_FORM.to_string(), FormKind::Open);
        self
    }

    /// Resolves a form name; `None` means "no field conditions".
    pub fn resolve(&self, name: &str) -> Option<&FormKind> {
        self.forms.get(&field_key(name))
    }
}

/// Wire shape of the configuration data.
#[derive(Debug, Deserialize)]
struct RawFormDefinition {
    #[serde(default)]
    forms: BTreeMap<String, Vec<String>>,
}

impl From<RawFormDefinition> for FormDefinition {
    fn from(raw: RawFormDefinition) -> Self {
        let mut forms = HashMap::new();
        for (name, properties) in raw.forms {
            let key = field_key(&name);
            let kind = if key == OPEN_FORM {
                FormKind::Open
            } else {
                FormKind::Declared(properties)
            };
            forms.insert(key, kind);
        }
        Self { forms }
    }
}
