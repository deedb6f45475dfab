//! Core types for string resource tables.
//! The `strings.xml` parser decodes into these; the serializer writes these.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, btree_map},
    fmt::Display,
    str::FromStr,
};

/// Android plural quantity of a `<plurals>` item.
///
/// The derived ordering is the emission order: the CLDR categories in their fixed
/// priority first, then unrecognized labels alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quantity {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
    /// A label that is not one of the six CLDR categories, kept verbatim.
    Unknown(String),
}

impl Quantity {
    pub fn as_str(&self) -> &str {
        match self {
            Quantity::Zero => "zero",
            Quantity::One => "one",
            Quantity::Two => "two",
            Quantity::Few => "few",
            Quantity::Many => "many",
            Quantity::Other => "other",
            Quantity::Unknown(label) => label,
        }
    }
}

impl From<&str> for Quantity {
    fn from(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "zero" => Quantity::Zero,
            "one" => Quantity::One,
            "two" => Quantity::Two,
            "few" => Quantity::Few,
            "many" => Quantity::Many,
            "other" => Quantity::Other,
            _ => Quantity::Unknown(label.to_string()),
        }
    }
}

impl FromStr for Quantity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Quantity::from(s))
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of one translatable text in a [`ResourceTable`].
///
/// A `<string>` and a `<plurals>` item may share a name without colliding, because
/// they are different variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// `<string name="…">`
    Simple(String),

    /// One `<item quantity="…">` of `<plurals name="…">`.
    Plural { name: String, quantity: Quantity },
}

impl ResourceKey {
    pub fn simple(name: impl Into<String>) -> Self {
        ResourceKey::Simple(name.into())
    }

    pub fn plural(name: impl Into<String>, quantity: Quantity) -> Self {
        ResourceKey::Plural {
            name: name.into(),
            quantity,
        }
    }

    /// The resource name, without quantity.
    pub fn name(&self) -> &str {
        match self {
            ResourceKey::Simple(name) => name,
            ResourceKey::Plural { name, .. } => name,
        }
    }

    pub fn quantity(&self) -> Option<&Quantity> {
        match self {
            ResourceKey::Simple(_) => None,
            ResourceKey::Plural { quantity, .. } => Some(quantity),
        }
    }

    pub fn is_plural(&self) -> bool {
        matches!(self, ResourceKey::Plural { .. })
    }
}

// Name ascending, the simple form before the plural group of the same name,
// plural items by quantity.
impl Ord for ResourceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.is_plural().cmp(&other.is_plural()))
            .then_with(|| self.quantity().cmp(&other.quantity()))
    }
}

impl PartialOrd for ResourceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKey::Simple(name) => write!(f, "{}", name),
            ResourceKey::Plural { name, quantity } => write!(f, "{}[{}]", name, quantity),
        }
    }
}

/// The translatable texts of one `strings.xml`, keyed by [`ResourceKey`].
///
/// Iteration follows the emission order of the serializer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTable {
    entries: BTreeMap<ResourceKey, String>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a text, returning the previous one for the key.
    pub fn insert(&mut self, key: ResourceKey, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key, value.into())
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &ResourceKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ResourceKey> {
        self.entries.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, ResourceKey, String> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ResourceKey, String)> for ResourceTable {
    fn from_iter<T: IntoIterator<Item = (ResourceKey, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResourceTable {
    type Item = (&'a ResourceKey, &'a String);
    type IntoIter = btree_map::Iter<'a, ResourceKey, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ResourceTable {
    type Item = (ResourceKey, String);
    type IntoIter = btree_map::IntoIter<ResourceKey, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_from_str() {
        assert_eq!(Quantity::from_str("zero").unwrap(), Quantity::Zero);
        assert_eq!(Quantity::from_str("ONE").unwrap(), Quantity::One);
        assert_eq!(Quantity::from_str("other").unwrap(), Quantity::Other);
        assert_eq!(
            Quantity::from_str("several").unwrap(),
            Quantity::Unknown("several".to_string())
        );
    }

    #[test]
    fn test_quantity_order() {
        let mut quantities = vec![
            Quantity::Unknown("zz".to_string()),
            Quantity::Other,
            Quantity::Unknown("aa".to_string()),
            Quantity::One,
            Quantity::Zero,
            Quantity::Many,
        ];
        quantities.sort();
        let labels: Vec<&str> = quantities.iter().map(Quantity::as_str).collect();
        assert_eq!(labels, vec!["zero", "one", "many", "other", "aa", "zz"]);
    }

    #[test]
    fn test_simple_and_plural_keys_do_not_collide() {
        let mut table = ResourceTable::new();
        table.insert(ResourceKey::simple("apples"), "Apples");
        table.insert(ResourceKey::plural("apples", Quantity::One), "One apple");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&ResourceKey::simple("apples")), Some("Apples"));
    }

    #[test]
    fn test_key_order() {
        let table: ResourceTable = [
            (ResourceKey::plural("b", Quantity::Other), "x".to_string()),
            (ResourceKey::simple("c"), "x".to_string()),
            (ResourceKey::plural("b", Quantity::One), "x".to_string()),
            (ResourceKey::simple("b"), "x".to_string()),
            (ResourceKey::simple("a"), "x".to_string()),
        ]
        .into_iter()
        .collect();
        let keys: Vec<String> = table.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["a", "b", "b[one]", "b[other]", "c"]);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(ResourceKey::simple("hello").to_string(), "hello");
        assert_eq!(
            ResourceKey::plural("apples", Quantity::Few).to_string(),
            "apples[few]"
        );
    }
}
