//! Named parameter collection.
//!
//! Statements render placeholders as `:name`; the matching values live in
//! a [`Parameters`] bag owned by the caller and handed to the database
//! driver alongside the rendered SQL.

use crate::value::{SqlValue, ToSqlValue};

/// An ordered collection of named parameter values.
///
/// Setting a name that is already present replaces its value in place;
/// new names append. Iteration follows first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, SqlValue)>,
}

impl Parameters {
    /// Creates an empty parameter bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a parameter value, replacing any previous value for the name.
    pub fn set(&mut self, name: impl Into<String>, value: impl ToSqlValue) -> &mut Self {
        let name = name.into();
        let value = value.to_sql_value();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Returns the value bound to `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns `true` if a value is bound to `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no parameters are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the bound names in first-insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Iterates `(name, value)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Removes all bound parameters.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a str, &'a SqlValue);
    type IntoIter = std::vec::IntoIter<(&'a str, &'a SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .iter()
            .map(|(n, v)| (n.as_str(), v))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_appends_in_order() {
        let mut params = Parameters::new();
        params.set("name", "Ada").set("age", 36_i64);

        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "age"]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = Parameters::new();
        params.set("name", "Ada").set("age", 36_i64);
        params.set("name", "Grace");

        assert_eq!(params.len(), 2);
        assert_eq!(
            params.get("name"),
            Some(&SqlValue::Text(String::from("Grace")))
        );
        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "age"]);
    }

    #[test]
    fn test_get_missing() {
        let params = Parameters::new();
        assert_eq!(params.get("absent"), None);
        assert!(params.is_empty());
    }

    #[test]
    fn test_names_and_clear() {
        let mut params = Parameters::new();
        params.set("name", "Ada").set("age", 36_i64);
        assert_eq!(params.names().collect::<Vec<_>>(), vec!["name", "age"]);

        params.clear();
        assert!(params.is_empty());
        assert!(!params.contains("name"));
    }
}
