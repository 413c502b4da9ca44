//! Table alias registry.
//!
//! Aliases are assigned per entity name, default to the uppercased first
//! character, and are deduplicated with integer suffixes. Registration
//! order is preserved: the first registered entity is the statement
//! subject, which INSERT, UPDATE, and DELETE compilers use as their
//! target table.

use crate::error::{BuildError, Result};

/// Insertion-ordered mapping from entity name to table alias.
///
/// Alias uniqueness is case-insensitive; entity lookup is exact.
/// Re-registering an entity always returns the alias assigned first.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    entries: Vec<(String, String)>,
}

impl AliasRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the alias for `entity`, assigning one if needed.
    ///
    /// A new alias starts as the uppercased first character of the
    /// entity name; on collision, integer suffixes starting at 1 are
    /// tried in sequence. Idempotent for an already-registered entity.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`] if `entity` is blank.
    pub fn resolve(&mut self, entity: &str) -> Result<String> {
        if let Some(alias) = self.get(entity) {
            return Ok(String::from(alias));
        }
        let alias = self.next_free(entity)?;
        self.entries.push((String::from(entity), alias.clone()));
        Ok(alias)
    }

    /// Forces a specific alias for `entity`.
    ///
    /// Re-assigning the pair already on record is accepted and does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`] if either argument is
    /// blank, if the entity already carries a different alias, or if the
    /// alias is already taken by another entity (case-insensitive).
    pub fn assign(&mut self, entity: &str, alias: &str) -> Result<()> {
        if entity.trim().is_empty() {
            return Err(BuildError::invalid("entity name must not be blank"));
        }
        if alias.trim().is_empty() {
            return Err(BuildError::invalid("alias must not be blank"));
        }
        if let Some(current) = self.get(entity) {
            if current == alias {
                return Ok(());
            }
            return Err(BuildError::invalid(format!(
                "entity '{entity}' is already aliased as '{current}'"
            )));
        }
        if self.is_taken(alias) {
            return Err(BuildError::invalid(format!(
                "alias '{alias}' is already in use"
            )));
        }
        self.entries
            .push((String::from(entity), String::from(alias)));
        Ok(())
    }

    /// Returns the alias registered for `entity`, if any.
    #[must_use]
    pub fn get(&self, entity: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == entity)
            .map(|(_, alias)| alias.as_str())
    }

    /// Returns the first registered entity name, if any.
    ///
    /// This is the statement subject for kinds without a table clause.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.entries.first().map(|(name, _)| name.as_str())
    }

    /// Returns the alias of the first registered entity, if any.
    #[must_use]
    pub fn subject_alias(&self) -> Option<&str> {
        self.entries.first().map(|(_, alias)| alias.as_str())
    }

    /// Iterates `(entity, alias)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, alias)| (name.as_str(), alias.as_str()))
    }

    /// Returns the number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn next_free(&self, entity: &str) -> Result<String> {
        let first = entity
            .trim()
            .chars()
            .next()
            .ok_or_else(|| BuildError::invalid("entity name must not be blank"))?;
        let base: String = first.to_uppercase().collect();
        if !self.is_taken(&base) {
            return Ok(base);
        }
        let mut suffix = 1_u32;
        loop {
            let candidate = format!("{base}{suffix}");
            if !self.is_taken(&candidate) {
                return Ok(candidate);
            }
            suffix += 1;
        }
    }

    fn is_taken(&self, candidate: &str) -> bool {
        self.entries
            .iter()
            .any(|(_, alias)| alias.eq_ignore_ascii_case(candidate))
    }
}
