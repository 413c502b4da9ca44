//! DELETE statement builder.

use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::position::StatementKind;
use crate::schema::Entity;

use super::StatementBuilder;

/// Builder for DELETE statements.
///
/// The target table is fixed at construction as the statement subject.
/// The rest of the surface (`join`, `where_clause`, hooks, `build`)
/// comes from the [`StatementBuilder`] deref.
#[derive(Debug, Clone)]
pub struct Delete {
    base: StatementBuilder,
}

impl Delete {
    /// Creates a DELETE targeting `table`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
    /// if `table` is blank.
    pub fn new(table: &str) -> Result<Self> {
        let mut base = StatementBuilder::new(StatementKind::Delete);
        base.alias(table)?;
        Ok(Self { base })
    }

    /// Creates a DELETE targeting an entity's table.
    ///
    /// # Errors
    ///
    /// Same as [`Delete::new`].
    pub fn for_entity<E: Entity>() -> Result<Self> {
        Self::new(E::NAME)
    }
}

impl Deref for Delete {
    type Target = StatementBuilder;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for Delete {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}
