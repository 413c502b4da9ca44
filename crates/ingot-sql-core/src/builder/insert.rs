//! INSERT statement builder.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::error::Result;
use crate::expr::compose::RowExpr;
use crate::expr::leaf::{ColumnExpr, ParamExpr};
use crate::expr::{ExprRef, IntoExpr};
use crate::params::Parameters;
use crate::position::{Position, StatementKind};
use crate::schema::{Entity, Record};

use super::StatementBuilder;

/// Builder for INSERT statements.
///
/// The target table is fixed at construction: it becomes the first
/// entry of the alias registry, which compilers read as the statement
/// subject. Derefs to [`StatementBuilder`] for the shared surface.
#[derive(Debug, Clone)]
pub struct Insert {
    base: StatementBuilder,
}

impl Insert {
    /// Creates an INSERT targeting `table`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
    /// if `table` is blank.
    pub fn new(table: &str) -> Result<Self> {
        let mut base = StatementBuilder::new(StatementKind::Insert);
        base.alias(table)?;
        Ok(Self { base })
    }

    /// Creates an INSERT targeting an entity's table.
    ///
    /// # Errors
    ///
    /// Same as [`Insert::new`].
    pub fn for_entity<E: Entity>() -> Result<Self> {
        Self::new(E::NAME)
    }

    /// Declares the column list, unqualified.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn columns(&mut self, names: &[&str]) -> Result<&mut Self> {
        for name in names {
            self.base.expression(
                Arc::new(ColumnExpr::unqualified(*name)) as ExprRef,
                Position::Columns,
                0,
            )?;
        }
        Ok(self)
    }

    /// Declares an entity's columns, skipping those in `excluded`.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn columns_of<E: Entity>(&mut self, excluded: &[&str]) -> Result<&mut Self> {
        for name in E::COLUMNS {
            if excluded.contains(name) {
                continue;
            }
            self.base.expression(
                Arc::new(ColumnExpr::unqualified(*name)) as ExprRef,
                Position::Columns,
                0,
            )?;
        }
        Ok(self)
    }

    /// Adds one VALUES row.
    ///
    /// Each call files one parenthesized tuple; multiple calls make a
    /// multi-row insert.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
    /// if `row` is empty, or a hook error.
    pub fn values<I, T>(&mut self, row: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: IntoExpr,
    {
        let row = RowExpr::new(row.into_iter().map(IntoExpr::into_expr).collect())?;
        self.base
            .expression(Arc::new(row) as ExprRef, Position::Values, 0)?;
        Ok(self)
    }

    /// Adds a VALUES row of placeholders fed from a record instance.
    ///
    /// For each column not in `excluded`, files a `:column` placeholder
    /// and binds the record's value for it in `params`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
    /// if every column is excluded, or a hook error.
    pub fn values_using<R: Record>(
        &mut self,
        record: &R,
        params: &mut Parameters,
        excluded: &[&str],
    ) -> Result<&mut Self> {
        let mut placeholders: Vec<ExprRef> = Vec::new();
        for (name, value) in record.values() {
            if excluded.contains(&name) {
                continue;
            }
            placeholders.push(Arc::new(ParamExpr::new(name)));
            params.set(name, value);
        }
        let row = RowExpr::new(placeholders)?;
        self.base
            .expression(Arc::new(row) as ExprRef, Position::Values, 0)?;
        Ok(self)
    }

    /// Adds a VALUES row of `:column<suffix>` placeholders for an
    /// entity's columns.
    ///
    /// Useful for multi-row inserts where each row carries its own
    /// suffix; the caller binds values under the suffixed names.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
    /// if every column is excluded, or a hook error.
    pub fn parameters_from<E: Entity>(
        &mut self,
        suffix: &str,
        excluded: &[&str],
    ) -> Result<&mut Self> {
        let mut placeholders: Vec<ExprRef> = Vec::new();
        for name in E::COLUMNS {
            if excluded.contains(name) {
                continue;
            }
            placeholders.push(Arc::new(ParamExpr::new(format!("{name}{suffix}"))));
        }
        let row = RowExpr::new(placeholders)?;
        self.base
            .expression(Arc::new(row) as ExprRef, Position::Values, 0)?;
        Ok(self)
    }
}

impl Deref for Insert {
    type Target = StatementBuilder;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for Insert {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}
