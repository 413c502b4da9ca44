//! UPDATE statement builder.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::error::Result;
use crate::expr::compose::AssignExpr;
use crate::expr::leaf::{ColumnExpr, ParamExpr};
use crate::expr::{ExprRef, IntoExpr};
use crate::params::Parameters;
use crate::position::{Position, StatementKind};
use crate::schema::{Entity, Record};

use super::StatementBuilder;

/// Builder for UPDATE statements.
///
/// The target table is fixed at construction as the statement subject.
/// Derefs to [`StatementBuilder`] for the shared surface, including
/// `join` and `where_clause`.
#[derive(Debug, Clone)]
pub struct Update {
    base: StatementBuilder,
}

impl Update {
    /// Creates an UPDATE targeting `table`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
    /// if `table` is blank.
    pub fn new(table: &str) -> Result<Self> {
        let mut base = StatementBuilder::new(StatementKind::Update);
        base.alias(table)?;
        Ok(Self { base })
    }

    /// Creates an UPDATE targeting an entity's table.
    ///
    /// # Errors
    ///
    /// Same as [`Update::new`].
    pub fn for_entity<E: Entity>() -> Result<Self> {
        Self::new(E::NAME)
    }

    /// Assigns `value` to a column of the target table.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn set(&mut self, column: &str, value: impl IntoExpr) -> Result<&mut Self> {
        let assign = AssignExpr::new(
            Arc::new(ColumnExpr::unqualified(column)) as ExprRef,
            value.into_expr(),
        );
        self.base
            .expression(Arc::new(assign) as ExprRef, Position::Set, 0)?;
        Ok(self)
    }

    /// Files a pre-built assignment expression.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn set_expr(&mut self, assignment: impl IntoExpr) -> Result<&mut Self> {
        self.base.expression(assignment, Position::Set, 0)?;
        Ok(self)
    }

    /// Assigns each entity column from the same column of `source`.
    ///
    /// Files `column = <source>.column` for every column not in
    /// `excluded`. Used with a joined table to copy values across.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn set_from<E: Entity>(&mut self, source: &str, excluded: &[&str]) -> Result<&mut Self> {
        for name in E::COLUMNS {
            if excluded.contains(name) {
                continue;
            }
            let assign = AssignExpr::new(
                Arc::new(ColumnExpr::unqualified(*name)) as ExprRef,
                Arc::new(ColumnExpr::qualified(source, *name)) as ExprRef,
            );
            self.base
                .expression(Arc::new(assign) as ExprRef, Position::Set, 0)?;
        }
        Ok(self)
    }

    /// Assigns placeholders fed from a record instance.
    ///
    /// For each column not in `excluded`, files `column = :column` and
    /// binds the record's value in `params`.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn set_using<R: Record>(
        &mut self,
        record: &R,
        params: &mut Parameters,
        excluded: &[&str],
    ) -> Result<&mut Self> {
        for (name, value) in record.values() {
            if excluded.contains(&name) {
                continue;
            }
            let assign = AssignExpr::new(
                Arc::new(ColumnExpr::unqualified(name)) as ExprRef,
                Arc::new(ParamExpr::new(name)) as ExprRef,
            );
            self.base
                .expression(Arc::new(assign) as ExprRef, Position::Set, 0)?;
            params.set(name, value);
        }
        Ok(self)
    }
}

impl Deref for Update {
    type Target = StatementBuilder;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for Update {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}
