//! SELECT statement builder.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::error::Result;
use crate::expr::compose::{SortDirection, SortExpr};
use crate::expr::condition::ConditionBuilder;
use crate::expr::leaf::{ColumnExpr, TableExpr};
use crate::expr::subquery::CteExpr;
use crate::expr::window::{OverBuilder, WindowedExpr};
use crate::expr::{ExprRef, IntoExpr};
use crate::position::{Position, StatementKind};
use crate::schema::Entity;

use super::StatementBuilder;

/// Builder for SELECT statements.
///
/// Derefs to [`StatementBuilder`] for the shared surface
/// (`where_clause`, `join`, aliases, hooks, `build`).
#[derive(Debug, Clone)]
pub struct Select {
    base: StatementBuilder,
}

impl Select {
    /// Creates an empty SELECT builder.
    ///
    /// With no projected columns, compilers render `SELECT *`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: StatementBuilder::new(StatementKind::Select),
        }
    }

    /// Adds a source table, auto-assigning its alias.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
    /// if `table` is blank.
    pub fn from(&mut self, table: &str) -> Result<&mut Self> {
        let alias = self.base.alias(table)?;
        self.base
            .expression(table_ref(table, alias), Position::From, 0)?;
        Ok(self)
    }

    /// Adds a source table under a forced alias.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
    /// if the alias is blank or taken.
    pub fn from_as(&mut self, table: &str, alias: &str) -> Result<&mut Self> {
        self.base.alias_as(table, alias)?;
        self.base
            .expression(table_ref(table, String::from(alias)), Position::From, 0)?;
        Ok(self)
    }

    /// Adds an entity's table as a source, auto-assigning its alias.
    ///
    /// # Errors
    ///
    /// Same as [`Select::from`].
    pub fn from_entity<E: Entity>(&mut self) -> Result<&mut Self> {
        self.from(E::NAME)
    }

    /// Projects a single qualified column.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn column(&mut self, source: &str, name: &str) -> Result<&mut Self> {
        self.base.expression(
            Arc::new(ColumnExpr::qualified(source, name)) as ExprRef,
            Position::Columns,
            0,
        )?;
        Ok(self)
    }

    /// Projects an arbitrary expression.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn value(&mut self, expr: impl IntoExpr) -> Result<&mut Self> {
        self.base.expression(expr, Position::Columns, 0)?;
        Ok(self)
    }

    /// Projects all of an entity's columns, qualified with its alias.
    ///
    /// Columns named in `excluded` are skipped. Registers the entity's
    /// alias if it has none yet.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
    /// if the entity name is blank, or a hook error.
    pub fn columns_of<E: Entity>(&mut self, excluded: &[&str]) -> Result<&mut Self> {
        let alias = self.base.alias(E::NAME)?;
        for name in E::COLUMNS {
            if excluded.contains(name) {
                continue;
            }
            self.base.expression(
                Arc::new(ColumnExpr::qualified(alias.clone(), *name)) as ExprRef,
                Position::Columns,
                0,
            )?;
        }
        Ok(self)
    }

    /// Adds a grouping key.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn group_by(&mut self, key: impl IntoExpr) -> Result<&mut Self> {
        self.base.expression(key, Position::GroupBy, 0)?;
        Ok(self)
    }

    /// Adds a HAVING condition group built inside the closure.
    ///
    /// A closure that adds nothing files nothing.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn having(&mut self, f: impl FnOnce(&mut ConditionBuilder)) -> Result<&mut Self> {
        let mut builder = ConditionBuilder::new();
        f(&mut builder);
        if let Some(group) = builder.into_group(false) {
            self.base
                .expression(Arc::new(group) as ExprRef, Position::Having, 0)?;
        }
        Ok(self)
    }

    /// Adds an ascending-by-default sort key.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn order_by(&mut self, key: impl IntoExpr) -> Result<&mut Self> {
        self.base.expression(key, Position::OrderBy, 0)?;
        Ok(self)
    }

    /// Adds a descending sort key.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn order_by_desc(&mut self, key: impl IntoExpr) -> Result<&mut Self> {
        let sort = SortExpr::new(key.into_expr(), SortDirection::Desc);
        self.base
            .expression(Arc::new(sort) as ExprRef, Position::OrderBy, 0)?;
        Ok(self)
    }

    /// Projects a windowed function call, `function OVER (...)`.
    ///
    /// The closure fills the window's partition, order, and frame parts.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn over(
        &mut self,
        function: impl IntoExpr,
        f: impl FnOnce(&mut OverBuilder),
    ) -> Result<&mut Self> {
        let mut over = OverBuilder::new();
        f(&mut over);
        let windowed = WindowedExpr::new(function.into_expr(), over.build());
        self.base
            .expression(Arc::new(windowed) as ExprRef, Position::Columns, 0)?;
        Ok(self)
    }

    /// Adds a common table expression, snapshotting `query` as it is
    /// now.
    ///
    /// # Errors
    ///
    /// Returns a hook error, if any.
    pub fn with(&mut self, name: &str, query: &Self) -> Result<&mut Self> {
        self.base
            .expression(Arc::new(CteExpr::new(name, query)) as ExprRef, Position::With, 0)?;
        Ok(self)
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Select {
    type Target = StatementBuilder;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for Select {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

fn table_ref(table: &str, alias: String) -> ExprRef {
    Arc::new(TableExpr::new(table, Some(alias)))
}
