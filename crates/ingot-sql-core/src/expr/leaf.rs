//! Leaf expression nodes: columns, tables, literals, parameters, raw SQL.

use std::any::Any;

use crate::compile::{CompileOptions, ExprRenderer};
use crate::error::Result;
use crate::expr::Expression;
use crate::value::SqlValue;

/// A column reference, optionally qualified with a source alias.
///
/// Renders as `name` or `source.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnExpr {
    source: Option<String>,
    name: String,
}

impl ColumnExpr {
    /// A column without a source qualifier.
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            source: None,
            name: name.into(),
        }
    }

    /// A column qualified with a source alias.
    pub fn qualified(source: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            name: name.into(),
        }
    }

    /// Returns the source alias, if any.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Expression for ColumnExpr {
    fn render(
        &self,
        out: &mut String,
        _renderer: &dyn ExprRenderer,
        _options: CompileOptions,
    ) -> Result<()> {
        if let Some(source) = &self.source {
            out.push_str(source);
            out.push('.');
        }
        out.push_str(&self.name);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A table reference, optionally aliased.
///
/// Renders as `name` or `name AS alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableExpr {
    name: String,
    alias: Option<String>,
}

impl TableExpr {
    /// A table reference.
    pub fn new(name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            name: name.into(),
            alias,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the alias, if any.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

impl Expression for TableExpr {
    fn render(
        &self,
        out: &mut String,
        _renderer: &dyn ExprRenderer,
        _options: CompileOptions,
    ) -> Result<()> {
        out.push_str(&self.name);
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            out.push_str(alias);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A literal value rendered inline with escaping.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    value: SqlValue,
}

impl LiteralExpr {
    /// Wraps a value as an inline literal.
    #[must_use]
    pub const fn new(value: SqlValue) -> Self {
        Self { value }
    }

    /// Returns the wrapped value.
    #[must_use]
    pub const fn value(&self) -> &SqlValue {
        &self.value
    }
}

impl Expression for LiteralExpr {
    fn render(
        &self,
        out: &mut String,
        _renderer: &dyn ExprRenderer,
        _options: CompileOptions,
    ) -> Result<()> {
        out.push_str(&self.value.to_sql_inline());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A named parameter placeholder.
///
/// Renders as `:name`; the value travels separately in a
/// [`Parameters`](crate::params::Parameters) bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamExpr {
    name: String,
}

impl ParamExpr {
    /// A placeholder for the parameter `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Expression for ParamExpr {
    fn render(
        &self,
        out: &mut String,
        _renderer: &dyn ExprRenderer,
        _options: CompileOptions,
    ) -> Result<()> {
        out.push(':');
        out.push_str(&self.name);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A raw SQL fragment rendered verbatim.
///
/// The escape hatch for dialect features the node set does not model.
/// Nothing is escaped; never feed it caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExpr {
    sql: String,
}

impl RawExpr {
    /// Wraps a verbatim fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    /// Returns the fragment.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl Expression for RawExpr {
    fn render(
        &self,
        out: &mut String,
        _renderer: &dyn ExprRenderer,
        _options: CompileOptions,
    ) -> Result<()> {
        out.push_str(&self.sql);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
