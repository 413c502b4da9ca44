//! Expression tree.
//!
//! Statements are assembled from immutable [`Expression`] nodes shared
//! behind [`ExprRef`] handles. Nodes know how to render themselves but
//! recurse through the [`ExprRenderer`](crate::compile::ExprRenderer)
//! callback, so a dialect can intercept any node type it cares about.
//!
//! The [`Expr`] wrapper carries an `ExprRef` plus the combinator surface
//! (`eq`, `and`, `between`, ...) used to grow condition trees.

pub mod compose;
pub mod condition;
pub mod join;
pub mod leaf;
pub mod subquery;
pub mod window;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::builder::Select;
use crate::compile::{CompileOptions, ExprRenderer};
use crate::error::Result;
use crate::value::ToSqlValue;

use compose::{
    BetweenExpr, CompareExpr, CompareOp, ConcatExpr, LabelExpr, RowExpr, SortDirection, SortExpr,
};
use condition::{BoolJoin, ConditionGroup};
use leaf::{ColumnExpr, LiteralExpr, ParamExpr, RawExpr, TableExpr};
use subquery::SubqueryExpr;

/// A node in the expression tree.
///
/// Nodes are immutable once constructed and are shared across cloned
/// builders. Rendering must hand every child back to `renderer` instead
/// of recursing directly, so interception stays effective below any
/// depth.
pub trait Expression: fmt::Debug + Send + Sync {
    /// Renders this node into `out`, recursing through `renderer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or one of its children cannot be
    /// rendered.
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()>;

    /// Returns the immediate child expressions, if any.
    fn children(&self) -> Vec<ExprRef> {
        Vec::new()
    }

    /// Upcast used by renderers to intercept concrete node types.
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to an expression node.
pub type ExprRef = Arc<dyn Expression>;

/// An expression handle with the combinator surface attached.
///
/// `Expr` is a thin wrapper over [`ExprRef`]; cloning it clones the
/// handle, never the node.
#[derive(Debug, Clone)]
pub struct Expr {
    node: ExprRef,
}

impl Expr {
    /// Wraps a concrete node.
    pub fn new(node: impl Expression + 'static) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    /// Wraps an existing handle.
    #[must_use]
    pub const fn from_ref(node: ExprRef) -> Self {
        Self { node }
    }

    /// Returns the underlying handle.
    #[must_use]
    pub fn into_ref(self) -> ExprRef {
        self.node
    }

    /// Borrows the underlying handle.
    #[must_use]
    pub const fn node(&self) -> &ExprRef {
        &self.node
    }

    /// Renders this expression to a fresh string.
    ///
    /// # Errors
    ///
    /// Returns any error raised during rendering.
    pub fn render(&self, renderer: &dyn ExprRenderer, options: CompileOptions) -> Result<String> {
        let mut out = String::new();
        renderer.render_expr(self.node.as_ref(), &mut out, options)?;
        Ok(out)
    }

    fn compare(self, op: CompareOp, other: impl IntoExpr) -> Self {
        Self::new(CompareExpr::binary(self.node, op, other.into_expr()))
    }

    /// `self = other`
    #[must_use]
    pub fn eq(self, other: impl IntoExpr) -> Self {
        self.compare(CompareOp::Eq, other)
    }

    /// `self != other`
    #[must_use]
    pub fn ne(self, other: impl IntoExpr) -> Self {
        self.compare(CompareOp::NotEq, other)
    }

    /// `self < other`
    #[must_use]
    pub fn lt(self, other: impl IntoExpr) -> Self {
        self.compare(CompareOp::Lt, other)
    }

    /// `self <= other`
    #[must_use]
    pub fn le(self, other: impl IntoExpr) -> Self {
        self.compare(CompareOp::LtEq, other)
    }

    /// `self > other`
    #[must_use]
    pub fn gt(self, other: impl IntoExpr) -> Self {
        self.compare(CompareOp::Gt, other)
    }

    /// `self >= other`
    #[must_use]
    pub fn ge(self, other: impl IntoExpr) -> Self {
        self.compare(CompareOp::GtEq, other)
    }

    /// `self LIKE pattern`
    #[must_use]
    pub fn like(self, pattern: impl IntoExpr) -> Self {
        self.compare(CompareOp::Like, pattern)
    }

    /// `self NOT LIKE pattern`
    #[must_use]
    pub fn not_like(self, pattern: impl IntoExpr) -> Self {
        self.compare(CompareOp::NotLike, pattern)
    }

    /// `self IN (a, b, ...)`
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
    /// if `items` is empty.
    pub fn in_list<I, T>(self, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: IntoExpr,
    {
        let row = RowExpr::new(items.into_iter().map(IntoExpr::into_expr).collect())?;
        Ok(Self::new(CompareExpr::binary(
            self.node,
            CompareOp::In,
            Arc::new(row),
        )))
    }

    /// `self NOT IN (a, b, ...)`
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
    /// if `items` is empty.
    pub fn not_in_list<I, T>(self, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: IntoExpr,
    {
        let row = RowExpr::new(items.into_iter().map(IntoExpr::into_expr).collect())?;
        Ok(Self::new(CompareExpr::binary(
            self.node,
            CompareOp::NotIn,
            Arc::new(row),
        )))
    }

    /// `self IN (SELECT ...)`, snapshotting the query as it is now.
    #[must_use]
    pub fn in_select(self, query: &Select) -> Self {
        self.compare(CompareOp::In, query)
    }

    /// `self NOT IN (SELECT ...)`, snapshotting the query as it is now.
    #[must_use]
    pub fn not_in_select(self, query: &Select) -> Self {
        self.compare(CompareOp::NotIn, query)
    }

    /// `self BETWEEN low AND high`
    #[must_use]
    pub fn between(self, low: impl IntoExpr, high: impl IntoExpr) -> Self {
        Self::new(BetweenExpr::new(
            self.node,
            low.into_expr(),
            high.into_expr(),
            false,
        ))
    }

    /// `self NOT BETWEEN low AND high`
    #[must_use]
    pub fn not_between(self, low: impl IntoExpr, high: impl IntoExpr) -> Self {
        Self::new(BetweenExpr::new(
            self.node,
            low.into_expr(),
            high.into_expr(),
            true,
        ))
    }

    /// `self IS NULL`
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::new(CompareExpr::postfix(self.node, CompareOp::IsNull))
    }

    /// `self IS NOT NULL`
    #[must_use]
    pub fn is_not_null(self) -> Self {
        Self::new(CompareExpr::postfix(self.node, CompareOp::IsNotNull))
    }

    /// `self AND other`, without added parentheses.
    #[must_use]
    pub fn and(self, other: impl IntoExpr) -> Self {
        Self::new(ConditionGroup::pair(
            self.node,
            BoolJoin::And,
            other.into_expr(),
        ))
    }

    /// `self OR other`, without added parentheses.
    #[must_use]
    pub fn or(self, other: impl IntoExpr) -> Self {
        Self::new(ConditionGroup::pair(
            self.node,
            BoolJoin::Or,
            other.into_expr(),
        ))
    }

    /// `(self)`, an explicit parenthesized group.
    #[must_use]
    pub fn group(self) -> Self {
        Self::new(ConditionGroup::wrap(self.node, false))
    }

    /// `NOT (self)`
    #[must_use]
    pub fn not(self) -> Self {
        Self::new(ConditionGroup::wrap(self.node, true))
    }

    /// `self ASC`
    #[must_use]
    pub fn asc(self) -> Self {
        Self::new(SortExpr::new(self.node, SortDirection::Asc))
    }

    /// `self DESC`
    #[must_use]
    pub fn desc(self) -> Self {
        Self::new(SortExpr::new(self.node, SortDirection::Desc))
    }

    /// `self AS label`
    #[must_use]
    pub fn named(self, label: impl Into<String>) -> Self {
        Self::new(LabelExpr::new(self.node, label))
    }
}

/// Conversion into an expression handle.
///
/// Implemented for [`Expr`], [`ExprRef`], scalars (through
/// [`ToSqlValue`]), and `&Select` (which snapshots the query as a
/// subquery).
pub trait IntoExpr {
    /// Converts `self` into an expression handle.
    fn into_expr(self) -> ExprRef;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> ExprRef {
        self.node
    }
}

impl IntoExpr for &Expr {
    fn into_expr(self) -> ExprRef {
        Arc::clone(&self.node)
    }
}

impl IntoExpr for ExprRef {
    fn into_expr(self) -> ExprRef {
        self
    }
}

impl IntoExpr for &ExprRef {
    fn into_expr(self) -> ExprRef {
        Arc::clone(self)
    }
}

impl IntoExpr for &Select {
    fn into_expr(self) -> ExprRef {
        Arc::new(SubqueryExpr::snapshot(self))
    }
}

macro_rules! impl_into_expr_for_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoExpr for $ty {
                fn into_expr(self) -> ExprRef {
                    Arc::new(LiteralExpr::new(self.to_sql_value()))
                }
            }
        )+
    };
}

impl_into_expr_for_scalar!(
    crate::value::SqlValue,
    bool,
    i64,
    i32,
    i16,
    i8,
    u32,
    u16,
    u8,
    f64,
    f32,
    String,
    &str,
);

impl<T: ToSqlValue> IntoExpr for Option<T> {
    fn into_expr(self) -> ExprRef {
        Arc::new(LiteralExpr::new(self.to_sql_value()))
    }
}

/// An unqualified column reference.
#[must_use]
pub fn col(name: impl Into<String>) -> Expr {
    Expr::new(ColumnExpr::unqualified(name))
}

/// A column reference qualified with a source alias.
#[must_use]
pub fn column(source: impl Into<String>, name: impl Into<String>) -> Expr {
    Expr::new(ColumnExpr::qualified(source, name))
}

/// A table reference, optionally aliased.
#[must_use]
pub fn table(name: impl Into<String>, alias: Option<String>) -> Expr {
    Expr::new(TableExpr::new(name, alias))
}

/// An inline literal value, rendered with escaping.
#[must_use]
pub fn lit(value: impl ToSqlValue) -> Expr {
    Expr::new(LiteralExpr::new(value.to_sql_value()))
}

/// A named parameter placeholder, rendered as `:name`.
#[must_use]
pub fn bind(name: impl Into<String>) -> Expr {
    Expr::new(ParamExpr::new(name))
}

/// A raw SQL fragment, rendered verbatim.
#[must_use]
pub fn raw(sql: impl Into<String>) -> Expr {
    Expr::new(RawExpr::new(sql))
}

/// `CONCAT(a, b, ...)` over two or more parts.
///
/// # Errors
///
/// Returns [`BuildError::InvalidArgument`](crate::BuildError::InvalidArgument)
/// if fewer than two parts are given.
pub fn concat<I, T>(parts: I) -> Result<Expr>
where
    I: IntoIterator<Item = T>,
    T: IntoExpr,
{
    let node = ConcatExpr::new(parts.into_iter().map(IntoExpr::into_expr).collect())?;
    Ok(Expr::new(node))
}

/// `EXISTS (SELECT ...)`, snapshotting the query as it is now.
#[must_use]
pub fn exists(query: &Select) -> Expr {
    Expr::new(CompareExpr::prefix(CompareOp::Exists, query.into_expr()))
}

/// `NOT EXISTS (SELECT ...)`, snapshotting the query as it is now.
#[must_use]
pub fn not_exists(query: &Select) -> Expr {
    Expr::new(CompareExpr::prefix(CompareOp::NotExists, query.into_expr()))
}
