//! Composite expression nodes: comparisons, concatenation, assignments,
//! rows, sort keys, labels.

use std::any::Any;
use std::sync::Arc;

use crate::compile::{CompileOptions, ExprRenderer};
use crate::error::{BuildError, Result};
use crate::expr::{ExprRef, Expression};

/// Comparison and predicate operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `IN`
    In,
    /// `NOT IN`
    NotIn,
    /// `IS NULL` (postfix)
    IsNull,
    /// `IS NOT NULL` (postfix)
    IsNotNull,
    /// `EXISTS` (prefix)
    Exists,
    /// `NOT EXISTS` (prefix)
    NotExists,
}

impl CompareOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::Exists => "EXISTS",
            Self::NotExists => "NOT EXISTS",
        }
    }
}

/// A comparison between one or two operands.
///
/// Binary operators render `left op right`, postfix operators
/// `left op`, prefix operators `op right`.
#[derive(Debug, Clone)]
pub struct CompareExpr {
    left: Option<ExprRef>,
    op: CompareOp,
    right: Option<ExprRef>,
}

impl CompareExpr {
    /// `left op right`
    #[must_use]
    pub const fn binary(left: ExprRef, op: CompareOp, right: ExprRef) -> Self {
        Self {
            left: Some(left),
            op,
            right: Some(right),
        }
    }

    /// `left op` (e.g. `IS NULL`)
    #[must_use]
    pub const fn postfix(left: ExprRef, op: CompareOp) -> Self {
        Self {
            left: Some(left),
            op,
            right: None,
        }
    }

    /// `op right` (e.g. `EXISTS`)
    #[must_use]
    pub const fn prefix(op: CompareOp, right: ExprRef) -> Self {
        Self {
            left: None,
            op,
            right: Some(right),
        }
    }

    /// Returns the operator.
    #[must_use]
    pub const fn op(&self) -> CompareOp {
        self.op
    }
}

impl Expression for CompareExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        if let Some(left) = &self.left {
            renderer.render_expr(left.as_ref(), out, options)?;
            out.push(' ');
        }
        out.push_str(self.op.as_str());
        if let Some(right) = &self.right {
            out.push(' ');
            renderer.render_expr(right.as_ref(), out, options)?;
        }
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        self.left
            .iter()
            .chain(self.right.iter())
            .map(Arc::clone)
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `expr BETWEEN low AND high`, optionally negated.
#[derive(Debug, Clone)]
pub struct BetweenExpr {
    expr: ExprRef,
    low: ExprRef,
    high: ExprRef,
    negated: bool,
}

impl BetweenExpr {
    /// A range predicate over `expr`.
    #[must_use]
    pub const fn new(expr: ExprRef, low: ExprRef, high: ExprRef, negated: bool) -> Self {
        Self {
            expr,
            low,
            high,
            negated,
        }
    }
}

impl Expression for BetweenExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        renderer.render_expr(self.expr.as_ref(), out, options)?;
        if self.negated {
            out.push_str(" NOT BETWEEN ");
        } else {
            out.push_str(" BETWEEN ");
        }
        renderer.render_expr(self.low.as_ref(), out, options)?;
        out.push_str(" AND ");
        renderer.render_expr(self.high.as_ref(), out, options)?;
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![
            Arc::clone(&self.expr),
            Arc::clone(&self.low),
            Arc::clone(&self.high),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `CONCAT(a, b, ...)` over two or more parts.
#[derive(Debug, Clone)]
pub struct ConcatExpr {
    parts: Vec<ExprRef>,
}

impl ConcatExpr {
    /// Builds a concatenation over `parts`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`] if fewer than two parts
    /// are given.
    pub fn new(parts: Vec<ExprRef>) -> Result<Self> {
        if parts.len() < 2 {
            return Err(BuildError::invalid(
                "concatenation requires at least two parts",
            ));
        }
        Ok(Self { parts })
    }
}

impl Expression for ConcatExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        out.push_str("CONCAT(");
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            renderer.render_expr(part.as_ref(), out, options)?;
        }
        out.push(')');
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        self.parts.iter().map(Arc::clone).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An assignment, rendered `column = value`.
///
/// Filed under the SET position of UPDATE statements.
#[derive(Debug, Clone)]
pub struct AssignExpr {
    column: ExprRef,
    value: ExprRef,
}

impl AssignExpr {
    /// An assignment of `value` to `column`.
    #[must_use]
    pub const fn new(column: ExprRef, value: ExprRef) -> Self {
        Self { column, value }
    }
}

impl Expression for AssignExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        renderer.render_expr(self.column.as_ref(), out, options)?;
        out.push_str(" = ");
        renderer.render_expr(self.value.as_ref(), out, options)?;
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![Arc::clone(&self.column), Arc::clone(&self.value)]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A parenthesized tuple, rendered `(a, b, ...)`.
///
/// Used for INSERT value rows and IN lists.
#[derive(Debug, Clone)]
pub struct RowExpr {
    items: Vec<ExprRef>,
}

impl RowExpr {
    /// Builds a tuple over `items`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`] if `items` is empty.
    pub fn new(items: Vec<ExprRef>) -> Result<Self> {
        if items.is_empty() {
            return Err(BuildError::invalid("row requires at least one item"));
        }
        Ok(Self { items })
    }

    /// Returns the number of items in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; rows cannot be constructed empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Expression for RowExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        out.push('(');
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            renderer.render_expr(item.as_ref(), out, options)?;
        }
        out.push(')');
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        self.items.iter().map(Arc::clone).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Sort direction for ORDER BY keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A sort key, rendered `expr ASC` or `expr DESC`.
#[derive(Debug, Clone)]
pub struct SortExpr {
    expr: ExprRef,
    direction: SortDirection,
}

impl SortExpr {
    /// A sort key over `expr`.
    #[must_use]
    pub const fn new(expr: ExprRef, direction: SortDirection) -> Self {
        Self { expr, direction }
    }

    /// Returns the sort direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl Expression for SortExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        renderer.render_expr(self.expr.as_ref(), out, options)?;
        out.push(' ');
        out.push_str(self.direction.as_str());
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![Arc::clone(&self.expr)]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A projection label, rendered `expr AS label`.
#[derive(Debug, Clone)]
pub struct LabelExpr {
    expr: ExprRef,
    label: String,
}

impl LabelExpr {
    /// Labels `expr` with `label`.
    pub fn new(expr: ExprRef, label: impl Into<String>) -> Self {
        Self {
            expr,
            label: label.into(),
        }
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Expression for LabelExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        renderer.render_expr(self.expr.as_ref(), out, options)?;
        out.push_str(" AS ");
        out.push_str(&self.label);
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![Arc::clone(&self.expr)]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::DefaultRenderer;
    use crate::expr::{col, column, concat, lit, Expr};

    fn render(expr: &Expr) -> String {
        expr.render(&DefaultRenderer, CompileOptions::new()).unwrap()
    }

    #[test]
    fn test_binary_comparisons() {
        assert_eq!(render(&column("P", "age").gt(18_i64)), "P.age > 18");
        assert_eq!(render(&col("name").eq("Ada")), "name = 'Ada'");
        assert_eq!(render(&col("score").ne(0_i64)), "score != 0");
    }

    #[test]
    fn test_null_predicates() {
        assert_eq!(render(&col("deleted_at").is_null()), "deleted_at IS NULL");
        assert_eq!(render(&col("name").is_not_null()), "name IS NOT NULL");
    }

    #[test]
    fn test_between() {
        assert_eq!(
            render(&column("P", "age").between(18_i64, 65_i64)),
            "P.age BETWEEN 18 AND 65"
        );
        assert_eq!(
            render(&col("age").not_between(0_i64, 17_i64)),
            "age NOT BETWEEN 0 AND 17"
        );
    }

    #[test]
    fn test_in_list() {
        let expr = col("id").in_list([1_i64, 2, 3]).unwrap();
        assert_eq!(render(&expr), "id IN (1, 2, 3)");
    }

    #[test]
    fn test_in_list_rejects_empty() {
        let err = col("id").in_list(Vec::<i64>::new()).unwrap_err();
        assert!(matches!(err, BuildError::InvalidArgument(_)));
    }

    #[test]
    fn test_concat() {
        let expr = concat([col("first"), lit(" "), col("last")]).unwrap();
        assert_eq!(render(&expr), "CONCAT(first, ' ', last)");
    }

    #[test]
    fn test_concat_rejects_single_part() {
        let err = concat([col("first")]).unwrap_err();
        assert!(matches!(err, BuildError::InvalidArgument(_)));
    }

    #[test]
    fn test_sort_and_label() {
        assert_eq!(render(&col("age").desc()), "age DESC");
        assert_eq!(render(&col("age").asc()), "age ASC");
        assert_eq!(render(&col("total").named("sum")), "total AS sum");
    }
}
