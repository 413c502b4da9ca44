//! Join clause nodes.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::compile::{CompileOptions, ExprRenderer};
use crate::error::{BuildError, Result};
use crate::expr::{ExprRef, Expression};

/// The join flavors a statement can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
    /// `FULL JOIN`
    Full,
    /// `CROSS JOIN`
    Cross,
}

impl JoinKind {
    /// Returns the SQL keywords for this join.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }

    /// Returns `true` if this join requires an ON condition.
    #[must_use]
    pub const fn requires_on(self) -> bool {
        !matches!(self, Self::Cross)
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a join attaches: a table or a derived table.
#[derive(Debug, Clone)]
pub enum JoinTarget {
    /// A table reference node
    /// ([`TableExpr`](crate::expr::leaf::TableExpr)), rendered through
    /// the renderer so dialects can intercept it.
    Table {
        /// The table reference.
        table: ExprRef,
    },
    /// A subquery with a mandatory alias.
    Subquery {
        /// The subquery expression.
        query: ExprRef,
        /// Alias for the derived table.
        alias: String,
    },
}

impl JoinTarget {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        match self {
            Self::Table { table } => {
                renderer.render_expr(table.as_ref(), out, options)?;
            }
            Self::Subquery { query, alias } => {
                renderer.render_expr(query.as_ref(), out, options)?;
                out.push_str(" AS ");
                out.push_str(alias);
            }
        }
        Ok(())
    }
}

/// A complete join clause.
///
/// Immutable once filed: kind, target, and ON condition are fixed at
/// construction. Renders as `<KIND> <target> ON <condition>`, or without
/// the ON part for cross joins.
#[derive(Debug, Clone)]
pub struct JoinExpr {
    kind: JoinKind,
    target: JoinTarget,
    on: Option<ExprRef>,
}

impl JoinExpr {
    /// Builds a join clause.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingOnCondition`] if a non-cross join
    /// has no condition, and [`BuildError::InvalidArgument`] if a cross
    /// join has one.
    pub fn new(kind: JoinKind, target: JoinTarget, on: Option<ExprRef>) -> Result<Self> {
        if kind.requires_on() && on.is_none() {
            return Err(BuildError::MissingOnCondition { kind });
        }
        if !kind.requires_on() && on.is_some() {
            return Err(BuildError::invalid("CROSS JOIN cannot carry an ON condition"));
        }
        Ok(Self { kind, target, on })
    }

    /// Returns the join kind.
    #[must_use]
    pub const fn kind(&self) -> JoinKind {
        self.kind
    }

    /// Returns the join target.
    #[must_use]
    pub const fn target(&self) -> &JoinTarget {
        &self.target
    }

    /// Returns the ON condition, if any.
    #[must_use]
    pub const fn on(&self) -> Option<&ExprRef> {
        self.on.as_ref()
    }
}

impl Expression for JoinExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        out.push_str(self.kind.as_str());
        out.push(' ');
        self.target.render(out, renderer, options)?;
        if let Some(on) = &self.on {
            out.push_str(" ON ");
            renderer.render_expr(on.as_ref(), out, options)?;
        }
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        let mut children = Vec::new();
        match &self.target {
            JoinTarget::Table { table } => children.push(Arc::clone(table)),
            JoinTarget::Subquery { query, .. } => children.push(Arc::clone(query)),
        }
        if let Some(on) = &self.on {
            children.push(Arc::clone(on));
        }
        children
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::DefaultRenderer;
    use crate::expr::column;
    use crate::expr::leaf::TableExpr;

    fn render(join: &JoinExpr) -> String {
        let mut out = String::new();
        join.render(&mut out, &DefaultRenderer, CompileOptions::new())
            .unwrap();
        out
    }

    fn table(name: &str, alias: &str) -> JoinTarget {
        JoinTarget::Table {
            table: Arc::new(TableExpr::new(name, Some(String::from(alias)))),
        }
    }

    #[test]
    fn test_inner_join_rendering() {
        let on = column("P", "id").eq(column("T", "author_id"));
        let join = JoinExpr::new(JoinKind::Inner, table("Post", "T"), Some(on.into_ref())).unwrap();
        assert_eq!(render(&join), "INNER JOIN Post AS T ON P.id = T.author_id");
    }

    #[test]
    fn test_cross_join_has_no_on() {
        let join = JoinExpr::new(JoinKind::Cross, table("Tag", "T"), None).unwrap();
        assert_eq!(render(&join), "CROSS JOIN Tag AS T");
    }

    #[test]
    fn test_non_cross_join_requires_on() {
        let err = JoinExpr::new(JoinKind::Left, table("Post", "T"), None).unwrap_err();
        assert!(matches!(
            err,
            BuildError::MissingOnCondition {
                kind: JoinKind::Left
            }
        ));
    }

    #[test]
    fn test_cross_join_rejects_on() {
        let on = column("P", "id").eq(1_i64);
        let err = JoinExpr::new(JoinKind::Cross, table("Tag", "T"), Some(on.into_ref())).unwrap_err();
        assert!(matches!(err, BuildError::InvalidArgument(_)));
    }
}
