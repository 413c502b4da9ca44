//! Subquery and common-table-expression nodes.

use std::any::Any;
use std::sync::Arc;

use crate::builder::Select;
use crate::compile::{CompileOptions, Compiler, ExprRenderer, StandardCompiler};
use crate::error::Result;
use crate::expr::{ExprRef, Expression};

/// A parenthesized SELECT embedded as an expression.
///
/// The query is snapshotted when the node is created; later edits to the
/// source builder do not affect it. Rendering goes through the standard
/// compiler with the active renderer threaded through, so leaf
/// interception still applies inside the subquery. Dialect renderers
/// that need full control can intercept the node itself and compile the
/// snapshot with their own compiler.
#[derive(Debug, Clone)]
pub struct SubqueryExpr {
    query: Select,
}

impl SubqueryExpr {
    /// Snapshots `query` as it is now.
    #[must_use]
    pub fn snapshot(query: &Select) -> Self {
        Self {
            query: query.clone(),
        }
    }

    /// Returns the snapshotted query.
    #[must_use]
    pub const fn query(&self) -> &Select {
        &self.query
    }
}

impl Expression for SubqueryExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        out.push('(');
        StandardCompiler::new().compile_into(
            out,
            self.query.kind(),
            self.query.positions(),
            self.query.aliases(),
            renderer,
            options.terminated(false),
        )?;
        out.push(')');
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        self.query
            .positions()
            .iter()
            .flat_map(|(_, entries)| entries.iter())
            .map(|entry| Arc::clone(&entry.expr))
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A named common table expression, rendered `name AS (SELECT ...)`.
#[derive(Debug, Clone)]
pub struct CteExpr {
    name: String,
    query: ExprRef,
}

impl CteExpr {
    /// Names a snapshotted subquery.
    pub fn new(name: impl Into<String>, query: &Select) -> Self {
        Self {
            name: name.into(),
            query: Arc::new(SubqueryExpr::snapshot(query)),
        }
    }

    /// Returns the CTE name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Expression for CteExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        out.push_str(&self.name);
        out.push_str(" AS ");
        renderer.render_expr(self.query.as_ref(), out, options)?;
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![Arc::clone(&self.query)]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
