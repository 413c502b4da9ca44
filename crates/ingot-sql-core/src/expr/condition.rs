//! Boolean condition groups.
//!
//! WHERE, HAVING, and ON clauses are built from [`ConditionGroup`] trees.
//! The root group renders without parentheses; nested groups always
//! parenthesize, so the output carries exactly the grouping the caller
//! authored.

use std::any::Any;
use std::sync::Arc;

use crate::compile::{CompileOptions, ExprRenderer};
use crate::error::Result;
use crate::expr::{ExprRef, Expression, IntoExpr};

/// Boolean connective between adjacent conditions in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolJoin {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl BoolJoin {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// A flat sequence of conditions joined by `AND`/`OR`.
///
/// Each node records the connective that links it to the previous node;
/// the first node's connective is never rendered. An empty group renders
/// nothing.
#[derive(Debug, Clone)]
pub struct ConditionGroup {
    negated: bool,
    parenthesized: bool,
    nodes: Vec<(BoolJoin, ExprRef)>,
}

impl ConditionGroup {
    pub(crate) const fn new(
        negated: bool,
        parenthesized: bool,
        nodes: Vec<(BoolJoin, ExprRef)>,
    ) -> Self {
        Self {
            negated,
            parenthesized,
            nodes,
        }
    }

    /// `left <join> right`, without added parentheses.
    #[must_use]
    pub fn pair(left: ExprRef, join: BoolJoin, right: ExprRef) -> Self {
        Self::new(false, false, vec![(BoolJoin::And, left), (join, right)])
    }

    /// Wraps a single condition in parentheses, optionally negated.
    #[must_use]
    pub fn wrap(node: ExprRef, negated: bool) -> Self {
        Self::new(negated, true, vec![(BoolJoin::And, node)])
    }

    /// Returns `true` if the group holds no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if the group renders a leading `NOT`.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.negated
    }

    /// Iterates the conditions with their connectives.
    pub fn nodes(&self) -> impl Iterator<Item = (BoolJoin, &ExprRef)> {
        self.nodes.iter().map(|(join, node)| (*join, node))
    }
}

impl Expression for ConditionGroup {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        if self.nodes.is_empty() {
            return Ok(());
        }
        if self.negated {
            out.push_str("NOT ");
        }
        let parens = self.negated || self.parenthesized;
        if parens {
            out.push('(');
        }
        for (i, (join, node)) in self.nodes.iter().enumerate() {
            if i > 0 {
                out.push(' ');
                out.push_str(join.as_str());
                out.push(' ');
            }
            renderer.render_expr(node.as_ref(), out, options)?;
        }
        if parens {
            out.push(')');
        }
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        self.nodes.iter().map(|(_, node)| Arc::clone(node)).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Accumulates conditions inside a `where_clause`, `having`, or join
/// `on` closure.
///
/// A builder that stays empty files nothing; the enclosing statement is
/// left untouched.
#[derive(Debug, Default)]
pub struct ConditionBuilder {
    negated: bool,
    nodes: Vec<(BoolJoin, ExprRef)>,
}

impl ConditionBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition joined with `AND`.
    pub fn and(&mut self, condition: impl IntoExpr) -> &mut Self {
        self.nodes.push((BoolJoin::And, condition.into_expr()));
        self
    }

    /// Adds a condition joined with `OR`.
    pub fn or(&mut self, condition: impl IntoExpr) -> &mut Self {
        self.nodes.push((BoolJoin::Or, condition.into_expr()));
        self
    }

    /// Adds a parenthesized sub-group joined with `AND`.
    ///
    /// An empty sub-group is dropped.
    pub fn and_group(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.add_group(BoolJoin::And, f);
        self
    }

    /// Adds a parenthesized sub-group joined with `OR`.
    ///
    /// An empty sub-group is dropped.
    pub fn or_group(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.add_group(BoolJoin::Or, f);
        self
    }

    /// Negates the whole group; it will render as `NOT (...)`.
    pub fn negate(&mut self) -> &mut Self {
        self.negated = true;
        self
    }

    /// Returns `true` if no conditions were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn add_group(&mut self, join: BoolJoin, f: impl FnOnce(&mut Self)) {
        let mut sub = Self::new();
        f(&mut sub);
        if let Some(group) = sub.into_group(true) {
            self.nodes.push((join, Arc::new(group)));
        }
    }

    /// Finishes the builder into a group, or `None` if empty.
    pub(crate) fn into_group(self, parenthesized: bool) -> Option<ConditionGroup> {
        if self.nodes.is_empty() {
            return None;
        }
        Some(ConditionGroup::new(self.negated, parenthesized, self.nodes))
    }
}
