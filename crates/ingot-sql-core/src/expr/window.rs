//! Window (OVER) clause nodes and their sub-builders.

use std::any::Any;
use std::sync::Arc;

use crate::compile::{CompileOptions, ExprRenderer};
use crate::error::{BuildError, Result};
use crate::expr::compose::{SortDirection, SortExpr};
use crate::expr::{Expr, ExprRef, Expression, IntoExpr};

/// The inside of an OVER clause.
///
/// Holds optional partition keys, optional order keys, and an optional
/// frame expression. Each part is emitted only when present, with single
/// spaces between emitted parts and no dangling separators.
#[derive(Debug, Clone, Default)]
pub struct WindowExpr {
    partition_by: Vec<ExprRef>,
    order_by: Vec<ExprRef>,
    frame: Option<ExprRef>,
}

impl WindowExpr {
    /// Returns `true` if no parts are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partition_by.is_empty() && self.order_by.is_empty() && self.frame.is_none()
    }
}

impl Expression for WindowExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        let mut has_content = false;
        if !self.partition_by.is_empty() {
            out.push_str("PARTITION BY ");
            for (i, key) in self.partition_by.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                renderer.render_expr(key.as_ref(), out, options)?;
            }
            has_content = true;
        }
        if !self.order_by.is_empty() {
            if has_content {
                out.push(' ');
            }
            out.push_str("ORDER BY ");
            for (i, key) in self.order_by.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                renderer.render_expr(key.as_ref(), out, options)?;
            }
            has_content = true;
        }
        if let Some(frame) = &self.frame {
            if has_content {
                out.push(' ');
            }
            renderer.render_expr(frame.as_ref(), out, options)?;
        }
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        self.partition_by
            .iter()
            .chain(self.order_by.iter())
            .chain(self.frame.iter())
            .map(Arc::clone)
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A windowed function call, rendered `function OVER (window)`.
#[derive(Debug, Clone)]
pub struct WindowedExpr {
    function: ExprRef,
    window: ExprRef,
}

impl WindowedExpr {
    /// Attaches a window to a function expression.
    #[must_use]
    pub fn new(function: ExprRef, window: WindowExpr) -> Self {
        Self {
            function,
            window: Arc::new(window),
        }
    }

    /// Returns the function expression.
    #[must_use]
    pub const fn function(&self) -> &ExprRef {
        &self.function
    }
}

impl Expression for WindowedExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        renderer.render_expr(self.function.as_ref(), out, options)?;
        out.push_str(" OVER (");
        renderer.render_expr(self.window.as_ref(), out, options)?;
        out.push(')');
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![Arc::clone(&self.function), Arc::clone(&self.window)]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Accumulates the parts of an OVER clause inside an `over` closure.
#[derive(Debug, Default)]
pub struct OverBuilder {
    window: WindowExpr,
}

impl OverBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a partition key.
    pub fn partition_by(&mut self, key: impl IntoExpr) -> &mut Self {
        self.window.partition_by.push(key.into_expr());
        self
    }

    /// Adds an ascending-by-default order key.
    pub fn order_by(&mut self, key: impl IntoExpr) -> &mut Self {
        self.window.order_by.push(key.into_expr());
        self
    }

    /// Adds a descending order key.
    pub fn order_by_desc(&mut self, key: impl IntoExpr) -> &mut Self {
        let sort = SortExpr::new(key.into_expr(), SortDirection::Desc);
        self.window.order_by.push(Arc::new(sort));
        self
    }

    /// Sets the frame expression, replacing any previous one.
    pub fn frame(&mut self, frame: impl IntoExpr) -> &mut Self {
        self.window.frame = Some(frame.into_expr());
        self
    }

    /// Finishes the builder into a window node.
    #[must_use]
    pub fn build(self) -> WindowExpr {
        self.window
    }
}

/// Row-set units a frame can be limited by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnit {
    /// `ROWS`
    Rows,
    /// `RANGE`
    Range,
    /// `GROUPS`
    Groups,
}

impl FrameUnit {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
            Self::Groups => "GROUPS",
        }
    }
}

/// A frame limit with one or two borders.
///
/// Renders `<limit> <lower>` with one border, or
/// `<limit> BETWEEN <lower> AND <upper>` with two.
#[derive(Debug, Clone)]
pub struct FrameExpr {
    limit: ExprRef,
    lower: ExprRef,
    upper: Option<ExprRef>,
}

impl Expression for FrameExpr {
    fn render(
        &self,
        out: &mut String,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        renderer.render_expr(self.limit.as_ref(), out, options)?;
        out.push(' ');
        if let Some(upper) = &self.upper {
            out.push_str("BETWEEN ");
            renderer.render_expr(self.lower.as_ref(), out, options)?;
            out.push_str(" AND ");
            renderer.render_expr(upper.as_ref(), out, options)?;
        } else {
            renderer.render_expr(self.lower.as_ref(), out, options)?;
        }
        Ok(())
    }

    fn children(&self) -> Vec<ExprRef> {
        let mut children = vec![Arc::clone(&self.limit), Arc::clone(&self.lower)];
        if let Some(upper) = &self.upper {
            children.push(Arc::clone(upper));
        }
        children
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Assembles a [`FrameExpr`] border by border.
///
/// The limit is fixed at construction. The first [`expression`] call
/// sets the lower border, the second sets the upper border and switches
/// rendering to the BETWEEN form, and a third call is rejected.
///
/// [`expression`]: FrameBuilder::expression
#[derive(Debug)]
pub struct FrameBuilder {
    limit: ExprRef,
    lower: Option<ExprRef>,
    upper: Option<ExprRef>,
}

impl FrameBuilder {
    /// Starts a frame limited by a row-set unit keyword.
    #[must_use]
    pub fn new(unit: FrameUnit) -> Self {
        Self::with_limit(crate::expr::raw(unit.as_str()))
    }

    /// Starts a frame with an arbitrary limit expression.
    #[must_use]
    pub fn with_limit(limit: impl IntoExpr) -> Self {
        Self {
            limit: limit.into_expr(),
            lower: None,
            upper: None,
        }
    }

    /// Adds the next border.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`] on a third call; both
    /// borders are already set.
    pub fn expression(&mut self, border: impl IntoExpr) -> Result<&mut Self> {
        if self.lower.is_none() {
            self.lower = Some(border.into_expr());
        } else if self.upper.is_none() {
            self.upper = Some(border.into_expr());
        } else {
            return Err(BuildError::invalid(
                "frame already has lower and upper borders",
            ));
        }
        Ok(self)
    }

    /// Finishes the builder into a frame node.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`] if no border was added.
    pub fn build(self) -> Result<Expr> {
        let lower = self
            .lower
            .ok_or_else(|| BuildError::invalid("frame requires at least one border"))?;
        Ok(Expr::new(FrameExpr {
            limit: self.limit,
            lower,
            upper: self.upper,
        }))
    }
}

/// The shape of one frame border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    /// `CURRENT ROW`
    CurrentRow,
    /// `<count> PRECEDING`, or `UNBOUNDED PRECEDING` when `None`.
    Preceding(Option<u64>),
    /// `<count> FOLLOWING`, or `UNBOUNDED FOLLOWING` when `None`.
    Following(Option<u64>),
}

/// One endpoint of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderExpr {
    kind: BorderKind,
}

impl BorderExpr {
    /// A border of the given kind.
    #[must_use]
    pub const fn new(kind: BorderKind) -> Self {
        Self { kind }
    }

    /// Returns the border kind.
    #[must_use]
    pub const fn kind(&self) -> BorderKind {
        self.kind
    }

    /// `CURRENT ROW`
    #[must_use]
    pub fn current_row() -> Expr {
        Expr::new(Self::new(BorderKind::CurrentRow))
    }

    /// `<count> PRECEDING`
    #[must_use]
    pub fn preceding(count: u64) -> Expr {
        Expr::new(Self::new(BorderKind::Preceding(Some(count))))
    }

    /// `UNBOUNDED PRECEDING`
    #[must_use]
    pub fn unbounded_preceding() -> Expr {
        Expr::new(Self::new(BorderKind::Preceding(None)))
    }

    /// `<count> FOLLOWING`
    #[must_use]
    pub fn following(count: u64) -> Expr {
        Expr::new(Self::new(BorderKind::Following(Some(count))))
    }

    /// `UNBOUNDED FOLLOWING`
    #[must_use]
    pub fn unbounded_following() -> Expr {
        Expr::new(Self::new(BorderKind::Following(None)))
    }
}

impl Expression for BorderExpr {
    fn render(
        &self,
        out: &mut String,
        _renderer: &dyn ExprRenderer,
        _options: CompileOptions,
    ) -> Result<()> {
        match self.kind {
            BorderKind::CurrentRow => out.push_str("CURRENT ROW"),
            BorderKind::Preceding(count) => {
                match count {
                    Some(count) => out.push_str(&count.to_string()),
                    None => out.push_str("UNBOUNDED"),
                }
                out.push_str(" PRECEDING");
            }
            BorderKind::Following(count) => {
                match count {
                    Some(count) => out.push_str(&count.to_string()),
                    None => out.push_str("UNBOUNDED"),
                }
                out.push_str(" FOLLOWING");
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
