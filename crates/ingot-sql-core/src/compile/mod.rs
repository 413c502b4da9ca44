//! Compilation contracts.
//!
//! Builders own statement structure; turning that structure into SQL text
//! is delegated to a [`Compiler`]. Expression nodes render themselves
//! through an [`ExprRenderer`] callback, which dialect crates can
//! substitute to intercept individual node types while the recursion for
//! everything else stays shared.

mod standard;

pub use standard::{render_filter, render_joins, render_list, subject, StandardCompiler};

use crate::alias::AliasRegistry;
use crate::error::Result;
use crate::expr::Expression;
use crate::position::{PositionMap, StatementKind};

/// Options threaded through a compilation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Append a `;` terminator to the finished statement.
    pub terminate: bool,
}

impl CompileOptions {
    /// Creates options with all flags off.
    #[must_use]
    pub const fn new() -> Self {
        Self { terminate: false }
    }

    /// Sets whether the statement ends with a `;` terminator.
    #[must_use]
    pub const fn terminated(mut self, enabled: bool) -> Self {
        self.terminate = enabled;
        self
    }
}

/// Recursive rendering callback handed to every expression node.
///
/// Nodes never render their children directly; they hand each child back
/// to the renderer. A dialect can wrap the recursion to special-case
/// node types it recognizes (via [`Expression::as_any`]) and fall through
/// to the node's own `render` for the rest.
pub trait ExprRenderer {
    /// Renders one expression node into `out`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the node or its children.
    fn render_expr(
        &self,
        expr: &dyn Expression,
        out: &mut String,
        options: CompileOptions,
    ) -> Result<()>;
}

/// Renderer that lets every node render itself, recursing through
/// itself for children.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

impl DefaultRenderer {
    /// Creates the default renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ExprRenderer for DefaultRenderer {
    fn render_expr(
        &self,
        expr: &dyn Expression,
        out: &mut String,
        options: CompileOptions,
    ) -> Result<()> {
        expr.render(out, self, options)
    }
}

/// A compilation backend that turns statement structure into SQL text.
///
/// The compiler receives everything a builder accumulated and decides
/// clause order, keywords, and separators for its dialect. Within one
/// position it is expected to respect the caller's order hints
/// ([`PositionMap::in_order`]).
pub trait Compiler {
    /// Compiles one statement into `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure cannot be expressed in this
    /// dialect or an expression fails to render.
    fn compile_into(
        &self,
        out: &mut String,
        kind: StatementKind,
        positions: &PositionMap,
        aliases: &AliasRegistry,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()>;

    /// Compiles one statement into a fresh string.
    ///
    /// # Errors
    ///
    /// Same as [`Compiler::compile_into`].
    fn compile(
        &self,
        kind: StatementKind,
        positions: &PositionMap,
        aliases: &AliasRegistry,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<String> {
        let mut out = String::new();
        self.compile_into(&mut out, kind, positions, aliases, renderer, options)?;
        Ok(out)
    }
}
