//! Build-time instrumentation hooks.
//!
//! Hooks observe a builder as it accumulates structure and as it hands
//! that structure to a compiler. A hook returning an error aborts the
//! triggering operation; remaining hooks are skipped.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::alias::AliasRegistry;
use crate::compile::CompileOptions;
use crate::error::Result;
use crate::expr::ExprRef;
use crate::position::{Position, PositionMap, StatementKind};

/// Event fired after an expression is filed into a position.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionAdded<'a> {
    /// The position the expression was filed under.
    pub position: Position,
    /// The caller-supplied order hint.
    pub order: i32,
    /// The filed expression.
    pub expr: &'a ExprRef,
}

/// Event fired before a builder hands its structure to a compiler.
#[derive(Debug, Clone, Copy)]
pub struct Compiling<'a> {
    /// The statement kind being compiled.
    pub kind: StatementKind,
    /// The accumulated position map.
    pub positions: &'a PositionMap,
    /// The accumulated alias registry.
    pub aliases: &'a AliasRegistry,
    /// The options for this compilation pass.
    pub options: CompileOptions,
}

/// Callback for [`ExpressionAdded`] events.
pub type ExpressionAddedHook = Arc<dyn Fn(&ExpressionAdded<'_>) -> Result<()> + Send + Sync>;

/// Callback for [`Compiling`] events.
pub type CompilingHook = Arc<dyn Fn(&Compiling<'_>) -> Result<()> + Send + Sync>;

/// Hook registrations for one builder.
///
/// Cloned together with the builder; both copies then share the same
/// callback instances.
#[derive(Clone, Default)]
pub(crate) struct Hooks {
    added: Vec<ExpressionAddedHook>,
    added_at: BTreeMap<Position, Vec<ExpressionAddedHook>>,
    compiling: Vec<CompilingHook>,
}

impl Hooks {
    pub(crate) fn on_added(&mut self, hook: ExpressionAddedHook) {
        self.added.push(hook);
    }

    pub(crate) fn on_added_at(&mut self, position: Position, hook: ExpressionAddedHook) {
        self.added_at.entry(position).or_default().push(hook);
    }

    pub(crate) fn on_compiling(&mut self, hook: CompilingHook) {
        self.compiling.push(hook);
    }

    /// Fires position-scoped hooks first, then global ones, each in
    /// registration order. Stops at the first error.
    pub(crate) fn notify_added(&self, event: &ExpressionAdded<'_>) -> Result<()> {
        if let Some(scoped) = self.added_at.get(&event.position) {
            for hook in scoped {
                hook(event)?;
            }
        }
        for hook in &self.added {
            hook(event)?;
        }
        Ok(())
    }

    /// Fires compiling hooks in registration order, stopping at the
    /// first error.
    pub(crate) fn notify_compiling(&self, event: &Compiling<'_>) -> Result<()> {
        for hook in &self.compiling {
            hook(event)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scoped: usize = self.added_at.values().map(Vec::len).sum();
        f.debug_struct("Hooks")
            .field("expression_added", &self.added.len())
            .field("expression_added_scoped", &scoped)
            .field("compiling", &self.compiling.len())
            .finish()
    }
}
