//! Fluent statement builders.
//!
//! Each statement kind gets a thin wrapper ([`Select`], [`Insert`],
//! [`Update`], [`Delete`]) over the shared [`StatementBuilder`], which
//! owns the position map, the alias registry, and the hooks. Wrappers
//! deref to the shared core, so kind-specific and shared methods mix
//! freely.
//!
//! Builders are mutable accumulators: methods take `&mut self` and
//! return `Result<&mut Self>` for `?`-chaining. Cloning a builder forks
//! an independent statement; already-filed expression nodes stay shared.
//!
//! # Example
//!
//! ```rust
//! use ingot_sql_core::{column, CompileOptions, Select, StandardCompiler};
//!
//! let mut query = Select::new();
//! query.from("Person")?;
//! query.column("P", "name")?;
//! query.where_clause(|w| {
//!     w.and(column("P", "age").ge(18_i64));
//! })?;
//!
//! let sql = query.build(&StandardCompiler::new(), CompileOptions::new())?;
//! assert_eq!(sql, "SELECT P.name FROM Person AS P WHERE P.age >= 18");
//! # Ok::<(), ingot_sql_core::BuildError>(())
//! ```

mod delete;
mod insert;
mod select;
mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use update::Update;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::alias::AliasRegistry;
use crate::compile::{CompileOptions, Compiler, DefaultRenderer};
use crate::error::{BuildError, Result};
use crate::expr::condition::ConditionBuilder;
use crate::expr::join::{JoinExpr, JoinKind, JoinTarget};
use crate::expr::leaf::TableExpr;
use crate::expr::subquery::SubqueryExpr;
use crate::expr::{ExprRef, IntoExpr};
use crate::hooks::{Compiling, ExpressionAdded, Hooks};
use crate::position::{OrderedExpr, Position, PositionMap, StatementKind};
use crate::schema::Entity;

/// Shared accumulator behind every statement builder.
///
/// Owns the statement kind, the position map, the alias registry, and
/// the registered hooks. Kind-specific wrappers deref to this type.
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    kind: StatementKind,
    positions: PositionMap,
    aliases: AliasRegistry,
    hooks: Hooks,
}

impl StatementBuilder {
    pub(crate) fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            positions: PositionMap::new(),
            aliases: AliasRegistry::new(),
            hooks: Hooks::default(),
        }
    }

    /// Returns the statement kind.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Returns the accumulated position map.
    #[must_use]
    pub const fn positions(&self) -> &PositionMap {
        &self.positions
    }

    /// Returns the accumulated alias registry.
    #[must_use]
    pub const fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    /// Files an expression under a clause position.
    ///
    /// The `order` hint breaks ties within the position when the clause
    /// is rendered; equal hints keep filing order. Fires
    /// expression-added hooks after filing.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnsupportedPosition`] if this statement
    /// kind does not carry `position`, or the first error raised by a
    /// hook.
    pub fn expression(
        &mut self,
        node: impl IntoExpr,
        position: Position,
        order: i32,
    ) -> Result<&mut Self> {
        if !self.kind.supports(position) {
            return Err(BuildError::UnsupportedPosition {
                kind: self.kind,
                position,
            });
        }
        let expr = node.into_expr();
        self.positions
            .push(position, OrderedExpr::new(Arc::clone(&expr), order));
        trace!(kind = %self.kind, %position, order, "expression filed");
        let event = ExpressionAdded {
            position,
            order,
            expr: &expr,
        };
        self.hooks.notify_added(&event)?;
        Ok(self)
    }

    /// Adds a WHERE condition group built inside the closure.
    ///
    /// A closure that adds nothing files nothing; the statement is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnsupportedPosition`] for statement kinds
    /// without a WHERE clause (INSERT), or a hook error.
    pub fn where_clause(&mut self, f: impl FnOnce(&mut ConditionBuilder)) -> Result<&mut Self> {
        if !self.kind.supports(Position::Where) {
            return Err(BuildError::UnsupportedPosition {
                kind: self.kind,
                position: Position::Where,
            });
        }
        let mut builder = ConditionBuilder::new();
        f(&mut builder);
        if let Some(group) = builder.into_group(false) {
            self.expression(Arc::new(group) as ExprRef, Position::Where, 0)?;
        }
        Ok(self)
    }

    /// Starts a join clause.
    ///
    /// The returned [`JoinBuilder`] mutably borrows this builder; the
    /// join is filed when it is completed with [`JoinBuilder::on`] or
    /// [`JoinBuilder::finish`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnsupportedPosition`] for statement kinds
    /// without a join clause (INSERT).
    pub fn join(&mut self, kind: JoinKind) -> Result<JoinBuilder<'_>> {
        if !self.kind.supports(Position::Join) {
            return Err(BuildError::UnsupportedPosition {
                kind: self.kind,
                position: Position::Join,
            });
        }
        Ok(JoinBuilder {
            owner: self,
            kind,
            target: None,
        })
    }

    /// Returns the alias for `entity`, assigning one if needed.
    ///
    /// Idempotent: repeated calls for one entity return the same alias.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`] if `entity` is blank.
    pub fn alias(&mut self, entity: &str) -> Result<String> {
        self.aliases.resolve(entity)
    }

    /// Returns the alias for an entity type, assigning one if needed.
    ///
    /// # Errors
    ///
    /// Same as [`StatementBuilder::alias`].
    pub fn alias_of<E: Entity>(&mut self) -> Result<String> {
        self.aliases.resolve(E::NAME)
    }

    /// Forces a specific alias for `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`] if the alias is taken or
    /// the entity already carries a different one.
    pub fn alias_as(&mut self, entity: &str, alias: &str) -> Result<&mut Self> {
        self.aliases.assign(entity, alias)?;
        Ok(self)
    }

    /// Resolves an alias and writes it into `slot`, for use mid-chain.
    ///
    /// # Errors
    ///
    /// Same as [`StatementBuilder::alias`].
    pub fn alias_into(&mut self, entity: &str, slot: &mut String) -> Result<&mut Self> {
        *slot = self.aliases.resolve(entity)?;
        Ok(self)
    }

    /// Registers a hook fired after every expression is filed.
    pub fn on_expression_added<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&ExpressionAdded<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.on_added(Arc::new(hook));
        self
    }

    /// Registers a hook fired only for expressions filed under
    /// `position`. Scoped hooks fire before global ones.
    pub fn on_expression_added_at<F>(&mut self, position: Position, hook: F) -> &mut Self
    where
        F: Fn(&ExpressionAdded<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.on_added_at(position, Arc::new(hook));
        self
    }

    /// Registers a hook fired before each compilation pass.
    pub fn on_compiling<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Compiling<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.on_compiling(Arc::new(hook));
        self
    }

    /// Compiles the statement with the given compiler.
    ///
    /// The builder is not consumed; it can be compiled again, with the
    /// same or another compiler.
    ///
    /// # Errors
    ///
    /// Returns a hook error or any error raised by the compiler.
    pub fn build(&self, compiler: &dyn Compiler, options: CompileOptions) -> Result<String> {
        let mut out = String::new();
        self.build_into(&mut out, compiler, options)?;
        Ok(out)
    }

    /// Compiles the statement into an existing buffer.
    ///
    /// # Errors
    ///
    /// Same as [`StatementBuilder::build`].
    pub fn build_into(
        &self,
        out: &mut String,
        compiler: &dyn Compiler,
        options: CompileOptions,
    ) -> Result<()> {
        let event = Compiling {
            kind: self.kind,
            positions: &self.positions,
            aliases: &self.aliases,
            options,
        };
        self.hooks.notify_compiling(&event)?;
        debug!(kind = %self.kind, expressions = self.positions.len(), "compiling statement");
        compiler.compile_into(
            out,
            self.kind,
            &self.positions,
            &self.aliases,
            &DefaultRenderer,
            options,
        )
    }
}

/// An in-progress join clause, mutably borrowing its statement.
///
/// Pick a target with [`table`](JoinBuilder::table),
/// [`table_as`](JoinBuilder::table_as), [`entity`](JoinBuilder::entity),
/// or [`subquery`](JoinBuilder::subquery), then complete with
/// [`on`](JoinBuilder::on) (or [`finish`](JoinBuilder::finish) for a
/// cross join). Nothing is filed until completion.
#[must_use = "a join files nothing until completed with `on` or `finish`"]
#[derive(Debug)]
pub struct JoinBuilder<'a> {
    owner: &'a mut StatementBuilder,
    kind: JoinKind,
    target: Option<JoinTarget>,
}

impl<'a> JoinBuilder<'a> {
    /// Joins a table, auto-assigning its alias.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`] if `name` is blank.
    pub fn table(mut self, name: &str) -> Result<Self> {
        let alias = self.owner.aliases.resolve(name)?;
        self.target = Some(JoinTarget::Table {
            table: Arc::new(TableExpr::new(name, Some(alias))),
        });
        Ok(self)
    }

    /// Joins a table under a forced alias.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`] if the alias is taken or
    /// the table already carries a different one.
    pub fn table_as(mut self, name: &str, alias: &str) -> Result<Self> {
        self.owner.aliases.assign(name, alias)?;
        self.target = Some(JoinTarget::Table {
            table: Arc::new(TableExpr::new(name, Some(String::from(alias)))),
        });
        Ok(self)
    }

    /// Joins an entity's table, auto-assigning its alias.
    ///
    /// # Errors
    ///
    /// Same as [`JoinBuilder::table`].
    pub fn entity<E: Entity>(self) -> Result<Self> {
        self.table(E::NAME)
    }

    /// Joins a derived table, snapshotting `query` as it is now.
    ///
    /// The alias is registered so later auto-assignments avoid it.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidArgument`] if `alias` is blank or
    /// taken.
    pub fn subquery(mut self, query: &Select, alias: &str) -> Result<Self> {
        self.owner.aliases.assign(alias, alias)?;
        self.target = Some(JoinTarget::Subquery {
            query: Arc::new(SubqueryExpr::snapshot(query)),
            alias: String::from(alias),
        });
        Ok(self)
    }

    /// Completes the join with an ON condition group and files it.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingOnCondition`] if the closure adds no
    /// conditions to a join that requires them, and
    /// [`BuildError::InvalidArgument`] for a cross join given
    /// conditions or a join without a target.
    pub fn on(self, f: impl FnOnce(&mut ConditionBuilder)) -> Result<&'a mut StatementBuilder> {
        let mut builder = ConditionBuilder::new();
        f(&mut builder);
        let condition = builder.into_group(false).map(|group| Arc::new(group) as ExprRef);
        self.file(condition)
    }

    /// Completes a join that carries no ON condition and files it.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingOnCondition`] unless the join is a
    /// cross join, and [`BuildError::InvalidArgument`] for a join
    /// without a target.
    pub fn finish(self) -> Result<&'a mut StatementBuilder> {
        self.file(None)
    }

    fn file(self, condition: Option<ExprRef>) -> Result<&'a mut StatementBuilder> {
        let target = self
            .target
            .ok_or_else(|| BuildError::invalid("join requires a target table or subquery"))?;
        let join = JoinExpr::new(self.kind, target, condition)?;
        self.owner.expression(Arc::new(join) as ExprRef, Position::Join, 0)?;
        Ok(self.owner)
    }
}
