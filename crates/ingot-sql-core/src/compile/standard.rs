//! Standard SQL compiler.

use crate::alias::AliasRegistry;
use crate::error::{BuildError, Result};
use crate::position::{Position, PositionMap, StatementKind};

use super::{CompileOptions, Compiler, ExprRenderer};

/// The ANSI-flavored reference compiler.
///
/// Renders unquoted identifiers and standard clause order. Dialect
/// crates start from the same structure and override what their
/// database spells differently.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardCompiler;

impl StandardCompiler {
    /// Creates the standard compiler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn select(
        &self,
        out: &mut String,
        positions: &PositionMap,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        if positions.contains(Position::With) {
            out.push_str("WITH ");
            render_list(out, positions, Position::With, ", ", renderer, options)?;
            out.push(' ');
        }
        out.push_str("SELECT ");
        if positions.contains(Position::Columns) {
            render_list(out, positions, Position::Columns, ", ", renderer, options)?;
        } else {
            out.push('*');
        }
        if positions.contains(Position::From) {
            out.push_str(" FROM ");
            render_list(out, positions, Position::From, ", ", renderer, options)?;
        }
        render_joins(out, positions, renderer, options)?;
        render_filter(out, positions, Position::Where, " WHERE ", renderer, options)?;
        if positions.contains(Position::GroupBy) {
            out.push_str(" GROUP BY ");
            render_list(out, positions, Position::GroupBy, ", ", renderer, options)?;
        }
        render_filter(out, positions, Position::Having, " HAVING ", renderer, options)?;
        if positions.contains(Position::OrderBy) {
            out.push_str(" ORDER BY ");
            render_list(out, positions, Position::OrderBy, ", ", renderer, options)?;
        }
        Ok(())
    }

    fn insert(
        &self,
        out: &mut String,
        positions: &PositionMap,
        aliases: &AliasRegistry,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        let table = subject(aliases, StatementKind::Insert)?;
        out.push_str("INSERT INTO ");
        out.push_str(table);
        if positions.contains(Position::Columns) {
            out.push_str(" (");
            render_list(out, positions, Position::Columns, ", ", renderer, options)?;
            out.push(')');
        }
        if positions.contains(Position::Values) {
            out.push_str(" VALUES ");
            render_list(out, positions, Position::Values, ", ", renderer, options)?;
        }
        Ok(())
    }

    fn update(
        &self,
        out: &mut String,
        positions: &PositionMap,
        aliases: &AliasRegistry,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        let table = subject(aliases, StatementKind::Update)?;
        out.push_str("UPDATE ");
        out.push_str(table);
        if let Some(alias) = aliases.subject_alias() {
            out.push_str(" AS ");
            out.push_str(alias);
        }
        render_joins(out, positions, renderer, options)?;
        if positions.contains(Position::Set) {
            out.push_str(" SET ");
            render_list(out, positions, Position::Set, ", ", renderer, options)?;
        }
        render_filter(out, positions, Position::Where, " WHERE ", renderer, options)?;
        Ok(())
    }

    fn delete(
        &self,
        out: &mut String,
        positions: &PositionMap,
        aliases: &AliasRegistry,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        let table = subject(aliases, StatementKind::Delete)?;
        out.push_str("DELETE FROM ");
        out.push_str(table);
        // The subject alias only matters when other tables are in play.
        if positions.contains(Position::Join) {
            if let Some(alias) = aliases.subject_alias() {
                out.push_str(" AS ");
                out.push_str(alias);
            }
            render_joins(out, positions, renderer, options)?;
        }
        render_filter(out, positions, Position::Where, " WHERE ", renderer, options)?;
        Ok(())
    }
}

impl Compiler for StandardCompiler {
    fn compile_into(
        &self,
        out: &mut String,
        kind: StatementKind,
        positions: &PositionMap,
        aliases: &AliasRegistry,
        renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        match kind {
            StatementKind::Select => self.select(out, positions, renderer, options)?,
            StatementKind::Insert => self.insert(out, positions, aliases, renderer, options)?,
            StatementKind::Update => self.update(out, positions, aliases, renderer, options)?,
            StatementKind::Delete => self.delete(out, positions, aliases, renderer, options)?,
        }
        if options.terminate {
            out.push(';');
        }
        Ok(())
    }
}

/// Renders the entries of one position, order hints respected, joined
/// by `separator`.
///
/// Dialect compilers reuse this and the other clause helpers where
/// their spelling matches the standard one.
///
/// # Errors
///
/// Returns any error raised while rendering an entry.
pub fn render_list(
    out: &mut String,
    positions: &PositionMap,
    position: Position,
    separator: &str,
    renderer: &dyn ExprRenderer,
    options: CompileOptions,
) -> Result<()> {
    for (i, entry) in positions.in_order(position).iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        renderer.render_expr(entry.expr.as_ref(), out, options)?;
    }
    Ok(())
}

/// Renders a filter clause (WHERE/HAVING): multiple filed groups are
/// joined with `AND`.
///
/// # Errors
///
/// Returns any error raised while rendering a group.
pub fn render_filter(
    out: &mut String,
    positions: &PositionMap,
    position: Position,
    keyword: &str,
    renderer: &dyn ExprRenderer,
    options: CompileOptions,
) -> Result<()> {
    if !positions.contains(position) {
        return Ok(());
    }
    out.push_str(keyword);
    render_list(out, positions, position, " AND ", renderer, options)
}

/// Renders join clauses, space-separated, each with a leading space.
///
/// # Errors
///
/// Returns any error raised while rendering a join.
pub fn render_joins(
    out: &mut String,
    positions: &PositionMap,
    renderer: &dyn ExprRenderer,
    options: CompileOptions,
) -> Result<()> {
    for entry in positions.in_order(Position::Join) {
        out.push(' ');
        renderer.render_expr(entry.expr.as_ref(), out, options)?;
    }
    Ok(())
}

/// Returns the statement subject or the error for a subject-less
/// statement.
///
/// # Errors
///
/// Returns [`BuildError::InvalidArgument`] when no subject was
/// registered.
pub fn subject(aliases: &AliasRegistry, kind: StatementKind) -> Result<&str> {
    aliases
        .subject()
        .ok_or_else(|| BuildError::invalid(format!("{kind} statement has no target table")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Delete, Insert, Select, Update};
    use crate::expr::{col, column, lit};

    fn sql(builder: &crate::builder::StatementBuilder) -> String {
        builder
            .build(&StandardCompiler::new(), CompileOptions::new())
            .unwrap()
    }

    #[test]
    fn test_bare_select_renders_star() {
        let mut query = Select::new();
        query.from("Person").unwrap();
        assert_eq!(sql(&query), "SELECT * FROM Person AS P");
    }

    #[test]
    fn test_select_with_terminator() {
        let mut query = Select::new();
        query.from("Person").unwrap();
        let rendered = query
            .build(&StandardCompiler::new(), CompileOptions::new().terminated(true))
            .unwrap();
        assert_eq!(rendered, "SELECT * FROM Person AS P;");
    }

    #[test]
    fn test_select_full_clause_order() {
        let mut query = Select::new();
        query.from("Person").unwrap();
        query.column("P", "dept").unwrap();
        query.value(crate::expr::raw("COUNT(*)").named("headcount")).unwrap();
        query
            .where_clause(|w| {
                w.and(column("P", "age").ge(18_i64));
            })
            .unwrap();
        query.group_by(column("P", "dept")).unwrap();
        query
            .having(|h| {
                h.and(crate::expr::raw("COUNT(*)").gt(5_i64));
            })
            .unwrap();
        query.order_by(column("P", "dept")).unwrap();
        assert_eq!(
            sql(&query),
            "SELECT P.dept, COUNT(*) AS headcount FROM Person AS P \
             WHERE P.age >= 18 GROUP BY P.dept HAVING COUNT(*) > 5 ORDER BY P.dept"
        );
    }

    #[test]
    fn test_order_hint_reorders_columns() {
        let mut query = Select::new();
        query.from("Person").unwrap();
        query
            .expression(column("P", "name"), Position::Columns, 2)
            .unwrap();
        query
            .expression(column("P", "id"), Position::Columns, 1)
            .unwrap();
        assert_eq!(sql(&query), "SELECT P.id, P.name FROM Person AS P");
    }

    #[test]
    fn test_insert_columns_and_values() {
        let mut insert = Insert::new("Person").unwrap();
        insert.columns(&["name", "age"]).unwrap();
        insert.values(Vec::<i64>::new()).unwrap_err();
        insert.values([lit("Ada"), lit(36_i64)]).unwrap();
        assert_eq!(
            sql(&insert),
            "INSERT INTO Person (name, age) VALUES ('Ada', 36)"
        );
    }

    #[test]
    fn test_update_with_where() {
        let mut update = Update::new("Person").unwrap();
        update.set("name", "Grace").unwrap();
        update
            .where_clause(|w| {
                w.and(col("id").eq(7_i64));
            })
            .unwrap();
        assert_eq!(
            sql(&update),
            "UPDATE Person AS P SET name = 'Grace' WHERE id = 7"
        );
    }

    #[test]
    fn test_delete_without_join_has_no_alias() {
        let mut delete = Delete::new("Person").unwrap();
        delete
            .where_clause(|w| {
                w.and(col("id").eq(7_i64));
            })
            .unwrap();
        assert_eq!(sql(&delete), "DELETE FROM Person WHERE id = 7");
    }

    #[test]
    fn test_multiple_where_groups_join_with_and() {
        let mut query = Select::new();
        query.from("Person").unwrap();
        query
            .where_clause(|w| {
                w.and(col("a").eq(1_i64));
            })
            .unwrap();
        query
            .where_clause(|w| {
                w.and(col("b").eq(2_i64));
            })
            .unwrap();
        assert_eq!(sql(&query), "SELECT * FROM Person AS P WHERE a = 1 AND b = 2");
    }
}
