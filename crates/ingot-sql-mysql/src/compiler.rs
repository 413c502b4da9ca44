//! MySQL compiler and renderer.

use ingot_sql_core::alias::AliasRegistry;
use ingot_sql_core::compile::{
    render_filter, render_joins, render_list, subject, CompileOptions, Compiler, ExprRenderer,
    StandardCompiler,
};
use ingot_sql_core::error::Result;
use ingot_sql_core::expr::leaf::{ColumnExpr, TableExpr};
use ingot_sql_core::expr::subquery::SubqueryExpr;
use ingot_sql_core::expr::Expression;
use ingot_sql_core::position::{Position, PositionMap, StatementKind};

/// MySQL compilation backend.
///
/// Substitutes [`MySqlRenderer`] for whatever renderer it is handed, so
/// identifier quoting reaches every node. SELECT keeps the standard
/// clause skeleton; INSERT, UPDATE, and DELETE quote their target table
/// and DELETE switches to the multi-table form when joins are present.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlCompiler;

impl MySqlCompiler {
    /// Creates the MySQL compiler.
    #[must_use]
    pub const fn new() -> Self {
        Self
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
        push_identifier(out, table);
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
        push_identifier(out, table);
        if let Some(alias) = aliases.subject_alias() {
            out.push_str(" AS ");
            push_identifier(out, alias);
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
        out.push_str("DELETE ");
        if positions.contains(Position::Join) {
            // Multi-table form: the target alias goes before FROM.
            if let Some(alias) = aliases.subject_alias() {
                push_identifier(out, alias);
                out.push(' ');
            }
            out.push_str("FROM ");
            push_identifier(out, table);
            if let Some(alias) = aliases.subject_alias() {
                out.push_str(" AS ");
                push_identifier(out, alias);
            }
            render_joins(out, positions, renderer, options)?;
        } else {
            out.push_str("FROM ");
            push_identifier(out, table);
        }
        render_filter(out, positions, Position::Where, " WHERE ", renderer, options)?;
        Ok(())
    }
}

impl Compiler for MySqlCompiler {
    fn compile_into(
        &self,
        out: &mut String,
        kind: StatementKind,
        positions: &PositionMap,
        aliases: &AliasRegistry,
        _renderer: &dyn ExprRenderer,
        options: CompileOptions,
    ) -> Result<()> {
        let renderer = MySqlRenderer::new();
        let body = options.terminated(false);
        match kind {
            StatementKind::Select => {
                // Same clause skeleton as the standard compiler.
                StandardCompiler::new().compile_into(out, kind, positions, aliases, &renderer, body)?;
            }
            StatementKind::Insert => self.insert(out, positions, aliases, &renderer, body)?,
            StatementKind::Update => self.update(out, positions, aliases, &renderer, body)?,
            StatementKind::Delete => self.delete(out, positions, aliases, &renderer, body)?,
        }
        if options.terminate {
            out.push(';');
        }
        Ok(())
    }
}

/// Renderer that backtick-quotes column and table references.
///
/// Subqueries are intercepted too, so a nested SELECT is compiled by
/// [`MySqlCompiler`] rather than the standard one. Every other node
/// renders its own shape, recursing back through this renderer so
/// references stay quoted at any depth. Names the caller invents
/// directly, such as labels, CTE names, and derived-table aliases, pass
/// through verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlRenderer;

impl MySqlRenderer {
    /// Creates the MySQL renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ExprRenderer for MySqlRenderer {
    fn render_expr(
        &self,
        expr: &dyn Expression,
        out: &mut String,
        options: CompileOptions,
    ) -> Result<()> {
        if let Some(column) = expr.as_any().downcast_ref::<ColumnExpr>() {
            if let Some(source) = column.source() {
                push_identifier(out, source);
                out.push('.');
            }
            push_identifier(out, column.name());
            return Ok(());
        }
        if let Some(table) = expr.as_any().downcast_ref::<TableExpr>() {
            push_identifier(out, table.name());
            if let Some(alias) = table.alias() {
                out.push_str(" AS ");
                push_identifier(out, alias);
            }
            return Ok(());
        }
        if let Some(subquery) = expr.as_any().downcast_ref::<SubqueryExpr>() {
            let query = subquery.query();
            out.push('(');
            MySqlCompiler::new().compile_into(
                out,
                query.kind(),
                query.positions(),
                query.aliases(),
                self,
                options.terminated(false),
            )?;
            out.push(')');
            return Ok(());
        }
        expr.render(out, self, options)
    }
}

/// Appends `name` wrapped in backticks, doubling embedded backticks.
fn push_identifier(out: &mut String, name: &str) {
    out.push('`');
    out.push_str(&name.replace('`', "``"));
    out.push('`');
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingot_sql_core::{col, column, lit, raw, Delete, Insert, JoinKind, Select, Update};
    use ingot_sql_derive::Entity;

    fn sql(builder: &ingot_sql_core::StatementBuilder) -> String {
        builder
            .build(&MySqlCompiler::new(), CompileOptions::new())
            .unwrap()
    }

    #[allow(dead_code)]
    #[derive(Debug, Clone, Entity)]
    #[entity(table = "Person")]
    struct Person {
        id: i64,
        name: String,
    }

    #[test]
    fn test_select_quotes_identifiers() {
        let mut query = Select::new();
        query.from("Person").unwrap();
        query.column("P", "name").unwrap();
        assert_eq!(sql(&query), "SELECT `P`.`name` FROM `Person` AS `P`");
    }

    #[test]
    fn test_raw_fragments_and_labels_pass_through() {
        let mut query = Select::new();
        query.from("Person").unwrap();
        query.value(raw("COUNT(*)").named("n")).unwrap();
        assert_eq!(sql(&query), "SELECT COUNT(*) AS n FROM `Person` AS `P`");
    }

    #[test]
    fn test_insert_quotes_subject_and_columns() {
        let mut insert = Insert::new("Person").unwrap();
        insert.columns(&["name", "age"]).unwrap();
        insert.values([lit("Ada"), lit(36_i64)]).unwrap();
        assert_eq!(
            sql(&insert),
            "INSERT INTO `Person` (`name`, `age`) VALUES ('Ada', 36)"
        );
    }

    #[test]
    fn test_update_joins_between_table_and_set() {
        let mut update = Update::new("Person").unwrap();
        update
            .join(JoinKind::Inner)
            .unwrap()
            .table("Post")
            .unwrap()
            .on(|on| {
                on.and(column("P", "id").eq(column("P1", "author_id")));
            })
            .unwrap();
        update.set("checked", true).unwrap();
        assert_eq!(
            sql(&update),
            "UPDATE `Person` AS `P` INNER JOIN `Post` AS `P1` \
             ON `P`.`id` = `P1`.`author_id` SET `checked` = TRUE"
        );
    }

    #[test]
    fn test_delete_with_join_uses_multi_table_form() {
        let mut delete = Delete::new("Person").unwrap();
        delete
            .join(JoinKind::Inner)
            .unwrap()
            .table("Post")
            .unwrap()
            .on(|on| {
                on.and(column("P", "id").eq(column("P1", "author_id")));
            })
            .unwrap();
        delete
            .where_clause(|w| {
                w.and(column("P1", "flagged").eq(true));
            })
            .unwrap();
        assert_eq!(
            sql(&delete),
            "DELETE `P` FROM `Person` AS `P` INNER JOIN `Post` AS `P1` \
             ON `P`.`id` = `P1`.`author_id` WHERE `P1`.`flagged` = TRUE"
        );
    }

    #[test]
    fn test_delete_without_join_stays_single_table() {
        let mut delete = Delete::new("Person").unwrap();
        delete
            .where_clause(|w| {
                w.and(col("id").eq(7_i64));
            })
            .unwrap();
        assert_eq!(sql(&delete), "DELETE FROM `Person` WHERE `id` = 7");
    }

    #[test]
    fn test_subquery_compiles_through_dialect() {
        let mut authors = Select::new();
        authors.from_as("Post", "T").unwrap();
        authors.column("T", "author_id").unwrap();

        let mut query = Select::new();
        query.from("Person").unwrap();
        query
            .where_clause(|w| {
                w.and(col("id").in_select(&authors));
            })
            .unwrap();
        assert_eq!(
            sql(&query),
            "SELECT * FROM `Person` AS `P` \
             WHERE `id` IN (SELECT `T`.`author_id` FROM `Post` AS `T`)"
        );
    }

    #[test]
    fn test_entity_projection_is_quoted() {
        let mut query = Select::new();
        query.from_entity::<Person>().unwrap();
        query.columns_of::<Person>(&[]).unwrap();
        assert_eq!(sql(&query), "SELECT `P`.`id`, `P`.`name` FROM `Person` AS `P`");
    }

    #[test]
    fn test_entity_insert_keeps_placeholders_bare() {
        let mut insert = Insert::for_entity::<Person>().unwrap();
        insert.columns_of::<Person>(&[]).unwrap();
        insert.parameters_from::<Person>("", &[]).unwrap();
        assert_eq!(
            sql(&insert),
            "INSERT INTO `Person` (`id`, `name`) VALUES (:id, :name)"
        );
    }

    #[test]
    fn test_window_partition_keys_are_quoted() {
        let mut query = Select::new();
        query.from("Person").unwrap();
        query
            .over(raw("SUM(salary)"), |w| {
                w.partition_by(column("P", "dept"));
            })
            .unwrap();
        assert_eq!(
            sql(&query),
            "SELECT SUM(salary) OVER (PARTITION BY `P`.`dept`) FROM `Person` AS `P`"
        );
    }

    #[test]
    fn test_terminator_applies_once() {
        let mut query = Select::new();
        query.from("Person").unwrap();
        let rendered = query
            .build(&MySqlCompiler::new(), CompileOptions::new().terminated(true))
            .unwrap();
        assert_eq!(rendered, "SELECT * FROM `Person` AS `P`;");
    }

    #[test]
    fn test_identifier_escapes_backticks() {
        let mut out = String::new();
        push_identifier(&mut out, "weird`name");
        assert_eq!(out, "`weird``name`");
    }
}
