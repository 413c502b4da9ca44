//! Clause positions and the per-statement expression map.
//!
//! Every expression filed into a builder is tagged with the clause
//! [`Position`] it belongs to. The [`PositionMap`] keeps one append-only
//! list per position; rendering order within a clause is decided by the
//! compiler, not by this module.

use std::collections::BTreeMap;
use std::fmt;

use crate::expr::ExprRef;

/// A clause slot an expression can be filed under.
///
/// The set is closed: compilers can rely on matches over `Position`
/// being exhaustive. Variants are declared in standard clause order so
/// ordered iteration over a [`PositionMap`] walks a statement
/// front-to-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    /// Common table expressions (`WITH ...`).
    With,
    /// Projected columns of a SELECT, or the column list of an INSERT.
    Columns,
    /// Source tables (`FROM ...`).
    From,
    /// Join clauses.
    Join,
    /// Row filters (`WHERE ...`).
    Where,
    /// Grouping keys (`GROUP BY ...`).
    GroupBy,
    /// Group filters (`HAVING ...`).
    Having,
    /// Sort keys (`ORDER BY ...`).
    OrderBy,
    /// Assignments of an UPDATE (`SET ...`).
    Set,
    /// Value rows of an INSERT (`VALUES ...`).
    Values,
}

impl Position {
    /// Returns the clause keyword for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::With => "WITH",
            Self::Columns => "COLUMNS",
            Self::From => "FROM",
            Self::Join => "JOIN",
            Self::Where => "WHERE",
            Self::GroupBy => "GROUP BY",
            Self::Having => "HAVING",
            Self::OrderBy => "ORDER BY",
            Self::Set => "SET",
            Self::Values => "VALUES",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four statement shapes a builder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `SELECT` query.
    Select,
    /// `INSERT` statement.
    Insert,
    /// `UPDATE` statement.
    Update,
    /// `DELETE` statement.
    Delete,
}

impl StatementKind {
    /// Returns the statement keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    /// Returns the clause positions legal for this statement kind.
    ///
    /// INSERT, UPDATE, and DELETE carry no table position; their target
    /// table is the first entity registered in the alias registry.
    #[must_use]
    pub const fn positions(self) -> &'static [Position] {
        match self {
            Self::Select => &[
                Position::With,
                Position::Columns,
                Position::From,
                Position::Join,
                Position::Where,
                Position::GroupBy,
                Position::Having,
                Position::OrderBy,
            ],
            Self::Insert => &[Position::Columns, Position::Values],
            Self::Update => &[Position::Join, Position::Where, Position::Set],
            Self::Delete => &[Position::Join, Position::Where],
        }
    }

    /// Returns `true` if expressions may be filed under `position`.
    #[must_use]
    pub fn supports(self, position: Position) -> bool {
        self.positions().contains(&position)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expression paired with its caller-supplied order hint.
///
/// The hint breaks ties within one position when a compiler renders the
/// clause; filing order is preserved between equal hints.
#[derive(Debug, Clone)]
pub struct OrderedExpr {
    /// The expression node.
    pub expr: ExprRef,
    /// Relative order within the clause. Defaults to zero.
    pub order: i32,
}

impl OrderedExpr {
    /// Pairs an expression with an order hint.
    #[must_use]
    pub const fn new(expr: ExprRef, order: i32) -> Self {
        Self { expr, order }
    }
}

/// Append-only multimap from clause position to filed expressions.
#[derive(Debug, Clone, Default)]
pub struct PositionMap {
    slots: BTreeMap<Position, Vec<OrderedExpr>>,
}

impl PositionMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Appends an entry under `position`, preserving filing order.
    pub(crate) fn push(&mut self, position: Position, entry: OrderedExpr) {
        self.slots.entry(position).or_default().push(entry);
    }

    /// Returns the entries filed under `position`, in filing order.
    #[must_use]
    pub fn get(&self, position: Position) -> &[OrderedExpr] {
        self.slots.get(&position).map_or(&[], Vec::as_slice)
    }

    /// Returns the entries under `position` sorted by order hint.
    ///
    /// The sort is stable, so entries sharing a hint keep filing order.
    #[must_use]
    pub fn in_order(&self, position: Position) -> Vec<&OrderedExpr> {
        let mut entries: Vec<&OrderedExpr> = self.get(position).iter().collect();
        entries.sort_by_key(|entry| entry.order);
        entries
    }

    /// Returns `true` if anything is filed under `position`.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.slots
            .get(&position)
            .is_some_and(|entries| !entries.is_empty())
    }

    /// Iterates occupied positions in clause order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &[OrderedExpr])> {
        self.slots
            .iter()
            .map(|(position, entries)| (*position, entries.as_slice()))
    }

    /// Returns the total number of filed expressions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Returns `true` if no expressions are filed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::raw;

    #[test]
    fn test_kind_positions() {
        assert!(StatementKind::Select.supports(Position::GroupBy));
        assert!(!StatementKind::Select.supports(Position::Set));
        assert!(StatementKind::Insert.supports(Position::Values));
        assert!(!StatementKind::Insert.supports(Position::Where));
        assert!(StatementKind::Update.supports(Position::Join));
        assert!(!StatementKind::Delete.supports(Position::Columns));
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(Position::GroupBy.to_string(), "GROUP BY");
        assert_eq!(StatementKind::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_push_preserves_filing_order() {
        let mut map = PositionMap::new();
        map.push(Position::Columns, OrderedExpr::new(raw("a").into_ref(), 0));
        map.push(Position::Columns, OrderedExpr::new(raw("b").into_ref(), 0));

        let entries = map.get(Position::Columns);
        assert_eq!(entries.len(), 2);
        assert_eq!(map.len(), 2);
        assert!(map.contains(Position::Columns));
        assert!(!map.contains(Position::Where));
    }

    #[test]
    fn test_in_order_is_stable() {
        let mut map = PositionMap::new();
        map.push(Position::Columns, OrderedExpr::new(raw("c").into_ref(), 5));
        map.push(Position::Columns, OrderedExpr::new(raw("a").into_ref(), 0));
        map.push(Position::Columns, OrderedExpr::new(raw("b").into_ref(), 0));

        let hints: Vec<i32> = map
            .in_order(Position::Columns)
            .iter()
            .map(|entry| entry.order)
            .collect();
        assert_eq!(hints, vec![0, 0, 5]);
        // Raw storage keeps filing order untouched.
        assert_eq!(map.get(Position::Columns)[0].order, 5);
    }

    #[test]
    fn test_iter_walks_clause_order() {
        let mut map = PositionMap::new();
        map.push(Position::Where, OrderedExpr::new(raw("w").into_ref(), 0));
        map.push(Position::Columns, OrderedExpr::new(raw("c").into_ref(), 0));

        let positions: Vec<Position> = map.iter().map(|(position, _)| position).collect();
        assert_eq!(positions, vec![Position::Columns, Position::Where]);
    }
}
