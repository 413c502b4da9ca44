//! Schema traits for entity-aware statement building.
//!
//! These traits are implemented by the `#[derive(Entity)]` macro from
//! `ingot-sql-derive` and let builders derive column lists, aliases, and
//! parameter sets from plain structs.

use crate::value::SqlValue;

/// Trait for entity metadata.
///
/// An entity maps a struct to a table: its name and its column names.
/// Builders use it to expand column lists and to register aliases.
pub trait Entity {
    /// The SQL table name.
    const NAME: &'static str;

    /// List of all column names, in declaration order.
    const COLUMNS: &'static [&'static str];
}

/// Trait for entities whose instances can supply column values.
///
/// Implemented alongside [`Entity`] by the derive macro. Used by
/// `values_using` and `set_using` to pair each column with the value
/// held by a concrete instance.
pub trait Record: Entity {
    /// Returns `(column, value)` pairs in column declaration order.
    fn values(&self) -> Vec<(&'static str, SqlValue)>;
}
