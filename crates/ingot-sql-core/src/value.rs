//! Owned SQL scalar values.
//!
//! A [`SqlValue`] leaves a statement by one of two routes: inline, through
//! [`lit`](crate::expr::lit) and the literal node, escaped into the SQL
//! text; or out of band, through a [`Parameters`](crate::params::Parameters)
//! bag keyed by placeholder name. Inline rendering is for trusted and
//! test-owned data; anything caller-supplied belongs in the bag.

/// An owned SQL scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Absence of a value, rendered `NULL`.
    Null,
    /// Truth value, rendered `TRUE`/`FALSE`.
    Bool(bool),
    /// Signed integer; the narrower integer types widen into this.
    Int(i64),
    /// Floating-point number; `f32` widens into this.
    Float(f64),
    /// Character data, single-quoted when rendered.
    Text(String),
    /// Raw bytes, rendered as a hex literal.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Renders the value as inline SQL text.
    ///
    /// Text doubles embedded single quotes; blobs become `X'..'` hex
    /// literals. Keep caller-supplied data out of inline rendering and in
    /// a [`Parameters`](crate::params::Parameters) bag instead.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(true) => String::from("TRUE"),
            Self::Bool(false) => String::from("FALSE"),
            Self::Int(n) => n.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Text(text) => format!("'{}'", text.replace('\'', "''")),
            Self::Blob(bytes) => {
                let mut out = String::with_capacity(3 + bytes.len() * 2);
                out.push_str("X'");
                for byte in bytes {
                    out.push_str(&format!("{byte:02X}"));
                }
                out.push('\'');
                out
            }
        }
    }
}

/// Conversion into an owned [`SqlValue`].
///
/// Implemented for the scalars a statement can carry, so builder surfaces
/// and the [`Parameters`](crate::params::Parameters) bag accept plain Rust
/// values directly.
pub trait ToSqlValue {
    /// Converts `self` into an owned value.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

macro_rules! impl_to_sql_value_widening {
    ($variant:ident as $wide:ty: $($ty:ty),+ $(,)?) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::$variant(<$wide>::from(self))
                }
            }
        )+
    };
}

impl_to_sql_value_widening!(Int as i64: i32, i16, i8, u32, u16, u8);
impl_to_sql_value_widening!(Float as f64: f32);

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{CompileOptions, DefaultRenderer};
    use crate::expr::lit;

    fn rendered(value: impl ToSqlValue) -> String {
        lit(value)
            .render(&DefaultRenderer, CompileOptions::new())
            .unwrap()
    }

    #[test]
    fn test_literals_render_inline() {
        assert_eq!(rendered(SqlValue::Null), "NULL");
        assert_eq!(rendered(true), "TRUE");
        assert_eq!(rendered(false), "FALSE");
        assert_eq!(rendered(42_i64), "42");
        assert_eq!(rendered(-100_i64), "-100");
        assert_eq!(rendered(2.5_f64), "2.5");
    }

    #[test]
    fn test_text_doubles_embedded_quotes() {
        assert_eq!(rendered("O'Brien"), "'O''Brien'");
        // A quote-laden value cannot close the quoted region early.
        assert_eq!(
            rendered("'; DROP TABLE Person; --"),
            "'''; DROP TABLE Person; --'"
        );
    }

    #[test]
    fn test_blob_renders_as_hex() {
        assert_eq!(rendered(vec![0xCA_u8, 0xFE, 0x00]), "X'CAFE00'");
    }

    #[test]
    fn test_narrow_scalars_widen() {
        assert_eq!(7_i8.to_sql_value(), SqlValue::Int(7));
        assert_eq!(7_i16.to_sql_value(), SqlValue::Int(7));
        assert_eq!(7_u32.to_sql_value(), SqlValue::Int(7));
        assert_eq!(0.5_f32.to_sql_value(), SqlValue::Float(0.5));
    }

    #[test]
    fn test_option_maps_none_to_null() {
        assert_eq!(None::<&str>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some(3_i64).to_sql_value(), SqlValue::Int(3));
    }
}
