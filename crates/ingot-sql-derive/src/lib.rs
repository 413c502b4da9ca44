//! Derive macros for entity-aware SQL statement building.
//!
//! This crate provides the `#[derive(Entity)]` macro, which maps a plain
//! struct to a table so builders can expand column lists and parameter
//! sets from it.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Ident, Lit, Meta};

/// Derives the `Entity` and `Record` traits for a struct.
///
/// # Attributes
///
/// - `#[entity(table = "table_name")]` - Specifies the SQL table name
///   (optional, defaults to snake_case of the struct name)
///
/// # Field Attributes
///
/// - `#[column(name = "column_name")]` - Specifies the SQL column name
///   (optional, defaults to the field name)
/// - `#[column(skip)]` - Excludes the field from the column list and
///   from `Record::values`
///
/// Every non-skipped field must be `Clone` and convertible through
/// `ToSqlValue`.
///
/// # Example
///
/// ```rust
/// use ingot_sql_derive::Entity;
///
/// #[derive(Entity)]
/// #[entity(table = "Person")]
/// struct Person {
///     id: i64,
///     name: String,
///     #[column(skip)]
///     cached_display: String,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(entity, column))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_entity_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_entity_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let table_name = get_table_name(&input.attrs, struct_name)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity derive only supports structs",
            ));
        }
    };

    // Collect field information, dropping skipped fields
    let mut column_infos: Vec<ColumnInfo> = Vec::new();
    for field in fields {
        let field_name = field.ident.as_ref().unwrap();
        let column_attrs = parse_column_attrs(&field.attrs)?;
        if column_attrs.skip {
            continue;
        }
        column_infos.push(ColumnInfo {
            field_name: field_name.clone(),
            column_name: column_attrs.name.unwrap_or_else(|| field_name.to_string()),
        });
    }

    let all_column_names: Vec<&str> = column_infos
        .iter()
        .map(|c| c.column_name.as_str())
        .collect();

    let value_entries: Vec<TokenStream2> = column_infos
        .iter()
        .map(|info| {
            let column_name = &info.column_name;
            let field_name = &info.field_name;
            quote! {
                (
                    #column_name,
                    ::ingot_sql_core::value::ToSqlValue::to_sql_value(
                        ::std::clone::Clone::clone(&self.#field_name),
                    ),
                )
            }
        })
        .collect();

    let expanded = quote! {
        impl ::ingot_sql_core::schema::Entity for #struct_name {
            const NAME: &'static str = #table_name;
            const COLUMNS: &'static [&'static str] = &[#(#all_column_names),*];
        }

        impl ::ingot_sql_core::schema::Record for #struct_name {
            fn values(
                &self,
            ) -> ::std::vec::Vec<(&'static str, ::ingot_sql_core::value::SqlValue)> {
                ::std::vec![
                    #(#value_entries),*
                ]
            }
        }
    };

    Ok(expanded)
}

struct ColumnInfo {
    field_name: Ident,
    column_name: String,
}

struct ColumnAttrs {
    name: Option<String>,
    skip: bool,
}

fn get_table_name(attrs: &[Attribute], struct_name: &Ident) -> syn::Result<String> {
    for attr in attrs {
        if attr.path().is_ident("entity") {
            let mut table_name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    let value: Expr = meta.value()?.parse()?;
                    if let Expr::Lit(lit) = value {
                        if let Lit::Str(s) = lit.lit {
                            table_name = Some(s.value());
                        }
                    }
                }
                Ok(())
            })?;
            if let Some(name) = table_name {
                return Ok(name);
            }
        }
    }
    // Default to snake_case of struct name
    Ok(to_snake_case(&struct_name.to_string()))
}

fn parse_column_attrs(attrs: &[Attribute]) -> syn::Result<ColumnAttrs> {
    let mut result = ColumnAttrs {
        name: None,
        skip: false,
    };

    for attr in attrs {
        if attr.path().is_ident("column") {
            // Handle empty attribute like #[column]
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    result.skip = true;
                } else if meta.path.is_ident("name") {
                    let value: Expr = meta.value()?.parse()?;
                    if let Expr::Lit(lit) = value {
                        if let Lit::Str(s) = lit.lit {
                            result.name = Some(s.value());
                        }
                    }
                }
                Ok(())
            })?;
        }
    }

    Ok(result)
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
