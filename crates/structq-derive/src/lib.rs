//! Derive macros for structq
//!
//! Provides `#[derive(Table)]`, `#[derive(Embed)]` and `#[derive(FromRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod from_row;
mod table;

/// Derive table mapping and a reference struct of column tokens.
///
/// # Example
///
/// ```ignore
/// use structq::{FromRow, Table};
///
/// #[derive(Table, FromRow)]
/// #[orm(table = "invoices", schema = "billing")]
/// pub struct Invoice {
///     pub id: i64,
///     #[orm(column = "note")]
///     pub memo: String,
///     #[orm(transient)]
///     pub person_name: Option<String>,
///     cached: bool,
/// }
///
/// let inv = Invoice::reference(); // InvoiceRef { id, memo, person_name }
/// ```
///
/// # Generated
///
/// - `{Name}Ref`: one `structq::Column` per mapped field
/// - `impl Fields`, `impl Table` and `impl Reference for {Name}Ref`
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (default: snake_case struct name)
/// - `#[orm(schema = "name")]` - Schema qualifier
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(transient)]` - Never selected or written unless a query computes it
/// - `#[orm(skip)]` - Not mapped at all (private fields are skipped too)
/// - `#[orm(embed)]` - Flatten the fields of a `#[derive(Embed)]` struct
#[proc_macro_derive(Table, attributes(orm))]
pub fn derive_table(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    table::expand_table(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive field mapping for a struct embedded in tables with `#[orm(embed)]`.
///
/// ```ignore
/// #[derive(Embed, FromRow, Default)]
/// pub struct Audit {
///     pub created_at: i64,
///     pub updated_at: i64,
/// }
/// ```
#[proc_macro_derive(Embed, attributes(orm))]
pub fn derive_embed(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    table::expand_embed(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `FromRow` trait for a struct.
///
/// Uses the same `#[orm(...)]` field attributes as `Table`. Mapped columns
/// the row does not contain (left out by `fields`, or transient and not
/// computed) decode to `Default`, so their types must implement `Default`.
/// Private and skipped fields always use `Default`.
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
