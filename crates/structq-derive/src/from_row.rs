//! FromRow derive macro implementation

use crate::attrs::{FieldKind, fields};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let field_extracts: Vec<_> = fields(&input, "FromRow")?
        .into_iter()
        .map(|field| {
            let ident = field.ident;
            let ty = field.ty;
            match field.kind {
                // Columns left out of the select list keep their default.
                FieldKind::Column { column, .. } => {
                    quote! { #ident: row.try_get_column_or_default(#column)? }
                }
                FieldKind::Embed => {
                    quote! { #ident: <#ty as structq::FromRow>::from_row(row)? }
                }
                FieldKind::Unmapped => quote! { #ident: ::core::default::Default::default() },
            }
        })
        .collect();

    Ok(quote! {
        impl structq::FromRow for #name {
            fn from_row(row: &structq::tokio_postgres::Row) -> structq::OrmResult<Self> {
                #[allow(unused_imports)]
                use structq::RowExt;
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
