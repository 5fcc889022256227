//! `#[orm(...)]` attribute parsing.
//!
//! Struct level: `table = "..."`, `schema = "..."`.
//! Field level: `column = "..."`, `transient`, `skip`, `embed`.

use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Data, DeriveInput, Fields, Result, Token};

#[derive(Default)]
pub(crate) struct StructAttr {
    pub table: Option<String>,
    pub schema: Option<String>,
}

impl Parse for StructAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = StructAttr::default();
        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            let _: Token![=] = input.parse()?;
            let value: syn::LitStr = input.parse()?;
            if key == "table" {
                attr.table = Some(value.value());
            } else if key == "schema" {
                attr.schema = Some(value.value());
            } else {
                return Err(syn::Error::new_spanned(
                    key,
                    "expected `table = \"...\"` or `schema = \"...\"`",
                ));
            }
            if !input.is_empty() {
                let _: Token![,] = input.parse()?;
            }
        }
        Ok(attr)
    }
}

#[derive(Default)]
pub(crate) struct FieldAttr {
    pub column: Option<String>,
    pub transient: bool,
    pub skip: bool,
    pub embed: bool,
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();
        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            if key == "column" {
                let _: Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attr.column = Some(value.value());
            } else if key == "transient" {
                attr.transient = true;
            } else if key == "skip" {
                attr.skip = true;
            } else if key == "embed" {
                attr.embed = true;
            } else {
                return Err(syn::Error::new_spanned(
                    key,
                    "expected `column = \"...\"`, `transient`, `skip` or `embed`",
                ));
            }
            if !input.is_empty() {
                let _: Token![,] = input.parse()?;
            }
        }
        Ok(attr)
    }
}

fn merge_orm_attrs<T: Parse>(attrs: &[Attribute], mut merge: impl FnMut(T)) -> Result<()> {
    for attr in attrs.iter().filter(|a| a.path().is_ident("orm")) {
        merge(attr.parse_args::<T>()?);
    }
    Ok(())
}

pub(crate) fn struct_attr(input: &DeriveInput) -> Result<StructAttr> {
    let mut out = StructAttr::default();
    merge_orm_attrs(&input.attrs, |a: StructAttr| {
        if a.table.is_some() {
            out.table = a.table;
        }
        if a.schema.is_some() {
            out.schema = a.schema;
        }
    })?;
    Ok(out)
}

/// How a struct field takes part in the mapping.
pub(crate) enum FieldKind {
    /// A column; transient columns are never selected or written.
    Column { column: String, transient: bool },
    /// Fields of another struct, flattened into this one.
    Embed,
    /// Private or `#[orm(skip)]`; filled with `Default` when decoding.
    Unmapped,
}

pub(crate) struct FieldInfo<'a> {
    pub ident: &'a syn::Ident,
    pub vis: &'a syn::Visibility,
    pub ty: &'a syn::Type,
    pub kind: FieldKind,
}

/// Named fields of a non-generic struct, with their mapping.
pub(crate) fn fields<'a>(input: &'a DeriveInput, derive: &str) -> Result<Vec<FieldInfo<'a>>> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            format!("{derive} cannot be derived for generic structs"),
        ));
    }
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    format!("{derive} can only be derived for structs with named fields"),
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs"),
            ));
        }
    };

    named
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
            let mut attr = FieldAttr::default();
            merge_orm_attrs(&field.attrs, |a: FieldAttr| {
                attr.column = a.column.or(attr.column.take());
                attr.transient |= a.transient;
                attr.skip |= a.skip;
                attr.embed |= a.embed;
            })?;

            let private = matches!(field.vis, syn::Visibility::Inherited);
            let kind = if private || attr.skip {
                FieldKind::Unmapped
            } else if attr.embed {
                FieldKind::Embed
            } else {
                FieldKind::Column {
                    column: attr.column.unwrap_or_else(|| ident.to_string()),
                    transient: attr.transient,
                }
            };
            Ok(FieldInfo {
                ident,
                vis: &field.vis,
                ty: &field.ty,
                kind,
            })
        })
        .collect()
}
