//! `Table` and `Embed` derive implementations.

use crate::attrs::{FieldKind, fields, struct_attr};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Result};

struct RefParts {
    ref_fields: Vec<TokenStream>,
    defs: Vec<TokenStream>,
    builds: Vec<TokenStream>,
}

fn ref_parts(input: &DeriveInput, derive: &str) -> Result<RefParts> {
    let mut parts = RefParts {
        ref_fields: Vec::new(),
        defs: Vec::new(),
        builds: Vec::new(),
    };

    for field in fields(input, derive)? {
        let ident = field.ident;
        let vis = field.vis;
        let ty = field.ty;
        let name = ident.to_string();
        match field.kind {
            FieldKind::Column { column, transient } => {
                parts.ref_fields.push(quote! { #vis #ident: structq::Column });
                parts.defs.push(if transient {
                    quote! { out.push(structq::FieldDef::transient(#name, #column)); }
                } else {
                    quote! { out.push(structq::FieldDef::new(#name, #column)); }
                });
                parts.builds.push(quote! { #ident: cursor.next_column() });
            }
            FieldKind::Embed => {
                parts
                    .ref_fields
                    .push(quote! { #vis #ident: <#ty as structq::Fields>::Ref });
                parts
                    .defs
                    .push(quote! { <#ty as structq::Fields>::field_defs(out); });
                parts
                    .builds
                    .push(quote! { #ident: <#ty as structq::Fields>::build_ref(cursor) });
            }
            FieldKind::Unmapped => {}
        }
    }
    Ok(parts)
}

pub fn expand_table(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let vis = &input.vis;
    let ref_name = format_ident!("{}Ref", name);
    let attr = struct_attr(&input)?;
    let table = attr.table.unwrap_or_else(|| name.to_string().to_snake_case());
    let schema = match attr.schema {
        Some(schema) => quote! { Some(#schema) },
        None => quote! { None },
    };
    let RefParts {
        ref_fields,
        defs,
        builds,
    } = ref_parts(&input, "Table")?;
    let doc = format!("Column tokens of one `{}` reference.", name);

    Ok(quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy)]
        #vis struct #ref_name {
            __instance: structq::InstanceId,
            #(#ref_fields,)*
        }

        impl structq::Fields for #name {
            type Ref = #ref_name;

            #[allow(unused_variables)]
            fn field_defs(out: &mut Vec<structq::FieldDef>) {
                #(#defs)*
            }

            fn build_ref(cursor: &mut structq::FieldCursor) -> #ref_name {
                #ref_name {
                    __instance: cursor.instance(),
                    #(#builds,)*
                }
            }
        }

        impl structq::Table for #name {
            const TABLE: &'static str = #table;
            const SCHEMA: Option<&'static str> = #schema;
        }

        impl structq::Reference for #ref_name {
            type Model = #name;

            fn instance(&self) -> structq::InstanceId {
                self.__instance
            }
        }
    })
}

pub fn expand_embed(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let vis = &input.vis;
    let ref_name = format_ident!("{}Ref", name);
    let RefParts {
        ref_fields,
        defs,
        builds,
    } = ref_parts(&input, "Embed")?;

    Ok(quote! {
        #[derive(Debug, Clone, Copy)]
        #vis struct #ref_name {
            #(#ref_fields,)*
        }

        impl structq::Fields for #name {
            type Ref = #ref_name;

            #[allow(unused_variables)]
            fn field_defs(out: &mut Vec<structq::FieldDef>) {
                #(#defs)*
            }

            #[allow(unused_variables)]
            fn build_ref(cursor: &mut structq::FieldCursor) -> #ref_name {
                #ref_name {
                    #(#builds,)*
                }
            }
        }
    })
}
