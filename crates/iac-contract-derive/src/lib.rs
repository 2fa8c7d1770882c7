//! Derive macro for `iac_contract_core::OutputSchema`.
//!
//! ```ignore
//! use iac_contract_core::OutputSchema;
//!
//! #[derive(Default, OutputSchema)]
//! struct MyOutputs {
//!     #[output("resource_group_name")]
//!     resource_group: String,
//!     #[output("location")]
//!     location: serde_json::Value,
//!     // no attribute: ignored by the contract engine
//!     notes: Vec<String>,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derive `OutputSchema` from `#[output("canonical_name")]` field attributes.
///
/// Generates a static field table in declaration order and an `assign`
/// method that stores a value into the matching field, handing the value
/// back when the field type rejects its shape.
#[proc_macro_derive(OutputSchema, attributes(output))]
pub fn derive_output_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct TaggedField {
    ident: syn::Ident,
    ty: syn::Type,
    name: LitStr,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "OutputSchema cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "OutputSchema requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "OutputSchema can only be derived for structs",
            ));
        }
    };

    let mut tagged = Vec::new();
    for field in fields {
        let Some(output_name) = output_name(&field.attrs)? else {
            continue;
        };
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        tagged.push(TaggedField {
            ident,
            ty: field.ty.clone(),
            name: output_name,
        });
    }

    let table = tagged.iter().map(|f| {
        let ident_str = f.ident.unraw().to_string();
        let output = &f.name;
        let ty = &f.ty;
        quote! {
            ::iac_contract_core::OutputField {
                ident: #ident_str,
                name: #output,
                shape: <#ty as ::iac_contract_core::OutputSlot>::SHAPE,
            }
        }
    });

    let arms = tagged.iter().map(|f| {
        let ident = &f.ident;
        let ident_str = f.ident.unraw().to_string();
        let ty = &f.ty;
        quote! {
            #ident_str => {
                self.#ident = <#ty as ::iac_contract_core::OutputSlot>::from_output(value)?;
                ::std::result::Result::Ok(())
            }
        }
    });

    Ok(quote! {
        impl ::iac_contract_core::OutputSchema for #name {
            fn fields() -> &'static [::iac_contract_core::OutputField] {
                const FIELDS: &[::iac_contract_core::OutputField] = &[#(#table),*];
                FIELDS
            }

            fn assign(
                &mut self,
                field: &::iac_contract_core::OutputField,
                value: ::iac_contract_core::serde_json::Value,
            ) -> ::std::result::Result<(), ::iac_contract_core::serde_json::Value> {
                match field.ident {
                    #(#arms)*
                    _ => ::std::result::Result::Err(value),
                }
            }
        }
    })
}

/// Read the canonical output name from `#[output("...")]`, if present.
fn output_name(attrs: &[syn::Attribute]) -> syn::Result<Option<LitStr>> {
    let mut found = None;
    for attr in attrs {
        if !attr.path().is_ident("output") {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "duplicate #[output] attribute on field",
            ));
        }
        let lit: LitStr = attr.parse_args()?;
        if lit.value().is_empty() {
            return Err(syn::Error::new_spanned(
                &lit,
                "output name must not be empty",
            ));
        }
        found = Some(lit);
    }
    Ok(found)
}
