//! Procedural macros for Braid.
//!
//! # `#[derive(Identifiable)]`
//!
//! Implements `braid_core::Identifiable` from the one field marked
//! `#[identity]`. The field type must implement `Display`.
//!
//! ```ignore
//! #[derive(Identifiable, Clone, PartialEq)]
//! struct Message {
//!     #[identity]
//!     id: u64,
//!     subject: String,
//!     unread: bool,
//! }
//! ```
//!
//! Tuple structs mark a positional field the same way, and a newtype with a
//! single field needs no attribute at all.
//!
//! # `#[derive(Sections)]`
//!
//! Implements `braid_core::DeclaredSections` for a fieldless enum, listing
//! the variants in declaration order. Variants marked `#[sections(skip)]` are
//! left out.
//!
//! ```ignore
//! #[derive(Sections, Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Settings {
//!     Account,
//!     Privacy,
//!     #[sections(skip)]
//!     Debug,
//!     About,
//! }
//! ```
//!
//! Generated code refers to `::braid_core`, so the crate using the derives
//! must depend on `braid-core` directly.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Index, Member};

/// Derive `Identifiable` from a field marked `#[identity]`.
#[proc_macro_derive(Identifiable, attributes(identity))]
pub fn derive_identifiable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_derive_identifiable(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Derive `DeclaredSections` for a fieldless enum.
#[proc_macro_derive(Sections, attributes(sections))]
pub fn derive_sections(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_derive_sections(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn impl_derive_identifiable(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Identifiable derive only supports structs",
            ))
        }
    };

    let member = identity_member(input, fields)?;

    Ok(quote! {
        impl #impl_generics ::braid_core::Identifiable for #name #ty_generics #where_clause {
            fn identity(&self) -> ::braid_core::ItemId {
                ::braid_core::ItemId::new(&self.#member)
            }
        }
    })
}

/// Finds the field that carries the identity.
fn identity_member(input: &DeriveInput, fields: &Fields) -> syn::Result<Member> {
    let mut marked = Vec::new();
    for (position, field) in fields.iter().enumerate() {
        if has_flag(&field.attrs, "identity") {
            let member = match &field.ident {
                Some(ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(Index::from(position)),
            };
            marked.push((member, field));
        }
    }

    match marked.len() {
        1 => Ok(marked.remove(0).0),
        0 if matches!(fields, Fields::Unnamed(f) if f.unnamed.len() == 1) => {
            Ok(Member::Unnamed(Index::from(0)))
        }
        0 => Err(syn::Error::new_spanned(
            input,
            "Identifiable derive requires exactly one field marked #[identity]",
        )),
        _ => Err(syn::Error::new_spanned(
            marked[1].1,
            "only one field may be marked #[identity]",
        )),
    }
}

fn impl_derive_sections(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let data = match &input.data {
        Data::Enum(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Sections derive only supports enums",
            ))
        }
    };

    let mut variants = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Sections derive only supports fieldless variants",
            ));
        }
        if section_skipped(&variant.attrs)? {
            continue;
        }
        let ident = &variant.ident;
        variants.push(quote! { Self::#ident });
    }

    Ok(quote! {
        impl #impl_generics ::braid_core::DeclaredSections for #name #ty_generics #where_clause {
            fn declared_sections() -> ::std::vec::Vec<Self> {
                ::std::vec![#(#variants),*]
            }
        }
    })
}

/// Parses `#[sections(skip)]`.
fn section_skipped(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut skip = false;
    for attr in attrs {
        if !attr.path().is_ident("sections") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown sections attribute"))
            }
        })?;
    }
    Ok(skip)
}

fn has_flag(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
