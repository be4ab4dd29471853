// Copyright 2024, The Android Open Source Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Enumerations are encoded on one octet, using the discriminant:
//!
//! ```ignore
//! #[derive(Read, Write)]
//! enum Status {
//!    Success = 0x00,
//!    Failed = 0x01,
//! }
//! ```
//!
//! An unknown value read from the wire makes the read fail.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Error};

fn discriminants(data: &syn::DataEnum) -> Result<Vec<(&syn::Ident, &syn::Expr)>, Error> {
    data.variants
        .iter()
        .map(|variant| match variant.discriminant {
            Some((_, ref value)) if variant.fields.is_empty() => Ok((&variant.ident, value)),
            Some(_) => Err(Error::new(variant.span(), "Variant with fields")),
            None => Err(Error::new(variant.span(), "Missing discriminant")),
        })
        .collect()
}

pub(crate) fn derive_read(name: &syn::Ident, data: &syn::DataEnum) -> Result<TokenStream, Error> {
    let arms = discriminants(data)?
        .into_iter()
        .map(|(ident, value)| quote! { v if v == #value => Some(Self::#ident), });

    Ok(quote! {
        impl Read for #name {
            fn read(r: &mut Reader) -> Option<Self> {
                match r.read_u8()? {
                    #( #arms )*
                    _ => None,
                }
            }
        }
    })
}

pub(crate) fn derive_write(name: &syn::Ident, data: &syn::DataEnum) -> Result<TokenStream, Error> {
    let arms = discriminants(data)?
        .into_iter()
        .map(|(ident, value)| quote! { Self::#ident => #value, });

    Ok(quote! {
        impl Write for #name {
            fn write(&self, w: &mut Writer) {
                w.write_u8(match self {
                    #( #arms )*
                })
            }
        }
    })
}
