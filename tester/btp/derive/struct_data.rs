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

//! Structures are encoded field after field, in declaration order, without
//! padding. Integers are little endian.
//!
//! | Field type     | Encoding                               |
//! |----------------|----------------------------------------|
//! | `u8`, `i8`     | 1 octet                                |
//! | `bool`         | 1 octet, non-zero is `true`            |
//! | `u16`, `u32`   | 2 or 4 octets                          |
//! | `[u8; N]`      | N octets                               |
//! | other          | through its own `Read` / `Write` impl  |
//!
//! `Vec<u8>` falls in the last case and is prefixed by its length on one
//! octet, as used by the variable-length BTP parameters.

use proc_macro2::TokenStream;
use quote::{format_ident, quote_spanned};
use syn::{spanned::Spanned, Error};

enum Accessor {
    Scalar(&'static str),
    Bytes,
    Nested,
}

impl Accessor {
    fn of(ty: &syn::Type) -> Result<Self, Error> {
        const SCALARS: [&str; 5] = ["u8", "i8", "bool", "u16", "u32"];
        Ok(match ty {
            syn::Type::Path(v) => SCALARS
                .iter()
                .find(|s| v.path.is_ident(s))
                .map_or(Accessor::Nested, |s| Accessor::Scalar(s)),
            syn::Type::Array(v) => match &*v.elem {
                syn::Type::Path(e) if e.path.is_ident("u8") => Accessor::Bytes,
                _ => return Err(Error::new(v.elem.span(), "Only byte arrays are supported")),
            },
            _ => Accessor::Nested,
        })
    }
}

fn named_fields(data: &syn::DataStruct) -> Result<Vec<&syn::Field>, Error> {
    match data.fields {
        syn::Fields::Named(ref fields) => Ok(fields.named.iter().collect()),
        syn::Fields::Unit => Ok(Vec::new()),
        syn::Fields::Unnamed(ref fields) => {
            Err(Error::new(fields.span(), "Tuple structures are not supported"))
        }
    }
}

pub(crate) fn derive_read(name: &syn::Ident, data: &syn::DataStruct) -> Result<TokenStream, Error> {
    let mut fields = Vec::new();
    for field in named_fields(data)? {
        let ident = field.ident.as_ref().unwrap();
        let span = field.ty.span();
        fields.push(match Accessor::of(&field.ty)? {
            Accessor::Scalar(s) => {
                let f = format_ident!("read_{}", s);
                quote_spanned! { span => #ident: r.#f()? }
            }
            Accessor::Bytes => quote_spanned! { span => #ident: r.read_bytes()? },
            Accessor::Nested => quote_spanned! { span => #ident: r.read()? },
        });
    }

    Ok(quote_spanned! { name.span() =>
        impl Read for #name {
            fn read(r: &mut Reader) -> Option<Self> {
                let _ = &r;
                Some(Self { #( #fields ),* })
            }
        }
    })
}

pub(crate) fn derive_write(
    name: &syn::Ident,
    data: &syn::DataStruct,
) -> Result<TokenStream, Error> {
    let mut fields = Vec::new();
    for field in named_fields(data)? {
        let ident = field.ident.as_ref().unwrap();
        let span = field.ty.span();
        fields.push(match Accessor::of(&field.ty)? {
            Accessor::Scalar(s) => {
                let f = format_ident!("write_{}", s);
                quote_spanned! { span => w.#f(self.#ident); }
            }
            Accessor::Bytes => quote_spanned! { span => w.write_bytes(&self.#ident); },
            Accessor::Nested => quote_spanned! { span => w.write(&self.#ident); },
        });
    }

    Ok(quote_spanned! { name.span() =>
        impl Write for #name {
            fn write(&self, w: &mut Writer) {
                let _ = &w;
                #( #fields )*
            }
        }
    })
}
