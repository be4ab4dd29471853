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

//! Derive of the BTP codec traits `Read` and `Write`, on fixed-layout
//! parameter structures and on enumerations encoded as a single octet.
//!
//! The generated code names `Read`, `Reader`, `Write` and `Writer` without
//! path, so they must be in scope at the derive site.

extern crate proc_macro;
mod enum_data;
mod struct_data;

use proc_macro::TokenStream;
use syn::{DeriveInput, Error};

/// Derive of `btp::Read` trait
#[proc_macro_derive(Read)]
pub fn derive_read(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let expanded = match input.data {
        syn::Data::Enum(ref data) => enum_data::derive_read(&input.ident, data),
        syn::Data::Struct(ref data) => struct_data::derive_read(&input.ident, data),
        syn::Data::Union(_) => Err(Error::new(input.ident.span(), "Unions are not supported")),
    }
    .unwrap_or_else(Error::into_compile_error);
    TokenStream::from(expanded)
}

/// Derive of `btp::Write` trait
#[proc_macro_derive(Write)]
pub fn derive_write(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let expanded = match input.data {
        syn::Data::Enum(ref data) => enum_data::derive_write(&input.ident, data),
        syn::Data::Struct(ref data) => struct_data::derive_write(&input.ident, data),
        syn::Data::Union(_) => Err(Error::new(input.ident.span(), "Unions are not supported")),
    }
    .unwrap_or_else(Error::into_compile_error);
    TokenStream::from(expanded)
}
