//! Procedural macros for the stepvis step-execution engine.
//!
//! `#[derive(Label)]` implements `stepvis::Label`. Enums label each value
//! with its variant name, structs with the type name. Unions are rejected.
//!
//! ```rust,ignore
//! use stepvis::Label;
//!
//! #[derive(Label)]
//! enum Phase { Compare(usize, usize), Swap { a: usize, b: usize }, Finished }
//!
//! assert_eq!(Phase::Swap { a: 0, b: 1 }.label(), "Swap");
//! ```
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, Fields, parse_macro_input};

#[proc_macro_derive(Label)]
pub fn derive_label(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_label(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_label(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match &input.data {
        Data::Enum(data) => variant_labels(data),
        Data::Struct(_) => {
            let name = ident.to_string();
            quote! { ::std::borrow::Cow::Borrowed(#name) }
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "Label cannot be derived for unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::stepvis::Label for #ident #ty_generics #where_clause {
            fn label(&self) -> ::std::borrow::Cow<'static, str> {
                #body
            }
        }
    })
}

fn variant_labels(data: &DataEnum) -> TokenStream2 {
    if data.variants.is_empty() {
        return quote! { match *self {} };
    }
    let arms = data.variants.iter().map(|variant| {
        let name = &variant.ident;
        let text = name.to_string();
        let pattern = match &variant.fields {
            Fields::Unit => quote! { Self::#name },
            Fields::Unnamed(_) => quote! { Self::#name(..) },
            Fields::Named(_) => quote! { Self::#name { .. } },
        };
        quote! { #pattern => ::std::borrow::Cow::Borrowed(#text) }
    });
    quote! {
        match self {
            #(#arms),*
        }
    }
}
