use proc_macro::{Literal, TokenStream, TokenTree};
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Turns the given tokens into an upper-cased string literal, so command
/// names can be written as identifiers: `to_upper_case_str!(Suggest)` is
/// `"SUGGEST"`.
#[proc_macro]
pub fn to_upper_case_str(stream: TokenStream) -> TokenStream {
    let result: String = stream
        .into_iter()
        .map(|token| match token {
            TokenTree::Ident(ident) => ident.to_string().to_uppercase(),
            other => other.to_string(),
        })
        .collect();
    TokenStream::from(TokenTree::Literal(Literal::string(&result)))
}

/// Derives `get_<field>()` (cloned) and `get_<field>_ref()` accessors for
/// every named field.
#[proc_macro_derive(Getter)]
pub fn derive_getter(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "Getter needs named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "Getter can only be derived for structs")
                .to_compile_error()
                .into()
        }
    };

    let getters: Vec<proc_macro2::TokenStream> = fields
        .iter()
        .filter_map(|field| {
            let ident = field.ident.as_ref()?;
            let ty = &field.ty;
            let getter = format_ident!("get_{}", ident);
            let getter_ref = format_ident!("get_{}_ref", ident);
            Some(quote! {
                #[allow(dead_code)]
                pub fn #getter(&self) -> #ty {
                    ::std::clone::Clone::clone(&self.#ident)
                }

                #[allow(dead_code)]
                pub fn #getter_ref(&self) -> &#ty {
                    &self.#ident
                }
            })
        })
        .collect();

    quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #(#getters)*
        }
    }
    .into()
}
