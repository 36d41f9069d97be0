use proc_macro::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;

/// Derives the `FromRng` trait.
///
/// Fields are drawn from the random number generator in declaration order, so reordering the
/// fields of a struct changes the values it is built with.
#[proc_macro_derive(FromRng)]
pub fn derive_from_rng(input: TokenStream) -> TokenStream {
    let item = match syn::parse::<syn::DeriveInput>(input) {
        Ok(item) => item,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();

    let data = match &item.data {
        syn::Data::Struct(data) => data,
        _ => {
            return syn::Error::new(item.span(), "`FromRng` can only be derived for structs")
                .to_compile_error()
                .into()
        }
    };

    let body = match &data.fields {
        syn::Fields::Named(fields) => {
            let field_init = fields.named.iter().map(|field| {
                let ident = &field.ident;
                quote_spanned! { field.span() =>
                    #ident: sprawl_rng::FromRng::from_rng(rng),
                }
            });
            quote! { Self { #(#field_init)* } }
        }
        syn::Fields::Unnamed(fields) => {
            let field_init = fields.unnamed.iter().map(|field| {
                quote_spanned! { field.span() =>
                    sprawl_rng::FromRng::from_rng(rng),
                }
            });
            quote! { Self( #(#field_init)* ) }
        }
        syn::Fields::Unit => quote! { Self },
    };

    let ret = quote! {
        impl #impl_generics sprawl_rng::FromRng for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn from_rng(rng: &mut impl sprawl_rng::Rng) -> Self {
                #body
            }
        }
    };

    ret.into()
}
