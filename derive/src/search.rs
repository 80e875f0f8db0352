use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Error, Field, Fields, LitStr};

const SKIP: &str = "-";

// derive_search
pub fn derive_search(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let ident = &input.ident;
    let name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = if let Data::Struct(data) = &input.data {
        if let Fields::Named(named) = &data.fields {
            &named.named
        } else {
            let err = Error::new_spanned(
                &data.fields,
                "Search can only be derived for structs with named fields",
            );
            return err.to_compile_error();
        }
    } else {
        let err = Error::new_spanned(
            &input.ident,
            "Search can only be derived for structs with named fields",
        );
        return err.to_compile_error();
    };

    let mut sites = Vec::with_capacity(fields.len());
    for field in fields {
        match field_site(field) {
            Ok(site) => sites.push(site),
            Err(err) => return err.to_compile_error(),
        }
    }

    quote! {
        impl #impl_generics ::orderin_server::data::search::Search for #ident #ty_generics #where_clause {
            fn search_name(&self) -> &'static str {
                #name
            }

            fn search_fields(&self) -> ::std::vec::Vec<::orderin_server::data::search::SearchSite<'_>> {
                use ::orderin_server::data::search::SearchSite;

                ::std::vec![#(#sites),*]
            }
        }

        impl #impl_generics ::orderin_server::data::search::SearchField for #ident #ty_generics #where_clause {
            fn view(&self) -> ::orderin_server::data::search::FieldView<'_> {
                ::orderin_server::data::search::FieldView::Struct(self)
            }
        }
    }
}

fn field_site(field: &Field) -> Result<TokenStream, Error> {
    let Some(field_ident) = field.ident.as_ref() else {
        return Err(Error::new_spanned(field, "expected a named field"));
    };
    let field_name = field_ident.to_string();

    let site = match directive(&field.attrs)? {
        None => quote! {
            SearchSite::Nested {
                field: #field_name,
                value: &self.#field_ident,
            }
        },
        Some(tag) if tag.value().trim() == SKIP => quote! {
            SearchSite::Skipped {
                field: #field_name,
            }
        },
        Some(tag) => {
            if tag.value().trim().is_empty() {
                return Err(Error::new_spanned(tag, "search directive is empty"));
            }
            quote! {
                SearchSite::Tagged {
                    field: #field_name,
                    tag: #tag,
                    value: &self.#field_ident,
                }
            }
        }
    };

    Ok(site)
}

/// The `#[search("...")]` literal, if present
fn directive(attrs: &[Attribute]) -> Result<Option<LitStr>, Error> {
    let mut found: Option<LitStr> = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("search")) {
        if found.is_some() {
            return Err(Error::new_spanned(attr, "duplicate #[search] attribute"));
        }
        found = Some(attr.parse_args::<LitStr>()?);
    }
    Ok(found)
}
