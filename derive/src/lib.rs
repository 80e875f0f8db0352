use proc_macro::TokenStream;

mod search;

/// Implement `Search` for a struct with named fields
///
/// Each field is one of:
/// - `#[search("type:...;column:...;table:...")]`: a filter directive
/// - `#[search("-")]`: excluded from resolution
/// - no attribute: a nested filter struct, resolved recursively
#[proc_macro_derive(Search, attributes(search))]
pub fn derive_search(input: TokenStream) -> TokenStream {
    search::derive_search(input.into()).into()
}
