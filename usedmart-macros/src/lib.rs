mod active_value;
mod seed;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `UMInitializer` plus the seeding traits for an iden enum.
///
/// ```ignore
/// #[derive(DeriveIden, SeedableInitializer)]
/// #[seedable(meta(
///     model = NewRoleWithId,
///     order = super::INIT_ROLE_ORDER,
///     create_table = create_role_table,
///     seed_data = seed_roles
/// ))]
/// pub enum Role { Table, Id, Code, CreatedAt, UpdatedAt }
/// ```
#[proc_macro_derive(SeedableInitializer, attributes(seedable))]
pub fn derive_seedable_initializer(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    seed::expand_seedable(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derives `UMInitializer` for an iden enum whose table starts empty.
#[proc_macro_derive(UnseedableInitializer, attributes(unseedable))]
pub fn derive_unseedable_initializer(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    seed::expand_unseedable(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Lets a sea-orm active enum be used directly as a field of a
/// `DeriveIntoActiveModel` struct.
#[proc_macro_derive(IntoActiveValue)]
pub fn derive_into_active_value(input: TokenStream) -> TokenStream {
    active_value::expand(parse_macro_input!(input as DeriveInput)).into()
}
