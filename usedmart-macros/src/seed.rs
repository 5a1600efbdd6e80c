use darling::{FromAttributes, FromMeta};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Path, Result};

#[derive(FromMeta, Clone, Debug)]
struct TableMeta {
    name: Option<String>,
    #[darling(default)]
    order: Option<Path>,
    create_table: Path,
    #[darling(default)]
    create_indexes: Option<Path>,
}

#[derive(FromMeta, Clone, Debug)]
struct SeedableMeta {
    #[darling(flatten)]
    table: TableMeta,
    model: Path,
    #[darling(default)]
    seed_data: Option<Path>,
}

#[derive(FromMeta, Clone, Debug)]
struct UnseedableMeta {
    #[darling(flatten)]
    table: TableMeta,
}

#[derive(FromAttributes, Debug)]
#[darling(attributes(seedable))]
struct SeedableAttr {
    meta: SeedableMeta,
}

#[derive(FromAttributes, Debug)]
#[darling(attributes(unseedable))]
struct UnseedableAttr {
    meta: UnseedableMeta,
}

/// Emits `impl UMInitializer` for an iden enum. `seeding` is the body of
/// `seeding_data`.
fn initializer_impl(input: &DeriveInput, table: &TableMeta, seeding: TokenStream) -> Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(Error::new_spanned(
            input,
            "initializer derives only apply to iden enums",
        ));
    };

    let ident = &input.ident;
    let name = table
        .name
        .clone()
        .unwrap_or_else(|| ident.to_string().to_snake_case());
    let order = match &table.order {
        Some(p) => quote!(#p),
        None => quote!(0),
    };
    let has_update_col = data.variants.iter().any(|v| v.ident == "UpdatedAt");
    let create_table = &table.create_table;
    let create_indexes = match &table.create_indexes {
        Some(f) => quote!(#f(backend)),
        None => quote!(None),
    };

    Ok(quote! {
        #[async_trait::async_trait]
        impl crate::initializer::UMInitializer for #ident {
            fn order(&self) -> i32 {
                #order
            }

            fn name(&self) -> &str {
                #name
            }

            fn has_update_col(&self) -> bool {
                #has_update_col
            }

            fn to_create_table_stmt(
                &self,
                backend: sea_orm::DatabaseBackend,
            ) -> sea_orm::sea_query::TableCreateStatement {
                #create_table(backend)
            }

            fn to_drop_table_stmt(
                &self,
                _: sea_orm::DatabaseBackend,
            ) -> sea_orm::sea_query::TableDropStatement {
                sea_orm::sea_query::Table::drop()
                    .table(Self::Table)
                    .if_exists()
                    .to_owned()
            }

            fn to_create_indexes_stmt(
                &self,
                backend: sea_orm::DatabaseBackend,
            ) -> Option<Vec<sea_orm::sea_query::IndexCreateStatement>> {
                #create_indexes
            }

            async fn seeding_data(
                &self,
                transaction: &sea_orm::DatabaseTransaction,
                ctx: &mut crate::initializer::InitContext,
            ) -> Result<(), sea_orm::DbErr> {
                #seeding
            }
        }
    })
}

pub(crate) fn expand_seedable(input: DeriveInput) -> Result<TokenStream> {
    let attr = SeedableAttr::from_attributes(&input.attrs)
        .map_err(|e| Error::new_spanned(&input, e.to_string()))?;
    let SeedableMeta {
        table,
        model,
        seed_data,
    } = attr.meta;
    let ident = &input.ident;

    let fetch_seed = match seed_data {
        Some(f) => quote!(#f(ctx).await),
        None => quote!(Ok(None)),
    };

    let initializer = initializer_impl(
        &input,
        &table,
        quote! {
            crate::initializer::SeedableInitializerTrait::<#model>::seed_data(self, transaction, ctx).await
        },
    )?;

    Ok(quote! {
        impl crate::initializer::SeedableInitializerTrait<#model> for #ident {}

        #[async_trait::async_trait]
        impl crate::initializer::DataSeederTrait<#model> for #ident {
            async fn get_seed_data(
                &self,
                ctx: &mut crate::initializer::InitContext,
            ) -> Result<Option<Vec<#model>>, sea_orm::DbErr> {
                #fetch_seed
            }
        }

        #initializer
    })
}

pub(crate) fn expand_unseedable(input: DeriveInput) -> Result<TokenStream> {
    let attr = UnseedableAttr::from_attributes(&input.attrs)
        .map_err(|e| Error::new_spanned(&input, e.to_string()))?;
    initializer_impl(
        &input,
        &attr.meta.table,
        quote! {
            let _ = (transaction, ctx);
            Ok(())
        },
    )
}
