use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Data, DeriveInput, Expr, ExprLit, ExprUnary, Fields, Ident, Lit, LitStr, Type, UnOp,
    parse_macro_input, spanned::Spanned,
};

/// Implements `tablemap::Entity` from `#[table(...)]` and `#[column(...)]`
/// attributes.
///
/// Only fields carrying `#[column]` are mapped. Storage type and nullability
/// are inferred from the field type through `tablemap::FieldValue` unless
/// given explicitly.
#[proc_macro_derive(Entity, attributes(table, column))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_entity(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct TableOptions {
    table_name: Option<String>,
}

#[derive(Default)]
struct ColumnOptions {
    column_name: Option<String>,
    description: Option<String>,
    storage: Option<Ident>,
    key: bool,
    read_only: bool,
    nullable: bool,
    default_value: Option<TokenStream2>,
}

struct MappedField {
    ident: Ident,
    ty: Type,
    options: ColumnOptions,
}

fn expand_entity(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            input.generics,
            "Entity does not support generic structs",
        ));
    }

    let table_options = parse_table_options(&input.attrs)?;

    let data_struct = match input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Entity can only be derived for structs",
            ));
        }
    };

    let named_fields = match data_struct.fields {
        Fields::Named(fields) => fields,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Entity requires named fields",
            ));
        }
    };

    let mut mapped = Vec::<MappedField>::new();
    for field in named_fields.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "Entity requires named fields"))?;
        if let Some(options) = parse_column_options(&field.attrs)? {
            mapped.push(MappedField {
                ident,
                ty: field.ty,
                options,
            });
        }
    }

    let type_name = struct_name.to_string();
    let table_name_expr = match table_options.table_name {
        Some(table_name) => quote! { ::core::option::Option::Some(#table_name) },
        None => quote! { ::core::option::Option::None },
    };

    let column_exprs = mapped.iter().map(column_def_tokens);

    Ok(quote! {
        impl ::tablemap::Entity for #struct_name {
            fn type_name() -> &'static str {
                #type_name
            }

            fn table_name() -> ::core::option::Option<&'static str> {
                #table_name_expr
            }

            fn columns() -> ::std::vec::Vec<::tablemap::ColumnDef<Self>> {
                ::std::vec![#(#column_exprs),*]
            }
        }
    })
}

fn column_def_tokens(field: &MappedField) -> TokenStream2 {
    let ident = &field.ident;
    let ty = &field.ty;
    let options = &field.options;

    let field_name = ident.to_string().trim_start_matches("r#").to_string();
    let column_name = options
        .column_name
        .clone()
        .unwrap_or_else(|| field_name.clone());

    let storage = match &options.storage {
        Some(variant) => quote! { ::tablemap::StorageType::#variant },
        None => quote! { <#ty as ::tablemap::FieldValue>::STORAGE },
    };
    let explicit_nullable = options.nullable;
    let key = options.key.then(|| quote! { .key() });
    let read_only = options.read_only.then(|| quote! { .read_only() });
    let description = options
        .description
        .as_ref()
        .map(|description| quote! { .description(#description) });
    let default_value = options
        .default_value
        .as_ref()
        .map(|value| quote! { .default_value(#value) });

    quote! {
        ::tablemap::ColumnDef::<Self>::new(#column_name, #storage)
            .field(#field_name)
            .nullable(#explicit_nullable || <#ty as ::tablemap::FieldValue>::NULLABLE)
            #key
            #read_only
            #description
            #default_value
            .accessors(
                |entity: &Self| ::tablemap::FieldValue::to_value(&entity.#ident),
                |entity: &mut Self, value: ::tablemap::Value| {
                    entity.#ident = ::tablemap::FieldValue::from_value(value)?;
                    ::core::result::Result::Ok(())
                },
            )
    }
}

fn parse_table_options(attrs: &[syn::Attribute]) -> syn::Result<TableOptions> {
    let mut options = TableOptions { table_name: None };

    for attr in attrs {
        if !attr.path().is_ident("table") {
            continue;
        }

        if options.table_name.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "Duplicate #[table(...)] attribute",
            ));
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                options.table_name = Some(lit.value());
                return Ok(());
            }

            Err(meta.error("Unsupported table attribute. Supported: name = \"...\""))
        })?;
    }

    Ok(options)
}

fn parse_column_options(attrs: &[syn::Attribute]) -> syn::Result<Option<ColumnOptions>> {
    let mut options: Option<ColumnOptions> = None;

    for attr in attrs {
        if !attr.path().is_ident("column") {
            continue;
        }

        if options.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "Duplicate #[column(...)] attribute on field",
            ));
        }

        let mut parsed = ColumnOptions::default();
        match &attr.meta {
            syn::Meta::Path(_) => {}
            syn::Meta::List(list) => {
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("key") {
                        parsed.key = true;
                        return Ok(());
                    }

                    if meta.path.is_ident("read_only") {
                        parsed.read_only = true;
                        return Ok(());
                    }

                    if meta.path.is_ident("nullable") {
                        parsed.nullable = true;
                        return Ok(());
                    }

                    if meta.path.is_ident("name") {
                        let lit: LitStr = meta.value()?.parse()?;
                        parsed.column_name = Some(lit.value());
                        return Ok(());
                    }

                    if meta.path.is_ident("description") {
                        let lit: LitStr = meta.value()?.parse()?;
                        parsed.description = Some(lit.value());
                        return Ok(());
                    }

                    if meta.path.is_ident("storage") {
                        let lit: LitStr = meta.value()?.parse()?;
                        parsed.storage = Some(storage_variant(&lit)?);
                        return Ok(());
                    }

                    if meta.path.is_ident("default") {
                        let expr: Expr = meta.value()?.parse()?;
                        parsed.default_value = Some(default_value_tokens(&expr)?);
                        return Ok(());
                    }

                    Err(meta.error(
                        "Unsupported #[column(...)] option. Supported: key, read_only, nullable, name = \"...\", description = \"...\", storage = \"...\", default = <literal>",
                    ))
                })?;
            }
            syn::Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "Unsupported #[column = ...] syntax. Use #[column] or #[column(...)]",
                ));
            }
        }

        options = Some(parsed);
    }

    Ok(options)
}

fn storage_variant(lit: &LitStr) -> syn::Result<Ident> {
    let variant = match lit.value().to_ascii_lowercase().as_str() {
        "text" => "Text",
        "integer" => "Integer",
        "real" => "Real",
        "blob" => "Blob",
        "boolean" => "Boolean",
        "datetime" => "DateTime",
        _ => {
            return Err(syn::Error::new(
                lit.span(),
                "Unknown storage type. Supported: text, integer, real, blob, boolean, datetime",
            ));
        }
    };
    Ok(Ident::new(variant, lit.span()))
}

fn default_value_tokens(expr: &Expr) -> syn::Result<TokenStream2> {
    let literal = match expr {
        Expr::Lit(ExprLit { lit, .. }) => lit,
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match inner.as_ref() {
            Expr::Lit(ExprLit {
                lit: Lit::Int(_), ..
            }) => return Ok(quote! { ::tablemap::Value::Integer(#expr) }),
            Expr::Lit(ExprLit {
                lit: Lit::Float(_), ..
            }) => return Ok(quote! { ::tablemap::Value::Real(#expr) }),
            _ => return Err(syn::Error::new(expr.span(), "default must be a literal")),
        },
        _ => return Err(syn::Error::new(expr.span(), "default must be a literal")),
    };

    match literal {
        Lit::Int(_) => Ok(quote! { ::tablemap::Value::Integer(#literal) }),
        Lit::Float(_) => Ok(quote! { ::tablemap::Value::Real(#literal) }),
        Lit::Str(s) => Ok(quote! { ::tablemap::Value::Text(::std::string::String::from(#s)) }),
        Lit::Bool(b) => Ok(quote! { ::tablemap::Value::Boolean(#b) }),
        _ => Err(syn::Error::new(
            literal.span(),
            "default must be an integer, float, string or bool literal",
        )),
    }
}
