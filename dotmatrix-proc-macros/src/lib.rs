extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Ident};

fn parse_fieldless_variants(ast: &DeriveInput, derive_name: &str) -> Vec<Ident> {
    let type_name = &ast.ident;

    let Data::Enum(data) = &ast.data
    else {
        panic!("{derive_name} can only be derived for enums; {type_name} is not an enum");
    };

    data.variants
        .iter()
        .map(|variant| {
            assert!(
                variant.fields.is_empty(),
                "{derive_name} requires all variants to be fieldless; {type_name}::{} has fields",
                variant.ident
            );
            variant.ident.clone()
        })
        .collect()
}

/// Implement the `std::fmt::Display` trait for an enum with only fieldless variants, formatting
/// each variant as its name.
#[proc_macro_derive(EnumDisplay)]
pub fn enum_display(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse(input).expect("unable to parse input");

    let name = &ast.ident;
    let variants = parse_fieldless_variants(&ast, "EnumDisplay");

    let match_arms = variants.iter().map(|variant| {
        let variant_str = variant.to_string();
        quote! {
            Self::#variant => write!(f, #variant_str)
        }
    });

    let gen = quote! {
        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    #(#match_arms,)*
                }
            }
        }
    };

    gen.into()
}

/// Implement the `std::str::FromStr` trait for an enum with only fieldless variants, matching
/// variant names case-insensitively. `FromStr::Err` is `String`.
#[proc_macro_derive(EnumFromStr)]
pub fn enum_from_str(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse(input).expect("unable to parse input");

    let name = &ast.ident;
    let variants = parse_fieldless_variants(&ast, "EnumFromStr");

    let match_arms = variants.iter().map(|variant| {
        let variant_lowercase = variant.to_string().to_ascii_lowercase();
        quote! {
            #variant_lowercase => Ok(Self::#variant)
        }
    });

    let err_fmt_string = format!("invalid {name} string: '{{}}'");
    let gen = quote! {
        impl std::str::FromStr for #name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    #(#match_arms,)*
                    _ => Err(format!(#err_fmt_string, s))
                }
            }
        }
    };

    gen.into()
}

/// Implement `serde::Deserialize` for a type by parsing a string through its `std::str::FromStr`
/// implementation.
#[proc_macro_derive(StrDeserialize)]
pub fn str_deserialize(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse(input).expect("unable to parse input");

    let ident = &ast.ident;

    let visitor_name = format_ident!("__{}StrVisitor", ident);
    let expecting_fmt_string = format!("a string representing a {ident}");
    let gen = quote! {
        struct #visitor_name;

        impl<'de> serde::de::Visitor<'de> for #visitor_name {
            type Value = #ident;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, #expecting_fmt_string)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        impl<'de> serde::Deserialize<'de> for #ident {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_str(#visitor_name)
            }
        }
    };

    gen.into()
}
