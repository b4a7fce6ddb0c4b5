use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, FieldsNamed, Ident, Type, Variant};

const MACRO_NAME: &str = "mgen_error";

/// What the expansion needs to know about one enum variant.
struct VariantModel<'a> {
    ident: &'a Ident,
    rule: String,
    source: Option<(&'a Ident, &'a Type)>,
    has_context: bool,
    cfg_attrs: Vec<&'a Attribute>,
}

struct ErrorModel<'a> {
    name: &'a Ident,
    ext_trait: Ident,
    variants: Vec<VariantModel<'a>>,
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(
            &input.ident,
            format!("{MACRO_NAME} can only be applied to enums"),
        )
        .to_compile_error();
    };

    let variants = match data.variants.iter().map(VariantModel::parse).collect::<Result<_, _>>()
    {
        Ok(variants) => variants,
        Err(err) => return err.to_compile_error(),
    };
    let model =
        ErrorModel { name: &input.ident, ext_trait: format_ident!("{}Ext", input.ident), variants };
    if let Err(err) = model.validate() {
        return err.to_compile_error();
    }

    let derives = missing_derives(&input);
    let ext_trait = model.ext_trait_impl();
    let from_impls = model.variants.iter().filter_map(|v| model.source_impls(v));
    let internal_impls = model.internal_impls();
    let rule_impl = model.rule_impl();

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #ext_trait
        #(#from_impls)*
        #internal_impls
        #rule_impl

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

impl<'a> VariantModel<'a> {
    fn parse(variant: &'a Variant) -> syn::Result<Self> {
        let Fields::Named(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                variant,
                format!("{MACRO_NAME} requires named fields so source/context can be attached"),
            ));
        };

        let has_context = context_field(fields)?.is_some();
        let source = fields.named.iter().find(|field| is_source_field(field)).and_then(|field| {
            field.ident.as_ref().map(|ident| (ident, &field.ty))
        });

        Ok(Self {
            ident: &variant.ident,
            rule: snake_case(&variant.ident.to_string()),
            source,
            has_context,
            cfg_attrs: variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).collect(),
        })
    }
}

impl ErrorModel<'_> {
    fn validate(&self) -> syn::Result<()> {
        for variant in &self.variants {
            if variant.source.is_some() && !variant.has_context {
                return Err(syn::Error::new_spanned(
                    variant.ident,
                    format!(
                        "{MACRO_NAME} requires `context: Option<Cow<'static, str>>` for variants with a source"
                    ),
                ));
            }
        }
        Ok(())
    }

    fn ext_trait_impl(&self) -> TokenStream {
        let name = self.name;
        let ext_trait = &self.ext_trait;
        let arms = self.variants.iter().filter(|v| v.has_context).map(|v| {
            let cfg_attrs = &v.cfg_attrs;
            let ident = v.ident;
            quote! { #(#cfg_attrs)* #name::#ident { context: c, .. } => *c = Some(context.into()), }
        });

        quote! {
            pub trait #ext_trait<T> {
                /// Attaches a human readable note to the error, if any.
                fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
            }

            #[automatically_derived]
            impl<T> #ext_trait<T> for Result<T, #name> {
                #[inline]
                fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                    self.map_err(|mut e| {
                        #[allow(unreachable_patterns)]
                        match &mut e {
                            #( #arms )*
                            _ => {}
                        }
                        e
                    })
                }
            }
        }
    }

    fn source_impls(&self, variant: &VariantModel<'_>) -> Option<TokenStream> {
        if variant.ident == "Internal" {
            return None;
        }
        let (field, source_ty) = variant.source?;
        let name = self.name;
        let ext_trait = &self.ext_trait;
        let ident = variant.ident;
        let cfg_attrs = &variant.cfg_attrs;

        Some(quote! {
            #(#cfg_attrs)*
            #[automatically_derived]
            impl From<#source_ty> for #name {
                #[inline]
                fn from(#field: #source_ty) -> Self { Self::#ident { #field, context: None } }
            }

            #(#cfg_attrs)*
            impl<T> #ext_trait<T> for std::result::Result<T, #source_ty> {
                #[inline]
                fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                    self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
                }
            }
        })
    }

    fn internal_impls(&self) -> TokenStream {
        let Some(internal) = self.variants.iter().find(|v| v.ident == "Internal") else {
            return quote!();
        };
        let name = self.name;
        let cfg_attrs = &internal.cfg_attrs;

        quote! {
            #(#cfg_attrs)*
            impl From<&'static str> for #name {
                #[inline]
                fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
            }
            #(#cfg_attrs)*
            impl From<String> for #name {
                #[inline]
                fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
            }
        }
    }

    fn rule_impl(&self) -> TokenStream {
        let name = self.name;
        let arms = self.variants.iter().map(|v| {
            let cfg_attrs = &v.cfg_attrs;
            let ident = v.ident;
            let rule = &v.rule;
            quote! { #(#cfg_attrs)* Self::#ident { .. } => #rule, }
        });

        quote! {
            #[automatically_derived]
            impl #name {
                /// Stable snake_case identifier of the rule that produced this error.
                #[must_use]
                pub const fn rule(&self) -> &'static str {
                    match self {
                        #( #arms )*
                    }
                }
            }
        }
    }
}

fn context_field(fields: &FieldsNamed) -> syn::Result<Option<&syn::Field>> {
    let Some(field) =
        fields.named.iter().find(|field| field.ident.as_ref().is_some_and(|i| i == "context"))
    else {
        return Ok(None);
    };
    if is_context_type(&field.ty) {
        Ok(Some(field))
    } else {
        Err(syn::Error::new_spanned(&field.ty, "context field must be Option<Cow<'static, str>>"))
    }
}

fn is_source_field(field: &syn::Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "source")
        || field
            .attrs
            .iter()
            .any(|attr| attr.path().is_ident("source") || attr.path().is_ident("from"))
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let mut present = FxHashSet::default();
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                present.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    let mut derives = Vec::new();
    if !present.contains("Debug") {
        derives.push(quote! { Debug });
    }
    if !present.contains("Error") {
        derives.push(quote! { ::thiserror::Error });
    }
    if derives.is_empty() { quote!() } else { quote! { #[derive(#(#derives),*)] } }
}

fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Matches `Option<Cow<'static, str>>`, with or without path prefixes.
fn is_context_type(ty: &Type) -> bool {
    let Some(option) = last_segment(ty).filter(|seg| seg.ident == "Option") else {
        return false;
    };
    let Some(syn::GenericArgument::Type(inner)) = angle_args(option).and_then(|args| args.first())
    else {
        return false;
    };
    let Some(cow) = last_segment(inner).filter(|seg| seg.ident == "Cow") else {
        return false;
    };
    let Some(args) = angle_args(cow) else {
        return false;
    };
    let mut args = args.iter();
    let lifetime_ok =
        matches!(args.next(), Some(syn::GenericArgument::Lifetime(lt)) if lt.ident == "static");
    let str_ok = match args.next() {
        Some(syn::GenericArgument::Type(ty)) => {
            last_segment(ty).is_some_and(|seg| seg.ident == "str")
        },
        _ => false,
    };
    lifetime_ok && str_ok
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    let Type::Path(path) = ty else {
        return None;
    };
    path.path.segments.last()
}

fn angle_args(
    segment: &syn::PathSegment,
) -> Option<&syn::punctuated::Punctuated<syn::GenericArgument, syn::token::Comma>> {
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    Some(&args.args)
}
