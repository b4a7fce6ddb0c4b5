#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared across the workspace. Currently this is the error
//! enum attribute used by every crate that can fail.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! mgen-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro that turns an enum into a workspace error type.
///
/// # What it generates
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * A `<Name>Ext` trait with a `.context(..)` adapter for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant holding a `source` field.
/// * `From<Source>` for every variant holding a `source` field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }` variant
///   exists.
/// * `Name::rule()`, returning the snake_case variant name. Fatal errors surface it so the
///   caller can tell which rule rejected the input.
/// * A module-local `format_context` helper for `#[error(..)]` strings.
///
/// Every variant must use named fields. Variants with a `source` must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use mgen_derive::mgen_error;
/// use std::borrow::Cow;
///
/// #[mgen_error]
/// pub enum KernelError {
///     #[error("Manifest decode error{}: {source}", format_context(.context))]
///     Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn manifest(raw: &str) -> Result<serde_json::Value, KernelError> {
///     serde_json::from_str(raw).context("Reading composer.json")
/// }
///
/// assert_eq!(KernelError::from("boom").rule(), "internal");
/// ```
#[proc_macro_attribute]
pub fn mgen_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
