//! Procedural macros for actor-testkit
//!
//! This crate provides the `#[actor_testkit::test]` attribute macro for
//! writing async actor tests with scheduling metadata applied.
//!
//! # Example
//!
//! ```rust,ignore
//! use actor_testkit::prelude::*;
//!
//! #[actor_testkit::test(timeout = 30, sequential = true)]
//! async fn my_test() {
//!     // runs alone, aborted if it outlives 30 seconds
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, Ident, ItemFn, Lit, Token,
};

/// Configuration options for the test macro.
#[derive(Default)]
struct TestConfig {
    /// Per-test timeout override in seconds.
    timeout_secs: Option<u64>,
    /// Whether the test must not overlap other sequential tests.
    sequential: bool,
    /// Flavor for the tokio runtime ("current_thread" or "multi_thread").
    flavor: Option<String>,
}

impl Parse for TestConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut config = TestConfig::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "timeout" => {
                    let lit: Lit = input.parse()?;
                    if let Lit::Int(i) = lit {
                        config.timeout_secs = Some(i.base10_parse()?);
                    }
                }
                "sequential" => {
                    let lit: Lit = input.parse()?;
                    if let Lit::Bool(b) = lit {
                        config.sequential = b.value();
                    }
                }
                "flavor" => {
                    let lit: Lit = input.parse()?;
                    if let Lit::Str(s) = lit {
                        config.flavor = Some(s.value());
                    }
                }
                _ => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {ident}"),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(config)
    }
}

/// Test attribute macro for async actor tests.
///
/// Wraps the test in `#[tokio::test]` and applies the scheduling
/// metadata the runner would otherwise read from a
/// `TestRegistration`:
///
/// - `timeout = N` - abort the test after `N` seconds (the override is
///   advisory in registration records; here the generated wrapper
///   enforces it)
/// - `sequential = true` - take the process-wide sequential guard
///   before the body runs, so marked tests never overlap
/// - `flavor = "multi_thread"` - tokio runtime flavor
///
/// # Example
///
/// ```rust,ignore
/// #[actor_testkit::test(timeout = 30)]
/// async fn stops_all_actors() {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let config = parse_macro_input!(attr as TestConfig);
    let input = parse_macro_input!(item as ItemFn);

    expand_test(&config, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_test(config: &TestConfig, input: &ItemFn) -> syn::Result<TokenStream2> {
    let name = &input.sig.ident;
    let body = &input.block;
    let attrs = &input.attrs;
    let vis = &input.vis;

    if input.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            &input.sig,
            "test function must be async",
        ));
    }
    if !input.sig.inputs.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.sig.inputs,
            "test function must take no arguments",
        ));
    }

    let guard = if config.sequential {
        quote! {
            let _sequential = ::actor_testkit::schedule::sequential_guard();
        }
    } else {
        quote! {}
    };

    let run = if let Some(secs) = config.timeout_secs {
        quote! {
            ::tokio::time::timeout(
                ::std::time::Duration::from_secs(#secs),
                async move #body,
            )
            .await
            .unwrap_or_else(|_| panic!("test timed out after {}s", #secs))
        }
    } else {
        quote! {
            async move #body.await
        }
    };

    let flavor = config.flavor.as_deref().unwrap_or("current_thread");
    let test_attr = match flavor {
        "multi_thread" => quote! { #[::tokio::test(flavor = "multi_thread")] },
        "current_thread" => quote! { #[::tokio::test] },
        other => {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                format!("unsupported flavor: {other}. Use \"current_thread\" or \"multi_thread\""),
            ));
        }
    };

    Ok(quote! {
        #test_attr
        #(#attrs)*
        #vis async fn #name() {
            #guard
            #run
        }
    })
}

#[cfg(test)]
mod tests {
    use super::TestConfig;

    #[::core::prelude::v1::test]
    fn test_config_parse_empty() {
        let config: TestConfig = syn::parse_str("").unwrap();
        assert!(config.timeout_secs.is_none());
        assert!(!config.sequential);
        assert!(config.flavor.is_none());
    }

    #[::core::prelude::v1::test]
    fn test_config_parse_timeout() {
        let config: TestConfig = syn::parse_str("timeout = 30").unwrap();
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[::core::prelude::v1::test]
    fn test_config_parse_multiple() {
        let config: TestConfig =
            syn::parse_str("timeout = 30, sequential = true, flavor = \"multi_thread\"").unwrap();
        assert_eq!(config.timeout_secs, Some(30));
        assert!(config.sequential);
        assert_eq!(config.flavor, Some("multi_thread".to_string()));
    }
}
