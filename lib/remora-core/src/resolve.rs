//! URL resolution: merging call and client-default query parameters.

use crate::{FlatParams, Result};

/// Resolves `url` against call-specific and client-default parameters.
///
/// The call parameters *replace* any query already present on `url`;
/// the base (client-default) parameters are then appended — with `?` if
/// the resolved URL still has no query component, `&` otherwise.
///
/// The two sets are concatenated, never merged: a key present in both
/// appears twice in the final URL, call value first. That is the
/// documented contract, not an accident — there is no dedup rule.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidUrl`] if `url` cannot be parsed.
///
/// # Example
///
/// ```
/// use remora_core::{FlatParams, resolve};
///
/// let mut call = FlatParams::new();
/// call.append("b", "2");
/// let mut base = FlatParams::new();
/// base.append("a", "1");
///
/// let resolved = resolve("http://h/p", &call, &base).expect("resolve");
/// assert_eq!(resolved, "http://h/p?b=2&a=1");
/// ```
pub fn resolve(url: &str, call: &FlatParams, base: &FlatParams) -> Result<String> {
    let mut url = url::Url::parse(url)?;

    let call_query = call.encode();
    url.set_query(if call_query.is_empty() {
        None
    } else {
        Some(&call_query)
    });

    let base_query = base.encode();
    let resolved = String::from(url);
    if base_query.is_empty() {
        Ok(resolved)
    } else if call_query.is_empty() {
        Ok(format!("{resolved}?{base_query}"))
    } else {
        Ok(format!("{resolved}&{base_query}"))
    }
}
