use std::fmt::Debug;

use crate::prelude::*;

/// Extracts the interaction reference out of the `interact.redirect` URI issued by the server.
///
/// How servers embed it is not standardized, hence the seam.
pub trait InteractRefStrategy: Debug + Send + Sync {
    fn interact_ref(&self, redirect: &str) -> RustyGnapResult<String>;
}

/// Takes everything after the last `/`, e.g. `4CF492ML` from `https://as.example/interact/4CF492ML`
#[derive(Debug, Default, Copy, Clone)]
pub struct LastPathSegment;

impl InteractRefStrategy for LastPathSegment {
    fn interact_ref(&self, redirect: &str) -> RustyGnapResult<String> {
        match redirect.rsplit_once('/') {
            Some((_, segment)) if !segment.is_empty() => Ok(segment.to_string()),
            _ => Err(RustyGnapError::InvalidInteractRedirect(redirect.to_string())),
        }
    }
}

/// Takes the value of a query parameter, e.g. `ref` in `https://as.example/interact?ref=4CF492ML`
#[derive(Debug, Clone)]
pub struct QueryParameter(pub String);

impl InteractRefStrategy for QueryParameter {
    fn interact_ref(&self, redirect: &str) -> RustyGnapResult<String> {
        let url = url::Url::parse(redirect)?;
        url.query_pairs()
            .find(|(k, _)| k == self.0.as_str())
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RustyGnapError::InvalidInteractRedirect(redirect.to_string()))
    }
}
