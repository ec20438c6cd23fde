//! Template filters.
//!
//! Callers may filter with a plain function or with an asynchronous one.
//! Both are normalised into a predicate returning a boxed future, so the
//! fetcher awaits every filter the same way.

use futures::future::{self, BoxFuture, FutureExt};
use regex::Regex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::errors::FilterError;

/// Future returned by a normalised filter.
pub type FilterFuture = BoxFuture<'static, Result<bool, FilterError>>;

type Predicate = Arc<dyn Fn(&str) -> FilterFuture + Send + Sync>;

/// Decides whether a template belongs in the audit result.
#[derive(Clone)]
pub struct TemplateFilter {
    predicate: Option<Predicate>,
    description: String,
}

impl TemplateFilter {
    /// A filter that accepts every template.
    #[must_use]
    pub fn accept_all() -> Self {
        Self {
            predicate: None,
            description: "accept-all".to_string(),
        }
    }

    /// Wraps a synchronous predicate.
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Some(Arc::new(move |body: &str| {
                future::ready(Ok::<_, FilterError>(func(body))).boxed()
            })),
            description: "fn".to_string(),
        }
    }

    /// Wraps an asynchronous, fallible predicate.
    ///
    /// The predicate receives its own copy of the template body.
    pub fn from_async<F, Fut>(func: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, FilterError>> + Send + 'static,
    {
        Self {
            predicate: Some(Arc::new(move |body: &str| func(body.to_owned()).boxed())),
            description: "async-fn".to_string(),
        }
    }

    /// Accepts templates containing `needle`.
    #[must_use]
    pub fn contains(needle: impl Into<String>) -> Self {
        let needle = needle.into();
        let description = format!("contains({needle})");
        Self {
            description,
            ..Self::from_fn(move |body| body.contains(needle.as_str()))
        }
    }

    /// Accepts templates matching `pattern`.
    #[must_use]
    pub fn matches(pattern: Regex) -> Self {
        let description = format!("matches({})", pattern.as_str());
        Self {
            description,
            ..Self::from_fn(move |body| pattern.is_match(body))
        }
    }

    /// Whether this filter accepts everything without evaluating.
    #[must_use]
    pub fn is_accept_all(&self) -> bool {
        self.predicate.is_none()
    }

    /// Returns a short description of the filter.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Evaluates the filter against one template body.
    pub async fn accepts(&self, body: &str) -> Result<bool, FilterError> {
        match &self.predicate {
            Some(predicate) => predicate(body).await,
            None => Ok(true),
        }
    }
}

impl Default for TemplateFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl fmt::Debug for TemplateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateFilter")
            .field("description", &self.description)
            .finish()
    }
}
