//! Per-call audit conditions.

use regex::Regex;
use std::future::Future;

use crate::core::{StackStatus, TemplateStage};
use crate::errors::FilterError;
use crate::filter::TemplateFilter;

/// Criteria selecting which stacks and templates an audit returns.
///
/// With no conditions set, every stack in every known status is audited and
/// the processed template is returned.
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    statuses: Option<Vec<StackStatus>>,
    template_filter: TemplateFilter,
    stage: TemplateStage,
}

impl Conditions {
    /// Creates empty conditions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the audit to stacks in the given statuses.
    #[must_use]
    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StackStatus>,
    {
        self.statuses = Some(statuses.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the template filter.
    #[must_use]
    pub fn with_filter(mut self, filter: TemplateFilter) -> Self {
        self.template_filter = filter;
        self
    }

    /// Filters templates with a synchronous predicate.
    #[must_use]
    pub fn with_filter_fn<F>(self, func: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.with_filter(TemplateFilter::from_fn(func))
    }

    /// Filters templates with an asynchronous predicate.
    #[must_use]
    pub fn with_async_filter<F, Fut>(self, func: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, FilterError>> + Send + 'static,
    {
        self.with_filter(TemplateFilter::from_async(func))
    }

    /// Keeps templates matching a regular expression.
    #[must_use]
    pub fn with_pattern(self, pattern: Regex) -> Self {
        self.with_filter(TemplateFilter::matches(pattern))
    }

    /// Selects the template stage.
    #[must_use]
    pub fn with_stage(mut self, stage: TemplateStage) -> Self {
        self.stage = stage;
        self
    }

    /// Explicit status filter, if one was set.
    #[must_use]
    pub fn statuses(&self) -> Option<&[StackStatus]> {
        self.statuses.as_deref()
    }

    /// The template filter.
    #[must_use]
    pub fn template_filter(&self) -> &TemplateFilter {
        &self.template_filter
    }

    /// The template stage.
    #[must_use]
    pub fn stage(&self) -> TemplateStage {
        self.stage
    }
}
