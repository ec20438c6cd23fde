//! The audit pipeline.
//!
//! Three layers, each built on the one before it:
//!
//! 1. [`Auditor::list_stacks`] pages through the listing endpoint of one
//!    region.
//! 2. [`Auditor::get_templates`] fetches, filters and sorts the templates of
//!    those stacks through a per-region work queue.
//! 3. [`Auditor::get_world_wide_templates`] runs step 2 for every configured
//!    region through a second, independent work queue and concatenates the
//!    results in region order.

mod fetcher;
mod lister;
mod world;

pub use lister::stack_pages;

use std::sync::Arc;

use crate::conditions::Conditions;
use crate::config::AuditConfig;
use crate::core::TemplateRecord;
use crate::errors::Result;
use crate::provider::CloudFormationApi;

/// Runs audits against a [`CloudFormationApi`].
///
/// An auditor holds no per-call state; one instance can serve any number of
/// concurrent audits.
#[derive(Clone)]
pub struct Auditor {
    api: Arc<dyn CloudFormationApi>,
    config: AuditConfig,
}

impl Auditor {
    /// Creates an auditor with the default configuration.
    #[must_use]
    pub fn new(api: Arc<dyn CloudFormationApi>) -> Self {
        Self {
            api,
            config: AuditConfig::default(),
        }
    }

    /// Creates an auditor with a validated configuration.
    pub fn with_config(api: Arc<dyn CloudFormationApi>, config: AuditConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { api, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }
}

impl std::fmt::Debug for Auditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auditor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Audits one region with the default configuration.
pub async fn get_templates(
    api: Arc<dyn CloudFormationApi>,
    region: &str,
    conditions: &Conditions,
) -> Result<Vec<TemplateRecord>> {
    Auditor::new(api).get_templates(region, conditions).await
}

/// Audits every catalog region with the default configuration.
pub async fn get_world_wide_templates(
    api: Arc<dyn CloudFormationApi>,
    conditions: &Conditions,
) -> Result<Vec<TemplateRecord>> {
    Auditor::new(api).get_world_wide_templates(conditions).await
}
