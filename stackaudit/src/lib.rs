//! # Stackaudit
//!
//! Retrieves the templates of deployed CloudFormation stacks, one region at a
//! time or across the whole region catalog.
//!
//! - **Stack listing**: pages through every stack in a region, filtered by
//!   lifecycle status
//! - **Template fetching**: downloads each stack's template through a bounded
//!   work queue, skips stacks the caller may not read, and applies an optional
//!   synchronous or asynchronous template filter
//! - **World-wide aggregation**: audits many regions concurrently and merges
//!   the results in region catalog order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stackaudit::prelude::*;
//!
//! let api = Arc::new(AwsCloudFormation::from_env().await);
//! let conditions = Conditions::new()
//!     .with_statuses([StackStatus::CreateComplete, StackStatus::UpdateComplete])
//!     .with_filter_fn(|body| body.contains("AWS::Lambda::Function"));
//!
//! let records = Auditor::new(api).get_world_wide_templates(&conditions).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod audit;
pub mod conditions;
pub mod config;
pub mod core;
pub mod errors;
pub mod filter;
pub mod logging;
pub mod provider;
pub mod queue;
pub mod runtime;
pub mod testing;

pub use audit::{get_templates, get_world_wide_templates, Auditor};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::audit::{get_templates, get_world_wide_templates, stack_pages, Auditor};
    pub use crate::conditions::Conditions;
    pub use crate::config::AuditConfig;
    pub use crate::core::{
        catalog_regions, sort_records, StackStatus, StackSummary, TemplateRecord, TemplateStage,
        REGION_CATALOG,
    };
    pub use crate::errors::{AuditError, FilterError, ProviderError, Result};
    pub use crate::filter::TemplateFilter;
    pub use crate::provider::CloudFormationApi;
    #[cfg(feature = "aws")]
    pub use crate::provider::AwsCloudFormation;
}
