//! The provider interface the auditor consumes.
//!
//! The auditor never talks to the network itself; it drives an
//! implementation of [`CloudFormationApi`]. Enable the `aws` feature for an
//! implementation backed by the AWS SDK.

#[cfg(feature = "aws")]
mod aws;

#[cfg(feature = "aws")]
pub use aws::AwsCloudFormation;

use async_trait::async_trait;

use crate::core::{StackPage, StackStatus, TemplateStage};
use crate::errors::ProviderError;

/// Request/response access to the stack listing and template endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CloudFormationApi: Send + Sync {
    /// Fetches one page of stack summaries matching `status_filter`.
    ///
    /// `next_token` is `None` for the first page and the previous page's
    /// continuation token afterwards.
    async fn list_stacks_page(
        &self,
        region: &str,
        status_filter: &[StackStatus],
        next_token: Option<String>,
    ) -> Result<StackPage, ProviderError>;

    /// Fetches the template body of one stack.
    ///
    /// `Ok(None)` means the provider answered without a body.
    async fn get_template(
        &self,
        region: &str,
        stack_name: &str,
        stage: TemplateStage,
    ) -> Result<Option<String>, ProviderError>;
}
