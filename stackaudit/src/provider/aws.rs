//! [`CloudFormationApi`] backed by the AWS SDK.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_cloudformation::config::Region;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::{types, Client};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

use super::CloudFormationApi;
use crate::core::{StackPage, StackStatus, StackSummary, TemplateStage};
use crate::errors::ProviderError;

/// CloudFormation access through the AWS SDK, one client per region.
///
/// Credentials and every setting other than the region come from the shared
/// [`SdkConfig`].
pub struct AwsCloudFormation {
    shared: SdkConfig,
    clients: Mutex<HashMap<String, Client>>,
}

impl AwsCloudFormation {
    /// Creates a provider from an already loaded SDK configuration.
    #[must_use]
    pub fn new(shared: SdkConfig) -> Self {
        Self {
            shared,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Loads the SDK configuration from the environment.
    pub async fn from_env() -> Self {
        Self::new(aws_config::load_defaults(BehaviorVersion::latest()).await)
    }

    fn client(&self, region: &str) -> Client {
        self.clients
            .lock()
            .entry(region.to_string())
            .or_insert_with(|| {
                let config = aws_sdk_cloudformation::config::Builder::from(&self.shared)
                    .region(Region::new(region.to_string()))
                    .build();
                Client::from_conf(config)
            })
            .clone()
    }
}

impl std::fmt::Debug for AwsCloudFormation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCloudFormation")
            .field("regions", &self.clients.lock().keys().cloned().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl CloudFormationApi for AwsCloudFormation {
    async fn list_stacks_page(
        &self,
        region: &str,
        status_filter: &[StackStatus],
        next_token: Option<String>,
    ) -> Result<StackPage, ProviderError> {
        let filter = status_filter
            .iter()
            .map(|status| types::StackStatus::from(status.as_str()))
            .collect();

        let output = self
            .client(region)
            .list_stacks()
            .set_stack_status_filter(Some(filter))
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|err| provider_error(&err))?;

        Ok(StackPage {
            summaries: output.stack_summaries().iter().map(convert_summary).collect(),
            next_token: output.next_token().map(str::to_owned),
        })
    }

    async fn get_template(
        &self,
        region: &str,
        stack_name: &str,
        stage: TemplateStage,
    ) -> Result<Option<String>, ProviderError> {
        let output = self
            .client(region)
            .get_template()
            .stack_name(stack_name)
            .template_stage(types::TemplateStage::from(stage.as_str()))
            .send()
            .await
            .map_err(|err| provider_error(&err))?;

        Ok(output.template_body().map(str::to_owned))
    }
}

fn provider_error<E, R>(err: &SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().unwrap_or("Unknown");
    let message = err
        .message()
        .map_or_else(|| DisplayErrorContext(err).to_string(), str::to_owned);
    ProviderError::new(code, message)
}

fn convert_summary(summary: &types::StackSummary) -> StackSummary {
    let status = summary
        .stack_status()
        .map_or_else(|| StackStatus::Other(String::new()), |s| StackStatus::from(s.as_str()));

    StackSummary {
        stack_name: summary.stack_name().unwrap_or_default().to_string(),
        stack_status: status,
        stack_id: summary.stack_id().map(str::to_owned),
        template_description: summary.template_description().map(str::to_owned),
        stack_status_reason: summary.stack_status_reason().map(str::to_owned),
        creation_time: summary.creation_time().and_then(convert_time),
        last_updated_time: summary.last_updated_time().and_then(convert_time),
        deletion_time: summary.deletion_time().and_then(convert_time),
    }
}

fn convert_time(time: &aws_sdk_cloudformation::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}
