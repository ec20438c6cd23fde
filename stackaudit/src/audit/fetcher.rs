//! Template retrieval for one region.

use tracing::{debug, info, instrument, trace};

use super::Auditor;
use crate::conditions::Conditions;
use crate::core::{sort_records, StackSummary, TemplateRecord, TemplateStage};
use crate::errors::{AuditError, Operation, Result};
use crate::filter::TemplateFilter;
use crate::queue::WorkQueue;
use crate::runtime::run_with_timeout;

impl Auditor {
    /// Retrieves the templates of every stack in `region` matching
    /// `conditions`, sorted by `"{stack_name}-{region}"`.
    ///
    /// Template requests go through a queue limited to
    /// `template_concurrency` requests at a time. Stacks whose template is
    /// denied by the provider, absent, or rejected by the filter are left
    /// out. Any other provider error, and any filter error, fails the call.
    /// The filter only sees non-empty bodies, so an empty or absent body is
    /// dropped without consulting it.
    #[instrument(skip_all, fields(region = %region, stage = %conditions.stage()))]
    pub async fn get_templates(
        &self,
        region: &str,
        conditions: &Conditions,
    ) -> Result<Vec<TemplateRecord>> {
        let summaries = self.list_stacks(region, conditions.statuses()).await?;
        let queue = WorkQueue::new(format!("templates:{region}"), self.config.template_concurrency)?;
        let stage = conditions.stage();
        let filter = conditions.template_filter();

        let bodies = queue
            .run_all(
                summaries
                    .iter()
                    .map(|summary| self.check_template(region, summary, stage, filter)),
            )
            .await?;

        let mut records: Vec<TemplateRecord> = summaries
            .into_iter()
            .zip(bodies)
            .filter_map(|(summary, body)| {
                body.and_then(|body| TemplateRecord::new(body, summary, region))
            })
            .collect();
        sort_records(&mut records);

        info!(records = records.len(), "Region audited");
        Ok(records)
    }

    /// Fetches and filters one template. `Ok(None)` means "no result".
    async fn check_template(
        &self,
        region: &str,
        summary: &StackSummary,
        stage: TemplateStage,
        filter: &TemplateFilter,
    ) -> Result<Option<String>> {
        let stack_name = summary.stack_name.as_str();
        let timeout = self.config.request_timeout();

        let fetched = run_with_timeout(timeout, self.api.get_template(region, stack_name, stage))
            .await
            .ok_or_else(|| {
                AuditError::timeout(
                    region,
                    Operation::GetTemplate,
                    timeout.map_or(0.0, |d| d.as_secs_f64()),
                )
            })?;

        let body = match fetched {
            Ok(Some(body)) if !body.is_empty() => body,
            Ok(_) => {
                debug!(stack = stack_name, "No template body");
                return Ok(None);
            }
            Err(err) if err.is_access_denied() => {
                trace!(stack = stack_name, "Template access denied");
                return Ok(None);
            }
            Err(err) => return Err(AuditError::transport(region, Operation::GetTemplate, err)),
        };

        let accepted = filter
            .accepts(&body)
            .await
            .map_err(|source| AuditError::filter(region, stack_name, source))?;

        debug!(stack = stack_name, accepted, "Template checked");
        Ok(accepted.then_some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuditConfig;
    use crate::errors::{FilterError, ProviderError};
    use crate::testing::{record_keys, FakeCloudFormation};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    const REGION: &str = "us-east-1";

    #[tokio::test]
    async fn test_access_denied_is_suppressed() {
        let fake = FakeCloudFormation::new()
            .with_stack(REGION, "A", Err(ProviderError::access_denied("denied")))
            .with_stack(REGION, "B", Ok("Resources: {}".to_string()));

        let records = Auditor::new(Arc::new(fake))
            .get_templates(REGION, &Conditions::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].summary().stack_name, "B");
        assert_eq!(records[0].template_body(), "Resources: {}");
        assert_eq!(records[0].region(), REGION);
    }

    #[tokio::test]
    async fn test_other_errors_propagate() {
        let fake = FakeCloudFormation::new()
            .with_stack(REGION, "good", Ok("{}".to_string()))
            .with_stack(REGION, "bad", Err(ProviderError::new("ValidationError", "gone")))
            .with_stack(REGION, "later", Ok("{}".to_string()));

        let err = Auditor::new(Arc::new(fake))
            .get_templates(REGION, &Conditions::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuditError::Transport { operation: Operation::GetTemplate, .. }
        ));
        assert_eq!(err.provider_error().unwrap().code, "ValidationError");
    }

    #[tokio::test]
    async fn test_records_are_sorted() {
        let fake = FakeCloudFormation::new()
            .with_stack(REGION, "zeta", Ok("{}".to_string()))
            .with_stack(REGION, "alpha", Ok("{}".to_string()));

        let records = Auditor::new(Arc::new(fake))
            .get_templates(REGION, &Conditions::new())
            .await
            .unwrap();

        assert_eq!(record_keys(&records), vec!["alpha-us-east-1", "zeta-us-east-1"]);
    }

    #[tokio::test]
    async fn test_sync_filter_excludes() {
        let fake = FakeCloudFormation::new()
            .with_stack(REGION, "lambda", Ok("Type: AWS::Lambda::Function".to_string()))
            .with_stack(REGION, "bucket", Ok("Type: AWS::S3::Bucket".to_string()));
        let conditions = Conditions::new().with_filter_fn(|body| body.contains("Lambda"));

        let records = Auditor::new(Arc::new(fake))
            .get_templates(REGION, &conditions)
            .await
            .unwrap();

        assert_eq!(record_keys(&records), vec!["lambda-us-east-1"]);
    }

    #[tokio::test]
    async fn test_async_true_filter_keeps_everything() {
        let fake = FakeCloudFormation::new()
            .with_stack(REGION, "one", Ok("{}".to_string()))
            .with_stack(REGION, "two", Ok("{}".to_string()));
        let conditions = Conditions::new().with_async_filter(|_| async {
            tokio::time::sleep(Duration::from_millis(2)).await;
            Ok(true)
        });

        let records = Auditor::new(Arc::new(fake))
            .get_templates(REGION, &conditions)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_filter_error_propagates() {
        let fake = FakeCloudFormation::new().with_stack(REGION, "broken", Ok("{".to_string()));
        let conditions = Conditions::new()
            .with_async_filter(|_| async { Err(FilterError::new("unparseable template")) });

        let err = Auditor::new(Arc::new(fake))
            .get_templates(REGION, &conditions)
            .await
            .unwrap_err();

        match err {
            AuditError::FilterPredicate { stack_name, source, .. } => {
                assert_eq!(stack_name, "broken");
                assert_eq!(source.message, "unparseable template");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_and_missing_bodies_are_dropped() {
        let fake = FakeCloudFormation::new()
            .with_stack(REGION, "empty", Ok(String::new()))
            .with_missing_body(REGION, "missing")
            .with_stack(REGION, "present", Ok("{}".to_string()));

        let records = Auditor::new(Arc::new(fake))
            .get_templates(REGION, &Conditions::new())
            .await
            .unwrap();

        assert_eq!(record_keys(&records), vec!["present-us-east-1"]);
    }

    #[tokio::test]
    async fn test_filter_not_consulted_for_empty_bodies() {
        let fake = FakeCloudFormation::new()
            .with_stack(REGION, "empty", Ok(String::new()))
            .with_missing_body(REGION, "missing");
        let conditions = Conditions::new()
            .with_async_filter(|_| async { Err(FilterError::new("filter must not run")) });

        let records = Auditor::new(Arc::new(fake))
            .get_templates(REGION, &conditions)
            .await
            .unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_requested_stage_is_forwarded() {
        let fake = Arc::new(FakeCloudFormation::new().with_stack(REGION, "sam", Ok("{}".to_string())));
        let conditions = Conditions::new().with_stage(TemplateStage::Original);

        Auditor::new(fake.clone())
            .get_templates(REGION, &conditions)
            .await
            .unwrap();

        assert_eq!(
            fake.template_requests(),
            vec![(REGION.to_string(), "sam".to_string(), TemplateStage::Original)]
        );
    }

    #[tokio::test]
    async fn test_one_template_request_in_flight() {
        let mut fake = FakeCloudFormation::new().with_latency(Duration::from_millis(3));
        for i in 0..8 {
            fake = fake.with_stack(REGION, format!("stack-{i}"), Ok("{}".to_string()));
        }
        let fake = Arc::new(fake);

        let records = Auditor::new(fake.clone())
            .get_templates(REGION, &Conditions::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 8);
        assert_eq!(fake.peak_templates_in_flight(REGION), 1);
    }

    #[tokio::test]
    async fn test_requests_dispatched_in_listing_order() {
        let fake = Arc::new(
            FakeCloudFormation::new()
                .with_stack(REGION, "c", Ok("{}".to_string()))
                .with_stack(REGION, "a", Ok("{}".to_string()))
                .with_stack(REGION, "b", Ok("{}".to_string())),
        );

        Auditor::new(fake.clone())
            .get_templates(REGION, &Conditions::new())
            .await
            .unwrap();

        let order: Vec<_> = fake.template_requests().into_iter().map(|(_, name, _)| name).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_template_timeout_is_fatal() {
        let fake = FakeCloudFormation::new()
            .with_stack(REGION, "slow", Ok("{}".to_string()))
            .with_template_latency(Duration::from_millis(200));
        let config = AuditConfig::new().with_request_timeout(0.02);

        let err = Auditor::with_config(Arc::new(fake), config)
            .unwrap()
            .get_templates(REGION, &Conditions::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuditError::Timeout { operation: Operation::GetTemplate, .. }
        ));
    }

    #[tokio::test]
    async fn test_region_without_stacks() {
        let records = Auditor::new(Arc::new(FakeCloudFormation::new()))
            .get_templates("sa-east-1", &Conditions::new())
            .await
            .unwrap();

        assert!(records.is_empty());
    }
}
