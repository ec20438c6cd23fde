//! In-memory provider for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{StackPage, StackStatus, StackSummary, TemplateStage};
use crate::errors::ProviderError;
use crate::provider::CloudFormationApi;

/// What the fake answers for one stack's template.
#[derive(Debug, Clone)]
enum TemplateOutcome {
    Body(String),
    Missing,
    Error(ProviderError),
}

#[derive(Debug, Default)]
struct RegionData {
    summaries: Vec<StackSummary>,
    templates: HashMap<String, TemplateOutcome>,
    list_error: Option<ProviderError>,
    list_latency: Duration,
}

#[derive(Debug, Default)]
struct Gauges {
    templates_in_flight: HashMap<String, usize>,
    peak_templates: HashMap<String, usize>,
    region_activity: HashMap<String, usize>,
    active_regions: usize,
    peak_regions: usize,
}

impl Gauges {
    fn enter(&mut self, region: &str, template: bool) {
        let activity = self.region_activity.entry(region.to_string()).or_insert(0);
        *activity += 1;
        if *activity == 1 {
            self.active_regions += 1;
            self.peak_regions = self.peak_regions.max(self.active_regions);
        }

        if template {
            let current = self.templates_in_flight.entry(region.to_string()).or_insert(0);
            *current += 1;
            let peak = self.peak_templates.entry(region.to_string()).or_insert(0);
            *peak = (*peak).max(*current);
        }
    }

    fn exit(&mut self, region: &str, template: bool) {
        if let Some(activity) = self.region_activity.get_mut(region) {
            *activity -= 1;
            if *activity == 0 {
                self.active_regions -= 1;
            }
        }
        if template {
            if let Some(current) = self.templates_in_flight.get_mut(region) {
                *current -= 1;
            }
        }
    }
}

/// Leaves the gauges on drop, so abandoned requests are accounted for too.
struct InFlight {
    gauges: Arc<Mutex<Gauges>>,
    region: String,
    template: bool,
}

impl InFlight {
    fn enter(gauges: &Arc<Mutex<Gauges>>, region: &str, template: bool) -> Self {
        gauges.lock().enter(region, template);
        Self {
            gauges: gauges.clone(),
            region: region.to_string(),
            template,
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.gauges.lock().exit(&self.region, self.template);
    }
}

/// A recorded listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Region listed.
    pub region: String,
    /// Status filter sent.
    pub status_filter: Vec<StackStatus>,
    /// Continuation token sent.
    pub next_token: Option<String>,
}

/// A [`CloudFormationApi`] serving canned stacks and templates per region.
///
/// Listing order follows insertion order. Requests are recorded, and the
/// fake tracks how many template requests per region, and how many regions,
/// had requests in flight at once.
#[derive(Debug, Default)]
pub struct FakeCloudFormation {
    regions: HashMap<String, RegionData>,
    page_size: Option<usize>,
    latency: Duration,
    template_latency: Duration,
    list_requests: Mutex<Vec<ListRequest>>,
    template_requests: Mutex<Vec<(String, String, TemplateStage)>>,
    gauges: Arc<Mutex<Gauges>>,
}

impl FakeCloudFormation {
    /// Creates an empty fake: every region lists no stacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `CREATE_COMPLETE` stack and the answer to its template request.
    #[must_use]
    pub fn with_stack(
        self,
        region: impl Into<String>,
        stack_name: impl Into<String>,
        template: Result<String, ProviderError>,
    ) -> Self {
        let summary = StackSummary::new(stack_name, StackStatus::CreateComplete);
        self.with_summary(region, summary, template)
    }

    /// Adds a stack with a custom summary.
    #[must_use]
    pub fn with_summary(
        mut self,
        region: impl Into<String>,
        summary: StackSummary,
        template: Result<String, ProviderError>,
    ) -> Self {
        let outcome = match template {
            Ok(body) => TemplateOutcome::Body(body),
            Err(err) => TemplateOutcome::Error(err),
        };
        let data = self.regions.entry(region.into()).or_default();
        data.templates.insert(summary.stack_name.clone(), outcome);
        data.summaries.push(summary);
        self
    }

    /// Adds a stack whose template request answers without a body.
    #[must_use]
    pub fn with_missing_body(
        mut self,
        region: impl Into<String>,
        stack_name: impl Into<String>,
    ) -> Self {
        let summary = StackSummary::new(stack_name, StackStatus::CreateComplete);
        let data = self.regions.entry(region.into()).or_default();
        data.templates
            .insert(summary.stack_name.clone(), TemplateOutcome::Missing);
        data.summaries.push(summary);
        self
    }

    /// Makes every listing request for `region` fail.
    #[must_use]
    pub fn with_list_error(mut self, region: impl Into<String>, error: ProviderError) -> Self {
        self.regions.entry(region.into()).or_default().list_error = Some(error);
        self
    }

    /// Splits listings into pages of at most `size` summaries.
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size.max(1));
        self
    }

    /// Delays every request.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delays template requests on top of the common latency.
    #[must_use]
    pub fn with_template_latency(mut self, latency: Duration) -> Self {
        self.template_latency = latency;
        self
    }

    /// Delays listing requests for one region on top of the common latency.
    #[must_use]
    pub fn with_region_latency(mut self, region: impl Into<String>, latency: Duration) -> Self {
        self.regions.entry(region.into()).or_default().list_latency = latency;
        self
    }

    /// Returns every listing request made so far.
    #[must_use]
    pub fn list_requests(&self) -> Vec<ListRequest> {
        self.list_requests.lock().clone()
    }

    /// Returns every template request made so far, in dispatch order.
    #[must_use]
    pub fn template_requests(&self) -> Vec<(String, String, TemplateStage)> {
        self.template_requests.lock().clone()
    }

    /// Highest number of concurrent template requests seen for `region`.
    #[must_use]
    pub fn peak_templates_in_flight(&self, region: &str) -> usize {
        self.gauges
            .lock()
            .peak_templates
            .get(region)
            .copied()
            .unwrap_or(0)
    }

    /// Highest number of regions with requests in flight at once.
    #[must_use]
    pub fn peak_regions_in_flight(&self) -> usize {
        self.gauges.lock().peak_regions
    }

    async fn delay(latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl CloudFormationApi for FakeCloudFormation {
    async fn list_stacks_page(
        &self,
        region: &str,
        status_filter: &[StackStatus],
        next_token: Option<String>,
    ) -> Result<StackPage, ProviderError> {
        self.list_requests.lock().push(ListRequest {
            region: region.to_string(),
            status_filter: status_filter.to_vec(),
            next_token: next_token.clone(),
        });

        let _in_flight = InFlight::enter(&self.gauges, region, false);
        let data = self.regions.get(region);
        let region_latency = data.map_or(Duration::ZERO, |d| d.list_latency);
        Self::delay(self.latency + region_latency).await;

        let Some(data) = data else {
            return Ok(StackPage::default());
        };
        if let Some(err) = &data.list_error {
            return Err(err.clone());
        }

        let start = match next_token.as_deref() {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|offset| offset.parse::<usize>().ok())
                .ok_or_else(|| ProviderError::new("ValidationError", "Invalid NextToken"))?,
        };

        let matching: Vec<&StackSummary> = data
            .summaries
            .iter()
            .filter(|s| status_filter.contains(&s.stack_status))
            .collect();
        let end = self
            .page_size
            .map_or(matching.len(), |size| (start + size).min(matching.len()));
        let summaries = matching
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|s| (*s).clone())
            .collect();

        Ok(StackPage {
            summaries,
            next_token: (end < matching.len()).then(|| format!("page-{end}")),
        })
    }

    async fn get_template(
        &self,
        region: &str,
        stack_name: &str,
        stage: TemplateStage,
    ) -> Result<Option<String>, ProviderError> {
        self.template_requests
            .lock()
            .push((region.to_string(), stack_name.to_string(), stage));

        let _in_flight = InFlight::enter(&self.gauges, region, true);
        Self::delay(self.latency + self.template_latency).await;

        let outcome = self
            .regions
            .get(region)
            .and_then(|data| data.templates.get(stack_name));
        match outcome {
            Some(TemplateOutcome::Body(body)) => Ok(Some(body.clone())),
            Some(TemplateOutcome::Missing) => Ok(None),
            Some(TemplateOutcome::Error(err)) => Err(err.clone()),
            None => Err(ProviderError::new(
                "ValidationError",
                format!("Stack with id {stack_name} does not exist"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::default_status_filter;

    #[tokio::test]
    async fn test_fake_paginates_and_filters() {
        let fake = FakeCloudFormation::new()
            .with_stack("us-east-1", "a", Ok("{}".to_string()))
            .with_summary(
                "us-east-1",
                StackSummary::new("gone", StackStatus::DeleteFailed),
                Ok("{}".to_string()),
            )
            .with_stack("us-east-1", "b", Ok("{}".to_string()))
            .with_stack("us-east-1", "c", Ok("{}".to_string()))
            .with_page_size(2);

        let only_complete = [StackStatus::CreateComplete];
        let first = fake.list_stacks_page("us-east-1", &only_complete, None).await.unwrap();
        assert_eq!(first.summaries.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some("page-2"));

        let second = fake
            .list_stacks_page("us-east-1", &only_complete, first.next_token)
            .await
            .unwrap();
        assert_eq!(second.summaries.len(), 1);
        assert!(second.next_token.is_none());

        let everything = fake
            .list_stacks_page("us-east-1", &default_status_filter(), Some("page-2".into()))
            .await
            .unwrap();
        assert_eq!(everything.summaries.len(), 2);
        assert_eq!(fake.list_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_fake_rejects_bad_token() {
        let fake = FakeCloudFormation::new().with_stack("us-east-1", "a", Ok("{}".to_string()));
        let err = fake
            .list_stacks_page("us-east-1", &default_status_filter(), Some("bogus".into()))
            .await
            .unwrap_err();
        assert_eq!(err.code, "ValidationError");
    }

    #[tokio::test]
    async fn test_fake_template_outcomes() {
        let fake = FakeCloudFormation::new()
            .with_stack("eu-west-1", "ok", Ok("body".to_string()))
            .with_stack("eu-west-1", "denied", Err(ProviderError::access_denied("no")))
            .with_missing_body("eu-west-1", "blank");

        let stage = TemplateStage::Processed;
        assert_eq!(
            fake.get_template("eu-west-1", "ok", stage).await,
            Ok(Some("body".to_string()))
        );
        assert!(fake
            .get_template("eu-west-1", "denied", stage)
            .await
            .unwrap_err()
            .is_access_denied());
        assert_eq!(fake.get_template("eu-west-1", "blank", stage).await, Ok(None));
        assert!(fake.get_template("eu-west-1", "unknown", stage).await.is_err());
        assert_eq!(fake.template_requests().len(), 4);
        assert_eq!(fake.peak_templates_in_flight("eu-west-1"), 1);
    }
}
