//! Test fixtures for audits.

use crate::core::{StackStatus, StackSummary, TemplateRecord};

use super::FakeCloudFormation;

/// A `CREATE_COMPLETE` summary.
#[must_use]
pub fn summary(stack_name: &str) -> StackSummary {
    StackSummary::new(stack_name, StackStatus::CreateComplete)
}

/// A record for `stack_name` in `region`.
///
/// # Panics
///
/// Panics when `template_body` is empty.
#[must_use]
pub fn record(stack_name: &str, region: &str, template_body: &str) -> TemplateRecord {
    TemplateRecord::new(template_body, summary(stack_name), region)
        .unwrap_or_else(|| panic!("fixture template for {stack_name} is empty"))
}

/// A provider with `stacks_per_region` stacks in each region.
///
/// Stacks are named `stack-{i}` and their templates read
/// `Resources: {region}/{i}`.
#[must_use]
pub fn sample_world<S: AsRef<str>>(regions: &[S], stacks_per_region: usize) -> FakeCloudFormation {
    let mut fake = FakeCloudFormation::new();
    for region in regions {
        let region = region.as_ref();
        for i in 0..stacks_per_region {
            fake = fake.with_stack(
                region,
                format!("stack-{i}"),
                Ok(format!("Resources: {region}/{i}")),
            );
        }
    }
    fake
}
