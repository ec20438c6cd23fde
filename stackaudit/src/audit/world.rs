//! World-wide aggregation across regions.

use tracing::{info, instrument};
use uuid::Uuid;

use super::Auditor;
use crate::conditions::Conditions;
use crate::core::{sort_records, TemplateRecord};
use crate::errors::Result;
use crate::queue::WorkQueue;

impl Auditor {
    /// Audits every configured region and concatenates the results.
    ///
    /// Regions go through their own queue, `region_concurrency` at a time,
    /// independent of each region's template queue. Each region's records
    /// stay sorted and regions appear in configured order, whatever order
    /// they finish in. With `global_sort` the merged list is re-sorted as a
    /// whole instead.
    ///
    /// The first failing region fails the whole audit; partial results are
    /// discarded.
    #[instrument(
        skip_all,
        fields(audit_id = %Uuid::new_v4(), regions = self.config.regions.len())
    )]
    pub async fn get_world_wide_templates(
        &self,
        conditions: &Conditions,
    ) -> Result<Vec<TemplateRecord>> {
        let queue = WorkQueue::new("regions", self.config.region_concurrency)?;

        let per_region = queue
            .run_all(
                self.config
                    .regions
                    .iter()
                    .map(|region| self.get_templates(region, conditions)),
            )
            .await?;

        let mut records: Vec<TemplateRecord> = per_region.into_iter().flatten().collect();
        if self.config.global_sort {
            sort_records(&mut records);
        }

        info!(records = records.len(), "World-wide audit complete");
        Ok(records)
    }
}
