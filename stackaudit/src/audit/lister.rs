//! Stack listing for one region.

use futures::stream::{self, Stream, TryStreamExt};
use std::time::Duration;
use tracing::{debug, instrument};

use super::Auditor;
use crate::core::{default_status_filter, StackStatus, StackSummary};
use crate::errors::{AuditError, Operation, Result};
use crate::provider::CloudFormationApi;
use crate::runtime::run_with_timeout;

enum Cursor {
    First,
    Next(String),
    Done,
}

/// Lazily requests listing pages in order until the provider stops handing
/// out continuation tokens.
///
/// Each item is one page of summaries. The first failing page ends the
/// stream with that error.
pub fn stack_pages<'a>(
    api: &'a dyn CloudFormationApi,
    region: &'a str,
    status_filter: &'a [StackStatus],
    request_timeout: Option<Duration>,
) -> impl Stream<Item = Result<Vec<StackSummary>>> + Send + 'a {
    stream::try_unfold(Cursor::First, move |cursor| async move {
        let next_token = match cursor {
            Cursor::Done => return Ok(None),
            Cursor::First => None,
            Cursor::Next(token) => Some(token),
        };

        let page = run_with_timeout(
            request_timeout,
            api.list_stacks_page(region, status_filter, next_token),
        )
        .await
        .ok_or_else(|| {
            AuditError::timeout(
                region,
                Operation::ListStacks,
                request_timeout.map_or(0.0, |d| d.as_secs_f64()),
            )
        })?
        .map_err(|source| AuditError::transport(region, Operation::ListStacks, source))?;

        let cursor = match page.next_token {
            Some(token) if !token.is_empty() => Cursor::Next(token),
            _ => Cursor::Done,
        };
        Ok(Some((page.summaries, cursor)))
    })
}

impl Auditor {
    /// Lists every stack in `region` whose status is in `statuses`.
    ///
    /// Without a filter, stacks in any known lifecycle status are listed.
    /// Fails with the first page's transport error; nothing is retried.
    #[instrument(skip_all, fields(region = %region))]
    pub async fn list_stacks(
        &self,
        region: &str,
        statuses: Option<&[StackStatus]>,
    ) -> Result<Vec<StackSummary>> {
        let default_filter;
        let status_filter = match statuses {
            Some(filter) => filter,
            None => {
                default_filter = default_status_filter();
                &default_filter
            }
        };

        let summaries = stack_pages(
            self.api.as_ref(),
            region,
            status_filter,
            self.config.request_timeout(),
        )
        .try_fold(Vec::new(), |mut acc, page| async move {
            debug!(page_size = page.len(), total = acc.len() + page.len(), "Listed page");
            acc.extend(page);
            Ok(acc)
        })
        .await?;

        debug!(stacks = summaries.len(), "Listing complete");
        Ok(summaries)
    }
}
