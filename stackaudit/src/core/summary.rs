//! Stack summaries returned by the listing endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StackStatus;

/// Summary of one deployed stack, as reported by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackSummary {
    /// Stack name, unique within a region.
    pub stack_name: String,
    /// Current lifecycle status.
    pub stack_status: StackStatus,
    /// Unique stack identifier (ARN).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    /// Description from the stack's template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_description: Option<String>,
    /// Reason attached to the current status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_status_reason: Option<String>,
    /// When the stack was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    /// When the stack was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<DateTime<Utc>>,
    /// When the stack was deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_time: Option<DateTime<Utc>>,
}

impl StackSummary {
    /// Creates a summary with only the required fields.
    #[must_use]
    pub fn new(stack_name: impl Into<String>, stack_status: impl Into<StackStatus>) -> Self {
        Self {
            stack_name: stack_name.into(),
            stack_status: stack_status.into(),
            stack_id: None,
            template_description: None,
            stack_status_reason: None,
            creation_time: None,
            last_updated_time: None,
            deletion_time: None,
        }
    }

    /// Sets the stack identifier.
    #[must_use]
    pub fn with_stack_id(mut self, stack_id: impl Into<String>) -> Self {
        self.stack_id = Some(stack_id.into());
        self
    }

    /// Sets the creation time.
    #[must_use]
    pub fn with_creation_time(mut self, time: DateTime<Utc>) -> Self {
        self.creation_time = Some(time);
        self
    }
}

/// One page of the stack listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackPage {
    /// Summaries on this page, in provider order.
    pub summaries: Vec<StackSummary>,
    /// Continuation token; `None` means there are no further pages.
    pub next_token: Option<String>,
}

impl StackPage {
    /// Creates the final page of a listing.
    #[must_use]
    pub fn last(summaries: Vec<StackSummary>) -> Self {
        Self {
            summaries,
            next_token: None,
        }
    }

    /// Creates a page followed by another one.
    #[must_use]
    pub fn with_next(summaries: Vec<StackSummary>, next_token: impl Into<String>) -> Self {
        Self {
            summaries,
            next_token: Some(next_token.into()),
        }
    }
}
