//! Stack lifecycle status and template stage enums.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The lifecycle status of a deployed stack.
///
/// Statuses the provider reports that are not part of the known set are kept
/// verbatim in [`StackStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StackStatus {
    /// Creation is running.
    CreateInProgress,
    /// Creation failed.
    CreateFailed,
    /// Creation succeeded.
    CreateComplete,
    /// A failed creation is being rolled back.
    RollbackInProgress,
    /// Rolling back a failed creation failed.
    RollbackFailed,
    /// A failed creation was rolled back.
    RollbackComplete,
    /// Deletion is running.
    DeleteInProgress,
    /// Deletion failed.
    DeleteFailed,
    /// An update is running.
    UpdateInProgress,
    /// An update succeeded and old resources are being removed.
    UpdateCompleteCleanupInProgress,
    /// An update succeeded.
    UpdateComplete,
    /// A failed update is being rolled back.
    UpdateRollbackInProgress,
    /// Rolling back a failed update failed.
    UpdateRollbackFailed,
    /// A failed update was rolled back and new resources are being removed.
    UpdateRollbackCompleteCleanupInProgress,
    /// A failed update was rolled back.
    UpdateRollbackComplete,
    /// A change set was created for a stack that does not exist yet.
    ReviewInProgress,
    /// A status outside the known set.
    Other(String),
}

impl StackStatus {
    /// Every known lifecycle status, in the provider's documented order.
    pub const ALL: [Self; 16] = [
        Self::CreateInProgress,
        Self::CreateFailed,
        Self::CreateComplete,
        Self::RollbackInProgress,
        Self::RollbackFailed,
        Self::RollbackComplete,
        Self::DeleteInProgress,
        Self::DeleteFailed,
        Self::UpdateInProgress,
        Self::UpdateCompleteCleanupInProgress,
        Self::UpdateComplete,
        Self::UpdateRollbackInProgress,
        Self::UpdateRollbackFailed,
        Self::UpdateRollbackCompleteCleanupInProgress,
        Self::UpdateRollbackComplete,
        Self::ReviewInProgress,
    ];

    /// Returns the provider's wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CreateInProgress => "CREATE_IN_PROGRESS",
            Self::CreateFailed => "CREATE_FAILED",
            Self::CreateComplete => "CREATE_COMPLETE",
            Self::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            Self::RollbackFailed => "ROLLBACK_FAILED",
            Self::RollbackComplete => "ROLLBACK_COMPLETE",
            Self::DeleteInProgress => "DELETE_IN_PROGRESS",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::UpdateInProgress => "UPDATE_IN_PROGRESS",
            Self::UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            Self::UpdateComplete => "UPDATE_COMPLETE",
            Self::UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
            Self::UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
            Self::UpdateRollbackCompleteCleanupInProgress => {
                "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS"
            }
            Self::UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
            Self::ReviewInProgress => "REVIEW_IN_PROGRESS",
            Self::Other(value) => value,
        }
    }

    /// Returns true if the stack is still transitioning.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.as_str().ends_with("_IN_PROGRESS")
    }

    /// Returns true if the status reports a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.as_str().ends_with("_FAILED")
    }

    /// Returns true if the status is one of the known lifecycle states.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// The status filter used when a caller does not supply one.
#[must_use]
pub fn default_status_filter() -> Vec<StackStatus> {
    StackStatus::ALL.to_vec()
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StackStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = Self::ALL
            .iter()
            .find(|known| known.as_str() == s)
            .cloned()
            .unwrap_or_else(|| Self::Other(s.to_string()));
        Ok(status)
    }
}

impl From<&str> for StackStatus {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<String> for StackStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<StackStatus> for String {
    fn from(value: StackStatus) -> Self {
        match value {
            StackStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Which version of a template to retrieve when transforms have altered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemplateStage {
    /// The template as submitted by the user.
    Original,
    /// The template after all transforms were applied.
    #[default]
    Processed,
}

impl TemplateStage {
    /// Returns the provider's wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Processed => "Processed",
        }
    }
}

impl fmt::Display for TemplateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
