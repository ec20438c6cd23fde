//! Core data types: stack statuses, summaries, template records and the
//! region catalog.

mod record;
mod region;
mod status;
mod summary;

pub use record::{sort_records, TemplateRecord};
pub use region::{catalog_regions, REGION_CATALOG};
pub use status::{default_status_filter, StackStatus, TemplateStage};
pub use summary::{StackPage, StackSummary};
