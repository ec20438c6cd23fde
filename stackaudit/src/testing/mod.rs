//! Testing utilities for audits.
//!
//! This module provides:
//! - An in-memory provider with canned stacks, latency and gauges
//! - Summary and record fixtures
//! - Assertions over audit results

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_region_order, assert_sorted, record_keys};
pub use fixtures::{record, sample_world, summary};
pub use mocks::{FakeCloudFormation, ListRequest};
