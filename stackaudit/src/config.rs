//! Auditor configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::catalog_regions;
use crate::errors::{AuditError, Result};

/// Concurrency, region and timeout settings for an [`Auditor`](crate::Auditor).
///
/// The defaults reproduce the classic behaviour: one template request at a
/// time per region, five regions at a time, the full region catalog, no
/// request timeout and catalog-order merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Concurrent template fetches within one region.
    #[serde(default = "default_template_concurrency")]
    pub template_concurrency: usize,
    /// Concurrent regions during a world-wide audit.
    #[serde(default = "default_region_concurrency")]
    pub region_concurrency: usize,
    /// Regions audited by a world-wide run, in merge order.
    #[serde(default = "catalog_regions")]
    pub regions: Vec<String>,
    /// Per-request timeout in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub request_timeout_seconds: Option<f64>,
    /// Re-sort the merged world-wide result by stack name and region instead
    /// of keeping catalog order.
    #[serde(default)]
    pub global_sort: bool,
}

fn default_template_concurrency() -> usize {
    1
}

fn default_region_concurrency() -> usize {
    5
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            template_concurrency: default_template_concurrency(),
            region_concurrency: default_region_concurrency(),
            regions: catalog_regions(),
            request_timeout_seconds: None,
            global_sort: false,
        }
    }
}

impl AuditConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-region template concurrency.
    #[must_use]
    pub fn with_template_concurrency(mut self, limit: usize) -> Self {
        self.template_concurrency = limit;
        self
    }

    /// Sets the cross-region concurrency.
    #[must_use]
    pub fn with_region_concurrency(mut self, limit: usize) -> Self {
        self.region_concurrency = limit;
        self
    }

    /// Replaces the audited regions.
    #[must_use]
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, seconds: f64) -> Self {
        self.request_timeout_seconds = Some(seconds);
        self
    }

    /// Enables re-sorting of the merged world-wide result.
    #[must_use]
    pub fn with_global_sort(mut self) -> Self {
        self.global_sort = true;
        self
    }

    /// Gets the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs_f64)
    }

    /// Checks that the configuration can drive an audit.
    pub fn validate(&self) -> Result<()> {
        if self.template_concurrency == 0 {
            return Err(AuditError::invalid_config(
                "template_concurrency must be at least 1",
            ));
        }
        if self.region_concurrency == 0 {
            return Err(AuditError::invalid_config(
                "region_concurrency must be at least 1",
            ));
        }
        if self.regions.is_empty() {
            return Err(AuditError::invalid_config("regions must not be empty"));
        }
        if let Some(region) = self.regions.iter().find(|r| r.trim().is_empty()) {
            return Err(AuditError::invalid_config(format!(
                "region names must not be blank, got {region:?}"
            )));
        }
        if let Some(seconds) = self.request_timeout_seconds {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(AuditError::invalid_config(format!(
                    "request_timeout_seconds must be positive, got {seconds}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::REGION_CATALOG;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert_eq!(config.template_concurrency, 1);
        assert_eq!(config.region_concurrency, 5);
        assert_eq!(config.regions, REGION_CATALOG.to_vec());
        assert!(config.request_timeout().is_none());
        assert!(!config.global_sort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = AuditConfig::new()
            .with_template_concurrency(2)
            .with_region_concurrency(3)
            .with_regions(["eu-west-1", "us-east-1"])
            .with_request_timeout(2.5)
            .with_global_sort();

        assert_eq!(config.template_concurrency, 2);
        assert_eq!(config.region_concurrency, 3);
        assert_eq!(config.regions, vec!["eu-west-1", "us-east-1"]);
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(2500)));
        assert!(config.global_sort);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: AuditConfig =
            serde_json::from_str(r#"{"region_concurrency": 2}"#).unwrap();

        assert_eq!(config.region_concurrency, 2);
        assert_eq!(config.template_concurrency, 1);
        assert_eq!(config.regions.len(), 14);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        assert!(AuditConfig::new().with_template_concurrency(0).validate().is_err());
        assert!(AuditConfig::new().with_region_concurrency(0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_regions_and_timeouts() {
        let no_regions = AuditConfig::new().with_regions(Vec::<String>::new());
        assert!(no_regions.validate().is_err());

        let blank = AuditConfig::new().with_regions(["us-east-1", " "]);
        assert!(blank.validate().is_err());

        assert!(AuditConfig::new().with_request_timeout(0.0).validate().is_err());
        assert!(AuditConfig::new().with_request_timeout(f64::NAN).validate().is_err());
    }
}
