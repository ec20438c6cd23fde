//! Template records produced by the auditor.

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::StackSummary;

/// A retrieved template together with the stack it belongs to.
///
/// The body is never empty: [`TemplateRecord::new`] refuses to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateRecord {
    template_body: String,
    summary: StackSummary,
    region: String,
}

impl TemplateRecord {
    /// Builds a record, or `None` when the body is empty.
    #[must_use]
    pub fn new(
        template_body: impl Into<String>,
        summary: StackSummary,
        region: impl Into<String>,
    ) -> Option<Self> {
        let template_body = template_body.into();
        if template_body.is_empty() {
            return None;
        }
        Some(Self {
            template_body,
            summary,
            region: region.into(),
        })
    }

    /// The template document.
    #[must_use]
    pub fn template_body(&self) -> &str {
        &self.template_body
    }

    /// The stack the template belongs to.
    #[must_use]
    pub fn summary(&self) -> &StackSummary {
        &self.summary
    }

    /// The region the stack lives in.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Ordering key: `"{stack_name}-{region}"`.
    #[must_use]
    pub fn sort_key(&self) -> String {
        format!("{}-{}", self.summary.stack_name, self.region)
    }

    /// Hex encoded SHA-256 of the template body.
    #[must_use]
    pub fn body_digest(&self) -> String {
        hex::encode(Sha256::digest(self.template_body.as_bytes()))
    }
}

/// Sorts records ascending by [`TemplateRecord::sort_key`], keeping the
/// relative order of equal keys.
pub fn sort_records(records: &mut [TemplateRecord]) {
    records.sort_by_cached_key(TemplateRecord::sort_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StackStatus;
    use pretty_assertions::assert_eq;

    fn record(name: &str, region: &str, body: &str) -> TemplateRecord {
        TemplateRecord::new(body, StackSummary::new(name, StackStatus::CreateComplete), region)
            .unwrap()
    }

    #[test]
    fn test_empty_body_is_rejected() {
        let summary = StackSummary::new("empty", StackStatus::CreateComplete);
        assert!(TemplateRecord::new("", summary, "us-east-1").is_none());
    }

    #[test]
    fn test_sort_key() {
        assert_eq!(record("web", "eu-west-1", "{}").sort_key(), "web-eu-west-1");
    }

    #[test]
    fn test_sort_records_lexicographic() {
        let mut records = vec![
            record("zeta", "us-east-1", "{}"),
            record("alpha", "us-east-1", "{}"),
            record("Beta", "us-east-1", "{}"),
        ];
        sort_records(&mut records);

        let keys: Vec<_> = records.iter().map(TemplateRecord::sort_key).collect();
        assert_eq!(keys, vec!["Beta-us-east-1", "alpha-us-east-1", "zeta-us-east-1"]);
    }

    #[test]
    fn test_sort_records_is_stable() {
        let mut records = vec![
            record("same", "us-east-1", "first"),
            record("same", "us-east-1", "second"),
            record("aaa", "us-east-1", "third"),
        ];
        sort_records(&mut records);

        let bodies: Vec<_> = records.iter().map(TemplateRecord::template_body).collect();
        assert_eq!(bodies, vec!["third", "first", "second"]);
    }

    #[test]
    fn test_body_digest() {
        let digest = record("a", "us-east-1", "abc").body_digest();
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_record_serializes_pascal_case() {
        let json = serde_json::to_value(record("db", "sa-east-1", "Resources: {}")).unwrap();
        assert_eq!(json["TemplateBody"], "Resources: {}");
        assert_eq!(json["Region"], "sa-east-1");
        assert_eq!(json["Summary"]["StackName"], "db");
    }
}
