//! Test assertions for audit results.

use crate::core::TemplateRecord;

/// Sort keys of `records`, in order.
#[must_use]
pub fn record_keys(records: &[TemplateRecord]) -> Vec<String> {
    records.iter().map(TemplateRecord::sort_key).collect()
}

/// Asserts that records are in ascending sort-key order.
pub fn assert_sorted(records: &[TemplateRecord]) {
    let keys = record_keys(records);
    for pair in keys.windows(2) {
        assert!(
            pair[0] <= pair[1],
            "Expected sorted records, found '{}' before '{}'",
            pair[0],
            pair[1]
        );
    }
}

/// Asserts that records appear grouped by region, in `regions` order.
///
/// Regions without records may be absent.
pub fn assert_region_order<S: AsRef<str>>(records: &[TemplateRecord], regions: &[S]) {
    let mut position = 0;
    for record in records {
        let index = regions
            .iter()
            .position(|r| r.as_ref() == record.region())
            .unwrap_or_else(|| panic!("Unexpected region '{}'", record.region()));
        assert!(
            index >= position,
            "Region '{}' appears after '{}'",
            record.region(),
            regions[position].as_ref()
        );
        position = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;

    #[test]
    fn test_region_order_accepts_grouped_records() {
        let records = vec![
            record("b", "us-east-1", "{}"),
            record("a", "us-west-2", "{}"),
        ];
        assert_region_order(&records, &["us-east-1", "us-west-2", "eu-west-1"]);
    }

    #[test]
    #[should_panic(expected = "appears after")]
    fn test_region_order_rejects_interleaving() {
        let records = vec![
            record("a", "us-west-2", "{}"),
            record("b", "us-east-1", "{}"),
        ];
        assert_region_order(&records, &["us-east-1", "us-west-2"]);
    }

    #[test]
    #[should_panic(expected = "Expected sorted")]
    fn test_assert_sorted_rejects_unsorted() {
        let records = vec![record("z", "us-east-1", "{}"), record("a", "us-east-1", "{}")];
        assert_sorted(&records);
    }
}
