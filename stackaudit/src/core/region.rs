//! The fixed region catalog.

/// Regions audited by a world-wide run, in merge order.
pub const REGION_CATALOG: [&str; 14] = [
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "sa-east-1",
];

/// Returns the catalog as owned strings.
#[must_use]
pub fn catalog_regions() -> Vec<String> {
    REGION_CATALOG.iter().map(ToString::to_string).collect()
}
