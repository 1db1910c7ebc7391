use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categories a fresh site starts with, as (name, slug).
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Strategy", "strategy"),
    ("Engineering", "engineering"),
    ("Cloud", "cloud"),
    ("Data & Analytics", "data-analytics"),
    ("Company News", "company-news"),
];

/// Blog category with its association count.
///
/// `count` is derived from the join table and includes drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub count: u64,
}
