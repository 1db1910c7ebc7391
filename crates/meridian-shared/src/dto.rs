//! Query-string parameters accepted by the API.

use serde::{Deserialize, Serialize};

/// `GET /api/blog/posts` filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub category: Option<String>,
    pub search: Option<String>,
}

/// `GET /api/blog/related/{id}` options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedQuery {
    pub limit: Option<u64>,
}

/// `DELETE /api/admin/cleanup` target. Exactly one of the two is expected;
/// `id` wins when both are given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupQuery {
    pub id: Option<String>,
    pub slug: Option<String>,
}
