//! Response envelopes and the error body.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsEnvelope<T> {
    pub posts: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEnvelope<T> {
    pub post: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesEnvelope<T> {
    pub categories: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugsEnvelope {
    pub slugs: Vec<String>,
}

/// Acknowledgement for writes that return no entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

/// Acknowledgement carrying the saved post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse<T> {
    pub success: bool,
    pub post: T,
}

impl<T> CreatedResponse<T> {
    pub fn new(post: T) -> Self {
        Self {
            success: true,
            post,
        }
    }
}

/// Every stored post, for bulk cleanup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupListing<T> {
    pub posts: Vec<T>,
    pub count: usize,
}

impl<T> CleanupListing<T> {
    pub fn new(posts: Vec<T>) -> Self {
        Self {
            count: posts.len(),
            posts,
        }
    }
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// User-facing message.
    pub error: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(400, error)
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(404, error)
    }

    pub fn conflict(error: impl Into<String>) -> Self {
        Self::new(409, error)
    }

    pub fn too_many_requests() -> Self {
        Self::new(429, "Too many requests, please try again later")
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal server error")
    }
}
