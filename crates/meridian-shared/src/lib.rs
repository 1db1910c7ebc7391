//! # Meridian Shared
//!
//! Request and response shapes of the site's JSON API, shared with the
//! front end.

pub mod dto;
pub mod response;

pub use response::{
    CategoriesEnvelope, CleanupListing, CreatedResponse, ErrorResponse, PostEnvelope,
    PostsEnvelope, SlugsEnvelope, SuccessResponse,
};
