//! Domain entities - the core business objects.

mod category;
mod input;
mod lead;
mod post;

pub use category::{Category, DEFAULT_CATEGORIES};
pub use input::{PostInput, PostLocator, PostSubmission};
pub use lead::{Interest, Lead, LeadSubmission, mask_email};
pub use post::{DEFAULT_AUTHOR, Post, PostRecord, PostStatus, TaxonomyTerm};
