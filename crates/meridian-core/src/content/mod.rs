//! Blog content pipeline: derivation of stored fields and the read-side view model.

pub mod derive;
pub mod transform;

pub use derive::{calculate_read_time, generate_excerpt, generate_slug, strip_html};
pub use transform::{AdminPostSummary, FeaturedImage, PostView};
