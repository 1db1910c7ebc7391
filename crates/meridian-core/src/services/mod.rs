//! Application services - the operations handlers call, wired to ports.

mod admin;
mod content;
mod leads;

pub use admin::{AdminPostDetail, AdminWorkflow};
pub use content::{ContentRepository, DEFAULT_RELATED_LIMIT, ListPublishedParams};
pub use leads::{LeadIntake, NotificationAddresses, compose_notification};
