//! Outbound email implementations.

mod disabled;
#[cfg(feature = "email")]
mod http;

pub use disabled::DisabledMailer;
#[cfg(feature = "email")]
pub use http::{DEFAULT_EMAIL_API_URL, HttpMailer, HttpMailerConfig};
