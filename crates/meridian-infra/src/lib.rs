//! # Meridian Infrastructure
//!
//! Concrete implementations of the ports defined in `meridian-core`:
//! content stores, the lead mailer and the request rate limiter.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL content store via SeaORM
//! - `email` - Transactional email over HTTP via reqwest
//! - `rate-limit` - Rate limiting via governor

pub mod database;
pub mod mail;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryContentStore};
pub use mail::DisabledMailer;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresContentStore};

#[cfg(feature = "email")]
pub use mail::{DEFAULT_EMAIL_API_URL, HttpMailer, HttpMailerConfig};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
