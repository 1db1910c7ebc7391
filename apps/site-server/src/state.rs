//! Application state - shared across all handlers.

use std::sync::Arc;

use meridian_core::ports::{AdminStore, ContentStore, Mailer};
use meridian_core::services::{AdminWorkflow, ContentRepository, LeadIntake, NotificationAddresses};
use meridian_infra::{DisabledMailer, InMemoryContentStore};

#[cfg(feature = "postgres")]
use meridian_infra::{DatabaseConnections, PostgresContentStore};

#[cfg(feature = "email")]
use meridian_infra::{DEFAULT_EMAIL_API_URL, HttpMailer, HttpMailerConfig};

use crate::config::{AppConfig, EmailConfig};

#[cfg(feature = "email")]
fn http_mailer_config(email: &EmailConfig) -> HttpMailerConfig {
    HttpMailerConfig {
        api_key: email.api_key.clone(),
        api_url: email
            .api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
    }
}

/// Which backend the content stores run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Postgres,
    Memory,
}

impl StoreMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreMode::Postgres => "postgres",
            StoreMode::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub content: ContentRepository,
    pub admin: AdminWorkflow,
    pub leads: LeadIntake,
    pub store_mode: StoreMode,
    pub site_url: String,
    /// Bearer secret for `/api/admin`; `None` leaves the admin API open.
    pub admin_token: Option<String>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (reads, writes, store_mode) = Self::stores(config).await;
        let (mailer, addresses) = Self::mailer(config.email.as_ref());

        if config.admin_token.is_none() {
            tracing::warn!("ADMIN_API_TOKEN not set. Admin API is unauthenticated.");
        }

        let mut state = Self::assemble(reads, writes, mailer, addresses, store_mode);
        state.site_url = config.site_url.clone();
        state.admin_token = config.admin_token.clone();

        tracing::info!(
            store = store_mode.as_str(),
            email_enabled = state.leads.email_enabled(),
            "Application state initialized"
        );
        state
    }

    /// State over a process-local store.
    pub fn in_memory(store: Arc<InMemoryContentStore>, mailer: Arc<dyn Mailer>) -> Self {
        let addresses = NotificationAddresses {
            from: "site@localhost".to_string(),
            to: vec!["leads@localhost".to_string()],
        };
        Self::assemble(store.clone(), store, mailer, addresses, StoreMode::Memory)
    }

    pub(crate) fn assemble(
        reads: Arc<dyn ContentStore>,
        writes: Arc<dyn AdminStore>,
        mailer: Arc<dyn Mailer>,
        addresses: NotificationAddresses,
        store_mode: StoreMode,
    ) -> Self {
        Self {
            content: ContentRepository::new(reads),
            admin: AdminWorkflow::new(writes),
            leads: LeadIntake::new(mailer, addresses),
            store_mode,
            site_url: "http://localhost:3000".to_string(),
            admin_token: None,
        }
    }

    async fn stores(config: &AppConfig) -> (Arc<dyn ContentStore>, Arc<dyn AdminStore>, StoreMode) {
        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    return (
                        Arc::new(PostgresContentStore::new(connections.public)),
                        Arc::new(PostgresContentStore::new(connections.admin)),
                        StoreMode::Postgres,
                    );
                }
                Err(e) => {
                    tracing::error!(
                        url = %db_config.redacted_url(),
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        #[cfg(not(feature = "postgres"))]
        if config.database.is_some() {
            tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
        }

        let store = Arc::new(InMemoryContentStore::with_default_categories());
        (store.clone(), store, StoreMode::Memory)
    }

    fn mailer(email: Option<&EmailConfig>) -> (Arc<dyn Mailer>, NotificationAddresses) {
        let Some(email) = email else {
            tracing::info!("Email not configured. Lead notifications are disabled.");
            return (
                Arc::new(DisabledMailer),
                NotificationAddresses {
                    from: String::new(),
                    to: Vec::new(),
                },
            );
        };

        let addresses = NotificationAddresses {
            from: email.from.clone(),
            to: email.notify_to.clone(),
        };

        #[cfg(feature = "email")]
        {
            match HttpMailer::new(http_mailer_config(email)) {
                Ok(mailer) => return (Arc::new(mailer), addresses),
                Err(e) => tracing::error!("Failed to build email client: {}", e),
            }
        }

        #[cfg(not(feature = "email"))]
        tracing::warn!("Built without email feature - lead notifications disabled");

        (Arc::new(DisabledMailer), addresses)
    }
}
