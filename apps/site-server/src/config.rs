//! Application configuration loaded from environment variables.

use std::env;

use meridian_infra::DatabaseConfig;

/// Transactional email settings. Present only when both key and sender are set.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    /// `EMAIL_API_URL` override. The mailer's default endpoint is used otherwise.
    pub api_url: Option<String>,
    pub from: String,
    pub notify_to: Vec<String>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub email: Option<EmailConfig>,
    /// Public origin used for absolute links in the sitemap.
    pub site_url: String,
    pub admin_token: Option<String>,
    pub lead_rate_limit_per_minute: u32,
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = non_empty("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            admin_url: non_empty("ADMIN_DATABASE_URL"),
            max_connections: parsed("DB_MAX_CONNECTIONS", 20),
            min_connections: parsed("DB_MIN_CONNECTIONS", 2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database,
            email: Self::email_from_env(),
            site_url: non_empty("SITE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            admin_token: non_empty("ADMIN_API_TOKEN"),
            lead_rate_limit_per_minute: parsed("LEAD_RATE_LIMIT_PER_MINUTE", 5),
        }
    }

    /// Email is switched off unless both the key and sender are configured.
    /// `LEAD_NOTIFICATION_TO` takes a comma-separated list.
    fn email_from_env() -> Option<EmailConfig> {
        let api_key = non_empty("EMAIL_API_KEY")?;
        let from = non_empty("EMAIL_FROM")?;

        let notify_to = non_empty("LEAD_NOTIFICATION_TO")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|to| !to.is_empty())
            .unwrap_or_else(|| vec![from.clone()]);

        Some(EmailConfig {
            api_key,
            api_url: non_empty("EMAIL_API_URL"),
            from,
            notify_to,
        })
    }
}
