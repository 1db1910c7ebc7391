#[cfg(feature = "postgres")]
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the hosted content database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection used by public read paths.
    pub url: String,
    /// Elevated-credential connection for admin writes. Falls back to `url`.
    pub admin_url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// The read and write connections.
///
/// Both handles point at the same database; they differ only in the role
/// they log in as.
///
/// # Example
/// ```ignore
/// let db = DatabaseConnections::init(&config).await?;
/// let reads = PostgresContentStore::new(db.public.clone());
/// let writes = PostgresContentStore::new(db.admin.clone());
/// ```
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    pub public: DbConn,
    pub admin: DbConn,
}

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open both pools from configuration.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connections...");

        let public = Self::connect(&config.url, config).await?;
        tracing::info!(
            "Public database connected (pool: {})",
            config.max_connections
        );

        let admin = match &config.admin_url {
            Some(url) if url != &config.url => {
                let conn = Self::connect(url, config).await?;
                tracing::info!("Admin database connected with separate credentials");
                conn
            }
            _ => {
                tracing::debug!("ADMIN_DATABASE_URL not set, admin writes share the public pool");
                public.clone()
            }
        };

        Ok(Self { public, admin })
    }

    async fn connect(url: &str, config: &DatabaseConfig) -> Result<DbConn, DbErr> {
        let opts = ConnectOptions::new(url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        Database::connect(opts).await
    }
}

impl DatabaseConfig {
    /// Redacted URL for logs: credentials replaced by `***`.
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}***{}", &self.url[..scheme_end + 3], &self.url[at..])
            }
            _ => self.url.clone(),
        }
    }
}
