//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration. Every repository handed out by the factory has
//! already had its schema ensured.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::config::PostgresConfig;
use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{ItemRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Postgres + Diesel implementation
    Postgres,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("postgres", "pg", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variables.
    ///
    /// Reads `REPOSITORY_TYPE`; an unknown value is an error. Without it,
    /// Postgres is selected when any of
    /// `DATABASE_URL`, `PG_DATABASE_URL` or a `POSTGRES_*` connection
    /// variable is present, otherwise Local.
    pub fn from_env() -> Result<Self, String> {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse();
        }

        let pg_configured = [
            "DATABASE_URL",
            "PG_DATABASE_URL",
            "POSTGRES_HOST",
            "POSTGRES_USER",
            "POSTGRES_DB",
        ]
        .iter()
        .any(|key| std::env::var(key).is_ok());

        if pg_configured {
            Ok(Self::Postgres)
        } else {
            log::warn!("No database configured, items are kept in memory only");
            Ok(Self::Local)
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use shopping_api::db::{PostgresConfig, RepositoryFactory, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = PostgresConfig::from_env()?;
///     let _pg_repo = RepositoryFactory::create(RepositoryType::Postgres, Some(&config)).await?;
///
///     let _local_repo = RepositoryFactory::create(RepositoryType::Local, None).await?;
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type and ensure its schema.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `postgres_config` - Database configuration (required for Postgres)
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn ItemRepository>> {
        let repo: Arc<dyn ItemRepository> = match repo_type {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config = postgres_config.ok_or_else(|| {
                        RepositoryError::configuration(
                            "Postgres repository requires PostgresConfig",
                        )
                    })?;
                    Self::create_postgres(config).await? as Arc<dyn ItemRepository>
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    let _ = postgres_config;
                    return Err(RepositoryError::configuration(
                        "Postgres repository feature not enabled",
                    ));
                }
            }
            RepositoryType::Local => Self::create_local(),
        };

        repo.ensure_schema()
            .await
            .map_err(|e| e.with_operation("ensure_schema"))?;
        log::info!("{:?} repository ready", repo_type);
        Ok(repo)
    }

    /// Create a Postgres repository.
    ///
    /// Pool construction blocks while connections are opened, so it runs on
    /// the blocking thread pool.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Task join error: {}", e),
                    super::repository::ErrorContext::new("create_postgres"),
                )
            })??;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn ItemRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// See [`RepositoryBuilder::from_env`].
    pub async fn from_env() -> RepositoryResult<Arc<dyn ItemRepository>> {
        RepositoryBuilder::new().from_env()?.build().await
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn ItemRepository>> {
        RepositoryBuilder::new()
            .from_config_file(config_path)?
            .build()
            .await
    }
}

/// Builder for configuring repository creation.
///
/// # Example
/// ```ignore
/// use shopping_api::db::{PostgresConfig, RepositoryBuilder, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let repo = RepositoryBuilder::new()
///         .repository_type(RepositoryType::Postgres)
///         .postgres_config(PostgresConfig::from_env()?)
///         .build()
///         .await?;
///     Ok(())
/// }
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    postgres_config: Option<PostgresConfig>,
}

impl RepositoryBuilder {
    /// Create a new repository builder for the in-memory store.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::Local,
            postgres_config: None,
        }
    }

    /// Set the repository type.
    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    /// Set the Postgres configuration.
    pub fn postgres_config(mut self, config: PostgresConfig) -> Self {
        self.postgres_config = Some(config);
        self
    }

    /// The repository type that `build` will create.
    pub fn selected_type(&self) -> RepositoryType {
        self.repo_type
    }

    /// Load configuration from environment variables.
    ///
    /// `REPOSITORY_CONFIG` names a `repository.toml` that takes precedence
    /// over every other variable.
    pub fn from_env(mut self) -> Result<Self, RepositoryError> {
        if let Ok(path) = std::env::var("REPOSITORY_CONFIG") {
            return self.from_config_file(path);
        }

        self.repo_type = RepositoryType::from_env().map_err(|e| {
            RepositoryError::configuration(format!("Invalid REPOSITORY_TYPE: {}", e))
        })?;

        if self.repo_type == RepositoryType::Postgres {
            let config = PostgresConfig::from_env().map_err(RepositoryError::configuration)?;
            self.postgres_config = Some(config);
        }

        Ok(self)
    }

    /// Load configuration from a TOML file.
    pub fn from_config_file<P: AsRef<Path>>(
        self,
        config_path: P,
    ) -> Result<Self, RepositoryError> {
        let repo_config = RepositoryConfig::from_file(config_path)?;
        self.apply_repository_config(&repo_config)
    }

    fn apply_repository_config(
        mut self,
        repo_config: &RepositoryConfig,
    ) -> Result<Self, RepositoryError> {
        self.repo_type = repo_config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if self.repo_type == RepositoryType::Postgres {
            let config = repo_config.to_postgres_config()?.ok_or_else(|| {
                RepositoryError::configuration(
                    "Postgres repository requires database configuration",
                )
            })?;
            self.postgres_config = Some(config);
        }

        Ok(self)
    }

    /// Build the repository instance.
    pub async fn build(self) -> RepositoryResult<Arc<dyn ItemRepository>> {
        RepositoryFactory::create(self.repo_type, self.postgres_config.as_ref()).await
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
