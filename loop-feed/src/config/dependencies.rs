//! Dependency initialization and wiring for the loop feed service.
use std::env;
use std::sync::Arc;

use loop_feed_engine::{Reconciler, ThreadAssembler, VoteService};
use loop_feed_repository::PostgresRepository;
use loop_feed_repository::interfaces::SubjectRepository;
use tracing::info;

use crate::errors::StartupError;

/// Default database connection string for local development.
const DEFAULT_DATABASE_URL: &str = "postgres://localhost/loop_feed";

/// Default port the HTTP facade listens on.
const DEFAULT_PORT: u16 = 8080;

/// Container for all initialized dependencies.
///
/// Every component shares one `PostgresRepository` behind the three
/// repository trait seams, so they all run on the same connection pool.
pub struct Dependencies {
    pub vote_service: VoteService,
    pub assembler: ThreadAssembler,
    pub reconciler: Reconciler,
    pub subjects: Arc<dyn SubjectRepository>,
    pub port: u16,
}

impl Dependencies {
    /// Initializes all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string
    ///   (default: postgres://localhost/loop_feed)
    /// - `PORT`: HTTP listen port (default: 8080)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies, schema migrated
    /// * `Err(StartupError)` - Connection or migration failure
    pub async fn new() -> Result<Self, StartupError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        info!(port, "Initializing dependencies");

        let repository = PostgresRepository::connect(&database_url).await?;
        repository.migrate().await?;
        info!("Database connection established, schema up to date");

        let repository = Arc::new(repository);
        Ok(Self {
            vote_service: VoteService::new(
                repository.clone(),
                repository.clone(),
                repository.clone(),
            ),
            assembler: ThreadAssembler::new(
                repository.clone(),
                repository.clone(),
                repository.clone(),
            ),
            reconciler: Reconciler::new(repository.clone(), repository.clone()),
            subjects: repository,
            port,
        })
    }
}
