//! Core application

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::seed::{self, SeedOutcome};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::{ListingRepository, SqliteService};
use crate::domain::ListingService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub database: Arc<SqliteService>,
    pub listings: ListingService,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config).await?;

        match command {
            Some(Commands::Seed { file, if_empty }) => app.seed(&file, if_empty).await,
            Some(Commands::Start) | None => Self::start_server(app).await,
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init().await?;

        let database = SqliteService::init(&storage, &config.database)
            .await
            .context("Failed to initialize database")?;
        let database = Arc::new(database);

        let repo: Arc<dyn ListingRepository> = Arc::new(database.clone());
        let listings = ListingService::new(repo, config.listings.max_page_size);
        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            config,
            storage,
            database,
            listings,
            shutdown,
        })
    }

    async fn seed(self, file: &Path, if_empty: bool) -> Result<()> {
        let result = seed::seed_listings(&self.listings, file, if_empty).await;
        self.database.close().await;

        match result? {
            SeedOutcome::Imported(count) => {
                println!("Imported {} listings from {}", count, file.display());
            }
            SeedOutcome::Skipped(existing) => {
                println!("Skipped seeding: store already has {} listings", existing);
            }
        }
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        let database_path = SqliteService::resolve_path(&app.storage, &app.config.database);
        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            &database_path.display().to_string(),
            app.config.listings.max_page_size,
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        let checkpoint = self
            .database
            .start_checkpoint_task(self.shutdown.subscribe());
        self.shutdown.register("wal-checkpoint", checkpoint).await;

        tracing::debug!("Background tasks started");
    }
}
