// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Listings";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "listings";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".listings";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "listings.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "LISTINGS_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "LISTINGS_DEBUG";

/// Environment variable for server host
pub const ENV_HOST: &str = "LISTINGS_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "LISTINGS_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "LISTINGS_LOG";

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "LISTINGS_DATA_DIR";

/// Environment variable for the SQLite database file
pub const ENV_DATABASE_PATH: &str = "LISTINGS_DATABASE_PATH";

/// Environment variable for the page size upper bound
pub const ENV_MAX_PAGE_SIZE: &str = "LISTINGS_MAX_PAGE_SIZE";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5480;

/// Default body limit for API requests (256 KB)
pub const DEFAULT_BODY_LIMIT: usize = 256 * 1024;

/// Timeout for background tasks to finish after shutdown is signalled
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "listings.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -16000 = 16MB)
pub const SQLITE_CACHE_SIZE: &str = "-16000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Listings
// =============================================================================

/// First page when `page` is omitted
pub const DEFAULT_PAGE: u64 = 1;

/// Rows per page when `pageSize` is omitted
pub const DEFAULT_PAGE_SIZE: u64 = 10;
