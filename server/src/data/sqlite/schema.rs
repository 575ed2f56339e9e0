//! SQLite schema definitions
//!
//! `SCHEMA` is applied in one step to an empty database and recorded in
//! `schema_version`.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- Listings
-- =============================================================================
-- AUTOINCREMENT keeps deleted ids from being handed out again.
CREATE TABLE IF NOT EXISTS listings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    address TEXT NOT NULL CHECK(length(trim(address)) >= 1),
    -- Unicode lower-cased copy of address, written by the application
    address_lower TEXT NOT NULL,
    price REAL NOT NULL CHECK(price >= 0),
    bedrooms INTEGER NOT NULL CHECK(bedrooms >= 0),
    bathrooms INTEGER NOT NULL CHECK(bathrooms >= 0),
    type TEXT CHECK(type IS NULL OR type IN ('Townhouse', 'Condominium', 'SingleFamilyResidence'))
);

CREATE INDEX IF NOT EXISTS idx_listings_price ON listings(price);
CREATE INDEX IF NOT EXISTS idx_listings_type ON listings(type);
CREATE INDEX IF NOT EXISTS idx_listings_rooms ON listings(bedrooms, bathrooms);
"#;

