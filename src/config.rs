//! Application configuration
//!
//! Environment-derived settings plus the resource limits and validation
//! boundaries used throughout the application.

use std::env;
use std::path::PathBuf;

// ===== Status Entries =====

/// Color assigned to a status entry created without an explicit color.
/// Stored lowercase, like every other persisted color.
pub const DEFAULT_STATUS_COLOR: &str = "#2563eb";

/// Status assigned to a mail record created without one
pub const DEFAULT_STATUS_NAME: &str = "Pending";

// ===== Reporting =====

/// Pending-days threshold above which the summary report counts a record
/// separately ("pending over 10 days")
pub const PENDING_ALERT_DAYS: i64 = 10;

// ===== Input Limits =====

/// Maximum length for addressee and status names.
/// Keeps the master lists usable in dropdowns.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length for a document title
pub const MAX_TITLE_LENGTH: usize = 300;

/// Maximum number of mail records accepted in a single batch insert.
/// The batch runs as one transaction; an unbounded batch would hold the
/// write lock for too long.
pub const MAX_BATCH_SIZE: usize = 100;

/// Runtime configuration read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Path of the SQLite database file
    pub db_path: PathBuf,
}

impl Config {
    /// Read configuration from `MAILTRACK_ADDR` and `MAILTRACK_DB`,
    /// falling back to local-development defaults.
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("MAILTRACK_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            db_path: env::var("MAILTRACK_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("mailtrack.db")),
        }
    }
}
