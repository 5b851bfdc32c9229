//! Master-list service
//!
//! Validation and orchestration for the two lookup tables: addressees
//! (directorates) and status options.

use crate::config::{DEFAULT_STATUS_COLOR, MAX_NAME_LENGTH};
use crate::database::{Addressee, Repository, StatusOption};
use crate::error::{AppError, Result};

/// Service for managing the addressee and status master lists
#[derive(Clone)]
pub struct MastersService {
    repo: Repository,
}

impl MastersService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    // ===== Addressees =====

    pub async fn list_addressees(&self) -> Result<Vec<Addressee>> {
        self.repo.list_addressees().await
    }

    /// Create an addressee
    pub async fn create_addressee(&self, name: &str) -> Result<Addressee> {
        let name = validate_name(name, "addressee name")?;

        tracing::info!("Creating addressee: {}", name);
        self.repo.create_addressee(&name).await
    }

    /// Rename an addressee
    pub async fn rename_addressee(&self, id: i64, name: &str) -> Result<Addressee> {
        let name = validate_name(name, "addressee name")?;

        tracing::info!("Renaming addressee {} to {}", id, name);
        self.repo.rename_addressee(id, &name).await
    }

    /// Delete an addressee; fails while any mail record references it
    pub async fn delete_addressee(&self, id: i64) -> Result<()> {
        tracing::info!("Deleting addressee {}", id);
        self.repo.delete_addressee(id).await
    }

    // ===== Status options =====

    pub async fn list_status_options(&self) -> Result<Vec<StatusOption>> {
        self.repo.list_status_options().await
    }

    /// Create a status option; a missing color gets the default
    pub async fn create_status_option(
        &self,
        name: &str,
        color: Option<&str>,
    ) -> Result<StatusOption> {
        let name = validate_name(name, "status name")?;
        let color = match color {
            Some(raw) => normalize_color(raw)?,
            None => DEFAULT_STATUS_COLOR.to_string(),
        };

        tracing::info!("Creating status option: {} ({})", name, color);
        self.repo.create_status_option(&name, &color).await
    }

    /// Update a status option; renames cascade onto existing records
    pub async fn update_status_option(
        &self,
        id: i64,
        name: &str,
        color: &str,
    ) -> Result<StatusOption> {
        let name = validate_name(name, "status name")?;
        let color = normalize_color(color)?;

        tracing::info!("Updating status option {}: {} ({})", id, name, color);
        self.repo.update_status_option(id, &name, &color).await
    }

    /// Delete a status option; fails while its name is in use
    pub async fn delete_status_option(&self, id: i64) -> Result<()> {
        tracing::info!("Deleting status option {}", id);
        self.repo.delete_status_option(id).await
    }
}

/// Trim and bounds-check a master-list name
fn validate_name(raw: &str, what: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", what)));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            what, MAX_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

/// Validate a `#rrggbb` color and normalize it to lowercase.
/// Manual check instead of a regex; the pattern is trivial and the crate
/// carries no regex dependency.
fn normalize_color(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or("");
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::Validation(format!(
            "invalid color '{}', expected a 6-digit hex string like #2563eb",
            raw
        )));
    }
    Ok(format!("#{}", hex.to_ascii_lowercase()))
}
