//! Mail records service
//!
//! Validation and orchestration for mail record operations: batch create,
//! search, partial update, delete, and the summary report.

use chrono::NaiveDate;

use crate::config::{MAX_BATCH_SIZE, MAX_TITLE_LENGTH};
use crate::database::{
    MailFilters, MailRecord, MailRecordPatch, MailSummary, NewMailRecord, Repository,
};
use crate::error::{AppError, Result};

/// Service for managing mail records
#[derive(Clone)]
pub struct MailService {
    repo: Repository,
}

impl MailService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Insert a batch of mail records atomically
    pub async fn add_records(&self, records: Vec<NewMailRecord>) -> Result<Vec<i64>> {
        if records.is_empty() {
            return Err(AppError::Validation(
                "records must contain at least one entry".to_string(),
            ));
        }
        if records.len() > MAX_BATCH_SIZE {
            return Err(AppError::Validation(format!(
                "at most {} records per batch",
                MAX_BATCH_SIZE
            )));
        }
        for record in &records {
            validate_record(record)?;
        }

        tracing::info!("Adding {} mail records", records.len());

        let ids = self.repo.add_mail_records(&records).await?;

        tracing::info!("Added mail records: {:?}", ids);
        Ok(ids)
    }

    /// Search mail records with the given filters
    pub async fn search(&self, filters: &MailFilters) -> Result<Vec<MailRecord>> {
        self.repo.search_mail_records(filters).await
    }

    /// Get a single record by id
    pub async fn get(&self, id: i64) -> Result<MailRecord> {
        self.repo.get_mail_record(id).await
    }

    /// Apply a partial update and recompute pending days
    pub async fn update(&self, id: i64, patch: MailRecordPatch) -> Result<MailRecord> {
        if let Some(title) = &patch.document_title {
            validate_title(title)?;
        }
        if let Some(status) = &patch.status {
            if status.trim().is_empty() {
                return Err(AppError::Validation("status must not be empty".to_string()));
            }
        }
        if matches!(&patch.originator_name, Some(n) if n.trim().is_empty()) {
            return Err(AppError::Validation(
                "originator name must not be empty".to_string(),
            ));
        }

        tracing::debug!("Updating mail record {}", id);
        self.repo.update_mail_record(id, &patch).await
    }

    /// Delete the given records atomically
    pub async fn delete(&self, ids: &[i64]) -> Result<u64> {
        tracing::info!("Deleting mail records: {:?}", ids);
        self.repo.delete_mail_records(ids).await
    }

    /// Delete every record
    pub async fn delete_all(&self) -> Result<u64> {
        tracing::info!("Deleting all mail records");
        self.repo.delete_all_mail_records().await
    }

    /// Earliest received date across all records
    pub async fn earliest_date(&self) -> Result<Option<NaiveDate>> {
        self.repo.earliest_received_date().await
    }

    /// Summary counts for records received on or after `from`
    pub async fn summary(&self, from: NaiveDate) -> Result<MailSummary> {
        self.repo.mail_summary(from).await
    }
}

fn validate_record(record: &NewMailRecord) -> Result<()> {
    validate_title(&record.document_title)?;
    if record.originator_name.trim().is_empty() {
        return Err(AppError::Validation(
            "originator name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::Validation(
            "document title must not be empty".to_string(),
        ));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation(format!(
            "document title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}
