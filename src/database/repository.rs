//! Repository layer for database operations
//!
//! CRUD and search for addressees, status options and mail records.
//! Multi-statement operations (batch insert, batch delete, status rename)
//! run inside transactions so they complete or fail atomically.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Shared SELECT joining a mail record with its addressee names
const MAIL_SELECT: &str = "SELECT m.id, m.document_title, m.originator_id, \
     a.name AS originator_name, m.received_date, m.status, m.comments, \
     m.despatch_date, m.recipient_id, r.name AS recipient_name, \
     m.pending_days, m.created_at \
     FROM mail_records m \
     JOIN addressees a ON a.id = m.originator_id \
     LEFT JOIN addressees r ON r.id = m.recipient_id";

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== Addressees =====

    /// List all addressees ordered by name
    pub async fn list_addressees(&self) -> Result<Vec<Addressee>> {
        let addressees =
            sqlx::query_as::<_, Addressee>("SELECT id, name FROM addressees ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(addressees)
    }

    /// Create an addressee; the name must be unique
    pub async fn create_addressee(&self, name: &str) -> Result<Addressee> {
        let addressee = sqlx::query_as::<_, Addressee>(
            "INSERT INTO addressees (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::or_conflict(e, format!("addressee '{}' already exists", name)))?;

        tracing::debug!("Created addressee {} ({})", addressee.id, addressee.name);
        Ok(addressee)
    }

    /// Rename an addressee. Mail records reference addressees by id, so
    /// the new name shows up on existing records immediately.
    pub async fn rename_addressee(&self, id: i64, name: &str) -> Result<Addressee> {
        let addressee = sqlx::query_as::<_, Addressee>(
            "UPDATE addressees SET name = ? WHERE id = ? RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::or_conflict(e, format!("addressee '{}' already exists", name)))?
        .ok_or_else(|| AppError::NotFound(format!("addressee {} not found", id)))?;

        tracing::debug!("Renamed addressee {} to {}", id, name);
        Ok(addressee)
    }

    /// Delete an addressee, rejected while any mail record references it
    pub async fn delete_addressee(&self, id: i64) -> Result<()> {
        let in_use: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM mail_records WHERE originator_id = ?1 OR recipient_id = ?1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if in_use != 0 {
            return Err(AppError::Conflict(
                "cannot delete addressee, it is used by existing mail records".to_string(),
            ));
        }

        let rows = sqlx::query("DELETE FROM addressees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NotFound(format!("addressee {} not found", id)));
        }

        tracing::debug!("Deleted addressee {}", id);
        Ok(())
    }

    // ===== Status options =====

    /// List all status options ordered by name
    pub async fn list_status_options(&self) -> Result<Vec<StatusOption>> {
        let options = sqlx::query_as::<_, StatusOption>(
            "SELECT id, name, color FROM status_options ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(options)
    }

    /// Create a status option; the name must be unique
    pub async fn create_status_option(&self, name: &str, color: &str) -> Result<StatusOption> {
        let option = sqlx::query_as::<_, StatusOption>(
            "INSERT INTO status_options (name, color) VALUES (?, ?) RETURNING id, name, color",
        )
        .bind(name)
        .bind(color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::or_conflict(e, format!("status '{}' already exists", name)))?;

        tracing::debug!("Created status option {} ({})", option.id, option.name);
        Ok(option)
    }

    /// Update a status option. Mail records store the status *name*, so a
    /// rename cascades onto existing records in the same transaction.
    pub async fn update_status_option(
        &self,
        id: i64,
        name: &str,
        color: &str,
    ) -> Result<StatusOption> {
        let mut tx = self.pool.begin().await?;

        let old_name: String = sqlx::query_scalar("SELECT name FROM status_options WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("status option {} not found", id)))?;

        let option = sqlx::query_as::<_, StatusOption>(
            "UPDATE status_options SET name = ?, color = ? WHERE id = ? RETURNING id, name, color",
        )
        .bind(name)
        .bind(color)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::or_conflict(e, format!("status '{}' already exists", name)))?;

        if old_name != name {
            let cascaded = sqlx::query("UPDATE mail_records SET status = ? WHERE status = ?")
                .bind(name)
                .bind(&old_name)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            tracing::debug!(
                "Status rename '{}' -> '{}' cascaded to {} records",
                old_name,
                name,
                cascaded
            );
        }

        tx.commit().await?;
        Ok(option)
    }

    /// Delete a status option, rejected while its name is in use
    pub async fn delete_status_option(&self, id: i64) -> Result<()> {
        let name: String = sqlx::query_scalar("SELECT name FROM status_options WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("status option {} not found", id)))?;

        let in_use: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM mail_records WHERE status = ?)")
                .bind(&name)
                .fetch_one(&self.pool)
                .await?;

        if in_use != 0 {
            return Err(AppError::Conflict(format!(
                "cannot delete status '{}', it is used by existing mail records",
                name
            )));
        }

        sqlx::query("DELETE FROM status_options WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Deleted status option {} ({})", id, name);
        Ok(())
    }

    // ===== Mail records =====

    /// Search mail records, joined with addressee names and annotated with
    /// freshly computed pending days, newest received first.
    pub async fn search_mail_records(&self, filters: &MailFilters) -> Result<Vec<MailRecord>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(MAIL_SELECT);
        qb.push(" WHERE 1 = 1");

        if let Some(text) = filters.search.as_deref().filter(|t| !t.trim().is_empty()) {
            let pattern = format!("%{}%", text.trim());
            qb.push(" AND (m.document_title LIKE ")
                .push_bind(pattern.clone())
                .push(" OR a.name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR m.comments LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(name) = &filters.originator {
            qb.push(" AND a.name = ").push_bind(name.as_str());
        }
        if let Some(name) = &filters.recipient {
            qb.push(" AND r.name = ").push_bind(name.as_str());
        }
        if let Some(status) = &filters.status {
            qb.push(" AND m.status = ").push_bind(status.as_str());
        }
        if let Some(from) = filters.received_from {
            qb.push(" AND m.received_date >= ").push_bind(from);
        }
        if let Some(to) = filters.received_to {
            qb.push(" AND m.received_date <= ").push_bind(to);
        }
        if let Some(from) = filters.despatch_from {
            qb.push(" AND m.despatch_date >= ").push_bind(from);
        }
        if let Some(to) = filters.despatch_to {
            qb.push(" AND m.despatch_date <= ").push_bind(to);
        }

        qb.push(" ORDER BY m.received_date DESC, m.id DESC");

        let records: Vec<MailRecord> = qb.build_query_as().fetch_all(&self.pool).await?;

        let today = Utc::now().date_naive();
        Ok(records
            .into_iter()
            .map(|r| annotate_pending(r, today))
            .collect())
    }

    /// Get a single mail record by id
    pub async fn get_mail_record(&self, id: i64) -> Result<MailRecord> {
        let record =
            sqlx::query_as::<_, MailRecord>(&format!("{} WHERE m.id = ?", MAIL_SELECT))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("mail record {} not found", id)))?;

        Ok(annotate_pending(record, Utc::now().date_naive()))
    }

    /// Insert a batch of mail records atomically. Every originator and
    /// recipient name must already exist in the addressee master list;
    /// otherwise the whole batch rolls back and zero records persist.
    pub async fn add_mail_records(&self, records: &[NewMailRecord]) -> Result<Vec<i64>> {
        let today = Utc::now().date_naive();
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(records.len());

        for record in records {
            let originator_id = addressee_id_by_name(&mut *tx, &record.originator_name).await?;
            let recipient_id = match &record.recipient_name {
                Some(name) => Some(addressee_id_by_name(&mut *tx, name).await?),
                None => None,
            };

            let pending = pending_days(record.received_date, record.despatch_date, today);
            let status = record
                .status
                .as_deref()
                .unwrap_or(crate::config::DEFAULT_STATUS_NAME);
            let comments = record.comments.as_deref().unwrap_or("");

            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO mail_records
                    (document_title, originator_id, received_date, status, comments,
                     despatch_date, recipient_id, pending_days, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(&record.document_title)
            .bind(originator_id)
            .bind(record.received_date)
            .bind(status)
            .bind(comments)
            .bind(record.despatch_date)
            .bind(recipient_id)
            .bind(pending)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

            ids.push(id);
        }

        tx.commit().await?;

        tracing::debug!("Inserted {} mail records", ids.len());
        Ok(ids)
    }

    /// Apply a partial update to a mail record and recompute pending days
    /// from the merged current+new dates.
    pub async fn update_mail_record(&self, id: i64, patch: &MailRecordPatch) -> Result<MailRecord> {
        let current = self.get_mail_record(id).await?;

        let originator_id = match &patch.originator_name {
            Some(name) => addressee_id_by_name(&self.pool, name).await?,
            None => current.originator_id,
        };
        let recipient_id = match &patch.recipient_name {
            None => current.recipient_id,
            Some(None) => None,
            Some(Some(name)) => Some(addressee_id_by_name(&self.pool, name).await?),
        };

        let received_date = patch.received_date.unwrap_or(current.received_date);
        let despatch_date = match patch.despatch_date {
            None => current.despatch_date,
            Some(value) => value,
        };

        let document_title = patch
            .document_title
            .as_deref()
            .unwrap_or(&current.document_title);
        let status = patch.status.as_deref().unwrap_or(&current.status);
        let comments = patch.comments.as_deref().unwrap_or(&current.comments);

        let pending = pending_days(received_date, despatch_date, Utc::now().date_naive());

        sqlx::query(
            r#"
            UPDATE mail_records
            SET document_title = ?, originator_id = ?, received_date = ?, status = ?,
                comments = ?, despatch_date = ?, recipient_id = ?, pending_days = ?
            WHERE id = ?
            "#,
        )
        .bind(document_title)
        .bind(originator_id)
        .bind(received_date)
        .bind(status)
        .bind(comments)
        .bind(despatch_date)
        .bind(recipient_id)
        .bind(pending)
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Updated mail record {}", id);
        self.get_mail_record(id).await
    }

    /// Delete a set of mail records atomically. A missing id fails the
    /// whole delete, matching the batch-insert contract.
    pub async fn delete_mail_records(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Err(AppError::Validation("no record ids supplied".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let mut count_qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM mail_records WHERE id IN (");
        let mut separated = count_qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        count_qb.push(")");

        let found: i64 = count_qb.build_query_scalar().fetch_one(&mut *tx).await?;
        if found != ids.len() as i64 {
            return Err(AppError::NotFound(
                "one or more mail records not found".to_string(),
            ));
        }

        let mut delete_qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("DELETE FROM mail_records WHERE id IN (");
        let mut separated = delete_qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        delete_qb.push(")");

        let deleted = delete_qb.build().execute(&mut *tx).await?.rows_affected();
        tx.commit().await?;

        tracing::debug!("Deleted {} mail records", deleted);
        Ok(deleted)
    }

    /// Delete every mail record
    pub async fn delete_all_mail_records(&self) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM mail_records")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!("Deleted all {} mail records", deleted);
        Ok(deleted)
    }

    /// Earliest received date across all records, if any
    pub async fn earliest_received_date(&self) -> Result<Option<NaiveDate>> {
        let earliest: Option<NaiveDate> =
            sqlx::query_scalar("SELECT MIN(received_date) FROM mail_records")
                .fetch_one(&self.pool)
                .await?;

        Ok(earliest)
    }

    /// Summary counts for records received on or after `from`. Pending
    /// classification uses the same derivation as reads, so the report can
    /// never disagree with the displayed pending days.
    pub async fn mail_summary(&self, from: NaiveDate) -> Result<MailSummary> {
        let rows: Vec<(NaiveDate, Option<NaiveDate>)> = sqlx::query_as(
            "SELECT received_date, despatch_date FROM mail_records WHERE received_date >= ?",
        )
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        let today = Utc::now().date_naive();
        let mut summary = MailSummary {
            total: rows.len() as i64,
            ..MailSummary::default()
        };

        for (received, despatch) in rows {
            if despatch.is_some() {
                summary.despatched += 1;
            } else {
                summary.pending += 1;
                if pending_days(received, despatch, today) > crate::config::PENDING_ALERT_DAYS {
                    summary.pending_over_10_days += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// Recompute the derived pending-days field on a freshly read record
fn annotate_pending(mut record: MailRecord, today: NaiveDate) -> MailRecord {
    record.pending_days = pending_days(record.received_date, record.despatch_date, today);
    record
}

/// Resolve an addressee name to its id, failing with a not-found error
/// naming the missing addressee.
async fn addressee_id_by_name<'e, E>(executor: E, name: &str) -> Result<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT id FROM addressees WHERE name = ?")
        .bind(name)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "addressee '{}' does not exist in the master list",
                name
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_repo() -> Repository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        Repository::new(pool)
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn record(title: &str, originator: &str, received: &str) -> NewMailRecord {
        NewMailRecord {
            document_title: title.to_string(),
            originator_name: originator.to_string(),
            received_date: date(received),
            status: None,
            comments: None,
            despatch_date: None,
            recipient_name: None,
        }
    }

    async fn seed_masters(repo: &Repository) {
        repo.create_addressee("Finance").await.unwrap();
        repo.create_addressee("Operations").await.unwrap();
        repo.create_status_option("Pending", "#2563eb").await.unwrap();
    }

    #[tokio::test]
    async fn test_addressee_crud() {
        let repo = create_test_repo().await;

        let a = repo.create_addressee("Finance").await.unwrap();
        assert_eq!(a.name, "Finance");

        let renamed = repo.rename_addressee(a.id, "Finance & Accounts").await.unwrap();
        assert_eq!(renamed.name, "Finance & Accounts");

        let all = repo.list_addressees().await.unwrap();
        assert_eq!(all.len(), 1);

        repo.delete_addressee(a.id).await.unwrap();
        assert!(repo.list_addressees().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_addressee_conflicts() {
        let repo = create_test_repo().await;

        repo.create_addressee("Finance").await.unwrap();
        let err = repo.create_addressee("Finance").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_referenced_addressee_conflicts() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        repo.add_mail_records(&[record("Budget", "Finance", "2024-01-01")])
            .await
            .unwrap();

        let finance = repo.list_addressees().await.unwrap()[0].clone();
        assert_eq!(finance.name, "Finance");

        let err = repo.delete_addressee(finance.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // The unreferenced addressee deletes fine.
        let ops = repo.list_addressees().await.unwrap()[1].clone();
        assert_eq!(ops.name, "Operations");
        repo.delete_addressee(ops.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_batch_insert_unknown_originator_rolls_back() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        let batch = vec![
            record("First", "Finance", "2024-01-01"),
            record("Second", "Unknown Directorate", "2024-01-02"),
        ];

        let err = repo.add_mail_records(&batch).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let records = repo.search_mail_records(&MailFilters::default()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_batch_insert_unknown_recipient_rolls_back() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        let mut rec = record("First", "Finance", "2024-01-01");
        rec.recipient_name = Some("Nobody".to_string());

        let err = repo.add_mail_records(&[rec]).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(repo
            .search_mail_records(&MailFilters::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_search_orders_by_received_date_descending() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        repo.add_mail_records(&[
            record("Oldest", "Finance", "2024-01-01"),
            record("Newest", "Finance", "2024-03-01"),
            record("Middle", "Operations", "2024-02-01"),
        ])
        .await
        .unwrap();

        let records = repo.search_mail_records(&MailFilters::default()).await.unwrap();
        let titles: Vec<&str> = records.iter().map(|r| r.document_title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);
    }

    #[tokio::test]
    async fn test_search_date_range_is_inclusive() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        repo.add_mail_records(&[
            record("A", "Finance", "2024-01-01"),
            record("B", "Finance", "2024-01-15"),
            record("C", "Finance", "2024-02-01"),
        ])
        .await
        .unwrap();

        let filters = MailFilters {
            received_from: Some(date("2024-01-01")),
            received_to: Some(date("2024-01-15")),
            ..MailFilters::default()
        };
        let records = repo.search_mail_records(&filters).await.unwrap();
        let titles: Vec<&str> = records.iter().map(|r| r.document_title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_search_free_text_matches_title_originator_comments() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        let mut with_comment = record("Plain", "Operations", "2024-01-02");
        with_comment.comments = Some("urgent budget query".to_string());

        repo.add_mail_records(&[
            record("Budget Report", "Finance", "2024-01-01"),
            with_comment,
            record("Unrelated", "Operations", "2024-01-03"),
        ])
        .await
        .unwrap();

        let filters = MailFilters {
            search: Some("budget".to_string()),
            ..MailFilters::default()
        };
        let records = repo.search_mail_records(&filters).await.unwrap();
        assert_eq!(records.len(), 2);

        let filters = MailFilters {
            search: Some("Finance".to_string()),
            ..MailFilters::default()
        };
        let records = repo.search_mail_records(&filters).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].document_title, "Budget Report");
    }

    #[tokio::test]
    async fn test_pending_days_recomputed_on_read() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        let ids = repo
            .add_mail_records(&[record("Old", "Finance", "2024-01-01")])
            .await
            .unwrap();

        let today = Utc::now().date_naive();
        let expected = (today - date("2024-01-01")).num_days();

        let fetched = repo.get_mail_record(ids[0]).await.unwrap();
        assert_eq!(fetched.pending_days, expected);
        assert_eq!(fetched.originator_name, "Finance");
    }

    #[tokio::test]
    async fn test_update_merges_patch_and_recomputes_pending() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        let ids = repo
            .add_mail_records(&[record("Doc", "Finance", "2024-01-01")])
            .await
            .unwrap();

        // Setting a despatch date freezes pending days at zero.
        let patch = MailRecordPatch {
            despatch_date: Some(Some(date("2024-01-05"))),
            recipient_name: Some(Some("Operations".to_string())),
            ..MailRecordPatch::default()
        };
        let updated = repo.update_mail_record(ids[0], &patch).await.unwrap();
        assert_eq!(updated.pending_days, 0);
        assert_eq!(updated.recipient_name.as_deref(), Some("Operations"));
        assert_eq!(updated.document_title, "Doc");

        // Clearing it starts the counter again.
        let patch = MailRecordPatch {
            despatch_date: Some(None),
            ..MailRecordPatch::default()
        };
        let updated = repo.update_mail_record(ids[0], &patch).await.unwrap();
        assert!(updated.pending_days > 0);
        assert!(updated.despatch_date.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_record_not_found() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        let err = repo
            .update_mail_record(999, &MailRecordPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_status_delete_blocked_while_in_use() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        repo.add_mail_records(&[record("Doc", "Finance", "2024-01-01")])
            .await
            .unwrap();

        let status = repo.list_status_options().await.unwrap()[0].clone();
        assert_eq!(status.name, "Pending");

        let err = repo.delete_status_option(status.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        repo.delete_all_mail_records().await.unwrap();
        repo.delete_status_option(status.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_status_rename_cascades_to_records() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        repo.add_mail_records(&[record("Doc", "Finance", "2024-01-01")])
            .await
            .unwrap();

        let status = repo.list_status_options().await.unwrap()[0].clone();
        repo.update_status_option(status.id, "In Progress", "#10b981")
            .await
            .unwrap();

        let records = repo.search_mail_records(&MailFilters::default()).await.unwrap();
        assert_eq!(records[0].status, "In Progress");
    }

    #[tokio::test]
    async fn test_delete_mail_records_is_atomic() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        let ids = repo
            .add_mail_records(&[
                record("A", "Finance", "2024-01-01"),
                record("B", "Finance", "2024-01-02"),
            ])
            .await
            .unwrap();

        // One bogus id fails the whole delete.
        let err = repo.delete_mail_records(&[ids[0], 9999]).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(
            repo.search_mail_records(&MailFilters::default())
                .await
                .unwrap()
                .len(),
            2
        );

        let deleted = repo.delete_mail_records(&ids).await.unwrap();
        assert_eq!(deleted, 2);
    }

    #[tokio::test]
    async fn test_earliest_date_and_summary() {
        let repo = create_test_repo().await;
        seed_masters(&repo).await;

        assert!(repo.earliest_received_date().await.unwrap().is_none());

        let today = Utc::now().date_naive();
        let old = today - chrono::Duration::days(30);
        let recent = today - chrono::Duration::days(2);

        let mut despatched = record("Done", "Finance", &old.to_string());
        despatched.despatch_date = Some(old + chrono::Duration::days(1));

        repo.add_mail_records(&[
            despatched,
            record("Stale", "Finance", &old.to_string()),
            record("Fresh", "Operations", &recent.to_string()),
        ])
        .await
        .unwrap();

        assert_eq!(repo.earliest_received_date().await.unwrap(), Some(old));

        let summary = repo.mail_summary(old).await.unwrap();
        assert_eq!(
            summary,
            MailSummary {
                total: 3,
                despatched: 1,
                pending: 2,
                pending_over_10_days: 1,
            }
        );

        // Narrowing the window drops the older rows.
        let summary = repo.mail_summary(recent).await.unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.pending_over_10_days, 0);
    }
}
