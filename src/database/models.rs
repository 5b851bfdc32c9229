//! Database models
//!
//! Rust structs representing database entities plus the request shapes
//! used to create and patch them. All models serialize with camelCase
//! keys, matching the wire format the dashboard consumes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// An organizational unit (directorate) that can send or receive mail
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Addressee {
    pub id: i64,
    pub name: String,
}

/// A named, colored label applied to a mail record's workflow state.
/// Colors are 6-digit lowercase hex strings like `#2563eb`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusOption {
    pub id: i64,
    pub name: String,
    pub color: String,
}

/// A tracked document, joined with its addressee names as returned by
/// every read. `pending_days` is derived and re-computed on each read;
/// the stored column is only a write-time snapshot.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MailRecord {
    pub id: i64,
    pub document_title: String,
    pub originator_id: i64,
    pub originator_name: String,
    pub received_date: NaiveDate,
    pub status: String,
    pub comments: String,
    pub despatch_date: Option<NaiveDate>,
    pub recipient_id: Option<i64>,
    pub recipient_name: Option<String>,
    pub pending_days: i64,
    pub created_at: DateTime<Utc>,
}

/// Create request for one mail record. Originator and recipient are
/// referenced by name and resolved against the addressee master list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMailRecord {
    pub document_title: String,
    pub originator_name: String,
    pub received_date: NaiveDate,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub despatch_date: Option<NaiveDate>,
    #[serde(default)]
    pub recipient_name: Option<String>,
}

/// Partial update for a mail record.
///
/// Nullable fields use a double `Option` so "field absent" (leave as-is)
/// is distinguished from "field present but null" (clear it).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailRecordPatch {
    pub document_title: Option<String>,
    pub originator_name: Option<String>,
    pub received_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub despatch_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub recipient_name: Option<Option<String>>,
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Search filters for mail records. All date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct MailFilters {
    /// Free text matched against title, originator name and comments
    pub search: Option<String>,
    pub originator: Option<String>,
    pub recipient: Option<String>,
    pub status: Option<String>,
    pub received_from: Option<NaiveDate>,
    pub received_to: Option<NaiveDate>,
    pub despatch_from: Option<NaiveDate>,
    pub despatch_to: Option<NaiveDate>,
}

/// Counts for the mail summary report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailSummary {
    pub total: i64,
    pub despatched: i64,
    pub pending: i64,
    pub pending_over_10_days: i64,
}

/// Days a record has been waiting for despatch: zero once despatched,
/// otherwise the day count since receipt, never negative.
pub fn pending_days(
    received: NaiveDate,
    despatch: Option<NaiveDate>,
    today: NaiveDate,
) -> i64 {
    if despatch.is_some() {
        0
    } else {
        (today - received).num_days().max(0)
    }
}
