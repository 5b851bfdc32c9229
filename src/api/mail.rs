//! Handlers for the `/api/mail` resource
//!
//! The endpoint multiplexes by HTTP verb and request shape:
//! - GET: search, single record, status entries, earliest date, summary
//! - POST: create mail records, a directorate, or a status entry
//! - PUT: update one of the same three
//! - DELETE: records by id list or all, a directorate, or a status entry
//!
//! Dates travel as ISO `YYYY-MM-DD` strings and are parsed here so a bad
//! date yields a 400 in the standard error envelope.

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::app::AppState;
use crate::database::{MailFilters, MailRecordPatch, NewMailRecord};
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailQuery {
    record_id: Option<i64>,
    status_entries: Option<bool>,
    earliest_date: Option<bool>,
    summary: Option<bool>,
    from_date: Option<String>,
    search: Option<String>,
    originator: Option<String>,
    recipient: Option<String>,
    status: Option<String>,
    received_from: Option<String>,
    received_to: Option<String>,
    despatch_from: Option<String>,
    despatch_to: Option<String>,
}

/// GET /api/mail
pub async fn get_mail(
    state: web::Data<AppState>,
    query: web::Query<MailQuery>,
) -> Result<HttpResponse> {
    let q = query.into_inner();

    if let Some(id) = q.record_id {
        let record = state.mail.get(id).await?;
        return Ok(HttpResponse::Ok().json(json!({ "record": record })));
    }

    if q.summary.unwrap_or(false) {
        let raw = q
            .from_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::Validation("fromDate is required for a summary".to_string())
            })?;
        let from = parse_date(raw)?;
        let summary = state.mail.summary(from).await?;
        return Ok(HttpResponse::Ok().json(json!({ "summary": summary })));
    }

    if q.earliest_date.unwrap_or(false) {
        let earliest = state.mail.earliest_date().await?;
        return Ok(HttpResponse::Ok().json(json!({ "earliestDate": earliest })));
    }

    if q.status_entries.unwrap_or(false) {
        let entries = state.masters.list_status_options().await?;
        return Ok(HttpResponse::Ok().json(json!({ "statusEntries": entries })));
    }

    let filters = MailFilters {
        search: non_empty(q.search),
        originator: non_empty(q.originator),
        recipient: non_empty(q.recipient),
        status: non_empty(q.status),
        received_from: parse_date_opt(q.received_from)?,
        received_to: parse_date_opt(q.received_to)?,
        despatch_from: parse_date_opt(q.despatch_from)?,
        despatch_to: parse_date_opt(q.despatch_to)?,
    };

    let records = state.mail.search(&filters).await?;
    let all_addressees = state.masters.list_addressees().await?;
    let status_entries = state.masters.list_status_options().await?;

    Ok(HttpResponse::Ok().json(json!({
        "records": records,
        "allAddressees": all_addressees,
        "statusEntries": status_entries,
    })))
}

#[derive(Debug, Deserialize)]
pub struct DirectorateCreate {
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusEntryCreate {
    name: String,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    records: Option<Vec<NewMailRecord>>,
    directorate: Option<DirectorateCreate>,
    status_entry: Option<StatusEntryCreate>,
}

/// POST /api/mail
pub async fn post_mail(
    state: web::Data<AppState>,
    body: web::Json<PostBody>,
) -> Result<HttpResponse> {
    let body = body.into_inner();

    match (body.records, body.directorate, body.status_entry) {
        (Some(records), None, None) => {
            let ids = state.mail.add_records(records).await?;
            Ok(HttpResponse::Ok().json(json!({ "inserted": ids.len(), "ids": ids })))
        }
        (None, Some(directorate), None) => {
            let addressee = state.masters.create_addressee(&directorate.name).await?;
            Ok(HttpResponse::Ok().json(json!({ "directorate": addressee })))
        }
        (None, None, Some(entry)) => {
            let status = state
                .masters
                .create_status_option(&entry.name, entry.color.as_deref())
                .await?;
            Ok(HttpResponse::Ok().json(json!({ "statusEntry": status })))
        }
        _ => Err(AppError::Validation(
            "body must contain exactly one of records, directorate or statusEntry".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct MailRecordUpdate {
    id: i64,
    #[serde(flatten)]
    patch: MailRecordPatch,
}

#[derive(Debug, Deserialize)]
pub struct DirectorateUpdate {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusEntryUpdate {
    id: i64,
    name: String,
    color: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutBody {
    mail_record: Option<MailRecordUpdate>,
    directorate: Option<DirectorateUpdate>,
    status_entry: Option<StatusEntryUpdate>,
}

/// PUT /api/mail
pub async fn put_mail(
    state: web::Data<AppState>,
    body: web::Json<PutBody>,
) -> Result<HttpResponse> {
    let body = body.into_inner();

    match (body.mail_record, body.directorate, body.status_entry) {
        (Some(update), None, None) => {
            let record = state.mail.update(update.id, update.patch).await?;
            Ok(HttpResponse::Ok().json(json!({ "record": record })))
        }
        (None, Some(directorate), None) => {
            let addressee = state
                .masters
                .rename_addressee(directorate.id, &directorate.name)
                .await?;
            Ok(HttpResponse::Ok().json(json!({ "directorate": addressee })))
        }
        (None, None, Some(entry)) => {
            let status = state
                .masters
                .update_status_option(entry.id, &entry.name, &entry.color)
                .await?;
            Ok(HttpResponse::Ok().json(json!({ "statusEntry": status })))
        }
        _ => Err(AppError::Validation(
            "body must contain exactly one of mailRecord, directorate or statusEntry".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    ids: Option<String>,
    delete_all: Option<bool>,
    directorate_id: Option<i64>,
    status_id: Option<i64>,
}

/// DELETE /api/mail
pub async fn delete_mail(
    state: web::Data<AppState>,
    query: web::Query<DeleteQuery>,
) -> Result<HttpResponse> {
    let q = query.into_inner();

    if let Some(id) = q.directorate_id {
        state.masters.delete_addressee(id).await?;
        return Ok(HttpResponse::Ok().json(json!({ "ok": true })));
    }

    if let Some(id) = q.status_id {
        state.masters.delete_status_option(id).await?;
        return Ok(HttpResponse::Ok().json(json!({ "ok": true })));
    }

    if q.delete_all.unwrap_or(false) {
        let deleted = state.mail.delete_all().await?;
        return Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })));
    }

    if let Some(raw) = q.ids {
        let ids = parse_ids(&raw)?;
        let deleted = state.mail.delete(&ids).await?;
        return Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })));
    }

    Err(AppError::Validation(
        "specify ids, deleteAll, directorateId or statusId".to_string(),
    ))
}

/// Treat empty query values the same as absent ones
fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    raw.trim().parse().map_err(|_| {
        AppError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", raw))
    })
}

fn parse_date_opt(raw: Option<String>) -> Result<Option<NaiveDate>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some),
    }
}

/// Parse a comma-separated id list like `1,2,3`
fn parse_ids(raw: &str) -> Result<Vec<i64>> {
    let ids: Vec<i64> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| AppError::Validation(format!("invalid record id '{}'", s)))
        })
        .collect::<Result<_>>()?;

    if ids.is_empty() {
        return Err(AppError::Validation("no record ids supplied".to_string()));
    }

    Ok(ids)
}
