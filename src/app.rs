//! Application state and HTTP wiring
//!
//! All services are initialized here and shared across actix workers
//! through `AppState`.

use actix_web::web;
use sqlx::SqlitePool;

use crate::database::Repository;
use crate::error::AppError;
use crate::services::{MailService, MastersService};

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub mail: MailService,
    pub masters: MastersService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        let repo = Repository::new(pool);
        Self {
            mail: MailService::new(repo.clone()),
            masters: MastersService::new(repo),
        }
    }
}

/// JSON extractor config that keeps malformed-body errors in the same
/// `{"error": message}` envelope as domain failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("malformed JSON body: {}", err)).into()
    })
}

/// Query extractor config matching [`json_config`]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("malformed query string: {}", err)).into()
    })
}
