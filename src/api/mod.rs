//! HTTP interface
//!
//! A single `/api/mail` resource multiplexing by verb and request shape,
//! plus the embedded dashboard page and a liveness probe.

pub mod mail;

use actix_web::{get, web, HttpResponse};

/// Dashboard page, embedded at compile time so the binary is self-contained
const DASHBOARD_HTML: &str = include_str!("../../static/index.html");

/// Serve the dashboard UI
#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(DASHBOARD_HTML)
}

/// Liveness probe
#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index).service(health).service(
        web::resource("/api/mail")
            .route(web::get().to(mail::get_mail))
            .route(web::post().to(mail::post_mail))
            .route(web::put().to(mail::put_mail))
            .route(web::delete().to(mail::delete_mail)),
    );
}
