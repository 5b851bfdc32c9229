//! Service layer
//!
//! High-level business logic between the HTTP handlers and the repository.

pub mod mail;
pub mod masters;

pub use mail::MailService;
pub use masters::MastersService;
