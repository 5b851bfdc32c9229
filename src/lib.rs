//! mailtrack library
//!
//! This library exposes the core functionality of mailtrack for testing
//! and potential future library use.

pub mod api;
pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod services;
