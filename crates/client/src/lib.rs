//! Network-facing layers of the vaccination center locator.
//!
//! Session handling, the HTTP access layer, the process-wide directory
//! cache, the availability query with fallback, and the alerts API.

pub mod alerts;
pub mod availability;
pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod services;
pub mod session;
