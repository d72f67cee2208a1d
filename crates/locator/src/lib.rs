//! Command-line front-end for the vaccination center locator.
//!
//! Stands in for the locator and alerts pages: district and center
//! listings, tomorrow's availability, and the signed-in user's alert.

pub mod cli;
pub mod commands;
pub mod render;
