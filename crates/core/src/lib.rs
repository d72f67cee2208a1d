//! Domain types and pure logic for the vaccination center locator.
//!
//! Nothing in this crate performs I/O. The HTTP layers, directory cache and
//! session handling live in `covin-client`.

pub mod alert;
pub mod alert_form;
pub mod dates;
pub mod error;
pub mod matching;
pub mod types;
pub mod vaccine;
