//! Operator-side attendance client for the Agora ticketing platform.
//!
//! Covers the check-in desk flow: QR ticket scanning with duplicate-scan
//! suppression, check-in/check-out against the remote API, and polled
//! aggregate attendance counts. The remote service stays the system of
//! record; this crate only orchestrates it.

pub mod client;
pub mod config;
pub mod models;
pub mod monitor;
pub mod scanner;
pub mod utils;

pub use utils::error::{Error, Result};
