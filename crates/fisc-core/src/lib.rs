//! Core library for fisc
//!
//! Domain models, the SQLite-backed stores, budget aggregation, and the
//! pure statistics projections used by the server and CLI.

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod month;
pub mod stats;

pub use error::{Error, Result};
