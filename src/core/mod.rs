//! Core of the catalog: record model, on-disk table, schema upgrades,
//! validation, serial allocation, read cache, and configuration.
//!
//! Everything the command line or another front end needs to read and write
//! the catalog lives here.

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod migration;
pub mod output;
pub mod record;
pub mod repository;
pub mod schemas;
pub mod serial;
pub mod store;
pub mod table;
pub mod time;
pub mod validate;
