//! Infrastructure layer module
//!
//! This module contains the adapters behind the domain ports plus the
//! process-level plumbing:
//! - Record stores (SQLite with sqlx, in-memory)
//! - Anthropic text-generation client
//! - Configuration management
//! - Logging infrastructure

pub mod claude;
pub mod config;
pub mod database;
pub mod logging;
