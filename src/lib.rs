//! # IDL League
//!
//! Standings and knockout brackets for the Irish Dota League.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (teams, matches, standings, brackets)
//! - **calculate**: Standings tables and week-by-week schedule views
//! - **bracket**: Playoff templates and the bracket builder
//! - **ingest**: Lenient readers for hand-maintained match and team files
//! - **storage**: Season directories on disk (JSON, JSONL)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod bracket;
pub mod calculate;
pub mod config;
pub mod ingest;
pub mod models;
pub mod storage;

pub use models::*;
