#![forbid(unsafe_code)]

//! Core data and analytics layer for the gym logbook.
//!
//! This crate provides:
//! - Domain types (entries, groups, stats, trends)
//! - Key-value persistence (file and in-memory stores)
//! - Exercise/entry repository
//! - Grouping and analytics over logged entries

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod factory;
pub mod repository;
pub mod grouping;
pub mod analytics;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use factory::create_entry;
pub use repository::Repository;
pub use grouping::group_by_exercise;
pub use analytics::{
    analyze_weight_progression, get_exercise_chart_data, get_top_exercises_by_volume,
    get_workout_stats,
};
