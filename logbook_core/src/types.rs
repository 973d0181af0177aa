//! Core domain types for the gym logbook.
//!
//! This module defines the fundamental types used throughout the system:
//! - Logged entries (one set of weight x reps)
//! - Derived per-exercise groups
//! - Analytics outputs (stats, trends, chart series, volume ranking)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Persisted Types
// ============================================================================

/// One logged set for an exercise
///
/// Persisted as `{id, exercise, weight, reps, date}` inside the entry
/// collection. Entries are immutable once created.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutEntry {
    pub id: String,
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    pub date: DateTime<Utc>,
}

impl WorkoutEntry {
    /// Training load of this set (weight x reps)
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

// ============================================================================
// Derived Types
// ============================================================================

/// All entries sharing one case-insensitive exercise key, latest first
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseGroup {
    pub exercise: String,
    pub entries: Vec<WorkoutEntry>,
    pub last_weight: f64,
    pub last_reps: u32,
    pub last_date: DateTime<Utc>,
}

/// A stored exercise name paired with its group, if it has any entries
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseOverview {
    pub name: String,
    pub group: Option<ExerciseGroup>,
}

/// General statistics over the whole entry collection
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct WorkoutStats {
    /// Number of logged sets
    pub total_workouts: usize,
    pub unique_exercises: usize,
    /// None only when there are no entries
    pub most_frequent_exercise: Option<String>,
    pub total_volume: f64,
    pub last_workout_date: Option<DateTime<Utc>>,
}

/// Plateau detection result for one exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseTrend {
    pub exercise: String,
    pub last_five_weights: Vec<f64>,
    pub last_five_dates: Vec<DateTime<Utc>>,
    pub should_increase: bool,
    pub current_weight: f64,
    pub suggested_weight: f64,
}

/// Labels and values for a line chart
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// Value plotted by a chart series
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartMetric {
    Weight,
    Reps,
    Volume,
}

impl ChartMetric {
    pub fn value_of(&self, entry: &WorkoutEntry) -> f64 {
        match self {
            ChartMetric::Weight => entry.weight,
            ChartMetric::Reps => f64::from(entry.reps),
            ChartMetric::Volume => entry.volume(),
        }
    }
}

/// Summed volume for one exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseVolume {
    pub exercise: String,
    pub volume: f64,
}
