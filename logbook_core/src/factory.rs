//! Construction of new entries from caller input.

use crate::WorkoutEntry;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a fresh entry ID
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Build a new entry with a fresh ID and a trimmed exercise name
///
/// Weight and reps are taken as given. Rejecting non-positive values or
/// future dates is left to the caller.
pub fn create_entry(exercise: &str, weight: f64, reps: u32, date: DateTime<Utc>) -> WorkoutEntry {
    WorkoutEntry {
        id: generate_id(),
        exercise: exercise.trim().to_string(),
        weight,
        reps,
        date,
    }
}
