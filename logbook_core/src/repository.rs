//! Exercise and entry persistence on top of a [`KeyValueStore`].
//!
//! Both collections are stored as whole JSON arrays and every mutation is a
//! full read-modify-write of the affected collection. There is no locking
//! across calls and no transaction spanning both collections.
//!
//! Reads fail soft: a missing, unreadable or corrupt collection is logged
//! and treated as empty. Write failures are returned to the caller.

use crate::grouping::{group_by_exercise, locale_cmp, merge_with_groups, sort_newest_first};
use crate::store::{KeyValueStore, ENTRIES_KEY, EXERCISES_KEY};
use crate::{ExerciseGroup, ExerciseOverview, Result, WorkoutEntry};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Repository over the exercise list and the entry collection
pub struct Repository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load a JSON collection, falling back to empty on any failure
    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Unable to read {}: {}. Using empty collection.", key, e);
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}. Using empty collection.", key, e);
                Vec::new()
            }
        }
    }

    fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let contents = serde_json::to_string(items)?;
        self.store.set(key, &contents)
    }

    // ------------------------------------------------------------------------
    // Exercises
    // ------------------------------------------------------------------------

    /// Stored exercise names, sorted
    pub fn get_exercises(&self) -> Vec<String> {
        self.load_collection(EXERCISES_KEY)
    }

    /// Add an exercise name
    ///
    /// The name is trimmed. Empty names and case-insensitive duplicates are
    /// ignored without writing anything.
    pub fn add_exercise(&self, name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            tracing::debug!("Ignoring empty exercise name");
            return Ok(());
        }

        let mut exercises = self.get_exercises();
        let wanted = trimmed.to_lowercase();
        if exercises.iter().any(|e| e.to_lowercase() == wanted) {
            tracing::debug!("Exercise {:?} already exists", trimmed);
            return Ok(());
        }

        exercises.push(trimmed.to_string());
        exercises.sort_by(|a, b| locale_cmp(a, b));
        self.save_collection(EXERCISES_KEY, &exercises)?;

        tracing::info!("Added exercise {:?}", trimmed);
        Ok(())
    }

    /// Delete an exercise and every entry logged against it
    ///
    /// Matching is case-insensitive. The exercise list is written first,
    /// then the entry collection; both writes always happen. The two writes
    /// are not atomic: a failure in between leaves the entries in place.
    pub fn delete_exercise(&self, name: &str) -> Result<()> {
        let wanted = name.to_lowercase();

        let exercises: Vec<String> = self
            .get_exercises()
            .into_iter()
            .filter(|e| e.to_lowercase() != wanted)
            .collect();
        self.save_collection(EXERCISES_KEY, &exercises)?;

        let entries = self.get_all_entries();
        let before = entries.len();
        let remaining: Vec<WorkoutEntry> = entries
            .into_iter()
            .filter(|e| e.exercise.to_lowercase() != wanted)
            .collect();
        self.save_collection(ENTRIES_KEY, &remaining)?;

        tracing::info!(
            "Deleted exercise {:?} and {} entries",
            name,
            before - remaining.len()
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------------

    /// Every stored entry, in storage order
    pub fn get_all_entries(&self) -> Vec<WorkoutEntry> {
        self.load_collection(ENTRIES_KEY)
    }

    /// Append one entry to the collection
    pub fn save_entry(&self, entry: &WorkoutEntry) -> Result<()> {
        let mut entries = self.get_all_entries();
        entries.push(entry.clone());
        self.save_collection(ENTRIES_KEY, &entries)?;

        tracing::debug!("Saved entry {} for {:?}", entry.id, entry.exercise);
        Ok(())
    }

    /// Remove the entry with `id`. Unknown IDs leave the collection as is.
    pub fn delete_entry(&self, id: &str) -> Result<()> {
        let entries = self.get_all_entries();
        let before = entries.len();
        let remaining: Vec<WorkoutEntry> = entries.into_iter().filter(|e| e.id != id).collect();
        self.save_collection(ENTRIES_KEY, &remaining)?;

        if remaining.len() == before {
            tracing::debug!("No entry with id {} to delete", id);
        } else {
            tracing::debug!("Deleted entry {}", id);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    /// Entries for one exercise (case-insensitive), most recent first
    pub fn entries_for_exercise(&self, name: &str) -> Vec<WorkoutEntry> {
        let wanted = name.to_lowercase();
        let mut entries: Vec<WorkoutEntry> = self
            .get_all_entries()
            .into_iter()
            .filter(|e| e.exercise.to_lowercase() == wanted)
            .collect();
        sort_newest_first(&mut entries);
        entries
    }

    /// All entries, most recent first
    pub fn history(&self) -> Vec<WorkoutEntry> {
        let mut entries = self.get_all_entries();
        sort_newest_first(&mut entries);
        entries
    }

    /// Grouped entries
    pub fn groups(&self) -> Vec<ExerciseGroup> {
        group_by_exercise(&self.get_all_entries())
    }

    /// Every stored exercise with its group, if it has entries
    pub fn exercise_overview(&self) -> Vec<ExerciseOverview> {
        let exercises = self.get_exercises();
        let groups = self.groups();
        merge_with_groups(&exercises, &groups)
    }
}
