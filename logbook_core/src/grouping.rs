//! Per-exercise grouping of the flat entry collection.
//!
//! Groups are keyed case-insensitively (`exercise.to_lowercase().trim()`)
//! and drive the exercise list and detail views.

use crate::{ExerciseGroup, ExerciseOverview, WorkoutEntry};
use std::cmp::Ordering;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Primary collation key: accents stripped, case folded ("Überzüge" -> "uberzuge")
fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Locale-style comparison used to order exercise names
///
/// Compares with accents and case folded away first, so "Überzüge" sorts
/// with the U names. Ties fall back to accents ("u" < "ü"), then to case
/// with lowercase before uppercase ("bench" < "Bench"), like the default
/// collation of most locales.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Grouping key for an exercise name
pub(crate) fn group_key(exercise: &str) -> String {
    exercise.to_lowercase().trim().to_string()
}

/// Sort entries most recent first. Stable, so ties keep their input order.
pub(crate) fn sort_newest_first(entries: &mut [WorkoutEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Group entries by exercise
///
/// Returns one group per case-insensitive exercise key, ordered by
/// [`locale_cmp`] on the display name. The display name and `last_*`
/// fields come from the most recent entry of each group.
pub fn group_by_exercise(entries: &[WorkoutEntry]) -> Vec<ExerciseGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut partitions: Vec<Vec<WorkoutEntry>> = Vec::new();

    for entry in entries {
        let key = group_key(&entry.exercise);
        let slot = *index.entry(key).or_insert_with(|| {
            partitions.push(Vec::new());
            partitions.len() - 1
        });
        partitions[slot].push(entry.clone());
    }

    let mut groups: Vec<ExerciseGroup> = partitions
        .into_iter()
        .filter_map(|mut items| {
            sort_newest_first(&mut items);
            let latest = items.first()?.clone();
            Some(ExerciseGroup {
                exercise: latest.exercise,
                last_weight: latest.weight,
                last_reps: latest.reps,
                last_date: latest.date,
                entries: items,
            })
        })
        .collect();

    groups.sort_by(|a, b| locale_cmp(&a.exercise, &b.exercise));

    tracing::trace!(
        "Grouped {} entries into {} exercises",
        entries.len(),
        groups.len()
    );
    groups
}

/// Pair every stored exercise name with its group
///
/// Names without entries get `None`. Entries whose exercise is missing from
/// `exercises` are not listed here; they still show up in
/// [`group_by_exercise`].
pub fn merge_with_groups(exercises: &[String], groups: &[ExerciseGroup]) -> Vec<ExerciseOverview> {
    exercises
        .iter()
        .map(|name| {
            let wanted = name.to_lowercase();
            ExerciseOverview {
                name: name.clone(),
                group: groups
                    .iter()
                    .find(|g| g.exercise.to_lowercase() == wanted)
                    .cloned(),
            }
        })
        .collect()
}
