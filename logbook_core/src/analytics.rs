//! Derived statistics, progression suggestions and chart series.
//!
//! Everything here is a pure function of the entry slice passed in. Unlike
//! grouping, exercises are keyed by their exact stored string.

use crate::config::ProgressionConfig;
use crate::grouping::sort_newest_first;
use crate::{
    ChartData, ChartMetric, ExerciseTrend, ExerciseVolume, WorkoutEntry, WorkoutStats,
};
use chrono::{DateTime, Datelike, Local, Utc};
use std::collections::{HashMap, HashSet};

/// Default number of points in a chart series
pub const DEFAULT_CHART_LIMIT: usize = 10;

/// Default number of exercises in the volume ranking
pub const DEFAULT_TOP_LIMIT: usize = 5;

/// Partition entries by exact exercise string, keeping first-seen order
fn partition_exact(entries: &[WorkoutEntry]) -> Vec<(String, Vec<&WorkoutEntry>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut partitions: Vec<(String, Vec<&WorkoutEntry>)> = Vec::new();

    for entry in entries {
        let slot = *index.entry(entry.exercise.as_str()).or_insert_with(|| {
            partitions.push((entry.exercise.clone(), Vec::new()));
            partitions.len() - 1
        });
        partitions[slot].1.push(entry);
    }

    partitions
}

/// General workout statistics
///
/// Each logged set counts as one workout. On a frequency tie the exercise
/// seen first wins.
pub fn get_workout_stats(entries: &[WorkoutEntry]) -> WorkoutStats {
    let unique: HashSet<&str> = entries.iter().map(|e| e.exercise.as_str()).collect();

    let partitions = partition_exact(entries);
    let mut most_frequent: Option<(&str, usize)> = None;
    for (exercise, items) in &partitions {
        let count = items.len();
        if most_frequent.map_or(true, |(_, best)| count > best) {
            most_frequent = Some((exercise.as_str(), count));
        }
    }
    let most_frequent_exercise = most_frequent.map(|(name, _)| name.to_string());

    let total_volume: f64 = entries.iter().map(WorkoutEntry::volume).sum();

    let mut last_workout_date: Option<DateTime<Utc>> = None;
    for entry in entries {
        if last_workout_date.map_or(true, |last| entry.date > last) {
            last_workout_date = Some(entry.date);
        }
    }

    WorkoutStats {
        total_workouts: entries.len(),
        unique_exercises: unique.len(),
        most_frequent_exercise,
        total_volume,
        last_workout_date,
    }
}

/// Suggest weight increases using the default plateau window and increment
pub fn analyze_weight_progression(entries: &[WorkoutEntry]) -> Vec<ExerciseTrend> {
    analyze_weight_progression_with(entries, &ProgressionConfig::default())
}

/// Suggest weight increases for exercises that have plateaued
///
/// An exercise qualifies when its `config.window` most recent entries all
/// share the same weight. Exercises with fewer entries are skipped.
pub fn analyze_weight_progression_with(
    entries: &[WorkoutEntry],
    config: &ProgressionConfig,
) -> Vec<ExerciseTrend> {
    let window = config.window.max(1);
    let mut trends = Vec::new();

    for (exercise, items) in partition_exact(entries) {
        if items.len() < window {
            continue;
        }

        let mut sorted: Vec<WorkoutEntry> = items.into_iter().cloned().collect();
        sort_newest_first(&mut sorted);
        let recent = &sorted[..window];

        let weights: Vec<f64> = recent.iter().map(|e| e.weight).collect();
        let current_weight = weights[0];
        let should_increase = weights.iter().all(|w| *w == current_weight);

        if !should_increase {
            continue;
        }

        tracing::debug!(
            "{} plateaued at {} for {} sets",
            exercise,
            current_weight,
            window
        );

        trends.push(ExerciseTrend {
            exercise,
            last_five_weights: weights,
            last_five_dates: recent.iter().map(|e| e.date).collect(),
            should_increase,
            current_weight,
            suggested_weight: current_weight + config.increment,
        });
    }

    trends
}

/// Short `day.month` chart label in local time (e.g. "5.3")
pub fn chart_label(date: DateTime<Utc>) -> String {
    let local = date.with_timezone(&Local);
    format!("{}.{}", local.day(), local.month())
}

/// Chart series over an already filtered entry slice
///
/// Keeps the `limit` most recent entries, in chronological order. A limit
/// of 0 yields an empty series; callers reject it before getting here.
pub fn get_exercise_series(entries: &[WorkoutEntry], metric: ChartMetric, limit: usize) -> ChartData {
    let mut sorted: Vec<&WorkoutEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));
    let recent = &sorted[sorted.len().saturating_sub(limit)..];

    ChartData {
        labels: recent.iter().map(|e| chart_label(e.date)).collect(),
        data: recent.iter().map(|e| metric.value_of(e)).collect(),
    }
}

/// Weight chart for one exercise (exact name match)
pub fn get_exercise_chart_data(
    entries: &[WorkoutEntry],
    exercise_name: &str,
    limit: usize,
) -> ChartData {
    let matching: Vec<WorkoutEntry> = entries
        .iter()
        .filter(|e| e.exercise == exercise_name)
        .cloned()
        .collect();
    get_exercise_series(&matching, ChartMetric::Weight, limit)
}

/// Exercises ranked by summed volume, highest first
///
/// Equal volumes keep first-seen order.
pub fn get_top_exercises_by_volume(entries: &[WorkoutEntry], limit: usize) -> Vec<ExerciseVolume> {
    let mut ranking: Vec<ExerciseVolume> = partition_exact(entries)
        .into_iter()
        .map(|(exercise, items)| ExerciseVolume {
            exercise,
            volume: items.iter().map(|e| e.volume()).sum(),
        })
        .collect();

    ranking.sort_by(|a, b| b.volume.total_cmp(&a.volume));
    ranking.truncate(limit);
    ranking
}

/// Heaviest weight in the slice, 0 when empty
pub fn max_weight(entries: &[WorkoutEntry]) -> f64 {
    entries.iter().map(|e| e.weight).fold(0.0, f64::max)
}

/// Most reps in a single set, 0 when empty
pub fn max_reps(entries: &[WorkoutEntry]) -> u32 {
    entries.iter().map(|e| e.reps).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn entry(exercise: &str, weight: f64, reps: u32, day: i64) -> WorkoutEntry {
        WorkoutEntry {
            id: format!("{}-{}", exercise, day),
            exercise: exercise.into(),
            weight,
            reps,
            date: base() + Duration::days(day),
        }
    }

    #[test]
    fn test_stats_volume_and_count() {
        let entries = vec![entry("Squat", 100.0, 5, 0), entry("Bench", 80.0, 10, 1)];
        let stats = get_workout_stats(&entries);

        assert_eq!(stats.total_volume, 1300.0);
        assert_eq!(stats.total_workouts, 2);
        assert_eq!(stats.unique_exercises, 2);
        assert_eq!(stats.last_workout_date, Some(base() + Duration::days(1)));
    }

    #[test]
    fn test_stats_empty() {
        let stats = get_workout_stats(&[]);
        assert_eq!(stats, WorkoutStats::default());
        assert!(stats.most_frequent_exercise.is_none());
        assert!(stats.last_workout_date.is_none());
    }

    #[test]
    fn test_stats_most_frequent_first_wins_on_tie() {
        let entries = vec![
            entry("Row", 50.0, 10, 0),
            entry("Curl", 12.0, 10, 1),
            entry("Curl", 12.0, 10, 2),
            entry("Row", 50.0, 10, 3),
        ];
        let stats = get_workout_stats(&entries);
        assert_eq!(stats.most_frequent_exercise.as_deref(), Some("Row"));

        let entries = vec![
            entry("Row", 50.0, 10, 0),
            entry("Curl", 12.0, 10, 1),
            entry("Curl", 12.0, 10, 2),
        ];
        let stats = get_workout_stats(&entries);
        assert_eq!(stats.most_frequent_exercise.as_deref(), Some("Curl"));
    }

    #[test]
    fn test_stats_unique_is_case_sensitive() {
        let entries = vec![entry("Squat", 100.0, 5, 0), entry("squat", 100.0, 5, 1)];
        assert_eq!(get_workout_stats(&entries).unique_exercises, 2);
    }

    #[test]
    fn test_last_workout_date_ignores_input_order() {
        let entries = vec![
            entry("Squat", 100.0, 5, 4),
            entry("Squat", 100.0, 5, 9),
            entry("Squat", 100.0, 5, 2),
        ];
        let stats = get_workout_stats(&entries);
        assert_eq!(stats.last_workout_date, Some(base() + Duration::days(9)));
    }

    #[test]
    fn test_progression_suggests_increase_on_plateau() {
        let entries: Vec<_> = (0..5).map(|d| entry("Bench", 100.0, 5, d)).collect();
        let trends = analyze_weight_progression(&entries);

        assert_eq!(trends.len(), 1);
        let trend = &trends[0];
        assert_eq!(trend.exercise, "Bench");
        assert_eq!(trend.current_weight, 100.0);
        assert_eq!(trend.suggested_weight, 102.5);
        assert!(trend.should_increase);
        assert_eq!(trend.last_five_weights, vec![100.0; 5]);
        assert_eq!(trend.last_five_dates[0], base() + Duration::days(4));
    }

    #[test]
    fn test_progression_excludes_varied_weights() {
        let mut entries: Vec<_> = (0..4).map(|d| entry("Bench", 100.0, 5, d)).collect();
        entries.push(entry("Bench", 95.0, 5, 4));

        assert!(analyze_weight_progression(&entries).is_empty());
    }

    #[test]
    fn test_progression_only_looks_at_most_recent_window() {
        // Older sets at a lower weight do not break the plateau
        let mut entries: Vec<_> = (0..3).map(|d| entry("Squat", 90.0, 5, d)).collect();
        entries.extend((3..8).map(|d| entry("Squat", 110.0, 5, d)));

        let trends = analyze_weight_progression(&entries);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].suggested_weight, 112.5);
    }

    #[test]
    fn test_progression_needs_full_window() {
        let entries: Vec<_> = (0..4).map(|d| entry("Bench", 100.0, 5, d)).collect();
        assert!(analyze_weight_progression(&entries).is_empty());
    }

    #[test]
    fn test_progression_with_custom_config() {
        let entries: Vec<_> = (0..3).map(|d| entry("Press", 40.0, 8, d)).collect();
        let config = ProgressionConfig {
            window: 3,
            increment: 1.25,
        };

        let trends = analyze_weight_progression_with(&entries, &config);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].suggested_weight, 41.25);
        assert_eq!(trends[0].last_five_weights.len(), 3);
    }

    #[test]
    fn test_chart_data_exact_match_chronological() {
        let entries = vec![
            entry("Bench", 82.5, 5, 2),
            entry("Bench", 80.0, 5, 0),
            entry("bench", 70.0, 5, 1),
            entry("Bench", 85.0, 5, 3),
        ];
        let chart = get_exercise_chart_data(&entries, "Bench", DEFAULT_CHART_LIMIT);

        assert_eq!(chart.data, vec![80.0, 82.5, 85.0]);
        assert_eq!(chart.labels.len(), 3);
        assert_eq!(chart.labels[0], chart_label(base()));
    }

    #[test]
    fn test_chart_data_keeps_most_recent() {
        let entries: Vec<_> = (0..15)
            .map(|d| entry("Squat", 100.0 + d as f64, 5, d))
            .collect();
        let chart = get_exercise_chart_data(&entries, "Squat", 10);

        assert_eq!(chart.data.len(), 10);
        assert_eq!(chart.data[0], 105.0);
        assert_eq!(chart.data[9], 114.0);
    }

    #[test]
    fn test_chart_data_unknown_exercise() {
        let entries = vec![entry("Squat", 100.0, 5, 0)];
        assert_eq!(
            get_exercise_chart_data(&entries, "Bench", 10),
            ChartData::default()
        );
    }

    #[test]
    fn test_series_metrics() {
        let entries = vec![entry("Row", 50.0, 10, 1), entry("Row", 40.0, 12, 0)];

        assert_eq!(
            get_exercise_series(&entries, ChartMetric::Reps, 10).data,
            vec![12.0, 10.0]
        );
        assert_eq!(
            get_exercise_series(&entries, ChartMetric::Volume, 10).data,
            vec![480.0, 500.0]
        );
    }

    #[test]
    fn test_chart_label_format() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let local = date.with_timezone(&Local);
        assert_eq!(
            chart_label(date),
            format!("{}.{}", local.day(), local.month())
        );
    }

    #[test]
    fn test_top_exercises_by_volume() {
        let entries = vec![entry("Squat", 100.0, 5, 0), entry("Bench", 80.0, 5, 1)];
        let top = get_top_exercises_by_volume(&entries, 1);

        assert_eq!(
            top,
            vec![ExerciseVolume {
                exercise: "Squat".into(),
                volume: 500.0
            }]
        );
    }

    #[test]
    fn test_top_exercises_sums_and_keeps_tie_order() {
        let entries = vec![
            entry("Row", 50.0, 10, 0),
            entry("Curl", 20.0, 10, 1),
            entry("Press", 250.0, 2, 2),
            entry("Curl", 30.0, 10, 3),
        ];
        let top = get_top_exercises_by_volume(&entries, DEFAULT_TOP_LIMIT);
        let names: Vec<_> = top.iter().map(|v| v.exercise.as_str()).collect();

        assert_eq!(names, vec!["Row", "Curl", "Press"]);
        assert!(top.iter().all(|v| v.volume == 500.0));
    }

    #[test]
    fn test_analytics_empty_input() {
        assert!(analyze_weight_progression(&[]).is_empty());
        assert!(get_top_exercises_by_volume(&[], 5).is_empty());
        assert_eq!(get_exercise_chart_data(&[], "x", 10), ChartData::default());
        assert_eq!(max_weight(&[]), 0.0);
        assert_eq!(max_reps(&[]), 0);
    }

    #[test]
    fn test_max_weight() {
        let entries = vec![
            entry("Squat", 100.0, 5, 0),
            entry("Squat", 120.0, 3, 1),
            entry("Squat", 110.0, 4, 2),
        ];
        assert_eq!(max_weight(&entries), 120.0);
    }

    #[test]
    fn test_max_reps_is_independent_of_max_weight() {
        let entries = vec![
            entry("Squat", 100.0, 5, 0),
            entry("Squat", 60.0, 15, 1),
            entry("Squat", 120.0, 3, 2),
        ];
        assert_eq!(max_reps(&entries), 15);
        assert_eq!(max_weight(&entries), 120.0);
    }

    #[test]
    fn test_series_zero_limit_is_empty() {
        let entries = vec![entry("Row", 50.0, 10, 0), entry("Row", 55.0, 10, 1)];
        assert_eq!(
            get_exercise_series(&entries, ChartMetric::Weight, 0),
            ChartData::default()
        );
    }
}
