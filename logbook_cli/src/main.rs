use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use logbook_core::analytics::{
    analyze_weight_progression_with, get_exercise_series, max_reps, max_weight,
};
use logbook_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logbook")]
#[command(about = "Personal gym logbook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List exercises with their latest set (default)
    Exercises,

    /// Add an exercise
    AddExercise { name: String },

    /// Delete an exercise and all of its entries
    DeleteExercise { name: String },

    /// Log a set
    Log {
        exercise: String,
        weight: f64,
        reps: u32,

        /// When the set was performed (RFC 3339 or YYYY-MM-DD), defaults to now
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a logged set by ID
    DeleteEntry { id: String },

    /// All logged sets, most recent first
    History,

    /// Sets and best weight for one exercise
    Show { name: String },

    /// Entries grouped by exercise
    Groups,

    /// Overall statistics
    Stats,

    /// Weight increase suggestions for plateaued exercises
    Suggest,

    /// Chart series for one exercise
    Chart {
        name: String,

        /// weight, reps or volume
        #[arg(long, default_value = "weight")]
        metric: String,

        /// Number of most recent sets to plot (at least 1)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Exercises ranked by total volume
    Top {
        /// Number of exercises to list (at least 1)
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    logbook_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let repo = Repository::new(FileStore::new(data_dir));

    match cli.command.unwrap_or(Commands::Exercises) {
        Commands::Exercises => cmd_exercises(&repo),
        Commands::AddExercise { name } => cmd_add_exercise(&repo, &name),
        Commands::DeleteExercise { name } => {
            repo.delete_exercise(&name)?;
            println!("✓ Deleted {} and its entries", name);
            Ok(())
        }
        Commands::Log {
            exercise,
            weight,
            reps,
            date,
        } => cmd_log(&repo, &exercise, weight, reps, date.as_deref()),
        Commands::DeleteEntry { id } => {
            repo.delete_entry(&id)?;
            println!("✓ Deleted entry {}", id);
            Ok(())
        }
        Commands::History => {
            for entry in repo.history() {
                print_entry(&entry, true);
            }
            Ok(())
        }
        Commands::Show { name } => cmd_show(&repo, &name, &config),
        Commands::Groups => {
            for group in repo.groups() {
                println!("{} ({} sets)", group.exercise, group.entries.len());
                for entry in &group.entries {
                    print_entry(entry, false);
                }
            }
            Ok(())
        }
        Commands::Stats => cmd_stats(&repo),
        Commands::Suggest => cmd_suggest(&repo, &config),
        Commands::Chart {
            name,
            metric,
            limit,
        } => cmd_chart(&repo, &name, &metric, limit.unwrap_or(config.charts.limit)),
        Commands::Top { limit } => {
            let entries = repo.get_all_entries();
            let limit = limit.unwrap_or(config.ranking.top_limit);
            if limit == 0 {
                return Err(Error::Other("--limit must be at least 1".into()));
            }
            for (rank, item) in get_top_exercises_by_volume(&entries, limit)
                .iter()
                .enumerate()
            {
                println!("{}. {}: {} kg", rank + 1, item.exercise, item.volume);
            }
            Ok(())
        }
    }
}

fn cmd_exercises<S: KeyValueStore>(repo: &Repository<S>) -> Result<()> {
    let overview = repo.exercise_overview();
    if overview.is_empty() {
        println!("No exercises yet. Add one with `logbook add-exercise NAME`.");
        return Ok(());
    }

    for item in overview {
        match item.group {
            Some(group) => println!(
                "{}: {}kg × {} ({})",
                item.name,
                group.last_weight,
                group.last_reps,
                group.last_date.format("%d.%m.%Y")
            ),
            None => println!("{}: no entries", item.name),
        }
    }
    Ok(())
}

fn cmd_add_exercise<S: KeyValueStore>(repo: &Repository<S>, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Other("Exercise name must not be empty".into()));
    }
    repo.add_exercise(name)?;
    println!("✓ Exercise {} saved", name.trim());
    Ok(())
}

fn cmd_log<S: KeyValueStore>(
    repo: &Repository<S>,
    exercise: &str,
    weight: f64,
    reps: u32,
    date: Option<&str>,
) -> Result<()> {
    if exercise.trim().is_empty() {
        return Err(Error::Other("Exercise name must not be empty".into()));
    }
    if !weight.is_finite() || weight <= 0.0 {
        return Err(Error::Other(format!("Invalid weight: {}", weight)));
    }
    if reps == 0 {
        return Err(Error::Other("Reps must be at least 1".into()));
    }

    let now = Utc::now();
    let date = match date {
        Some(raw) => parse_date(raw)?,
        None => now,
    };
    if date > now {
        return Err(Error::Other(format!("Date {} is in the future", date)));
    }

    let entry = create_entry(exercise, weight, reps, date);
    repo.save_entry(&entry)?;

    println!("✓ Logged {}: {}kg × {}", entry.exercise, entry.weight, entry.reps);
    println!("  ID: {}", entry.id);
    Ok(())
}

fn cmd_show<S: KeyValueStore>(repo: &Repository<S>, name: &str, config: &Config) -> Result<()> {
    let entries = repo.entries_for_exercise(name);
    if entries.is_empty() {
        println!("No entries for {}", name);
        return Ok(());
    }

    println!("{}", entries[0].exercise);
    println!("  Best: {} kg", max_weight(&entries));
    println!("  Max reps: {}", max_reps(&entries));
    println!("  Sets: {}", entries.len());
    println!();
    for entry in &entries {
        print_entry(entry, false);
    }

    let chart = get_exercise_series(&entries, ChartMetric::Weight, config.charts.limit);
    if chart.data.len() >= 2 {
        println!();
        print_chart(&chart);
    }
    Ok(())
}

fn cmd_stats<S: KeyValueStore>(repo: &Repository<S>) -> Result<()> {
    let stats = get_workout_stats(&repo.get_all_entries());

    println!("Total sets:       {}", stats.total_workouts);
    println!("Exercises:        {}", stats.unique_exercises);
    println!(
        "Most frequent:    {}",
        stats.most_frequent_exercise.as_deref().unwrap_or("-")
    );
    println!("Total volume:     {} kg", stats.total_volume);
    match stats.last_workout_date {
        Some(date) => println!("Last workout:     {}", date.format("%d.%m.%Y")),
        None => println!("Last workout:     -"),
    }
    Ok(())
}

fn cmd_suggest<S: KeyValueStore>(repo: &Repository<S>, config: &Config) -> Result<()> {
    let trends = analyze_weight_progression_with(&repo.get_all_entries(), &config.progression);
    if trends.is_empty() {
        println!("No suggestions yet.");
        return Ok(());
    }

    for trend in trends {
        println!(
            "↑ {}: {} kg → {} kg",
            trend.exercise, trend.current_weight, trend.suggested_weight
        );
    }
    Ok(())
}

fn cmd_chart<S: KeyValueStore>(
    repo: &Repository<S>,
    name: &str,
    metric: &str,
    limit: usize,
) -> Result<()> {
    if limit == 0 {
        return Err(Error::Other("--limit must be at least 1".into()));
    }

    let metric = match metric.to_lowercase().as_str() {
        "weight" => ChartMetric::Weight,
        "reps" => ChartMetric::Reps,
        "volume" => ChartMetric::Volume,
        other => {
            eprintln!("Unknown metric: {}. Using weight.", other);
            ChartMetric::Weight
        }
    };

    let entries = repo.get_all_entries();
    let chart = match metric {
        ChartMetric::Weight => get_exercise_chart_data(&entries, name, limit),
        _ => {
            let matching: Vec<_> = entries.into_iter().filter(|e| e.exercise == name).collect();
            get_exercise_series(&matching, metric, limit)
        }
    };

    if chart.data.is_empty() {
        println!("No entries for {}", name);
        return Ok(());
    }
    print_chart(&chart);
    Ok(())
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| Error::Other(format!("Invalid date {:?}: {}", raw, e)))?;
    day.and_hms_opt(12, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| Error::Other(format!("Invalid date {:?}", raw)))
}

fn print_entry(entry: &WorkoutEntry, with_exercise: bool) {
    let date = entry.date.format("%a %d.%m.%Y");
    if with_exercise {
        println!(
            "  {}  {}: {}kg × {}  [{}]",
            date, entry.exercise, entry.weight, entry.reps, entry.id
        );
    } else {
        println!("  {}  {}kg × {}  [{}]", date, entry.weight, entry.reps, entry.id);
    }
}

fn print_chart(chart: &ChartData) {
    let max = chart.data.iter().cloned().fold(0.0, f64::max);
    for (label, value) in chart.labels.iter().zip(&chart.data) {
        let width = if max > 0.0 {
            ((value / max) * 30.0).round() as usize
        } else {
            0
        };
        println!("  {:>6} │{} {}", label, "█".repeat(width), value);
    }
}
