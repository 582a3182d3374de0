use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use college_ready::colleges;
use college_ready::config::{self, init::InitOptions, ColorMode, Config};
use college_ready::dashboard::DashboardSummary;
use college_ready::output;
use college_ready::scoring::{score_snapshot, ReadinessBand};
use college_ready::student::{
    self, ApplicationType, CollegeCategory, CollegeListEntry, ProfileUpdate, Snapshot, Task,
    TaskCategory, TaskPriority, TaskStatus,
};
use college_ready::timeline::{self, TaskFilter};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_USAGE: i32 = 5;

#[derive(Subcommand, Debug)]
enum TaskAction {
    /// Add a task with a due date
    Add {
        /// What needs doing
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        due: NaiveDate,
        /// Task category (e.g. essay, testing, financial-aid)
        #[arg(long, value_parser = parse_task_category, default_value = "academic")]
        category: TaskCategory,
        /// low, medium, high or critical
        #[arg(long, value_parser = parse_task_priority, default_value = "medium")]
        priority: TaskPriority,
        /// Who owns the task
        #[arg(long, default_value = "Student")]
        owner: String,
        /// Task id (defaults to the next free "t<n>")
        #[arg(long)]
        id: Option<String>,
    },
    /// Mark a task completed
    Done {
        /// Task id
        id: String,
    },
    /// Move a completed task back to not started
    Reopen {
        /// Task id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum CollegeAction {
    /// Add a college to your list
    Add {
        /// Unique id for the college (e.g. "mit")
        id: String,
        /// College name
        name: String,
        /// reach, target or safety
        #[arg(long, value_parser = parse_college_category, default_value = "target")]
        category: CollegeCategory,
        /// Application type: ed, ed2, ea, rea or rd
        #[arg(long = "type", value_parser = parse_application_type, default_value = "rd")]
        application_type: ApplicationType,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
    },
    /// Remove a college from your list
    Remove {
        /// Id of the college to remove
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// Create or update the profile; only the given fields change
    Set {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Grade (6-12)
        #[arg(long, value_parser = clap::value_parser!(u8).range(6..=12))]
        grade: Option<u8>,
        /// Two-letter state code
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        school_name: Option<String>,
        #[arg(long)]
        gpa_weighted: Option<f64>,
        #[arg(long)]
        gpa_unweighted: Option<f64>,
        #[arg(long)]
        sat: Option<u32>,
        #[arg(long)]
        act: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the readiness score (default if no subcommand)
    Score,
    /// Show readiness, counts, overdue alerts and upcoming tasks
    Dashboard,
    /// List tasks grouped into overdue, upcoming and completed
    Tasks {
        /// Only tasks with this status (not-started, in-progress, completed)
        #[arg(long, value_parser = parse_task_status)]
        status: Option<TaskStatus>,
        /// Only tasks in this category (e.g. essay, letter-of-rec)
        #[arg(long, value_parser = parse_task_category)]
        category: Option<TaskCategory>,
        /// Only open tasks due within this window (e.g. "7d", "2weeks")
        #[arg(long, value_parser = humantime::parse_duration)]
        within: Option<std::time::Duration>,
        #[command(subcommand)]
        action: Option<TaskAction>,
    },
    /// Show the college list grouped into reach, target and safety
    Colleges {
        /// Filter by name, city or state
        #[arg(long)]
        search: Option<String>,
        #[command(subcommand)]
        action: Option<CollegeAction>,
    },
    /// Show the student profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
    /// Create a starter config and snapshot
    Init {
        /// Overwrite an existing config (the snapshot is always kept)
        #[arg(long)]
        force: bool,
        /// Student first name
        #[arg(long)]
        name: Option<String>,
        /// Student grade (6-12)
        #[arg(long, value_parser = clap::value_parser!(u8).range(6..=12))]
        grade: Option<u8>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "college-ready")]
#[command(about = "College application readiness planner", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/college-ready/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the student snapshot (overrides the config)
    #[arg(short, long, global = true)]
    snapshot: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Normalize "Letter of Rec" / "letter_of_rec" / "LETTER-OF-REC" to one form
fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace([' ', '_'], "-")
}

fn parse_choice<T: Display + Copy>(input: &str, choices: &[T]) -> Result<T, String> {
    let wanted = normalize(input);
    choices
        .iter()
        .copied()
        .find(|c| normalize(&c.to_string()) == wanted)
        .ok_or_else(|| {
            let names: Vec<String> = choices.iter().map(|c| normalize(&c.to_string())).collect();
            format!("expected one of: {}", names.join(", "))
        })
}

fn parse_task_status(s: &str) -> Result<TaskStatus, String> {
    parse_choice(
        s,
        &[TaskStatus::NotStarted, TaskStatus::InProgress, TaskStatus::Completed],
    )
}

fn parse_task_category(s: &str) -> Result<TaskCategory, String> {
    parse_choice(s, &TaskCategory::ALL)
}

fn parse_task_priority(s: &str) -> Result<TaskPriority, String> {
    parse_choice(
        s,
        &[
            TaskPriority::Low,
            TaskPriority::Medium,
            TaskPriority::High,
            TaskPriority::Critical,
        ],
    )
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected a date like 2026-11-01: {}", e))
}

fn parse_college_category(s: &str) -> Result<CollegeCategory, String> {
    parse_choice(s, &CollegeCategory::ALL)
}

fn parse_application_type(s: &str) -> Result<ApplicationType, String> {
    parse_choice(
        s,
        &[
            ApplicationType::ED,
            ApplicationType::ED2,
            ApplicationType::EA,
            ApplicationType::REA,
            ApplicationType::RD,
        ],
    )
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "college_ready=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_with(code: i32, context: &str, err: anyhow::Error) -> ! {
    eprintln!("{}: {:#}", context, err);
    std::process::exit(code);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with(EXIT_CONFIG, "Failed to encode JSON", e.into()),
    }
}

fn load_snapshot_or_exit(path: &Path) -> Snapshot {
    let snapshot = match student::load_snapshot(path) {
        Ok(s) => s,
        Err(e) => exit_with(EXIT_CONFIG, "Snapshot error", e),
    };

    // Odd values never block scoring, so these are warnings only
    if let Err(warnings) = student::validate_snapshot(&snapshot) {
        for warning in warnings {
            tracing::warn!("{}", warning);
        }
    }
    snapshot
}

fn save_snapshot_or_exit(path: &Path, snapshot: &Snapshot) {
    if let Err(e) = student::save_snapshot(path, snapshot) {
        exit_with(EXIT_CONFIG, "Failed to save snapshot", e);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Score);
    let now = chrono::Utc::now();

    // Init runs before any config exists
    let command = match command {
        Commands::Init { force, name, grade } => {
            let options = InitOptions {
                config_path: cli.config.map(PathBuf::from),
                snapshot_path: cli.snapshot.map(PathBuf::from),
                first_name: name,
                grade,
                force,
            };
            match config::init::run_init(options) {
                Ok(outcome) => {
                    println!("Config written to {}", outcome.config_path.display());
                    if outcome.snapshot_created {
                        println!("Snapshot written to {}", outcome.snapshot_path.display());
                    } else {
                        println!("Keeping existing snapshot at {}", outcome.snapshot_path.display());
                    }
                    println!("Run `college-ready` to see your readiness score.");
                }
                Err(e) => exit_with(EXIT_CONFIG, "Init failed", e),
            }
            std::process::exit(EXIT_SUCCESS);
        }
        other => other,
    };

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config: Config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, "Config error", e),
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let snapshot_path = match cli.snapshot {
        Some(p) => config::expand_home(Path::new(&p)),
        None => match config.snapshot_path() {
            Ok(p) => p,
            Err(e) => exit_with(EXIT_CONFIG, "Config error", e),
        },
    };
    tracing::debug!(path = %snapshot_path.display(), "using snapshot");

    let mut snapshot = load_snapshot_or_exit(&snapshot_path);
    let use_colors = !cli.json && output::should_use_colors(config.colors.unwrap_or(ColorMode::Auto));

    match command {
        Commands::Score => {
            let result = score_snapshot(&snapshot);
            tracing::debug!(score = result.score, raw = result.raw, tier = ?result.tier, "scored");
            if cli.json {
                print_json(&serde_json::json!({
                    "score": result.score,
                    "band": ReadinessBand::from_score(result.score),
                    "raw": result.raw,
                    "tier": result.tier,
                    "breakdown": result.breakdown,
                }));
            } else {
                println!("{}", output::format_readiness(&result, cli.verbose, use_colors));
            }
        }
        Commands::Dashboard => {
            let summary = DashboardSummary::build(&snapshot, now, config.upcoming_limit());
            if cli.json {
                print_json(&summary);
            } else {
                println!("{}", output::format_dashboard(&summary, cli.verbose, use_colors));
            }
        }
        Commands::Tasks {
            action:
                Some(TaskAction::Add {
                    title,
                    due,
                    category,
                    priority,
                    owner,
                    id,
                }),
            ..
        } => {
            let task = Task {
                id: id.unwrap_or_else(|| timeline::next_task_id(&snapshot.tasks)),
                title,
                category,
                owner,
                priority,
                status: TaskStatus::NotStarted,
                due_date: Some(due),
                completed_at: None,
            };
            let line = output::format_task_line(&task, use_colors);
            let id = task.id.clone();
            if let Err(e) = timeline::add_task(&mut snapshot.tasks, task) {
                exit_with(EXIT_USAGE, "Task error", e);
            }
            save_snapshot_or_exit(&snapshot_path, &snapshot);
            println!("Added task {}: {}", id, line);
        }
        Commands::Tasks {
            action: Some(action),
            ..
        } => {
            let (result, verb, id) = match action {
                TaskAction::Add { .. } => unreachable!("handled above"),
                TaskAction::Done { id } => {
                    (timeline::complete_task(&mut snapshot.tasks, &id, now), "Completed", id)
                }
                TaskAction::Reopen { id } => {
                    (timeline::reopen_task(&mut snapshot.tasks, &id), "Reopened", id)
                }
            };
            if let Err(e) = result {
                exit_with(EXIT_USAGE, "Task error", e);
            }
            save_snapshot_or_exit(&snapshot_path, &snapshot);
            println!("{} task {}", verb, id);
        }
        Commands::Tasks {
            status,
            category,
            within,
            action: None,
        } => {
            let filter = TaskFilter { status, category };
            if let Some(window) = within {
                let due: Vec<_> = timeline::due_within(&snapshot.tasks, now, window)
                    .into_iter()
                    .filter(|t| filter.matches(t))
                    .collect();
                if cli.json {
                    print_json(&due);
                } else {
                    println!("{}", output::format_task_list(&due, use_colors));
                }
            } else {
                let groups = timeline::group_tasks(&snapshot.tasks, &filter, now);
                if cli.json {
                    print_json(&groups);
                } else {
                    println!("{}", output::format_task_groups(&groups, use_colors));
                }
            }
        }
        Commands::Colleges {
            action: Some(action),
            ..
        } => {
            match action {
                CollegeAction::Add {
                    id,
                    name,
                    category,
                    application_type,
                    city,
                    state,
                } => {
                    let entry = CollegeListEntry {
                        id,
                        college_name: name,
                        city,
                        state,
                        category,
                        application_type,
                    };
                    let line = output::format_college_line(&entry, use_colors);
                    if let Err(e) = colleges::add_college(&mut snapshot.colleges, entry) {
                        exit_with(EXIT_USAGE, "College error", e);
                    }
                    save_snapshot_or_exit(&snapshot_path, &snapshot);
                    println!("Added {}", line);
                }
                CollegeAction::Remove { id } => {
                    let removed = match colleges::remove_college(&mut snapshot.colleges, &id) {
                        Ok(r) => r,
                        Err(e) => exit_with(EXIT_USAGE, "College error", e),
                    };
                    save_snapshot_or_exit(&snapshot_path, &snapshot);
                    println!("Removed {}", removed.college_name);
                }
            }
        }
        Commands::Colleges {
            search,
            action: None,
        } => {
            let matches = colleges::search(&snapshot.colleges, search.as_deref().unwrap_or(""));
            let groups = colleges::group_by_category(matches);
            if cli.json {
                print_json(&groups);
            } else {
                println!("{}", output::format_college_groups(&groups, use_colors));
            }
        }
        Commands::Profile {
            action:
                Some(ProfileAction::Set {
                    first_name,
                    last_name,
                    grade,
                    state,
                    school_name,
                    gpa_weighted,
                    gpa_unweighted,
                    sat,
                    act,
                }),
        } => {
            let update = ProfileUpdate {
                first_name,
                last_name,
                grade,
                state,
                school_name,
                gpa_weighted,
                gpa_unweighted,
                sat,
                act,
            };
            if update.is_empty() {
                eprintln!("Nothing to update. Pass at least one field, e.g. --gpa-weighted 4.1");
                std::process::exit(EXIT_USAGE);
            }
            if let Err(e) = student::apply_profile_update(&mut snapshot.profile, update) {
                exit_with(EXIT_USAGE, "Profile error", e);
            }
            save_snapshot_or_exit(&snapshot_path, &snapshot);
            let profile = snapshot.profile.as_ref();
            if cli.json {
                print_json(&profile);
            } else {
                println!("Profile saved");
                println!("{}", output::format_profile(profile, use_colors));
            }
        }
        Commands::Profile { action: None } => {
            if cli.json {
                print_json(&snapshot.profile);
            } else {
                println!("{}", output::format_profile(snapshot.profile.as_ref(), use_colors));
            }
        }
        Commands::Init { .. } => unreachable!("handled before config load"),
    }

    std::process::exit(EXIT_SUCCESS);
}
