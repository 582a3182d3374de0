use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::colleges::CollegeGroups;
use crate::config::ColorMode;
use crate::dashboard::DashboardSummary;
use crate::scoring::{ReadinessBand, ReadinessResult};
use crate::student::{CollegeCategory, CollegeListEntry, StudentProfile, Task};
use crate::timeline::TaskGroups;

const BAR_WIDTH: usize = 20;

/// Decide whether to colour output. `Auto` colours only when stdout is a TTY.
pub fn should_use_colors(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Fit a title into whatever the terminal leaves after `fixed_width` columns
fn fit_title(title: &str, fixed_width: usize) -> String {
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => truncate_title(title, width - fixed_width),
        // Very narrow terminal, show truncated
        Some(_) => truncate_title(title, 20),
        // No terminal (pipe), don't truncate
        None => title.to_string(),
    }
}

/// Render a percentage as a fixed-width bar, e.g. "[########------------]"
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Format points without a trailing ".0" ("17.5", "15", "3.3")
pub fn format_points(points: f64) -> String {
    let formatted = format!("{:.1}", points);
    formatted
        .strip_suffix(".0")
        .map(str::to_string)
        .unwrap_or(formatted)
}

fn color_band(text: &str, band: ReadinessBand, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match band {
        ReadinessBand::Starting => text.blue().bold().to_string(),
        ReadinessBand::BuildingMomentum => text.yellow().bold().to_string(),
        ReadinessBand::Strong => text.green().bold().to_string(),
    }
}

/// Format the readiness score with its band, and the per-category breakdown
/// when `verbose` is set
pub fn format_readiness(result: &ReadinessResult, verbose: bool, use_colors: bool) -> String {
    let band = ReadinessBand::from_score(result.score);
    let percent = format!("{}%", result.score);
    let bar = progress_bar(result.score, BAR_WIDTH);

    let mut lines = vec![
        format!(
            "College Readiness: {} {}",
            if use_colors { percent.bold().to_string() } else { percent },
            bar
        ),
        color_band(band.headline(), band, use_colors),
        format!("  {}", band.hint()),
    ];

    if verbose {
        lines.push(String::new());
        lines.push(format!("Weights for {}:", result.tier.label()));
        let category_width = result
            .breakdown
            .iter()
            .map(|c| c.category.len())
            .max()
            .unwrap_or(0);
        for c in &result.breakdown {
            let points = format!("{:>4}/{:<3}", format_points(c.earned), c.weight);
            let detail = if use_colors {
                c.detail.dimmed().to_string()
            } else {
                c.detail.clone()
            };
            lines.push(format!(
                "  {:<width$}  {}  {}",
                c.category,
                points,
                detail,
                width = category_width
            ));
        }
        lines.push(format!("  Total: {} (rounded {})", format_points(result.raw), result.score));
    }

    lines.join("\n")
}

/// Format a single task as one line:
/// "{due}  {title}  [{category}] {priority}"
pub fn format_task_line(task: &Task, use_colors: bool) -> String {
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "no date".to_string());
    let due_padded = format!("{:<10}", due);
    let category = format!("[{}]", task.category);
    let priority = if task.priority.is_urgent() {
        format!(" {}", task.priority)
    } else {
        String::new()
    };

    // due + 2 spaces + 2 spaces + category + priority
    let fixed_width = 10 + 4 + category.len() + priority.len() + 2;
    let title = fit_title(&task.title, fixed_width);

    if use_colors {
        format!(
            "{}  {}  {}{}",
            due_padded.dimmed(),
            title,
            category.cyan(),
            priority.red()
        )
    } else {
        format!("{}  {}  {}{}", due_padded, title, category, priority)
    }
}

fn format_task_section(
    heading: &str,
    tasks: &[&Task],
    use_colors: bool,
    lines: &mut Vec<String>,
) {
    if tasks.is_empty() {
        return;
    }
    let heading = format!("{} ({})", heading, tasks.len());
    lines.push(if use_colors {
        heading.bold().to_string()
    } else {
        heading
    });
    for task in tasks {
        lines.push(format!("  {}", format_task_line(task, use_colors)));
    }
}

/// Format grouped tasks as overdue, upcoming and completed sections
pub fn format_task_groups(groups: &TaskGroups, use_colors: bool) -> String {
    if groups.is_empty() {
        return "No tasks found.".to_string();
    }

    let mut lines = Vec::new();
    format_task_section("Overdue", &groups.overdue, use_colors, &mut lines);
    format_task_section("Upcoming", &groups.upcoming, use_colors, &mut lines);
    format_task_section("Completed", &groups.completed, use_colors, &mut lines);
    lines.join("\n")
}

/// Format a flat list of tasks, one per line
pub fn format_task_list(tasks: &[&Task], use_colors: bool) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }
    tasks
        .iter()
        .map(|t| format_task_line(t, use_colors))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single college as one line: "{name}  {location}  {plan}  ({id})"
pub fn format_college_line(entry: &CollegeListEntry, use_colors: bool) -> String {
    let location = entry.location().unwrap_or_default();
    let plan = entry.application_type.to_string();
    let id = format!("({})", entry.id);

    if use_colors {
        format!(
            "{}  {}  {}  {}",
            entry.college_name.bold(),
            location.cyan(),
            plan.yellow(),
            id.dimmed()
        )
    } else {
        format!("{}  {}  {}  {}", entry.college_name, location, plan, id)
    }
}

/// Format the college list under Reach, Target and Safety headings.
/// Empty categories are skipped.
pub fn format_college_groups(groups: &CollegeGroups, use_colors: bool) -> String {
    let mut lines = Vec::new();
    for category in CollegeCategory::ALL {
        let entries = groups.get(category);
        if entries.is_empty() {
            continue;
        }
        let heading = format!("{} ({})", category, entries.len());
        lines.push(if use_colors {
            heading.bold().to_string()
        } else {
            heading
        });
        for entry in entries {
            lines.push(format!("  {}", format_college_line(entry, use_colors)));
        }
    }

    if lines.is_empty() {
        "No colleges on your list.".to_string()
    } else {
        lines.join("\n")
    }
}

/// Format the dashboard: greeting, readiness, stat counts, alerts and the
/// next few tasks
pub fn format_dashboard(summary: &DashboardSummary, verbose: bool, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let name = summary.student.as_deref().unwrap_or("there");
    lines.push(format!("Welcome back, {}!", name));
    if let Some(grade) = summary.grade {
        lines.push(format!("Grade {}", grade));
    }
    lines.push(String::new());

    lines.push(format_readiness(&summary.readiness, verbose, use_colors));
    lines.push(String::new());

    let stats = [
        ("Colleges on List", summary.colleges),
        ("Active Tasks", summary.active_tasks),
        ("Activities", summary.activities),
        ("Scholarships", summary.scholarships),
        ("Essays", summary.essays),
    ];
    for (label, value) in stats {
        lines.push(format!("{:<18}{:>4}", label, value));
    }

    if summary.overdue_tasks > 0 {
        let noun = if summary.overdue_tasks == 1 { "task" } else { "tasks" };
        let alert = format!("You have {} overdue {}", summary.overdue_tasks, noun);
        lines.push(String::new());
        lines.push(if use_colors {
            alert.red().bold().to_string()
        } else {
            alert
        });
    }

    lines.push(String::new());
    lines.push("Upcoming Tasks".to_string());
    if summary.upcoming.is_empty() {
        lines.push("  No tasks yet. Add colleges to get started!".to_string());
    } else {
        for task in &summary.upcoming {
            lines.push(format!("  {}", format_task_line(task, use_colors)));
        }
    }

    lines.join("\n")
}

/// Format the profile fields that feed the readiness score, "-" for blanks
pub fn format_profile(profile: Option<&StudentProfile>, use_colors: bool) -> String {
    let Some(profile) = profile else {
        return "No profile yet. Run `college-ready profile set` to create one.".to_string();
    };

    let show = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    let scores = profile.test_scores.as_ref();
    let rows = [
        ("Name", profile.display_name()),
        ("Grade", profile.grade.map(|g| g.to_string())),
        ("School", profile.school_name.clone()),
        ("State", profile.state.clone()),
        ("GPA (weighted)", profile.gpa_weighted.map(|g| g.to_string())),
        ("GPA (unweighted)", profile.gpa_unweighted.map(|g| g.to_string())),
        ("SAT", scores.and_then(|s| s.sat).map(|s| s.to_string())),
        ("ACT", scores.and_then(|s| s.act).map(|s| s.to_string())),
    ];

    rows.into_iter()
        .map(|(label, value)| {
            let label = format!("{:<18}", label);
            if use_colors {
                format!("{}{}", label.dimmed(), show(value))
            } else {
                format!("{}{}", label, show(value))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colleges::group_by_category;
    use crate::scoring::compute_readiness;
    use crate::student::{
        ApplicationType, Snapshot, StudentProfile, TaskCategory, TaskPriority, TaskStatus,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample_task() -> Task {
        Task {
            id: "t1".to_string(),
            title: "Register for the SAT".to_string(),
            category: TaskCategory::Testing,
            owner: "Student".to_string(),
            priority: TaskPriority::Critical,
            status: TaskStatus::NotStarted,
            due_date: NaiveDate::from_ymd_opt(2026, 11, 1),
            completed_at: None,
        }
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "[----------]");
        assert_eq!(progress_bar(64, 10), "[######----]");
        assert_eq!(progress_bar(100, 10), "[##########]");
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(17.5), "17.5");
        assert_eq!(format_points(15.0), "15");
        assert_eq!(format_points(10.0 / 3.0), "3.3");
        assert_eq!(format_points(0.0), "0");
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Short", 10), "Short");
        assert_eq!(truncate_title("A much longer title", 10), "A much ...");
    }

    #[test]
    fn test_format_readiness_plain() {
        let result = compute_readiness(None, &[], &[], &[], &[]);
        let out = format_readiness(&result, false, false);
        assert!(out.contains("College Readiness: 0%"));
        assert!(out.contains("Just Getting Started"));
        assert!(!out.contains("Weights for"));
    }

    #[test]
    fn test_format_readiness_verbose_breakdown() {
        let profile = StudentProfile {
            grade: Some(11),
            gpa_weighted: Some(4.2),
            ..StudentProfile::default()
        };
        let result = compute_readiness(Some(&profile), &[], &[], &[], &[]);
        let out = format_readiness(&result, true, false);
        assert!(out.contains("Weights for grades 11-12"));
        assert!(out.contains("17.5/25"));
        assert!(out.contains("GPA on file, no SAT/ACT"));
        assert!(out.contains("Total: 17.5 (rounded 18)"));
    }

    #[test]
    fn test_format_task_line() {
        let line = format_task_line(&sample_task(), false);
        assert!(line.starts_with("2026-11-01"));
        assert!(line.contains("Register for the SAT"));
        assert!(line.contains("[Testing] Critical"));
    }

    #[test]
    fn test_format_empty_collections() {
        assert_eq!(format_task_list(&[], false), "No tasks found.");
        let groups = group_by_category(std::iter::empty());
        assert_eq!(format_college_groups(&groups, false), "No colleges on your list.");
    }

    #[test]
    fn test_format_college_groups() {
        let list = vec![CollegeListEntry {
            id: "rice".to_string(),
            college_name: "Rice University".to_string(),
            city: Some("Houston".to_string()),
            state: Some("TX".to_string()),
            category: CollegeCategory::Reach,
            application_type: ApplicationType::ED,
        }];
        let out = format_college_groups(&group_by_category(&list), false);
        assert_eq!(out, "Reach (1)\n  Rice University  Houston, TX  ED  (rice)");
    }

    #[test]
    fn test_format_profile() {
        assert!(format_profile(None, false).starts_with("No profile yet"));

        let profile = StudentProfile {
            first_name: Some("Ada".to_string()),
            grade: Some(10),
            gpa_unweighted: Some(3.75),
            ..StudentProfile::default()
        };
        let out = format_profile(Some(&profile), false);
        assert!(out.contains("Name              Ada"));
        assert!(out.contains("GPA (unweighted)  3.75"));
        assert!(out.contains("GPA (weighted)    -"));
        assert!(out.contains("SAT               -"));
    }

    #[test]
    fn test_format_dashboard_overdue_alert() {
        let mut snapshot = Snapshot::new();
        snapshot.tasks.push(sample_task());
        let now = Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap();
        let summary = DashboardSummary::build(&snapshot, now, 5);

        let out = format_dashboard(&summary, false, false);
        assert!(out.contains("Welcome back, there!"));
        assert!(out.contains("You have 1 overdue task"));
        assert!(out.contains("Register for the SAT"));
    }
}
