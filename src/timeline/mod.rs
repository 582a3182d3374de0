use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::student::{Task, TaskCategory, TaskStatus};

/// Status and category constraints; `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub category: Option<TaskCategory>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let status_match = self.status.is_none_or(|s| task.status == s);
        let category_match = self.category.is_none_or(|c| task.category == c);
        status_match && category_match
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskGroups<'a> {
    pub overdue: Vec<&'a Task>,
    pub upcoming: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl TaskGroups<'_> {
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.upcoming.is_empty() && self.completed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overdue.len() + self.upcoming.len() + self.completed.len()
    }
}

/// Order by due date, earliest first, undated tasks last
fn by_due_date(a: &&Task, b: &&Task) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.is_completed() && task.due_date.is_some_and(|d| d < today)
}

/// Split the tasks matching `filter` into overdue, upcoming and completed.
///
/// A task due today is upcoming. Tasks without a due date are never overdue.
pub fn group_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter, now: DateTime<Utc>) -> TaskGroups<'a> {
    let today = now.date_naive();
    let mut groups = TaskGroups::default();

    for task in tasks.iter().filter(|t| filter.matches(t)) {
        if task.is_completed() {
            groups.completed.push(task);
        } else if is_overdue(task, today) {
            groups.overdue.push(task);
        } else {
            groups.upcoming.push(task);
        }
    }

    // sort_by is stable so same-day tasks keep their stored order
    groups.overdue.sort_by(by_due_date);
    groups.upcoming.sort_by(by_due_date);
    groups.completed.sort_by(by_due_date);
    groups
}

/// Number of open tasks past their due date
pub fn overdue_count(tasks: &[Task], now: DateTime<Utc>) -> usize {
    let today = now.date_naive();
    tasks.iter().filter(|t| is_overdue(t, today)).count()
}

/// The next `limit` open tasks by due date (overdue ones included)
pub fn upcoming_tasks(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut open: Vec<&Task> = tasks.iter().filter(|t| !t.is_completed()).collect();
    open.sort_by(by_due_date);
    open.truncate(limit);
    open
}

/// Open tasks due between today and `now + window`, inclusive
pub fn due_within(tasks: &[Task], now: DateTime<Utc>, window: std::time::Duration) -> Vec<&Task> {
    let today = now.date_naive();
    let horizon = chrono::Duration::from_std(window)
        .ok()
        .and_then(|w| now.checked_add_signed(w))
        .map(|t| t.date_naive())
        .unwrap_or(NaiveDate::MAX);

    let mut due: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.is_completed())
        .filter(|t| t.due_date.is_some_and(|d| d >= today && d <= horizon))
        .collect();
    due.sort_by(by_due_date);
    due
}

fn find_task<'a>(tasks: &'a mut [Task], id: &str) -> Result<&'a mut Task> {
    match tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => Ok(task),
        None => anyhow::bail!("No task with id '{}'", id),
    }
}

/// Mark a task completed and stamp the completion time
pub fn complete_task(tasks: &mut [Task], id: &str, now: DateTime<Utc>) -> Result<()> {
    let task = find_task(tasks, id)?;
    task.status = TaskStatus::Completed;
    task.completed_at = Some(now);
    Ok(())
}

/// Move a task back to not started and clear its completion time
pub fn reopen_task(tasks: &mut [Task], id: &str) -> Result<()> {
    let task = find_task(tasks, id)?;
    task.status = TaskStatus::NotStarted;
    task.completed_at = None;
    Ok(())
}

/// Next free id of the form "t{n}", one past the highest one in use
pub fn next_task_id(tasks: &[Task]) -> String {
    let highest = tasks
        .iter()
        .filter_map(|t| t.id.strip_prefix('t')?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("t{}", highest + 1)
}

/// Add a new task. The title and due date are required and the id must be
/// unused.
pub fn add_task(tasks: &mut Vec<Task>, task: Task) -> Result<()> {
    if task.id.trim().is_empty() {
        anyhow::bail!("Task id must not be empty");
    }
    if task.title.trim().is_empty() {
        anyhow::bail!("Task title must not be empty");
    }
    if task.due_date.is_none() {
        anyhow::bail!("Task '{}' needs a due date", task.title);
    }
    if tasks.iter().any(|t| t.id == task.id) {
        anyhow::bail!("Task id already in use: {}", task.id);
    }
    tasks.push(task);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student::TaskPriority;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn task(id: &str, due_offset_days: Option<i64>, status: TaskStatus, category: TaskCategory) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            category,
            owner: "Student".to_string(),
            priority: TaskPriority::Medium,
            status,
            due_date: due_offset_days.map(|d| (now() + Duration::days(d)).date_naive()),
            completed_at: None,
        }
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            task("late", Some(-3), TaskStatus::NotStarted, TaskCategory::Essay),
            task("soon", Some(2), TaskStatus::InProgress, TaskCategory::Testing),
            task("today", Some(0), TaskStatus::NotStarted, TaskCategory::Essay),
            task("done", Some(-10), TaskStatus::Completed, TaskCategory::Essay),
            task("undated", None, TaskStatus::NotStarted, TaskCategory::Academic),
            task("later", Some(30), TaskStatus::NotStarted, TaskCategory::Scholarship),
        ]
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_group_tasks_all() {
        let tasks = sample_tasks();
        let groups = group_tasks(&tasks, &TaskFilter::default(), now());

        assert_eq!(ids(&groups.overdue), vec!["late"]);
        assert_eq!(ids(&groups.upcoming), vec!["today", "soon", "later", "undated"]);
        assert_eq!(ids(&groups.completed), vec!["done"]);
        assert_eq!(groups.len(), tasks.len());
    }

    #[test]
    fn test_completed_task_past_due_is_not_overdue() {
        let tasks = sample_tasks();
        assert_eq!(overdue_count(&tasks, now()), 1);
    }

    #[test]
    fn test_filter_by_category() {
        let tasks = sample_tasks();
        let filter = TaskFilter {
            status: None,
            category: Some(TaskCategory::Essay),
        };
        let groups = group_tasks(&tasks, &filter, now());
        assert_eq!(ids(&groups.overdue), vec!["late"]);
        assert_eq!(ids(&groups.upcoming), vec!["today"]);
        assert_eq!(ids(&groups.completed), vec!["done"]);
    }

    #[test]
    fn test_filter_by_status_and_category() {
        let tasks = sample_tasks();
        let filter = TaskFilter {
            status: Some(TaskStatus::Completed),
            category: Some(TaskCategory::Testing),
        };
        assert!(group_tasks(&tasks, &filter, now()).is_empty());
    }

    #[test]
    fn test_upcoming_tasks_limit() {
        let tasks = sample_tasks();
        let next = upcoming_tasks(&tasks, 3);
        assert_eq!(ids(&next), vec!["late", "today", "soon"]);
    }

    #[test]
    fn test_due_within_window() {
        let tasks = sample_tasks();
        let week = std::time::Duration::from_secs(7 * 24 * 3600);
        let due = due_within(&tasks, now(), week);
        assert_eq!(ids(&due), vec!["today", "soon"]);
    }

    #[test]
    fn test_complete_and_reopen() {
        let mut tasks = sample_tasks();
        complete_task(&mut tasks, "soon", now()).unwrap();
        assert_eq!(tasks[1].status, TaskStatus::Completed);
        assert_eq!(tasks[1].completed_at, Some(now()));

        reopen_task(&mut tasks, "soon").unwrap();
        assert_eq!(tasks[1].status, TaskStatus::NotStarted);
        assert!(tasks[1].completed_at.is_none());
    }

    #[test]
    fn test_add_task() {
        let mut tasks = sample_tasks();
        let mut new = task("t7", Some(5), TaskStatus::NotStarted, TaskCategory::Testing);
        new.title = "Register for SAT".to_string();
        add_task(&mut tasks, new).unwrap();

        assert_eq!(tasks.len(), 7);
        let due = due_within(&tasks, now(), std::time::Duration::from_secs(7 * 24 * 3600));
        assert_eq!(ids(&due), vec!["today", "soon", "t7"]);
    }

    #[test]
    fn test_add_task_requires_title_and_due_date() {
        let mut tasks = Vec::new();
        let undated = task("t1", None, TaskStatus::NotStarted, TaskCategory::Essay);
        let err = add_task(&mut tasks, undated).unwrap_err();
        assert!(err.to_string().contains("needs a due date"));

        let mut untitled = task("t1", Some(1), TaskStatus::NotStarted, TaskCategory::Essay);
        untitled.title = "  ".to_string();
        let err = add_task(&mut tasks, untitled).unwrap_err();
        assert!(err.to_string().contains("title must not be empty"));
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_add_task_rejects_duplicate_id() {
        let mut tasks = sample_tasks();
        let dup = task("soon", Some(1), TaskStatus::NotStarted, TaskCategory::Essay);
        let err = add_task(&mut tasks, dup).unwrap_err();
        assert!(err.to_string().contains("already in use: soon"));
        assert_eq!(tasks.len(), 6);
    }

    #[test]
    fn test_next_task_id() {
        assert_eq!(next_task_id(&[]), "t1");
        let tasks = vec![
            task("t2", None, TaskStatus::NotStarted, TaskCategory::Essay),
            task("t10", None, TaskStatus::NotStarted, TaskCategory::Essay),
            task("fafsa", None, TaskStatus::NotStarted, TaskCategory::Essay),
        ];
        assert_eq!(next_task_id(&tasks), "t11");
    }

    #[test]
    fn test_complete_unknown_task_errors() {
        let mut tasks = sample_tasks();
        let err = complete_task(&mut tasks, "nope", now()).unwrap_err();
        assert!(err.to_string().contains("No task with id 'nope'"));
    }
}
