use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scoring::{score_snapshot, ReadinessBand, ReadinessResult};
use crate::student::{Snapshot, Task};
use crate::timeline;

/// Number of upcoming tasks shown when the config does not say otherwise
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// Everything the dashboard shows, computed from one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary<'a> {
    pub student: Option<String>,
    pub grade: Option<u8>,
    pub readiness: ReadinessResult,
    pub band: ReadinessBand,
    pub colleges: usize,
    pub active_tasks: usize,
    pub overdue_tasks: usize,
    pub activities: usize,
    pub scholarships: usize,
    pub essays: usize,
    pub upcoming: Vec<&'a Task>,
}

impl<'a> DashboardSummary<'a> {
    pub fn build(snapshot: &'a Snapshot, now: DateTime<Utc>, upcoming_limit: usize) -> Self {
        let readiness = score_snapshot(snapshot);
        let band = ReadinessBand::from_score(readiness.score);
        let profile = snapshot.profile.as_ref();

        Self {
            student: profile.and_then(|p| p.display_name()),
            grade: profile.and_then(|p| p.grade),
            readiness,
            band,
            colleges: snapshot.colleges.len(),
            active_tasks: snapshot.active_task_count(),
            overdue_tasks: timeline::overdue_count(&snapshot.tasks, now),
            activities: snapshot.activities.len(),
            scholarships: snapshot.scholarships.len(),
            essays: snapshot.essays.len(),
            upcoming: timeline::upcoming_tasks(&snapshot.tasks, upcoming_limit),
        }
    }
}
