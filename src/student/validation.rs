use std::collections::HashSet;
use super::types::Snapshot;

const MIN_GRADE: u8 = 6;
const MAX_GRADE: u8 = 12;
const MAX_GPA: f64 = 5.0;

/// Check a snapshot for values the planner cannot make sense of.
/// Returns every problem at once (not just the first).
///
/// None of these block scoring: the scorer treats odd values as missing or
/// uses them as-is, so callers log the result instead of aborting.
pub fn validate_snapshot(snapshot: &Snapshot) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref profile) = snapshot.profile {
        if let Some(grade) = profile.grade {
            if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
                errors.push(format!(
                    "profile.grade: {} is outside {}-{}",
                    grade, MIN_GRADE, MAX_GRADE
                ));
            }
        }

        for (field, value) in [
            ("gpa_weighted", profile.gpa_weighted),
            ("gpa_unweighted", profile.gpa_unweighted),
        ] {
            if let Some(gpa) = value {
                if gpa < 0.0 {
                    errors.push(format!("profile.{}: must be non-negative", field));
                } else if gpa > MAX_GPA {
                    errors.push(format!("profile.{}: {} is above {}", field, gpa, MAX_GPA));
                }
            }
        }

        if let Some(importance) = profile.financial_aid_importance {
            if !(1..=5).contains(&importance) {
                errors.push(format!(
                    "profile.financial_aid_importance: {} is outside 1-5",
                    importance
                ));
            }
        }

        if let (Some(rank), Some(size)) = (profile.class_rank, profile.class_size) {
            if rank > size {
                errors.push(format!(
                    "profile.class_rank: {} is larger than class_size {}",
                    rank, size
                ));
            }
        }
    }

    let mut college_ids = HashSet::new();
    for (i, college) in snapshot.colleges.iter().enumerate() {
        if !college_ids.insert(college.id.as_str()) {
            errors.push(format!("colleges[{}].id: duplicate '{}'", i, college.id));
        }
    }

    let mut task_ids = HashSet::new();
    for (i, task) in snapshot.tasks.iter().enumerate() {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(format!("tasks[{}].id: duplicate '{}'", i, task.id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
