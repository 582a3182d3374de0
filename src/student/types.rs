use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::lenient::{blank_as_none, null_as_empty};

/// Named standardized test results ("sat", "act", and anything else the
/// student records such as "psat" or "ap_calc").
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TestScores {
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub sat: Option<u32>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub act: Option<u32>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl TestScores {
    /// True when an SAT or ACT score has been recorded. A zero score counts as
    /// not recorded, the same as a blank form field.
    pub fn has_admissions_test(&self) -> bool {
        self.sat.is_some_and(|s| s > 0) || self.act.is_some_and(|s| s > 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub birthdate: Option<NaiveDate>,
    /// Grade level, 6 through 12
    #[serde(default, deserialize_with = "blank_as_none")]
    pub grade: Option<u8>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub school_type: Option<String>,
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub is_athlete: bool,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gpa_weighted: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gpa_unweighted: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class_rank: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub class_size: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub intended_majors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub career_interests: Vec<String>,
    #[serde(default)]
    pub target_college_tier: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub geographic_preferences: Vec<String>,
    /// 1 (not important) to 5 (essential)
    #[serde(default, deserialize_with = "blank_as_none")]
    pub financial_aid_importance: Option<u8>,
    #[serde(default)]
    pub test_scores: Option<TestScores>,
}

impl StudentProfile {
    /// True when either GPA field holds a non-zero value
    pub fn has_gpa(&self) -> bool {
        let present = |gpa: Option<f64>| gpa.is_some_and(|g| g != 0.0 && !g.is_nan());
        present(self.gpa_weighted) || present(self.gpa_unweighted)
    }

    pub fn has_admissions_test(&self) -> bool {
        self.test_scores
            .as_ref()
            .is_some_and(TestScores::has_admissions_test)
    }

    /// "First Last", whichever parts are present
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Activity {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub hours_per_week: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum CollegeCategory {
    Reach,
    Target,
    Safety,
}

impl CollegeCategory {
    pub const ALL: [CollegeCategory; 3] = [Self::Reach, Self::Target, Self::Safety];
}

impl fmt::Display for CollegeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Reach => "Reach",
            Self::Target => "Target",
            Self::Safety => "Safety",
        };
        f.write_str(s)
    }
}

/// Application plan: early decision, early action or regular decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ApplicationType {
    ED,
    ED2,
    EA,
    REA,
    RD,
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ED => "ED",
            Self::ED2 => "ED2",
            Self::EA => "EA",
            Self::REA => "REA",
            Self::RD => "RD",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CollegeListEntry {
    pub id: String,
    pub college_name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    pub category: CollegeCategory,
    #[serde(default = "default_application_type")]
    pub application_type: ApplicationType,
}

fn default_application_type() -> ApplicationType {
    ApplicationType::RD
}

impl CollegeListEntry {
    /// "City, ST" when location is known
    pub fn location(&self) -> Option<String> {
        match (self.city.as_deref(), self.state.as_deref()) {
            (Some(city), Some(state)) => Some(format!("{}, {}", city, state)),
            (Some(city), None) => Some(city.to_string()),
            (None, Some(state)) => Some(state.to_string()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum EssayStatus {
    Brainstorming,
    Outline,
    Draft,
    Revision,
    Final,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EssayProject {
    pub title: String,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub status: Option<EssayStatus>,
}

impl EssayProject {
    pub fn is_final(&self) -> bool {
        self.status == Some(EssayStatus::Final)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ScholarshipApplication {
    pub name: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum TaskCategory {
    Academic,
    Testing,
    Essay,
    #[serde(rename = "Letter of Rec")]
    LetterOfRec,
    Activity,
    #[serde(rename = "Financial Aid")]
    FinancialAid,
    Athletic,
    Administrative,
    Scholarship,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 9] = [
        Self::Academic,
        Self::Testing,
        Self::Essay,
        Self::LetterOfRec,
        Self::Activity,
        Self::FinancialAid,
        Self::Athletic,
        Self::Administrative,
        Self::Scholarship,
    ];
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Academic => "Academic",
            Self::Testing => "Testing",
            Self::Essay => "Essay",
            Self::LetterOfRec => "Letter of Rec",
            Self::Activity => "Activity",
            Self::FinancialAid => "Financial Aid",
            Self::Athletic => "Athletic",
            Self::Administrative => "Administrative",
            Self::Scholarship => "Scholarship",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    pub fn is_urgent(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default = "default_task_category")]
    pub category: TaskCategory,
    #[serde(default = "default_task_owner")]
    pub owner: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

fn default_task_category() -> TaskCategory {
    TaskCategory::Academic
}

fn default_task_owner() -> String {
    "Student".to_string()
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Everything known about one student, read as a single immutable value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub profile: Option<StudentProfile>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub activities: Vec<Activity>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub colleges: Vec<CollegeListEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub essays: Vec<EssayProject>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub scholarships: Vec<ScholarshipApplication>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tasks: Vec<Task>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapshot {
    pub const VERSION: u32 = 1;

    /// Create an empty snapshot at the current version
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            profile: None,
            activities: Vec::new(),
            colleges: Vec::new(),
            essays: Vec::new(),
            scholarships: Vec::new(),
            tasks: Vec::new(),
        }
    }

    pub fn final_essay_count(&self) -> usize {
        self.essays.iter().filter(|e| e.is_final()).count()
    }

    pub fn active_task_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_completed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpa_presence() {
        let mut profile = StudentProfile::default();
        assert!(!profile.has_gpa());

        profile.gpa_unweighted = Some(3.6);
        assert!(profile.has_gpa());

        profile.gpa_unweighted = Some(0.0);
        assert!(!profile.has_gpa(), "zero GPA reads as blank");
    }

    #[test]
    fn test_admissions_test_presence() {
        let mut profile = StudentProfile::default();
        assert!(!profile.has_admissions_test());

        profile.test_scores = Some(TestScores::default());
        assert!(!profile.has_admissions_test());

        profile.test_scores = Some(TestScores {
            act: Some(31),
            ..TestScores::default()
        });
        assert!(profile.has_admissions_test());
    }

    #[test]
    fn test_other_test_scores_do_not_count() {
        let yaml = r#"
psat: 1200
ap_calc: 5
"#;
        let scores: TestScores = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(scores.other.len(), 2);
        assert!(!scores.has_admissions_test());
    }

    #[test]
    fn test_display_name() {
        let profile = StudentProfile {
            first_name: Some("Ada".to_string()),
            ..StudentProfile::default()
        };
        assert_eq!(profile.display_name(), Some("Ada".to_string()));
        assert_eq!(StudentProfile::default().display_name(), None);
    }

    #[test]
    fn test_unknown_essay_status_preserved_as_other() {
        let yaml = r#"
title: Why Us
status: Polishing
"#;
        let essay: EssayProject = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(essay.status, Some(EssayStatus::Other));
        assert!(!essay.is_final());
    }

    #[test]
    fn test_task_defaults_and_renamed_variants() {
        let yaml = r#"
id: t1
title: Ask for rec letter
category: Letter of Rec
status: In Progress
"#;
        let task: Task = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(task.category, TaskCategory::LetterOfRec);
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.owner, "Student");
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_empty_snapshot_parse() {
        let snapshot: Snapshot = serde_saphyr::from_str("version: 1").unwrap();
        assert!(snapshot.profile.is_none());
        assert!(snapshot.tasks.is_empty());
        assert_eq!(snapshot.final_essay_count(), 0);
    }

    #[test]
    fn test_null_collections_read_as_empty() {
        let json = r#"{"version":1,"profile":{"grade":9,"intended_majors":null},"activities":null,"colleges":null,"essays":[],"scholarships":null,"tasks":null}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.activities.is_empty());
        assert!(snapshot.colleges.is_empty());
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.profile.unwrap().intended_majors.is_empty());
    }

    #[test]
    fn test_blank_gpa_matches_absent_gpa() {
        let blank: Snapshot =
            serde_json::from_str(r#"{"version":1,"profile":{"grade":11,"gpa_weighted":""}}"#)
                .unwrap();
        let absent: Snapshot =
            serde_json::from_str(r#"{"version":1,"profile":{"grade":11}}"#).unwrap();
        assert_eq!(blank, absent);

        let profile = blank.profile.unwrap();
        assert_eq!(profile.gpa_weighted, None);
        assert!(!profile.has_gpa());
    }

    #[test]
    fn test_blank_test_scores_are_not_recorded() {
        let yaml = r#"
grade: 12
gpa_unweighted: ""
test_scores:
  sat: ""
  act: 29
"#;
        let profile: StudentProfile = serde_saphyr::from_str(yaml).unwrap();
        assert!(!profile.has_gpa());
        let scores = profile.test_scores.as_ref().unwrap();
        assert_eq!(scores.sat, None);
        assert_eq!(scores.act, Some(29));
        assert!(scores.other.is_empty());
    }

    #[test]
    fn test_college_location() {
        let entry = CollegeListEntry {
            id: "c1".to_string(),
            college_name: "Reed College".to_string(),
            city: Some("Portland".to_string()),
            state: Some("OR".to_string()),
            category: CollegeCategory::Target,
            application_type: ApplicationType::EA,
        };
        assert_eq!(entry.location(), Some("Portland, OR".to_string()));
    }
}
