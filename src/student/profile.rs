use anyhow::Result;

use super::types::{StudentProfile, TestScores};

/// Grade a new profile starts at when none is given
const NEW_PROFILE_GRADE: u8 = 9;

/// Profile fields to change. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub grade: Option<u8>,
    pub state: Option<String>,
    pub school_name: Option<String>,
    pub gpa_weighted: Option<f64>,
    pub gpa_unweighted: Option<f64>,
    pub sat: Option<u32>,
    pub act: Option<u32>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn check_gpa(field: &str, gpa: Option<f64>) -> Result<()> {
    if let Some(gpa) = gpa {
        if !gpa.is_finite() || gpa < 0.0 {
            anyhow::bail!("{} must be a non-negative number, got {}", field, gpa);
        }
    }
    Ok(())
}

/// Apply `update` to the snapshot's profile, creating the profile if the
/// student has none yet. Nothing changes when the update is rejected.
pub fn apply_profile_update(
    profile: &mut Option<StudentProfile>,
    update: ProfileUpdate,
) -> Result<()> {
    if let Some(grade) = update.grade {
        if !(6..=12).contains(&grade) {
            anyhow::bail!("grade must be between 6 and 12, got {}", grade);
        }
    }
    check_gpa("gpa_weighted", update.gpa_weighted)?;
    check_gpa("gpa_unweighted", update.gpa_unweighted)?;

    let profile = profile.get_or_insert_with(|| StudentProfile {
        grade: Some(NEW_PROFILE_GRADE),
        ..StudentProfile::default()
    });

    let ProfileUpdate {
        first_name,
        last_name,
        grade,
        state,
        school_name,
        gpa_weighted,
        gpa_unweighted,
        sat,
        act,
    } = update;

    if first_name.is_some() {
        profile.first_name = first_name;
    }
    if last_name.is_some() {
        profile.last_name = last_name;
    }
    if grade.is_some() {
        profile.grade = grade;
    }
    if state.is_some() {
        profile.state = state.map(|s| s.to_uppercase());
    }
    if school_name.is_some() {
        profile.school_name = school_name;
    }
    if gpa_weighted.is_some() {
        profile.gpa_weighted = gpa_weighted;
    }
    if gpa_unweighted.is_some() {
        profile.gpa_unweighted = gpa_unweighted;
    }
    if sat.is_some() || act.is_some() {
        let scores = profile.test_scores.get_or_insert_with(TestScores::default);
        if sat.is_some() {
            scores.sat = sat;
        }
        if act.is_some() {
            scores.act = act;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_missing_profile() {
        let mut profile = None;
        apply_profile_update(
            &mut profile,
            ProfileUpdate {
                first_name: Some("Sam".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .unwrap();

        let profile = profile.unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Sam"));
        assert_eq!(profile.grade, Some(9));
        assert!(!profile.is_athlete);
    }

    #[test]
    fn test_only_given_fields_change() {
        let mut profile = Some(StudentProfile {
            first_name: Some("Sam".to_string()),
            grade: Some(11),
            gpa_unweighted: Some(3.4),
            ..StudentProfile::default()
        });
        apply_profile_update(
            &mut profile,
            ProfileUpdate {
                gpa_weighted: Some(3.9),
                sat: Some(1380),
                state: Some("wa".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .unwrap();

        let profile = profile.unwrap();
        assert_eq!(profile.first_name.as_deref(), Some("Sam"));
        assert_eq!(profile.grade, Some(11));
        assert_eq!(profile.gpa_unweighted, Some(3.4));
        assert_eq!(profile.gpa_weighted, Some(3.9));
        assert_eq!(profile.state.as_deref(), Some("WA"));
        assert!(profile.has_admissions_test());
    }

    #[test]
    fn test_rejects_bad_values_without_changes() {
        let mut profile = None;
        let err = apply_profile_update(
            &mut profile,
            ProfileUpdate {
                grade: Some(14),
                ..ProfileUpdate::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("between 6 and 12"));

        let err = apply_profile_update(
            &mut profile,
            ProfileUpdate {
                gpa_weighted: Some(-1.0),
                ..ProfileUpdate::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("gpa_weighted"));
        assert!(profile.is_none());
    }

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
        let update = ProfileUpdate {
            act: Some(30),
            ..ProfileUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
