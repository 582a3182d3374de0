use serde::Serialize;

use super::factors::{self, GPA_SHARE, TEST_SHARE};
use super::weights::WeightTier;
use crate::student::{
    Activity, CollegeListEntry, EssayProject, ScholarshipApplication, Snapshot, StudentProfile,
};

/// Points one readiness category earned toward the total
#[derive(Debug, Clone, Serialize)]
pub struct Contribution {
    /// Category name, e.g. "Academics" or "Colleges"
    pub category: String,
    /// Maximum points for this category
    pub weight: u32,
    /// Points actually earned
    pub earned: f64,
    /// How the points were earned, e.g. "GPA on file, no SAT/ACT" or "2/5"
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResult {
    /// Rounded percentage, 0-100
    pub score: u8,
    /// Unrounded sum of contributions
    pub raw: f64,
    pub tier: WeightTier,
    pub breakdown: Vec<Contribution>,
}

/// Compute a student's application readiness as a percentage.
///
/// Every input is optional in spirit: a missing profile, blank GPA or empty
/// collection simply earns nothing for that category. Never fails.
pub fn compute_readiness(
    profile: Option<&StudentProfile>,
    activities: &[Activity],
    colleges: &[CollegeListEntry],
    essays: &[EssayProject],
    scholarships: &[ScholarshipApplication],
) -> ReadinessResult {
    let tier = WeightTier::for_grade(profile.and_then(|p| p.grade));
    let weights = tier.weights();
    let mut breakdown = Vec::with_capacity(5);

    // Academic: GPA and test scores are independent
    let has_gpa = profile.is_some_and(StudentProfile::has_gpa);
    let has_test = profile.is_some_and(StudentProfile::has_admissions_test);
    let mut academic = 0.0;
    if has_gpa {
        academic += weights.academic as f64 * GPA_SHARE;
    }
    if has_test {
        academic += weights.academic as f64 * TEST_SHARE;
    }
    let academic_desc = match (has_gpa, has_test) {
        (true, true) => "GPA and SAT/ACT on file",
        (true, false) => "GPA on file, no SAT/ACT",
        (false, true) => "SAT/ACT on file, no GPA",
        (false, false) => "no GPA or SAT/ACT",
    };
    breakdown.push(Contribution {
        category: "Academics".to_string(),
        weight: weights.academic,
        earned: academic,
        detail: academic_desc.to_string(),
    });

    let counted = [
        ("Activities", weights.activities, factors::ACTIVITIES, activities.len()),
        ("Colleges", weights.colleges, factors::COLLEGES, colleges.len()),
        (
            "Final essays",
            weights.essays,
            factors::ESSAYS,
            essays.iter().filter(|e| e.is_final()).count(),
        ),
        (
            "Scholarships",
            weights.scholarships,
            factors::SCHOLARSHIPS,
            scholarships.len(),
        ),
    ];
    for (label, weight, credit, count) in counted {
        breakdown.push(Contribution {
            category: label.to_string(),
            weight,
            earned: credit.apply(weight, count),
            detail: credit.describe(count),
        });
    }

    let raw: f64 = breakdown.iter().map(|c| c.earned).sum();
    // f64::round rounds half away from zero, which is half-up for non-negative sums
    let score = raw.round().clamp(0.0, 100.0) as u8;

    ReadinessResult {
        score,
        raw,
        tier,
        breakdown,
    }
}

/// Score everything in a snapshot
pub fn score_snapshot(snapshot: &Snapshot) -> ReadinessResult {
    compute_readiness(
        snapshot.profile.as_ref(),
        &snapshot.activities,
        &snapshot.colleges,
        &snapshot.essays,
        &snapshot.scholarships,
    )
}
