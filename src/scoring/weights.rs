use serde::Serialize;

/// Grade at which the upperclass weights take over
pub const UPPERCLASS_GRADE: u8 = 11;

/// Which weight distribution applies to a student.
///
/// Underclass students are weighted toward academics and activities;
/// juniors and seniors toward the college list and essays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightTier {
    Underclass,
    Upperclass,
}

impl WeightTier {
    /// Select the tier for a grade. An unknown grade uses the underclass tier.
    pub fn for_grade(grade: Option<u8>) -> Self {
        match grade {
            Some(g) if g >= UPPERCLASS_GRADE => Self::Upperclass,
            _ => Self::Underclass,
        }
    }

    pub fn weights(self) -> Weights {
        match self {
            Self::Upperclass => Weights {
                academic: 25,
                activities: 15,
                colleges: 30,
                essays: 20,
                scholarships: 10,
            },
            Self::Underclass => Weights {
                academic: 40,
                activities: 30,
                colleges: 15,
                essays: 10,
                scholarships: 5,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Underclass => "grades 6-10",
            Self::Upperclass => "grades 11-12",
        }
    }
}

/// Maximum points per readiness category. Each tier sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Weights {
    pub academic: u32,
    pub activities: u32,
    pub colleges: u32,
    pub essays: u32,
    pub scholarships: u32,
}

impl Weights {
    pub fn total(&self) -> u32 {
        self.academic + self.activities + self.colleges + self.essays + self.scholarships
    }
}
