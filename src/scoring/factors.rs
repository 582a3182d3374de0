/// How a category's count turns into a share of its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Credit {
    /// Full weight at `full_at` or more, a flat `fraction` of it for any
    /// smaller non-zero count
    Flat { full_at: usize, fraction: f64 },
    /// Full weight at `full_at` or more, `count / full_at` of it below that
    Proportional { full_at: usize },
}

impl Credit {
    /// Share of the weight earned for `count`, in [0, 1]
    pub fn share(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        match *self {
            Credit::Flat { full_at, fraction } => {
                if count >= full_at {
                    1.0
                } else {
                    fraction
                }
            }
            Credit::Proportional { full_at } => {
                if count >= full_at || full_at == 0 {
                    1.0
                } else {
                    count as f64 / full_at as f64
                }
            }
        }
    }

    /// Points earned out of `weight` for `count`
    pub fn apply(&self, weight: u32, count: usize) -> f64 {
        weight as f64 * self.share(count)
    }

    /// Short human description, e.g. "2/5" or "1/3 (50% credit)"
    pub fn describe(&self, count: usize) -> String {
        match *self {
            Credit::Flat { full_at, fraction } if count > 0 && count < full_at => {
                format!(
                    "{}/{} ({}% credit)",
                    count,
                    full_at,
                    (fraction * 100.0).round() as u32
                )
            }
            Credit::Flat { full_at, .. } | Credit::Proportional { full_at } => {
                format!("{}/{}", count.min(full_at), full_at)
            }
        }
    }
}

pub const ACTIVITIES: Credit = Credit::Flat {
    full_at: 3,
    fraction: 0.5,
};
pub const COLLEGES: Credit = Credit::Proportional { full_at: 5 };
pub const ESSAYS: Credit = Credit::Proportional { full_at: 3 };
pub const SCHOLARSHIPS: Credit = Credit::Proportional { full_at: 5 };

/// Share of the academic weight earned by having a GPA on file
pub const GPA_SHARE: f64 = 0.7;
/// Share of the academic weight earned by having an SAT or ACT on file
pub const TEST_SHARE: f64 = 0.3;
