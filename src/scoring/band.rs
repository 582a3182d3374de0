use serde::Serialize;

/// Qualitative label for a readiness percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessBand {
    Starting,
    BuildingMomentum,
    Strong,
}

impl ReadinessBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=29 => Self::Starting,
            30..=59 => Self::BuildingMomentum,
            _ => Self::Strong,
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Self::Starting => "Just Getting Started",
            Self::BuildingMomentum => "Building Momentum",
            Self::Strong => "Looking Strong!",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::Starting => {
                "Complete your profile and add your first college to boost your readiness score!"
            }
            Self::BuildingMomentum => {
                "You're making progress! Focus on adding more activities and starting your essays."
            }
            Self::Strong => {
                "You're well on your way. Keep completing tasks and refining your applications."
            }
        }
    }
}
