pub mod band;
pub mod engine;
pub mod factors;
pub mod weights;

pub use band::ReadinessBand;
pub use engine::{compute_readiness, score_snapshot, Contribution, ReadinessResult};
pub use factors::Credit;
pub use weights::{WeightTier, Weights};
