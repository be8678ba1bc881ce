//! Targeting: envelopes, cover, firing lines, shot planning and retreat

pub mod ballistics;
pub mod constants;
pub mod cover;
pub mod envelope;
pub mod los;
pub mod planner;
pub mod report;
pub mod retreat;

pub use cover::{CoverRaycaster, CoverScan};
pub use envelope::{classify_impact_height, compute_envelope, ImpactRegion, VerticalEnvelope};
pub use los::{FiringLine, FiringLineError, LineOfSightEngine, ShotOrigin};
pub use planner::{select_aim_band, AimBand, ShooterStats, ShotPlanner, ShotSolution};
pub use report::{BurstState, ShotAcquisitionReport};
pub use retreat::{CoverSelector, RetreatScoring};
