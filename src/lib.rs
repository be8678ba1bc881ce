//! Sightline - Ranged-Combat Targeting
//!
//! Decides whether a ranged attack can reach its target and how each shot of
//! a burst is aimed, over a grid with a synthetic vertical axis.

pub mod combat;
pub mod core;
pub mod spatial;
pub mod targeting;
pub mod world;
