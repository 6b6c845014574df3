//! Procedural generation for the infinite sector grid: zones, minerals,
//! deposits, and hazard seeding.

pub mod mineral;
pub mod rng;
pub mod sector;
pub mod zone;

pub use mineral::*;
pub use rng::*;
pub use sector::*;
pub use zone::*;
