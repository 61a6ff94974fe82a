//! # Ball Simulation Engine
//!
//! CPU-parallel bouncing-balls simulation. Ball-ball collisions are scheduled
//! through a partition of all ball pairs into matchings, so concurrent pair
//! updates never touch the same ball.

pub mod params;
pub mod partition;
pub mod placement;
pub mod simulation;

pub use params::*;
pub use partition::*;
pub use placement::*;
pub use simulation::*;
