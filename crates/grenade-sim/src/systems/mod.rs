//! ECS systems and per-object processes that operate on the simulation world.
//!
//! Systems are pure functions over the world; processes carry their own
//! per-object state and are driven by the scheduler.

pub mod cleanup;
pub mod containment;
pub mod detonation;
pub mod fuse;
pub mod launch;
pub mod movement;
pub mod rolling_friction;
pub mod snapshot;
pub mod throw_animation;
