//! Simulation engine for the grenade lifecycle.
//!
//! Owns the hecs ECS world, runs per-object processes and systems at a fixed
//! tick rate, and produces `WorldSnapshot`s for rendering and tools.

pub mod behavior;
pub mod context;
pub mod controller;
pub mod engine;
pub mod scheduler;
pub mod systems;
pub mod terrain;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use grenade_core as core;

#[cfg(test)]
mod tests;
