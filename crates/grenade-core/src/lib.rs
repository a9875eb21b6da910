//! Core types and definitions for the grenade simulation.
//!
//! This crate defines the vocabulary shared by the engine and its tools:
//! components, commands, events, snapshots, variant definitions and
//! configuration loading. It has no dependency on the ECS runtime.

pub mod color;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
pub mod variant;

#[cfg(test)]
mod tests;
