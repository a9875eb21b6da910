//! World snapshot: the visible state produced after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GrenadeEvent;
use crate::types::{ControllerId, ObjectId, Position, SimTime, Velocity};

/// Complete state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub grenades: Vec<GrenadeView>,
    pub agents: Vec<AgentView>,
    pub events: Vec<GrenadeEvent>,
}

/// A grenade as seen by the outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrenadeView {
    pub id: ObjectId,
    pub variant: String,
    pub state: GrenadeState,
    pub aiming: bool,
    pub collectible: bool,
    pub category: ObjectCategory,
    pub position: Position,
    pub velocity: Velocity,
    pub container: Option<ObjectId>,
    pub controller: Option<ControllerId>,
    pub damage: u32,
    /// Fuse ticks elapsed, if a fuse is attached.
    pub fuse_elapsed: Option<u32>,
}

/// An agent as seen by the outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    pub id: ObjectId,
    pub controller: ControllerId,
    pub position: Position,
    pub alive: bool,
    pub incapacitated: bool,
    pub energy: i32,
    pub hand_occupied: bool,
    pub aiming: bool,
    pub aim_angle: f64,
    pub throw_blocked: bool,
    pub hand_item: Option<ObjectId>,
}
