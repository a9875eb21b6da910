//! Events emitted by the simulation for rendering, sound and UI feedback.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::enums::*;
use crate::types::{ControllerId, ObjectId, Position, Velocity};

/// One ring of an area explosion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlastTier {
    pub radius: u32,
    pub damage: u32,
}

/// Area explosion requested from the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    /// Innermost tier first.
    pub tiers: Vec<BlastTier>,
    /// Suppress the world's default explosion sound.
    pub silent: bool,
}

/// Smoke particle of a flying grenade's trail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPuff {
    pub position: Position,
    pub velocity: Velocity,
    pub lifetime_ticks: u32,
    pub size_start: f64,
    pub size_end: f64,
    pub color: Rgba,
}

/// Everything the grenade engine asks its collaborators to show or play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GrenadeEvent {
    /// Fuse started.
    Armed { grenade: ObjectId },
    /// Grenade picked up.
    Collected { grenade: ObjectId, by: ObjectId },
    /// Grenade left its holder along a launch path.
    Launched {
        grenade: ObjectId,
        by: Option<ObjectId>,
        path: LaunchPath,
        velocity: Velocity,
    },
    /// Grenade left a container.
    Ejected { grenade: ObjectId, from: ObjectId },
    /// Container hurt by a grenade detonating inside it.
    ContainerDamaged {
        container: ObjectId,
        amount: i32,
        by: Option<ControllerId>,
    },
    /// Grenade went off.
    Detonated { grenade: ObjectId, position: Position },
    /// Area explosion to produce at a position.
    Explosion {
        grenade: ObjectId,
        position: Position,
        explosion: Explosion,
        by: Option<ControllerId>,
    },
    /// Fuse progress display for the holding player.
    FuseWarning {
        holder: ObjectId,
        controller: ControllerId,
        progress: u32,
        color: Rgba,
    },
    /// Clear the holding player's fuse display.
    WarningCleared { holder: ObjectId, controller: ControllerId },
    /// Smoke trail particle.
    Trail { grenade: ObjectId, puff: TrailPuff },
    /// Solid contact with the terrain.
    Bounce { grenade: ObjectId, side: ContactSide },
    /// Animation control point on an agent.
    Animation { agent: ObjectId, cue: AnimationCue },
    /// Aiming cursor for a player switched on or off.
    AimingCursor { controller: ControllerId, enabled: bool },
}
