//! ECS components for hecs entities.
//!
//! Components are plain data structs. Cross-object references are `ObjectId`s,
//! never owned handles.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::{ControllerId, ObjectId};
use crate::variant::VariantId;

/// Grenade lifecycle flags and bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grenade {
    pub variant: VariantId,
    /// Set once, on the first arm. Re-arming is a no-op.
    pub armed: bool,
    /// Set once, on the first detonation.
    pub detonated: bool,
    /// Aiming sub-mode, independent of `armed`.
    pub aiming: bool,
    /// Accumulated damage taken.
    pub damage: u32,
    pub collectible: bool,
    pub category: ObjectCategory,
    /// Controller credited with the explosion.
    pub controller: Option<ControllerId>,
}

impl Grenade {
    pub fn new(variant: VariantId) -> Self {
        Self {
            variant,
            armed: false,
            detonated: false,
            aiming: false,
            damage: 0,
            collectible: true,
            category: ObjectCategory::Item,
            controller: None,
        }
    }

    pub fn state(&self) -> GrenadeState {
        if self.detonated {
            GrenadeState::Detonated
        } else if self.armed {
            GrenadeState::Armed
        } else {
            GrenadeState::Idle
        }
    }
}

/// An agent able to carry and throw grenades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub controller: ControllerId,
    pub procedure: ActionProcedure,
    /// Owned by the throw animation; nothing else writes it.
    pub hand_occupied: bool,
    /// Throw-speed scalar (per-mille world units per tick).
    pub throw_speed: i64,
    pub facing: Facing,
}

impl Agent {
    pub fn new(controller: ControllerId) -> Self {
        Self {
            controller,
            procedure: ActionProcedure::Walk,
            hand_occupied: false,
            throw_speed: AGENT_THROW_SPEED,
            facing: Facing::Right,
        }
    }
}

/// Life state of an agent or living container.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vitals {
    pub alive: bool,
    pub incapacitated: bool,
    pub energy: i32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            alive: true,
            incapacitated: false,
            energy: AGENT_ENERGY,
        }
    }
}

impl Vitals {
    /// Dead or incapacitated.
    pub fn is_disabled(&self) -> bool {
        !self.alive || self.incapacitated
    }
}

/// Aim pose currently held by an agent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AimPose {
    pub active: bool,
    /// Aim angle in degrees (0 = up, clockwise).
    pub angle: f64,
}

/// Ordered contents of a container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub contents: Vec<ObjectId>,
    /// Index of the hand item, for containers with inventory control.
    pub hand_slot: Option<usize>,
}

impl Inventory {
    /// The actively displayed item: the hand item, or the first content.
    pub fn primary(&self) -> Option<ObjectId> {
        match self.hand_slot {
            Some(slot) => self.contents.get(slot).copied(),
            None => self.contents.first().copied(),
        }
    }
}

/// Marks an object as enclosed in another object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Contained {
    pub container: ObjectId,
}

/// Rotation speed (degrees per tick).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Spin {
    pub rotation_speed: i32,
}

/// Friction of each contact point of an object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactVertices {
    pub friction: Vec<i32>,
}

impl ContactVertices {
    pub fn mean_friction(&self) -> f64 {
        if self.friction.is_empty() {
            return 0.0;
        }
        self.friction.iter().map(|&f| f as f64).sum::<f64>() / self.friction.len() as f64
    }
}

/// Blocks launches by an agent until the given tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThrowCooldown {
    pub expires_at_tick: u64,
}

impl ThrowCooldown {
    pub fn is_active(&self, tick: u64) -> bool {
        tick < self.expires_at_tick
    }
}
