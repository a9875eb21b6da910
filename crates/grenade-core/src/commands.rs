//! Commands sent to the simulation by input handling and other subsystems.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::ActionProcedure;
use crate::types::{ObjectId, Position};

/// Raw use-input phases forwarded from the agent's hand item controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UseInput {
    /// Primary use pressed.
    Start,
    /// Primary use held (repeats each tick while held).
    Holding,
    /// Primary use released.
    Stop,
    /// Primary use cancelled (e.g. item switched while held).
    Cancel,
    /// Alternate use pressed.
    AltStart,
    /// Alternate use cancelled.
    AltCancel,
    /// Cursor moved while the aiming cursor is active.
    AimMove,
}

/// All commands the grenade engine understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GrenadeCommand {
    /// Use input from an agent; acts on the agent's hand item.
    /// `target` is the cursor offset relative to the agent.
    Use {
        agent: ObjectId,
        input: UseInput,
        target: Position,
    },
    /// Pick up a free grenade.
    Collect { agent: ObjectId, grenade: ObjectId },
    /// Select which inventory slot is in the agent's hand.
    SelectHandSlot { agent: ObjectId, slot: usize },
    /// Damage dealt to a grenade.
    Damage { grenade: ObjectId, amount: u32 },
    /// Change an agent's life state.
    SetVitals {
        agent: ObjectId,
        alive: bool,
        incapacitated: bool,
    },
    /// Change an agent's action procedure.
    SetProcedure {
        agent: ObjectId,
        procedure: ActionProcedure,
    },
    /// Arm a grenade directly.
    Arm { grenade: ObjectId },
    /// Detonate a grenade directly.
    Detonate { grenade: ObjectId },
    /// Release a grenade from its holder without changing its velocity.
    Launch {
        grenade: ObjectId,
        agent: Option<ObjectId>,
    },
    /// Drop a grenade with its holder's velocity.
    Drop {
        grenade: ObjectId,
        agent: Option<ObjectId>,
    },
    /// Perform the lob release immediately, without the wind-up.
    FinishLob {
        grenade: ObjectId,
        agent: ObjectId,
        angle: f64,
    },
}
