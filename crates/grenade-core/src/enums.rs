//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// How an agent's use input drives a grenade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Press arms, hold aims, release launches.
    #[default]
    Hold,
    /// Press arms or, once armed, launches. Alt-use toggles aiming.
    Toggle,
}

/// Lifecycle state of a grenade, derived from its flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrenadeState {
    /// Collectible and unarmed.
    #[default]
    Idle,
    /// Countdown running, no longer collectible.
    Armed,
    /// Terminal, pending removal.
    Detonated,
}

/// Object category as seen by the inventory system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectCategory {
    /// Passive inventory item.
    #[default]
    Item,
    /// Free physical object, cannot be picked up.
    Vehicle,
}

/// What an agent is currently doing with its body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionProcedure {
    #[default]
    Walk,
    Jump,
    Scale,
    Hangle,
    Swim,
    Flight,
    Tumble,
    None,
}

impl ActionProcedure {
    /// Whether the hands are free for an item action in this procedure.
    pub fn allows_hand_action(self) -> bool {
        matches!(
            self,
            ActionProcedure::Walk
                | ActionProcedure::Jump
                | ActionProcedure::Swim
                | ActionProcedure::Flight
        )
    }
}

/// Facing direction of an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Launch path taken when a grenade leaves its holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchPath {
    Aimed,
    Lob,
    Drop,
    /// Plain release without velocity change (external control point).
    Release,
}

/// Per-tick process types run by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessKind {
    Fuse,
    ThrowAnimation,
    RollingFriction,
}

/// Built-in variant behaviors selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorKind {
    /// Single blast, radius 30.
    #[default]
    Standard,
    /// Two-tier blast.
    Field,
}

/// Animation control points on the agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimationCue {
    /// Play the lob wind-up over the given number of ticks.
    ThrowArms { ticks: u32 },
    /// Stop whatever plays in the arms slot.
    StopArms,
    /// Enter the aim pose at an angle.
    AimStart { angle: f64 },
    /// Leave the aim pose.
    AimStop,
}

/// Which side a solid contact was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactSide {
    Below,
    Above,
    Left,
    Right,
}
