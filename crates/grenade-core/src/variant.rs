//! Grenade variant definitions: the per-variant tunables.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::BehaviorKind;
use crate::error::ConfigError;

/// Index of a registered variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantId(pub u16);

/// Validated tunables of one grenade variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrenadeDefinition {
    pub name: String,
    pub behavior: BehaviorKind,
    /// Ticks from arming to detonation.
    pub fuse_time: u32,
    /// Multiplier on the agent's throw-speed scalar.
    pub throw_speed: i64,
    /// Launch cooldown installed on the thrower (ticks).
    pub throw_delay: u32,
    /// Accumulated damage that arms the grenade. `None` disables auto-arming.
    pub max_damage: Option<u32>,
    /// Damage to a living container on detonation inside it.
    pub contained_damage: i32,
    /// Trail smoke color (0xAARRGGBB).
    pub smoke_color: u32,
    /// Contact-point friction defaults.
    pub vertex_friction: Vec<i32>,
}

impl GrenadeDefinition {
    /// The base hand grenade.
    pub fn standard() -> Self {
        Self {
            name: "standard".into(),
            behavior: BehaviorKind::Standard,
            fuse_time: DEFAULT_FUSE_TIME,
            throw_speed: DEFAULT_THROW_SPEED_MULTIPLIER,
            throw_delay: DEFAULT_THROW_DELAY,
            max_damage: Some(DEFAULT_MAX_DAMAGE),
            contained_damage: DEFAULT_CONTAINED_DAMAGE,
            smoke_color: DEFAULT_SMOKE_COLOR,
            vertex_friction: DEFAULT_VERTEX_FRICTION.to_vec(),
        }
    }

    /// The heavier field grenade with a two-tier blast.
    pub fn field() -> Self {
        Self {
            name: "field".into(),
            behavior: BehaviorKind::Field,
            contained_damage: 120,
            smoke_color: 0xffdd_0000,
            ..Self::standard()
        }
    }
}

/// Variant table as written in configuration files. Every tunable is optional
/// here so that missing ones can be reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDefinition {
    pub name: Option<String>,
    pub behavior: Option<BehaviorKind>,
    pub fuse_time: Option<u32>,
    pub throw_speed: Option<i64>,
    pub throw_delay: Option<u32>,
    pub max_damage: Option<u32>,
    pub contained_damage: Option<i32>,
    pub smoke_color: Option<u32>,
    pub vertex_friction: Option<Vec<i32>>,
}

impl RawDefinition {
    /// Check required tunables and value ranges.
    pub fn validate(self) -> Result<GrenadeDefinition, ConfigError> {
        let name = self.name.ok_or(ConfigError::MissingTunable {
            variant: "<unnamed>".into(),
            field: "name",
        })?;
        let missing = |field: &'static str| ConfigError::MissingTunable {
            variant: name.clone(),
            field,
        };
        let invalid = |field: &'static str, reason: &'static str| ConfigError::InvalidTunable {
            variant: name.clone(),
            field,
            reason,
        };

        let fuse_time = self.fuse_time.ok_or_else(|| missing("fuse_time"))?;
        let throw_speed = self.throw_speed.ok_or_else(|| missing("throw_speed"))?;
        let throw_delay = self.throw_delay.ok_or_else(|| missing("throw_delay"))?;
        let contained_damage = self
            .contained_damage
            .ok_or_else(|| missing("contained_damage"))?;

        if fuse_time == 0 {
            return Err(invalid("fuse_time", "must be at least one tick"));
        }
        if throw_speed <= 0 {
            return Err(invalid("throw_speed", "must be positive"));
        }
        if contained_damage < 0 {
            return Err(invalid("contained_damage", "must not be negative"));
        }
        let vertex_friction = self
            .vertex_friction
            .unwrap_or_else(|| DEFAULT_VERTEX_FRICTION.to_vec());
        if vertex_friction.is_empty() {
            return Err(invalid("vertex_friction", "needs at least one contact point"));
        }

        Ok(GrenadeDefinition {
            behavior: self.behavior.unwrap_or_default(),
            fuse_time,
            throw_speed,
            throw_delay,
            max_damage: self.max_damage,
            contained_damage,
            smoke_color: self.smoke_color.unwrap_or(DEFAULT_SMOKE_COLOR),
            vertex_friction,
            name,
        })
    }
}
