//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{AIM_ANGLE_LIMIT, TICK_RATE, VELOCITY_PRECISION};

/// 2D position in world units. x = right, y = down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in speed units (`VELOCITY_PRECISION` per world unit per tick).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Weak reference to another object in the world.
///
/// Holds the bit pattern of an entity handle. Resolving it always needs a
/// liveness check; holding one never keeps the object alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Player (controller) number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControllerId(pub u32);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Speed magnitude (speed units).
    pub fn speed(&self) -> f64 {
        DVec2::from(*self).length()
    }

    /// Horizontal component in per-mille world units per tick, truncated.
    pub fn x_per_mille(&self) -> i64 {
        (self.x * 1000.0 / VELOCITY_PRECISION) as i64
    }

    /// Vertical component in per-mille world units per tick, truncated.
    pub fn y_per_mille(&self) -> i64 {
        (self.y * 1000.0 / VELOCITY_PRECISION) as i64
    }

    /// Build a velocity from per-mille world units per tick.
    pub fn from_per_mille(x: f64, y: f64) -> Self {
        Self::new(x * VELOCITY_PRECISION / 1000.0, y * VELOCITY_PRECISION / 1000.0)
    }

    /// Velocity of `speed` along an aim angle (0 = up, clockwise).
    pub fn along_angle(angle_deg: f64, speed: f64) -> Self {
        (angle_direction(angle_deg) * speed).into()
    }
}

impl From<Velocity> for DVec2 {
    fn from(v: Velocity) -> Self {
        DVec2::new(v.x, v.y)
    }
}

impl From<DVec2> for Velocity {
    fn from(v: DVec2) -> Self {
        Velocity::new(v.x, v.y)
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        1.0 / TICK_RATE as f64
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Unit vector for an aim angle in degrees (0 = up, positive = clockwise).
pub fn angle_direction(angle_deg: f64) -> DVec2 {
    let rad = angle_deg.to_radians();
    DVec2::new(rad.sin(), -rad.cos())
}

/// Clamp a requested aim angle to the throwable range.
pub fn clamp_aim_angle(angle_deg: f64) -> f64 {
    angle_deg.clamp(-AIM_ANGLE_LIMIT, AIM_ANGLE_LIMIT)
}

/// Aim angle for a cursor offset relative to the agent.
/// Normalized to [-180, 180) before clamping.
pub fn aim_angle_from_offset(dx: f64, dy: f64) -> f64 {
    let angle = dx.atan2(-dy).to_degrees();
    let normalized = (angle + 180.0).rem_euclid(360.0) - 180.0;
    clamp_aim_angle(normalized)
}
