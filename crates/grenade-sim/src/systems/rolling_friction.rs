//! Temporary reduced contact friction after a lob, so the grenade rolls on.

use hecs::Entity;

use grenade_core::components::ContactVertices;
use grenade_core::constants::{ROLLING_FRICTION_DIVISOR, ROLLING_FRICTION_TICKS};
use grenade_core::enums::ProcessKind;

use crate::context::SimContext;
use crate::scheduler::{Process, ProcessStatus, StopReason};

#[derive(Debug)]
pub struct RollingFriction {
    duration: u32,
    saved: Vec<i32>,
}

impl RollingFriction {
    pub fn new() -> Self {
        Self::with_duration(ROLLING_FRICTION_TICKS)
    }

    pub fn with_duration(duration: u32) -> Self {
        Self {
            duration,
            saved: Vec::new(),
        }
    }
}

impl Default for RollingFriction {
    fn default() -> Self {
        Self::new()
    }
}

impl Process for RollingFriction {
    fn kind(&self) -> ProcessKind {
        ProcessKind::RollingFriction
    }

    fn start(&mut self, grenade: Entity, ctx: &mut SimContext<'_>) {
        if let Ok(mut vertices) = ctx.world.get::<&mut ContactVertices>(grenade) {
            self.saved = vertices.friction.clone();
            for friction in vertices.friction.iter_mut() {
                *friction /= ROLLING_FRICTION_DIVISOR;
            }
        }
    }

    fn tick(&mut self, _grenade: Entity, elapsed: u32, _ctx: &mut SimContext<'_>) -> ProcessStatus {
        if elapsed >= self.duration {
            ProcessStatus::Finished
        } else {
            ProcessStatus::Continue
        }
    }

    // Restores on every exit path, including forced removal.
    fn stop(&mut self, grenade: Entity, _reason: StopReason, ctx: &mut SimContext<'_>) {
        if self.saved.is_empty() {
            return;
        }
        if let Ok(mut vertices) = ctx.world.get::<&mut ContactVertices>(grenade) {
            vertices.friction = std::mem::take(&mut self.saved);
        }
    }
}
