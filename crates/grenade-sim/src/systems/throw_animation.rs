//! Lob wind-up on the throwing agent.
//!
//! Occupies the agent's hands for the length of the animation and releases
//! the grenade at the release instant. Ends early if the grenade goes away.

use hecs::Entity;
use tracing::debug;

use grenade_core::components::{Agent, Grenade};
use grenade_core::constants::{
    THROW_ANIMATION_TICKS, THROW_RELEASE_DENOMINATOR, THROW_RELEASE_NUMERATOR,
};
use grenade_core::enums::{AnimationCue, ProcessKind};
use grenade_core::events::GrenadeEvent;
use grenade_core::types::{clamp_aim_angle, ObjectId};

use crate::context::{object_id, SimContext};
use crate::scheduler::{Process, ProcessStatus, StopReason};
use crate::systems::{containment, launch};

#[derive(Debug)]
pub struct ThrowAnimation {
    grenade: ObjectId,
    angle: f64,
    duration: u32,
    released: bool,
}

impl ThrowAnimation {
    pub fn new(grenade: ObjectId, angle: f64) -> Self {
        Self {
            grenade,
            angle: clamp_aim_angle(angle),
            duration: THROW_ANIMATION_TICKS,
            released: false,
        }
    }

    /// Tick at which the grenade leaves the hand.
    pub fn release_tick(&self) -> u32 {
        self.duration * THROW_RELEASE_NUMERATOR / THROW_RELEASE_DENOMINATOR
    }
}

impl Process for ThrowAnimation {
    fn kind(&self) -> ProcessKind {
        ProcessKind::ThrowAnimation
    }

    fn start(&mut self, agent: Entity, ctx: &mut SimContext<'_>) {
        if let Ok(mut a) = ctx.world.get::<&mut Agent>(agent) {
            a.hand_occupied = true;
        }
        ctx.emit(GrenadeEvent::Animation {
            agent: object_id(agent),
            cue: AnimationCue::ThrowArms {
                ticks: self.duration,
            },
        });
    }

    fn tick(&mut self, agent: Entity, elapsed: u32, ctx: &mut SimContext<'_>) -> ProcessStatus {
        let grenade = ctx.resolve(self.grenade).filter(|&g| {
            ctx.world
                .get::<&Grenade>(g)
                .map(|g| !g.detonated)
                .unwrap_or(false)
        });
        let Some(grenade) = grenade else {
            debug!(grenade = self.grenade.0, "throw target gone");
            return ProcessStatus::Finished;
        };

        if !self.released {
            if !containment::is_inside(ctx.world, grenade, agent) {
                debug!(grenade = self.grenade.0, "throw target left the hand");
                return ProcessStatus::Finished;
            }
            if elapsed == self.release_tick() {
                self.released = true;
                launch::finish_lob(ctx, grenade, agent, self.angle);
            }
        }

        if elapsed >= self.duration {
            ProcessStatus::Finished
        } else {
            ProcessStatus::Continue
        }
    }

    fn stop(&mut self, agent: Entity, _reason: StopReason, ctx: &mut SimContext<'_>) {
        let Ok(mut a) = ctx.world.get::<&mut Agent>(agent) else {
            return;
        };
        a.hand_occupied = false;
        drop(a);
        ctx.emit(GrenadeEvent::Animation {
            agent: object_id(agent),
            cue: AnimationCue::StopArms,
        });
    }
}

/// Begin a lob: turn toward the throw and start the wind-up.
pub fn start_lob(ctx: &mut SimContext<'_>, agent: Entity, grenade: Entity, angle: f64) {
    launch::face_toward(ctx.world, agent, angle);
    ctx.attach(agent, Box::new(ThrowAnimation::new(object_id(grenade), angle)));
}
