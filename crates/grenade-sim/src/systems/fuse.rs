//! Fuse countdown process, attached to a grenade when it is armed.
//!
//! Each tick, in this order:
//! 1. at the end of the countdown: contained detonation, then detonation;
//! 2. while contained: drop out of a dead or incapacitated holder, otherwise
//!    show the holder the fuse progress if the grenade is its primary item;
//! 3. in free flight: leave a smoke trail.
//!
//! The expiring evaluation runs before the tick's commands, so nothing queued
//! for that tick moves the grenade before it goes off.

use hecs::Entity;
use tracing::debug;

use grenade_core::color::{ramp, Rgba};
use grenade_core::components::{Agent, Vitals};
use grenade_core::constants::*;
use grenade_core::enums::ProcessKind;
use grenade_core::events::GrenadeEvent;
use grenade_core::types::{Position, Velocity};

use crate::behavior::TrailSite;
use crate::context::{object_id, SimContext};
use crate::scheduler::{Process, ProcessStatus};
use crate::systems::{containment, detonation, launch};

#[derive(Debug)]
pub struct FuseProcess {
    fuse_time: u32,
}

impl FuseProcess {
    pub fn new(fuse_time: u32) -> Self {
        Self { fuse_time }
    }
}

impl Process for FuseProcess {
    fn kind(&self) -> ProcessKind {
        ProcessKind::Fuse
    }

    fn priority(&self) -> i32 {
        FUSE_PRIORITY
    }

    fn preempts(&self, elapsed: u32) -> bool {
        elapsed >= self.fuse_time
    }

    fn tick(&mut self, grenade: Entity, elapsed: u32, ctx: &mut SimContext<'_>) -> ProcessStatus {
        if elapsed >= self.fuse_time {
            debug!(grenade = object_id(grenade).0, elapsed, "fuse expired");
            detonation::detonate_in_container(ctx, grenade);
            detonation::detonate(ctx, grenade);
            return ProcessStatus::Finished;
        }

        let Some(container) = containment::container_of(ctx.world, grenade) else {
            emit_trail(ctx, grenade);
            return ProcessStatus::Continue;
        };

        let disabled = ctx
            .world
            .get::<&Vitals>(container)
            .map(|v| v.is_disabled())
            .unwrap_or(false);
        if disabled {
            launch::do_drop(ctx, grenade, Some(container));
            return ProcessStatus::Continue;
        }

        if containment::primary_item(ctx.world, container) == Some(grenade) {
            emit_warning(ctx, container, elapsed, self.fuse_time);
        }
        ProcessStatus::Continue
    }
}

/// Fuse progress in thousandths.
pub fn fuse_progress(elapsed: u32, fuse_time: u32) -> u32 {
    (elapsed.saturating_mul(FUSE_PROGRESS_SCALE) / fuse_time.max(1)).min(FUSE_PROGRESS_SCALE)
}

/// Warning color for a fuse progress: green, through yellow, to red.
pub fn warning_color(progress: u32) -> Rgba {
    let stops = [
        (0, Rgba::from_argb(WARNING_COLOR_START)),
        (
            i64::from(FUSE_PROGRESS_SCALE / 2),
            Rgba::from_argb(WARNING_COLOR_MID),
        ),
        (
            i64::from(FUSE_PROGRESS_SCALE),
            Rgba::from_argb(WARNING_COLOR_END),
        ),
    ];
    ramp(i64::from(progress), &stops)
}

fn emit_warning(ctx: &mut SimContext<'_>, holder: Entity, elapsed: u32, fuse_time: u32) {
    let Some(controller) = ctx.world.get::<&Agent>(holder).ok().map(|a| a.controller) else {
        return;
    };
    let progress = fuse_progress(elapsed, fuse_time);
    ctx.emit(GrenadeEvent::FuseWarning {
        holder: object_id(holder),
        controller,
        progress,
        color: warning_color(progress),
    });
}

fn emit_trail(ctx: &mut SimContext<'_>, grenade: Entity) {
    let Some(variant) = ctx.variant_of(grenade) else {
        return;
    };
    let position = ctx
        .world
        .get::<&Position>(grenade)
        .map(|p| *p)
        .unwrap_or_default();
    let velocity = ctx
        .world
        .get::<&Velocity>(grenade)
        .map(|v| *v)
        .unwrap_or_default();
    let site = TrailSite {
        grenade: object_id(grenade),
        position,
        velocity,
        smoke_color: variant.definition.smoke_color,
    };
    if let Some(puff) = variant.behavior.handle_trail(&site) {
        ctx.emit(GrenadeEvent::Trail {
            grenade: site.grenade,
            puff,
        });
    }
}
