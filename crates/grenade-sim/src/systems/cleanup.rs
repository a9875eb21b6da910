//! Cleanup system: expires throw cooldowns and removes detonated grenades.

use hecs::{Entity, World};
use tracing::debug;

use grenade_core::components::{Contained, Grenade, Inventory, ThrowCooldown};

use crate::context::{object_id, resolve, SimContext};
use crate::scheduler::Scheduler;
use crate::systems::containment;

/// Drop cooldown markers that ran out by `tick`.
pub fn expire_cooldowns(world: &mut World, tick: u64) {
    let expired: Vec<Entity> = world
        .query_mut::<&ThrowCooldown>()
        .into_iter()
        .filter(|(_, cd)| !cd.is_active(tick))
        .map(|(entity, _)| entity)
        .collect();
    for entity in expired {
        let _ = world.remove_one::<ThrowCooldown>(entity);
    }
}

/// Remove detonated grenades and everything attached to them.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(ctx: &mut SimContext<'_>, scheduler: &mut Scheduler, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, grenade) in ctx.world.query_mut::<&Grenade>() {
        if grenade.detonated {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        remove_object(ctx, scheduler, entity);
    }
}

/// Take an object out of the world: out of its container, its contents set
/// free, processes stopped, then despawned.
pub fn remove_object(ctx: &mut SimContext<'_>, scheduler: &mut Scheduler, entity: Entity) {
    containment::detach_silently(ctx.world, entity);
    let contents: Vec<Entity> = ctx
        .world
        .get::<&Inventory>(entity)
        .map(|inv| inv.contents.clone())
        .unwrap_or_default()
        .into_iter()
        .filter_map(|id| resolve(ctx.world, id))
        .collect();
    for item in contents {
        let _ = ctx.world.remove_one::<Contained>(item);
    }
    ctx.detach_all(entity);
    scheduler.apply(ctx);
    debug!(object = object_id(entity).0, "despawned");
    let _ = ctx.world.despawn(entity);
}
