//! Snapshot builder: reads the ECS world and produces a `WorldSnapshot`.
//!
//! Views are sorted by object id so equal worlds give equal snapshots.

use hecs::World;

use grenade_core::components::*;
use grenade_core::enums::ProcessKind;
use grenade_core::events::GrenadeEvent;
use grenade_core::state::{AgentView, GrenadeView, WorldSnapshot};
use grenade_core::types::{Position, SimTime, Velocity};

use crate::behavior::VariantRegistry;
use crate::context::object_id;
use crate::scheduler::Scheduler;
use crate::systems::containment;

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    variants: &VariantRegistry,
    scheduler: &Scheduler,
    events: Vec<GrenadeEvent>,
) -> WorldSnapshot {
    let mut grenades: Vec<GrenadeView> = world
        .query::<(&Grenade, &Position, &Velocity)>()
        .iter()
        .map(|(entity, (grenade, pos, vel))| GrenadeView {
            id: object_id(entity),
            variant: variants
                .get(grenade.variant)
                .map(|v| v.definition.name.clone())
                .unwrap_or_default(),
            state: grenade.state(),
            aiming: grenade.aiming,
            collectible: grenade.collectible,
            category: grenade.category,
            position: *pos,
            velocity: *vel,
            container: containment::container_of(world, entity).map(object_id),
            controller: grenade.controller,
            damage: grenade.damage,
            fuse_elapsed: scheduler.elapsed(entity, ProcessKind::Fuse),
        })
        .collect();
    grenades.sort_by_key(|g| g.id);

    let mut agents: Vec<AgentView> = world
        .query::<(&Agent, &Vitals, &AimPose, &Position)>()
        .iter()
        .map(|(entity, (agent, vitals, aim, pos))| AgentView {
            id: object_id(entity),
            controller: agent.controller,
            position: *pos,
            alive: vitals.alive,
            incapacitated: vitals.incapacitated,
            energy: vitals.energy,
            hand_occupied: agent.hand_occupied,
            aiming: aim.active,
            aim_angle: aim.angle,
            throw_blocked: world
                .get::<&ThrowCooldown>(entity)
                .map(|cd| cd.is_active(time.tick))
                .unwrap_or(false),
            hand_item: containment::primary_item(world, entity).map(object_id),
        })
        .collect();
    agents.sort_by_key(|a| a.id);

    WorldSnapshot {
        time: *time,
        grenades,
        agents,
        events,
    }
}
