//! Entity spawn factories for agents and grenades.

use hecs::{Entity, World};

use grenade_core::components::*;
use grenade_core::types::{ControllerId, Position, Velocity};
use grenade_core::variant::{GrenadeDefinition, VariantId};

/// Spawn an agent with an empty inventory and its hand on the first slot.
pub fn spawn_agent(world: &mut World, controller: ControllerId, position: Position) -> Entity {
    world.spawn((
        Agent::new(controller),
        Vitals::default(),
        AimPose::default(),
        Inventory {
            contents: Vec::new(),
            hand_slot: Some(0),
        },
        position,
        Velocity::default(),
    ))
}

/// Spawn a plain container (crate, vehicle) without inventory control.
pub fn spawn_container(world: &mut World, position: Position, vitals: Option<Vitals>) -> Entity {
    let entity = world.spawn((Inventory::default(), position, Velocity::default()));
    if let Some(vitals) = vitals {
        let _ = world.insert_one(entity, vitals);
    }
    entity
}

/// Spawn an idle grenade of a variant, free in the world.
pub fn spawn_grenade(
    world: &mut World,
    variant: VariantId,
    definition: &GrenadeDefinition,
    position: Position,
) -> Entity {
    world.spawn((
        Grenade::new(variant),
        position,
        Velocity::default(),
        Spin::default(),
        ContactVertices {
            friction: definition.vertex_friction.clone(),
        },
    ))
}
