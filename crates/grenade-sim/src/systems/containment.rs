//! Containment: entering and leaving containers.
//!
//! Leaving a container is atomic: the inventory entry, the `Contained` marker,
//! the position and the departure bookkeeping all change in one call.

use hecs::{Entity, World};
use tracing::debug;

use grenade_core::components::{Agent, Contained, Grenade, Inventory, Vitals};
use grenade_core::events::GrenadeEvent;
use grenade_core::types::Position;

use crate::context::{object_id, resolve, SimContext};

/// Live container of an object, if any.
pub fn container_of(world: &World, object: Entity) -> Option<Entity> {
    let contained = *world.get::<&Contained>(object).ok()?;
    resolve(world, contained.container)
}

/// Whether `object` sits inside `container`.
pub fn is_inside(world: &World, object: Entity, container: Entity) -> bool {
    container_of(world, object) == Some(container)
}

/// Primary item of a container's inventory.
pub fn primary_item(world: &World, container: Entity) -> Option<Entity> {
    let id = world.get::<&Inventory>(container).ok()?.primary()?;
    resolve(world, id)
}

/// Put `object` into `container`.
pub fn enter(ctx: &mut SimContext<'_>, object: Entity, container: Entity) -> bool {
    let object_ref = object_id(object);
    {
        let Ok(mut inventory) = ctx.world.get::<&mut Inventory>(container) else {
            return false;
        };
        if !inventory.contents.contains(&object_ref) {
            inventory.contents.push(object_ref);
        }
    }
    let _ = ctx.world.insert_one(
        object,
        Contained {
            container: object_id(container),
        },
    );
    debug!(object = object_ref.0, container = object_id(container).0, "entered");
    true
}

/// Take `object` out of its container. Returns the former container.
///
/// Runs the departure bookkeeping for grenades: aiming ends, and an armed
/// grenade clears its holder's fuse display.
pub fn exit(ctx: &mut SimContext<'_>, object: Entity) -> Option<Entity> {
    let contained = ctx.world.remove_one::<Contained>(object).ok()?;
    let object_ref = object_id(object);
    let Some(container) = resolve(ctx.world, contained.container) else {
        if let Ok(mut grenade) = ctx.world.get::<&mut Grenade>(object) {
            grenade.aiming = false;
        }
        return None;
    };

    if let Ok(mut inventory) = ctx.world.get::<&mut Inventory>(container) {
        inventory.contents.retain(|&id| id != object_ref);
    }
    let container_pos = ctx.world.get::<&Position>(container).ok().map(|p| *p);
    if let (Some(pos), Ok(mut object_pos)) =
        (container_pos, ctx.world.get::<&mut Position>(object))
    {
        *object_pos = pos;
    }

    on_departure(ctx, object, container);
    ctx.emit(GrenadeEvent::Ejected {
        grenade: object_ref,
        from: object_id(container),
    });
    Some(container)
}

fn on_departure(ctx: &mut SimContext<'_>, object: Entity, container: Entity) {
    let armed = {
        let Ok(mut grenade) = ctx.world.get::<&mut Grenade>(object) else {
            return;
        };
        grenade.aiming = false;
        grenade.armed && !grenade.detonated
    };
    if !armed {
        return;
    }
    let controller = ctx.world.get::<&Agent>(container).ok().map(|a| a.controller);
    if let Some(controller) = controller {
        ctx.emit(GrenadeEvent::WarningCleared {
            holder: object_id(container),
            controller,
        });
    }
}

/// Remove `object` from its container without departure events. Used when the
/// object itself is being removed from the world.
pub fn detach_silently(world: &mut World, object: Entity) {
    let Ok(contained) = world.remove_one::<Contained>(object) else {
        return;
    };
    let object_ref = object_id(object);
    if let Some(container) = resolve(world, contained.container) {
        if let Ok(mut inventory) = world.get::<&mut Inventory>(container) {
            inventory.contents.retain(|&id| id != object_ref);
        }
    }
}

/// Pick up a free, collectible grenade.
pub fn collect(ctx: &mut SimContext<'_>, agent: Entity, grenade: Entity) -> bool {
    let collectible = ctx
        .world
        .get::<&Grenade>(grenade)
        .map(|g| g.collectible && !g.detonated)
        .unwrap_or(false);
    if !collectible || container_of(ctx.world, grenade).is_some() {
        return false;
    }
    let able = ctx
        .world
        .get::<&Vitals>(agent)
        .map(|v| !v.is_disabled())
        .unwrap_or(false);
    if !able || !enter(ctx, grenade, agent) {
        return false;
    }
    ctx.emit(GrenadeEvent::Collected {
        grenade: object_id(grenade),
        by: object_id(agent),
    });
    true
}
