//! Detonation: the one-shot explosion, contained detonation and damage arming.

use hecs::Entity;
use tracing::{debug, warn};

use grenade_core::components::{Contained, Grenade, Vitals};
use grenade_core::constants::CONTAINED_FLING_LIFT;
use grenade_core::enums::ProcessKind;
use grenade_core::events::GrenadeEvent;
use grenade_core::types::{Position, Velocity};

use crate::behavior::DetonationSite;
use crate::context::{object_id, SimContext};
use crate::controller;
use crate::systems::containment;

/// Detonate a grenade. Only the first call has any effect.
pub fn detonate(ctx: &mut SimContext<'_>, grenade: Entity) {
    let (variant, controller) = {
        let Ok(mut g) = ctx.world.get::<&mut Grenade>(grenade) else {
            return;
        };
        if g.detonated {
            return;
        }
        g.detonated = true;
        (g.variant, g.controller)
    };
    ctx.detach(grenade, ProcessKind::Fuse);

    let position = ctx
        .world
        .get::<&Position>(grenade)
        .map(|p| *p)
        .unwrap_or_default();
    let id = object_id(grenade);
    debug!(grenade = id.0, x = position.x, y = position.y, "detonated");
    ctx.emit(GrenadeEvent::Detonated {
        grenade: id,
        position,
    });

    let variants = ctx.variants;
    let Some(variant) = variants.get(variant) else {
        warn!(grenade = id.0, variant = variant.0, "unknown variant, no explosion");
        return;
    };
    let site = DetonationSite {
        grenade: id,
        position,
        controller,
    };
    let explosion = variant.behavior.on_detonation(&site);
    ctx.emit(GrenadeEvent::Explosion {
        grenade: id,
        position,
        explosion,
        by: controller,
    });
}

/// Hurt a living container from the inside, then leave it.
///
/// The container gets an outward impulse first when it is not itself
/// enclosed. The grenade leaves the container whether or not damage applied.
pub fn detonate_in_container(ctx: &mut SimContext<'_>, grenade: Entity) {
    let Some(container) = containment::container_of(ctx.world, grenade) else {
        return;
    };
    let contained_damage = ctx
        .variant_of(grenade)
        .map(|v| v.definition.contained_damage)
        .unwrap_or(0);
    let controller = ctx
        .world
        .get::<&Grenade>(grenade)
        .ok()
        .and_then(|g| g.controller);
    let living = ctx
        .world
        .get::<&Vitals>(container)
        .map(|v| v.alive)
        .unwrap_or(false);

    if contained_damage > 0 && living {
        let enclosed = ctx.world.get::<&Contained>(container).is_ok();
        if !enclosed {
            if let Ok(mut v) = ctx.world.get::<&mut Velocity>(container) {
                *v = Velocity::new(v.x, v.y - CONTAINED_FLING_LIFT);
            }
        }
        if let Ok(mut vitals) = ctx.world.get::<&mut Vitals>(container) {
            vitals.energy -= contained_damage;
            if vitals.energy <= 0 {
                vitals.energy = 0;
                vitals.alive = false;
            }
        }
        debug!(
            container = object_id(container).0,
            amount = contained_damage,
            "container damaged"
        );
        ctx.emit(GrenadeEvent::ContainerDamaged {
            container: object_id(container),
            amount: contained_damage,
            by: controller,
        });
    }

    containment::exit(ctx, grenade);
}

/// Accumulate damage on a grenade. Reaching the variant's damage threshold
/// arms it.
pub fn apply_damage(ctx: &mut SimContext<'_>, grenade: Entity, amount: u32) {
    let threshold = ctx.variant_of(grenade).and_then(|v| v.definition.max_damage);
    let should_arm = {
        let Ok(mut g) = ctx.world.get::<&mut Grenade>(grenade) else {
            return;
        };
        g.damage = g.damage.saturating_add(amount);
        !g.armed && !g.detonated && threshold.is_some_and(|max| g.damage >= max)
    };
    if should_arm {
        controller::arm(ctx, grenade);
    }
}
