//! Grenade motion: gravity, integration, terrain contact and ground friction.
//!
//! Contained grenades ride along with their container. Free grenades move one
//! axis at a time in unit steps so they stop at the contact point instead of
//! tunnelling into the ground. A grenade already lying on the ground settles
//! instead of bouncing when gravity pulls it back into the floor.

use hecs::{Entity, World};

use grenade_core::components::{ContactVertices, Contained, Grenade};
use grenade_core::constants::*;
use grenade_core::enums::ContactSide;
use grenade_core::events::GrenadeEvent;
use grenade_core::types::{Position, Velocity};

use crate::context::{object_id, resolve};
use crate::terrain::Terrain;

/// Distance below a grenade checked for resting contact.
const GROUND_PROBE: f64 = 1.0;

/// Move every grenade by one tick.
pub fn run(world: &mut World, terrain: &dyn Terrain, events: &mut Vec<GrenadeEvent>) {
    follow_containers(world);

    for (entity, (pos, vel, vertices, _grenade)) in world
        .query_mut::<(&mut Position, &mut Velocity, Option<&ContactVertices>, &Grenade)>()
        .without::<&Contained>()
    {
        let settling =
            vel.y <= RESTING_IMPACT_SPEED && terrain.is_solid(pos.x, pos.y + GROUND_PROBE);
        vel.y += GRAVITY;

        let (after_x, hit_x) = advance_axis(terrain, *pos, vel.x / VELOCITY_PRECISION, Axis::X);
        let (after_y, hit_y) = advance_axis(terrain, after_x, vel.y / VELOCITY_PRECISION, Axis::Y);
        *pos = after_y;

        if hit_y && !hit_x && settling && vel.y >= 0.0 {
            vel.y = 0.0;
        } else if hit_x || hit_y {
            if let Some(side) = bounce(terrain, pos, vel) {
                events.push(GrenadeEvent::Bounce {
                    grenade: object_id(entity),
                    side,
                });
            }
        }

        if terrain.is_solid(pos.x, pos.y + GROUND_PROBE) {
            let mean = vertices.map(|v| v.mean_friction()).unwrap_or(0.0);
            apply_ground_friction(vel, mean);
        }
    }
}

/// Reflect and damp velocity on solid contact. Floor and ceiling are
/// checked before walls.
pub fn bounce(terrain: &dyn Terrain, pos: &Position, vel: &mut Velocity) -> Option<ContactSide> {
    if terrain.is_solid(pos.x, pos.y + CONTACT_PROBE) {
        vel.y = -vel.y / BOUNCE_DIVISOR_VERTICAL;
        Some(ContactSide::Below)
    } else if terrain.is_solid(pos.x, pos.y - CONTACT_PROBE) {
        vel.y = -vel.y / BOUNCE_DIVISOR_VERTICAL;
        Some(ContactSide::Above)
    } else if terrain.is_solid(pos.x - CONTACT_PROBE, pos.y) {
        vel.x = -vel.x / BOUNCE_DIVISOR_HORIZONTAL;
        Some(ContactSide::Left)
    } else if terrain.is_solid(pos.x + CONTACT_PROBE, pos.y) {
        vel.x = -vel.x / BOUNCE_DIVISOR_HORIZONTAL;
        Some(ContactSide::Right)
    } else {
        None
    }
}

/// Slow horizontal motion of a grenade resting on the ground.
pub fn apply_ground_friction(vel: &mut Velocity, mean_friction: f64) {
    let decel = mean_friction * GROUND_FRICTION_SCALE;
    if vel.x.abs() <= decel {
        vel.x = 0.0;
    } else {
        vel.x -= decel * vel.x.signum();
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// Move along one axis in unit steps. Returns the last free position and
/// whether a solid point was hit.
fn advance_axis(terrain: &dyn Terrain, start: Position, delta: f64, axis: Axis) -> (Position, bool) {
    if delta == 0.0 {
        return (start, false);
    }
    let steps = delta.abs().ceil().max(1.0) as usize;
    let step = delta / steps as f64;
    let mut current = start;
    for _ in 0..steps {
        let candidate = match axis {
            Axis::X => current.offset(step, 0.0),
            Axis::Y => current.offset(0.0, step),
        };
        if terrain.is_solid(candidate.x, candidate.y) {
            return (current, true);
        }
        current = candidate;
    }
    (current, false)
}

fn follow_containers(world: &mut World) {
    let mut updates: Vec<(Entity, Position)> = Vec::new();
    for (entity, contained) in world.query::<&Contained>().iter() {
        if let Some(container) = resolve(world, contained.container) {
            if let Ok(pos) = world.get::<&Position>(container) {
                updates.push((entity, *pos));
            }
        }
    }
    for (entity, pos) in updates {
        if let Ok(mut p) = world.get::<&mut Position>(entity) {
            *p = pos;
        }
    }
}
