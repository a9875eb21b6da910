//! Launch paths: how a grenade leaves its holder.
//!
//! All paths share `launch`: leave the container, take over the holder's
//! controller, install the holder's throw cooldown and pick a random spin.
//! Velocities are computed in per-mille world units per tick and converted at
//! the end.

use glam::DVec2;
use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

use grenade_core::components::{Agent, Grenade, Spin, ThrowCooldown};
use grenade_core::constants::*;
use grenade_core::enums::{Facing, LaunchPath};
use grenade_core::events::GrenadeEvent;
use grenade_core::types::{angle_direction, clamp_aim_angle, Position, Velocity};

use crate::context::{object_id, SimContext};
use crate::systems::containment;
use crate::systems::rolling_friction::RollingFriction;

/// Whether an agent still waits out its previous launch.
pub fn is_throw_blocked(world: &World, agent: Entity, tick: u64) -> bool {
    world
        .get::<&ThrowCooldown>(agent)
        .map(|cd| cd.is_active(tick))
        .unwrap_or(false)
}

/// Shared release step. Returns the holder, if any.
///
/// `agent` defaults to the grenade's current container.
pub fn launch(ctx: &mut SimContext<'_>, grenade: Entity, agent: Option<Entity>) -> Option<Entity> {
    let former = containment::exit(ctx, grenade);
    let user = agent
        .filter(|&a| ctx.world.contains(a))
        .or(former);

    if let Some(user) = user {
        let controller = ctx.world.get::<&Agent>(user).ok().map(|a| a.controller);
        if let Ok(mut g) = ctx.world.get::<&mut Grenade>(grenade) {
            if controller.is_some() {
                g.controller = controller;
            }
        }
        let throw_delay = ctx
            .variant_of(grenade)
            .map(|v| v.definition.throw_delay)
            .unwrap_or(DEFAULT_THROW_DELAY);
        let _ = ctx.world.remove_one::<ThrowCooldown>(user);
        let _ = ctx.world.insert_one(
            user,
            ThrowCooldown {
                expires_at_tick: ctx.tick + u64::from(throw_delay),
            },
        );
    }

    let spin = ctx.rng.gen_range(-LAUNCH_SPIN_RANGE..=LAUNCH_SPIN_RANGE);
    if let Ok(mut s) = ctx.world.get::<&mut Spin>(grenade) {
        s.rotation_speed = spin;
    }
    user
}

/// Plain release: no velocity change.
pub fn release(ctx: &mut SimContext<'_>, grenade: Entity, agent: Option<Entity>) {
    let user = launch(ctx, grenade, agent);
    emit_launched(ctx, grenade, user, LaunchPath::Release);
}

/// Drop with the holder's velocity.
pub fn do_drop(ctx: &mut SimContext<'_>, grenade: Entity, agent: Option<Entity>) {
    let user = launch(ctx, grenade, agent);
    if let Some(user) = user {
        let velocity = velocity_of(ctx.world, user);
        set_velocity(ctx.world, grenade, velocity);
    }
    debug!(grenade = object_id(grenade).0, "dropped");
    emit_launched(ctx, grenade, user, LaunchPath::Drop);
}

/// Aimed throw along `angle`, scaled by the holder's throw speed and the
/// variant's multiplier.
pub fn do_throw(ctx: &mut SimContext<'_>, grenade: Entity, agent: Entity, angle: f64) {
    let angle = clamp_aim_angle(angle);
    let holder_velocity = velocity_of(ctx.world, agent);
    let holder_pos = position_of(ctx.world, agent);
    let throw_speed = ctx
        .world
        .get::<&Agent>(agent)
        .map(|a| a.throw_speed)
        .unwrap_or(AGENT_THROW_SPEED);
    let multiplier = ctx
        .variant_of(grenade)
        .map(|v| v.definition.throw_speed)
        .unwrap_or(DEFAULT_THROW_SPEED_MULTIPLIER);

    let release = aimed_release(holder_velocity, throw_speed, multiplier, angle);

    let user = launch(ctx, grenade, Some(agent));
    set_velocity(ctx.world, grenade, release);
    if let Some(pos) = holder_pos {
        set_position(ctx.world, grenade, pos.offset(0.0, AIMED_RELEASE_OFFSET_Y));
    }
    debug!(grenade = object_id(grenade).0, angle, "thrown");
    emit_launched(ctx, grenade, user, LaunchPath::Aimed);
}

/// Release vector of an aimed throw.
///
/// speed = throw_speed * multiplier + 60% of the holder's speed;
/// release = 40% of the holder's velocity + direction(angle) * speed.
pub fn aimed_release(holder: Velocity, throw_speed: i64, multiplier: i64, angle: f64) -> Velocity {
    let xdir = holder.x_per_mille();
    let ydir = holder.y_per_mille();
    let holder_speed = ((xdir * xdir + ydir * ydir) as f64).sqrt() as i64;
    let speed = throw_speed * multiplier + AIMED_SPEED_SHARE_PERCENT * holder_speed / 100;

    let carry = DVec2::new(
        (AIMED_CARRY_PERCENT * xdir / 100) as f64,
        (AIMED_CARRY_PERCENT * ydir / 100) as f64,
    );
    let release = carry + angle_direction(angle) * speed as f64;
    Velocity::from_per_mille(release.x, release.y)
}

/// Lob release: fixed speed along `angle` plus 60% of the holder's velocity.
/// Called by the throw animation at its release instant.
pub fn finish_lob(ctx: &mut SimContext<'_>, grenade: Entity, agent: Entity, angle: f64) {
    let angle = clamp_aim_angle(angle);
    let holder_velocity = velocity_of(ctx.world, agent);
    let holder_pos = position_of(ctx.world, agent);

    let user = launch(ctx, grenade, Some(agent));
    let release = lob_release(holder_velocity, angle);
    set_velocity(ctx.world, grenade, release);
    if let Some(pos) = holder_pos {
        set_position(ctx.world, grenade, pos.offset(0.0, LOB_RELEASE_OFFSET_Y));
    }

    ctx.attach(grenade, Box::new(RollingFriction::new()));

    let spin = sign(release.x) * LOB_SPIN;
    if let Ok(mut s) = ctx.world.get::<&mut Spin>(grenade) {
        s.rotation_speed = spin;
    }
    debug!(grenade = object_id(grenade).0, angle, "lobbed");
    emit_launched(ctx, grenade, user, LaunchPath::Lob);
}

/// Release vector of a lob.
pub fn lob_release(holder: Velocity, angle: f64) -> Velocity {
    let base = Velocity::along_angle(angle, LOB_SPEED);
    let carry = Velocity::from_per_mille(
        (LOB_CARRY_PERCENT * holder.x_per_mille() / 100) as f64,
        (LOB_CARRY_PERCENT * holder.y_per_mille() / 100) as f64,
    );
    Velocity::new(base.x + carry.x, base.y + carry.y)
}

/// Turn an agent toward the side of an aim angle.
pub fn face_toward(world: &mut World, agent: Entity, angle: f64) {
    if let Ok(mut a) = world.get::<&mut Agent>(agent) {
        a.facing = if angle >= 0.0 {
            Facing::Right
        } else {
            Facing::Left
        };
    }
}

fn sign(value: f64) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

fn velocity_of(world: &World, entity: Entity) -> Velocity {
    world
        .get::<&Velocity>(entity)
        .map(|v| *v)
        .unwrap_or_default()
}

fn position_of(world: &World, entity: Entity) -> Option<Position> {
    world.get::<&Position>(entity).ok().map(|p| *p)
}

fn set_velocity(world: &mut World, entity: Entity, velocity: Velocity) {
    if let Ok(mut v) = world.get::<&mut Velocity>(entity) {
        *v = velocity;
    }
}

fn set_position(world: &mut World, entity: Entity, position: Position) {
    if let Ok(mut p) = world.get::<&mut Position>(entity) {
        *p = position;
    }
}

fn emit_launched(
    ctx: &mut SimContext<'_>,
    grenade: Entity,
    user: Option<Entity>,
    path: LaunchPath,
) {
    let velocity = velocity_of(ctx.world, grenade);
    ctx.emit(GrenadeEvent::Launched {
        grenade: object_id(grenade),
        by: user.map(object_id),
        path,
        velocity,
    });
}
