//! Grenade state controller: arming, aiming and launch dispatch.
//!
//! Interprets an agent's use input according to the controller's input mode:
//!
//! | input      | hold mode                | toggle mode                    |
//! |------------|--------------------------|--------------------------------|
//! | Start      | arm                      | launch if armed, else arm      |
//! | Holding    | move the aim             |                                |
//! | Stop       | launch                   |                                |
//! | Cancel     | drop if armed            |                                |
//! | AltStart   | toggle aiming            | toggle aiming                  |
//! | AltCancel  | stop aiming              | stop aiming                    |
//! | AimMove    |                          | move the aim, cancel if unable |

use hecs::{Entity, World};
use tracing::debug;

use grenade_core::commands::UseInput;
use grenade_core::components::{Agent, AimPose, Grenade, Inventory, Vitals};
use grenade_core::enums::{AnimationCue, InputMode, ObjectCategory};
use grenade_core::events::GrenadeEvent;
use grenade_core::types::{aim_angle_from_offset, clamp_aim_angle, Position};

use crate::context::{object_id, SimContext};
use crate::systems::fuse::FuseProcess;
use crate::systems::{containment, launch, throw_animation};

/// Whether an agent is free to act with its hands right now.
pub fn can_perform_hand_action(world: &World, agent: Entity) -> bool {
    let Ok(a) = world.get::<&Agent>(agent) else {
        return false;
    };
    let able = world
        .get::<&Vitals>(agent)
        .map(|v| !v.is_disabled())
        .unwrap_or(false);
    able && !a.hand_occupied && a.procedure.allows_hand_action()
}

/// Use input is refused while the agent cannot act with its hands.
pub fn reject_use(world: &World, agent: Entity) -> bool {
    !can_perform_hand_action(world, agent)
}

/// The grenade in an agent's hand, if its hand item is one.
pub fn hand_grenade(world: &World, agent: Entity) -> Option<Entity> {
    containment::primary_item(world, agent).filter(|&item| world.get::<&Grenade>(item).is_ok())
}

/// Start the fuse. No effect on an armed or detonated grenade.
pub fn arm(ctx: &mut SimContext<'_>, grenade: Entity) {
    let fuse_time = {
        let Some(variant) = ctx.variant_of(grenade) else {
            return;
        };
        variant.definition.fuse_time
    };
    {
        let Ok(mut g) = ctx.world.get::<&mut Grenade>(grenade) else {
            return;
        };
        if g.armed || g.detonated {
            return;
        }
        g.armed = true;
        g.collectible = false;
        g.category = ObjectCategory::Vehicle;
    }
    debug!(grenade = object_id(grenade).0, fuse_time, "armed");
    ctx.attach(grenade, Box::new(FuseProcess::new(fuse_time)));
    ctx.emit(GrenadeEvent::Armed {
        grenade: object_id(grenade),
    });
}

/// Route one use input of `agent` to its hand grenade.
pub fn handle_use(ctx: &mut SimContext<'_>, agent: Entity, input: UseInput, target: Position) {
    let Some(grenade) = hand_grenade(ctx.world, agent) else {
        return;
    };
    let gated = matches!(
        input,
        UseInput::Start | UseInput::Holding | UseInput::Stop | UseInput::AltStart
    );
    if gated && reject_use(ctx.world, agent) {
        debug!(agent = object_id(agent).0, ?input, "use rejected");
        return;
    }

    let Some(controller) = ctx.world.get::<&Agent>(agent).ok().map(|a| a.controller) else {
        return;
    };
    let mode = ctx.settings.mode_for(controller);
    let angle = aim_angle_from_offset(target.x, target.y);
    let (armed, aiming) = grenade_flags(ctx.world, grenade);

    match (input, mode) {
        (UseInput::Start, InputMode::Hold) => arm(ctx, grenade),
        (UseInput::Start, InputMode::Toggle) => {
            if armed {
                launch_from_hand(ctx, agent, grenade, angle);
            } else {
                arm(ctx, grenade);
            }
        }
        (UseInput::Holding, InputMode::Hold) => {
            if aiming {
                set_aim_angle(ctx, agent, angle);
            }
        }
        (UseInput::Stop, InputMode::Hold) => launch_from_hand(ctx, agent, grenade, angle),
        (UseInput::Cancel, InputMode::Hold) => {
            if armed {
                launch::do_drop(ctx, grenade, Some(agent));
            }
        }
        (UseInput::AltStart, _) => toggle_aim(ctx, agent, grenade, angle, false),
        (UseInput::AltCancel, _) => toggle_aim(ctx, agent, grenade, angle, true),
        (UseInput::AimMove, InputMode::Toggle) => {
            if aiming {
                set_aim_angle(ctx, agent, angle);
                if !can_perform_hand_action(ctx.world, agent) {
                    cancel_aim(ctx, agent, grenade);
                }
            }
        }
        _ => {}
    }
}

/// Launch the hand grenade: aimed throw while aiming, lob otherwise.
/// Refused while the agent's throw cooldown runs.
pub fn launch_from_hand(ctx: &mut SimContext<'_>, agent: Entity, grenade: Entity, angle: f64) {
    if launch::is_throw_blocked(ctx.world, agent, ctx.tick) {
        debug!(agent = object_id(agent).0, "throw blocked by cooldown");
        return;
    }
    let (_, aiming) = grenade_flags(ctx.world, grenade);
    if aiming {
        let angle = ctx
            .world
            .get::<&AimPose>(agent)
            .map(|p| p.angle)
            .unwrap_or(angle);
        stop_aim(ctx, agent);
        launch::do_throw(ctx, grenade, agent, angle);
    } else {
        throw_animation::start_lob(ctx, agent, grenade, angle);
    }
}

/// Switch aiming on, or off if it is on. `ensure_off` only ever switches off.
pub fn toggle_aim(
    ctx: &mut SimContext<'_>,
    agent: Entity,
    grenade: Entity,
    angle: f64,
    ensure_off: bool,
) {
    let (_, aiming) = grenade_flags(ctx.world, grenade);
    if aiming {
        set_grenade_aiming(ctx.world, grenade, false);
        stop_aim(ctx, agent);
    } else if !ensure_off {
        set_grenade_aiming(ctx.world, grenade, true);
        start_aim(ctx, agent, angle);
    }
}

/// Abort aiming: drop the grenade if armed, then force aiming off.
pub fn cancel_aim(ctx: &mut SimContext<'_>, agent: Entity, grenade: Entity) {
    let (armed, _) = grenade_flags(ctx.world, grenade);
    if armed && containment::is_inside(ctx.world, grenade, agent) {
        launch::do_drop(ctx, grenade, Some(agent));
    }
    set_grenade_aiming(ctx.world, grenade, false);
    stop_aim(ctx, agent);
}

/// Called when an agent becomes dead or incapacitated: armed grenades it
/// carries fall out and aiming stops.
pub fn on_agent_disabled(ctx: &mut SimContext<'_>, agent: Entity) {
    let carried: Vec<Entity> = ctx
        .world
        .get::<&Inventory>(agent)
        .map(|inv| inv.contents.clone())
        .unwrap_or_default()
        .into_iter()
        .filter_map(|id| ctx.resolve(id))
        .collect();
    for grenade in carried {
        let (armed, aiming) = grenade_flags(ctx.world, grenade);
        if aiming {
            cancel_aim(ctx, agent, grenade);
        } else if armed {
            launch::do_drop(ctx, grenade, Some(agent));
        }
    }
}

/// Called when an agent's action procedure changes: aiming ends if the new
/// procedure keeps the hands busy.
pub fn on_procedure_changed(ctx: &mut SimContext<'_>, agent: Entity) {
    if can_perform_hand_action(ctx.world, agent) {
        return;
    }
    if let Some(grenade) = hand_grenade(ctx.world, agent) {
        let (_, aiming) = grenade_flags(ctx.world, grenade);
        if aiming {
            cancel_aim(ctx, agent, grenade);
        }
    }
}

fn grenade_flags(world: &World, grenade: Entity) -> (bool, bool) {
    world
        .get::<&Grenade>(grenade)
        .map(|g| (g.armed && !g.detonated, g.aiming))
        .unwrap_or((false, false))
}

fn set_grenade_aiming(world: &mut World, grenade: Entity, aiming: bool) {
    if let Ok(mut g) = world.get::<&mut Grenade>(grenade) {
        g.aiming = aiming;
    }
}

fn set_aim_angle(ctx: &mut SimContext<'_>, agent: Entity, angle: f64) {
    if let Ok(mut pose) = ctx.world.get::<&mut AimPose>(agent) {
        pose.angle = clamp_aim_angle(angle);
    }
}

fn start_aim(ctx: &mut SimContext<'_>, agent: Entity, angle: f64) {
    let angle = clamp_aim_angle(angle);
    let started = {
        let Ok(mut pose) = ctx.world.get::<&mut AimPose>(agent) else {
            return;
        };
        let started = !pose.active;
        pose.active = true;
        pose.angle = angle;
        started
    };
    launch::face_toward(ctx.world, agent, angle);
    if started {
        ctx.emit(GrenadeEvent::Animation {
            agent: object_id(agent),
            cue: AnimationCue::AimStart { angle },
        });
    }
    set_aiming_cursor(ctx, agent, true);
}

fn stop_aim(ctx: &mut SimContext<'_>, agent: Entity) {
    let stopped = ctx
        .world
        .get::<&mut AimPose>(agent)
        .map(|mut pose| std::mem::replace(&mut pose.active, false))
        .unwrap_or(false);
    if stopped {
        ctx.emit(GrenadeEvent::Animation {
            agent: object_id(agent),
            cue: AnimationCue::AimStop,
        });
    }
    set_aiming_cursor(ctx, agent, false);
}

/// The on-screen aiming cursor only exists in toggle mode.
fn set_aiming_cursor(ctx: &mut SimContext<'_>, agent: Entity, enabled: bool) {
    let Some(controller) = ctx.world.get::<&Agent>(agent).ok().map(|a| a.controller) else {
        return;
    };
    if ctx.settings.mode_for(controller) == InputMode::Toggle {
        ctx.emit(GrenadeEvent::AimingCursor {
            controller,
            enabled,
        });
    }
}
