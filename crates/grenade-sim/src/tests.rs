//! Tests for the scheduler, behaviors, launch math, movement and rolling friction.

use std::cell::RefCell;
use std::rc::Rc;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use grenade_core::config::ControlSettings;
use grenade_core::constants::*;
use grenade_core::enums::*;
use grenade_core::events::GrenadeEvent;
use grenade_core::types::{ObjectId, Position, Velocity};
use grenade_core::variant::GrenadeDefinition;

use crate::behavior::*;
use crate::context::{object_id, resolve, SimContext};
use crate::scheduler::{Process, ProcessStatus, Scheduler, StopReason};
use crate::systems::{fuse, launch, movement};
use crate::terrain::{FlatTerrain, OpenTerrain, Terrain};

// ---- Helpers ----

struct Harness {
    world: World,
    events: Vec<GrenadeEvent>,
    rng: ChaCha8Rng,
    variants: VariantRegistry,
    settings: ControlSettings,
    scheduler: Scheduler,
}

impl Harness {
    fn new() -> Self {
        Self {
            world: World::new(),
            events: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(7),
            variants: VariantRegistry::from_definitions(&[GrenadeDefinition::standard()]),
            settings: ControlSettings::default(),
            scheduler: Scheduler::new(),
        }
    }

    /// Run `f` with a context, then apply its requests.
    fn with<R>(&mut self, f: impl FnOnce(&mut SimContext<'_>) -> R) -> R {
        let mut ctx = SimContext::new(
            &mut self.world,
            &mut self.events,
            &mut self.rng,
            &self.variants,
            &self.settings,
            0,
        );
        let result = f(&mut ctx);
        self.scheduler.apply(&mut ctx);
        result
    }

    fn run(&mut self) {
        let mut ctx = SimContext::new(
            &mut self.world,
            &mut self.events,
            &mut self.rng,
            &self.variants,
            &self.settings,
            0,
        );
        self.scheduler.run(&mut ctx);
    }

    fn run_urgent(&mut self) {
        let mut ctx = SimContext::new(
            &mut self.world,
            &mut self.events,
            &mut self.rng,
            &self.variants,
            &self.settings,
            0,
        );
        self.scheduler.run_urgent(&mut ctx);
    }
}

type Log = Rc<RefCell<Vec<String>>>;

#[derive(Debug)]
struct Recorder {
    name: &'static str,
    kind: ProcessKind,
    priority: i32,
    finish_at: u32,
    log: Log,
}

impl Process for Recorder {
    fn kind(&self) -> ProcessKind {
        self.kind
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn start(&mut self, _owner: Entity, _ctx: &mut SimContext<'_>) {
        self.log.borrow_mut().push(format!("{}:start", self.name));
    }

    fn tick(&mut self, _owner: Entity, elapsed: u32, _ctx: &mut SimContext<'_>) -> ProcessStatus {
        self.log.borrow_mut().push(format!("{}:{}", self.name, elapsed));
        if elapsed >= self.finish_at {
            ProcessStatus::Finished
        } else {
            ProcessStatus::Continue
        }
    }

    fn preempts(&self, elapsed: u32) -> bool {
        elapsed >= self.finish_at
    }

    fn stop(&mut self, _owner: Entity, reason: StopReason, _ctx: &mut SimContext<'_>) {
        self.log
            .borrow_mut()
            .push(format!("{}:stop:{:?}", self.name, reason));
    }
}

fn recorder(name: &'static str, kind: ProcessKind, priority: i32, finish_at: u32, log: &Log) -> Box<dyn Process> {
    Box::new(Recorder {
        name,
        kind,
        priority,
        finish_at,
        log: Rc::clone(log),
    })
}

// ---- Scheduler ----

#[test]
fn test_scheduler_runs_by_priority() {
    let mut h = Harness::new();
    let owner = h.world.spawn((Position::default(),));
    let log: Log = Rc::default();

    h.with(|ctx| {
        ctx.attach(owner, recorder("low", ProcessKind::RollingFriction, 1, 10, &log));
        ctx.attach(owner, recorder("high", ProcessKind::Fuse, 200, 10, &log));
    });
    h.run();

    let entries = log.borrow();
    assert_eq!(
        entries.as_slice(),
        ["low:start", "high:start", "high:1", "low:1"]
    );
}

#[test]
fn test_scheduler_one_process_per_kind() {
    let mut h = Harness::new();
    let owner = h.world.spawn((Position::default(),));
    let log: Log = Rc::default();

    h.with(|ctx| {
        ctx.attach(owner, recorder("a", ProcessKind::Fuse, 1, 10, &log));
        ctx.attach(owner, recorder("b", ProcessKind::Fuse, 1, 10, &log));
    });
    assert_eq!(h.scheduler.len(), 1);
    assert!(h.scheduler.has(owner, ProcessKind::Fuse));
    assert!(!log.borrow().iter().any(|e| e.starts_with("b:")));
}

#[test]
fn test_scheduler_finished_process_stops_once() {
    let mut h = Harness::new();
    let owner = h.world.spawn((Position::default(),));
    let log: Log = Rc::default();

    h.with(|ctx| ctx.attach(owner, recorder("p", ProcessKind::Fuse, 1, 2, &log)));
    for _ in 0..4 {
        h.run();
    }

    let entries = log.borrow();
    assert_eq!(
        entries.as_slice(),
        ["p:start", "p:1", "p:2", "p:stop:Completed"]
    );
    assert!(h.scheduler.is_empty());
}

#[test]
fn test_scheduler_detach_calls_stop() {
    let mut h = Harness::new();
    let owner = h.world.spawn((Position::default(),));
    let log: Log = Rc::default();

    h.with(|ctx| ctx.attach(owner, recorder("p", ProcessKind::Fuse, 1, 100, &log)));
    h.run();
    h.with(|ctx| ctx.detach(owner, ProcessKind::Fuse));
    h.run();

    assert_eq!(log.borrow().last().map(String::as_str), Some("p:stop:Removed"));
    assert!(!h.scheduler.has(owner, ProcessKind::Fuse));
}

#[test]
fn test_scheduler_owner_gone() {
    let mut h = Harness::new();
    let owner = h.world.spawn((Position::default(),));
    let log: Log = Rc::default();

    h.with(|ctx| ctx.attach(owner, recorder("p", ProcessKind::Fuse, 1, 100, &log)));
    h.world.despawn(owner).unwrap();
    h.run();

    assert_eq!(
        log.borrow().as_slice(),
        ["p:start", "p:stop:OwnerGone"]
    );
}

#[test]
fn test_scheduler_elapsed_counts_evaluations() {
    let mut h = Harness::new();
    let owner = h.world.spawn((Position::default(),));
    let log: Log = Rc::default();

    h.with(|ctx| ctx.attach(owner, recorder("p", ProcessKind::Fuse, 1, 100, &log)));
    assert_eq!(h.scheduler.elapsed(owner, ProcessKind::Fuse), Some(0));
    h.run();
    h.run();
    h.run();
    assert_eq!(h.scheduler.elapsed(owner, ProcessKind::Fuse), Some(3));
}

#[test]
fn test_scheduler_urgent_evaluation_replaces_regular_one() {
    let mut h = Harness::new();
    let owner = h.world.spawn((Position::default(),));
    let log: Log = Rc::default();

    h.with(|ctx| ctx.attach(owner, recorder("p", ProcessKind::Fuse, 1, 3, &log)));
    h.run();
    h.run_urgent();
    h.run();
    assert_eq!(h.scheduler.elapsed(owner, ProcessKind::Fuse), Some(2));

    h.run_urgent();
    h.run();

    assert_eq!(
        log.borrow().as_slice(),
        ["p:start", "p:1", "p:2", "p:3", "p:stop:Completed"]
    );
    assert!(h.scheduler.is_empty());
}

// ---- Weak references ----

#[test]
fn test_object_id_resolution() {
    let mut world = World::new();
    let e = world.spawn((Position::default(),));
    let id = object_id(e);
    assert_eq!(resolve(&world, id), Some(e));
    world.despawn(e).unwrap();
    assert_eq!(resolve(&world, id), None);
    assert_eq!(resolve(&world, ObjectId(0)), None);
}

// ---- Behaviors ----

#[test]
fn test_standard_explosion() {
    let site = DetonationSite {
        grenade: ObjectId(1),
        position: Position::default(),
        controller: None,
    };
    let explosion = StandardGrenade.on_detonation(&site);
    assert!(explosion.silent);
    assert_eq!(explosion.tiers.len(), 1);
    assert_eq!(explosion.tiers[0].radius, 30);
    assert_eq!(explosion.tiers[0].damage, 60);
}

#[test]
fn test_field_explosion_tiers() {
    let site = DetonationSite {
        grenade: ObjectId(1),
        position: Position::default(),
        controller: None,
    };
    let explosion = FieldGrenade.on_detonation(&site);
    let tiers: Vec<(u32, u32)> = explosion.tiers.iter().map(|t| (t.radius, t.damage)).collect();
    assert_eq!(tiers, vec![(30, 110), (60, 80)]);
    assert!(explosion.silent);
}

#[test]
fn test_smoke_puff_scales_with_speed() {
    let slow = smoke_puff(&TrailSite {
        grenade: ObjectId(1),
        position: Position::new(10.0, 10.0),
        velocity: Velocity::new(6.0, 0.0),
        smoke_color: 0xffdd_0000,
    });
    let fast = smoke_puff(&TrailSite {
        grenade: ObjectId(1),
        position: Position::new(10.0, 10.0),
        velocity: Velocity::new(60.0, 300.0),
        smoke_color: 0xffdd_0000,
    });
    assert_eq!(slow.color.a, 111);
    assert_eq!(slow.color.r, 0xdd);
    assert_eq!(fast.color.a as u32, TRAIL_ALPHA_MAX);
    assert!(fast.size_end > slow.size_end);
    assert_eq!(slow.position, Position::new(9.0, 10.0));
}

#[test]
fn test_registry_replaces_by_name() {
    let mut registry = VariantRegistry::new();
    let a = registry.register(GrenadeDefinition::standard(), Box::new(StandardGrenade));
    let b = registry.register(GrenadeDefinition::field(), Box::new(FieldGrenade));
    assert_ne!(a, b);
    let again = registry.register(GrenadeDefinition::standard(), Box::new(FieldGrenade));
    assert_eq!(again, a);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.find("field"), Some(b));
    assert_eq!(registry.find("cluster"), None);
}

// ---- Launch math ----

#[test]
fn test_aimed_release_from_rest() {
    let v = launch::aimed_release(Velocity::default(), AGENT_THROW_SPEED, DEFAULT_THROW_SPEED_MULTIPLIER, 90.0);
    let expected = (AGENT_THROW_SPEED * DEFAULT_THROW_SPEED_MULTIPLIER) as f64 * VELOCITY_PRECISION / 1000.0;
    assert!((v.x - expected).abs() < 1e-9);
    assert!(v.y.abs() < 1e-9);
}

#[test]
fn test_aimed_release_carries_holder_velocity() {
    // Holder moving right at 10 speed units = 1000 per-mille.
    let holder = Velocity::new(10.0, 0.0);
    let v = launch::aimed_release(holder, 100, 1, 0.0);
    // speed = 100 + 60% of 1000 = 700 per-mille straight up,
    // plus 40% of 1000 to the right.
    assert!((v.x - 4.0).abs() < 1e-9);
    assert!((v.y + 7.0).abs() < 1e-9);
}

#[test]
fn test_lob_release_at_rest_is_exact() {
    let v = launch::lob_release(Velocity::default(), 0.0);
    assert_eq!(v, Velocity::new(0.0, -LOB_SPEED));
    assert_eq!(v.speed(), LOB_SPEED);
}

#[test]
fn test_lob_release_adds_holder_share() {
    let v = launch::lob_release(Velocity::new(10.0, 0.0), 0.0);
    assert!((v.x - 6.0).abs() < 1e-9);
    assert!((v.y + LOB_SPEED).abs() < 1e-9);
}

// ---- Fuse display ----

#[test]
fn test_fuse_progress_and_color() {
    assert_eq!(fuse::fuse_progress(0, 105), 0);
    assert_eq!(fuse::fuse_progress(105, 105), 1000);
    assert_eq!(fuse::fuse_progress(500, 105), 1000);
    assert_eq!(fuse::fuse_progress(21, 105), 200);
    let half = fuse::warning_color(500);
    assert_eq!((half.r, half.g, half.b), (255, 255, 0));
    let start = fuse::warning_color(0);
    assert_eq!((start.r, start.g, start.b), (0, 255, 0));
}

// ---- Movement ----

#[test]
fn test_floor_bounce_damps_vertical() {
    let terrain = FlatTerrain::new(100.0);
    let pos = Position::new(0.0, 99.0);
    let mut vel = Velocity::new(4.0, 52.0);
    let side = movement::bounce(&terrain, &pos, &mut vel);
    assert_eq!(side, Some(ContactSide::Below));
    assert_eq!(vel.y, -2.0);
    assert_eq!(vel.x, 4.0);
}

#[test]
fn test_wall_bounce_damps_horizontal() {
    let terrain = FlatTerrain::new(1000.0).with_walls(-100.0, 100.0);
    let pos = Position::new(99.0, 0.0);
    let mut vel = Velocity::new(32.0, 3.0);
    let side = movement::bounce(&terrain, &pos, &mut vel);
    assert_eq!(side, Some(ContactSide::Right));
    assert_eq!(vel.x, -2.0);
    assert_eq!(vel.y, 3.0);
}

#[test]
fn test_no_contact_no_bounce() {
    let mut vel = Velocity::new(3.0, 3.0);
    assert_eq!(movement::bounce(&OpenTerrain, &Position::default(), &mut vel), None);
    assert_eq!(vel, Velocity::new(3.0, 3.0));
}

#[test]
fn test_ground_friction_stops_at_zero() {
    let mut vel = Velocity::new(1.5, 0.0);
    movement::apply_ground_friction(&mut vel, 40.0);
    assert_eq!(vel.x, 0.0);
    let mut vel = Velocity::new(-5.0, 0.0);
    movement::apply_ground_friction(&mut vel, 40.0);
    assert_eq!(vel.x, -3.0);
}

#[test]
fn test_grenade_lands_on_ground() {
    let terrain = FlatTerrain::new(50.0);
    assert!(terrain.is_solid(0.0, 50.0));
    let mut world = World::new();
    let mut events = Vec::new();
    let g = crate::world_setup::spawn_grenade(
        &mut world,
        grenade_core::variant::VariantId(0),
        &GrenadeDefinition::standard(),
        Position::new(0.0, 0.0),
    );
    for _ in 0..100 {
        movement::run(&mut world, &terrain, &mut events);
    }
    let pos = *world.get::<&Position>(g).unwrap();
    assert!(pos.y < 50.0 && pos.y >= 49.0, "resting just above ground, got {}", pos.y);
    assert!(events
        .iter()
        .any(|e| matches!(e, GrenadeEvent::Bounce { side: ContactSide::Below, .. })));
}

#[test]
fn test_resting_grenade_does_not_bounce() {
    let terrain = FlatTerrain::new(50.0);
    let mut world = World::new();
    let mut events = Vec::new();
    let g = crate::world_setup::spawn_grenade(
        &mut world,
        grenade_core::variant::VariantId(0),
        &GrenadeDefinition::standard(),
        Position::new(0.0, 0.0),
    );
    for _ in 0..100 {
        movement::run(&mut world, &terrain, &mut events);
    }
    let landed = *world.get::<&Position>(g).unwrap();

    events.clear();
    for _ in 0..50 {
        movement::run(&mut world, &terrain, &mut events);
    }
    let bounces = events
        .iter()
        .filter(|e| matches!(e, GrenadeEvent::Bounce { .. }))
        .count();
    assert_eq!(bounces, 0);
    let pos = *world.get::<&Position>(g).unwrap();
    assert!((pos.y - landed.y).abs() < 1.0);
    assert!(pos.y < 50.0);
}

// ---- Rolling friction ----

#[test]
fn test_rolling_friction_restored_on_removal() {
    use grenade_core::components::ContactVertices;

    use crate::systems::rolling_friction::RollingFriction;

    let mut h = Harness::new();
    let g = h.world.spawn((ContactVertices {
        friction: vec![40, 40, 40, 40],
    },));

    h.with(|ctx| ctx.attach(g, Box::new(RollingFriction::new())));
    assert_eq!(h.world.get::<&ContactVertices>(g).unwrap().friction, vec![10; 4]);
    h.run();

    h.with(|ctx| ctx.detach(g, ProcessKind::RollingFriction));
    assert_eq!(h.world.get::<&ContactVertices>(g).unwrap().friction, vec![40; 4]);
}

#[test]
fn test_rolling_friction_not_stacked() {
    use grenade_core::components::ContactVertices;

    use crate::systems::rolling_friction::RollingFriction;

    let mut h = Harness::new();
    let g = h.world.spawn((ContactVertices {
        friction: vec![40, 40],
    },));

    h.with(|ctx| {
        ctx.attach(g, Box::new(RollingFriction::new()));
        ctx.attach(g, Box::new(RollingFriction::new()));
    });
    assert_eq!(h.world.get::<&ContactVertices>(g).unwrap().friction, vec![10, 10]);

    for _ in 0..ROLLING_FRICTION_TICKS {
        h.run();
    }
    assert_eq!(h.world.get::<&ContactVertices>(g).unwrap().friction, vec![40, 40]);
}
