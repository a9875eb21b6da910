//! Simulation engine: owns the world and runs the grenade lifecycle.
//!
//! `SimulationEngine` owns the hecs ECS world, processes queued commands,
//! runs the process scheduler and systems, and produces `WorldSnapshot`s.
//! Completely headless, enabling deterministic testing.
//!
//! Tick order: expiring fuses, queued commands, processes, movement,
//! cooldowns, cleanup.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use grenade_core::commands::GrenadeCommand;
use grenade_core::components::{Agent, Grenade, Inventory, Vitals};
use grenade_core::config::{ControlSettings, GameConfig};
use grenade_core::enums::ProcessKind;
use grenade_core::events::GrenadeEvent;
use grenade_core::state::WorldSnapshot;
use grenade_core::types::{ControllerId, ObjectId, Position, SimTime, Velocity};
use grenade_core::variant::{GrenadeDefinition, VariantId};

use crate::behavior::{GrenadeBehavior, VariantRegistry};
use crate::context::{object_id, resolve, SimContext};
use crate::controller;
use crate::scheduler::Scheduler;
use crate::systems;
use crate::terrain::{FlatTerrain, OpenTerrain, Terrain};
use crate::world_setup;

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Height of flat ground. `None` leaves the world open.
    pub ground_y: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ground_y: None,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    scheduler: Scheduler,
    variants: VariantRegistry,
    settings: ControlSettings,
    terrain: Box<dyn Terrain>,
    command_queue: VecDeque<GrenadeCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<GrenadeEvent>,
}

impl SimulationEngine {
    /// Create an engine with the built-in variants and hold-mode controls.
    pub fn new(config: SimConfig) -> Self {
        Self::with_game_config(config, GameConfig::builtin())
    }

    /// Create an engine from loaded configuration. An empty variant table
    /// falls back to the built-in variants.
    pub fn with_game_config(config: SimConfig, game: GameConfig) -> Self {
        let definitions = if game.variants.is_empty() {
            GameConfig::builtin().variants
        } else {
            game.variants
        };
        let terrain: Box<dyn Terrain> = match config.ground_y {
            Some(ground_y) => Box::new(FlatTerrain::new(ground_y)),
            None => Box::new(OpenTerrain),
        };
        info!(
            seed = config.seed,
            variants = definitions.len(),
            "simulation engine created"
        );
        Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            scheduler: Scheduler::new(),
            variants: VariantRegistry::from_definitions(&definitions),
            settings: game.controls,
            terrain,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn set_terrain(&mut self, terrain: Box<dyn Terrain>) {
        self.terrain = terrain;
    }

    /// Register a variant with a custom behavior.
    pub fn register_variant(
        &mut self,
        definition: GrenadeDefinition,
        behavior: Box<dyn GrenadeBehavior>,
    ) -> VariantId {
        self.variants.register(definition, behavior)
    }

    pub fn variant_id(&self, name: &str) -> Option<VariantId> {
        self.variants.find(name)
    }

    pub fn variants(&self) -> &VariantRegistry {
        &self.variants
    }

    pub fn settings(&self) -> &ControlSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ControlSettings {
        &mut self.settings
    }

    // --- World setup ---

    pub fn spawn_agent(&mut self, controller: ControllerId, position: Position) -> ObjectId {
        object_id(world_setup::spawn_agent(&mut self.world, controller, position))
    }

    pub fn spawn_container(&mut self, position: Position, vitals: Option<Vitals>) -> ObjectId {
        object_id(world_setup::spawn_container(&mut self.world, position, vitals))
    }

    /// Spawn a free, idle grenade. `None` for an unknown variant.
    pub fn spawn_grenade(&mut self, variant: VariantId, position: Position) -> Option<ObjectId> {
        let definition = &self.variants.get(variant)?.definition;
        let entity = world_setup::spawn_grenade(&mut self.world, variant, definition, position);
        Some(object_id(entity))
    }

    /// Spawn a grenade straight into a container.
    pub fn give_grenade(&mut self, container: ObjectId, variant: VariantId) -> Option<ObjectId> {
        let holder = self.resolve(container)?;
        let position = self.position(container).unwrap_or_default();
        let grenade = self.spawn_grenade(variant, position)?;
        let entity = self.resolve(grenade)?;
        let entered = self.with_context(|ctx| systems::containment::enter(ctx, entity, holder));
        entered.then_some(grenade)
    }

    pub fn set_velocity(&mut self, id: ObjectId, velocity: Velocity) {
        if let Some(entity) = self.resolve(id) {
            if let Ok(mut v) = self.world.get::<&mut Velocity>(entity) {
                *v = velocity;
            }
        }
    }

    pub fn set_position(&mut self, id: ObjectId, position: Position) {
        if let Some(entity) = self.resolve(id) {
            if let Ok(mut p) = self.world.get::<&mut Position>(entity) {
                *p = position;
            }
        }
    }

    /// Remove any object from the world.
    pub fn remove_object(&mut self, id: ObjectId) {
        let Some(entity) = self.resolve(id) else {
            return;
        };
        let mut ctx = SimContext::new(
            &mut self.world,
            &mut self.events,
            &mut self.rng,
            &self.variants,
            &self.settings,
            self.time.tick,
        );
        systems::cleanup::remove_object(&mut ctx, &mut self.scheduler, entity);
    }

    // --- Direct control points ---

    pub fn arm(&mut self, grenade: ObjectId) {
        self.with_entity(grenade, controller::arm);
    }

    pub fn detonate(&mut self, grenade: ObjectId) {
        self.with_entity(grenade, systems::detonation::detonate);
    }

    pub fn damage(&mut self, grenade: ObjectId, amount: u32) {
        self.with_entity(grenade, |ctx, g| {
            systems::detonation::apply_damage(ctx, g, amount)
        });
    }

    /// Release without changing velocity.
    pub fn launch(&mut self, grenade: ObjectId, agent: Option<ObjectId>) {
        let agent = agent.and_then(|a| self.resolve(a));
        self.with_entity(grenade, |ctx, g| systems::launch::release(ctx, g, agent));
    }

    pub fn drop_grenade(&mut self, grenade: ObjectId, agent: Option<ObjectId>) {
        let agent = agent.and_then(|a| self.resolve(a));
        self.with_entity(grenade, |ctx, g| systems::launch::do_drop(ctx, g, agent));
    }

    pub fn finish_lob(&mut self, grenade: ObjectId, agent: ObjectId, angle: f64) {
        let Some(agent) = self.resolve(agent) else {
            return;
        };
        self.with_entity(grenade, |ctx, g| {
            systems::launch::finish_lob(ctx, g, agent, angle)
        });
    }

    // --- Tick ---

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: GrenadeCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = GrenadeCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> WorldSnapshot {
        self.run_urgent_processes();
        self.process_commands();
        self.run_systems();
        self.time.advance();

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            &self.variants,
            &self.scheduler,
            events,
        )
    }

    // --- Queries ---

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn resolve(&self, id: ObjectId) -> Option<Entity> {
        resolve(&self.world, id)
    }

    pub fn grenade(&self, id: ObjectId) -> Option<Grenade> {
        let entity = self.resolve(id)?;
        self.world.get::<&Grenade>(entity).ok().map(|g| (*g).clone())
    }

    pub fn agent(&self, id: ObjectId) -> Option<Agent> {
        let entity = self.resolve(id)?;
        self.world.get::<&Agent>(entity).ok().map(|a| (*a).clone())
    }

    pub fn vitals(&self, id: ObjectId) -> Option<Vitals> {
        let entity = self.resolve(id)?;
        self.world.get::<&Vitals>(entity).ok().map(|v| *v)
    }

    pub fn position(&self, id: ObjectId) -> Option<Position> {
        let entity = self.resolve(id)?;
        self.world.get::<&Position>(entity).ok().map(|p| *p)
    }

    pub fn velocity(&self, id: ObjectId) -> Option<Velocity> {
        let entity = self.resolve(id)?;
        self.world.get::<&Velocity>(entity).ok().map(|v| *v)
    }

    pub fn container_of(&self, id: ObjectId) -> Option<ObjectId> {
        let entity = self.resolve(id)?;
        systems::containment::container_of(&self.world, entity).map(object_id)
    }

    pub fn contents(&self, id: ObjectId) -> Vec<ObjectId> {
        self.resolve(id)
            .and_then(|e| self.world.get::<&Inventory>(e).ok().map(|inv| inv.contents.clone()))
            .unwrap_or_default()
    }

    pub fn has_process(&self, id: ObjectId, kind: ProcessKind) -> bool {
        self.resolve(id)
            .is_some_and(|e| self.scheduler.has(e, kind))
    }

    pub fn process_elapsed(&self, id: ObjectId, kind: ProcessKind) -> Option<u32> {
        let entity = self.resolve(id)?;
        self.scheduler.elapsed(entity, kind)
    }

    // --- Internals ---

    /// Run an operation with a fresh context, then apply the process
    /// requests it issued.
    fn with_context<R>(&mut self, f: impl FnOnce(&mut SimContext<'_>) -> R) -> R {
        let mut ctx = SimContext::new(
            &mut self.world,
            &mut self.events,
            &mut self.rng,
            &self.variants,
            &self.settings,
            self.time.tick,
        );
        let result = f(&mut ctx);
        self.scheduler.apply(&mut ctx);
        result
    }

    fn with_entity(&mut self, id: ObjectId, f: impl FnOnce(&mut SimContext<'_>, Entity)) {
        match self.resolve(id) {
            Some(entity) => self.with_context(|ctx| f(ctx, entity)),
            None => debug!(object = id.0, "reference no longer valid"),
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: GrenadeCommand) {
        match command {
            GrenadeCommand::Use {
                agent,
                input,
                target,
            } => {
                self.with_entity(agent, |ctx, a| {
                    controller::handle_use(ctx, a, input, target)
                });
            }
            GrenadeCommand::Collect { agent, grenade } => {
                let Some(grenade) = self.resolve(grenade) else {
                    return;
                };
                self.with_entity(agent, |ctx, a| {
                    systems::containment::collect(ctx, a, grenade);
                });
            }
            GrenadeCommand::SelectHandSlot { agent, slot } => {
                self.with_entity(agent, |ctx, a| {
                    if let Some(previous) = controller::hand_grenade(ctx.world, a) {
                        controller::toggle_aim(ctx, a, previous, 0.0, true);
                    }
                    if let Ok(mut inv) = ctx.world.get::<&mut Inventory>(a) {
                        inv.hand_slot = Some(slot);
                    }
                });
            }
            GrenadeCommand::Damage { grenade, amount } => self.damage(grenade, amount),
            GrenadeCommand::SetVitals {
                agent,
                alive,
                incapacitated,
            } => {
                self.with_entity(agent, |ctx, a| {
                    let disabled = {
                        let Ok(mut vitals) = ctx.world.get::<&mut Vitals>(a) else {
                            return;
                        };
                        vitals.alive = alive;
                        vitals.incapacitated = incapacitated;
                        vitals.is_disabled()
                    };
                    if disabled {
                        controller::on_agent_disabled(ctx, a);
                    }
                });
            }
            GrenadeCommand::SetProcedure { agent, procedure } => {
                self.with_entity(agent, |ctx, a| {
                    if let Ok(mut ag) = ctx.world.get::<&mut Agent>(a) {
                        ag.procedure = procedure;
                    }
                    controller::on_procedure_changed(ctx, a);
                });
            }
            GrenadeCommand::Arm { grenade } => self.arm(grenade),
            GrenadeCommand::Detonate { grenade } => self.detonate(grenade),
            GrenadeCommand::Launch { grenade, agent } => self.launch(grenade, agent),
            GrenadeCommand::Drop { grenade, agent } => self.drop_grenade(grenade, agent),
            GrenadeCommand::FinishLob {
                grenade,
                agent,
                angle,
            } => self.finish_lob(grenade, agent, angle),
        }
    }

    /// Evaluate processes that must act before this tick's commands
    /// (expiring fuses).
    fn run_urgent_processes(&mut self) {
        let mut ctx = SimContext::new(
            &mut self.world,
            &mut self.events,
            &mut self.rng,
            &self.variants,
            &self.settings,
            self.time.tick,
        );
        self.scheduler.run_urgent(&mut ctx);
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick = self.time.tick;
        let mut ctx = SimContext::new(
            &mut self.world,
            &mut self.events,
            &mut self.rng,
            &self.variants,
            &self.settings,
            tick,
        );
        // 1. Per-object processes (fuse first)
        self.scheduler.run(&mut ctx);
        // 2. Gravity, integration and terrain contact
        systems::movement::run(ctx.world, self.terrain.as_ref(), ctx.events);
        // 3. Cooldown expiry
        systems::cleanup::expire_cooldowns(ctx.world, tick);
        // 4. Detonated grenades
        systems::cleanup::run(&mut ctx, &mut self.scheduler, &mut self.despawn_buffer);
    }
}
