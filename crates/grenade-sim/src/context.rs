//! Per-phase access to the mutable simulation state.
//!
//! Systems, processes and controller operations all receive a `SimContext`.
//! Process attach/detach requests are buffered here and applied by the
//! scheduler between process evaluations.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use grenade_core::components::Grenade;
use grenade_core::config::ControlSettings;
use grenade_core::enums::ProcessKind;
use grenade_core::events::GrenadeEvent;
use grenade_core::types::ObjectId;

use crate::behavior::{Variant, VariantRegistry};
use crate::scheduler::{Process, ProcessRequest};

/// Weak id for an entity.
pub fn object_id(entity: Entity) -> ObjectId {
    ObjectId(entity.to_bits().get())
}

/// Resolve a weak id, checking that the entity is still alive.
pub fn resolve(world: &World, id: ObjectId) -> Option<Entity> {
    let entity = Entity::from_bits(id.0)?;
    world.contains(entity).then_some(entity)
}

pub struct SimContext<'a> {
    pub world: &'a mut World,
    pub events: &'a mut Vec<GrenadeEvent>,
    pub rng: &'a mut ChaCha8Rng,
    pub variants: &'a VariantRegistry,
    pub settings: &'a ControlSettings,
    /// Tick being simulated.
    pub tick: u64,
    requests: Vec<ProcessRequest>,
}

impl<'a> SimContext<'a> {
    pub fn new(
        world: &'a mut World,
        events: &'a mut Vec<GrenadeEvent>,
        rng: &'a mut ChaCha8Rng,
        variants: &'a VariantRegistry,
        settings: &'a ControlSettings,
        tick: u64,
    ) -> Self {
        Self {
            world,
            events,
            rng,
            variants,
            settings,
            tick,
            requests: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: GrenadeEvent) {
        self.events.push(event);
    }

    /// Request a process to be attached to `owner`. Ignored if the owner
    /// already runs a process of the same kind.
    pub fn attach(&mut self, owner: Entity, process: Box<dyn Process>) {
        self.requests.push(ProcessRequest::Attach { owner, process });
    }

    /// Request removal of `owner`'s process of the given kind.
    pub fn detach(&mut self, owner: Entity, kind: ProcessKind) {
        self.requests.push(ProcessRequest::Detach { owner, kind });
    }

    /// Request removal of every process owned by `owner`.
    pub fn detach_all(&mut self, owner: Entity) {
        self.requests.push(ProcessRequest::DetachAll { owner });
    }

    pub(crate) fn take_requests(&mut self) -> Vec<ProcessRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Variant of a live grenade.
    pub fn variant_of(&self, grenade: Entity) -> Option<&'a Variant> {
        let registry: &'a VariantRegistry = self.variants;
        let id = self.world.get::<&Grenade>(grenade).ok()?.variant;
        registry.get(id)
    }

    pub fn resolve(&self, id: ObjectId) -> Option<Entity> {
        resolve(self.world, id)
    }
}
