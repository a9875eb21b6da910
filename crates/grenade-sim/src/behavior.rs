//! Variant behaviors and the variant registry.
//!
//! Every grenade variant pairs a validated `GrenadeDefinition` with a
//! `GrenadeBehavior` strategy. The shared lifecycle calls the strategy for the
//! variant-specific parts: the explosion and the flight trail.

use tracing::debug;

use grenade_core::color::Rgba;
use grenade_core::constants::{TRAIL_ALPHA_BASE, TRAIL_ALPHA_MAX};
use grenade_core::enums::BehaviorKind;
use grenade_core::events::{BlastTier, Explosion, TrailPuff};
use grenade_core::types::{ControllerId, ObjectId, Position, Velocity};
use grenade_core::variant::{GrenadeDefinition, VariantId};

/// Where and for whom a grenade goes off.
#[derive(Debug, Clone, Copy)]
pub struct DetonationSite {
    pub grenade: ObjectId,
    pub position: Position,
    pub controller: Option<ControllerId>,
}

/// Flight state used to shape the trail.
#[derive(Debug, Clone, Copy)]
pub struct TrailSite {
    pub grenade: ObjectId,
    pub position: Position,
    pub velocity: Velocity,
    pub smoke_color: u32,
}

/// Variant-specific hooks of the grenade lifecycle.
pub trait GrenadeBehavior: Send + Sync {
    /// Explosion to produce when the grenade goes off.
    fn on_detonation(&self, site: &DetonationSite) -> Explosion;

    /// Trail particle for one tick of free flight.
    fn handle_trail(&self, site: &TrailSite) -> Option<TrailPuff> {
        Some(smoke_puff(site))
    }
}

/// Single blast of radius 30 dealing 60, without the default sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardGrenade;

impl GrenadeBehavior for StandardGrenade {
    fn on_detonation(&self, _site: &DetonationSite) -> Explosion {
        Explosion {
            tiers: vec![BlastTier {
                radius: 30,
                damage: 60,
            }],
            silent: true,
        }
    }
}

/// Two-tier blast: 110 within 30, 80 within 60.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldGrenade;

impl GrenadeBehavior for FieldGrenade {
    fn on_detonation(&self, _site: &DetonationSite) -> Explosion {
        Explosion {
            tiers: vec![
                BlastTier {
                    radius: 30,
                    damage: 110,
                },
                BlastTier {
                    radius: 60,
                    damage: 80,
                },
            ],
            silent: true,
        }
    }
}

/// Smoke puff behind a flying grenade. Faster grenades leave denser,
/// larger and longer-lived smoke.
pub fn smoke_puff(site: &TrailSite) -> TrailPuff {
    let speed = site.velocity.x.abs() + site.velocity.y.abs();
    let alpha = (TRAIL_ALPHA_BASE + speed as u32).min(TRAIL_ALPHA_MAX);
    let lifetime_base = speed / 3.0;

    let mut color = Rgba::from_argb(site.smoke_color);
    color.a = alpha as u8;

    TrailPuff {
        position: site
            .position
            .offset(-site.velocity.x / 6.0, -site.velocity.y / 6.0),
        velocity: Velocity::new(0.0, -5.0),
        lifetime_ticks: 15,
        size_start: (lifetime_base + 20.0) / 10.0,
        size_end: (lifetime_base + 60.0) / 10.0,
        color,
    }
}

/// Behavior for a built-in kind.
pub fn builtin_behavior(kind: BehaviorKind) -> Box<dyn GrenadeBehavior> {
    match kind {
        BehaviorKind::Standard => Box::new(StandardGrenade),
        BehaviorKind::Field => Box::new(FieldGrenade),
    }
}

/// A registered variant.
pub struct Variant {
    pub definition: GrenadeDefinition,
    pub behavior: Box<dyn GrenadeBehavior>,
}

/// All variants known to an engine, indexed by `VariantId`.
#[derive(Default)]
pub struct VariantRegistry {
    variants: Vec<Variant>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with built-in behaviors for each definition.
    pub fn from_definitions(definitions: &[GrenadeDefinition]) -> Self {
        let mut registry = Self::new();
        for definition in definitions {
            let behavior = builtin_behavior(definition.behavior);
            registry.register(definition.clone(), behavior);
        }
        registry
    }

    /// Add a variant. A variant with the same name is replaced and keeps its id.
    pub fn register(
        &mut self,
        definition: GrenadeDefinition,
        behavior: Box<dyn GrenadeBehavior>,
    ) -> VariantId {
        if let Some(id) = self.find(&definition.name) {
            debug!(name = %definition.name, "replacing variant");
            self.variants[id.0 as usize] = Variant {
                definition,
                behavior,
            };
            return id;
        }
        let id = VariantId(self.variants.len() as u16);
        debug!(name = %definition.name, id = id.0, "registering variant");
        self.variants.push(Variant {
            definition,
            behavior,
        });
        id
    }

    pub fn get(&self, id: VariantId) -> Option<&Variant> {
        self.variants.get(id.0 as usize)
    }

    pub fn find(&self, name: &str) -> Option<VariantId> {
        self.variants
            .iter()
            .position(|v| v.definition.name == name)
            .map(|i| VariantId(i as u16))
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
