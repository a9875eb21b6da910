//! Runtime configuration: per-player control settings and variant tables.
//!
//! Loaded from TOML once, before the simulation starts:
//!
//! ```toml
//! [controls]
//! default_mode = "hold"
//!
//! [[controls.overrides]]
//! controller = 2
//! mode = "toggle"
//!
//! [[variant]]
//! name = "field"
//! behavior = "field"
//! fuse_time = 105
//! throw_speed = 20
//! throw_delay = 20
//! max_damage = 10
//! contained_damage = 120
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::enums::InputMode;
use crate::error::ConfigError;
use crate::types::ControllerId;
use crate::variant::{GrenadeDefinition, RawDefinition};

/// Per-controller input mode lookup, handed to the grenade controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlSettings {
    pub default_mode: InputMode,
    pub per_controller: HashMap<ControllerId, InputMode>,
}

impl ControlSettings {
    pub fn mode_for(&self, controller: ControllerId) -> InputMode {
        self.per_controller
            .get(&controller)
            .copied()
            .unwrap_or(self.default_mode)
    }

    pub fn set_mode(&mut self, controller: ControllerId, mode: InputMode) {
        self.per_controller.insert(controller, mode);
    }
}

/// Complete loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    pub controls: ControlSettings,
    pub variants: Vec<GrenadeDefinition>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    controls: RawControls,
    #[serde(default)]
    variant: Vec<RawDefinition>,
}

#[derive(Debug, Default, Deserialize)]
struct RawControls {
    #[serde(default)]
    default_mode: InputMode,
    #[serde(default)]
    overrides: Vec<RawOverride>,
}

#[derive(Debug, Deserialize)]
struct RawOverride {
    controller: u32,
    mode: InputMode,
}

impl GameConfig {
    /// Parse and validate a configuration document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(source)?;

        let mut controls = ControlSettings {
            default_mode: raw.controls.default_mode,
            per_controller: HashMap::new(),
        };
        for entry in raw.controls.overrides {
            controls.set_mode(ControllerId(entry.controller), entry.mode);
        }

        let mut variants: Vec<GrenadeDefinition> = Vec::with_capacity(raw.variant.len());
        for table in raw.variant {
            let definition = table.validate()?;
            if variants.iter().any(|v| v.name == definition.name) {
                return Err(ConfigError::DuplicateVariant(definition.name));
            }
            variants.push(definition);
        }

        Ok(Self { controls, variants })
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Built-in configuration: hold controls, standard and field grenades.
    pub fn builtin() -> Self {
        Self {
            controls: ControlSettings::default(),
            variants: vec![GrenadeDefinition::standard(), GrenadeDefinition::field()],
        }
    }
}
