#[cfg(test)]
mod tests {
    use crate::color::{ramp, Rgba};
    use crate::components::{Grenade, Inventory, ThrowCooldown, Vitals};
    use crate::config::GameConfig;
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::events::GrenadeEvent;
    use crate::types::*;
    use crate::variant::{GrenadeDefinition, VariantId};

    // ---- Angles ----

    #[test]
    fn test_requested_angles_clamped() {
        assert_eq!(clamp_aim_angle(200.0), 160.0);
        assert_eq!(clamp_aim_angle(-200.0), -160.0);
        assert_eq!(clamp_aim_angle(45.0), 45.0);
    }

    #[test]
    fn test_aim_angle_from_cursor_offset() {
        assert!((aim_angle_from_offset(0.0, -10.0)).abs() < 1e-9, "straight up is 0");
        assert!((aim_angle_from_offset(10.0, 0.0) - 90.0).abs() < 1e-9);
        assert!((aim_angle_from_offset(-10.0, 0.0) + 90.0).abs() < 1e-9);
        // Straight down normalizes to -180 and is clamped.
        assert_eq!(aim_angle_from_offset(0.0, 10.0), -AIM_ANGLE_LIMIT);
    }

    #[test]
    fn test_velocity_along_angle() {
        let up = Velocity::along_angle(0.0, LOB_SPEED);
        assert_eq!(up.x, 0.0);
        assert_eq!(up.y, -LOB_SPEED);
        let right = Velocity::along_angle(90.0, 10.0);
        assert!((right.x - 10.0).abs() < 1e-9);
        assert!(right.y.abs() < 1e-9);
    }

    #[test]
    fn test_per_mille_truncates() {
        let v = Velocity::new(2.5, -1.25);
        assert_eq!(v.x_per_mille(), 250);
        assert_eq!(v.y_per_mille(), -125);
        assert_eq!(Velocity::new(0.0155, 0.0).x_per_mille(), 1);
        assert_eq!(Velocity::from_per_mille(250.0, -125.0), v);
    }

    // ---- Colors ----

    #[test]
    fn test_warning_ramp_stops() {
        let stops = [
            (0, Rgba::from_argb(WARNING_COLOR_START)),
            (500, Rgba::from_argb(WARNING_COLOR_MID)),
            (1000, Rgba::from_argb(WARNING_COLOR_END)),
        ];
        assert_eq!(ramp(0, &stops), Rgba::new(0, 255, 0, 255));
        assert_eq!(ramp(500, &stops), Rgba::new(255, 255, 0, 255));
        assert_eq!(ramp(1000, &stops), Rgba::new(255, 0, 0, 255));
        assert_eq!(ramp(250, &stops), Rgba::new(127, 255, 0, 255));
        assert_eq!(ramp(750, &stops), Rgba::new(255, 127, 0, 255));
        // Outside the ramp takes the end colors.
        assert_eq!(ramp(-5, &stops), Rgba::new(0, 255, 0, 255));
        assert_eq!(ramp(5000, &stops), Rgba::new(255, 0, 0, 255));
    }

    #[test]
    fn test_argb_packing() {
        let c = Rgba::from_argb(0xffdd_0000);
        assert_eq!(c, Rgba::new(0xdd, 0, 0, 0xff));
        assert_eq!(c.to_argb(), 0xffdd_0000);
    }

    // ---- Components ----

    #[test]
    fn test_grenade_state_derivation() {
        let mut g = Grenade::new(VariantId(0));
        assert_eq!(g.state(), GrenadeState::Idle);
        assert!(g.collectible);
        g.armed = true;
        assert_eq!(g.state(), GrenadeState::Armed);
        g.detonated = true;
        assert_eq!(g.state(), GrenadeState::Detonated);
    }

    #[test]
    fn test_inventory_primary_item() {
        let mut inv = Inventory {
            contents: vec![ObjectId(7), ObjectId(9)],
            hand_slot: None,
        };
        assert_eq!(inv.primary(), Some(ObjectId(7)));
        inv.hand_slot = Some(1);
        assert_eq!(inv.primary(), Some(ObjectId(9)));
        inv.hand_slot = Some(5);
        assert_eq!(inv.primary(), None);
    }

    #[test]
    fn test_cooldown_expiry() {
        let cd = ThrowCooldown { expires_at_tick: 20 };
        assert!(cd.is_active(19));
        assert!(!cd.is_active(20));
    }

    #[test]
    fn test_vitals_disabled() {
        let mut v = Vitals::default();
        assert!(!v.is_disabled());
        v.incapacitated = true;
        assert!(v.is_disabled());
    }

    #[test]
    fn test_hand_action_procedures() {
        assert!(ActionProcedure::Walk.allows_hand_action());
        assert!(!ActionProcedure::Tumble.allows_hand_action());
        assert!(!ActionProcedure::Hangle.allows_hand_action());
    }

    // ---- Configuration ----

    #[test]
    fn test_config_parse_full() {
        let source = r#"
            [controls]
            default_mode = "toggle"

            [[controls.overrides]]
            controller = 3
            mode = "hold"

            [[variant]]
            name = "field"
            behavior = "field"
            fuse_time = 90
            throw_speed = 22
            throw_delay = 15
            max_damage = 12
            contained_damage = 120
            smoke_color = 4292673536
        "#;
        let config = GameConfig::from_toml_str(source).unwrap();
        assert_eq!(config.controls.mode_for(ControllerId(1)), InputMode::Toggle);
        assert_eq!(config.controls.mode_for(ControllerId(3)), InputMode::Hold);
        assert_eq!(config.variants.len(), 1);
        let field = &config.variants[0];
        assert_eq!(field.behavior, BehaviorKind::Field);
        assert_eq!(field.fuse_time, 90);
        assert_eq!(field.max_damage, Some(12));
        assert_eq!(field.smoke_color, 0xffdd_0000);
        assert_eq!(field.vertex_friction, DEFAULT_VERTEX_FRICTION.to_vec());
    }

    #[test]
    fn test_config_missing_tunable() {
        let source = r#"
            [[variant]]
            name = "broken"
            throw_speed = 20
            throw_delay = 20
            contained_damage = 60
        "#;
        match GameConfig::from_toml_str(source) {
            Err(ConfigError::MissingTunable { variant, field }) => {
                assert_eq!(variant, "broken");
                assert_eq!(field, "fuse_time");
            }
            other => panic!("expected missing tunable, got {other:?}"),
        }
    }

    #[test]
    fn test_config_invalid_fuse_time() {
        let source = r#"
            [[variant]]
            name = "instant"
            fuse_time = 0
            throw_speed = 20
            throw_delay = 20
            contained_damage = 60
        "#;
        assert!(matches!(
            GameConfig::from_toml_str(source),
            Err(ConfigError::InvalidTunable { field: "fuse_time", .. })
        ));
    }

    #[test]
    fn test_config_duplicate_variant() {
        let table = r#"
            [[variant]]
            name = "twin"
            fuse_time = 105
            throw_speed = 20
            throw_delay = 20
            contained_damage = 60
        "#;
        let source = format!("{table}\n{table}");
        assert!(matches!(
            GameConfig::from_toml_str(&source),
            Err(ConfigError::DuplicateVariant(name)) if name == "twin"
        ));
    }

    #[test]
    fn test_config_unknown_behavior_is_parse_error() {
        let source = r#"
            [[variant]]
            name = "odd"
            behavior = "cluster"
            fuse_time = 105
            throw_speed = 20
            throw_delay = 20
            contained_damage = 60
        "#;
        assert!(matches!(
            GameConfig::from_toml_str(source),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_builtin_definitions() {
        let config = GameConfig::builtin();
        assert_eq!(config.controls.mode_for(ControllerId(0)), InputMode::Hold);
        let standard = GrenadeDefinition::standard();
        let field = GrenadeDefinition::field();
        assert_eq!(standard.fuse_time, 105);
        assert_eq!(standard.contained_damage, 60);
        assert_eq!(field.contained_damage, 120);
        assert_eq!(field.fuse_time, standard.fuse_time);
    }

    #[test]
    fn test_event_serde_tagged() {
        let event = GrenadeEvent::Armed {
            grenade: ObjectId(42),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Armed\""));
        let back: GrenadeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
