//! Tunables for the whole game, optionally overridden by `game.json`.
//!
//! Every section may be left out of the file and falls back to its default,
//! but a section that is present has to be complete.
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    /// directory (url) the PNG assets are served from
    pub asset_root: String,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub platform: PlatformConfig,
    pub hazard: SpawnConfig,
    pub pickup: SpawnConfig,
    pub health_bar: HealthBarConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PhysicsConfig {
    /// added to vertical speed every tick
    pub gravity: f32,
    /// negative because top left is origin
    pub jump_strength: f32,
    /// horizontal position delta per tick while a direction key is held
    pub walk_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// square source frame size in pixels
    pub sprite_size: f32,
    pub scale: f32,
    pub max_hp: i32,
    /// ticks per animation frame
    pub frame_speed: u32,
    /// rendered height while docking, as a fraction of the full height
    pub dock_height_ratio: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlatformConfig {
    pub width: f32,
    pub height: f32,
    /// gap between the platform and the bottom of the viewport
    pub bottom_margin: f32,
}

/// Shared by hazards and pickups
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpawnConfig {
    pub size: f32,
    /// distance per tick
    pub speed: f32,
    pub interval_ms: f64,
    /// damage for hazards, healing for pickups
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthBarConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            asset_root: "assets".to_string(),
            physics: PhysicsConfig {
                gravity: 0.5,
                jump_strength: -12.0,
                walk_speed: 5.0,
            },
            player: PlayerConfig {
                sprite_size: 256.0,
                scale: 0.5,
                max_hp: 100,
                frame_speed: 8,
                dock_height_ratio: 0.6,
            },
            platform: PlatformConfig {
                width: 550.0,
                height: 400.0,
                bottom_margin: 50.0,
            },
            hazard: SpawnConfig {
                size: 32.0,
                speed: 5.0,
                interval_ms: 1000.0,
                amount: 10,
            },
            pickup: SpawnConfig {
                size: 32.0,
                speed: 3.0,
                interval_ms: 3000.0,
                amount: 20,
            },
            health_bar: HealthBarConfig {
                width: 200.0,
                height: 20.0,
                padding: 20.0,
            },
        }
    }
}

impl GameConfig {
    /// Rejects values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        for (name, spawn) in [("hazard", &self.hazard), ("pickup", &self.pickup)] {
            // a zero interval would spawn forever inside one tick
            if !(spawn.interval_ms > 0.0) {
                return Err(anyhow!("{}.interval_ms must be positive, got {}", name, spawn.interval_ms));
            }
            if !(spawn.size > 0.0) {
                return Err(anyhow!("{}.size must be positive, got {}", name, spawn.size));
            }
        }
        if self.player.max_hp <= 0 {
            return Err(anyhow!("player.max_hp must be positive, got {}", self.player.max_hp));
        }
        if self.player.frame_speed == 0 {
            return Err(anyhow!("player.frame_speed must be at least 1"));
        }
        Ok(())
    }

    pub fn player_size(&self) -> f32 {
        self.player.sprite_size * self.player.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.player_size(), 128.0);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: GameConfig = serde_json::from_str(
            r#"{ "hazard": { "size": 16.0, "speed": 8.0, "interval_ms": 500.0, "amount": 25 } }"#,
        )
        .unwrap();

        assert_eq!(config.hazard.amount, 25);
        assert_relative_eq!(config.hazard.speed, 8.0);
        assert_eq!(config.pickup, GameConfig::default().pickup);
        assert_eq!(config.asset_root, "assets");
    }

    #[test]
    fn incomplete_section_is_rejected() {
        let parsed = serde_json::from_str::<GameConfig>(r#"{ "physics": { "gravity": 1.0 } }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn zero_interval_fails_validation() {
        let mut config = GameConfig::default();
        config.pickup.interval_ms = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pickup.interval_ms"));
    }

    #[test]
    fn zero_frame_speed_fails_validation() {
        let mut config = GameConfig::default();
        config.player.frame_speed = 0;
        assert!(config.validate().is_err());
    }
}
