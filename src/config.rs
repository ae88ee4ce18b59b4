//! Arena tunables
//!
//! Everything here is fixed at setup time; the rule engine never mutates it.
//! Loadable from JSON so a driver can ship balance tweaks without a rebuild.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Where freshly spawned (and ground-respawned) disks appear on the Z axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnHeight {
    /// Fixed offset above the arena origin's Z
    FixedOffset(f32),
    /// Offset above the player's current height (falls back to the arena
    /// origin when no player height is known yet)
    AbovePlayer(f32),
}

impl Default for SpawnHeight {
    fn default() -> Self {
        SpawnHeight::FixedOffset(SPAWN_HEIGHT_OFFSET)
    }
}

/// Prototype parameters stamped onto every disk at spawn.
///
/// Spawning is skipped entirely when the arena has no template configured,
/// mirroring an unassigned disk prototype in the editor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiskTemplate {
    /// Force magnitude reported when a falling disk lands on an airborne player
    pub knockback_force: f32,
}

impl Default for DiskTemplate {
    fn default() -> Self {
        Self {
            knockback_force: KNOCKBACK_FORCE,
        }
    }
}

/// Arena configuration (grid shape, speed range, rule thresholds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Grid shape
    pub columns: u32,
    pub rows: u32,
    /// Width and depth of each grid cell (world units)
    pub cell_size: f32,
    /// World position the grid is centered on (X/Y); Z is the spawn baseline
    pub origin: glam::Vec3,
    /// Z placement rule for spawned disks
    #[serde(default)]
    pub spawn_height: SpawnHeight,
    /// Disks falling below this world Z are recycled
    pub ground_z: f32,
    /// Optional second recycle rule: also respawn a falling disk once it is
    /// more than this far below the player. Layered on top of `ground_z`,
    /// never a replacement for it.
    #[serde(default)]
    pub below_player_respawn: Option<f32>,
    /// Fall speed range for spawn/respawn, uniform random
    pub min_speed: f32,
    pub max_speed: f32,
    /// Player height that wins the session
    pub win_height: f32,
    /// Disk prototype; `None` leaves the arena empty (diagnosed, not fatal)
    #[serde(default = "default_template")]
    pub template: Option<DiskTemplate>,
}

fn default_template() -> Option<DiskTemplate> {
    Some(DiskTemplate::default())
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            rows: GRID_ROWS,
            cell_size: CELL_SIZE,
            origin: glam::Vec3::ZERO,
            spawn_height: SpawnHeight::default(),
            ground_z: GROUND_Z,
            below_player_respawn: None,
            min_speed: MIN_FALL_SPEED,
            max_speed: MAX_FALL_SPEED,
            win_height: WIN_HEIGHT,
            template: Some(DiskTemplate::default()),
        }
    }
}

/// Rejected configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Grid must be at least 1x1
    EmptyGrid,
    /// `min_speed` must not exceed `max_speed`
    SpeedRange,
    /// A tunable was NaN or infinite
    NonFinite(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyGrid => write!(f, "grid must have at least 1 column and 1 row"),
            ConfigError::SpeedRange => write!(f, "min_speed must be <= max_speed"),
            ConfigError::NonFinite(field) => write!(f, "{field} must be finite"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ArenaConfig {
    /// Validate the shape constraints. No cross-validation beyond these.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < 1 || self.rows < 1 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.min_speed > self.max_speed {
            return Err(ConfigError::SpeedRange);
        }
        for (value, name) in [
            (self.cell_size, "cell_size"),
            (self.ground_z, "ground_z"),
            (self.min_speed, "min_speed"),
            (self.max_speed, "max_speed"),
            (self.win_height, "win_height"),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }
        Ok(())
    }

    /// Total number of grid cells
    pub fn grid_len(&self) -> usize {
        (self.columns * self.rows) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ArenaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_len(), 16);
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = ArenaConfig {
            columns: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyGrid));
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let config = ArenaConfig {
            min_speed: 500.0,
            max_speed: 100.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::SpeedRange));
    }

    #[test]
    fn test_rejects_non_finite() {
        let config = ArenaConfig {
            win_height: f32::NAN,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonFinite("win_height")));
    }

    #[test]
    fn test_json_round_trip_defaults_template() {
        // A config file that omits the template still gets the default one
        let json = r#"{
            "columns": 2, "rows": 3, "cell_size": 100.0,
            "origin": [0.0, 0.0, 0.0],
            "ground_z": 10.0, "min_speed": 50.0, "max_speed": 150.0,
            "win_height": 1000.0
        }"#;
        let config: ArenaConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.template.is_some());
        assert_eq!(config.below_player_respawn, None);
        assert_eq!(config.spawn_height, SpawnHeight::default());
    }
}
