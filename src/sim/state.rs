//! Arena state: the disk grid, red-disk slot and session latches
//!
//! The arena exclusively owns every disk. Outside collaborators refer to
//! disks by grid index; the red-disk slot is an index too, never a second
//! owner. Disks are pooled: recycled in place via respawn, never destroyed
//! mid-session.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::disk::{Disk, DiskState};
use crate::config::{ArenaConfig, SpawnHeight};
use crate::{grid_cell, grid_index};

/// Outbound signals to the external collaborators (visuals, HUD, win UI).
/// Queued during hit/tick processing and drained by the driver each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ArenaEvent {
    /// A disk changed lifecycle state; the visual collaborator swaps material
    DiskStateChanged { index: usize, state: DiskState },
    /// A disk was teleported back to its cell with a fresh speed
    DiskRespawned { index: usize },
    /// Per-tick HUD refresh
    Hud { current: f32, highest: f32 },
    /// One-shot static goal label for the HUD, sent at arena setup
    GoalLabel { goal: f32 },
    /// Win latch fired; the UI presents the win state (exactly once)
    WinAchieved,
    /// Infinite mode started; the UI dismisses the win presentation
    WinDismissed,
    /// A falling disk landed on the airborne player; physics applies `force`
    Knockback { index: usize, force: f32 },
}

/// Complete arena state, advanced by [`super::tick::tick`]
#[derive(Debug, Clone)]
pub struct ArenaState {
    pub config: ArenaConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Disk slots, index = col + row * columns. `None` = spawn failed.
    pub grid: Vec<Option<Disk>>,
    /// Grid index of the at-most-one FrozenRed disk
    pub red_disk: Option<usize>,
    /// Player height snapshot, refreshed once per tick. `None` before the
    /// player collaborator is wired up; height-dependent rules skip then.
    pub player_height: Option<f32>,
    /// High-water mark of player height, display only
    pub highest_height: f32,
    /// Win latch: set once, cleared only by infinite mode
    pub game_won: bool,
    /// Permanently disables win checks for the session
    pub infinite_mode: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<ArenaEvent>,
}

impl ArenaState {
    /// Create an empty arena. Call [`ArenaState::spawn_all`] to fill the grid.
    pub fn new(config: ArenaConfig, seed: u64) -> Self {
        let grid_len = config.grid_len();
        let mut grid = Vec::with_capacity(grid_len);
        grid.resize_with(grid_len, || None);
        Self {
            config,
            seed,
            grid,
            red_disk: None,
            player_height: None,
            highest_height: f32::MIN,
            game_won: false,
            infinite_mode: false,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Spawn one disk per grid cell, each with a uniform random fall speed.
    ///
    /// With no disk template configured this is a diagnosed no-op: the grid
    /// stays empty and every per-frame rule degrades to a no-op over it.
    pub fn spawn_all(&mut self) {
        let Some(template) = self.config.template else {
            log::warn!("no disk template configured, arena stays empty");
            return;
        };

        for row in 0..self.config.rows {
            for col in 0..self.config.columns {
                let index = grid_index(col, row, self.config.columns);
                let pos = self.cell_spawn_position(col, row);
                let speed = self.random_speed();
                self.grid[index] = Some(Disk::new(pos, speed, template.knockback_force));
            }
        }
        log::info!(
            "spawned {} disks ({}x{} grid)",
            self.grid.len(),
            self.config.columns,
            self.config.rows
        );
        self.events.push(ArenaEvent::GoalLabel {
            goal: self.config.win_height,
        });
    }

    /// World position for the cell at (col, row): grid centered symmetrically
    /// on the origin in X/Y, Z per the configured spawn-height rule.
    pub fn cell_spawn_position(&self, col: u32, row: u32) -> Vec3 {
        let cell = self.config.cell_size;
        let grid_width = self.config.columns as f32 * cell;
        let grid_depth = self.config.rows as f32 * cell;

        let offset_x = (col as f32 + 0.5) * cell - grid_width * 0.5;
        let offset_y = (row as f32 + 0.5) * cell - grid_depth * 0.5;

        let origin = self.config.origin;
        let z = match self.config.spawn_height {
            SpawnHeight::FixedOffset(offset) => origin.z + offset,
            SpawnHeight::AbovePlayer(offset) => {
                self.player_height.unwrap_or(origin.z) + offset
            }
        };
        Vec3::new(origin.x + offset_x, origin.y + offset_y, z)
    }

    /// Spawn position for a flat grid index
    pub fn respawn_position(&self, index: usize) -> Vec3 {
        let (col, row) = grid_cell(index, self.config.columns);
        self.cell_spawn_position(col, row)
    }

    /// Uniform random fall speed in `[min_speed, max_speed]`
    pub fn random_speed(&mut self) -> f32 {
        self.rng
            .random_range(self.config.min_speed..=self.config.max_speed)
    }

    /// Clear the win latch and permanently disable win checks. The win UI is
    /// told to dismiss and resume play. There is no way back within a session.
    pub fn start_infinite_mode(&mut self) {
        self.game_won = false;
        self.infinite_mode = true;
        self.events.push(ArenaEvent::WinDismissed);
        log::info!("infinite mode started, win checks disabled");
    }

    /// Take the queued outbound events, leaving the queue empty
    pub fn drain_events(&mut self) -> Vec<ArenaEvent> {
        std::mem::take(&mut self.events)
    }

    /// Shared borrow of a disk slot; `None` for empty or out-of-range
    pub fn disk(&self, index: usize) -> Option<&Disk> {
        self.grid.get(index).and_then(|slot| slot.as_ref())
    }

    /// Number of disks currently FrozenRed. The rule engine keeps this at
    /// 0 or 1 at all times.
    pub fn frozen_red_count(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|disk| disk.state == DiskState::FrozenRed)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_fills_grid_and_centers_cells() {
        let config = ArenaConfig {
            columns: 2,
            rows: 2,
            cell_size: 100.0,
            ..Default::default()
        };
        let mut state = ArenaState::new(config, 7);
        state.spawn_all();

        assert_eq!(state.grid.len(), 4);
        assert!(state.grid.iter().all(|slot| slot.is_some()));

        // 2x2 grid of 100-unit cells centered on origin: centers at +/-50
        let disk = state.disk(grid_index(0, 0, 2)).unwrap();
        assert_eq!(disk.pos.x, -50.0);
        assert_eq!(disk.pos.y, -50.0);
        let disk = state.disk(grid_index(1, 1, 2)).unwrap();
        assert_eq!(disk.pos.x, 50.0);
        assert_eq!(disk.pos.y, 50.0);

        // Goal label announced once, at setup
        let events = state.drain_events();
        assert!(events.contains(&ArenaEvent::GoalLabel {
            goal: state.config.win_height
        }));
    }

    #[test]
    fn test_spawn_speeds_within_configured_range() {
        let config = ArenaConfig {
            min_speed: 80.0,
            max_speed: 320.0,
            ..Default::default()
        };
        let mut state = ArenaState::new(config, 99);
        state.spawn_all();
        for disk in state.grid.iter().flatten() {
            assert!(disk.fall_speed >= 80.0 && disk.fall_speed <= 320.0);
        }
    }

    #[test]
    fn test_missing_template_leaves_arena_empty() {
        let config = ArenaConfig {
            template: None,
            ..Default::default()
        };
        let mut state = ArenaState::new(config, 1);
        state.spawn_all();
        assert!(state.grid.iter().all(|slot| slot.is_none()));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_same_seed_spawns_identical_speeds() {
        let mut a = ArenaState::new(ArenaConfig::default(), 42);
        let mut b = ArenaState::new(ArenaConfig::default(), 42);
        a.spawn_all();
        b.spawn_all();
        for (da, db) in a.grid.iter().zip(b.grid.iter()) {
            assert_eq!(
                da.as_ref().unwrap().fall_speed,
                db.as_ref().unwrap().fall_speed
            );
        }
    }

    #[test]
    fn test_spawn_above_player_uses_player_height() {
        let config = ArenaConfig {
            spawn_height: SpawnHeight::AbovePlayer(500.0),
            ..Default::default()
        };
        let mut state = ArenaState::new(config, 3);
        state.player_height = Some(1200.0);
        state.spawn_all();
        assert_eq!(state.disk(0).unwrap().pos.z, 1700.0);
    }
}
