//! Disk Climb - vertical-climbing arena core
//!
//! A grid of disks falls from above; the player freezes them in place by
//! shooting, building a climbable stack of platforms. This crate is the
//! gameplay core only:
//! - `sim`: Deterministic simulation (disk state machine, grid rule engine)
//! - `config`: Tunable arena parameters
//!
//! Rendering, input, hit traces and widgets are external collaborators. They
//! feed the core player heights and hit notifications, and drain
//! [`sim::ArenaEvent`]s back out each frame.

pub mod config;
pub mod sim;

pub use config::{ArenaConfig, ConfigError, DiskTemplate, SpawnHeight};

/// Default tunables, mirroring the reference arena setup
pub mod consts {
    /// Fixed simulation timestep (60 Hz - disk motion needs no substepping)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Grid defaults
    pub const GRID_COLUMNS: u32 = 4;
    pub const GRID_ROWS: u32 = 4;
    /// Width and depth of each grid cell (world units)
    pub const CELL_SIZE: f32 = 350.0;
    /// Height above the arena origin where new disks appear
    pub const SPAWN_HEIGHT_OFFSET: f32 = 3000.0;
    /// Disks falling below this world Z have hit the ground
    pub const GROUND_Z: f32 = 20.0;

    /// Fall speed range for freshly spawned/respawned disks (units/sec)
    pub const MIN_FALL_SPEED: f32 = 80.0;
    pub const MAX_FALL_SPEED: f32 = 320.0;
    /// Fall speed a disk carries before `initialize` is first called
    pub const DEFAULT_FALL_SPEED: f32 = 200.0;

    /// Force magnitude reported when a falling disk lands on an airborne player
    pub const KNOCKBACK_FORCE: f32 = 900.0;

    /// Player height at which the session is won
    pub const WIN_HEIGHT: f32 = 2500.0;
}

/// Grid index for the cell at (col, row), row-major
#[inline]
pub fn grid_index(col: u32, row: u32, columns: u32) -> usize {
    (col + row * columns) as usize
}

/// Inverse of [`grid_index`]: (col, row) for a flat index
#[inline]
pub fn grid_cell(index: usize, columns: u32) -> (u32, u32) {
    let index = index as u32;
    (index % columns, index / columns)
}
