//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by grid index)
//! - No rendering or platform dependencies
//!
//! Single-threaded by contract: hit notifications and the per-frame tick are
//! ordinary synchronous calls serialized by the caller.

pub mod disk;
pub mod state;
pub mod tick;

pub use disk::{Disk, DiskState};
pub use state::{ArenaEvent, ArenaState};
pub use tick::{TickInput, notify_disk_landed, notify_hit, tick};
