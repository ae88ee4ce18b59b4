//! The falling disk: a recyclable platform with three freeze states
//!
//! A disk knows nothing about the grid, the player or the other disks. The
//! arena controller drives every transition; the disk only guards its own
//! preconditions, rejecting out-of-sequence calls as no-ops instead of
//! corrupting state.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FALL_SPEED;

/// Lifecycle state of a disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskState {
    /// Descending at `fall_speed` units per second
    Falling,
    /// The one disk frozen above the player; promotes to green once passed
    FrozenRed,
    /// Frozen at or below the player; a stable platform until the player
    /// drops back under it
    FrozenGreen,
}

/// A single platform disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub pos: Vec3,
    pub state: DiskState,
    /// Current descent rate (units/sec), only meaningful while Falling
    pub fall_speed: f32,
    /// Force magnitude reported when this disk lands on an airborne player
    pub knockback_force: f32,
    /// Fall speed captured at the last freeze; restored on unfreeze. Only
    /// meaningful once the disk has been frozen at least once.
    stored_fall_speed: f32,
}

impl Disk {
    /// Create a disk at `pos` descending at `speed`
    pub fn new(pos: Vec3, speed: f32, knockback_force: f32) -> Self {
        let mut disk = Self {
            pos,
            state: DiskState::Falling,
            fall_speed: DEFAULT_FALL_SPEED,
            knockback_force,
            stored_fall_speed: DEFAULT_FALL_SPEED,
        };
        disk.initialize(speed);
        disk
    }

    /// Set starting speed and reset to Falling
    pub fn initialize(&mut self, speed: f32) {
        self.fall_speed = speed;
        self.stored_fall_speed = speed;
        self.state = DiskState::Falling;
    }

    /// Freeze as the one red disk above the player.
    /// Returns whether the transition applied (only from Falling).
    pub fn freeze_red(&mut self) -> bool {
        if self.state != DiskState::Falling {
            return false;
        }
        self.stored_fall_speed = self.fall_speed;
        self.state = DiskState::FrozenRed;
        true
    }

    /// Freeze as a green disk (at or below the player).
    /// Returns whether the transition applied (only from Falling).
    pub fn freeze_green(&mut self) -> bool {
        if self.state != DiskState::Falling {
            return false;
        }
        self.stored_fall_speed = self.fall_speed;
        self.state = DiskState::FrozenGreen;
        true
    }

    /// Red -> Green once the player climbs above this disk. The stored fall
    /// speed was already captured at the red freeze and stays untouched.
    pub fn promote_to_green(&mut self) -> bool {
        if self.state != DiskState::FrozenRed {
            return false;
        }
        self.state = DiskState::FrozenGreen;
        true
    }

    /// Restore the fall speed that was active before this disk was frozen.
    pub fn unfreeze(&mut self) -> bool {
        if self.state == DiskState::Falling {
            return false;
        }
        self.fall_speed = self.stored_fall_speed;
        self.state = DiskState::Falling;
        true
    }

    /// Teleport to `new_pos` and re-initialize with a new speed (ground
    /// respawn). Valid from any state; this is a hard reset.
    pub fn respawn(&mut self, new_pos: Vec3, new_speed: f32) {
        self.pos = new_pos;
        self.initialize(new_speed);
    }

    /// Per-frame fall integration. Frozen disks are stationary regardless of
    /// external forces.
    pub fn advance(&mut self, dt: f32) {
        if self.state == DiskState::Falling {
            self.pos.z -= self.fall_speed * dt;
        }
    }

    /// World-space height of the disk center
    #[inline]
    pub fn height(&self) -> f32 {
        self.pos.z
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.state == DiskState::Falling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk_at(z: f32, speed: f32) -> Disk {
        Disk::new(Vec3::new(0.0, 0.0, z), speed, 900.0)
    }

    #[test]
    fn test_advance_only_while_falling() {
        let mut disk = disk_at(100.0, 60.0);
        disk.advance(1.0);
        assert_eq!(disk.pos.z, 40.0);

        assert!(disk.freeze_green());
        disk.advance(1.0);
        assert_eq!(disk.pos.z, 40.0);
    }

    #[test]
    fn test_unfreeze_restores_pre_freeze_speed() {
        let mut disk = disk_at(100.0, 120.0);
        // Speed can drift between initialize and freeze (e.g. after respawn
        // tuning); the freeze must capture whatever is current.
        disk.fall_speed = 175.0;
        assert!(disk.freeze_red());
        disk.fall_speed = 0.0;

        assert!(disk.unfreeze());
        assert_eq!(disk.fall_speed, 175.0);
        assert_eq!(disk.state, DiskState::Falling);
    }

    #[test]
    fn test_promote_keeps_stored_speed() {
        let mut disk = disk_at(100.0, 150.0);
        assert!(disk.freeze_red());
        assert!(disk.promote_to_green());
        assert!(disk.unfreeze());
        assert_eq!(disk.fall_speed, 150.0);
    }

    #[test]
    fn test_freeze_rejected_when_already_frozen() {
        let mut disk = disk_at(100.0, 150.0);
        assert!(disk.freeze_red());
        assert!(!disk.freeze_green());
        assert!(!disk.freeze_red());
        assert_eq!(disk.state, DiskState::FrozenRed);
    }

    #[test]
    fn test_promote_rejected_outside_red() {
        let mut disk = disk_at(100.0, 150.0);
        assert!(!disk.promote_to_green());
        assert!(disk.freeze_green());
        assert!(!disk.promote_to_green());
        assert_eq!(disk.state, DiskState::FrozenGreen);
    }

    #[test]
    fn test_respawn_resets_from_any_state() {
        let mut disk = disk_at(100.0, 150.0);
        assert!(disk.freeze_green());

        disk.respawn(Vec3::new(5.0, -5.0, 3000.0), 90.0);
        assert_eq!(disk.state, DiskState::Falling);
        assert_eq!(disk.pos, Vec3::new(5.0, -5.0, 3000.0));
        assert_eq!(disk.fall_speed, 90.0);

        // Stored speed was reset too: unfreeze after a fresh freeze restores
        // the new speed, not the pre-respawn one.
        assert!(disk.freeze_red());
        assert!(disk.unfreeze());
        assert_eq!(disk.fall_speed, 90.0);
    }
}
