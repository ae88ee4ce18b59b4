//! Per-frame rule engine
//!
//! `tick` advances the whole arena by one fixed timestep. The checks run in
//! a fixed order because later ones depend on earlier ones having run: red
//! promotion must clear the slot before a later hit can claim it, and the
//! win check reads the height refreshed at the top of the same tick.
//!
//! `notify_hit` is the entry point for the external shooting collaborator.
//! It routes a confirmed trace hit into the disk state machine; it never
//! performs collision logic itself.

use super::disk::DiskState;
use super::state::{ArenaEvent, ArenaState};

/// External inputs sampled once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Player height from the player collaborator. `None` skips every
    /// height-dependent rule this tick (the hard ground floor still applies).
    pub player_height: Option<f32>,
}

/// Advance the arena by one fixed timestep
pub fn tick(state: &mut ArenaState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    // 1. Refresh the player height snapshot and the high-water mark, then
    //    integrate falling disks.
    state.player_height = input.player_height;
    if let Some(height) = state.player_height {
        state.highest_height = state.highest_height.max(height);
    }
    for disk in state.grid.iter_mut().flatten() {
        disk.advance(dt);
    }

    check_ground_hits(state);
    check_red_promotion(state);
    check_green_unfreeze(state);
    check_win(state);

    // 6. HUD refresh, skipped until a player height exists
    if let Some(current) = state.player_height {
        state.events.push(ArenaEvent::Hud {
            current,
            highest: state.highest_height,
        });
    }
}

/// Called by the shooting collaborator when a trace hits a disk.
///
/// Applies the red/green freeze rule from the disk's height relative to the
/// player: above freezes red (evicting any previous red disk), at-or-below
/// freezes green. Hits on empty slots, out-of-range indices or already-frozen
/// disks are defined no-ops; hit-vs-freeze races are normal play.
pub fn notify_hit(state: &mut ArenaState, index: usize, player_height: f32) {
    let Some(disk) = state.disk(index) else {
        return;
    };
    if !disk.is_falling() {
        return;
    }
    let disk_height = disk.height();

    if disk_height > player_height {
        // Red case: at most one red disk, enforced by eviction. The previous
        // red disk resumes falling at its stored speed.
        if let Some(prev) = state.red_disk
            && prev != index
            && let Some(prev_disk) = state.grid[prev].as_mut()
            && prev_disk.unfreeze()
        {
            state.events.push(ArenaEvent::DiskStateChanged {
                index: prev,
                state: DiskState::Falling,
            });
        }
        if let Some(disk) = state.grid[index].as_mut()
            && disk.freeze_red()
        {
            state.red_disk = Some(index);
            state.events.push(ArenaEvent::DiskStateChanged {
                index,
                state: DiskState::FrozenRed,
            });
        }
    } else {
        // Green case: no interaction with the red slot
        if let Some(disk) = state.grid[index].as_mut()
            && disk.freeze_green()
        {
            state.events.push(ArenaEvent::DiskStateChanged {
                index,
                state: DiskState::FrozenGreen,
            });
        }
    }
}

/// Called by the physics collaborator when a disk lands on the player.
///
/// Only falling disks knock back, and only an airborne player; the core just
/// reports the configured force, the direction math stays with physics.
pub fn notify_disk_landed(state: &mut ArenaState, index: usize, player_airborne: bool) {
    let Some(disk) = state.disk(index) else {
        return;
    };
    if !disk.is_falling() || !player_airborne {
        return;
    }
    state.events.push(ArenaEvent::Knockback {
        index,
        force: disk.knockback_force,
    });
}

/// 2. Recycle any falling disk that hit the ground floor, or (when the rule
/// is configured) fell too far below the player. Respawned in place at its
/// original grid cell: bounded pool, no allocation churn.
fn check_ground_hits(state: &mut ArenaState) {
    let floor = state.config.ground_z;
    let below_player_floor = match (state.config.below_player_respawn, state.player_height) {
        (Some(offset), Some(height)) => Some(height - offset),
        _ => None,
    };

    for index in 0..state.grid.len() {
        let Some(disk) = state.grid[index].as_ref() else {
            continue;
        };
        if !disk.is_falling() {
            continue;
        }
        let z = disk.height();
        let recycle = z < floor || below_player_floor.is_some_and(|limit| z < limit);
        if !recycle {
            continue;
        }

        let pos = state.respawn_position(index);
        let speed = state.random_speed();
        if let Some(disk) = state.grid[index].as_mut() {
            disk.respawn(pos, speed);
        }
        state.events.push(ArenaEvent::DiskRespawned { index });
    }
}

/// 3. Once the player has climbed above the red disk, promote it to green
/// and clear the slot. This is what opens the slot for the next red freeze.
fn check_red_promotion(state: &mut ArenaState) {
    let (Some(index), Some(player_height)) = (state.red_disk, state.player_height) else {
        return;
    };
    let Some(disk) = state.grid[index].as_mut() else {
        state.red_disk = None;
        return;
    };
    if disk.state != DiskState::FrozenRed {
        // Slot went stale (e.g. the disk was respawned out from under it)
        state.red_disk = None;
        return;
    }
    if player_height > disk.height() && disk.promote_to_green() {
        state.red_disk = None;
        state.events.push(ArenaEvent::DiskStateChanged {
            index,
            state: DiskState::FrozenGreen,
        });
    }
}

/// 4. Unfreeze any green disk the player has fallen below. Climbing back
/// down forfeits the platforms above the new position.
fn check_green_unfreeze(state: &mut ArenaState) {
    let Some(player_height) = state.player_height else {
        return;
    };
    for index in 0..state.grid.len() {
        let Some(disk) = state.grid[index].as_mut() else {
            continue;
        };
        if disk.state != DiskState::FrozenGreen {
            continue;
        }
        if player_height < disk.height() && disk.unfreeze() {
            state.events.push(ArenaEvent::DiskStateChanged {
                index,
                state: DiskState::Falling,
            });
        }
    }
}

/// 5. One-shot win latch. Infinite mode disables this permanently.
fn check_win(state: &mut ArenaState) {
    if state.game_won || state.infinite_mode {
        return;
    }
    let Some(player_height) = state.player_height else {
        return;
    };
    if player_height >= state.config.win_height {
        state.game_won = true;
        state.events.push(ArenaEvent::WinAchieved);
        log::info!("win height {} reached", state.config.win_height);
    }
}
