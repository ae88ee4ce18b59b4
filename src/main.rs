//! Headless demo driver
//!
//! Runs a scripted session against the arena core: a simulated player climbs
//! at a steady rate, freezing the nearest falling disk every second. Events
//! the core emits for its external collaborators are printed as JSON lines.
//!
//! Usage: `diskclimb [config.json] [seed]`

use std::time::Instant;

use diskclimb::config::ArenaConfig;
use diskclimb::consts::SIM_DT;
use diskclimb::sim::{ArenaState, TickInput, notify_hit, tick};

fn load_config(path: Option<&str>) -> ArenaConfig {
    let Some(path) = path else {
        return ArenaConfig::default();
    };
    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(config) => {
                log::info!("loaded config from {path}");
                config
            }
            Err(err) => {
                log::warn!("bad config in {path} ({err}), using defaults");
                ArenaConfig::default()
            }
        },
        Err(err) => {
            log::warn!("cannot read {path} ({err}), using defaults");
            ArenaConfig::default()
        }
    }
}

/// Pick the falling disk closest to the player's height, if any
fn nearest_falling(state: &ArenaState, player_height: f32) -> Option<usize> {
    (0..state.grid.len())
        .filter_map(|index| {
            let disk = state.disk(index)?;
            disk.is_falling()
                .then(|| (index, (disk.height() - player_height).abs()))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let config = load_config(args.get(1).map(String::as_str));
    let seed = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xD15C_C71Bu64);

    if let Err(err) = config.validate() {
        log::error!("invalid config: {err}");
        std::process::exit(1);
    }

    let goal = config.win_height;
    let mut state = ArenaState::new(config, seed);
    state.spawn_all();

    // Scripted player: climbs 120 units/sec, fires once a second
    let climb_rate = 120.0;
    let started = Instant::now();
    let mut frame = 0u64;

    loop {
        let player_height = climb_rate * frame as f32 * SIM_DT;

        if frame % 60 == 0
            && let Some(index) = nearest_falling(&state, player_height)
        {
            notify_hit(&mut state, index, player_height);
        }

        let input = TickInput {
            player_height: Some(player_height),
        };
        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => log::error!("event serialization failed: {err}"),
            }
        }

        if state.game_won || player_height > goal + 500.0 {
            break;
        }
        frame += 1;
    }

    log::info!(
        "session over after {} ticks in {:.1?}: won={} highest={:.0}",
        state.time_ticks,
        started.elapsed(),
        state.game_won,
        state.highest_height
    );
}
