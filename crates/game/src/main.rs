//! Aetherdrift - infinite procedural space mining: world streaming and
//! encounter simulation kernel, driven headless at a fixed timestep. The
//! render/UI client consumes the live collections this binary maintains.

mod bridge;
mod config;
mod effects;
mod hazards;
mod messages;
mod player;
mod save;
mod sectors;
mod spawn;
mod state;
mod update;

use anyhow::Result;
use engine_core::{Time, Transform2};
use glam::DVec2;
use hecs::World;
use procgen::zone_at;

use bridge::{LogBridge, SyncBridge};
use config::GameConfig;
use effects::{ActiveEffect, EffectEngine};
use hazards::{BlackHole, Mine, Turret};
use messages::GameMessages;
use player::{Player, ShipClass};
use save::{FileStore, KvStore, Profile};
use sectors::{Deposit, SectorManager};
use spawn::{Mineral, SpawnDensityController};
use state::{DebugSettings, ScreenShake};

/// The whole simulation. Passed by reference into every update function;
/// there is no global state anywhere in the kernel.
pub struct GameState {
    // Entity arena: sectors and live collections hold ids into this.
    pub world: World,
    pub config: GameConfig,
    pub player: Player,
    pub sectors: SectorManager,
    pub spawner: SpawnDensityController,
    pub effects: EffectEngine,
    pub shake: ScreenShake,
    pub messages: GameMessages,
    pub debug: DebugSettings,
    pub profile: Profile,
    pub store: Box<dyn KvStore>,
    pub bridge: Box<dyn SyncBridge>,
}

impl GameState {
    pub fn new(config: GameConfig, store: Box<dyn KvStore>, bridge: Box<dyn SyncBridge>) -> Self {
        let profile = Profile::load(store.as_ref());
        let class = match profile.upgrades.get("ship_class").copied().unwrap_or(0) {
            0 => ShipClass::Scout,
            1 => ShipClass::Miner,
            _ => ShipClass::Hauler,
        };
        log::info!(
            "session start: {} credits, {} class, world seed {:#x}",
            profile.credits,
            class.name(),
            config.world_seed
        );
        Self {
            world: World::new(),
            sectors: SectorManager::new(config.world_seed),
            spawner: SpawnDensityController::new(),
            effects: EffectEngine::new(&config),
            player: Player::new(class),
            shake: ScreenShake::new(),
            messages: GameMessages::new(),
            debug: DebugSettings::new(),
            profile,
            store,
            bridge,
            config,
        }
    }

    // ── Live collection snapshots, read each tick by the render layer ──

    pub fn minerals(&self) -> Vec<(DVec2, Mineral)> {
        self.world
            .query::<(&Transform2, &Mineral)>()
            .iter()
            .map(|(_, (t, m))| (t.position, *m))
            .collect()
    }

    pub fn deposits(&self) -> Vec<(DVec2, Deposit)> {
        self.world
            .query::<(&Transform2, &Deposit)>()
            .iter()
            .map(|(_, (t, d))| (t.position, *d))
            .collect()
    }

    pub fn mines(&self) -> Vec<(DVec2, Mine)> {
        self.world
            .query::<(&Transform2, &Mine)>()
            .iter()
            .map(|(_, (t, m))| (t.position, *m))
            .collect()
    }

    pub fn turrets(&self) -> Vec<(DVec2, Turret)> {
        self.world
            .query::<(&Transform2, &Turret)>()
            .iter()
            .map(|(_, (t, tu))| (t.position, *tu))
            .collect()
    }

    pub fn black_holes(&self) -> Vec<(DVec2, BlackHole)> {
        self.world
            .query::<(&Transform2, &BlackHole)>()
            .iter()
            .map(|(_, (t, b))| (t.position, *b))
            .collect()
    }

    pub fn active_effect(&self) -> Option<&ActiveEffect> {
        self.effects.active()
    }
}

/// Scripted survey flight: thrust outward from the origin with a gentle
/// weave, so a headless run sweeps through every zone.
fn autopilot(state: &mut GameState, t: f64) {
    let outward = state.player.position().normalize_or_zero();
    let dir = if outward == DVec2::ZERO {
        DVec2::new(t.cos(), t.sin())
    } else {
        let weave = DVec2::new((t * 0.2).cos(), (t * 0.2).sin()) * 0.4;
        (outward + weave).normalize_or_zero()
    };
    state.player.set_thrust(dir);
}

fn log_status(state: &GameState, ticks: u64) {
    let pos = state.player.position();
    let effect = match state.active_effect() {
        Some(e) => format!("{}:{} {:.0}%", e.kind.name(), e.phase_name(), e.progress * 100.0),
        None => "none".to_string(),
    };
    log::info!(
        "t={} pos=({:.0}, {:.0}) zone={} hull={:.0}% sectors={} minerals={} credits={} effect={}",
        ticks,
        pos.x,
        pos.y,
        zone_at(state.player.distance_from_origin()).name(),
        state.player.health.fraction() * 100.0,
        state.sectors.loaded_count(),
        state.minerals().len(),
        state.profile.credits,
        effect
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let config = GameConfig::load();
    let store = Box::new(FileStore::open("save.ron"));
    let bridge = Box::new(LogBridge);
    let mut state = GameState::new(config, store, bridge);

    // Optional tick budget: `aetherdrift 18000` flies for five minutes.
    let max_ticks: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3600);

    state
        .messages
        .info(format!("{} class ship launched", state.player.class.name()));

    let mut time = Time::new();
    let mut ticks = 0u64;
    while ticks < max_ticks {
        time.update();
        while time.should_fixed_update() && ticks < max_ticks {
            let dt = time.fixed_step_seconds() as f64;
            let now = time.now_seconds();
            autopilot(&mut state, now);
            update::tick(&mut state, dt, now);
            ticks += 1;
            if ticks % 300 == 0 {
                log_status(&state, ticks);
            }
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }

    state
        .profile
        .save_all(state.store.as_mut(), state.bridge.as_mut());
    log::info!(
        "session end: {} credits, {} minerals collected",
        state.profile.credits,
        state.profile.stats.minerals_collected
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::MemoryStore;

    fn headless_state() -> GameState {
        GameState::new(
            GameConfig::default(),
            Box::new(MemoryStore::new()),
            Box::new(LogBridge),
        )
    }

    #[test]
    fn smoke_run_reaches_steady_state() {
        let mut state = headless_state();
        let dt = 1.0 / 60.0;
        for i in 0..200 {
            let now = i as f64 * dt;
            autopilot(&mut state, now);
            update::tick(&mut state, dt, now);
        }
        let expected = (2 * state.config.load_radius + 1).pow(2) as usize;
        assert_eq!(state.sectors.loaded_count(), expected);
        // Converged at least to the baseline target (sector-generated
        // minerals near the ship can sit on top of it).
        assert!(state.minerals().len() >= state.config.target_density);
        assert!(!state.deposits().is_empty());
    }

    #[test]
    fn collected_credits_survive_a_session_restart() {
        let mut store: Box<dyn KvStore> = Box::new(MemoryStore::new());
        {
            let mut profile = Profile::default();
            profile.add_credits(420, store.as_mut(), &mut LogBridge);
        }
        let state = GameState::new(GameConfig::default(), store, Box::new(LogBridge));
        assert_eq!(state.profile.credits, 420);
    }

    #[test]
    fn debug_toggles_suppress_spawning_and_hazards() {
        let mut state = headless_state();
        state.debug.freeze_spawns = true;
        state.debug.no_hazards = true;
        update::tick(&mut state, 1.0 / 60.0, 0.0);
        let after_first = state.minerals().len();
        for i in 1..30 {
            let now = i as f64 / 60.0;
            update::tick(&mut state, 1.0 / 60.0, now);
        }
        // The controller never ran: no top-up beyond what the sectors
        // streamed in, and no hazard ever fired.
        assert!(state.minerals().len() <= after_first);
        assert!(!state.effects.is_active());
    }
}
