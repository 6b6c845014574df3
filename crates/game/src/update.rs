//! Per-frame gameplay advancement.
//!
//! Single-threaded, cooperative: one call per rendered frame, in a fixed
//! order: input/physics, sector streaming, density control, pickup,
//! hazards, effects, upkeep. Nothing here blocks; waiting is always a
//! duration check against the monotonic `now`.

use engine_core::Transform2;
use hecs::Entity;
use procgen::RarityTier;

use crate::effects::EffectCtx;
use crate::hazards;
use crate::spawn::Mineral;
use crate::GameState;

/// Run one frame of gameplay. `now` is monotonic seconds.
pub fn tick(state: &mut GameState, dt: f64, now: f64) {
    let dt = dt * state.debug.time_scale;

    // Apply input and integrate ship physics.
    state.player.integrate(dt);
    let player_pos = state.player.position();
    state.profile.stats.peak_distance = state
        .profile
        .stats
        .peak_distance
        .max(state.player.distance_from_origin());

    // Stream sectors around the new position: load ahead, then evict far.
    state
        .sectors
        .ensure_loaded(&mut state.world, player_pos, &state.config);
    state
        .sectors
        .evict_far(&mut state.world, player_pos, &state.config);

    // Keep the local mineral population at target density.
    if !state.debug.freeze_spawns {
        state
            .spawner
            .update(&mut state.world, player_pos, &state.config);
    }

    // Scoop up minerals in pickup range.
    collect_nearby(state);

    // Hazard live pass: contact checks in here hand over to the effect
    // engine.
    if !state.debug.no_hazards {
        let mut ctx = EffectCtx {
            player: &mut state.player,
            shake: &mut state.shake,
            messages: &mut state.messages,
            god_mode: state.debug.god_mode,
        };
        hazards::update(
            &mut state.world,
            &mut state.effects,
            &mut ctx,
            &state.config,
            now,
            dt,
        );
    }

    // The only place active-effect state changes.
    {
        let mut ctx = EffectCtx {
            player: &mut state.player,
            shake: &mut state.shake,
            messages: &mut state.messages,
            god_mode: state.debug.god_mode,
        };
        state.effects.update(now, &mut ctx);
    }

    // Upkeep.
    state.shake.update(dt, now);
    state.messages.update(dt as f32);
}

/// Collect minerals within pickup range. Stands in for the collision layer
/// that reports pickups in the full client.
fn collect_nearby(state: &mut GameState) {
    if state.player.input_locked || state.player.cargo_full() {
        return;
    }
    let pos = state.player.position();
    let grabbed: Vec<(Entity, Mineral)> = state
        .world
        .query_mut::<(&Transform2, &Mineral)>()
        .into_iter()
        .filter(|(_, (t, _))| t.position.distance(pos) < state.config.collect_radius)
        .map(|(e, (_, m))| (e, *m))
        .collect();

    let mut collected = 0u32;
    for (e, mineral) in grabbed {
        if !state.player.stow(mineral.kind) {
            state.messages.warning("Cargo hold full!");
            break;
        }
        let _ = state.world.despawn(e);
        collected += 1;
        state.profile.stats.minerals_collected += 1;
        state.profile.add_credits(
            mineral.value as u64,
            state.store.as_mut(),
            state.bridge.as_mut(),
        );
        if mineral.kind.tier() >= RarityTier::Epic {
            state.messages.success(format!(
                "Collected {}! (+{} cr)",
                mineral.kind.name(),
                mineral.value as u64
            ));
        }
    }
    if collected > 0 {
        state
            .profile
            .save_stats(state.store.as_mut(), state.bridge.as_mut());
    }
}
