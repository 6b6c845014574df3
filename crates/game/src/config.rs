//! Simulation configuration. Loaded from config.ron at startup.
//!
//! Everything the kernel treats as tunable lives here: sector streaming
//! radii, spawn densities, the per-distance-bracket rarity tables, hazard
//! spawn probability bands (inside [`GenRules`]), and per-effect-type
//! durations and phase boundaries.

use procgen::{GenRules, RarityTier};
use serde::{Deserialize, Serialize};

/// Tier weights applied to mineral selection for players closer than
/// `max_dist` to the origin. A zero weight excludes the tier in that
/// bracket entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarityBracket {
    pub max_dist: f64,
    /// Indexed by [`RarityTier`]: common, uncommon, rare, epic, legendary,
    /// mythic.
    pub weights: [f64; RarityTier::COUNT],
}

/// Durations and phase-boundary fractions for each effect type. Boundaries
/// are progress fractions in [0, 1], ascending, first entry 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectTuning {
    pub explosion_duration: f64,
    /// flash / shockwave / debris / fade
    pub explosion_phases: [f64; 4],
    pub wormhole_duration: f64,
    /// pull / tunnel / collapse / emerge
    pub wormhole_phases: [f64; 4],
    pub death_duration: f64,
    /// dying / blackout / respawn
    pub death_phases: [f64; 3],
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            explosion_duration: 2.2,
            explosion_phases: [0.0, 0.10, 0.35, 0.70],
            wormhole_duration: 6.0,
            wormhole_phases: [0.0, 0.15, 0.55, 0.85],
            death_duration: 4.0,
            death_phases: [0.0, 0.40, 0.80],
        }
    }
}

/// Persistent simulation settings. Loaded from `config.ron` in the current
/// directory; missing fields fall back to the documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World seed for deterministic sector generation.
    pub world_seed: u64,
    /// Sector generator tunables (sector size, counts, hazard bands).
    pub gen: GenRules,
    /// Sectors within this Chebyshev radius of the player's sector stay
    /// loaded.
    pub load_radius: i32,
    /// Sectors beyond this Chebyshev radius are evicted.
    pub cleanup_radius: i32,
    /// Radius around the player inside which the density controller tops
    /// up minerals. Minerals beyond 3x this are culled.
    pub spawn_radius: f64,
    /// Baseline live mineral count the controller maintains.
    pub target_density: usize,
    /// Live mineral target while inside a deposit hotspot.
    pub hotspot_density: usize,
    /// Selection-weight multiplier for non-common tiers inside a hotspot.
    pub hotspot_rarity_boost: f64,
    /// Selection-weight multiplier when a type's home zone matches the
    /// player's current zone.
    pub home_zone_bonus: f64,
    /// Tier weight tables by distance bracket, innermost first.
    pub rarity_brackets: Vec<RarityBracket>,
    /// Pickup radius for mineral collection.
    pub collect_radius: f64,
    /// Black hole pull acceleration at the event horizon, in units/s^2.
    pub black_hole_pull: f64,
    /// Distance a wormhole traversal carries the player.
    pub wormhole_jump: f64,
    /// Effect durations and phase boundaries.
    pub effects: EffectTuning,
}

fn default_rarity_brackets() -> Vec<RarityBracket> {
    vec![
        RarityBracket {
            max_dist: 15_000.0,
            weights: [65.0, 26.0, 9.0, 0.0, 0.0, 0.0],
        },
        RarityBracket {
            max_dist: 40_000.0,
            weights: [45.0, 30.0, 17.0, 6.0, 2.0, 0.0],
        },
        RarityBracket {
            max_dist: 80_000.0,
            weights: [24.0, 30.0, 25.0, 14.0, 6.0, 1.0],
        },
        RarityBracket {
            max_dist: 150_000.0,
            weights: [12.0, 20.0, 28.0, 22.0, 13.0, 5.0],
        },
        RarityBracket {
            max_dist: f64::INFINITY,
            weights: [5.0, 12.0, 22.0, 28.0, 22.0, 11.0],
        },
    ]
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_seed: 0xAE7E0,
            gen: GenRules::default(),
            load_radius: 2,
            cleanup_radius: 4,
            spawn_radius: 1600.0,
            target_density: 40,
            hotspot_density: 70,
            hotspot_rarity_boost: 2.5,
            home_zone_bonus: 1.5,
            rarity_brackets: default_rarity_brackets(),
            collect_radius: 60.0,
            black_hole_pull: 260.0,
            wormhole_jump: 25_000.0,
            effects: EffectTuning::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid,
    /// returns the default config.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }

    /// Tier weights for a player at `distance` from the origin. Beyond the
    /// table the outermost bracket applies; an empty table degrades to
    /// commons only.
    pub fn bracket_weights(&self, distance: f64) -> [f64; RarityTier::COUNT] {
        for bracket in &self.rarity_brackets {
            if distance < bracket.max_dist {
                return bracket.weights;
            }
        }
        match self.rarity_brackets.last() {
            Some(bracket) => bracket.weights,
            None => {
                log::warn!("empty rarity bracket table, defaulting to commons only");
                [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]
            }
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips_through_ron() {
        let config = GameConfig::default();
        let text = ron::ser::to_string(&config).unwrap();
        let back: GameConfig = ron::from_str(&text).unwrap();
        assert_eq!(back.target_density, config.target_density);
        assert_eq!(back.rarity_brackets.len(), config.rarity_brackets.len());
    }

    #[test]
    fn bracket_weights_pick_by_distance() {
        let config = GameConfig::default();
        let inner = config.bracket_weights(0.0);
        assert_eq!(inner, [65.0, 26.0, 9.0, 0.0, 0.0, 0.0]);
        let outer = config.bracket_weights(1.0e9);
        assert_eq!(outer, [5.0, 12.0, 22.0, 28.0, 22.0, 11.0]);
    }

    #[test]
    fn innermost_bracket_excludes_high_tiers() {
        let config = GameConfig::default();
        let w = config.bracket_weights(100.0);
        assert_eq!(w[RarityTier::Epic.index()], 0.0);
        assert_eq!(w[RarityTier::Legendary.index()], 0.0);
        assert_eq!(w[RarityTier::Mythic.index()], 0.0);
    }
}
