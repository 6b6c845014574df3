//! Live mineral population control around the player.
//!
//! Keeps a target number of collectible minerals near the ship regardless
//! of sector boundaries: culls what drifted too far behind, tops up with
//! types drawn from the distance-bracket rarity tables, and leans richer
//! while the player sits inside a deposit hotspot.

use engine_core::Transform2;
use glam::DVec2;
use hecs::{Entity, World};
use procgen::{zone_at, MineralType, RarityTier};
use rand::prelude::*;

use crate::config::GameConfig;
use crate::sectors::Deposit;

/// Collectible mineral component. `depth` is the parallax layer in [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct Mineral {
    pub kind: MineralType,
    pub value: f64,
    pub size: f32,
    pub depth: f32,
}

/// Fallback when floating-point drift exhausts the roulette walk.
const FALLBACK_TYPE: MineralType = MineralType::Iron;

/// Maintains the player-relative mineral population at a target density.
pub struct SpawnDensityController {
    rng: StdRng,
}

impl SpawnDensityController {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded construction for deterministic tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One tick of population control: cull, hotspot check, top-up.
    /// The top-up loop stops at the target, so the live count never
    /// exceeds it by more than one batch.
    pub fn update(&mut self, world: &mut World, player_pos: DVec2, config: &GameConfig) {
        // Cull minerals that fell too far behind.
        let cull_radius = config.spawn_radius * 3.0;
        let far: Vec<Entity> = world
            .query_mut::<(&Transform2, &Mineral)>()
            .into_iter()
            .filter(|(_, (t, _))| t.position.distance(player_pos) > cull_radius)
            .map(|(e, _)| e)
            .collect();
        for id in far {
            let _ = world.despawn(id);
        }

        // Hotspot check: inside a deposit's radius, density and rarity
        // targets switch to the hotspot values.
        let hotspot: Option<DVec2> = world
            .query_mut::<(&Transform2, &Deposit)>()
            .into_iter()
            .find(|(_, (t, d))| t.position.distance(player_pos) < d.radius)
            .map(|(_, (t, _))| t.position);
        let (target, boost) = match hotspot {
            Some(_) => (config.hotspot_density, config.hotspot_rarity_boost),
            None => (config.target_density, 1.0),
        };

        let live = world.query_mut::<&Mineral>().into_iter().count();
        if live >= target {
            return;
        }

        let distance = player_pos.length();
        for _ in live..target {
            let kind = draw_type(&mut self.rng, distance, boost, config);
            // Uniform over the spawn disc; pulled toward the hotspot
            // center when one is active.
            let angle = self.rng.gen::<f64>() * std::f64::consts::TAU;
            let r = config.spawn_radius * self.rng.gen::<f64>().sqrt();
            let mut pos = player_pos + DVec2::new(angle.cos(), angle.sin()) * r;
            if let Some(center) = hotspot {
                pos = pos.lerp(center, 0.4);
            }
            let (size_min, size_max) = kind.size_range();
            let value = (kind.base_value() * self.rng.gen_range(0.8..1.2)).round();
            world.spawn((
                Transform2::from_position(pos),
                Mineral {
                    kind,
                    value,
                    size: size_min + self.rng.gen::<f32>() * (size_max - size_min),
                    depth: self.rng.gen(),
                },
            ));
        }
    }
}

impl Default for SpawnDensityController {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw one mineral type by cumulative-weight roulette.
///
/// Weight per type = bracket weight of its tier at this distance, split
/// evenly among the tier's types, times the hotspot boost for non-common
/// tiers, times the home-zone bonus when the type is native here. Tiers
/// with zero bracket weight never appear.
fn draw_type(rng: &mut StdRng, distance: f64, boost: f64, config: &GameConfig) -> MineralType {
    let weights = config.bracket_weights(distance);
    let current_zone = zone_at(distance);

    let mut tier_counts = [0usize; RarityTier::COUNT];
    for kind in MineralType::ALL {
        tier_counts[kind.tier().index()] += 1;
    }

    let mut candidates: Vec<(MineralType, f64)> = Vec::with_capacity(MineralType::ALL.len());
    let mut total = 0.0;
    for kind in MineralType::ALL {
        let tier = kind.tier();
        let base = weights[tier.index()];
        if base <= 0.0 {
            continue;
        }
        let mut w = base / tier_counts[tier.index()] as f64;
        if tier != RarityTier::Common {
            w *= boost;
        }
        if kind.home_zone() == current_zone {
            w *= config.home_zone_bonus;
        }
        candidates.push((kind, w));
        total += w;
    }
    if candidates.is_empty() || total <= 0.0 {
        return FALLBACK_TYPE;
    }

    let mut remainder = rng.gen::<f64>() * total;
    for (kind, w) in &candidates {
        remainder -= w;
        if remainder <= 0.0 {
            return *kind;
        }
    }
    FALLBACK_TYPE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sectors::Deposit;
    use procgen::Zone;

    fn count_minerals(world: &mut World) -> usize {
        world.query_mut::<&Mineral>().into_iter().count()
    }

    #[test]
    fn density_converges_and_never_exceeds_target() {
        let config = GameConfig::default();
        let mut world = World::new();
        let mut spawner = SpawnDensityController::with_seed(1);
        for _ in 0..100 {
            spawner.update(&mut world, DVec2::ZERO, &config);
            assert!(count_minerals(&mut world) <= config.target_density);
        }
        assert_eq!(count_minerals(&mut world), config.target_density);
    }

    #[test]
    fn far_minerals_are_culled() {
        let config = GameConfig::default();
        let mut world = World::new();
        let far = world.spawn((
            Transform2::from_position(DVec2::new(config.spawn_radius * 3.0 + 1.0, 0.0)),
            Mineral {
                kind: MineralType::Iron,
                value: 5.0,
                size: 10.0,
                depth: 0.5,
            },
        ));
        let mut spawner = SpawnDensityController::with_seed(2);
        spawner.update(&mut world, DVec2::ZERO, &config);
        assert!(!world.contains(far));
    }

    #[test]
    fn spawned_minerals_stay_inside_spawn_radius() {
        let config = GameConfig::default();
        let mut world = World::new();
        let mut spawner = SpawnDensityController::with_seed(3);
        let player = DVec2::new(5_000.0, -2_000.0);
        spawner.update(&mut world, player, &config);
        for (_, (t, _)) in world.query_mut::<(&Transform2, &Mineral)>() {
            assert!(t.position.distance(player) <= config.spawn_radius + 1e-6);
        }
    }

    #[test]
    fn hotspot_raises_target_density() {
        let config = GameConfig::default();
        let mut world = World::new();
        world.spawn((
            Transform2::from_position(DVec2::ZERO),
            Deposit {
                zone: Zone::Industrial,
                richness: 0.9,
                tier: 2,
                radius: 500.0,
            },
        ));
        let mut spawner = SpawnDensityController::with_seed(4);
        spawner.update(&mut world, DVec2::ZERO, &config);
        assert_eq!(count_minerals(&mut world), config.hotspot_density);
    }

    #[test]
    fn rarity_shape_at_origin() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(99);
        let mut common = 0u32;
        let mut epic_or_above = 0u32;
        const DRAWS: u32 = 10_000;
        for _ in 0..DRAWS {
            let kind = draw_type(&mut rng, 0.0, 1.0, &config);
            match kind.tier() {
                RarityTier::Common => common += 1,
                RarityTier::Epic | RarityTier::Legendary | RarityTier::Mythic => {
                    epic_or_above += 1
                }
                _ => {}
            }
        }
        let common_frac = common as f64 / DRAWS as f64;
        assert!(
            (0.65..=0.75).contains(&common_frac),
            "common fraction {} outside documented band",
            common_frac
        );
        assert_eq!(epic_or_above, 0, "epic+ tiers must be absent at the origin");
    }

    #[test]
    fn hotspot_boost_shifts_draws_off_common() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut plain_common = 0u32;
        let mut boosted_common = 0u32;
        for _ in 0..5_000 {
            if draw_type(&mut rng, 50_000.0, 1.0, &config).tier() == RarityTier::Common {
                plain_common += 1;
            }
            if draw_type(&mut rng, 50_000.0, config.hotspot_rarity_boost, &config).tier()
                == RarityTier::Common
            {
                boosted_common += 1;
            }
        }
        assert!(boosted_common < plain_common);
    }
}
