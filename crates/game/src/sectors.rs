//! Sector streaming: load around the player, evict far behind.
//!
//! Sectors own their generated entities by id only; the hecs world is the
//! single arena holding entity data. Eviction despawns by id and tolerates
//! ids the mineral cull already removed: a stale generational id despawn
//! is a no-op, so nothing is ever removed twice and nothing leaks.

use std::collections::HashMap;

use engine_core::Transform2;
use glam::DVec2;
use hecs::{Entity, World};
use procgen::{generate_sector, SectorContent, Zone};

use crate::config::GameConfig;
use crate::hazards::{BlackHole, Mine, Turret};
use crate::spawn::Mineral;

/// Deposit landmark component: boosts local spawn density/rarity while the
/// player is inside `radius`.
#[derive(Debug, Clone, Copy)]
pub struct Deposit {
    pub zone: Zone,
    pub richness: f32,
    pub tier: u8,
    pub radius: f64,
}

/// One loaded sector and the entities it produced.
pub struct Sector {
    pub coord: (i32, i32),
    pub seed: u64,
    pub owned: Vec<Entity>,
}

/// Spatial cache of loaded sectors keyed by integer grid coordinates.
pub struct SectorManager {
    sectors: HashMap<(i32, i32), Sector>,
    world_seed: u64,
}

/// Map a world position to its sector coordinates (floor division).
pub fn sector_of(pos: DVec2, sector_size: f64) -> (i32, i32) {
    (
        (pos.x / sector_size).floor() as i32,
        (pos.y / sector_size).floor() as i32,
    )
}

impl SectorManager {
    pub fn new(world_seed: u64) -> Self {
        Self {
            sectors: HashMap::new(),
            world_seed,
        }
    }

    pub fn loaded_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn contains(&self, coord: (i32, i32)) -> bool {
        self.sectors.contains_key(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sector> {
        self.sectors.values()
    }

    /// Load every sector within `load_radius` (Chebyshev) of the player's
    /// sector. Already-loaded sectors are left untouched, so calling this
    /// twice with the same position does no redundant work.
    pub fn ensure_loaded(&mut self, world: &mut World, player_pos: DVec2, config: &GameConfig) {
        let (cx, cy) = sector_of(player_pos, config.gen.sector_size);
        let r = config.load_radius;
        for dy in -r..=r {
            for dx in -r..=r {
                let coord = (cx + dx, cy + dy);
                if self.sectors.contains_key(&coord) {
                    continue;
                }
                let content = generate_sector(coord.0, coord.1, self.world_seed, &config.gen);
                let owned = spawn_content(world, &content);
                log::debug!(
                    "loaded sector {:?}: {} minerals, {} deposits, {} hazards",
                    coord,
                    content.minerals.len(),
                    content.deposits.len(),
                    content.mines.len() + content.turrets.len() + content.black_holes.len()
                );
                self.sectors.insert(
                    coord,
                    Sector {
                        coord,
                        seed: content.seed,
                        owned,
                    },
                );
            }
        }
    }

    /// Evict every sector farther than `cleanup_radius` (Chebyshev) from
    /// the player's sector, despawning exactly the entities it owns.
    pub fn evict_far(&mut self, world: &mut World, player_pos: DVec2, config: &GameConfig) {
        let (cx, cy) = sector_of(player_pos, config.gen.sector_size);
        let r = config.cleanup_radius;
        let far: Vec<(i32, i32)> = self
            .sectors
            .keys()
            .copied()
            .filter(|&(sx, sy)| (sx - cx).abs().max((sy - cy).abs()) > r)
            .collect();
        for coord in far {
            if let Some(sector) = self.sectors.remove(&coord) {
                for id in sector.owned {
                    // Minerals may already be gone via the distance cull.
                    let _ = world.despawn(id);
                }
                log::debug!("evicted sector {:?}", coord);
            }
        }
    }
}

/// Instantiate generated sector content into the arena. Returns the owned
/// entity ids in spawn order.
fn spawn_content(world: &mut World, content: &SectorContent) -> Vec<Entity> {
    let mut owned = Vec::with_capacity(
        content.minerals.len()
            + content.deposits.len()
            + content.mines.len()
            + content.turrets.len()
            + content.black_holes.len(),
    );

    for m in &content.minerals {
        owned.push(world.spawn((
            Transform2::from_position(m.pos),
            Mineral {
                kind: m.kind,
                value: m.value,
                size: m.size,
                depth: m.depth,
            },
        )));
    }
    for d in &content.deposits {
        owned.push(world.spawn((
            Transform2::from_position(d.pos),
            Deposit {
                zone: d.zone,
                richness: d.richness,
                tier: d.tier,
                radius: d.radius,
            },
        )));
    }
    for m in &content.mines {
        owned.push(world.spawn((
            Transform2::from_position(m.pos),
            Mine {
                trigger_radius: m.trigger_radius,
                blast_radius: m.blast_radius,
                damage: m.damage,
                pulse: m.pulse_offset,
                arm_timer: Mine::ARM_DELAY,
            },
        )));
    }
    for t in &content.turrets {
        owned.push(world.spawn((
            Transform2::from_position(t.pos),
            Turret {
                range: t.range,
                fire_interval: t.fire_interval,
                cooldown: t.fire_interval,
                aim: t.aim_offset,
                bolt_damage: t.bolt_damage,
            },
        )));
    }
    for b in &content.black_holes {
        owned.push(world.spawn((
            Transform2::from_position(b.pos),
            BlackHole {
                horizon_radius: b.horizon_radius,
                influence_radius: b.influence_radius,
                swirl: b.swirl_offset,
            },
        )));
    }

    owned
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::MineralType;
    use std::collections::HashSet;

    fn test_config() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn world_point_maps_to_expected_sector() {
        assert_eq!(sector_of(DVec2::new(15_000.0, -5_000.0), 10_000.0), (1, -1));
        assert_eq!(sector_of(DVec2::ZERO, 10_000.0), (0, 0));
        assert_eq!(sector_of(DVec2::new(-0.1, 9_999.9), 10_000.0), (-1, 0));
    }

    #[test]
    fn load_radius_three_loads_49_sectors() {
        let mut config = test_config();
        config.load_radius = 3;
        let mut world = World::new();
        let mut sectors = SectorManager::new(1);
        sectors.ensure_loaded(&mut world, DVec2::ZERO, &config);
        assert_eq!(sectors.loaded_count(), 49);
    }

    #[test]
    fn ensure_loaded_is_idempotent() {
        let config = test_config();
        let mut world = World::new();
        let mut sectors = SectorManager::new(1);
        sectors.ensure_loaded(&mut world, DVec2::ZERO, &config);
        let count = sectors.loaded_count();
        let entities = world.len();
        sectors.ensure_loaded(&mut world, DVec2::ZERO, &config);
        sectors.evict_far(&mut world, DVec2::ZERO, &config);
        assert_eq!(sectors.loaded_count(), count);
        assert_eq!(world.len(), entities);
    }

    #[test]
    fn owned_ids_are_disjoint_across_sectors() {
        let config = test_config();
        let mut world = World::new();
        let mut sectors = SectorManager::new(7);
        sectors.ensure_loaded(&mut world, DVec2::ZERO, &config);
        let mut seen = HashSet::new();
        for sector in sectors.iter() {
            for id in &sector.owned {
                assert!(seen.insert(*id), "entity owned by two sectors");
            }
        }
    }

    #[test]
    fn eviction_removes_exactly_the_owned_entities() {
        let config = test_config();
        let sector_size = config.gen.sector_size;
        let mut world = World::new();
        let mut sectors = SectorManager::new(3);
        sectors.ensure_loaded(&mut world, DVec2::ZERO, &config);

        let evicted: Vec<Entity> = sectors
            .iter()
            .filter(|s| s.coord.0 <= -(config.cleanup_radius - config.load_radius))
            .flat_map(|s| s.owned.iter().copied())
            .collect();
        assert!(!evicted.is_empty());

        // Fly far enough east that the western edge exceeds cleanup_radius.
        let new_pos = DVec2::new(
            (config.cleanup_radius - config.load_radius + 1) as f64 * sector_size,
            0.0,
        );
        sectors.ensure_loaded(&mut world, new_pos, &config);
        sectors.evict_far(&mut world, new_pos, &config);

        let (cx, cy) = sector_of(new_pos, sector_size);
        for sector in sectors.iter() {
            let cheb = (sector.coord.0 - cx).abs().max((sector.coord.1 - cy).abs());
            assert!(cheb <= config.cleanup_radius, "far sector kept in cache");
        }
        for id in evicted {
            assert!(!world.contains(id), "evicted entity still live");
        }
        // Entities of surviving sectors are untouched.
        for sector in sectors.iter() {
            for id in &sector.owned {
                assert!(world.contains(*id), "surviving sector lost an entity");
            }
        }
    }

    #[test]
    fn evicted_sector_regenerates_byte_identical_minerals() {
        let config = test_config();
        let mut world = World::new();
        let mut sectors = SectorManager::new(99);

        let snapshot = |world: &mut World| {
            let mut all: Vec<(u64, u64, MineralType, u64)> = world
                .query_mut::<(&Transform2, &Mineral)>()
                .into_iter()
                .map(|(_, (t, m))| {
                    (
                        t.position.x.to_bits(),
                        t.position.y.to_bits(),
                        m.kind,
                        m.value.to_bits(),
                    )
                })
                .collect();
            all.sort_by_key(|&(x, y, _, _)| (x, y));
            all
        };

        sectors.ensure_loaded(&mut world, DVec2::ZERO, &config);
        let before = snapshot(&mut world);

        // Fly away far enough to evict everything, then come back.
        let far = DVec2::splat(50.0 * config.gen.sector_size);
        sectors.ensure_loaded(&mut world, far, &config);
        sectors.evict_far(&mut world, far, &config);
        sectors.ensure_loaded(&mut world, DVec2::ZERO, &config);
        sectors.evict_far(&mut world, DVec2::ZERO, &config);

        assert_eq!(snapshot(&mut world), before);
    }

    #[test]
    fn eviction_tolerates_already_culled_minerals() {
        let config = test_config();
        let mut world = World::new();
        let mut sectors = SectorManager::new(11);
        sectors.ensure_loaded(&mut world, DVec2::ZERO, &config);

        // Simulate the density cull removing a sector-owned mineral first.
        let victim = sectors
            .iter()
            .flat_map(|s| s.owned.iter().copied())
            .find(|&id| world.get::<&Mineral>(id).is_ok())
            .expect("some sector mineral");
        world.despawn(victim).unwrap();

        let far = DVec2::splat(100.0 * config.gen.sector_size);
        sectors.evict_far(&mut world, far, &config);
        assert_eq!(sectors.loaded_count(), 0);
    }
}
