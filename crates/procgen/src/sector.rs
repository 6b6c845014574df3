//! Sector content generation.
//!
//! `generate_sector` is a pure function of (coordinates, world seed, rules):
//! the same inputs always produce the same minerals, deposits, and hazards,
//! so an evicted sector regenerates exactly when the player returns.
//! Idempotency against double-generation lives in the sector cache, not
//! here.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::mineral::{band_types, MineralType};
use crate::rng::{sector_seed, stream};
use crate::zone::{band_index, zone_at, Zone};

// Draw-stream offsets. Each concern gets its own decorrelated generator so
// adding draws to one never shifts another.
const STREAM_MINERALS: u64 = 1;
const STREAM_DEPOSITS: u64 = 2;
const STREAM_MINES: u64 = 3;
const STREAM_TURRETS: u64 = 4;
const STREAM_BLACK_HOLES: u64 = 5;

/// Per-hazard-kind spawn probability for sectors up to `max_dist` from the
/// origin. Probabilities step up band by band; the last band covers
/// everything beyond it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardBand {
    pub max_dist: f64,
    pub mine_p: f64,
    pub turret_p: f64,
    pub black_hole_p: f64,
}

/// Generator tunables. Everything here is part of the external
/// configuration surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenRules {
    /// Side length of a sector in world units.
    pub sector_size: f64,
    /// Minimum minerals per sector.
    pub mineral_base: u32,
    /// Random extra minerals per sector (0..=range).
    pub mineral_range: u32,
    /// Deposit count range per sector (inclusive).
    pub deposit_min: u32,
    pub deposit_max: u32,
    /// Base hotspot radius of a deposit; scaled by richness.
    pub deposit_radius: f64,
    /// Stepwise hazard spawn probabilities by sector-center distance.
    pub hazard_bands: Vec<HazardBand>,
    /// Max instances per passed hazard check (spawns 1..=max).
    pub mine_max: u32,
    pub turret_max: u32,
    pub black_hole_max: u32,
}

impl Default for GenRules {
    fn default() -> Self {
        Self {
            sector_size: 10_000.0,
            mineral_base: 8,
            mineral_range: 10,
            deposit_min: 3,
            deposit_max: 7,
            deposit_radius: 900.0,
            hazard_bands: vec![
                HazardBand {
                    max_dist: 15_000.0,
                    mine_p: 0.05,
                    turret_p: 0.0,
                    black_hole_p: 0.0,
                },
                HazardBand {
                    max_dist: 40_000.0,
                    mine_p: 0.15,
                    turret_p: 0.08,
                    black_hole_p: 0.02,
                },
                HazardBand {
                    max_dist: 80_000.0,
                    mine_p: 0.25,
                    turret_p: 0.18,
                    black_hole_p: 0.05,
                },
                HazardBand {
                    max_dist: 150_000.0,
                    mine_p: 0.35,
                    turret_p: 0.28,
                    black_hole_p: 0.10,
                },
                HazardBand {
                    max_dist: f64::INFINITY,
                    mine_p: 0.45,
                    turret_p: 0.38,
                    black_hole_p: 0.16,
                },
            ],
            mine_max: 3,
            turret_max: 2,
            black_hole_max: 1,
        }
    }
}

impl GenRules {
    /// Hazard probabilities for a sector whose center sits at `distance`
    /// from the origin. Empty band table means no hazards anywhere.
    fn hazard_probs(&self, distance: f64) -> (f64, f64, f64) {
        for band in &self.hazard_bands {
            if distance < band.max_dist {
                return (band.mine_p, band.turret_p, band.black_hole_p);
            }
        }
        match self.hazard_bands.last() {
            Some(band) => (band.mine_p, band.turret_p, band.black_hole_p),
            None => (0.0, 0.0, 0.0),
        }
    }
}

/// One generated mineral. `depth` is the parallax layer in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct MineralSpec {
    pub pos: DVec2,
    pub depth: f32,
    pub kind: MineralType,
    pub value: f64,
    pub size: f32,
}

/// One generated deposit: a long-lived landmark that boosts local spawn
/// density and rarity while the player is inside its radius.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositSpec {
    pub pos: DVec2,
    pub zone: Zone,
    pub richness: f32,
    pub tier: u8,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MineSpec {
    pub pos: DVec2,
    pub trigger_radius: f64,
    pub blast_radius: f64,
    pub damage: f32,
    pub pulse_offset: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurretSpec {
    pub pos: DVec2,
    pub range: f64,
    pub fire_interval: f32,
    pub bolt_damage: f32,
    pub aim_offset: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlackHoleSpec {
    pub pos: DVec2,
    pub horizon_radius: f64,
    pub influence_radius: f64,
    pub swirl_offset: f32,
}

/// Everything one sector produces. Plain data: the caller owns spawning it
/// into the entity arena.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorContent {
    pub coord: (i32, i32),
    pub seed: u64,
    pub minerals: Vec<MineralSpec>,
    pub deposits: Vec<DepositSpec>,
    pub mines: Vec<MineSpec>,
    pub turrets: Vec<TurretSpec>,
    pub black_holes: Vec<BlackHoleSpec>,
}

/// Generate the full content of sector `(sx, sy)`.
pub fn generate_sector(sx: i32, sy: i32, world_seed: u64, rules: &GenRules) -> SectorContent {
    let seed = sector_seed(world_seed, sx, sy);
    let origin = DVec2::new(sx as f64, sy as f64) * rules.sector_size;
    let center = origin + DVec2::splat(rules.sector_size * 0.5);
    let center_dist = center.length();

    // ── Minerals ────────────────────────────────────────────────────────
    let mut rng = stream(seed, STREAM_MINERALS);
    let count = rules.mineral_base + rng.next_int(rules.mineral_range + 1);
    let mut minerals = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let pos = origin
            + DVec2::new(
                rng.next_f64() * rules.sector_size,
                rng.next_f64() * rules.sector_size,
            );
        let band = band_index(pos.length());
        let types = band_types(band);
        if types.is_empty() {
            // Band with no defined type list: skip the entity, never abort
            // the sector.
            log::debug!("no mineral types for band {}, skipping", band);
            continue;
        }
        let kind = match rng.pick(types) {
            Some(kind) => *kind,
            None => continue,
        };
        let richness = rng.next_range(0.8, 1.2);
        let (size_min, size_max) = kind.size_range();
        minerals.push(MineralSpec {
            pos,
            depth: rng.next_f32(),
            kind,
            value: (kind.base_value() * richness).round(),
            size: size_min + rng.next_f32() * (size_max - size_min),
        });
    }

    // ── Deposits ────────────────────────────────────────────────────────
    let mut rng = stream(seed, STREAM_DEPOSITS);
    let span = rules.deposit_max.saturating_sub(rules.deposit_min);
    let count = rules.deposit_min + rng.next_int(span + 1);
    let mut deposits = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let pos = origin
            + DVec2::new(
                rng.next_f64() * rules.sector_size,
                rng.next_f64() * rules.sector_size,
            );
        let zone = zone_at(pos.length());
        let richness = rng.next_range(0.3, 1.0) as f32;
        let tier = ((zone.index() as u8 + 1) + u8::from(richness > 0.75)).min(6);
        deposits.push(DepositSpec {
            pos,
            zone,
            richness,
            tier,
            radius: rules.deposit_radius * (0.8 + richness as f64),
        });
    }

    // ── Hazards ─────────────────────────────────────────────────────────
    let (mine_p, turret_p, black_hole_p) = rules.hazard_probs(center_dist);

    let mut rng = stream(seed, STREAM_MINES);
    let mut mines = Vec::new();
    if rng.next_bool(mine_p) {
        let n = 1 + rng.next_int(rules.mine_max.max(1));
        for _ in 0..n {
            let pos = origin
                + DVec2::new(
                    rng.next_f64() * rules.sector_size,
                    rng.next_f64() * rules.sector_size,
                );
            mines.push(MineSpec {
                pos,
                trigger_radius: rng.next_range(60.0, 110.0),
                blast_radius: rng.next_range(240.0, 420.0),
                damage: rng.next_range(25.0, 45.0) as f32,
                pulse_offset: rng.next_f32() * std::f32::consts::TAU,
            });
        }
    }

    let mut rng = stream(seed, STREAM_TURRETS);
    let mut turrets = Vec::new();
    if rng.next_bool(turret_p) {
        let n = 1 + rng.next_int(rules.turret_max.max(1));
        for _ in 0..n {
            let pos = origin
                + DVec2::new(
                    rng.next_f64() * rules.sector_size,
                    rng.next_f64() * rules.sector_size,
                );
            turrets.push(TurretSpec {
                pos,
                range: rng.next_range(700.0, 1100.0),
                fire_interval: rng.next_range(1.2, 2.4) as f32,
                bolt_damage: rng.next_range(8.0, 16.0) as f32,
                aim_offset: rng.next_f32() * std::f32::consts::TAU,
            });
        }
    }

    let mut rng = stream(seed, STREAM_BLACK_HOLES);
    let mut black_holes = Vec::new();
    if rng.next_bool(black_hole_p) {
        let n = 1 + rng.next_int(rules.black_hole_max.max(1));
        for _ in 0..n {
            let pos = origin
                + DVec2::new(
                    rng.next_f64() * rules.sector_size,
                    rng.next_f64() * rules.sector_size,
                );
            let horizon = rng.next_range(90.0, 160.0);
            black_holes.push(BlackHoleSpec {
                pos,
                horizon_radius: horizon,
                influence_radius: horizon * rng.next_range(5.0, 8.0),
                swirl_offset: rng.next_f32() * std::f32::consts::TAU,
            });
        }
    }

    SectorContent {
        coord: (sx, sy),
        seed,
        minerals,
        deposits,
        mines,
        turrets,
        black_holes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let rules = GenRules::default();
        for &(sx, sy) in &[(0, 0), (1, -1), (-7, 12), (15, 3)] {
            let a = generate_sector(sx, sy, 777, &rules);
            let b = generate_sector(sx, sy, 777, &rules);
            assert_eq!(a, b, "sector ({}, {}) must regenerate identically", sx, sy);
        }
    }

    #[test]
    fn different_coords_or_seeds_differ() {
        let rules = GenRules::default();
        let a = generate_sector(2, 3, 777, &rules);
        let b = generate_sector(3, 2, 777, &rules);
        let c = generate_sector(2, 3, 778, &rules);
        assert_ne!(a.minerals, b.minerals);
        assert_ne!(a.minerals, c.minerals);
    }

    #[test]
    fn mineral_positions_inside_sector_bounds() {
        let rules = GenRules::default();
        let content = generate_sector(-4, 6, 42, &rules);
        let min = DVec2::new(-4.0, 6.0) * rules.sector_size;
        let max = min + DVec2::splat(rules.sector_size);
        for m in &content.minerals {
            assert!(m.pos.x >= min.x && m.pos.x < max.x);
            assert!(m.pos.y >= min.y && m.pos.y < max.y);
        }
    }

    #[test]
    fn mineral_count_within_configured_range() {
        let rules = GenRules::default();
        for sy in 0..20 {
            let content = generate_sector(0, sy, 9, &rules);
            let n = content.minerals.len() as u32;
            assert!(n >= rules.mineral_base);
            assert!(n <= rules.mineral_base + rules.mineral_range);
        }
    }

    #[test]
    fn deposits_in_range_with_valid_richness_and_tier() {
        let rules = GenRules::default();
        for sx in -10..10 {
            let content = generate_sector(sx, sx * 2, 123, &rules);
            let n = content.deposits.len() as u32;
            assert!(n >= rules.deposit_min && n <= rules.deposit_max);
            for d in &content.deposits {
                assert!(d.richness >= 0.3 && d.richness <= 1.0);
                assert!((1..=6).contains(&d.tier));
                assert_eq!(d.zone, zone_at(d.pos.length()));
            }
        }
    }

    #[test]
    fn inner_sectors_spawn_no_turrets_or_black_holes() {
        let rules = GenRules::default();
        // Band 0 has turret_p = black_hole_p = 0.
        for sx in -1..=0 {
            for sy in -1..=0 {
                let content = generate_sector(sx, sy, 5, &rules);
                assert!(content.turrets.is_empty());
                assert!(content.black_holes.is_empty());
            }
        }
    }

    #[test]
    fn far_sectors_eventually_spawn_hazards() {
        let rules = GenRules::default();
        let mut saw_mine = false;
        let mut saw_turret = false;
        let mut saw_hole = false;
        for sy in 0..120 {
            let content = generate_sector(40, sy, 5, &rules);
            saw_mine |= !content.mines.is_empty();
            saw_turret |= !content.turrets.is_empty();
            saw_hole |= !content.black_holes.is_empty();
        }
        assert!(saw_mine && saw_turret && saw_hole);
    }

    #[test]
    fn empty_hazard_table_disables_hazards() {
        let rules = GenRules {
            hazard_bands: Vec::new(),
            ..GenRules::default()
        };
        let content = generate_sector(50, 50, 1, &rules);
        assert!(content.mines.is_empty());
        assert!(content.turrets.is_empty());
        assert!(content.black_holes.is_empty());
    }
}
