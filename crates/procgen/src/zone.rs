//! Zone model: named distance bands from the world origin.
//!
//! One table is authoritative for everything: deposit zoning, live mineral
//! classification, and rarity bracket selection all read the same
//! boundaries, so the two can never disagree about where a zone ends.

use serde::{Deserialize, Serialize};

/// Named zone, ordered from the origin outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Bulk metals near the starting area.
    Industrial,
    /// Precious-metal belt.
    Precious,
    /// Crystal fields.
    Crystal,
    /// Irradiated deep space.
    Nuclear,
    /// The far frontier.
    Exotic,
}

impl Zone {
    pub const ALL: [Zone; 5] = [
        Zone::Industrial,
        Zone::Precious,
        Zone::Crystal,
        Zone::Nuclear,
        Zone::Exotic,
    ];

    /// Position of this zone in the table, 0 = innermost.
    pub fn index(&self) -> usize {
        match self {
            Zone::Industrial => 0,
            Zone::Precious => 1,
            Zone::Crystal => 2,
            Zone::Nuclear => 3,
            Zone::Exotic => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Zone::Industrial => "industrial",
            Zone::Precious => "precious",
            Zone::Crystal => "crystal",
            Zone::Nuclear => "nuclear",
            Zone::Exotic => "exotic",
        }
    }

    /// `[min, max)` distance range of this zone in world units.
    pub fn range(&self) -> (f64, f64) {
        let i = self.index();
        (
            ZONE_BOUNDS[i],
            ZONE_BOUNDS.get(i + 1).copied().unwrap_or(f64::INFINITY),
        )
    }
}

/// Lower bound of each zone; a zone extends to the next entry (the last one
/// is open-ended).
const ZONE_BOUNDS: [f64; 5] = [0.0, 15_000.0, 40_000.0, 80_000.0, 150_000.0];

/// The zone containing `distance`. Distances beyond the last defined range
/// resolve to the outermost zone; negative or non-finite input resolves to
/// the innermost.
pub fn zone_at(distance: f64) -> Zone {
    if !(distance >= 0.0) {
        return Zone::Industrial;
    }
    for zone in Zone::ALL.iter().rev() {
        if distance >= ZONE_BOUNDS[zone.index()] {
            return *zone;
        }
    }
    Zone::Industrial
}

/// Distance band index (0..5) for mineral classification. Same boundaries
/// as the zone table.
pub fn band_index(distance: f64) -> usize {
    zone_at(distance).index()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_boundaries() {
        assert_eq!(zone_at(0.0), Zone::Industrial);
        assert_eq!(zone_at(14_999.9), Zone::Industrial);
        assert_eq!(zone_at(15_000.0), Zone::Precious);
        assert_eq!(zone_at(40_000.0), Zone::Crystal);
        assert_eq!(zone_at(80_000.0), Zone::Nuclear);
        assert_eq!(zone_at(150_000.0), Zone::Exotic);
    }

    #[test]
    fn beyond_last_range_is_outermost() {
        assert_eq!(zone_at(1.0e9), Zone::Exotic);
        assert_eq!(zone_at(f64::MAX), Zone::Exotic);
    }

    #[test]
    fn degenerate_distances_resolve_innermost() {
        assert_eq!(zone_at(-5.0), Zone::Industrial);
        assert_eq!(zone_at(f64::NAN), Zone::Industrial);
    }

    #[test]
    fn ranges_tile_the_axis() {
        for pair in Zone::ALL.windows(2) {
            assert_eq!(pair[0].range().1, pair[1].range().0);
        }
        assert_eq!(Zone::Exotic.range().1, f64::INFINITY);
    }
}
