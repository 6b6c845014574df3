//! Mineral types, rarity tiers, and per-band availability tables.

use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// Rarity tier, ordered from most to least frequent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RarityTier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl RarityTier {
    pub const COUNT: usize = 6;

    pub const ALL: [RarityTier; 6] = [
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Epic,
        RarityTier::Legendary,
        RarityTier::Mythic,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            RarityTier::Common => "common",
            RarityTier::Uncommon => "uncommon",
            RarityTier::Rare => "rare",
            RarityTier::Epic => "epic",
            RarityTier::Legendary => "legendary",
            RarityTier::Mythic => "mythic",
        }
    }
}

/// Every mineable mineral in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MineralType {
    Iron,
    Copper,
    Nickel,
    Silver,
    Gold,
    Platinum,
    Quartz,
    Sapphire,
    Emerald,
    Diamond,
    Uranium,
    Thorium,
    Voidium,
    Aetherium,
    Chronite,
}

impl MineralType {
    pub const ALL: [MineralType; 15] = [
        MineralType::Iron,
        MineralType::Copper,
        MineralType::Nickel,
        MineralType::Silver,
        MineralType::Gold,
        MineralType::Platinum,
        MineralType::Quartz,
        MineralType::Sapphire,
        MineralType::Emerald,
        MineralType::Diamond,
        MineralType::Uranium,
        MineralType::Thorium,
        MineralType::Voidium,
        MineralType::Aetherium,
        MineralType::Chronite,
    ];

    pub fn tier(&self) -> RarityTier {
        match self {
            MineralType::Iron | MineralType::Copper => RarityTier::Common,
            MineralType::Nickel | MineralType::Silver | MineralType::Quartz => {
                RarityTier::Uncommon
            }
            MineralType::Gold | MineralType::Platinum => RarityTier::Rare,
            MineralType::Sapphire | MineralType::Emerald | MineralType::Uranium => {
                RarityTier::Epic
            }
            MineralType::Diamond | MineralType::Thorium | MineralType::Voidium => {
                RarityTier::Legendary
            }
            MineralType::Aetherium | MineralType::Chronite => RarityTier::Mythic,
        }
    }

    /// The zone this type is native to. Spawning inside the home zone gets a
    /// selection-weight bonus.
    pub fn home_zone(&self) -> Zone {
        match self {
            MineralType::Iron | MineralType::Copper | MineralType::Nickel => Zone::Industrial,
            MineralType::Silver | MineralType::Gold | MineralType::Platinum => Zone::Precious,
            MineralType::Quartz
            | MineralType::Sapphire
            | MineralType::Emerald
            | MineralType::Diamond => Zone::Crystal,
            MineralType::Uranium | MineralType::Thorium => Zone::Nuclear,
            MineralType::Voidium | MineralType::Aetherium | MineralType::Chronite => Zone::Exotic,
        }
    }

    /// Credit value before the per-instance richness roll.
    pub fn base_value(&self) -> f64 {
        match self {
            MineralType::Iron => 5.0,
            MineralType::Copper => 8.0,
            MineralType::Nickel => 14.0,
            MineralType::Silver => 25.0,
            MineralType::Gold => 60.0,
            MineralType::Platinum => 90.0,
            MineralType::Quartz => 20.0,
            MineralType::Sapphire => 150.0,
            MineralType::Emerald => 180.0,
            MineralType::Diamond => 400.0,
            MineralType::Uranium => 220.0,
            MineralType::Thorium => 500.0,
            MineralType::Voidium => 650.0,
            MineralType::Aetherium => 1200.0,
            MineralType::Chronite => 1500.0,
        }
    }

    /// Render tint, linear RGB.
    pub fn color(&self) -> [f32; 3] {
        match self {
            MineralType::Iron => [0.55, 0.50, 0.47],
            MineralType::Copper => [0.78, 0.45, 0.25],
            MineralType::Nickel => [0.66, 0.66, 0.60],
            MineralType::Silver => [0.85, 0.87, 0.90],
            MineralType::Gold => [1.00, 0.82, 0.25],
            MineralType::Platinum => [0.88, 0.92, 0.95],
            MineralType::Quartz => [0.90, 0.85, 0.95],
            MineralType::Sapphire => [0.20, 0.35, 0.95],
            MineralType::Emerald => [0.15, 0.80, 0.40],
            MineralType::Diamond => [0.92, 0.98, 1.00],
            MineralType::Uranium => [0.55, 0.90, 0.20],
            MineralType::Thorium => [0.35, 0.75, 0.55],
            MineralType::Voidium => [0.30, 0.10, 0.45],
            MineralType::Aetherium => [0.60, 0.85, 1.00],
            MineralType::Chronite => [1.00, 0.50, 0.85],
        }
    }

    /// (min, max) visual radius in world units.
    pub fn size_range(&self) -> (f32, f32) {
        match self.tier() {
            RarityTier::Common => (8.0, 16.0),
            RarityTier::Uncommon => (7.0, 14.0),
            RarityTier::Rare => (6.0, 12.0),
            RarityTier::Epic => (6.0, 11.0),
            RarityTier::Legendary => (5.0, 10.0),
            RarityTier::Mythic => (5.0, 9.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MineralType::Iron => "iron",
            MineralType::Copper => "copper",
            MineralType::Nickel => "nickel",
            MineralType::Silver => "silver",
            MineralType::Gold => "gold",
            MineralType::Platinum => "platinum",
            MineralType::Quartz => "quartz",
            MineralType::Sapphire => "sapphire",
            MineralType::Emerald => "emerald",
            MineralType::Diamond => "diamond",
            MineralType::Uranium => "uranium",
            MineralType::Thorium => "thorium",
            MineralType::Voidium => "voidium",
            MineralType::Aetherium => "aetherium",
            MineralType::Chronite => "chronite",
        }
    }
}

/// Mineral types the sector generator may place in each distance band
/// (band index = zone index). Bands overlap at the edges so zone borders
/// aren't hard cutoffs.
pub fn band_types(band: usize) -> &'static [MineralType] {
    const BAND_0: &[MineralType] = &[MineralType::Iron, MineralType::Copper, MineralType::Nickel];
    const BAND_1: &[MineralType] = &[
        MineralType::Iron,
        MineralType::Copper,
        MineralType::Nickel,
        MineralType::Silver,
        MineralType::Gold,
        MineralType::Platinum,
    ];
    const BAND_2: &[MineralType] = &[
        MineralType::Silver,
        MineralType::Gold,
        MineralType::Quartz,
        MineralType::Sapphire,
        MineralType::Emerald,
        MineralType::Diamond,
    ];
    const BAND_3: &[MineralType] = &[
        MineralType::Quartz,
        MineralType::Platinum,
        MineralType::Diamond,
        MineralType::Uranium,
        MineralType::Thorium,
    ];
    const BAND_4: &[MineralType] = &[
        MineralType::Uranium,
        MineralType::Thorium,
        MineralType::Voidium,
        MineralType::Aetherium,
        MineralType::Chronite,
    ];
    match band {
        0 => BAND_0,
        1 => BAND_1,
        2 => BAND_2,
        3 => BAND_3,
        4 => BAND_4,
        _ => &[],
    }
}
