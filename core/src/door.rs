//! Door visual types, their tile themes and the key tiers they imply.

use serde::{Deserialize, Serialize};

/// Tile theme of a door or a tile, using the level format's sprite set values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpriteSet {
    /// Placeholder sprite set carried by the unthemed door set 0.
    None,
    /// Mansion theme.
    Mansion,
    /// Forest theme.
    Forest,
    /// City theme.
    City,
    /// Laboratory theme.
    Laboratory,
    /// Virtual (tutorial) theme.
    Virtual,
}

impl SpriteSet {
    /// Raw sprite set value used in tile histograms.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Mansion => 1,
            Self::Forest => 2,
            Self::City => 3,
            Self::Laboratory => 4,
            Self::Virtual => 5,
        }
    }
}

/// Key type awarded by, or required to open, a door.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyTier {
    /// Lowest tier; the door is open from the start.
    Wood,
    /// Second tier.
    Silver,
    /// Third tier.
    Gold,
    /// Highest tier.
    Red,
}

impl KeyTier {
    /// Every tier in ascending order.
    pub const ALL: [KeyTier; 4] = [Self::Wood, Self::Silver, Self::Gold, Self::Red];

    /// Zero-based index of the tier, 0 for wood through 3 for red.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Wood => 0,
            Self::Silver => 1,
            Self::Gold => 2,
            Self::Red => 3,
        }
    }

    /// Resolves a tier from its index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Wood),
            1 => Some(Self::Silver),
            2 => Some(Self::Gold),
            3 => Some(Self::Red),
            _ => None,
        }
    }
}

/// Theme and key tier implied by a door visual type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DoorInfo {
    sprite_set: SpriteSet,
    key_tier: KeyTier,
}

impl DoorInfo {
    const fn new(sprite_set: SpriteSet, key_tier: KeyTier) -> Self {
        Self {
            sprite_set,
            key_tier,
        }
    }

    /// Tile theme drawn on the door.
    #[must_use]
    pub const fn sprite_set(&self) -> SpriteSet {
        self.sprite_set
    }

    /// Key tier implied by the door.
    #[must_use]
    pub const fn key_tier(&self) -> KeyTier {
        self.key_tier
    }
}

// Indexed by door set value. Entry 0 has no theme but still counts as a wood
// door for key tiers and tier buckets.
const DOOR_TABLE: [Option<DoorInfo>; 27] = {
    use KeyTier::{Gold, Red, Silver, Wood};
    use SpriteSet::{City, Forest, Laboratory, Mansion, Virtual};
    [
        Some(DoorInfo::new(SpriteSet::None, Wood)),
        Some(DoorInfo::new(Mansion, Wood)),
        Some(DoorInfo::new(Mansion, Gold)),
        Some(DoorInfo::new(Mansion, Red)),
        Some(DoorInfo::new(Mansion, Wood)),
        Some(DoorInfo::new(Forest, Wood)),
        Some(DoorInfo::new(Forest, Gold)),
        Some(DoorInfo::new(Forest, Red)),
        Some(DoorInfo::new(Forest, Wood)),
        Some(DoorInfo::new(Forest, Wood)),
        Some(DoorInfo::new(Forest, Gold)),
        Some(DoorInfo::new(Forest, Red)),
        Some(DoorInfo::new(Forest, Wood)),
        Some(DoorInfo::new(City, Wood)),
        Some(DoorInfo::new(City, Gold)),
        Some(DoorInfo::new(City, Red)),
        Some(DoorInfo::new(City, Wood)),
        Some(DoorInfo::new(Laboratory, Wood)),
        Some(DoorInfo::new(Laboratory, Gold)),
        Some(DoorInfo::new(Laboratory, Red)),
        Some(DoorInfo::new(Laboratory, Wood)),
        Some(DoorInfo::new(Virtual, Wood)),
        Some(DoorInfo::new(Mansion, Silver)),
        Some(DoorInfo::new(Forest, Silver)),
        Some(DoorInfo::new(City, Silver)),
        Some(DoorInfo::new(Laboratory, Silver)),
        Some(DoorInfo::new(Forest, Silver)),
    ]
};

/// Door visual type as stored on a level door entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoorSet(u8);

impl DoorSet {
    /// Creates a door set from its raw value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Raw door set value.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Theme and key tier of the door, or `None` for values past the door table.
    #[must_use]
    pub fn info(&self) -> Option<DoorInfo> {
        DOOR_TABLE.get(usize::from(self.0)).copied().flatten()
    }

    /// Key tier implied by the door, if any.
    #[must_use]
    pub fn key_tier(&self) -> Option<KeyTier> {
        self.info().map(|info| info.key_tier())
    }

    /// Tile theme drawn on the door, if known.
    #[must_use]
    pub fn sprite_set(&self) -> Option<SpriteSet> {
        self.info().map(|info| info.sprite_set())
    }
}
