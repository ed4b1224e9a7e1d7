//! Fixed level lists: the stock campaign and the curated comparison set.

/// Every stock level, grouped by hub: forest, mansion, city and laboratory
/// (16 each), the eight difficult levels, the three new tutorials, then the
/// old tutorial, the developer clip level and the infinite level.
pub static LEVELS_STOCK: [&str; 78] = [
    "downhill", "shadedgrove", "dahlia", "fields",
    "momentum", "fireflyforest", "tunnels", "momentum2",
    "suntemple", "ascent", "summit", "grasscave",
    "den", "autumnforest", "garden", "hyperdifficult",
    "atrium", "secretpassage", "alcoves", "mezzanine",
    "cave", "cliffsidecaves", "library", "courtyard",
    "precarious", "treasureroom", "arena", "ramparts",
    "moontemple", "observatory", "parapets", "brimstone",
    "vacantlot", "sprawl", "development", "abandoned",
    "park", "boxes", "chemworld", "factory",
    "tunnel", "basement", "scaffold", "cityrun",
    "clocktower", "concretetemple", "alley", "hideout",
    "control", "ferrofluid", "titan", "satellite",
    "vat", "venom", "security", "mary",
    "wiringfixed", "containment", "orb", "pod",
    "mary2", "coretemple", "abyss", "dome",
    "kilodifficult", "megadifficult", "teradifficult", "gigadifficult",
    "petadifficult", "exadifficult", "zettadifficult", "yottadifficult",
    "newtutorial1", "newtutorial2", "newtutorial3", "tutorial0",
    "devclip", "exec func ruin user",
];

/// Curated set of custom levels used by the comparison predicate.
pub static LEVELS_CMP: [&str; 109] = [
    "4M00N-2041", "8pixelbit-hit-2057", "Abandoned-Core-2060",
    "Abandoned-Prison-1881", "Acropark-2-745", "Acropark-370",
    "Ashy-Beam-1733", "At-Sea-1838", "Awareness-2024",
    "Awkward-2042", "Blinkys-Basement-1599", "Blueprint-1642",
    "Boxedy-1865", "Cascade-1493", "Centipede-1845",
    "Chambers-1623", "Chocolate-sundae-1021", "Cliffside-Climb-1787",
    "Close-Quarters-2073", "Contrast-161", "Cookie-Cutter-449",
    "Creme-Brulee-2116", "Crystal-Cave-474", "Cyberspace-2126",
    "Debugging-117", "Desert-dungeon-1495", "Dust-Chambers-1968",
    "Dusty-shelves-753", "Equidream-2082", "Equifree-845",
    "Equizone-1374", "Falling-Star-2090", "Final-Mental-Interface-2112",
    "Forgotten-1418", "Forlorn-1521", "Fragmentation-1791",
    "GM02-2059", "Heist-827", "Highruins-Refurbish-889",
    "Highway-121", "Hoard-2028", "Imagination-2125",
    "Kaizo---Impulse-956", "Lab-Pad-843", "Last-Ditch-Effort-1687",
    "Leftovers-2145", "Library-One-729", "Locked-Mansion-v2-3187",
    "love-climb-1488", "Maelstrom-840", "Magistraight-842",
    "Mandingo-1382", "Mangrove-825", "Marigold-847",
    "Mashed-Potatoes-943", "Mathematical-1055", "Meander-1089",
    "Melange-741", "Metal-Space-930", "Metamagical-735",
    "Metro-Tunnel-1723", "Midnight-lake-1855", "Milkshake-1348",
    "Moon-Changer-1139", "Murasaki-1739", "Mutilation-1786",
    "Muy-Simpatica-1207", "Nestea-Blue-2111", "No-Jumping-1737",
    "Observation-Tower-1765", "osu-1847", "Pico-Difficult-1689",
    "Puruple-1905", "Radiotower-1539", "Refract-1782",
    "Retrace-1652", "Revel-2075", "Roof-n-1971",
    "Rooftop-Run-547", "Ruined-Civilization-350", "Ruined-Temple-1328",
    "Ruined-Tower-809", "Sankaku-2036", "Shade-750",
    "Skyline-1788", "Solemn-1989", "Starlight-Zone-1997",
    "Starlit-City-1519", "Stone-Frame-2029", "Tutorial-Extended-1713",
    "The-Flooded-Caves-2131", "This-Map-is-Orange-1888", "This-Map-is-Purple-1895",
    "To-the-skies-1593", "Tower-796", "Tower-Construction-1026",
    "Treasure-hill-751", "Twin-Temples-903", "Vertigo-2181",
    "Virt-1714", "Virtual-Circus-1607", "Water-Temple-2083",
    "Wilco-Revisited-2103", "Willows-1825", "Wolf-Chase--Updated-3207",
    "Wonderland-2038", "Wooxen-Ae-1813", "Wornscrape-983",
    "Ypsilon-Andromedae-2108",
];

/// Named subsets of [`LEVELS_STOCK`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StockGroup {
    /// Forest hub levels.
    Forest,
    /// Mansion hub levels.
    Mansion,
    /// City hub levels.
    City,
    /// Laboratory hub levels.
    Laboratory,
    /// The `*difficult` challenge levels.
    Difficults,
    /// The new tutorial levels.
    Tutorials,
}

impl StockGroup {
    /// Levels belonging to the group, in campaign order.
    #[must_use]
    pub fn levels(self) -> &'static [&'static str] {
        let range = match self {
            Self::Forest => 0..16,
            Self::Mansion => 16..32,
            Self::City => 32..48,
            Self::Laboratory => 48..64,
            Self::Difficults => 64..72,
            Self::Tutorials => 72..75,
        };
        &LEVELS_STOCK[range]
    }

    /// Reports whether the level belongs to the group.
    #[must_use]
    pub fn contains(self, level: &str) -> bool {
        self.levels().iter().any(|&name| name == level)
    }
}

/// The hardest difficult level.
pub const YOTTA_LEVEL: &str = "yottadifficult";
/// The retired first tutorial level.
pub const OLD_TUTORIAL_LEVEL: &str = "tutorial0";
/// The developer clip showcase.
pub const DEVCLIP_LEVEL: &str = "devclip";
/// The endless level.
pub const INFINI_LEVEL: &str = "exec func ruin user";

#[cfg(test)]
mod tests {
    use super::{StockGroup, LEVELS_STOCK};

    #[test]
    fn groups_slice_the_stock_list() {
        assert_eq!(StockGroup::Forest.levels()[0], "downhill");
        assert_eq!(StockGroup::Laboratory.levels()[15], "dome");
        assert_eq!(StockGroup::Difficults.levels().len(), 8);
        assert!(StockGroup::Tutorials.contains("newtutorial3"));
        assert!(!StockGroup::Tutorials.contains("tutorial0"));
        assert_eq!(LEVELS_STOCK[LEVELS_STOCK.len() - 1], "exec func ruin user");
    }
}
