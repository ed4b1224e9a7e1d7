use log::info;
use nexus_randomizer_core::{
    DoorId, DoorSet, DoorSlot, KeyTier, LevelCatalog, LevelId, LevelMeta, NexusTemplate,
    RandomizerAssignment, RankScores, SpriteSet,
};
use rand::{seq::SliceRandom, Rng};

use crate::{atlas::select_window, AtlasAssignConfig};

/// Slots in the historical four-hub layout.
pub const AFFINITY_SLOTS: usize = 64;
/// Slots of one hub in the historical layout.
pub const QUARTILE_SIZE: usize = 16;
/// Slots each hub offers per key tier in the historical layout.
pub const HUB_CAPACITY: usize = 4;
/// Name reported by [`historical_template`].
pub const HISTORICAL_TEMPLATE_NAME: &str = "historical";
/// Weight of one allowlisted entity relative to one themed tile.
pub const ENTITY_WEIGHT: f64 = 50.0;

/// Door visual of each slot in the historical layout: sixteen per hub, four
/// per key tier.
pub const HISTORICAL_LEVEL_DOORS: [u8; AFFINITY_SLOTS] = [
    5, 5, 5, 5, 23, 23, 23, 23, 10, 10, 10, 10, 11, 11, 11, 11, //
    1, 1, 1, 1, 22, 22, 22, 22, 2, 2, 2, 2, 3, 3, 3, 3, //
    13, 13, 13, 13, 24, 24, 24, 24, 14, 14, 14, 14, 15, 15, 15, 15, //
    17, 17, 17, 17, 25, 25, 25, 25, 18, 18, 18, 18, 19, 19, 19, 19,
];

/// Themed hubs of the historical layout, in slot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hub {
    /// Forest hub.
    Forest,
    /// Mansion hub.
    Mansion,
    /// City hub.
    City,
    /// Laboratory hub.
    Laboratory,
}

impl Hub {
    /// Every hub in slot order.
    pub const ALL: [Hub; 4] = [Self::Forest, Self::Mansion, Self::City, Self::Laboratory];

    /// Tile theme counted towards the hub.
    #[must_use]
    pub const fn sprite_set(self) -> SpriteSet {
        match self {
            Self::Forest => SpriteSet::Forest,
            Self::Mansion => SpriteSet::Mansion,
            Self::City => SpriteSet::City,
            Self::Laboratory => SpriteSet::Laboratory,
        }
    }

    /// Enemy entity types native to the hub's theme.
    #[must_use]
    pub const fn entities(self) -> &'static [&'static str] {
        match self {
            Self::Forest => &[
                "enemy_bear",
                "enemy_critter",
                "enemy_porcupine",
                "enemy_stoneboss",
                "enemy_stonebro",
                "enemy_wolf",
            ],
            Self::Mansion => &[
                "enemy_book",
                "enemy_butler",
                "enemy_chest_scrolls",
                "enemy_chest_treasure",
                "enemy_gargoyle_big",
                "enemy_gargoyle_small",
                "enemy_knight",
                "enemy_maid",
            ],
            Self::City => &[
                "enemy_trash_bag_1",
                "enemy_trash_ball",
                "enemy_trash_beast",
                "enemy_trash_can",
                "enemy_trash_tire",
                "enemy_spring_ball",
            ],
            Self::Laboratory => &[
                "enemy_flag",
                "enemy_slime_ball",
                "enemy_slime_barrel",
                "enemy_slime_beast",
            ],
        }
    }

    /// Hub whose theme matches `sprite_set`, if any.
    #[must_use]
    pub const fn of(sprite_set: SpriteSet) -> Option<Self> {
        match sprite_set {
            SpriteSet::Forest => Some(Self::Forest),
            SpriteSet::Mansion => Some(Self::Mansion),
            SpriteSet::City => Some(Self::City),
            SpriteSet::Laboratory => Some(Self::Laboratory),
            SpriteSet::None | SpriteSet::Virtual => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Forest => 0,
            Self::Mansion => 1,
            Self::City => 2,
            Self::Laboratory => 3,
        }
    }
}

/// Normalised affinity of a level towards each hub, indexed in [`Hub::ALL`] order.
///
/// Themed tiles count once and allowlisted entities count
/// [`ENTITY_WEIGHT`] times. A level with no themed content, or no metadata,
/// is equally drawn to every hub.
#[must_use]
pub fn hub_affinities(meta: Option<&LevelMeta>) -> [f64; 4] {
    let mut scores = [0.0; 4];
    if let Some(meta) = meta {
        for hub in Hub::ALL {
            let tiles = meta.tile_count(hub.sprite_set()) as f64;
            let entities: u64 = hub.entities().iter().map(|name| meta.entity_count(name)).sum();
            scores[hub.index()] = tiles + ENTITY_WEIGHT * entities as f64;
        }
    }

    let total: f64 = scores.iter().sum();
    if total <= 0.0 {
        return [0.25; 4];
    }
    scores.map(|score| score / total)
}

/// Builds the historical four-hub template from [`HISTORICAL_LEVEL_DOORS`].
///
/// Door ids follow slot order and the key reward of every door is its tier.
#[must_use]
pub fn historical_template() -> NexusTemplate {
    let doors = HISTORICAL_LEVEL_DOORS.iter().enumerate().map(|(slot, door)| {
        let slot_info = DoorSlot {
            level: format!("{HISTORICAL_TEMPLATE_NAME}_{slot}"),
            door: DoorSet::new(*door),
            key_get: ((slot % QUARTILE_SIZE) / HUB_CAPACITY) as i32,
        };
        (DoorId::new(slot as u32), slot_info)
    });
    NexusTemplate::from_doors(HISTORICAL_TEMPLATE_NAME, doors, |_| true)
}

/// Places levels into the template's level doors by difficulty tier and
/// thematic affinity.
///
/// Selection uses the same difficulty window as atlas assignment, and the
/// selected levels are chunked easiest-first by key tier the same way. Each
/// tier's level doors are grouped by the hub their door set is drawn in.
/// Within a chunk the levels with the strongest single affinity choose
/// first, each taking its favourite hub that still has a free door of the
/// tier; levels left over when every hub is full take the tier's unthemed
/// doors. Each hub group is shuffled across its doors. Door visuals and key
/// rewards stay those of the template.
pub fn affinity_randomize<R>(
    rng: &mut R,
    candidates: &[LevelId],
    ranks: &RankScores,
    template: &NexusTemplate,
    catalog: &LevelCatalog,
    config: &AtlasAssignConfig,
) -> RandomizerAssignment
where
    R: Rng + ?Sized,
{
    let slots = template.level_door_count();
    let selected = select_window(rng, candidates, ranks, config, slots);
    info!(
        "selected {} of {} candidates for {slots} themed slots",
        selected.len(),
        candidates.len()
    );

    let mut assignment = RandomizerAssignment::unfilled(template);
    let mut remaining = selected.into_iter();
    for tier in KeyTier::ALL {
        let mut hub_slots: [Vec<usize>; 4] = Default::default();
        let mut unthemed = Vec::new();
        for (slot, door) in assignment.doors.iter().enumerate() {
            if door.key_tier() != Some(tier) {
                continue;
            }
            match door.sprite_set().and_then(Hub::of) {
                Some(hub) => hub_slots[hub.index()].push(slot),
                None => unthemed.push(slot),
            }
        }
        let tier_size = hub_slots.iter().map(Vec::len).sum::<usize>() + unthemed.len();
        let chunk: Vec<LevelId> = remaining.by_ref().take(tier_size).collect();

        let mut groups: [Vec<LevelId>; 4] = Default::default();
        let mut leftover = Vec::new();
        for (level, preferences) in quartile_order(&chunk, catalog) {
            let hub = preferences
                .into_iter()
                .find(|hub| groups[hub.index()].len() < hub_slots[hub.index()].len());
            match hub {
                Some(hub) => groups[hub.index()].push(level.clone()),
                None => leftover.push(level.clone()),
            }
        }

        for hub in Hub::ALL {
            let group = &mut groups[hub.index()];
            group.shuffle(rng);
            for (&slot, level) in hub_slots[hub.index()].iter().zip(group.drain(..)) {
                assignment.levels[slot] = Some(level);
            }
        }
        leftover.shuffle(rng);
        for (slot, level) in unthemed.into_iter().zip(leftover) {
            assignment.levels[slot] = Some(level);
        }
    }
    assignment
}

/// Orders a quartile by descending peak affinity, pairing each level with
/// its hubs from most to least preferred. Ties keep difficulty order.
fn quartile_order<'a>(
    chunk: &'a [LevelId],
    catalog: &LevelCatalog,
) -> Vec<(&'a LevelId, [Hub; 4])> {
    let mut ordered: Vec<(&LevelId, [f64; 4])> = chunk
        .iter()
        .map(|level| (level, hub_affinities(catalog.get(level.as_str()))))
        .collect();
    ordered.sort_by(|(_, a), (_, b)| peak(b).total_cmp(&peak(a)));

    ordered
        .into_iter()
        .map(|(level, affinities)| {
            let mut preferences = Hub::ALL;
            preferences.sort_by(|a, b| affinities[b.index()].total_cmp(&affinities[a.index()]));
            (level, preferences)
        })
        .collect()
}

fn peak(affinities: &[f64; 4]) -> f64 {
    affinities.iter().copied().fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn themed(sprite_set: SpriteSet, tiles: u64) -> LevelMeta {
        let mut meta = LevelMeta {
            atlas_id: 1,
            ..LevelMeta::default()
        };
        let _ = meta.tiles.insert(sprite_set.value(), tiles);
        meta
    }

    #[test]
    fn affinities_normalise_and_weight_entities() {
        let mut meta = themed(SpriteSet::Forest, 100);
        let _ = meta.entities.insert("enemy_maid".to_owned(), 2);
        let affinities = hub_affinities(Some(&meta));
        assert!((affinities.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((affinities[Hub::Forest.index()] - 0.5).abs() < 1e-12);
        assert!((affinities[Hub::Mansion.index()] - 0.5).abs() < 1e-12);
        assert_eq!(hub_affinities(None), [0.25; 4]);
        assert_eq!(hub_affinities(Some(&LevelMeta::default())), [0.25; 4]);
    }

    #[test]
    fn historical_doors_follow_the_key_layout() {
        for (slot, door) in HISTORICAL_LEVEL_DOORS.iter().enumerate() {
            let tier = DoorSet::new(*door).key_tier().expect("tiered door");
            assert_eq!(tier.index(), (slot % QUARTILE_SIZE) / HUB_CAPACITY);
            let hub = Hub::ALL[slot / QUARTILE_SIZE];
            assert_eq!(DoorSet::new(*door).sprite_set(), Some(hub.sprite_set()));
        }
    }

    #[test]
    fn historical_template_rewards_the_door_tier() {
        let template = historical_template();
        assert_eq!(template.level_door_count(), AFFINITY_SLOTS);
        assert!(template.other_slots().is_empty());
        for (_, slot) in template.level_slots() {
            let tier = slot.door.key_tier().expect("tiered door");
            assert_eq!(slot.key_get, tier.index() as i32);
        }
        assert_eq!(Hub::of(SpriteSet::Virtual), None);
        assert_eq!(Hub::of(SpriteSet::City), Some(Hub::City));
    }

    #[test]
    fn strongest_affinity_chooses_first() {
        let mut catalog = LevelCatalog::new();
        let chunk: Vec<LevelId> = (0..6).map(|i| LevelId::new(format!("l{i}"))).collect();
        // Every level leans to the city; l5 leans hardest, l0 barely.
        for (index, level) in chunk.iter().enumerate() {
            let mut meta = themed(SpriteSet::City, 10 + 10 * index as u64);
            let _ = meta.tiles.insert(SpriteSet::Forest.value(), 10);
            let _ = catalog.insert(level.clone(), meta);
        }
        let order = quartile_order(&chunk, &catalog);
        let names: Vec<&str> = order.iter().map(|(level, _)| level.as_str()).collect();
        assert_eq!(names, ["l5", "l4", "l3", "l2", "l1", "l0"]);
        assert_eq!(order[0].1[0], Hub::City);
        assert_eq!(order[0].1[1], Hub::Forest);
    }
}
