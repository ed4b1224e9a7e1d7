use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};
use nexus_randomizer_core::{arg, Args, LevelId, NexusTemplate, RandomizerAssignment, SpriteSet};
use rand::{seq::SliceRandom, Rng};

use crate::derange;

/// How stock assignment treats the template's doors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StockDoorMode {
    /// Doors and keys stay where the template puts them.
    #[default]
    Normal,
    /// Doors, keys and the template's own levels move together under one
    /// random permutation. Requires the selection to be exactly the
    /// template's built-in levels; otherwise behaves like [`Self::Normal`].
    Match,
    /// Doors stay put and every built-in level moves to a different door of
    /// the same hub theme. Same precondition and fallback as [`Self::Match`].
    Hubs,
    /// Doors and keys are permuted; levels stay in shuffled selection order.
    Shuffle,
}

impl StockDoorMode {
    /// Parses the `rand-doors` form value. Unknown values shuffle doors.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "normal" => Self::Normal,
            "match" => Self::Match,
            "hubs" => Self::Hubs,
            _ => Self::Shuffle,
        }
    }

    /// Reads the mode from flat string arguments, defaulting to normal.
    #[must_use]
    pub fn from_args(args: &Args) -> Self {
        Self::parse(arg(args, "rand-doors", "normal"))
    }
}

/// Assigns stock levels to the template's level doors.
///
/// `candidates` is the stock filter result. It is shuffled and truncated to
/// the slot count; missing levels leave trailing slots unfilled.
pub fn stock_randomize<R>(
    rng: &mut R,
    candidates: &[LevelId],
    template: &NexusTemplate,
    mode: StockDoorMode,
) -> RandomizerAssignment
where
    R: Rng + ?Sized,
{
    let slots = template.level_door_count();
    let mut levels = candidates.to_vec();
    levels.shuffle(rng);
    levels.truncate(slots);
    info!("selected {} stock levels for {slots} slots", levels.len());

    let builtin = template.builtin_levels();
    let mut mode = mode;
    if matches!(mode, StockDoorMode::Match | StockDoorMode::Hubs) {
        let selected: BTreeSet<&LevelId> = levels.iter().collect();
        let expected: BTreeSet<&LevelId> = builtin.iter().collect();
        if selected != expected {
            warn!("selection differs from the built-in levels; {mode:?} falls back to normal doors");
            mode = StockDoorMode::Normal;
        }
    }

    let mut assignment = RandomizerAssignment::unfilled(template);
    for (slot, level) in assignment.levels.iter_mut().zip(levels) {
        *slot = Some(level);
    }

    match mode {
        StockDoorMode::Normal => {}
        StockDoorMode::Match => {
            let mut permutation: Vec<usize> = (0..slots).collect();
            permutation.shuffle(rng);
            assignment.doors = permutation.iter().map(|&i| assignment.doors[i]).collect();
            assignment.keys = permutation.iter().map(|&i| assignment.keys[i]).collect();
            assignment.levels = permutation
                .iter()
                .map(|&i| Some(builtin[i].clone()))
                .collect();
        }
        StockDoorMode::Hubs => {
            assignment.levels = hub_derangement(rng, template, &builtin);
        }
        StockDoorMode::Shuffle => {
            let mut permutation: Vec<usize> = (0..slots).collect();
            permutation.shuffle(rng);
            assignment.doors = permutation.iter().map(|&i| assignment.doors[i]).collect();
            assignment.keys = permutation.iter().map(|&i| assignment.keys[i]).collect();
        }
    }
    assignment
}

/// Moves every built-in level to another door of its own hub theme.
///
/// Hubs with a single level door keep their level in place.
fn hub_derangement<R>(
    rng: &mut R,
    template: &NexusTemplate,
    builtin: &[LevelId],
) -> Vec<Option<LevelId>>
where
    R: Rng + ?Sized,
{
    let mut hubs: BTreeMap<Option<SpriteSet>, Vec<usize>> = BTreeMap::new();
    for (slot, door) in template.level_door_sets().iter().enumerate() {
        hubs.entry(door.sprite_set()).or_default().push(slot);
    }

    let mut levels: Vec<Option<LevelId>> = builtin.iter().cloned().map(Some).collect();
    for (hub, slots) in &hubs {
        let Ok(permutation) = derange(rng, slots.len()) else {
            debug!("hub {hub:?} has a single door; its level stays in place");
            continue;
        };
        for (&slot, &source) in slots.iter().zip(&permutation) {
            levels[slot] = Some(builtin[slots[source]].clone());
        }
    }
    levels
}

#[cfg(test)]
mod tests {
    use nexus_randomizer_core::{DoorId, DoorSet, DoorSlot};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn two_hub_template() -> NexusTemplate {
        let doors = [
            ("downhill", 5),
            ("shadedgrove", 5),
            ("dahlia", 23),
            ("atrium", 1),
            ("secretpassage", 1),
            ("alcoves", 22),
        ]
        .into_iter()
        .enumerate()
        .map(|(index, (level, door))| {
            let slot = DoorSlot {
                level: level.to_owned(),
                door: DoorSet::new(door),
                key_get: 0,
            };
            (DoorId::new(index as u32), slot)
        });
        NexusTemplate::from_doors("two-hubs", doors, |_| true)
    }

    #[test]
    fn modes_parse_from_form_values() {
        assert_eq!(StockDoorMode::parse("normal"), StockDoorMode::Normal);
        assert_eq!(StockDoorMode::parse("match"), StockDoorMode::Match);
        assert_eq!(StockDoorMode::parse("hubs"), StockDoorMode::Hubs);
        assert_eq!(StockDoorMode::parse("yes"), StockDoorMode::Shuffle);
        assert_eq!(StockDoorMode::from_args(&Args::new()), StockDoorMode::Normal);
    }

    #[test]
    fn hubs_mode_keeps_levels_in_their_theme() {
        let template = two_hub_template();
        let builtin = template.builtin_levels();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let assignment = stock_randomize(&mut rng, &builtin, &template, StockDoorMode::Hubs);

        assert_eq!(assignment.doors, template.level_door_sets());
        for (slot, level) in assignment.levels.iter().enumerate() {
            let level = level.as_ref().expect("every slot filled");
            assert_ne!(level, &builtin[slot], "slot {slot} kept its level");
            let home = builtin.iter().position(|b| b == level).expect("built-in level");
            assert_eq!(
                template.level_door_sets()[home].sprite_set(),
                template.level_door_sets()[slot].sprite_set()
            );
        }
    }

    #[test]
    fn match_mode_falls_back_when_selection_differs() {
        let template = two_hub_template();
        let mut candidates = template.builtin_levels();
        candidates[0] = LevelId::new("fields");
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let assignment = stock_randomize(&mut rng, &candidates, &template, StockDoorMode::Match);
        assert_eq!(assignment.doors, template.level_door_sets());
        assert_eq!(assignment.keys, template.level_key_rewards());
    }

    #[test]
    fn match_mode_moves_levels_with_their_doors() {
        let template = two_hub_template();
        let builtin = template.builtin_levels();
        let doors = template.level_door_sets();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let assignment = stock_randomize(&mut rng, &builtin, &template, StockDoorMode::Match);
        for (slot, level) in assignment.levels.iter().enumerate() {
            let level = level.as_ref().expect("filled");
            let home = builtin.iter().position(|b| b == level).expect("built-in level");
            assert_eq!(assignment.doors[slot], doors[home]);
        }
    }

    #[test]
    fn short_supply_leaves_trailing_slots_empty() {
        let template = two_hub_template();
        let candidates = vec![LevelId::new("downhill"), LevelId::new("fields")];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let assignment = stock_randomize(&mut rng, &candidates, &template, StockDoorMode::Normal);
        assert_eq!(assignment.len(), 6);
        assert_eq!(assignment.filled_count(), 2);
        assert!(assignment.levels[2..].iter().all(Option::is_none));
    }
}
