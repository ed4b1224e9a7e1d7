//! Hub templates: the fixed door slots a randomized nexus is built from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DoorSet, KeyTier, LevelId};

/// Name reported by generated linear templates.
pub const LINEAR_TEMPLATE_NAME: &str = "linear";
/// Largest level count a linear template accepts.
pub const LINEAR_TEMPLATE_MAX_LEVELS: usize = 256;

const LINEAR_FIRST_DOOR_ID: u32 = 200;
const LINEAR_BACK_DOOR_ID: u32 = 199;
const LINEAR_DOOR_CYCLE: [u8; 4] = [5, 23, 6, 7];
const LINEAR_BACK_DOOR_SET: u8 = 1;
const LINEAR_BACK_DOOR_LEVEL: &str = "_bak_";

/// Identifier of a door entity within the template level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoorId(u32);

impl DoorId {
    /// Creates a new door identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// A single door of a hub template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSlot {
    /// Level the door leads to in the unmodified template.
    pub level: String,
    /// Door visual type.
    pub door: DoorSet,
    /// Key tier awarded for clearing the level behind the door; -1 when none.
    pub key_get: i32,
}

/// Errors raised while building a template.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A linear template was requested with an unsupported level count.
    #[error("num_levels must be between 1 and {max} inclusive, got {count}")]
    InvalidLevelCount {
        /// Requested level count.
        count: usize,
        /// Largest accepted level count.
        max: usize,
    },
}

/// Ordered door layout of a hub level.
///
/// Level doors are filled by the randomizer; other doors (return doors and
/// decoration) keep their template contents. Level doors are kept stably
/// sorted by the key tier and then the theme of their door set, so every tier
/// occupies a contiguous run of slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NexusTemplate {
    name: String,
    level_slots: Vec<(DoorId, DoorSlot)>,
    other_slots: Vec<(DoorId, DoorSlot)>,
}

impl NexusTemplate {
    /// Builds a template from its doors, keeping those accepted by
    /// `is_level_door` as level doors and every other door as static.
    pub fn from_doors<F>(
        name: impl Into<String>,
        doors: impl IntoIterator<Item = (DoorId, DoorSlot)>,
        mut is_level_door: F,
    ) -> Self
    where
        F: FnMut(&DoorSlot) -> bool,
    {
        let (level_slots, other_slots) = doors
            .into_iter()
            .partition(|(_, slot)| is_level_door(slot));
        Self::with_slots(name.into(), level_slots, other_slots)
    }

    /// Generates a single-corridor template with `count` level doors cycling
    /// through the four key tiers, plus one return door.
    pub fn linear(count: usize) -> Result<Self, TemplateError> {
        if count == 0 || count > LINEAR_TEMPLATE_MAX_LEVELS {
            return Err(TemplateError::InvalidLevelCount {
                count,
                max: LINEAR_TEMPLATE_MAX_LEVELS,
            });
        }

        let level_slots = (0..count)
            .map(|index| {
                let slot = DoorSlot {
                    level: format!("level_{index}"),
                    door: DoorSet::new(LINEAR_DOOR_CYCLE[index % LINEAR_DOOR_CYCLE.len()]),
                    key_get: (index % KeyTier::ALL.len()) as i32,
                };
                (DoorId::new(LINEAR_FIRST_DOOR_ID + index as u32), slot)
            })
            .collect();
        let back_door = DoorSlot {
            level: LINEAR_BACK_DOOR_LEVEL.to_owned(),
            door: DoorSet::new(LINEAR_BACK_DOOR_SET),
            key_get: -1,
        };

        Ok(Self::with_slots(
            LINEAR_TEMPLATE_NAME.to_owned(),
            level_slots,
            vec![(DoorId::new(LINEAR_BACK_DOOR_ID), back_door)],
        ))
    }

    fn with_slots(
        name: String,
        mut level_slots: Vec<(DoorId, DoorSlot)>,
        other_slots: Vec<(DoorId, DoorSlot)>,
    ) -> Self {
        level_slots.sort_by_key(|(_, slot)| door_order_key(slot.door));
        Self {
            name,
            level_slots,
            other_slots,
        }
    }

    /// Template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label suitable for listing templates to a user.
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{} ({} levels)", self.name, self.level_slots.len())
    }

    /// Number of level doors to fill.
    #[must_use]
    pub fn level_door_count(&self) -> usize {
        self.level_slots.len()
    }

    /// Level doors in slot order.
    #[must_use]
    pub fn level_slots(&self) -> &[(DoorId, DoorSlot)] {
        &self.level_slots
    }

    /// Static doors in template order.
    #[must_use]
    pub fn other_slots(&self) -> &[(DoorId, DoorSlot)] {
        &self.other_slots
    }

    /// Identifiers of the level doors in slot order.
    #[must_use]
    pub fn level_door_ids(&self) -> Vec<DoorId> {
        self.level_slots.iter().map(|(id, _)| *id).collect()
    }

    /// Door visual type of every level door in slot order.
    #[must_use]
    pub fn level_door_sets(&self) -> Vec<DoorSet> {
        self.level_slots.iter().map(|(_, slot)| slot.door).collect()
    }

    /// Key reward of every level door in slot order.
    #[must_use]
    pub fn level_key_rewards(&self) -> Vec<i32> {
        self.level_slots.iter().map(|(_, slot)| slot.key_get).collect()
    }

    /// Level each level door leads to in the unmodified template.
    #[must_use]
    pub fn builtin_levels(&self) -> Vec<LevelId> {
        self.level_slots
            .iter()
            .map(|(_, slot)| LevelId::new(slot.level.as_str()))
            .collect()
    }
}

fn door_order_key(door: DoorSet) -> (usize, u8) {
    match door.info() {
        Some(info) => (info.key_tier().index(), info.sprite_set().value()),
        None => (KeyTier::ALL.len(), u8::MAX),
    }
}

/// Recomputes the key reward of every door from the tiers present.
///
/// A door awards the key of its own tier, promoted while the next tier up has
/// no doors at all, so a template without silver doors hands out silver keys
/// nowhere and gold keys from its wood doors instead. Doors without a tier
/// award nothing.
pub fn assign_key_rewards(slots: &mut [(DoorId, DoorSlot)]) {
    let mut doors_per_tier = [0usize; 4];
    for (_, slot) in slots.iter() {
        if let Some(tier) = slot.door.key_tier() {
            doors_per_tier[tier.index()] += 1;
        }
    }

    let top = KeyTier::Red.index();
    for (_, slot) in slots.iter_mut() {
        slot.key_get = match slot.door.key_tier() {
            Some(tier) => {
                let mut reward = tier.index();
                while reward < top && doors_per_tier[reward + 1] == 0 {
                    reward += 1;
                }
                reward as i32
            }
            None => -1,
        };
    }
}
