//! Randomizer output and the shape checks applied before it is written.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{arg, Args, DoorId, DoorSet, LevelCatalog, LevelId, NexusTemplate};

/// Level name written behind every static door of the template.
pub const BACK_DOOR_LEVEL: &str = "_back_";
/// Level name shown in place of the real one when names are hidden.
pub const HIDDEN_LEVEL_NAME: &str = "???";

/// Which level credits the written hub reveals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CreditVisibility {
    /// Leave every author blank.
    pub hide_authors: bool,
    /// Show [`HIDDEN_LEVEL_NAME`] instead of level names.
    pub hide_names: bool,
}

impl CreditVisibility {
    /// Reads `hide-authors` and `hide-names`; any value other than empty or
    /// `"n"` hides the credit.
    #[must_use]
    pub fn from_args(args: &Args) -> Self {
        let hidden = |key: &str| !matches!(arg(args, key, ""), "" | "n");
        Self {
            hide_authors: hidden("hide-authors"),
            hide_names: hidden("hide-names"),
        }
    }
}

/// Levels, door visuals and key rewards for every level door of a template.
///
/// The three vectors are parallel and indexed by level-door slot. A `None`
/// level marks a slot the randomizer could not fill.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomizerAssignment {
    /// Level placed behind each door.
    pub levels: Vec<Option<LevelId>>,
    /// Door visual type of each slot.
    pub doors: Vec<DoorSet>,
    /// Key tier awarded by each slot.
    pub keys: Vec<i32>,
}

/// Reasons an assignment cannot be handed to the level writer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AssignmentShapeError {
    /// The level list does not match the template.
    #[error("assignment has {actual} levels but the template has {expected} level doors")]
    LevelCount {
        /// Level doors in the template.
        expected: usize,
        /// Levels in the assignment.
        actual: usize,
    },
    /// The door list does not match the template.
    #[error("assignment has {actual} doors but the template has {expected} level doors")]
    DoorCount {
        /// Level doors in the template.
        expected: usize,
        /// Doors in the assignment.
        actual: usize,
    },
    /// The key list does not match the template.
    #[error("assignment has {actual} keys but the template has {expected} level doors")]
    KeyCount {
        /// Level doors in the template.
        expected: usize,
        /// Keys in the assignment.
        actual: usize,
    },
    /// A slot has no level.
    #[error("slot {slot} has no level assigned")]
    UnfilledSlot {
        /// Index of the first unfilled slot.
        slot: usize,
    },
    /// A level is placed behind more than one door.
    #[error("level {level} is assigned to more than one slot")]
    DuplicateLevel {
        /// Repeated level.
        level: LevelId,
    },
}

impl RandomizerAssignment {
    /// Builds an assignment whose every slot is unfilled, with the template's
    /// doors and key rewards.
    #[must_use]
    pub fn unfilled(template: &NexusTemplate) -> Self {
        Self {
            levels: vec![None; template.level_door_count()],
            doors: template.level_door_sets(),
            keys: template.level_key_rewards(),
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether the assignment has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of slots with a level.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.levels.iter().filter(|level| level.is_some()).count()
    }

    /// Reports whether every slot has a level.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.levels.iter().all(Option::is_some)
    }

    /// Reorders whole (level, door, key) triples so slot `i` receives the
    /// triple previously at `permutation[i]`.
    ///
    /// `permutation` must be a permutation of the slot indices.
    pub fn permute(&mut self, permutation: &[usize]) {
        debug_assert_eq!(permutation.len(), self.len());
        self.levels = permutation.iter().map(|&i| self.levels[i].clone()).collect();
        self.doors = permutation.iter().map(|&i| self.doors[i]).collect();
        self.keys = permutation.iter().map(|&i| self.keys[i]).collect();
    }

    /// Checks that the assignment fills exactly the template's level doors
    /// with distinct levels.
    pub fn validate(&self, template: &NexusTemplate) -> Result<(), AssignmentShapeError> {
        let expected = template.level_door_count();
        if self.levels.len() != expected {
            return Err(AssignmentShapeError::LevelCount {
                expected,
                actual: self.levels.len(),
            });
        }
        if self.doors.len() != expected {
            return Err(AssignmentShapeError::DoorCount {
                expected,
                actual: self.doors.len(),
            });
        }
        if self.keys.len() != expected {
            return Err(AssignmentShapeError::KeyCount {
                expected,
                actual: self.keys.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for (slot, level) in self.levels.iter().enumerate() {
            let level = level
                .as_ref()
                .ok_or(AssignmentShapeError::UnfilledSlot { slot })?;
            if !seen.insert(level) {
                return Err(AssignmentShapeError::DuplicateLevel {
                    level: level.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validates the assignment and extends it with the template's static
    /// doors, producing the complete door table for the level writer.
    ///
    /// Authors and names come from the catalog and are blank for static doors
    /// and for levels the catalog does not know.
    pub fn with_other_doors(
        &self,
        template: &NexusTemplate,
        catalog: &LevelCatalog,
        credits: CreditVisibility,
    ) -> Result<FullAssignment, AssignmentShapeError> {
        self.validate(template)?;

        let levels: Vec<LevelId> = self.levels.iter().flatten().cloned().collect();
        let mut full = FullAssignment {
            door_ids: template.level_door_ids(),
            authors: levels
                .iter()
                .map(|level| match catalog.get(level.as_str()) {
                    Some(meta) if !credits.hide_authors => meta.author.clone(),
                    _ => String::new(),
                })
                .collect(),
            names: levels
                .iter()
                .map(|level| {
                    if credits.hide_names {
                        HIDDEN_LEVEL_NAME.to_owned()
                    } else {
                        catalog
                            .get(level.as_str())
                            .map(|meta| meta.name.clone())
                            .unwrap_or_default()
                    }
                })
                .collect(),
            levels,
            doors: self.doors.clone(),
            keys: self.keys.clone(),
        };
        for (id, slot) in template.other_slots() {
            full.door_ids.push(*id);
            full.levels.push(LevelId::new(BACK_DOOR_LEVEL));
            full.doors.push(slot.door);
            full.keys.push(0);
            full.authors.push(String::new());
            full.names.push(String::new());
        }
        Ok(full)
    }
}

/// Door table covering every door of the template, in writer order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullAssignment {
    /// Door entity ids: level doors in slot order, then static doors.
    pub door_ids: Vec<DoorId>,
    /// Level behind each door.
    pub levels: Vec<LevelId>,
    /// Door visual type of each door.
    pub doors: Vec<DoorSet>,
    /// Key tier awarded by each door.
    pub keys: Vec<i32>,
    /// Author credited for each door.
    pub authors: Vec<String>,
    /// Level name shown for each door.
    pub names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use crate::LevelMeta;

    use super::*;

    fn filled(template: &NexusTemplate) -> RandomizerAssignment {
        let mut assignment = RandomizerAssignment::unfilled(template);
        for (index, level) in assignment.levels.iter_mut().enumerate() {
            *level = Some(LevelId::new(format!("custom-{index}")));
        }
        assignment
    }

    #[test]
    fn unfilled_assignment_copies_template_doors() {
        let template = NexusTemplate::linear(4).expect("template");
        let assignment = RandomizerAssignment::unfilled(&template);
        assert_eq!(assignment.len(), 4);
        assert_eq!(assignment.filled_count(), 0);
        assert_eq!(assignment.doors, template.level_door_sets());
        assert_eq!(
            assignment.validate(&template),
            Err(AssignmentShapeError::UnfilledSlot { slot: 0 })
        );
    }

    #[test]
    fn validation_reports_each_shape_problem() {
        let template = NexusTemplate::linear(4).expect("template");

        let mut short = filled(&template);
        let _ = short.keys.pop();
        assert_eq!(
            short.validate(&template),
            Err(AssignmentShapeError::KeyCount {
                expected: 4,
                actual: 3
            })
        );

        let mut repeated = filled(&template);
        repeated.levels[3] = repeated.levels[0].clone();
        assert!(matches!(
            repeated.validate(&template),
            Err(AssignmentShapeError::DuplicateLevel { .. })
        ));

        assert_eq!(filled(&template).validate(&template), Ok(()));
    }

    #[test]
    fn permutation_moves_whole_triples() {
        let template = NexusTemplate::linear(4).expect("template");
        let mut assignment = filled(&template);
        let before = assignment.clone();
        assignment.permute(&[3, 2, 1, 0]);
        for slot in 0..4 {
            assert_eq!(assignment.levels[slot], before.levels[3 - slot]);
            assert_eq!(assignment.doors[slot], before.doors[3 - slot]);
            assert_eq!(assignment.keys[slot], before.keys[3 - slot]);
        }
    }

    fn credited_catalog(template: &NexusTemplate) -> LevelCatalog {
        filled(template)
            .levels
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(index, level)| {
                let meta = LevelMeta {
                    atlas_id: 1,
                    author: format!("author-{index}"),
                    name: format!("Level {index}"),
                    ..LevelMeta::default()
                };
                (level, meta)
            })
            .collect()
    }

    #[test]
    fn static_doors_lead_back() {
        let template = NexusTemplate::linear(4).expect("template");
        let catalog = credited_catalog(&template);
        let full = filled(&template)
            .with_other_doors(&template, &catalog, CreditVisibility::default())
            .expect("complete assignment");
        assert_eq!(full.door_ids.len(), 5);
        assert_eq!(full.door_ids[4], DoorId::new(199));
        assert_eq!(full.levels[4].as_str(), BACK_DOOR_LEVEL);
        assert_eq!(full.doors[4], DoorSet::new(1));
        assert_eq!(full.keys[4], 0);
        assert_eq!(full.authors, ["author-0", "author-1", "author-2", "author-3", ""]);
        assert_eq!(full.names, ["Level 0", "Level 1", "Level 2", "Level 3", ""]);
    }

    #[test]
    fn hidden_credits_are_blanked() {
        let template = NexusTemplate::linear(2).expect("template");
        let mut args = Args::new();
        let _ = args.insert("hide-authors".to_owned(), "y".to_owned());
        let _ = args.insert("hide-names".to_owned(), "y".to_owned());
        let credits = CreditVisibility::from_args(&args);
        assert_eq!(
            credits,
            CreditVisibility {
                hide_authors: true,
                hide_names: true
            }
        );

        let full = filled(&template)
            .with_other_doors(&template, &credited_catalog(&template), credits)
            .expect("complete assignment");
        assert_eq!(full.authors, ["", "", ""]);
        assert_eq!(full.names, [HIDDEN_LEVEL_NAME, HIDDEN_LEVEL_NAME, ""]);

        let _ = args.insert("hide-names".to_owned(), "n".to_owned());
        assert!(!CreditVisibility::from_args(&args).hide_names);
        assert_eq!(CreditVisibility::from_args(&Args::new()), CreditVisibility::default());
    }
}
