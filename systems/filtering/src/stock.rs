use std::collections::BTreeSet;

use log::info;
use nexus_randomizer_core::{predicates_pass, Args, LevelId, NexusTemplate, TriState};

use crate::level_sets::{
    StockGroup, DEVCLIP_LEVEL, INFINI_LEVEL, LEVELS_STOCK, OLD_TUTORIAL_LEVEL, YOTTA_LEVEL,
};

/// Membership constraints applied to the stock level pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StockFilterConfig {
    /// Levels the template itself links to.
    pub builtin: TriState,
    /// Any stock level.
    pub stock: TriState,
    /// Forest hub levels.
    pub forest: TriState,
    /// Mansion hub levels.
    pub mansion: TriState,
    /// City hub levels.
    pub city: TriState,
    /// Laboratory hub levels.
    pub lab: TriState,
    /// New tutorial levels.
    pub tutorials: TriState,
    /// The difficult challenge levels.
    pub difficults: TriState,
    /// The hardest difficult level on its own.
    pub yotta: TriState,
    /// The retired first tutorial level.
    pub old_tutorial: TriState,
    /// The developer clip level.
    pub devclip: TriState,
    /// The endless level.
    pub infini: TriState,
}

impl Default for StockFilterConfig {
    fn default() -> Self {
        Self::from_args(&Args::new())
    }
}

impl StockFilterConfig {
    /// Reads the filter from flat string arguments.
    #[must_use]
    pub fn from_args(args: &Args) -> Self {
        let tri = |key: &str, default: &str| TriState::from_arg(args, key, default);
        Self {
            builtin: tri("builtin-filter", "y"),
            stock: tri("stock-filter", ""),
            forest: tri("forest-filter", ""),
            mansion: tri("mansion-filter", ""),
            city: tri("city-filter", ""),
            lab: tri("lab-filter", ""),
            tutorials: tri("tutorials-filter", ""),
            difficults: tri("difficults-filter", ""),
            yotta: tri("yotta-filter", "n"),
            old_tutorial: tri("old-tutorial-filter", "n"),
            devclip: tri("devclip-filter", "n"),
            infini: tri("infini-filter", "n"),
        }
    }
}

/// Returns the stock pool levels passing the filter.
///
/// The pool is the template's built-in levels in slot order followed by the
/// stock list, without repeats.
#[must_use]
pub fn stock_filter_levels(template: &NexusTemplate, config: &StockFilterConfig) -> Vec<LevelId> {
    let builtin = template.builtin_levels();
    let builtin_set: BTreeSet<&str> = builtin.iter().map(LevelId::as_str).collect();

    let mut seen = BTreeSet::new();
    let pool = builtin
        .iter()
        .map(LevelId::as_str)
        .chain(LEVELS_STOCK.iter().copied())
        .filter(|level| seen.insert(*level));

    let result: Vec<LevelId> = pool
        .filter(|&level| {
            predicates_pass([
                (config.builtin, builtin_set.contains(level)),
                (config.stock, LEVELS_STOCK.iter().any(|&stock| stock == level)),
                (config.forest, StockGroup::Forest.contains(level)),
                (config.mansion, StockGroup::Mansion.contains(level)),
                (config.city, StockGroup::City.contains(level)),
                (config.lab, StockGroup::Laboratory.contains(level)),
                (config.tutorials, StockGroup::Tutorials.contains(level)),
                (config.difficults, StockGroup::Difficults.contains(level)),
                (config.yotta, level == YOTTA_LEVEL),
                (config.old_tutorial, level == OLD_TUTORIAL_LEVEL),
                (config.devclip, level == DEVCLIP_LEVEL),
                (config.infini, level == INFINI_LEVEL),
            ])
        })
        .map(LevelId::new)
        .collect();
    info!("{} stock levels pass the stock filter", result.len());
    result
}

#[cfg(test)]
mod tests {
    use nexus_randomizer_core::{DoorId, DoorSet, DoorSlot};

    use super::*;

    fn forest_template() -> NexusTemplate {
        let doors = ["downhill", "shadedgrove", "dahlia", "fields"]
            .into_iter()
            .enumerate()
            .map(|(index, level)| {
                let slot = DoorSlot {
                    level: level.to_owned(),
                    door: DoorSet::new(5),
                    key_get: 0,
                };
                (DoorId::new(index as u32), slot)
            });
        NexusTemplate::from_doors("forest", doors, |_| true)
    }

    #[test]
    fn defaults_select_builtin_levels() {
        let levels = stock_filter_levels(&forest_template(), &StockFilterConfig::default());
        let names: Vec<&str> = levels.iter().map(LevelId::as_str).collect();
        assert_eq!(names, ["downhill", "shadedgrove", "dahlia", "fields"]);
    }

    #[test]
    fn forbidden_specials_are_dropped() {
        let mut args = Args::new();
        let _ = args.insert("builtin-filter".to_owned(), String::new());
        let _ = args.insert("difficults-filter".to_owned(), "y".to_owned());
        let levels = stock_filter_levels(&forest_template(), &StockFilterConfig::from_args(&args));
        let names: Vec<&str> = levels.iter().map(LevelId::as_str).collect();
        assert_eq!(names.len(), 7);
        assert!(!names.contains(&YOTTA_LEVEL));
        assert_eq!(names[0], "kilodifficult");
    }

    #[test]
    fn pool_has_no_repeats() {
        let mut args = Args::new();
        let _ = args.insert("builtin-filter".to_owned(), String::new());
        let _ = args.insert("infini-filter".to_owned(), String::new());
        let _ = args.insert("devclip-filter".to_owned(), String::new());
        let _ = args.insert("old-tutorial-filter".to_owned(), String::new());
        let _ = args.insert("yotta-filter".to_owned(), String::new());
        let levels = stock_filter_levels(&forest_template(), &StockFilterConfig::from_args(&args));
        assert_eq!(levels.len(), LEVELS_STOCK.len());
    }
}
