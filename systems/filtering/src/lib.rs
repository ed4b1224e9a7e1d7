#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Candidate selection for the nexus randomizer.
//!
//! Filters turn the catalog (or the fixed stock pool) into the ordered list of
//! levels the assignment systems may place. Every filter is configured by a
//! typed record read leniently from flat string arguments, and combines
//! boolean level properties with the [`TriState`](nexus_randomizer_core::TriState)
//! rules: any required property suffices, any forbidden property rejects.

mod atlas;
mod community;
mod level_sets;
mod stock;

pub use atlas::{
    atlas_filter_levels, AtlasFilterConfig, AtlasFilterInputs, ATLAS_MAX_SS_DEFAULT,
    ATLAS_MAX_TIME_DEFAULT, ATLAS_MIN_SS_DEFAULT, ATLAS_MIN_TIME_DEFAULT,
};
pub use community::{CommunityNodeId, CommunityReachability, CommunityTree, WantTree};
pub use level_sets::{
    StockGroup, DEVCLIP_LEVEL, INFINI_LEVEL, LEVELS_CMP, LEVELS_STOCK, OLD_TUTORIAL_LEVEL,
    YOTTA_LEVEL,
};
pub use stock::{stock_filter_levels, StockFilterConfig};
