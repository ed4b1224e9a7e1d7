#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Slot assignment for randomized nexus hubs.
//!
//! Every entry point takes the caller's random generator and a list of
//! candidate levels that already passed the filters, and returns a
//! [`nexus_randomizer_core::RandomizerAssignment`] aligned with the
//! template's level doors. Seeding through [`rng_from_label`] makes a run
//! reproducible from a short label.

mod affinity;
mod atlas;
mod derange;
mod seed;
mod stock;
mod supply;

pub use affinity::{
    affinity_randomize, historical_template, hub_affinities, Hub, AFFINITY_SLOTS, ENTITY_WEIGHT,
    HISTORICAL_LEVEL_DOORS, HISTORICAL_TEMPLATE_NAME, HUB_CAPACITY, QUARTILE_SIZE,
};
pub use atlas::{atlas_randomize, AtlasAssignConfig};
pub use derange::{derange, DerangementError};
pub use seed::{assignment_fingerprint, rng_from_label, seed_from_label};
pub use stock::{stock_randomize, StockDoorMode};
pub use supply::{ensure_supply, SupplyError};
