//! Resolves `--template` values into hub templates.

use std::{collections::BTreeMap, path::Path};

use anyhow::{bail, Context, Result};
use log::debug;
use nexus_randomizer_core::{
    arg, assign_key_rewards, Args, DoorId, DoorSet, DoorSlot, LevelCatalog, NexusTemplate,
    LINEAR_TEMPLATE_NAME,
};
use nexus_randomizer_system_assignment::{historical_template, HISTORICAL_TEMPLATE_NAME};
use serde::Deserialize;

use crate::dataset::read_json;

/// Preprocessed template file: the template level's doors keyed by entity id.
#[derive(Debug, Deserialize)]
struct TemplateFile {
    doors: BTreeMap<String, TemplateDoor>,
}

#[derive(Debug, Deserialize)]
struct TemplateDoor {
    level: String,
    door: u8,
    #[serde(default)]
    key_get: Option<i32>,
}

/// Loads the template named by `source`.
///
/// `linear:N` and `linear` (with the `num-levels` argument) build generated
/// corridors and `historical` is the four-hub affinity layout; anything else
/// is a path to a template JSON file. A file door is
/// a level door when its level exists in the catalog.
pub(crate) fn load_template(
    source: &str,
    args: &Args,
    catalog: &LevelCatalog,
) -> Result<NexusTemplate> {
    if let Some(count) = linear_count(source, args)? {
        return Ok(NexusTemplate::linear(count)?);
    }
    if source == HISTORICAL_TEMPLATE_NAME {
        return Ok(historical_template());
    }

    let path = Path::new(source);
    let file: TemplateFile = read_json(path)?;
    let mut doors = Vec::with_capacity(file.doors.len());
    let mut missing_keys = false;
    for (id, door) in file.doors {
        let id: u32 = id
            .parse()
            .with_context(|| format!("door id '{id}' in {} is not a number", path.display()))?;
        missing_keys |= door.key_get.is_none();
        let slot = DoorSlot {
            level: door.level,
            door: DoorSet::new(door.door),
            key_get: door.key_get.unwrap_or(-1),
        };
        doors.push((DoorId::new(id), slot));
    }
    doors.sort_by_key(|(id, _)| *id);
    if missing_keys {
        debug!("{} lacks key rewards; deriving them", path.display());
        assign_key_rewards(&mut doors);
    }

    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(source)
        .to_owned();
    Ok(NexusTemplate::from_doors(name, doors, |slot| {
        catalog.contains(&slot.level)
    }))
}

fn linear_count(source: &str, args: &Args) -> Result<Option<usize>> {
    let count = if source == LINEAR_TEMPLATE_NAME {
        arg(args, "num-levels", "")
    } else if let Some(count) = source.strip_prefix("linear:") {
        count
    } else {
        return Ok(None);
    };
    match count.trim().parse::<usize>() {
        Ok(count) => Ok(Some(count)),
        Err(_) => bail!("num_levels invalid or unset: '{count}'"),
    }
}
