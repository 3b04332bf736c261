use anyhow::{Context, Result};
use hashbrown::HashSet;
use hasterando_game::items::{PROGRESSIVE_SHARD, VICTORY_ITEM};
use hasterando_game::{get_apid, Catalog, Item, LocationCode, LocationData, LocationFlag};
use hasterando_logic::Requirement;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    regions::{shard_region_name, CheckType, LocationIdx, RegionIdx, World},
    settings::{RandomizerSettings, SanityMode},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProgressType {
    #[default]
    Default,
    // Still receives an item, but never a progression one.
    Excluded,
}

#[derive(Clone, Debug)]
pub struct Location {
    pub name: String,
    // None for event locations, which exist only to hold a locked unlock item.
    pub code: Option<LocationCode>,
    pub region: RegionIdx,
    // Checked on top of the owning region being reachable.
    pub requirement: Requirement,
    pub placed_item: Option<Item>,
    pub progress_type: ProgressType,
}

impl Location {
    pub fn new(name: &str, code: Option<LocationCode>, region: RegionIdx) -> Location {
        Location {
            name: name.to_string(),
            code,
            region,
            requirement: Requirement::Free,
            placed_item: None,
            progress_type: ProgressType::Default,
        }
    }

    pub fn address(&self) -> Option<u64> {
        self.code.map(get_apid)
    }

    pub fn is_event(&self) -> bool {
        self.code.is_none()
    }

    /// A real location still waiting for an item from the pool.
    pub fn is_placeable(&self) -> bool {
        self.code.is_some() && self.placed_item.is_none()
    }

    pub fn can_hold_progression(&self) -> bool {
        self.is_placeable() && self.progress_type != ProgressType::Excluded
    }
}

/// Extra rule for a location on top of its region's reachability.
pub fn location_requirement(data: &LocationData, settings: &RandomizerSettings) -> Requirement {
    if let Some(vendor) = &data.vendor {
        // Vendors only open up in the hub after the first shard.
        let mut reqs = vec![Requirement::make_item(PROGRESSIVE_SHARD, 1)];
        if settings.npc_shuffle {
            reqs.push(Requirement::make_item(vendor, 1));
        }
        return Requirement::make_and(reqs);
    }
    match (data.flag, data.shard) {
        (LocationFlag::Boss, Some(shard)) => Requirement::make_item(PROGRESSIVE_SHARD, shard - 1),
        _ => Requirement::Free,
    }
}

fn segmented_check(
    data: &LocationData,
    settings: &RandomizerSettings,
) -> Option<(CheckType, SanityMode)> {
    let check = match data.flag {
        LocationFlag::PerShardShop => (CheckType::Shop, SanityMode::PerShard),
        LocationFlag::GlobalShop => (CheckType::Shop, SanityMode::Global),
        LocationFlag::PerShardFragment => (CheckType::Fragment, SanityMode::PerShard),
        LocationFlag::GlobalFragment => (CheckType::Fragment, SanityMode::Global),
        _ => return None,
    };
    if settings.sanity_mode(check.0) == check.1 {
        Some(check)
    } else {
        None
    }
}

// Hub and shard locations that exist in this run, with their owning region.
fn fixed_location_region(
    world: &World,
    data: &LocationData,
    settings: &RandomizerSettings,
) -> Result<Option<RegionIdx>> {
    let region = match data.flag {
        LocationFlag::Always => Some(world.menu()),
        LocationFlag::CaptainUpgrade if settings.captains_upgrades => Some(world.menu()),
        LocationFlag::WeebohPurchase if settings.weeboh_purchases => Some(world.menu()),
        LocationFlag::Boss => {
            let shard = data.shard.context("boss location without a shard")?;
            Some(world.get_region(&shard_region_name(shard))?)
        }
        _ => None,
    };
    Ok(region)
}

fn add_segmented_location(
    world: &mut World,
    data: &LocationData,
    check_type: CheckType,
    quantity: usize,
    settings: &RandomizerSettings,
) -> Result<()> {
    let (Some(shard), Some(number)) = (data.shard, data.number) else {
        return Ok(());
    };
    if number > quantity {
        return Ok(());
    }
    let size = check_type.segment_size();
    let segment = (number - 1) / size;
    let region = world.get_region(&check_type.segment_region_name(shard, segment))?;

    let mut location = Location::new(&data.name, Some(data.code), region);
    location.requirement = location_requirement(data, settings);
    world.add_location(location);

    // The last check of a full segment unlocks the next one.
    if number % size == 0 {
        let event_name = check_type.event_location_name(shard, segment);
        let idx = world.add_location(Location::new(&event_name, None, region));
        world.place_locked_item(
            idx,
            Item::event(&check_type.unlock_item_name(shard, segment + 1)),
        );
    }
    Ok(())
}

pub fn create_locations(
    world: &mut World,
    settings: &RandomizerSettings,
    catalog: &Catalog,
) -> Result<()> {
    for data in &catalog.locations {
        if !settings.within_shard_goal(data.shard) {
            continue;
        }
        if let Some((check_type, _)) = segmented_check(data, settings) {
            let quantity = settings.check_quantity(check_type);
            add_segmented_location(world, data, check_type, quantity, settings)
                .with_context(|| format!("placing {}", data.name))?;
        } else if let Some(region) = fixed_location_region(world, data, settings)? {
            let mut location = Location::new(&data.name, Some(data.code), region);
            location.requirement = location_requirement(data, settings);
            world.add_location(location);
        }
    }

    let excluded: HashSet<&str> = settings
        .exclude_locations
        .iter()
        .map(|x| x.as_str())
        .collect();
    for location in &mut world.locations {
        if excluded.contains(location.name.as_str()) {
            location.progress_type = ProgressType::Excluded;
        }
    }

    info!(
        "Created {} locations ({} events)",
        world.locations.len(),
        world.locations.iter().filter(|x| x.is_event()).count()
    );
    Ok(())
}

/// Lock the victory item onto the goal shard's boss.
pub fn place_victory_item(
    world: &mut World,
    settings: &RandomizerSettings,
    catalog: &Catalog,
) -> Result<LocationIdx> {
    let idx = world.get_location(&format!("Shard {} Boss", settings.shard_goal))?;
    let item = catalog.create_item(VICTORY_ITEM)?;
    world.place_locked_item(idx, item);
    Ok(idx)
}
