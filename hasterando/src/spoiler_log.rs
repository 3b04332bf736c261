use serde::{Deserialize, Serialize};

use crate::{
    locations::ProgressType,
    randomize::Randomization,
    settings::{RandomizerSettings, SanityMode},
};

#[derive(Serialize, Deserialize, Debug)]
pub struct SpoilerExit {
    pub name: String,
    pub target: String,
    pub requirement: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SpoilerLocation {
    pub name: String,
    pub address: Option<u64>,
    pub requirement: String,
    pub locked_item: Option<String>,
    pub excluded: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SpoilerRegion {
    pub name: String,
    pub exits: Vec<SpoilerExit>,
    pub locations: Vec<SpoilerLocation>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SpoilerItemPool {
    pub progression: Vec<String>,
    pub useful: Vec<String>,
    pub filler: Vec<String>,
    pub prefill: Vec<String>,
    pub precollected: Vec<String>,
}

/// Options the game client needs to mirror the generated run.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SlotData {
    pub shard_goal: usize,
    pub shopsanity: SanityMode,
    pub pershard_shopsanity_quantity: usize,
    pub global_shopsanity_quantity: usize,
    pub fragmentsanity: SanityMode,
    pub pershard_fragmentsanity_quantity: usize,
    pub global_fragmentsanity_quantity: usize,
    pub npc_shuffle: bool,
    pub speed_upgrades: bool,
    pub remove_post_victory_locations: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SpoilerLog {
    pub seed: u64,
    pub slot_data: SlotData,
    pub regions: Vec<SpoilerRegion>,
    pub item_pool: SpoilerItemPool,
}

pub fn get_slot_data(settings: &RandomizerSettings) -> SlotData {
    SlotData {
        shard_goal: settings.shard_goal,
        shopsanity: settings.shopsanity,
        pershard_shopsanity_quantity: settings.pershard_shopsanity_quantity,
        global_shopsanity_quantity: settings.global_shopsanity_quantity,
        fragmentsanity: settings.fragmentsanity,
        pershard_fragmentsanity_quantity: settings.pershard_fragmentsanity_quantity,
        global_fragmentsanity_quantity: settings.global_fragmentsanity_quantity,
        npc_shuffle: settings.npc_shuffle,
        speed_upgrades: settings.speed_upgrade,
        remove_post_victory_locations: settings.remove_post_victory_locations,
    }
}

fn names<'a>(items: impl Iterator<Item = &'a hasterando_game::Item>) -> Vec<String> {
    items.map(|x| x.name.clone()).collect()
}

pub fn get_spoiler_log(randomization: &Randomization, settings: &RandomizerSettings) -> SpoilerLog {
    let world = &randomization.world;
    let regions = world
        .regions
        .iter()
        .map(|region| SpoilerRegion {
            name: region.name.clone(),
            exits: region
                .exits
                .iter()
                .map(|&idx| {
                    let entrance = &world.entrances[idx];
                    SpoilerExit {
                        name: entrance.name.clone(),
                        target: world.regions[entrance.target].name.clone(),
                        requirement: entrance.requirement.to_string(),
                    }
                })
                .collect(),
            locations: region
                .locations
                .iter()
                .map(|&idx| {
                    let location = &world.locations[idx];
                    SpoilerLocation {
                        name: location.name.clone(),
                        address: location.address(),
                        requirement: location.requirement.to_string(),
                        locked_item: location.placed_item.as_ref().map(|x| x.name.clone()),
                        excluded: location.progress_type == ProgressType::Excluded,
                    }
                })
                .collect(),
        })
        .collect();

    let pool = &randomization.item_pool;
    SpoilerLog {
        seed: randomization.seed,
        slot_data: get_slot_data(settings),
        regions,
        item_pool: SpoilerItemPool {
            progression: names(pool.progression.iter()),
            useful: names(pool.useful.iter()),
            filler: names(pool.filler.iter()),
            prefill: names(pool.prefill.iter()),
            precollected: names(pool.precollected.iter()),
        },
    }
}
