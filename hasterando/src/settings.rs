use std::ops::RangeInclusive;

use anyhow::{bail, Result};
use hasterando_game::items::FILLER_CONSUMABLES;
use hasterando_game::{Catalog, ShardNum, NUM_SHARDS};
use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, VariantNames};

use crate::regions::CheckType;
use crate::GenerationError;

pub const SHARD_GOAL_RANGE: RangeInclusive<usize> = 1..=NUM_SHARDS;
pub const PER_SHARD_SHOP_QUANTITY_RANGE: RangeInclusive<usize> = 1..=25;
pub const GLOBAL_SHOP_QUANTITY_RANGE: RangeInclusive<usize> = 1..=100;
pub const PER_SHARD_FRAGMENT_QUANTITY_RANGE: RangeInclusive<usize> = 1..=25;
pub const GLOBAL_FRAGMENT_QUANTITY_RANGE: RangeInclusive<usize> = 1..=50;

#[derive(
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumString,
    VariantNames,
)]
pub enum SanityMode {
    #[default]
    Off,
    PerShard,
    Global,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ItemCount {
    pub item: String,
    pub count: usize,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct FillerItemWeight {
    pub item: String,
    pub weight: u32,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct RandomizerSettings {
    // Shard holding the victory item.
    pub shard_goal: usize,
    pub remove_post_victory_locations: bool,
    pub shopsanity: SanityMode,
    pub pershard_shopsanity_quantity: usize,
    pub global_shopsanity_quantity: usize,
    pub fragmentsanity: SanityMode,
    pub pershard_fragmentsanity_quantity: usize,
    pub global_fragmentsanity_quantity: usize,
    pub npc_shuffle: bool,
    pub speed_upgrade: bool,
    pub captains_upgrades: bool,
    pub weeboh_purchases: bool,
    pub start_inventory: Vec<ItemCount>,
    pub exclude_locations: Vec<String>,
    pub filler_items: Vec<FillerItemWeight>,
    pub random_seed: Option<u64>,
}

impl Default for RandomizerSettings {
    fn default() -> Self {
        RandomizerSettings {
            shard_goal: 10,
            remove_post_victory_locations: true,
            shopsanity: SanityMode::Off,
            pershard_shopsanity_quantity: 10,
            global_shopsanity_quantity: 50,
            fragmentsanity: SanityMode::Off,
            pershard_fragmentsanity_quantity: 10,
            global_fragmentsanity_quantity: 30,
            npc_shuffle: false,
            speed_upgrade: false,
            captains_upgrades: false,
            weeboh_purchases: false,
            start_inventory: vec![],
            exclude_locations: vec![],
            filler_items: FILLER_CONSUMABLES
                .iter()
                .map(|&(item, weight)| FillerItemWeight {
                    item: item.to_string(),
                    weight,
                })
                .collect(),
            random_seed: None,
        }
    }
}

fn check_range(name: &str, value: usize, range: RangeInclusive<usize>) -> Result<()> {
    if !range.contains(&value) {
        bail!(GenerationError::Configuration(format!(
            "{name} is {value}, expected {}..={}",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

impl RandomizerSettings {
    /// Number of shard regions in the graph: everything past the goal is dropped
    /// when post-victory locations are removed.
    pub fn num_shard_regions(&self) -> usize {
        if self.remove_post_victory_locations {
            self.shard_goal
        } else {
            NUM_SHARDS
        }
    }

    pub fn within_shard_goal(&self, shard: Option<ShardNum>) -> bool {
        match shard {
            Some(shard) => shard <= self.num_shard_regions(),
            None => true,
        }
    }

    pub fn sanity_mode(&self, check_type: CheckType) -> SanityMode {
        match check_type {
            CheckType::Shop => self.shopsanity,
            CheckType::Fragment => self.fragmentsanity,
        }
    }

    /// Number of checks in each chain of the given type under the current mode.
    pub fn check_quantity(&self, check_type: CheckType) -> usize {
        match (check_type, self.sanity_mode(check_type)) {
            (_, SanityMode::Off) => 0,
            (CheckType::Shop, SanityMode::PerShard) => self.pershard_shopsanity_quantity,
            (CheckType::Shop, SanityMode::Global) => self.global_shopsanity_quantity,
            (CheckType::Fragment, SanityMode::PerShard) => self.pershard_fragmentsanity_quantity,
            (CheckType::Fragment, SanityMode::Global) => self.global_fragmentsanity_quantity,
        }
    }

    /// (owning shard, quantity) for every segmented chain of the given type.
    /// Global chains always hang off shard 1.
    pub fn check_chains(&self, check_type: CheckType) -> Vec<(ShardNum, usize)> {
        let quantity = self.check_quantity(check_type);
        match self.sanity_mode(check_type) {
            SanityMode::Off => vec![],
            SanityMode::PerShard => (1..=self.num_shard_regions())
                .map(|shard| (shard, quantity))
                .collect(),
            SanityMode::Global => vec![(1, quantity)],
        }
    }

    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        check_range("shard_goal", self.shard_goal, SHARD_GOAL_RANGE)?;
        check_range(
            "pershard_shopsanity_quantity",
            self.pershard_shopsanity_quantity,
            PER_SHARD_SHOP_QUANTITY_RANGE,
        )?;
        check_range(
            "global_shopsanity_quantity",
            self.global_shopsanity_quantity,
            GLOBAL_SHOP_QUANTITY_RANGE,
        )?;
        check_range(
            "pershard_fragmentsanity_quantity",
            self.pershard_fragmentsanity_quantity,
            PER_SHARD_FRAGMENT_QUANTITY_RANGE,
        )?;
        check_range(
            "global_fragmentsanity_quantity",
            self.global_fragmentsanity_quantity,
            GLOBAL_FRAGMENT_QUANTITY_RANGE,
        )?;

        for x in &self.start_inventory {
            catalog.item(&x.item)?;
        }
        for name in &self.exclude_locations {
            catalog.location(name)?;
        }

        if self.filler_items.iter().map(|x| x.weight as u64).sum::<u64>() == 0 {
            bail!(GenerationError::Configuration(
                "filler_items needs at least one positive weight".to_string()
            ));
        }
        for x in &self.filler_items {
            if catalog.item(&x.item)?.classification.is_progression() {
                bail!(GenerationError::Configuration(format!(
                    "progression item {:?} cannot be used as filler",
                    x.item
                )));
            }
        }
        Ok(())
    }
}

pub fn parse_randomizer_settings(settings_json: &str) -> Result<RandomizerSettings> {
    let mut des = serde_json::Deserializer::from_str(settings_json);
    let settings = serde_path_to_error::deserialize(&mut des)?;
    Ok(settings)
}
