use anyhow::{bail, Context, Result};
use hashbrown::HashMap;
use hasterando_game::items::{CAPTAIN_UPGRADES, FASHION_WEEBOH, SPEED_UPGRADE_BONUS, THE_CAPTAIN};
use hasterando_game::{Catalog, Classification, Item, ItemData, ItemType};
use log::{debug, info};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::{regions::World, settings::RandomizerSettings, GenerationError};

/// Per-run classification override. Returning None keeps the catalog classification.
pub type ClassificationOverride<'a> = dyn Fn(&str) -> Option<Classification> + 'a;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ItemPool {
    pub progression: Vec<Item>,
    pub useful: Vec<Item>,
    pub filler: Vec<Item>,
    pub prefill: Vec<Item>,
    // Handed to the player at the start instead of being placed.
    pub precollected: Vec<Item>,
}

impl ItemPool {
    /// Number of items that go into locations.
    pub fn len(&self) -> usize {
        self.progression.len() + self.useful.len() + self.filler.len() + self.prefill.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.progression
            .iter()
            .chain(self.useful.iter())
            .chain(self.filler.iter())
            .chain(self.prefill.iter())
    }
}

/// Source of filler names: leftover useful items first, then leftover filler items,
/// then a weighted draw over the consumables.
#[derive(Clone, Debug)]
pub struct FillerSource {
    pub useful_pool: Vec<String>,
    pub filler_pool: Vec<String>,
    pub consumables: Vec<String>,
    weights: WeightedIndex<u32>,
}

impl FillerSource {
    pub fn new(
        useful_pool: Vec<String>,
        filler_pool: Vec<String>,
        consumables: Vec<(String, u32)>,
    ) -> Result<FillerSource> {
        let weights = WeightedIndex::new(consumables.iter().map(|x| x.1))
            .context("invalid filler weights")?;
        Ok(FillerSource {
            useful_pool,
            filler_pool,
            consumables: consumables.into_iter().map(|x| x.0).collect(),
            weights,
        })
    }

    pub fn get_filler_name(&mut self, rng: &mut StdRng) -> String {
        if let Some(name) = self.useful_pool.pop() {
            return name;
        }
        if let Some(name) = self.filler_pool.pop() {
            return name;
        }
        self.consumables[self.weights.sample(rng)].clone()
    }
}

/// Classification adjustments implied by the settings, applied when the caller's
/// override has no opinion.
pub fn default_classification_override(
    settings: &RandomizerSettings,
) -> impl Fn(&str) -> Option<Classification> + '_ {
    move |name| match name {
        THE_CAPTAIN if !settings.captains_upgrades => Some(Classification::USEFUL),
        FASHION_WEEBOH if settings.weeboh_purchases => Some(Classification::PROGRESSION),
        _ => None,
    }
}

pub fn bonus_quantity(data: &ItemData, settings: &RandomizerSettings) -> usize {
    match data.item_type {
        ItemType::Npc if settings.npc_shuffle => 1,
        ItemType::Speed if settings.speed_upgrade => SPEED_UPGRADE_BONUS,
        ItemType::Upgrade if settings.captains_upgrades => CAPTAIN_UPGRADES
            .iter()
            .find(|x| x.0 == data.name)
            .map(|x| x.1)
            .unwrap_or(0),
        _ => 0,
    }
}

pub struct PoolGeneration {
    pub item_pool: ItemPool,
    pub filler_source: FillerSource,
}

// Remove up to `count` copies of `name` from the front-most matching entries.
fn take_from_pool(pool: &mut Vec<Item>, name: &str, mut count: usize) -> usize {
    let mut taken = 0;
    pool.retain(|item| {
        if count > 0 && item.name == name {
            count -= 1;
            taken += 1;
            false
        } else {
            true
        }
    });
    taken
}

pub fn generate_item_pool(
    world: &World,
    settings: &RandomizerSettings,
    catalog: &Catalog,
    classification_override: &ClassificationOverride,
    rng: &mut StdRng,
) -> Result<PoolGeneration> {
    let default_override = default_classification_override(settings);
    let mut classifications: HashMap<String, Classification> = HashMap::new();
    let mut progression: Vec<Item> = vec![];
    let mut useful: Vec<Item> = vec![];
    let mut filler: Vec<Item> = vec![];
    let prefill: Vec<Item> = vec![];

    for data in &catalog.items {
        let classification = classification_override(&data.name)
            .or_else(|| default_override(&data.name))
            .unwrap_or(data.classification);
        classifications.insert(data.name.clone(), classification);

        let quantity = data.quantity + bonus_quantity(data, settings);
        let item = Item::new(data, classification);
        let partition = if classification.is_progression() {
            &mut progression
        } else if classification.is_useful() {
            &mut useful
        } else {
            &mut filler
        };
        partition.extend(std::iter::repeat(item).take(quantity));
    }

    // Backfill draws never pass through the capacity check.
    for x in &settings.filler_items {
        let is_progression = match classifications.get(&x.item) {
            Some(classification) => classification.is_progression(),
            None => catalog.item(&x.item)?.classification.is_progression(),
        };
        if x.weight > 0 && is_progression {
            bail!(GenerationError::Configuration(format!(
                "filler item {:?} is classified as progression for this run",
                x.item
            )));
        }
    }

    let mut precollected: Vec<Item> = vec![];
    for x in &settings.start_inventory {
        let data = catalog.item(&x.item)?;
        let mut remaining = x.count;
        for partition in [&mut progression, &mut useful, &mut filler] {
            remaining -= take_from_pool(partition, &x.item, remaining);
        }
        let item = Item::new(data, classifications[&x.item]);
        precollected.extend(std::iter::repeat(item).take(x.count));
        if remaining > 0 {
            debug!("{remaining} starting copies of {} were not in the pool", x.item);
        }
    }

    let placeable = world.num_placeable_locations();
    let eligible = world
        .locations
        .iter()
        .filter(|x| x.can_hold_progression())
        .count()
        .min(placeable.saturating_sub(prefill.len()));
    if progression.len() > eligible {
        bail!(GenerationError::Capacity {
            progression: progression.len(),
            eligible,
        });
    }
    let remaining = placeable - prefill.len() - progression.len();

    useful.shuffle(rng);
    filler.shuffle(rng);
    let consumables: Vec<(String, u32)> = settings
        .filler_items
        .iter()
        .map(|x| (x.item.clone(), x.weight))
        .collect();
    let mut filler_source = FillerSource::new(
        useful.iter().map(|x| x.name.clone()).collect(),
        filler.iter().map(|x| x.name.clone()).collect(),
        consumables,
    )?;

    let mut backfill_useful: Vec<Item> = vec![];
    let mut backfill_filler: Vec<Item> = vec![];
    for _ in 0..remaining {
        let name = filler_source.get_filler_name(rng);
        let data = catalog.item(&name)?;
        let classification = classifications
            .get(&name)
            .copied()
            .unwrap_or(data.classification);
        assert!(
            !classification.is_progression(),
            "backfill drew progression item {name:?}"
        );
        let item = Item::new(data, classification);
        if classification.is_useful() {
            backfill_useful.push(item);
        } else {
            backfill_filler.push(item);
        }
    }

    let item_pool = ItemPool {
        progression,
        useful: backfill_useful,
        filler: backfill_filler,
        prefill,
        precollected,
    };
    info!(
        "Item pool: {} progression, {} useful, {} filler, {} precollected ({} locations)",
        item_pool.progression.len(),
        item_pool.useful.len(),
        item_pool.filler.len(),
        item_pool.precollected.len(),
        placeable
    );
    Ok(PoolGeneration {
        item_pool,
        filler_source,
    })
}
