use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, VariantNames};

use crate::items::{CAPTAIN_UPGRADES, FASHION_WEEBOH, THE_CAPTAIN};
use crate::{LocationCode, ShardNum, NUM_SHARDS};

pub const NUM_GLOBAL_SHOP_ITEMS: usize = 100;
pub const NUM_PER_SHARD_SHOP_ITEMS: usize = 25;
pub const NUM_GLOBAL_FRAGMENT_CLEARS: usize = 50;
pub const NUM_PER_SHARD_FRAGMENT_CLEARS: usize = 25;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumString, VariantNames, Serialize, Deserialize,
)]
pub enum LocationFlag {
    Always,
    Boss,
    PerShardShop,
    GlobalShop,
    PerShardFragment,
    GlobalFragment,
    CaptainUpgrade,
    WeebohPurchase,
}

impl LocationFlag {
    pub fn is_segmented(self) -> bool {
        matches!(
            self,
            LocationFlag::PerShardShop
                | LocationFlag::GlobalShop
                | LocationFlag::PerShardFragment
                | LocationFlag::GlobalFragment
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    pub name: String,
    pub code: LocationCode,
    pub flag: LocationFlag,
    // Shard that owns the location; global checks all live in shard 1.
    pub shard: Option<ShardNum>,
    // 1-based position within a shop or fragment-clear sequence.
    pub number: Option<usize>,
    // NPC that has to be present in the hub to buy from this location.
    pub vendor: Option<String>,
}

fn location(
    name: String,
    code: LocationCode,
    flag: LocationFlag,
    shard: Option<ShardNum>,
    number: Option<usize>,
    vendor: Option<&str>,
) -> LocationData {
    LocationData {
        name,
        code,
        flag,
        shard,
        number,
        vendor: vendor.map(|x| x.to_string()),
    }
}

pub fn location_table() -> Vec<LocationData> {
    use LocationFlag::*;
    let mut table: Vec<LocationData> = vec![];

    // IDs 1-3
    for (i, (name, vendor)) in [
        ("Wraith's Hourglass Purchase", "Wraith"),
        ("Heir's Javelin Purchase", "Niada"),
        ("Sage's Cowl Purchase", "Daro"),
    ]
    .into_iter()
    .enumerate()
    {
        table.push(location(
            name.to_string(),
            1 + i as LocationCode,
            Always,
            None,
            None,
            Some(vendor),
        ));
    }

    // IDs 4-5
    for (i, name) in [
        "Fashion Weeboh Outfit Purchase",
        "Fashion Weeboh Hat Purchase",
    ]
    .into_iter()
    .enumerate()
    {
        table.push(location(
            name.to_string(),
            4 + i as LocationCode,
            WeebohPurchase,
            None,
            None,
            Some(FASHION_WEEBOH),
        ));
    }

    // IDs 10-19
    for i in 1..=NUM_SHARDS {
        table.push(location(
            format!("Shard {i} Boss"),
            9 + i as LocationCode,
            Boss,
            Some(i),
            None,
            None,
        ));
    }

    // IDs 101-200
    for j in 1..=NUM_GLOBAL_SHOP_ITEMS {
        table.push(location(
            format!("Global Shop Item {j:03}"),
            100 + j as LocationCode,
            GlobalShop,
            Some(1),
            Some(j),
            None,
        ));
    }

    // IDs 201-450
    for i in 1..=NUM_SHARDS {
        for j in 1..=NUM_PER_SHARD_SHOP_ITEMS {
            table.push(location(
                format!("Shard {i} Shop Item {j:02}"),
                (200 + (i - 1) * NUM_PER_SHARD_SHOP_ITEMS + j) as LocationCode,
                PerShardShop,
                Some(i),
                Some(j),
                None,
            ));
        }
    }

    // IDs 451-500
    for j in 1..=NUM_GLOBAL_FRAGMENT_CLEARS {
        table.push(location(
            format!("Global Fragment Clear {j:02}"),
            450 + j as LocationCode,
            GlobalFragment,
            Some(1),
            Some(j),
            None,
        ));
    }

    // IDs 501-750
    for i in 1..=NUM_SHARDS {
        for j in 1..=NUM_PER_SHARD_FRAGMENT_CLEARS {
            table.push(location(
                format!("Shard {i} Fragment Clear {j:02}"),
                (500 + (i - 1) * NUM_PER_SHARD_FRAGMENT_CLEARS + j) as LocationCode,
                PerShardFragment,
                Some(i),
                Some(j),
                None,
            ));
        }
    }

    // IDs 751-771
    let mut code = 751;
    for (upgrade, levels) in CAPTAIN_UPGRADES {
        for level in 1..=levels {
            table.push(location(
                format!("Captain's {upgrade} {level}"),
                code,
                CaptainUpgrade,
                None,
                None,
                Some(THE_CAPTAIN),
            ));
            code += 1;
        }
    }

    table
}
