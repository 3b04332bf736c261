use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, VariantNames};

use crate::ItemCode;

pub const VICTORY_ITEM: &str = "A New Future";
pub const PROGRESSIVE_SHARD: &str = "Progressive Shard";
pub const SPEED_UPGRADE: &str = "Progressive Speed Upgrade";
pub const THE_CAPTAIN: &str = "The Captain";
pub const FASHION_WEEBOH: &str = "Fashion Weeboh";

// Extra copies added to the pool when permanent speed upgrades are enabled.
pub const SPEED_UPGRADE_BONUS: usize = 6;

// Upgrades sold by the Captain, with the number of levels of each.
// Sizes both the extra pool copies and the purchase locations.
pub const CAPTAIN_UPGRADES: [(&str, usize); 6] = [
    ("Max Health Upgrade", 4),
    ("Max Lives Upgrade", 1),
    ("Max Energy Upgrade", 4),
    ("Item Rarity Upgrade", 6),
    ("Sparks in Shard Upgrade", 3),
    ("Starting Sparks Upgrade", 3),
];

// Default weights used to draw filler once the useful and filler pools run dry.
pub const FILLER_CONSUMABLES: [(&str, u32); 6] = [
    ("Anti-Spark 10 bundle", 15),
    ("Anti-Spark 100 bundle", 10),
    ("Anti-Spark 250 bundle", 5),
    ("Anti-Spark 500 bundle", 2),
    ("Anti-Spark 750 bundle", 2),
    ("Anti-Spark 1k bundle", 1),
];

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Classification: u8 {
        const PROGRESSION = 0b001;
        const USEFUL = 0b010;
    }
}

impl Classification {
    pub const FILLER: Classification = Classification::empty();

    pub fn is_progression(self) -> bool {
        self.contains(Classification::PROGRESSION)
    }

    pub fn is_useful(self) -> bool {
        self.contains(Classification::USEFUL)
    }
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumString, VariantNames, Serialize, Deserialize,
)]
pub enum ItemType {
    Victory,
    Shard,
    Filler,
    Ability,
    AntiSparkBundle,
    Npc,
    Speed,
    Upgrade,
    // Synthetic unlock token; never sent over the network.
    Event,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub name: String,
    pub item_type: ItemType,
    pub classification: Classification,
    pub code: ItemCode,
    pub quantity: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub item_type: ItemType,
    pub classification: Classification,
    pub code: Option<ItemCode>,
}

impl Item {
    pub fn new(data: &ItemData, classification: Classification) -> Item {
        Item {
            name: data.name.clone(),
            item_type: data.item_type,
            classification,
            code: Some(data.code),
        }
    }

    pub fn event(name: &str) -> Item {
        Item {
            name: name.to_string(),
            item_type: ItemType::Event,
            classification: Classification::PROGRESSION,
            code: None,
        }
    }

    pub fn is_event(&self) -> bool {
        self.code.is_none()
    }

    pub fn is_progression(&self) -> bool {
        self.classification.is_progression()
    }
}

pub fn item_table() -> Vec<ItemData> {
    use ItemType::*;
    let progression = Classification::PROGRESSION;
    let useful = Classification::USEFUL;
    let filler = Classification::FILLER;

    let mut table: Vec<(&str, ItemType, Classification, ItemCode, usize)> = vec![
        (VICTORY_ITEM, Victory, progression, 0, 0),
        (PROGRESSIVE_SHARD, Shard, progression, 1, 9),
        ("Shard Shop Filler Item", Filler, filler, 2, 0),
        ("Wraith's Hourglass", Ability, progression, 3, 1),
        ("Heir's Javelin", Ability, progression, 4, 1),
        ("Sage's Cowl", Ability, progression, 5, 1),
        ("Anti-Spark 10 bundle", AntiSparkBundle, filler, 6, 0),
        ("Anti-Spark 100 bundle", AntiSparkBundle, filler, 7, 0),
        ("Anti-Spark 250 bundle", AntiSparkBundle, useful, 8, 0),
        ("Anti-Spark 500 bundle", AntiSparkBundle, useful, 9, 0),
        ("Anti-Spark 750 bundle", AntiSparkBundle, useful, 10, 0),
        ("Anti-Spark 1k bundle", AntiSparkBundle, useful, 11, 0),
        ("Wraith", Npc, progression, 12, 0),
        ("Niada", Npc, progression, 13, 0),
        ("Daro", Npc, progression, 14, 0),
        (THE_CAPTAIN, Npc, progression, 15, 0),
        (FASHION_WEEBOH, Npc, filler, 16, 0),
        (SPEED_UPGRADE, Speed, progression, 17, 0),
    ];
    for (i, &(name, _)) in CAPTAIN_UPGRADES.iter().enumerate() {
        table.push((name, Upgrade, useful, 18 + i as ItemCode, 0));
    }

    table
        .into_iter()
        .map(|(name, item_type, classification, code, quantity)| ItemData {
            name: name.to_string(),
            item_type,
            classification,
            code,
            quantity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_union_counts_as_progression() {
        let very_useful = Classification::PROGRESSION | Classification::USEFUL;
        assert!(very_useful.is_progression());
        assert!(very_useful.is_useful());
        assert!(!Classification::FILLER.is_progression());
        assert!(!Classification::FILLER.is_useful());
    }

    #[test]
    fn test_filler_consumables_are_catalog_items() {
        let table = item_table();
        for (name, weight) in FILLER_CONSUMABLES {
            assert!(weight > 0);
            assert!(table.iter().any(|x| x.name == name), "{name}");
        }
    }

    #[test]
    fn test_event_items_have_no_code() {
        let item = Item::event("Shard1ShopRegion1Unlock");
        assert!(item.is_event());
        assert!(item.is_progression());
        assert_eq!(item.item_type, ItemType::Event);
    }
}
