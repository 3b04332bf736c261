use anyhow::{bail, Result};
use hasterando_game::items::{PROGRESSIVE_SHARD, SPEED_UPGRADE};
use hasterando_game::{CatalogError, IndexedVec, Item, ShardNum};
use hasterando_logic::Requirement;
use log::info;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, VariantNames};

use crate::{locations::Location, settings::RandomizerSettings};

pub const MENU_REGION: &str = "Menu";

// Number of checks per segment of a shop or fragment-clear chain.
pub const SHOP_SEGMENTING: usize = 5;
pub const FRAGMENT_SEGMENTING: usize = 5;

pub type RegionIdx = usize; // Index into World.regions
pub type EntranceIdx = usize; // Index into World.entrances
pub type LocationIdx = usize; // Index into World.locations

#[derive(Clone, Debug)]
pub struct Region {
    pub name: String,
    pub exits: Vec<EntranceIdx>,
    pub locations: Vec<LocationIdx>,
}

#[derive(Clone, Debug)]
pub struct Entrance {
    pub name: String,
    pub source: RegionIdx,
    pub target: RegionIdx,
    pub requirement: Requirement,
}

/// Access graph for one generation run, together with the locations materialized into it.
/// Topology only grows while the run is being built.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub region_isv: IndexedVec<String>,
    pub regions: Vec<Region>,
    pub entrances: Vec<Entrance>,
    pub location_isv: IndexedVec<String>,
    pub locations: Vec<Location>,
}

impl World {
    pub fn add_region(&mut self, name: &str) -> RegionIdx {
        assert!(
            !self.region_isv.index_by_key.contains_key(name),
            "region {name:?} created twice"
        );
        let idx = self.region_isv.add(name);
        self.regions.push(Region {
            name: name.to_string(),
            exits: vec![],
            locations: vec![],
        });
        idx
    }

    pub fn connect(
        &mut self,
        name: &str,
        source: RegionIdx,
        target: RegionIdx,
        requirement: Requirement,
    ) -> EntranceIdx {
        let idx = self.entrances.len();
        self.entrances.push(Entrance {
            name: name.to_string(),
            source,
            target,
            requirement,
        });
        self.regions[source].exits.push(idx);
        idx
    }

    pub fn add_location(&mut self, location: Location) -> LocationIdx {
        assert!(
            !self.location_isv.index_by_key.contains_key(&location.name),
            "location {:?} created twice",
            location.name
        );
        let idx = self.location_isv.add(&location.name);
        self.regions[location.region].locations.push(idx);
        self.locations.push(location);
        idx
    }

    pub fn get_region(&self, name: &str) -> Result<RegionIdx> {
        match self.region_isv.index_by_key.get(name) {
            Some(&idx) => Ok(idx),
            None => bail!(CatalogError::UnknownRegion(name.to_string())),
        }
    }

    pub fn get_location(&self, name: &str) -> Result<LocationIdx> {
        match self.location_isv.index_by_key.get(name) {
            Some(&idx) => Ok(idx),
            None => bail!(CatalogError::UnknownLocation(name.to_string())),
        }
    }

    pub fn menu(&self) -> RegionIdx {
        self.region_isv.index_by_key[MENU_REGION]
    }

    /// Permanently place an item. Locked locations are never written twice.
    pub fn place_locked_item(&mut self, idx: LocationIdx, item: Item) {
        let location = &mut self.locations[idx];
        assert!(
            location.placed_item.is_none(),
            "location {:?} already holds {:?}",
            location.name,
            location.placed_item
        );
        location.placed_item = Some(item);
    }

    pub fn num_locked_locations(&self) -> usize {
        self.locations
            .iter()
            .filter(|x| x.code.is_some() && x.placed_item.is_some())
            .count()
    }

    pub fn num_placeable_locations(&self) -> usize {
        self.locations.iter().filter(|x| x.is_placeable()).count()
    }
}

/// Kind of repeating check that gets split into chained segments.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumString, VariantNames, Serialize, Deserialize,
)]
pub enum CheckType {
    Shop,
    Fragment,
}

impl CheckType {
    pub fn segment_size(self) -> usize {
        match self {
            CheckType::Shop => SHOP_SEGMENTING,
            CheckType::Fragment => FRAGMENT_SEGMENTING,
        }
    }

    /// Region holding the given segment of a shard's chain. Segment 0 is the shard itself.
    pub fn segment_region_name(self, shard: ShardNum, segment: usize) -> String {
        if segment == 0 {
            return shard_region_name(shard);
        }
        match self {
            CheckType::Shop => format!("Shard {shard} Shop {segment}"),
            CheckType::Fragment => format!("Shard {shard} Fragmentsanity {segment}"),
        }
    }

    pub fn segment_entrance_name(self, shard: ShardNum, segment: usize) -> String {
        match self {
            CheckType::Shop => format!("Shard {shard} Shop Region {segment} Entrance"),
            CheckType::Fragment => format!("Shard {shard} Fragmentsanity Region {segment} Entrance"),
        }
    }

    /// Synthetic item that opens the given segment.
    pub fn unlock_item_name(self, shard: ShardNum, segment: usize) -> String {
        match self {
            CheckType::Shop => format!("Shard{shard}ShopRegion{segment}Unlock"),
            CheckType::Fragment => format!("Shard{shard}Fragmentsanity{segment}Unlock"),
        }
    }

    /// Event location at the end of `segment`, holding the unlock for `segment + 1`.
    pub fn event_location_name(self, shard: ShardNum, segment: usize) -> String {
        match self {
            CheckType::Shop => format!("Shard{shard}Shop{segment}Event"),
            CheckType::Fragment => format!("Shard{shard}Fragmentsanity{segment}Event"),
        }
    }
}

pub fn shard_region_name(shard: ShardNum) -> String {
    format!("Shard {shard}")
}

/// Sub-regions needed after the shard region itself to hold `quantity` checks.
pub fn num_segment_regions(quantity: usize, segment_size: usize) -> usize {
    if quantity == 0 {
        0
    } else {
        quantity.div_ceil(segment_size) - 1
    }
}

// Shards come in bands of two; each band past the first needs one more speed upgrade.
pub fn speed_tier(shard: ShardNum) -> usize {
    (shard - 1) / 2
}

pub fn shard_requirement(shard: ShardNum, settings: &RandomizerSettings) -> Requirement {
    if shard == 1 {
        return Requirement::Free;
    }
    let mut reqs = vec![Requirement::make_item(PROGRESSIVE_SHARD, shard - 1)];
    if settings.speed_upgrade {
        reqs.push(Requirement::make_item(SPEED_UPGRADE, speed_tier(shard)));
    }
    Requirement::make_and(reqs)
}

pub fn create_regions(settings: &RandomizerSettings) -> Result<World> {
    let mut world = World::default();
    let menu = world.add_region(MENU_REGION);

    for shard in 1..=settings.num_shard_regions() {
        let region = world.add_region(&shard_region_name(shard));
        world.connect(
            &format!("Shard {shard} Entrance"),
            menu,
            region,
            shard_requirement(shard, settings),
        );
    }

    for check_type in [CheckType::Shop, CheckType::Fragment] {
        let size = check_type.segment_size();
        for (shard, quantity) in settings.check_chains(check_type) {
            let shard_region = world.get_region(&shard_region_name(shard))?;
            for segment in 1..=num_segment_regions(quantity, size) {
                let region = world.add_region(&check_type.segment_region_name(shard, segment));
                world.connect(
                    &check_type.segment_entrance_name(shard, segment),
                    shard_region,
                    region,
                    Requirement::make_item(&check_type.unlock_item_name(shard, segment), 1),
                );
            }
        }
    }

    info!(
        "Created {} regions, {} entrances",
        world.regions.len(),
        world.entrances.len()
    );
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SanityMode;

    #[test]
    fn test_num_segment_regions() {
        assert_eq!(num_segment_regions(0, 5), 0);
        assert_eq!(num_segment_regions(1, 5), 0);
        assert_eq!(num_segment_regions(5, 5), 0);
        assert_eq!(num_segment_regions(6, 5), 1);
        assert_eq!(num_segment_regions(12, 5), 2);
        assert_eq!(num_segment_regions(100, 5), 19);
    }

    #[test]
    fn test_speed_tiers() {
        let tiers: Vec<usize> = (1..=10).map(speed_tier).collect();
        assert_eq!(tiers, vec![0, 0, 1, 1, 2, 2, 3, 3, 4, 4]);
    }

    #[test]
    fn test_shard_requirement() {
        let mut settings = RandomizerSettings::default();
        assert_eq!(shard_requirement(1, &settings), Requirement::Free);
        assert_eq!(
            shard_requirement(2, &settings),
            Requirement::make_item(PROGRESSIVE_SHARD, 1)
        );
        settings.speed_upgrade = true;
        // Tier 0 folds away.
        assert_eq!(
            shard_requirement(2, &settings),
            Requirement::make_item(PROGRESSIVE_SHARD, 1)
        );
        assert_eq!(
            shard_requirement(5, &settings).to_string(),
            "And(Progressive Shard x4, Progressive Speed Upgrade x2)"
        );
    }

    #[test]
    fn test_segment_names() {
        assert_eq!(CheckType::Shop.segment_region_name(3, 0), "Shard 3");
        assert_eq!(CheckType::Shop.segment_region_name(3, 2), "Shard 3 Shop 2");
        assert_eq!(
            CheckType::Fragment.segment_region_name(1, 4),
            "Shard 1 Fragmentsanity 4"
        );
        assert_eq!(
            CheckType::Fragment.unlock_item_name(1, 4),
            "Shard1Fragmentsanity4Unlock"
        );
        assert_eq!(CheckType::Shop.event_location_name(2, 0), "Shard2Shop0Event");
    }

    #[test]
    fn test_menu_and_shards() {
        let settings = RandomizerSettings {
            shard_goal: 4,
            ..Default::default()
        };
        let world = create_regions(&settings).unwrap();
        assert_eq!(world.regions.len(), 5);
        assert_eq!(world.regions[world.menu()].exits.len(), 4);
        assert!(world.get_region("Shard 5").is_err());
    }

    #[test]
    fn test_global_chain_hangs_off_first_shard() {
        let settings = RandomizerSettings {
            shard_goal: 3,
            shopsanity: SanityMode::Global,
            global_shopsanity_quantity: 23,
            ..Default::default()
        };
        let world = create_regions(&settings).unwrap();
        let shard1 = world.get_region("Shard 1").unwrap();
        for segment in 1..=4 {
            let idx = world
                .get_region(&format!("Shard 1 Shop {segment}"))
                .unwrap();
            let entrance = world
                .entrances
                .iter()
                .find(|e| e.target == idx)
                .unwrap();
            assert_eq!(entrance.source, shard1);
        }
        assert!(world.get_region("Shard 1 Shop 5").is_err());
        assert!(world.get_region("Shard 2 Shop 1").is_err());
    }

    #[test]
    #[should_panic(expected = "created twice")]
    fn test_duplicate_region_panics() {
        let mut world = World::default();
        world.add_region("Menu");
        world.add_region("Menu");
    }
}
