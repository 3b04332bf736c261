// The changes suggested by this lint usually make the code more cluttered and less clear:
#![allow(clippy::needless_range_loop)]

pub mod items;
pub mod locations;

use anyhow::{bail, Context, Result};
use hashbrown::{HashMap, HashSet};
use log::info;
use std::borrow::ToOwned;
use std::hash::Hash;
use thiserror::Error;

pub use items::{Classification, Item, ItemData, ItemType};
pub use locations::{LocationData, LocationFlag};

pub type ItemCode = u64; // Code from the item table (the network id is BASE_ID + code)
pub type LocationCode = u64; // Code from the location table (the network id is BASE_ID + code)
pub type ShardNum = usize; // 1-based shard number (1..=NUM_SHARDS)

pub const BASE_ID: u64 = 401000;
pub const NUM_SHARDS: usize = 10;

pub fn get_apid(code: u64) -> u64 {
    BASE_ID + code
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown item {0:?}")]
    UnknownItem(String),
    #[error("unknown location {0:?}")]
    UnknownLocation(String),
    #[error("unknown region {0:?}")]
    UnknownRegion(String),
    #[error("duplicate catalog entry {0:?}")]
    DuplicateName(String),
    #[error("stable code {code} is used by both {first:?} and {second:?}")]
    DuplicateCode {
        code: u64,
        first: String,
        second: String,
    },
    #[error("segmented location {0:?} is missing its shard or number")]
    MissingSegmentNumber(String),
}

#[derive(Default, Clone, Debug)]
pub struct IndexedVec<T: Hash + Eq> {
    pub keys: Vec<T>,
    pub index_by_key: HashMap<T, usize>,
}

impl<T: Hash + Eq> IndexedVec<T> {
    pub fn add<U: ToOwned<Owned = T> + ?Sized>(&mut self, name: &U) -> usize {
        if !self.index_by_key.contains_key(&name.to_owned()) {
            let idx = self.keys.len();
            self.index_by_key.insert(name.to_owned(), self.keys.len());
            self.keys.push(name.to_owned());
            idx
        } else {
            self.index_by_key[&name.to_owned()]
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Static item and location tables. Built once and shared read-only between runs.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub items: Vec<ItemData>,
    pub item_isv: IndexedVec<String>,
    pub locations: Vec<LocationData>,
    pub location_isv: IndexedVec<String>,
}

impl Catalog {
    pub fn load() -> Result<Catalog> {
        let catalog = Catalog::from_tables(items::item_table(), locations::location_table())
            .context("invalid built-in catalog")?;
        info!(
            "Catalog: {} items, {} locations",
            catalog.items.len(),
            catalog.locations.len()
        );
        Ok(catalog)
    }

    pub fn from_tables(items: Vec<ItemData>, locations: Vec<LocationData>) -> Result<Catalog> {
        let mut item_isv: IndexedVec<String> = IndexedVec::default();
        let mut item_codes: HashMap<ItemCode, String> = HashMap::new();
        for data in &items {
            if item_isv.index_by_key.contains_key(&data.name) {
                bail!(CatalogError::DuplicateName(data.name.clone()));
            }
            if let Some(first) = item_codes.insert(data.code, data.name.clone()) {
                bail!(CatalogError::DuplicateCode {
                    code: data.code,
                    first,
                    second: data.name.clone(),
                });
            }
            item_isv.add(&data.name);
        }

        let mut location_isv: IndexedVec<String> = IndexedVec::default();
        let mut location_codes: HashMap<LocationCode, String> = HashMap::new();
        for data in &locations {
            if location_isv.index_by_key.contains_key(&data.name) {
                bail!(CatalogError::DuplicateName(data.name.clone()));
            }
            if let Some(first) = location_codes.insert(data.code, data.name.clone()) {
                bail!(CatalogError::DuplicateCode {
                    code: data.code,
                    first,
                    second: data.name.clone(),
                });
            }
            if data.flag.is_segmented() && (data.shard.is_none() || data.number.is_none()) {
                bail!(CatalogError::MissingSegmentNumber(data.name.clone()));
            }
            location_isv.add(&data.name);
        }

        Ok(Catalog {
            items,
            item_isv,
            locations,
            location_isv,
        })
    }

    pub fn item(&self, name: &str) -> Result<&ItemData> {
        match self.item_isv.index_by_key.get(name) {
            Some(&idx) => Ok(&self.items[idx]),
            None => bail!(CatalogError::UnknownItem(name.to_string())),
        }
    }

    pub fn location(&self, name: &str) -> Result<&LocationData> {
        match self.location_isv.index_by_key.get(name) {
            Some(&idx) => Ok(&self.locations[idx]),
            None => bail!(CatalogError::UnknownLocation(name.to_string())),
        }
    }

    /// Create an item with its catalog classification.
    pub fn create_item(&self, name: &str) -> Result<Item> {
        let data = self.item(name)?;
        Ok(Item::new(data, data.classification))
    }

    pub fn item_name_to_id(&self) -> HashMap<String, u64> {
        self.items
            .iter()
            .map(|x| (x.name.clone(), get_apid(x.code)))
            .collect()
    }

    pub fn location_name_to_id(&self) -> HashMap<String, u64> {
        self.locations
            .iter()
            .map(|x| (x.name.clone(), get_apid(x.code)))
            .collect()
    }

    /// Names of every NPC that sells something at a hub location.
    pub fn vendors(&self) -> HashSet<&str> {
        self.locations
            .iter()
            .filter_map(|x| x.vendor.as_deref())
            .collect()
    }
}
