use anyhow::{bail, Result};
use hasterando_game::Catalog;
use hasterando_logic::CollectionState;
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, VariantNames};

use crate::{
    item_pool::{generate_item_pool, ClassificationOverride, FillerSource, ItemPool},
    locations::{create_locations, place_victory_item},
    regions::{create_regions, World},
    settings::RandomizerSettings,
    traverse::is_beatable,
};

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumString,
    VariantNames,
    Serialize,
    Deserialize,
)]
pub enum GenerationPhase {
    #[default]
    Uninitialized,
    RegionsBuilt,
    LocationsCreated,
    ItemPoolGenerated,
    Failed,
}

pub fn seeded_rng(seed: u64) -> StdRng {
    let mut rng_seed = [0u8; 32];
    rng_seed[..8].copy_from_slice(&seed.to_le_bytes());
    StdRng::from_seed(rng_seed)
}

/// Output of one successful run, ready to be handed to a fill solver.
pub struct Randomization {
    pub seed: u64,
    pub world: World,
    pub item_pool: ItemPool,
    pub filler_source: FillerSource,
    pub rng: StdRng,
}

impl Randomization {
    /// State the player starts with: all precollected items.
    pub fn initial_state(&self) -> CollectionState {
        let mut state = CollectionState::new();
        for item in &self.item_pool.precollected {
            state.collect(item);
        }
        state
    }

    /// Start state plus every item that goes into a location.
    pub fn full_pool_state(&self) -> CollectionState {
        let mut state = self.initial_state();
        for item in self.item_pool.items() {
            state.collect(item);
        }
        state
    }

    /// Errors when the goal stays out of reach even with the whole pool collected.
    pub fn check_beatable(&self) -> Result<()> {
        if !is_beatable(&self.world, &self.full_pool_state()) {
            bail!(
                "Goal is not reachable even with the full item pool (seed {})",
                self.seed
            );
        }
        Ok(())
    }

    /// Extra filler beyond the pre-backfilled pool.
    pub fn get_filler_name(&mut self) -> String {
        self.filler_source.get_filler_name(&mut self.rng)
    }
}

pub struct Randomizer<'a> {
    pub catalog: &'a Catalog,
    pub settings: &'a RandomizerSettings,
    phase: GenerationPhase,
}

impl<'a> Randomizer<'a> {
    pub fn new(catalog: &'a Catalog, settings: &'a RandomizerSettings) -> Result<Self> {
        settings.validate(catalog)?;
        Ok(Randomizer {
            catalog,
            settings,
            phase: GenerationPhase::Uninitialized,
        })
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn randomize(&mut self, seed: u64) -> Result<Randomization> {
        self.randomize_with_override(seed, &|_| None)
    }

    pub fn randomize_with_override(
        &mut self,
        seed: u64,
        classification_override: &ClassificationOverride,
    ) -> Result<Randomization> {
        self.phase = GenerationPhase::Uninitialized;
        let result = self.run(seed, classification_override);
        if result.is_err() {
            self.phase = GenerationPhase::Failed;
        }
        result
    }

    fn run(
        &mut self,
        seed: u64,
        classification_override: &ClassificationOverride,
    ) -> Result<Randomization> {
        info!("Generating seed {seed}");
        let mut rng = seeded_rng(seed);

        let mut world = create_regions(self.settings)?;
        self.phase = GenerationPhase::RegionsBuilt;

        create_locations(&mut world, self.settings, self.catalog)?;
        place_victory_item(&mut world, self.settings, self.catalog)?;
        self.phase = GenerationPhase::LocationsCreated;

        let pool = generate_item_pool(
            &world,
            self.settings,
            self.catalog,
            classification_override,
            &mut rng,
        )?;
        self.phase = GenerationPhase::ItemPoolGenerated;

        Ok(Randomization {
            seed,
            world,
            item_pool: pool.item_pool,
            filler_source: pool.filler_source,
            rng,
        })
    }
}
