use anyhow::{bail, Result};
use hasterando::{
    item_pool::generate_item_pool,
    locations::Location,
    randomize::{seeded_rng, Randomization, Randomizer},
    regions::World,
    settings::{ItemCount, RandomizerSettings, SanityMode},
    traverse::is_beatable,
    GenerationError,
};
use hasterando_game::{Catalog, Classification, ItemData, ItemType, LocationData, LocationFlag};
use rand::RngCore;

fn randomize(settings: &RandomizerSettings, seed: u64) -> Result<Randomization> {
    let catalog = Catalog::load()?;
    let mut randomizer = Randomizer::new(&catalog, settings)?;
    randomizer.randomize(seed)
}

fn count(names: &[String], name: &str) -> usize {
    names.iter().filter(|x| *x == name).count()
}

fn names(items: &[hasterando_game::Item]) -> Vec<String> {
    items.iter().map(|x| x.name.clone()).collect()
}

fn settings_grid() -> Vec<RandomizerSettings> {
    let mut out = vec![];
    for shard_goal in [1, 4, 10] {
        for (shopsanity, fragmentsanity) in [
            (SanityMode::Off, SanityMode::Off),
            (SanityMode::PerShard, SanityMode::Off),
            (SanityMode::Global, SanityMode::PerShard),
            (SanityMode::Off, SanityMode::Global),
        ] {
            for toggles in 0..4 {
                out.push(RandomizerSettings {
                    shard_goal,
                    shopsanity,
                    fragmentsanity,
                    pershard_shopsanity_quantity: 7,
                    global_fragmentsanity_quantity: 12,
                    npc_shuffle: toggles & 1 != 0,
                    speed_upgrade: toggles & 2 != 0,
                    captains_upgrades: toggles == 3,
                    ..Default::default()
                });
            }
        }
    }
    out
}

#[test]
fn pool_size_matches_open_locations() -> Result<()> {
    let mut feasible = 0;
    for settings in settings_grid() {
        match randomize(&settings, 11) {
            Ok(randomization) => {
                feasible += 1;
                let world = &randomization.world;
                let pool = &randomization.item_pool;
                let open = world
                    .locations
                    .iter()
                    .filter(|x| x.code.is_some() && x.placed_item.is_none())
                    .count();
                let total = pool.progression.len() + pool.useful.len() + pool.filler.len();
                if total + pool.prefill.len() != open {
                    bail!("{settings:?}: pool of {total} for {open} open locations");
                }
                let real = world.locations.iter().filter(|x| x.code.is_some()).count();
                assert_eq!(pool.len() + world.num_locked_locations(), real);
            }
            Err(e) => match e.downcast_ref::<GenerationError>() {
                Some(&GenerationError::Capacity {
                    progression,
                    eligible,
                }) => assert!(progression > eligible),
                _ => bail!("{settings:?}: unexpected error {e}"),
            },
        }
    }
    assert!(feasible > 0);
    Ok(())
}

#[test]
fn capacity_gate_fires_before_shuffling() -> Result<()> {
    let items = vec![ItemData {
        name: "Progressive Shard".to_string(),
        item_type: ItemType::Shard,
        classification: Classification::PROGRESSION,
        code: 1,
        quantity: 50,
    }];
    let locations: Vec<LocationData> = (1..=10)
        .map(|i| LocationData {
            name: format!("Hub Check {i}"),
            code: i,
            flag: LocationFlag::Always,
            shard: None,
            number: None,
            vendor: None,
        })
        .collect();
    let catalog = Catalog::from_tables(items, locations)?;

    let mut world = World::default();
    let menu = world.add_region("Menu");
    for data in &catalog.locations {
        world.add_location(Location::new(&data.name, Some(data.code), menu));
    }

    let settings = RandomizerSettings::default();
    let mut rng = seeded_rng(3);
    let untouched = rng.clone();
    let result = generate_item_pool(&world, &settings, &catalog, &|_| None, &mut rng);
    let Err(err) = result else {
        bail!("expected a capacity error");
    };
    assert_eq!(
        err.downcast_ref::<GenerationError>(),
        Some(&GenerationError::Capacity {
            progression: 50,
            eligible: 10
        })
    );
    assert_eq!(
        err.to_string(),
        "There are insufficient locations to place progression items! \
         Trying to place 50 items in only 10 locations."
    );
    assert_eq!(untouched.clone().next_u64(), rng.next_u64());
    Ok(())
}

#[test]
fn excluded_locations_shrink_capacity() -> Result<()> {
    let settings = RandomizerSettings {
        exclude_locations: vec!["Shard 2 Boss".to_string()],
        ..Default::default()
    };
    let Err(err) = randomize(&settings, 1) else {
        bail!("expected a capacity error");
    };
    assert_eq!(
        err.downcast_ref::<GenerationError>(),
        Some(&GenerationError::Capacity {
            progression: 12,
            eligible: 11
        })
    );
    Ok(())
}

#[test]
fn override_keeps_items_out_of_progression() -> Result<()> {
    let catalog = Catalog::load()?;
    let settings = RandomizerSettings::default();
    let mut randomizer = Randomizer::new(&catalog, &settings)?;
    let demote = |name: &str| {
        if name == "Progressive Shard" {
            Some(Classification::USEFUL)
        } else {
            None
        }
    };
    let randomization = randomizer.randomize_with_override(9, &demote)?;
    let pool = &randomization.item_pool;
    assert_eq!(count(&names(&pool.progression), "Progressive Shard"), 0);
    assert_eq!(pool.progression.len(), 3);
    assert_eq!(count(&names(&pool.useful), "Progressive Shard"), 9);
    assert!(pool
        .useful
        .iter()
        .all(|x| x.classification == Classification::USEFUL));
    Ok(())
}

#[test]
fn promoted_filler_is_rejected() -> Result<()> {
    let catalog = Catalog::load()?;
    let settings = RandomizerSettings {
        shopsanity: SanityMode::PerShard,
        ..Default::default()
    };
    let mut randomizer = Randomizer::new(&catalog, &settings)?;
    let promote =
        |name: &str| name.starts_with("Anti-Spark").then_some(Classification::PROGRESSION);
    let Err(err) = randomizer.randomize_with_override(3, &promote) else {
        bail!("progression-classified filler was accepted");
    };
    assert!(matches!(
        err.downcast_ref::<GenerationError>(),
        Some(GenerationError::Configuration(_))
    ));

    // Promoting a single bundle is fine once its weight is zero.
    let mut settings = settings;
    for x in &mut settings.filler_items {
        if x.item == "Anti-Spark 1k bundle" {
            x.weight = 0;
        }
    }
    let mut randomizer = Randomizer::new(&catalog, &settings)?;
    let promote =
        |name: &str| (name == "Anti-Spark 1k bundle").then_some(Classification::PROGRESSION);
    let randomization = randomizer.randomize_with_override(3, &promote)?;
    let pool = &randomization.item_pool;
    assert!(pool
        .filler
        .iter()
        .all(|x| x.classification == Classification::FILLER));
    assert!(pool.useful.iter().all(|x| !x.is_progression()));
    assert_eq!(pool.len(), randomization.world.num_placeable_locations());
    Ok(())
}

#[test]
fn captain_is_useful_without_upgrades() -> Result<()> {
    let settings = RandomizerSettings {
        npc_shuffle: true,
        shopsanity: SanityMode::PerShard,
        ..Default::default()
    };
    let randomization = randomize(&settings, 2)?;
    let pool = &randomization.item_pool;
    assert_eq!(count(&names(&pool.progression), "The Captain"), 0);
    assert_eq!(count(&names(&pool.useful), "The Captain"), 1);
    assert_eq!(count(&names(&pool.progression), "Wraith"), 1);
    assert_eq!(count(&names(&pool.filler), "Fashion Weeboh"), 1);

    let settings = RandomizerSettings {
        captains_upgrades: true,
        weeboh_purchases: true,
        ..settings
    };
    let randomization = randomize(&settings, 2)?;
    let pool = &randomization.item_pool;
    let progression = names(&pool.progression);
    assert_eq!(count(&progression, "The Captain"), 1);
    assert_eq!(count(&progression, "Fashion Weeboh"), 1);
    let useful = names(&pool.useful);
    assert_eq!(count(&useful, "Item Rarity Upgrade"), 6);
    assert_eq!(count(&useful, "Max Lives Upgrade"), 1);
    Ok(())
}

#[test]
fn backfill_drains_leftover_pools_first() -> Result<()> {
    let settings = RandomizerSettings {
        npc_shuffle: true,
        shopsanity: SanityMode::PerShard,
        ..Default::default()
    };
    let mut randomization = randomize(&settings, 4)?;
    assert!(randomization.filler_source.useful_pool.is_empty());
    assert!(randomization.filler_source.filler_pool.is_empty());

    let consumables: Vec<String> = settings
        .filler_items
        .iter()
        .map(|x| x.item.clone())
        .collect();
    let pool = &randomization.item_pool;
    for item in pool.useful.iter().chain(pool.filler.iter()) {
        if item.name != "The Captain"
            && item.name != "Fashion Weeboh"
            && !consumables.contains(&item.name)
        {
            bail!("unexpected backfill item {}", item.name);
        }
    }

    // Mid-fill requests fall through to the weighted consumables.
    for _ in 0..20 {
        let name = randomization.get_filler_name();
        assert!(consumables.contains(&name), "{name}");
    }
    Ok(())
}

#[test]
fn starting_items_come_out_of_the_pool() -> Result<()> {
    let settings = RandomizerSettings {
        start_inventory: vec![
            ItemCount {
                item: "Progressive Shard".to_string(),
                count: 2,
            },
            ItemCount {
                item: "Anti-Spark 1k bundle".to_string(),
                count: 1,
            },
        ],
        ..Default::default()
    };
    let randomization = randomize(&settings, 6)?;
    let pool = &randomization.item_pool;
    assert_eq!(count(&names(&pool.progression), "Progressive Shard"), 7);
    assert_eq!(pool.precollected.len(), 3);
    assert_eq!(pool.len(), randomization.world.num_placeable_locations());

    let state = randomization.initial_state();
    assert_eq!(state.count_of("Progressive Shard"), 2);
    assert_eq!(state.count_of("Anti-Spark 1k bundle"), 0);
    Ok(())
}

#[test]
fn same_seed_same_pool() -> Result<()> {
    let settings = RandomizerSettings {
        npc_shuffle: true,
        speed_upgrade: true,
        shopsanity: SanityMode::Global,
        fragmentsanity: SanityMode::PerShard,
        ..Default::default()
    };
    let a = randomize(&settings, 1234)?;
    let b = randomize(&settings, 1234)?;
    assert_eq!(names(&a.item_pool.progression), names(&b.item_pool.progression));
    assert_eq!(names(&a.item_pool.useful), names(&b.item_pool.useful));
    assert_eq!(names(&a.item_pool.filler), names(&b.item_pool.filler));
    let a_regions: Vec<&str> = a.world.regions.iter().map(|x| x.name.as_str()).collect();
    let b_regions: Vec<&str> = b.world.regions.iter().map(|x| x.name.as_str()).collect();
    assert_eq!(a_regions, b_regions);
    Ok(())
}

#[test]
fn full_pool_beats_the_goal() -> Result<()> {
    for settings in [
        RandomizerSettings::default(),
        RandomizerSettings {
            shard_goal: 8,
            speed_upgrade: true,
            npc_shuffle: true,
            shopsanity: SanityMode::Global,
            ..Default::default()
        },
        RandomizerSettings {
            shard_goal: 5,
            remove_post_victory_locations: false,
            fragmentsanity: SanityMode::PerShard,
            pershard_fragmentsanity_quantity: 25,
            ..Default::default()
        },
    ] {
        let randomization = randomize(&settings, 77)?;
        let mut state = randomization.initial_state();
        for item in randomization.item_pool.items() {
            state.collect(item);
        }
        if !is_beatable(&randomization.world, &state) {
            bail!("{settings:?}: goal unreachable with the full pool");
        }
        if is_beatable(&randomization.world, &randomization.initial_state()) {
            bail!("{settings:?}: goal reachable with nothing collected");
        }
    }
    Ok(())
}
