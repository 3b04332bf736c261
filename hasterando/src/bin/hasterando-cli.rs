use anyhow::{Context, Result};
use clap::Parser;
use hasterando::randomize::{Randomization, Randomizer};
use hasterando::settings::{parse_randomizer_settings, RandomizerSettings};
use hasterando::spoiler_log::get_spoiler_log;
use hasterando::traverse::traverse;
use hasterando_game::Catalog;
use log::info;
use rand::{RngCore, SeedableRng};
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    random_seed: Option<u64>,

    #[arg(long)]
    output_spoiler_log: Option<PathBuf>,
}

fn load_settings(args: &Args) -> Result<RandomizerSettings> {
    match &args.settings {
        Some(path) => {
            let settings_str = std::fs::read_to_string(path)
                .with_context(|| format!("Unable to read settings file at {}", path.display()))?;
            parse_randomizer_settings(&settings_str)
                .with_context(|| format!("Unable to parse settings file at {}", path.display()))
        }
        None => Ok(RandomizerSettings::default()),
    }
}

fn print_summary(randomization: &Randomization) {
    let world = &randomization.world;
    let pool = &randomization.item_pool;
    let start = traverse(world, &randomization.initial_state());
    println!("Seed: {}", randomization.seed);
    println!(
        "Regions: {}, entrances: {}, locations: {} ({} reachable at start)",
        world.regions.len(),
        world.entrances.len(),
        world.locations.len(),
        start.num_locations()
    );
    println!(
        "Pool: {} progression, {} useful, {} filler, {} precollected",
        pool.progression.len(),
        pool.useful.len(),
        pool.filler.len(),
        pool.precollected.len()
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let settings = load_settings(&args)?;
    let catalog = Catalog::load()?;

    let seed = match args.random_seed.or(settings.random_seed) {
        Some(s) => s,
        None => rand::rngs::StdRng::from_entropy().next_u64() & 0xFFFFFFFF,
    };
    let mut randomizer = Randomizer::new(&catalog, &settings)?;
    let randomization = randomizer.randomize(seed)?;
    info!("Generation finished in phase {:?}", randomizer.phase());

    randomization.check_beatable()?;

    print_summary(&randomization);

    if let Some(output_spoiler_log_path) = &args.output_spoiler_log {
        println!(
            "Writing spoiler log to {}",
            output_spoiler_log_path.display()
        );
        let spoiler_log = get_spoiler_log(&randomization, &settings);
        let spoiler_str = serde_json::to_string_pretty(&spoiler_log)?;
        std::fs::write(output_spoiler_log_path, spoiler_str)?;
    }
    Ok(())
}
