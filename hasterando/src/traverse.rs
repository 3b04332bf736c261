use std::collections::VecDeque;

use anyhow::Result;
use hasterando_game::items::VICTORY_ITEM;
use hasterando_logic::{CollectionState, Requirement};

use crate::regions::World;

pub struct Reachability {
    pub regions: Vec<bool>,
    pub locations: Vec<bool>,
}

impl Reachability {
    pub fn num_regions(&self) -> usize {
        self.regions.iter().filter(|&&x| x).count()
    }

    pub fn num_locations(&self) -> usize {
        self.locations.iter().filter(|&&x| x).count()
    }
}

/// Regions reachable from the hub. Requirements are monotonic, so a region
/// never has to be visited twice for a fixed state.
pub fn reachable_regions(world: &World, state: &CollectionState) -> Vec<bool> {
    let mut reached = vec![false; world.regions.len()];
    if world.regions.is_empty() {
        return reached;
    }
    let menu = world.menu();
    reached[menu] = true;
    let mut queue: VecDeque<usize> = VecDeque::from([menu]);
    while let Some(region_idx) = queue.pop_front() {
        for &entrance_idx in &world.regions[region_idx].exits {
            let entrance = &world.entrances[entrance_idx];
            if !reached[entrance.target] && entrance.requirement.is_satisfied(state) {
                reached[entrance.target] = true;
                queue.push_back(entrance.target);
            }
        }
    }
    reached
}

pub fn traverse(world: &World, state: &CollectionState) -> Reachability {
    let regions = reachable_regions(world, state);
    let locations = world
        .locations
        .iter()
        .map(|loc| regions[loc.region] && loc.requirement.is_satisfied(state))
        .collect();
    Reachability { regions, locations }
}

pub fn can_reach_region(world: &World, state: &CollectionState, name: &str) -> Result<bool> {
    let idx = world.get_region(name)?;
    Ok(reachable_regions(world, state)[idx])
}

pub fn can_reach_location(world: &World, state: &CollectionState, name: &str) -> Result<bool> {
    let idx = world.get_location(name)?;
    let location = &world.locations[idx];
    Ok(reachable_regions(world, state)[location.region] && location.requirement.is_satisfied(state))
}

/// Collect every item already sitting at a reachable location, repeating until
/// nothing new opens up. This is how event unlocks propagate through segment chains.
pub fn sweep(world: &World, state: &CollectionState) -> CollectionState {
    let mut state = state.clone();
    let mut collected = vec![false; world.locations.len()];
    loop {
        let reach = traverse(world, &state);
        let mut changed = false;
        for (idx, location) in world.locations.iter().enumerate() {
            if collected[idx] || !reach.locations[idx] {
                continue;
            }
            if let Some(item) = &location.placed_item {
                collected[idx] = true;
                changed |= state.collect(item);
            }
        }
        if !changed {
            return state;
        }
    }
}

pub fn completion_requirement() -> Requirement {
    Requirement::make_item(VICTORY_ITEM, 1)
}

pub fn is_beatable(world: &World, state: &CollectionState) -> bool {
    completion_requirement().is_satisfied(&sweep(world, state))
}
