// The changes suggested by this lint usually make the code more cluttered and less clear:
#![allow(clippy::needless_range_loop)]

pub mod item_pool;
pub mod locations;
pub mod randomize;
pub mod regions;
pub mod settings;
pub mod spoiler_log;
pub mod traverse;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error(
        "There are insufficient locations to place progression items! \
         Trying to place {progression} items in only {eligible} locations."
    )]
    Capacity { progression: usize, eligible: usize },
    #[error("inconsistent configuration: {0}")]
    Configuration(String),
}
