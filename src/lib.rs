#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod error;
pub mod gps_processor;
pub mod journey_data;
pub mod logs;
pub mod map_renderer;
pub mod position_source;
pub mod tracker;
pub mod utils;

pub use error::TrackerError;
pub use tracker::JourneyTracker;
