// Core leveling module - XP rules, level thresholds and the daily bonus.

pub mod leveling_service;
pub mod progression_models;
pub mod progression_tracker;

pub use leveling_service::*;
pub use progression_models::*;
pub use progression_tracker::*;
