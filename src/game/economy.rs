//! Production rates and lazy offline income.
//!
//! There is no background tick: every `/state` read computes how long the
//! player was away from `last_tick` and credits production for that window.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::game::types::GameState;

/// Longest window a single accrual pays out for.
pub const OFFLINE_CAP_HOURS: f64 = 8.0;

/// Windows at or below this (36 s) are a no-op; keeps rapid repeated reads
/// from inflating income and from resetting `last_tick`.
pub const MIN_ACCRUAL_HOURS: f64 = 0.01;

/// Per-hour output of each producer at building level 1.
#[derive(Debug, Clone, Copy)]
pub struct Production {
    pub energy: f64,
    pub metal: f64,
    pub water: f64,
    pub food: f64,
}

const BASE_PRODUCTION: Production = Production {
    energy: 140.0,
    metal: 90.0,
    water: 70.0,
    food: 60.0,
};

/// Resources credited by one accrual application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gains {
    pub energy: i64,
    pub metal: i64,
    pub water: i64,
    pub food: i64,
}

fn level_multiplier(level: i64) -> f64 {
    1.0 + 0.25 * (level - 1).max(0) as f64
}

fn building_level(buildings: &HashMap<String, i64>, id: &str) -> i64 {
    buildings.get(id).copied().unwrap_or(1)
}

/// Hourly production given current building levels. Each producible resource
/// maps to exactly one producer; an absent producer counts as level 1.
pub fn production(buildings: &HashMap<String, i64>) -> Production {
    Production {
        energy: BASE_PRODUCTION.energy * level_multiplier(building_level(buildings, "generator")),
        metal: BASE_PRODUCTION.metal * level_multiplier(building_level(buildings, "mine")),
        water: BASE_PRODUCTION.water * level_multiplier(building_level(buildings, "well")),
        food: BASE_PRODUCTION.food * level_multiplier(building_level(buildings, "farm")),
    }
}

/// Credits offline production for the window `last_tick..now`.
///
/// Below [`MIN_ACCRUAL_HOURS`] nothing changes, `last_tick` included, so the
/// call is idempotent under tick-spam. On a real payout `last_tick` jumps to
/// `now`, which is what guarantees a window is never paid twice. A
/// `last_tick` in the future yields an empty window, never a rollback.
pub fn accrue_offline(
    state: &mut GameState,
    last_tick: &mut DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<Gains> {
    let elapsed_ms = (now - *last_tick).num_milliseconds().max(0);
    let hours = (elapsed_ms as f64 / 3_600_000.0).min(OFFLINE_CAP_HOURS);
    if hours <= MIN_ACCRUAL_HOURS {
        return None;
    }

    let rate = production(&state.buildings);
    let gains = Gains {
        energy: (rate.energy * hours).floor() as i64,
        metal: (rate.metal * hours).floor() as i64,
        water: (rate.water * hours).floor() as i64,
        food: (rate.food * hours).floor() as i64,
    };

    state.resources.energy += gains.energy;
    state.resources.metal += gains.metal;
    state.resources.water += gains.water;
    state.resources.food += gains.food;

    *last_tick = now;
    Some(gains)
}
