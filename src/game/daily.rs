//! Seven-slot daily login-reward ladder.
//!
//! State is `(daily_claim_date, daily_streak)` at UTC calendar-day
//! granularity. Missing a single day resets the ladder to day 1; the streak
//! itself never exceeds 7.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Crystals paid for streak days 1..=7.
pub const DAILY_CRYSTALS: [i64; 7] = [1, 2, 3, 4, 5, 6, 7];

fn clamp_day(day: i32) -> i32 {
    day.clamp(1, 7)
}

fn reward_for(day: i32) -> i64 {
    DAILY_CRYSTALS
        .get((day - 1) as usize)
        .copied()
        .unwrap_or(1)
}

/// Snapshot shown to the client on every state fetch.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatus {
    pub available: bool,
    pub streak: i32,
    pub today_day: i32,
    pub reward_crystals: i64,
}

/// A claim that was already made today. Idempotent rejection: the caller
/// must leave the row untouched.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("already claimed today")]
pub struct AlreadyClaimed;

/// Outcome of a successful claim; the caller credits the crystals and
/// persists `(today, day)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub day: i32,
    pub reward: i64,
}

/// Where the player stands today without mutating anything.
pub fn status(claim_date: Option<NaiveDate>, streak: i32, today: NaiveDate) -> DailyStatus {
    let yesterday = today.pred_opt().unwrap_or(today);
    let claimed_today = claim_date == Some(today);

    let today_day = if claim_date == Some(yesterday) {
        clamp_day(streak + 1)
    } else if claimed_today {
        clamp_day(streak)
    } else {
        1
    };

    DailyStatus {
        available: !claimed_today,
        streak,
        today_day,
        reward_crystals: reward_for(today_day),
    }
}

/// Resolves a claim attempt. Continues the ladder when yesterday was
/// claimed, otherwise restarts at day 1 (never day 0).
pub fn claim(
    claim_date: Option<NaiveDate>,
    streak: i32,
    today: NaiveDate,
) -> Result<Claim, AlreadyClaimed> {
    if claim_date == Some(today) {
        return Err(AlreadyClaimed);
    }

    let yesterday = today.pred_opt().unwrap_or(today);
    let day = if claim_date == Some(yesterday) {
        clamp_day(streak + 1)
    } else {
        1
    };

    Ok(Claim {
        day,
        reward: reward_for(day),
    })
}
