use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::game::types::GameState;
use crate::http::auth::TelegramUser;

/// One persisted player, keyed by Telegram id.
///
/// `version` is the compare-and-swap guard: every successful write bumps it,
/// and a write carrying a stale version loses. `last_tick` anchors offline
/// accrual and only ever moves forward.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub tg_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub last_tick: DateTime<Utc>,
    pub state_json: String,
    pub daily_claim_date: Option<NaiveDate>,
    pub daily_streak: i32,
    pub version: i64,
}

impl PlayerRow {
    /// Fresh row for a first authenticated contact.
    pub fn fresh(user: &TelegramUser, state_json: String, now: DateTime<Utc>) -> Self {
        PlayerRow {
            tg_id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            photo_url: user.photo_url.clone(),
            created_at: now,
            last_login: now,
            last_tick: now,
            state_json,
            daily_claim_date: None,
            daily_streak: 0,
            version: 0,
        }
    }
}

/// Working copy handlers mutate between `get_or_create` and `commit`.
#[derive(Debug, Clone)]
pub struct Player {
    pub state: GameState,
    pub created_at: DateTime<Utc>,
    pub last_tick: DateTime<Utc>,
    pub daily_claim_date: Option<NaiveDate>,
    pub daily_streak: i32,
    pub version: i64,
}

impl Player {
    /// Deserializes the stored state leniently; corruption falls back to
    /// defaults per category rather than failing the request.
    pub fn from_row(row: PlayerRow) -> Self {
        Player {
            state: GameState::from_stored(&row.state_json),
            created_at: row.created_at,
            last_tick: row.last_tick,
            daily_claim_date: row.daily_claim_date,
            daily_streak: row.daily_streak,
            version: row.version,
        }
    }
}
