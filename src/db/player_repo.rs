//! Get-or-create and versioned commit of player rows.

use anyhow::{anyhow, Context};
use chrono::Utc;
use std::sync::Arc;

use crate::db::models::{Player, PlayerRow};
use crate::db::row_store::RowStore;
use crate::game::types::GameState;
use crate::http::auth::TelegramUser;
use crate::metrics;

/// Repository facade over the row store; cheap to clone into handlers.
#[derive(Clone)]
pub struct PlayerStore {
    rows: Arc<dyn RowStore>,
}

impl PlayerStore {
    pub fn new(rows: Arc<dyn RowStore>) -> Self {
        PlayerStore { rows }
    }

    /// Loads the player for `user`, creating the default record on first
    /// contact. Losing the creation race against a concurrent first request
    /// falls back to the winner's row, so there is never a duplicate.
    pub async fn get_or_create(&self, user: &TelegramUser) -> anyhow::Result<Player> {
        if let Some(row) = self.rows.get(user.id).await? {
            return Ok(Player::from_row(row));
        }

        let now = Utc::now();
        let state_json =
            serde_json::to_string(&GameState::default()).context("serializing starting state")?;
        let row = PlayerRow::fresh(user, state_json, now);

        if self.rows.insert(row.clone()).await? {
            metrics::PLAYERS_CREATED.inc();
            log::info!("created player {}", user.id);
            return Ok(Player::from_row(row));
        }

        let row = self
            .rows
            .get(user.id)
            .await?
            .ok_or_else(|| anyhow!("player {} missing after losing insert race", user.id))?;
        Ok(Player::from_row(row))
    }

    /// Writes the whole row back: identity snapshot refreshed from the
    /// verified user, state re-serialized, `last_login` set to now. Returns
    /// `false` when another request committed first; callers re-run their
    /// read-modify-write in that case.
    pub async fn commit(&self, user: &TelegramUser, player: &Player) -> anyhow::Result<bool> {
        let row = PlayerRow {
            tg_id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            photo_url: user.photo_url.clone(),
            created_at: player.created_at,
            last_login: Utc::now(),
            last_tick: player.last_tick,
            state_json: serde_json::to_string(&player.state)
                .context("serializing player state")?,
            daily_claim_date: player.daily_claim_date,
            daily_streak: player.daily_streak,
            version: player.version,
        };
        self.rows.put(row).await
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        self.rows.ping().await
    }
}
