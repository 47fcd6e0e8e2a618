//! The opaque keyed row store behind the player repository.
//!
//! Production runs on Postgres; tests run on the in-memory map. Both expose
//! the same three operations plus a liveness ping, and both enforce the
//! version guard: `put` replaces the row only when the caller's version
//! matches the stored one.

use anyhow::Context;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::BoxFuture;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::db::models::PlayerRow;

pub trait RowStore: Send + Sync {
    /// Fetches the row for a Telegram id, if any.
    fn get(&self, tg_id: i64) -> BoxFuture<'_, anyhow::Result<Option<PlayerRow>>>;

    /// Inserts a fresh row; returns `false` when the id already exists
    /// (a concurrent request won the creation race).
    fn insert(&self, row: PlayerRow) -> BoxFuture<'_, anyhow::Result<bool>>;

    /// Full-row replace guarded by `row.version`; bumps the stored version
    /// and returns `true` on success, `false` when the caller was stale.
    fn put(&self, row: PlayerRow) -> BoxFuture<'_, anyhow::Result<bool>>;

    /// Liveness probe for the health endpoint.
    fn ping(&self) -> BoxFuture<'_, anyhow::Result<()>>;
}

//////////////////////////////////////////////////
// Postgres
//////////////////////////////////////////////////

pub struct PgRowStore {
    pool: PgPool,
}

impl PgRowStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("connecting to Postgres")?;
        Ok(PgRowStore { pool })
    }

    /// Creates the players table when missing. Idempotent.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS players (
                tg_id            BIGINT PRIMARY KEY,
                username         TEXT,
                first_name       TEXT,
                last_name        TEXT,
                photo_url        TEXT,
                created_at       TIMESTAMPTZ NOT NULL,
                last_login       TIMESTAMPTZ NOT NULL,
                last_tick        TIMESTAMPTZ NOT NULL,
                state_json       TEXT NOT NULL,
                daily_claim_date DATE,
                daily_streak     INT NOT NULL DEFAULT 0,
                version          BIGINT NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("creating players table")?;
        Ok(())
    }
}

impl RowStore for PgRowStore {
    fn get(&self, tg_id: i64) -> BoxFuture<'_, anyhow::Result<Option<PlayerRow>>> {
        Box::pin(async move {
            sqlx::query_as::<_, PlayerRow>("SELECT * FROM players WHERE tg_id = $1")
                .bind(tg_id)
                .fetch_optional(&self.pool)
                .await
                .context("fetching player row")
        })
    }

    fn insert(&self, row: PlayerRow) -> BoxFuture<'_, anyhow::Result<bool>> {
        Box::pin(async move {
            let res = sqlx::query(
                r#"
                INSERT INTO players
                    (tg_id, username, first_name, last_name, photo_url,
                     created_at, last_login, last_tick, state_json,
                     daily_claim_date, daily_streak, version)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (tg_id) DO NOTHING
                "#,
            )
            .bind(row.tg_id)
            .bind(&row.username)
            .bind(&row.first_name)
            .bind(&row.last_name)
            .bind(&row.photo_url)
            .bind(row.created_at)
            .bind(row.last_login)
            .bind(row.last_tick)
            .bind(&row.state_json)
            .bind(row.daily_claim_date)
            .bind(row.daily_streak)
            .bind(row.version)
            .execute(&self.pool)
            .await
            .context("inserting player row")?;

            Ok(res.rows_affected() == 1)
        })
    }

    fn put(&self, row: PlayerRow) -> BoxFuture<'_, anyhow::Result<bool>> {
        Box::pin(async move {
            let res = sqlx::query(
                r#"
                UPDATE players
                   SET username = $2, first_name = $3, last_name = $4,
                       photo_url = $5, last_login = $6, last_tick = $7,
                       state_json = $8, daily_claim_date = $9,
                       daily_streak = $10, version = version + 1
                 WHERE tg_id = $1 AND version = $11
                "#,
            )
            .bind(row.tg_id)
            .bind(&row.username)
            .bind(&row.first_name)
            .bind(&row.last_name)
            .bind(&row.photo_url)
            .bind(row.last_login)
            .bind(row.last_tick)
            .bind(&row.state_json)
            .bind(row.daily_claim_date)
            .bind(row.daily_streak)
            .bind(row.version)
            .execute(&self.pool)
            .await
            .context("updating player row")?;

            Ok(res.rows_affected() == 1)
        })
    }

    fn ping(&self) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .context("pinging Postgres")?;
            Ok(())
        })
    }
}

//////////////////////////////////////////////////
// In-memory (tests, local hacking)
//////////////////////////////////////////////////

#[derive(Default)]
pub struct MemRowStore {
    rows: DashMap<i64, PlayerRow>,
}

impl MemRowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowStore for MemRowStore {
    fn get(&self, tg_id: i64) -> BoxFuture<'_, anyhow::Result<Option<PlayerRow>>> {
        Box::pin(async move { Ok(self.rows.get(&tg_id).map(|e| e.value().clone())) })
    }

    fn insert(&self, row: PlayerRow) -> BoxFuture<'_, anyhow::Result<bool>> {
        Box::pin(async move {
            match self.rows.entry(row.tg_id) {
                Entry::Occupied(_) => Ok(false),
                Entry::Vacant(v) => {
                    v.insert(row);
                    Ok(true)
                }
            }
        })
    }

    fn put(&self, row: PlayerRow) -> BoxFuture<'_, anyhow::Result<bool>> {
        Box::pin(async move {
            match self.rows.get_mut(&row.tg_id) {
                Some(mut entry) if entry.version == row.version => {
                    let mut row = row;
                    row.version += 1;
                    *entry = row;
                    Ok(true)
                }
                _ => Ok(false),
            }
        })
    }

    fn ping(&self) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move { Ok(()) })
    }
}
