//! State fetch: lazy economy tick + daily status + identity refresh.

use actix_web::{get, web, HttpResponse};
use anyhow::anyhow;
use chrono::Utc;
use serde::Serialize;

use crate::config::settings;
use crate::db::player_repo::PlayerStore;
use crate::game::daily::DailyStatus;
use crate::game::types::Resources;
use crate::game::{daily, economy};
use crate::http::auth::InitDataAuth;
use crate::http::error::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserPayload {
    id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Serialize)]
struct StateResponse {
    user: UserPayload,
    resources: Resources,
    daily: DailyStatus,
}

/// GET /state
#[get("/state")]
pub async fn fetch_state(
    auth: InitDataAuth,
    store: web::Data<PlayerStore>,
) -> Result<HttpResponse, ApiError> {
    let user = auth.user;

    for _ in 0..settings().commit_retries {
        let mut player = store.get_or_create(&user).await?;
        let now = Utc::now();

        if let Some(gains) = economy::accrue_offline(&mut player.state, &mut player.last_tick, now)
        {
            log::debug!("player {} accrued {gains:?}", user.id);
        }
        let daily = daily::status(player.daily_claim_date, player.daily_streak, now.date_naive());

        if store.commit(&user, &player).await? {
            return Ok(HttpResponse::Ok().json(StateResponse {
                user: UserPayload {
                    id: user.id,
                    username: user.username.clone(),
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                },
                resources: player.state.resources,
                daily,
            }));
        }
        log::warn!("state commit for player {} lost a race, retrying", user.id);
    }

    Err(anyhow!("player {} row contention on state fetch", user.id).into())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(fetch_state);
}
