//! Daily-reward claim endpoint.

use actix_web::{post, web, HttpResponse};
use anyhow::anyhow;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::config::settings;
use crate::db::player_repo::PlayerStore;
use crate::game::daily::{self, DailyStatus};
use crate::game::types::Resources;
use crate::http::auth::InitDataAuth;
use crate::http::error::ApiError;
use crate::metrics;

#[derive(Serialize)]
struct ClaimResponse {
    resources: Resources,
    daily: DailyStatus,
}

/// POST /daily/claim
#[post("/daily/claim")]
pub async fn claim_daily(
    auth: InitDataAuth,
    store: web::Data<PlayerStore>,
) -> Result<HttpResponse, ApiError> {
    let user = auth.user;

    for _ in 0..settings().commit_retries {
        let mut player = store.get_or_create(&user).await?;
        let now = Utc::now();
        let today = now.date_naive();

        let claim = match daily::claim(player.daily_claim_date, player.daily_streak, today) {
            Ok(claim) => claim,
            Err(daily::AlreadyClaimed) => {
                // Idempotent rejection: nothing is written.
                let status = daily::status(player.daily_claim_date, player.daily_streak, today);
                return Ok(HttpResponse::Conflict().json(json!({
                    "error": "already_claimed",
                    "resources": player.state.resources,
                    "daily": status,
                })));
            }
        };

        player.state.resources.crystals += claim.reward;
        player.daily_claim_date = Some(today);
        player.daily_streak = claim.day;
        // A claim commit restarts the accrual window.
        player.last_tick = now;

        if store.commit(&user, &player).await? {
            metrics::DAILY_CLAIMS.inc();
            log::info!(
                "player {} claimed day {} (+{} crystals)",
                user.id,
                claim.day,
                claim.reward
            );
            let status = daily::status(Some(today), claim.day, today);
            return Ok(HttpResponse::Ok().json(ClaimResponse {
                resources: player.state.resources,
                daily: status,
            }));
        }
        log::warn!("claim commit for player {} lost a race, retrying", user.id);
    }

    Err(anyhow!("player {} row contention on daily claim", user.id).into())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(claim_daily);
}
