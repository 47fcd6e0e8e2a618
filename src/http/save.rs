//! Partial-state save endpoint.

use actix_web::{post, web, HttpResponse};
use anyhow::anyhow;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::config::settings;
use crate::db::player_repo::PlayerStore;
use crate::game::merge::{self, StatePatch};
use crate::http::auth::InitDataAuth;
use crate::http::error::ApiError;

#[derive(Debug, Deserialize)]
struct SaveRequest {
    state: Option<StatePatch>,
}

/// POST /save
///
/// The body is parsed by hand so a malformed or unknown-keyed patch maps to
/// `invalid_payload` instead of the framework's default error shape.
#[post("/save")]
pub async fn save_state(
    auth: InitDataAuth,
    store: web::Data<PlayerStore>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let patch = match serde_json::from_slice::<SaveRequest>(&body) {
        Ok(SaveRequest { state: Some(patch) }) => patch,
        _ => return Err(ApiError::InvalidPayload),
    };

    let user = auth.user;

    for _ in 0..settings().commit_retries {
        let mut player = store.get_or_create(&user).await?;
        merge::apply(&mut player.state, &patch);
        player.last_tick = Utc::now();

        if store.commit(&user, &player).await? {
            return Ok(HttpResponse::Ok().json(json!({ "state": player.state })));
        }
        log::warn!("save commit for player {} lost a race, retrying", user.id);
    }

    Err(anyhow!("player {} row contention on save", user.id).into())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(save_state);
}
