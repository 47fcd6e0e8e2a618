//! Simple liveness / readiness probe

use actix_web::{get, web, HttpResponse, Responder};

use crate::db::player_repo::PlayerStore;

#[get("/healthz")]
pub async fn healthz(store: web::Data<PlayerStore>) -> impl Responder {
    if store.ping().await.is_err() {
        return HttpResponse::ServiceUnavailable().body("db");
    }
    HttpResponse::Ok().body("ok")
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz);
}
