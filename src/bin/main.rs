use actix_web::{middleware::Logger, web, App, HttpServer};
use metro_empire_server::db::player_repo::PlayerStore;
use metro_empire_server::db::row_store::PgRowStore;
use metro_empire_server::{http, metrics};
use std::env;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());

    // Postgres-backed row store
    let rows = PgRowStore::connect(&database_url)
        .await
        .expect("Failed to create Postgres pool");
    rows.migrate().await.expect("Failed to run schema migration");

    let store = PlayerStore::new(Arc::new(rows));

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .wrap(http::routes::cors())
            .app_data(web::Data::new(store.clone()))
            .configure(http::routes::init_routes)
    })
    .bind(&server_addr)?
    .run()
    .await
}
