use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
#[cfg(test)]
mod api_tests;
mod auth;
mod config;
mod docs;
mod error;
mod model;
mod models;
mod notify;
mod routes;
mod scheduler;
mod seed;
mod store;
mod tracker;

use config::Config;
use notify::{BroadcastNotifier, StatusNotifier};
use store::{MemStore, Store};
use tracker::AttendanceTracker;

use crate::docs::ApiDoc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Dayflow HR API"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store: Arc<dyn Store> = Arc::new(MemStore::new());
    let notifier = Arc::new(BroadcastNotifier::new());
    let tracker = AttendanceTracker::new(
        store.clone(),
        notifier.clone() as Arc<dyn StatusNotifier>,
    );

    if config.seed_demo_data {
        if let Err(e) = seed::seed_demo_data(store.as_ref()).await {
            warn!(error = %e, "failed to seed demo data");
        }
    }

    // Status reset sweep at every local midnight.
    scheduler::spawn_daily_reset(tracker.clone());

    // Until a socket transport is wired up, the only observer just logs the
    // fan-out so the events are visible in the app log.
    let mut status_rx = notifier.subscribe();
    actix_web::rt::spawn(async move {
        loop {
            match status_rx.recv().await {
                Ok(event) => debug!(?event, "status event"),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();
    let store_data = Data::from(store);
    let tracker_data = Data::new(tracker);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store_data.clone())
            .app_data(tracker_data.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
