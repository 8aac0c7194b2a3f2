//! # Poster-Wall Binary
//!
//! The entry point that assembles the application based on compile-time features.

use actix_web::{web, App, HttpServer};
use pw_api::handlers::AppState;
use pw_api::middleware;

// Feature-gated imports: This is the "Compiled-to-Order" magic
#[cfg(feature = "db-sqlite")]
use pw_db_sqlite::SqlitePosterRepo;

#[cfg(feature = "storage-local")]
use pw_storage_local::LocalImageStore;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let addr = env_or("PW_ADDR", "127.0.0.1:8000");
    let database_url = env_or("PW_DATABASE_URL", "sqlite:poster_wall.db");
    let upload_dir = env_or("PW_UPLOAD_DIR", "./public/uploads");
    let public_url = env_or("PW_PUBLIC_URL", "/uploads");

    // 1. Initialize Database Implementation
    #[cfg(feature = "db-sqlite")]
    let repo = SqlitePosterRepo::new(&database_url)
        .await
        .expect("Failed to init SQLite");

    // 2. Initialize Storage Implementation
    #[cfg(feature = "storage-local")]
    let store = LocalImageStore::new(upload_dir.clone().into(), public_url.clone());

    // The store creates the directory lazily, but the static file service
    // wants it present from the start.
    std::fs::create_dir_all(&upload_dir)?;

    // 3. Wrap in AppState (Using dynamic dispatch for maximum flexibility)
    let state = web::Data::new(AppState {
        repo: Box::new(repo),
        store: Box::new(store),
    });

    log::info!("🖼️  Poster-Wall starting on http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::standard_middleware())
            .wrap(middleware::cors_policy())
            // Uploaded images are public under the same path their
            // stored imageUrl points at.
            .service(actix_files::Files::new(&public_url, &upload_dir))
            .configure(pw_api::configure_routes)
    })
    .bind(&addr)?
    .run()
    .await
}
