//! # pw-api
//!
//! The web routing and orchestration layer for Poster-Wall.

pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the routes for the gallery.
///
/// # Developer Note
/// We use a scoped configuration to allow the main binary to mount
/// the API under different paths if needed (e.g., /api/v1/).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            // The server-rendered gallery page
            .route("/", web::get().to(handlers::gallery))
            // The Poster collection
            .route("/post", web::get().to(handlers::list_posters))
            .route("/post", web::post().to(handlers::create_poster))
            .route("/post/{id}", web::put().to(handlers::update_poster))
            .route("/post/{id}", web::delete().to(handlers::delete_poster))
            // Per-poster interactions
            .route("/post/{id}/like", web::post().to(handlers::like_poster))
            .route("/post/{id}/comment", web::post().to(handlers::comment_poster)),
    );
}
