//! poster-wall/crates/pw-api/src/middleware.rs Middleware
//!
//! Custom middleware for logging and cross-origin access.

use actix_web::middleware::Logger;
use actix_cors::Cors;

// Returns a standard set of middleware for the Poster-Wall API.
pub fn standard_middleware() -> Logger {
    // We use the 'default' logger which outputs:
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

// Configures CORS (Cross-Origin Resource Sharing)
// The gallery page is served by this process, but the JSON API stays open
// for external frontends the way the original server was.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_header()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .max_age(3600)
}
