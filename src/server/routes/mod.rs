//! Route configuration

mod health;
mod keys;
mod policies;
mod teams;
mod tiers;

use actix_web::web;

/// Register all routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
    teams::configure_routes(cfg);
    keys::configure_routes(cfg);
    policies::configure_routes(cfg);
    tiers::configure_routes(cfg);
}
