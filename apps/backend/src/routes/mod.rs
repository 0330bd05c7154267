use actix_web::web;

pub mod health;
pub mod rooms;
pub mod users;

/// Configure application routes for the server and for HTTP-level tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check route: /health
    cfg.configure(health::configure_routes);

    // User routes: /api/user/**
    cfg.service(web::scope("/api/user").configure(users::configure_routes));

    // Room routes: /api/room/**
    cfg.service(web::scope("/api/room").configure(rooms::configure_routes));
}
