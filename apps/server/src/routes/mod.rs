use actix_web::web;

pub mod assets;
pub mod health;
pub mod pages;
pub mod status;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health_route)
        .service(status::current_status_route)
        .service(status::history_route)
        .service(status::uptime_route)
        .service(pages::index_route)
        .service(assets::static_route);
}
