use crate::config::Config;
use crate::dashboard::DashboardState;
use actix_web::dev::Server;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{middleware, App, HttpServer};
use debileweb_common::errors::*;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod links;
pub mod models;
pub mod paginate;
pub mod schema;
pub mod status;
pub mod sync;
pub mod versions;
pub mod web;

pub fn build_server(pool: db::Pool, config: Config) -> Result<(Server, SocketAddr)> {
    let bind_addr = config.bind_addr.clone();
    let post_body_size_limit = config.post_body_size_limit;

    let dashboard_cache = Arc::new(RwLock::new(DashboardState::new()));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(middleware::Compress::default())
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(dashboard_cache.clone()))
            .service(api::v0::get_dashboard)
            .service(api::v0::list_sources)
            .service(api::v0::get_source)
            .service(api::v0::list_jobs)
            .service(api::v0::get_job)
            .service(api::v0::get_job_log)
            .service(api::v0::get_job_firehose)
            .service(api::v0::list_builders)
            .service(api::v0::get_builder)
            .service(api::v0::get_group)
            .service(api::v0::get_maintainer)
            .service(api::v0::search_sources)
            .service(api::v0::search_maintainers)
            .service(api::v0::list_prefixes)
            .service(
                web::resource("/api/v0/import")
                    .app_data(web::JsonConfig::default().limit(post_body_size_limit))
                    .route(web::post().to(api::v0::import)),
            )
    })
    .bind(&bind_addr)?;

    let addr = server
        .addrs()
        .first()
        .copied()
        .ok_or_else(|| format_err!("Server has no bound address"))?;

    Ok((server.run(), addr))
}

pub async fn run_config(pool: db::Pool, config: Config) -> Result<()> {
    let (server, addr) = build_server(pool, config)?;
    info!("Listening on http://{}", addr);
    server.await?;
    Ok(())
}
