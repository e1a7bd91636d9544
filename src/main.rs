use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use hackmate_service::routes::{
    connection_routes, event_routes, join_request_routes, profile_routes, team_routes,
};
use hackmate_service::store::DocumentStore;
use hackmate_service::utils::auth_middleware::Authentication;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:9090".to_string());
    let storage_root =
        std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".to_string());

    std::fs::create_dir_all(&storage_root)?;
    let store = web::Data::new(DocumentStore::new(storage_root));

    info!("Server started at {}", address);

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .wrap(Authentication)
            .wrap(Cors::permissive())
            .configure(connection_routes::init_routes)
            .configure(team_routes::init_routes)
            .configure(join_request_routes::init_routes)
            .configure(profile_routes::init_routes)
            .configure(event_routes::init_routes)
    })
    .bind(address)?
    .run()
    .await
}
