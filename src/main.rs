use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use taskgate::{config::Config, routes, store::PgStore, AppState};

fn startup_error(error: taskgate::AppError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, error.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(startup_error)?;

    let store = PgStore::connect(&config).await.map_err(startup_error)?;
    store.migrate().await.map_err(startup_error)?;

    let state = web::Data::new(AppState::with_store(store, &config).map_err(startup_error)?);

    log::info!("Starting taskgate server at {}", config.server_url());
    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, state))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
