use actix_web::{App, HttpServer, web};
use log::{error, info};

use ksc_ledger::Blockchain;
use ksc_ledger::api::{self, AppState};
use ksc_ledger::config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let config = ServerConfig::from_env().map_err(|e| {
        error!("{e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let mut ledger = Blockchain::new(config.ledger.clone());
    if let Err(e) = ledger.load_state() {
        error!("failed to load {}: {e}", ledger.state_file().display());
        return Err(std::io::Error::other(e.to_string()));
    }
    if config.admin_key.is_none() {
        info!("KSC_ADMIN_KEY not set: give requests will be rejected");
    }

    let (host, port) = (config.host.clone(), config.port);
    info!("⛓️ Starting KSC ledger API at http://{host}:{port}");

    let state = web::Data::new(AppState::new(ledger, config.admin_key));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
