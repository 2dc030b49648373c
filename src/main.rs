use rental_booking_server::shared::logging::LoggingUtils;
use rental_booking_server::{AppConfig, HttpServer};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = LoggingUtils::initialize("info") {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting rental booking server");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        lodgix_api = %config.lodgix.api_url,
        gateway_api = %config.authorize_net.api_url,
        "Configuration loaded"
    );

    if config.security.development_mode {
        warn!("Development mode is enabled; error responses will carry internal details");
    }

    let server = match HttpServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to initialize server: {}", e);
            std::process::exit(1);
        }
    };

    info!("Listening on {}", server.config().server_address());

    if let Err(e) = server.run().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
