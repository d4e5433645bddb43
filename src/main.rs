use log::{error, info};
use relay_chat::config::HubConfig;
use relay_chat::hub::Hub;
use relay_chat::routes::routes;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match HubConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let routes = routes(Hub::new(), &config);
    let addr = ([0, 0, 0, 0], config.port);

    match &config.tls {
        Some(tls) => {
            info!("Server is running on port {} (HTTPS/WSS)", config.port);
            warp::serve(routes)
                .tls()
                .cert_path(&tls.cert_path)
                .key_path(&tls.key_path)
                .run(addr)
                .await;
        }
        None => {
            info!("Server is running on port {}", config.port);
            warp::serve(routes).run(addr).await;
        }
    }
}
