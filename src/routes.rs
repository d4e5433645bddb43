use warp::{Filter, Rejection, Reply};

use crate::config::HubConfig;
use crate::hub::Hub;

pub const LIVENESS_BODY: &str = "Server is running.";

/// `GET /` liveness text plus the `/ws` chat socket, behind the single-origin CORS policy.
pub fn routes(
    hub: Hub,
    config: &HubConfig,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let ws_route = warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .map(move |ws: warp::ws::Ws| {
            let hub = hub.clone();
            ws.on_upgrade(move |socket| async move {
                hub.handle_connection(socket).await;
            })
        });

    let liveness = warp::path::end().and(warp::get()).map(|| LIVENESS_BODY);

    let cors = warp::cors()
        .allow_origin(config.allowed_origin.as_str())
        .allow_methods(vec!["GET", "POST"]);

    liveness
        .or(ws_route)
        .with(cors)
        .with(warp::log("relay_chat::http"))
}
