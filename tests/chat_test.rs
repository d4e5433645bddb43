//! End-to-end tests: real hub on an ephemeral port, chat clients over WebSocket.

use std::time::Duration;
use relay_chat::client::mention::Token;
use relay_chat::client::{ChatClient, Key};
use relay_chat::config::HubConfig;
use relay_chat::hub::Hub;
use relay_chat::roster::Roster;
use relay_chat::routes::routes;
use relay_chat::transport::WsTransport;
use tokio::sync::mpsc::UnboundedReceiver;

async fn start_hub() -> (Hub, String) {
    let hub = Hub::new();
    let (addr, server) = warp::serve(routes(hub.clone(), &HubConfig::default()))
        .bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (hub, format!("ws://{addr}/ws"))
}

async fn wait_for_connections(hub: &Hub, expected: usize) {
    for _ in 0..200 {
        if hub.connection_count().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("hub never reached {expected} connections");
}

async fn next_frame(rx: &mut UnboundedReceiver<String>) -> String {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for frame")
        .expect("connection closed")
}

async fn join(url: &str) -> (ChatClient<WsTransport>, UnboundedReceiver<String>) {
    let (transport, incoming) = WsTransport::connect(url).await.expect("connect to hub");
    (ChatClient::new(Roster::default(), transport), incoming)
}

#[tokio::test]
async fn hello_reaches_both_clients() {
    let (hub, url) = start_hub().await;
    let (mut alice, mut alice_rx) = join(&url).await;
    let (mut bob, mut bob_rx) = join(&url).await;
    wait_for_connections(&hub, 2).await;

    alice.on_input_change("hello");
    assert!(alice.on_key(Key::Enter).await);

    assert_eq!(alice.messages().len(), 1);
    let shown = &alice.messages()[0];
    assert_eq!(shown.text, "hello");
    assert_eq!(shown.likes, 0);
    assert!(Roster::default().contains(&shown.user));

    let echo = next_frame(&mut alice_rx).await;
    let relayed = next_frame(&mut bob_rx).await;
    assert_eq!(echo, relayed);

    assert!(!alice.on_broadcast(&echo).unwrap());
    assert_eq!(alice.messages().len(), 1);

    assert!(bob.on_broadcast(&relayed).unwrap());
    assert_eq!(bob.messages().len(), 1);
    assert_eq!(bob.messages()[0].text, "hello");
    assert_eq!(bob.messages()[0].user, alice.messages()[0].user);
}

#[tokio::test]
async fn mentions_travel_and_render_on_the_other_side() {
    let (hub, url) = start_hub().await;
    let (mut alice, _alice_rx) = join(&url).await;
    let (mut bob, mut bob_rx) = join(&url).await;
    wait_for_connections(&hub, 2).await;

    alice.on_input_change("hi @Al");
    alice.on_suggestion_click("Alan");
    assert!(alice.add_pending_mention("Alan"));
    alice.submit().await;

    bob.on_broadcast(&next_frame(&mut bob_rx).await).unwrap();
    let tokens = bob.render(0).unwrap();
    assert_eq!(
        tokens,
        vec![Token::Plain("hi".into()), Token::Mention("@Alan".into())]
    );

    bob.on_mention_click(tokens[1].as_str());
    assert_eq!(bob.input_text(), "@Alan ");
}

#[tokio::test]
async fn likes_stay_local() {
    let (hub, url) = start_hub().await;
    let (mut alice, _alice_rx) = join(&url).await;
    let (mut bob, mut bob_rx) = join(&url).await;
    wait_for_connections(&hub, 2).await;

    alice.on_input_change("like me");
    alice.submit().await;
    alice.like(0);
    alice.like(0);

    bob.on_broadcast(&next_frame(&mut bob_rx).await).unwrap();
    assert_eq!(alice.messages()[0].likes, 2);
    assert_eq!(bob.messages()[0].likes, 0);
}

#[tokio::test]
async fn closing_a_client_removes_it_from_the_hub() {
    let (hub, url) = start_hub().await;
    let (alice, _alice_rx) = join(&url).await;
    let (mut bob, mut bob_rx) = join(&url).await;
    wait_for_connections(&hub, 2).await;

    alice.transport().close().await.expect("close");
    wait_for_connections(&hub, 1).await;

    bob.on_input_change("still there?");
    bob.submit().await;
    let echo = next_frame(&mut bob_rx).await;
    assert!(!bob.on_broadcast(&echo).unwrap());
    assert_eq!(bob.messages().len(), 1);
}
