//! Config-defined routes and hot reload through the update channel.

use std::time::Duration;

use dispatch_router::config::{parse_config, RouteConfig};
use dispatch_router::http::{handler_fn, Dispatcher};

mod common;

const INITIAL: &str = r#"
[[routes]]
name = "user"
method = "GET"
pattern = "/users/:id"

[[routes]]
name = "create"
method = "POST"
pattern = "/users"
status = 201
body = "created"
"#;

const RELOADED: &str = r#"
[[routes]]
name = "health"
method = "GET"
pattern = "/health"
body = "ok"
"#;

async fn wait_for_status(client: &reqwest::Client, url: &str, status: u16) {
    for _ in 0..50 {
        if client.get(url).send().await.unwrap().status() == status {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("{} never answered {}", url, status);
}

#[tokio::test]
async fn test_config_routes_are_served() {
    let config = parse_config(INITIAL).unwrap();
    let dispatcher = Dispatcher::from_routes(&config.routes).unwrap();
    let server = common::start_server(dispatcher).await;
    let client = common::client();

    let res = client.get(server.url("/users/42")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), r#"{"id":"42"}"#);

    let res = client.post(server.url("/users")).send().await.unwrap();
    assert_eq!(res.status(), 201);
    assert_eq!(res.text().await.unwrap(), "created");

    let res = client.delete(server.url("/users")).send().await.unwrap();
    assert_eq!(res.status(), 405);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_reload_replaces_rule_table() {
    let config = parse_config(INITIAL).unwrap();
    let dispatcher = Dispatcher::from_routes(&config.routes).unwrap();
    let server = common::start_server(dispatcher.clone()).await;
    let client = common::client();

    server.config_updates.send(parse_config(RELOADED).unwrap().routes).unwrap();
    wait_for_status(&client, &server.url("/health"), 200).await;

    assert_eq!(dispatcher.len(), 1);
    let res = client.get(server.url("/users/42")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_bad_reload_keeps_current_table() {
    let config = parse_config(INITIAL).unwrap();
    let dispatcher = Dispatcher::from_routes(&config.routes).unwrap();
    let server = common::start_server(dispatcher.clone()).await;
    let client = common::client();

    // Bypasses validation on purpose: the server must still refuse it.
    let mut bad = parse_config(RELOADED).unwrap().routes;
    bad.push(bad[0].clone());
    server.config_updates.send(bad).unwrap();

    // A valid update queued behind it proves the bad one was processed.
    let mut marker = parse_config(INITIAL).unwrap().routes;
    marker.push(RouteConfig {
        name: "marker".into(),
        method: "GET".into(),
        pattern: "/marker".into(),
        status: 200,
        body: Some("marker".into()),
    });
    server.config_updates.send(marker).unwrap();
    wait_for_status(&client, &server.url("/marker"), 200).await;

    assert_eq!(dispatcher.len(), 3);
    let res = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_reload_keeps_registered_handlers() {
    let config = parse_config(INITIAL).unwrap();
    let dispatcher = Dispatcher::from_routes(&config.routes).unwrap();
    dispatcher
        .register(
            "GET",
            "/code/:id",
            handler_fn(|_req, params| async move { params.get("id").unwrap_or_default().to_string() }),
        )
        .unwrap();
    let server = common::start_server(dispatcher.clone()).await;
    let client = common::client();

    server.config_updates.send(parse_config(RELOADED).unwrap().routes).unwrap();
    wait_for_status(&client, &server.url("/health"), 200).await;

    assert_eq!(dispatcher.len(), 2);
    let res = client.get(server.url("/code/7")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "7");

    let res = client.get(server.url("/users/42")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    server.shutdown.trigger();
}
