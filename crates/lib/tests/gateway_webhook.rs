//! Integration test: start the gateway on a free port with the Graph API mocked by
//! wiremock, then drive the webhook the way the platform does.

use lib::config::Config;
use lib::gateway;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}

fn test_config(port: u16, graph_api_base: String) -> Config {
    let mut config = Config::default();
    config.server.port = port;
    config.server.bind = "127.0.0.1".to_string();
    config.messenger.page_access_token = Some("test-token".to_string());
    config.messenger.verify_token = Some("verify-me".to_string());
    config.messenger.graph_api_base = graph_api_base;
    config
}

/// Env tokens take precedence over the config these tests build.
fn tokens_set_in_env() -> bool {
    std::env::var("PAGE_ACCESS_TOKEN").is_ok() || std::env::var("MESSENGER_VERIFY_TOKEN").is_ok()
}

/// Spawn the gateway and wait until GET / answers. Returns the base URL.
async fn start_gateway(config: Config) -> String {
    let base = format!("http://127.0.0.1:{}", config.server.port);
    tokio::spawn(async move {
        let _ = gateway::run_gateway(config).await;
    });

    let client = reqwest::Client::new();
    for _ in 0..100 {
        if let Ok(resp) = client.get(format!("{}/", base)).send().await {
            if resp.status().is_success() {
                return base;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("gateway at {} did not become healthy within 5s", base);
}

async fn mock_send_api(status: u16) -> MockServer {
    let graph = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.6/me/messages"))
        .and(query_param("access_token", "test-token"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(json!({ "recipient_id": "PSID", "message_id": "mid.1" })),
        )
        .mount(&graph)
        .await;
    graph
}

async fn sent_bodies(graph: &MockServer) -> Vec<serde_json::Value> {
    graph
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.body_json::<serde_json::Value>().expect("send api body is json"))
        .collect()
}

#[tokio::test]
async fn webhook_round_trip_against_mock_send_api() {
    if tokens_set_in_env() {
        return;
    }
    let graph = mock_send_api(200).await;
    let base = start_gateway(test_config(free_port(), graph.uri())).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/webhook", base))
        .query(&[
            ("hub.mode", "subscribe"),
            ("hub.verify_token", "verify-me"),
            ("hub.challenge", "1158201444"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "1158201444");

    let res = client
        .get(format!("{}/webhook", base))
        .query(&[
            ("hub.mode", "subscribe"),
            ("hub.verify_token", "wrong"),
            ("hub.challenge", "1158201444"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);

    let text_event = json!({
        "object": "page",
        "entry": [{
            "id": "PAGE_ID",
            "time": 1458692752478u64,
            "messaging": [{
                "sender": { "id": "PSID" },
                "recipient": { "id": "PAGE_ID" },
                "timestamp": 1458692752478u64,
                "message": { "mid": "mid.1", "text": "hello bot" }
            }]
        }]
    });
    let res = client
        .post(format!("{}/webhook", base))
        .json(&text_event)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.json::<serde_json::Value>().await.unwrap(),
        json!({ "status": 200 })
    );

    let attachment_event = json!({
        "object": "page",
        "entry": [{ "messaging": [{
            "sender": { "id": "PSID" },
            "message": { "attachments": [
                { "type": "image", "payload": { "url": "https://cdn.example/cat.png" } }
            ] }
        }] }]
    });
    let res = client
        .post(format!("{}/webhook", base))
        .json(&attachment_event)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let postback_event = json!({
        "object": "page",
        "entry": [{ "messaging": [{
            "sender": { "id": "PSID" },
            "postback": { "title": "Yes!", "payload": "yes" }
        }] }]
    });
    let res = client
        .post(format!("{}/webhook", base))
        .json(&postback_event)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .post(format!("{}/webhook", base))
        .json(&json!({ "object": "user", "entry": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let bodies = sent_bodies(&graph).await;
    assert_eq!(bodies.len(), 3, "one send api call per handled event");

    assert_eq!(
        bodies[0],
        json!({
            "recipient": { "id": "PSID" },
            "message": { "text": "You sent the message: \"hello bot\". Now send me an attachment!" }
        })
    );

    let attachment = &bodies[1]["message"]["attachment"];
    assert_eq!(attachment["type"], "template");
    assert_eq!(attachment["payload"]["template_type"], "generic");
    let element = &attachment["payload"]["elements"][0];
    assert_eq!(element["image_url"], "https://cdn.example/cat.png");
    let buttons = element["buttons"].as_array().unwrap();
    assert_eq!(buttons.len(), 2);
    assert_eq!(buttons[0]["payload"], "yes");
    assert_eq!(buttons[1]["payload"], "no");

    assert_eq!(bodies[2]["message"], json!({ "text": "Thanks" }));
}

#[tokio::test]
async fn send_api_failure_still_acknowledges_event() {
    if tokens_set_in_env() {
        return;
    }
    let graph = mock_send_api(500).await;
    let base = start_gateway(test_config(free_port(), graph.uri())).await;

    let res = reqwest::Client::new()
        .post(format!("{}/webhook", base))
        .json(&json!({
            "object": "page",
            "entry": [{ "messaging": [{ "sender": { "id": "PSID" }, "postback": { "payload": "no" } }] }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.json::<serde_json::Value>().await.unwrap(),
        json!({ "status": 200 })
    );

    let bodies = sent_bodies(&graph).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0]["message"],
        json!({ "text": "Oops, try sending another image." })
    );
}

#[tokio::test]
async fn refuses_to_start_without_access_token() {
    if std::env::var("PAGE_ACCESS_TOKEN").is_ok() {
        return;
    }
    let mut config = test_config(free_port(), "http://127.0.0.1:1".to_string());
    config.messenger.page_access_token = None;
    let err = gateway::run_gateway(config).await.unwrap_err();
    assert!(err.to_string().contains("page access token"));
}
