mod common;

use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn socket_send_delivers_to_room_and_acks_sender() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let task_id = app.create_task(&poster, "Live chat").await;

    let opened = app.open_conversation(&worker, task_id, poster.user_id).await;
    let conversation_id = opened["id"].as_str().unwrap().to_string();

    let mut worker_ws = app.connect_ws(&worker.token).await;
    let mut poster_ws = app.connect_ws(&poster.token).await;

    worker_ws
        .send_json(json!({ "event": "join:conversation", "data": { "conversationId": conversation_id }, "ackId": 1 }))
        .await;
    let ack = worker_ws.expect_event("ack").await;
    assert_eq!(ack["data"]["success"], true);

    poster_ws
        .send_json(json!({ "event": "join:conversation", "data": { "conversationId": conversation_id }, "ackId": 1 }))
        .await;
    poster_ws.expect_event("ack").await;

    worker_ws
        .send_json(json!({
            "event": "message:send",
            "data": { "conversationId": conversation_id, "content": "over the wire" },
            "ackId": 2
        }))
        .await;

    let ack = worker_ws.expect_event("ack").await;
    assert_eq!(ack["ackId"], 2);
    assert_eq!(ack["data"]["success"], true);
    assert_eq!(ack["data"]["message"]["content"], "over the wire");

    // Room subscribers get the full message.
    let delivered = poster_ws.expect_event("message:new").await;
    assert_eq!(delivered["data"]["message"]["content"], "over the wire");

    // The personal channel gets the chat-list update.
    let update = poster_ws.expect_event("conversation:newMessage").await;
    assert_eq!(update["data"]["conversationId"].as_str().unwrap(), conversation_id);
    assert_eq!(update["data"]["senderId"].as_str().unwrap(), worker.user_id.to_string());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn joining_a_foreign_room_is_refused() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let outsider = app.create_user(&format!("eve_{run_id}")).await;
    let task_id = app.create_task(&poster, "Closed room").await;

    let opened = app.open_conversation(&worker, task_id, poster.user_id).await;
    let conversation_id = opened["id"].as_str().unwrap();

    let mut ws = app.connect_ws(&outsider.token).await;
    ws.send_json(json!({ "event": "join:conversation", "data": { "conversationId": conversation_id }, "ackId": 9 }))
        .await;

    let ack = ws.expect_event("ack").await;
    assert_eq!(ack["ackId"], 9);
    assert_eq!(ack["data"]["success"], false);
    assert_eq!(ack["data"]["code"], "NOT_FOUND");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn typing_indicators_relay_to_the_room() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let task_id = app.create_task(&poster, "Is anyone there").await;

    let opened = app.open_conversation(&worker, task_id, poster.user_id).await;
    let conversation_id = opened["id"].as_str().unwrap().to_string();

    let mut worker_ws = app.connect_ws(&worker.token).await;
    let mut poster_ws = app.connect_ws(&poster.token).await;
    for ws in [&mut worker_ws, &mut poster_ws] {
        ws.send_json(json!({ "event": "join:conversation", "data": { "conversationId": conversation_id }, "ackId": 1 }))
            .await;
        ws.expect_event("ack").await;
    }

    worker_ws.send_json(json!({ "event": "typing:start", "data": { "conversationId": conversation_id } })).await;
    let typing = poster_ws.expect_event("typing:start").await;
    assert_eq!(typing["data"]["userId"].as_str().unwrap(), worker.user_id.to_string());

    worker_ws.send_json(json!({ "event": "typing:stop", "data": { "conversationId": conversation_id } })).await;
    poster_ws.expect_event("typing:stop").await;
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn handshake_with_bad_token_is_rejected() {
    let app = TestApp::spawn().await;

    let result = tokio_tungstenite::connect_async(format!("{}/api/gateway?token=garbage", app.ws_url)).await;
    assert!(result.is_err(), "handshake should fail with an invalid token");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn read_receipts_reach_room_subscribers() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let task_id = app.create_task(&poster, "Receipts").await;

    let opened = app.open_conversation(&worker, task_id, poster.user_id).await;
    let conversation_id: Uuid = opened["id"].as_str().unwrap().parse().unwrap();
    let sent = app.send_message(&worker, conversation_id, "read me").await;
    let message_id = sent["id"].as_str().unwrap();

    let mut worker_ws = app.connect_ws(&worker.token).await;
    worker_ws
        .send_json(json!({ "event": "join:conversation", "data": { "conversationId": conversation_id }, "ackId": 1 }))
        .await;
    worker_ws.expect_event("ack").await;

    let resp = app
        .client
        .post(format!("{}/api/messages/read", app.server_url))
        .bearer_auth(&poster.token)
        .json(&json!({ "messageIds": [message_id] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let receipt = worker_ws.expect_event("message:read").await;
    assert_eq!(receipt["data"]["readBy"].as_str().unwrap(), poster.user_id.to_string());
    assert_eq!(receipt["data"]["messageIds"][0].as_str().unwrap(), message_id);
}
