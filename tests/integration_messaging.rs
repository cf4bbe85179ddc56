mod common;

use common::TestApp;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn message_flow_updates_history_and_unread_counts() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let task_id = app.create_task(&poster, "Paint the fence").await;

    let opened = app.open_conversation(&worker, task_id, poster.user_id).await;
    let conversation_id: Uuid = opened["id"].as_str().unwrap().parse().unwrap();

    let sent = app.send_message(&worker, conversation_id, "When can I start?").await;
    let message_id = sent["id"].as_str().unwrap();

    // History carries the message with sender info, oldest first.
    let detail: serde_json::Value = app
        .client
        .get(format!("{}/api/conversations/{conversation_id}", app.server_url))
        .bearer_auth(&poster.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let messages = detail["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["id"].as_str().unwrap(), message_id);
    assert_eq!(messages[0]["sender"]["name"], format!("bob_{run_id}"));

    // The poster sees one unread message and the preview in their list.
    let list: serde_json::Value = app
        .client
        .get(format!("{}/api/conversations", app.server_url))
        .bearer_auth(&poster.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["data"][0]["unreadCount"], 1);
    assert_eq!(list["data"][0]["lastMessage"]["content"], "When can I start?");

    // Acknowledging the message clears the badge.
    let resp = app
        .client
        .post(format!("{}/api/messages/read", app.server_url))
        .bearer_auth(&poster.token)
        .json(&serde_json::json!({ "messageIds": [message_id] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["updated"], 1);

    let list: serde_json::Value = app
        .client
        .get(format!("{}/api/conversations", app.server_url))
        .bearer_auth(&poster.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["data"][0]["unreadCount"], 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn marking_read_twice_reports_zero_updates() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let task_id = app.create_task(&poster, "Mow the lawn").await;

    let opened = app.open_conversation(&worker, task_id, poster.user_id).await;
    let conversation_id: Uuid = opened["id"].as_str().unwrap().parse().unwrap();
    let sent = app.send_message(&worker, conversation_id, "Done by Friday").await;
    let message_id = sent["id"].as_str().unwrap();

    for expected in [1, 0] {
        let body: serde_json::Value = app
            .client
            .post(format!("{}/api/messages/read", app.server_url))
            .bearer_auth(&poster.token)
            .json(&serde_json::json!({ "messageIds": [message_id] }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["updated"], expected);
    }
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn non_participant_cannot_send() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let outsider = app.create_user(&format!("eve_{run_id}")).await;
    let task_id = app.create_task(&poster, "Members only").await;

    let opened = app.open_conversation(&worker, task_id, poster.user_id).await;
    let conversation_id = opened["id"].as_str().unwrap();

    let resp = app
        .client
        .post(format!("{}/api/messages", app.server_url))
        .bearer_auth(&outsider.token)
        .json(&serde_json::json!({ "conversationId": conversation_id, "content": "let me in" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn blank_content_is_rejected() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let task_id = app.create_task(&poster, "Empty talk").await;

    let opened = app.open_conversation(&worker, task_id, poster.user_id).await;
    let conversation_id = opened["id"].as_str().unwrap();

    let resp = app
        .client
        .post(format!("{}/api/messages", app.server_url))
        .bearer_auth(&worker.token)
        .json(&serde_json::json!({ "conversationId": conversation_id, "content": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn only_the_sender_can_edit_or_delete() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let task_id = app.create_task(&poster, "Edit wars").await;

    let opened = app.open_conversation(&worker, task_id, poster.user_id).await;
    let conversation_id: Uuid = opened["id"].as_str().unwrap().parse().unwrap();
    let sent = app.send_message(&worker, conversation_id, "typo herre").await;
    let message_id = sent["id"].as_str().unwrap();

    let resp = app
        .client
        .patch(format!("{}/api/messages/{message_id}", app.server_url))
        .bearer_auth(&poster.token)
        .json(&serde_json::json!({ "content": "hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .patch(format!("{}/api/messages/{message_id}", app.server_url))
        .bearer_auth(&worker.token)
        .json(&serde_json::json!({ "content": "typo here" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let edited: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(edited["content"], "typo here");

    let resp = app
        .client
        .delete(format!("{}/api/messages/{message_id}", app.server_url))
        .bearer_auth(&worker.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
}
