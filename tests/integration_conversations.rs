mod common;

use common::TestApp;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn conversation_resolution_is_symmetric() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let task_id = app.create_task(&poster, "Fix my sink").await;

    // The worker reaches out first; the poster still lands on the client side.
    let opened = app.open_conversation(&worker, task_id, poster.user_id).await;
    assert_eq!(opened["clientId"].as_str().unwrap(), poster.user_id.to_string());
    assert_eq!(opened["workerId"].as_str().unwrap(), worker.user_id.to_string());

    // Resolving from the other direction yields the same conversation.
    let resp = app
        .client
        .get(format!(
            "{}/api/conversations/by-task/{}/{}",
            app.server_url, task_id, worker.user_id
        ))
        .bearer_auth(&poster.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let resolved: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(resolved["id"], opened["id"]);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn self_conversation_is_rejected() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("solo_{run_id}")).await;
    let task_id = app.create_task(&poster, "Talk to myself").await;

    let resp = app
        .client
        .post(format!("{}/api/conversations", app.server_url))
        .bearer_auth(&poster.token)
        .json(&serde_json::json!({ "taskId": task_id, "recipientId": poster.user_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn non_participant_cannot_see_conversation() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let outsider = app.create_user(&format!("eve_{run_id}")).await;
    let task_id = app.create_task(&poster, "Private job").await;

    let opened = app.open_conversation(&worker, task_id, poster.user_id).await;
    let conversation_id = opened["id"].as_str().unwrap();

    let resp = app
        .client
        .get(format!("{}/api/conversations/{conversation_id}", app.server_url))
        .bearer_auth(&outsider.token)
        .send()
        .await
        .unwrap();

    // Absent and hidden are indistinguishable to outsiders.
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn pinned_conversations_sort_first_for_the_pinner_only() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker_a = app.create_user(&format!("bob_{run_id}")).await;
    let worker_b = app.create_user(&format!("carol_{run_id}")).await;
    let task_id = app.create_task(&poster, "Two applicants").await;

    let old = app.open_conversation(&worker_a, task_id, poster.user_id).await;
    let old_id: Uuid = old["id"].as_str().unwrap().parse().unwrap();
    app.send_message(&worker_a, old_id, "first in").await;

    let recent = app.open_conversation(&worker_b, task_id, poster.user_id).await;
    let recent_id: Uuid = recent["id"].as_str().unwrap().parse().unwrap();
    app.send_message(&worker_b, recent_id, "second in").await;

    // Poster pins the older conversation.
    let resp = app
        .client
        .post(format!("{}/api/conversations/pin", app.server_url))
        .bearer_auth(&poster.token)
        .json(&serde_json::json!({ "conversationId": old_id, "pinned": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let pinned: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(pinned["isPinned"], true);

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
    let ids: Vec<&str> = list["data"].as_array().unwrap().iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(ids[0], old_id.to_string(), "pinned conversation should lead despite older activity");

    // The pin is private: worker A's own single-thread list is unpinned.
    let worker_list: serde_json::Value = app
        .client
        .get(format!("{}/api/conversations", app.server_url))
        .bearer_auth(&worker_a.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(worker_list["data"][0]["isPinned"], false);
}
