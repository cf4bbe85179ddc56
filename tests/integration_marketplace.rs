mod common;

use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn bid_lifecycle_enforces_roles() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let bidder = app.create_user(&format!("bob_{run_id}")).await;
    let task_id = app.create_task(&poster, "Build a shed").await;

    // Posters cannot bid on their own tasks.
    let resp = app
        .client
        .post(format!("{}/api/bids", app.server_url))
        .bearer_auth(&poster.token)
        .json(&json!({ "taskId": task_id, "amount": "100.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = app
        .client
        .post(format!("{}/api/bids", app.server_url))
        .bearer_auth(&bidder.token)
        .json(&json!({ "taskId": task_id, "amount": "120.50", "comment": "two days" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let bid: serde_json::Value = resp.json().await.unwrap();
    let bid_id = bid["id"].as_str().unwrap();

    // Second bid on the same task conflicts.
    let resp = app
        .client
        .post(format!("{}/api/bids", app.server_url))
        .bearer_auth(&bidder.token)
        .json(&json!({ "taskId": task_id, "amount": "110.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    // Only the task owner can accept.
    let resp = app
        .client
        .patch(format!("{}/api/bids/{bid_id}", app.server_url))
        .bearer_auth(&bidder.token)
        .json(&json!({ "status": "accepted" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .patch(format!("{}/api/bids/{bid_id}", app.server_url))
        .bearer_auth(&poster.token)
        .json(&json!({ "status": "accepted" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let accepted: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(accepted["status"], "accepted");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn payment_and_review_wrap_up_a_task() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let task_id = app.create_task(&poster, "Tile the bathroom").await;

    let resp = app
        .client
        .post(format!("{}/api/payments", app.server_url))
        .bearer_auth(&poster.token)
        .json(&json!({ "taskId": task_id, "payeeId": worker.user_id, "amount": "250.00" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let payment: serde_json::Value = resp.json().await.unwrap();
    let payment_id = payment["id"].as_str().unwrap();

    let resp = app
        .client
        .patch(format!("{}/api/payments/{payment_id}", app.server_url))
        .bearer_auth(&poster.token)
        .json(&json!({ "status": "completed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .post(format!("{}/api/reviews", app.server_url))
        .bearer_auth(&poster.token)
        .json(&json!({ "taskId": task_id, "revieweeId": worker.user_id, "rating": 5, "comment": "spotless" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    // One review per reviewer per task.
    let resp = app
        .client
        .post(format!("{}/api/reviews", app.server_url))
        .bearer_auth(&poster.token)
        .json(&json!({ "taskId": task_id, "revieweeId": worker.user_id, "rating": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    // Rating bounds are validated before the database sees them.
    let resp = app
        .client
        .post(format!("{}/api/reviews", app.server_url))
        .bearer_auth(&worker.token)
        .json(&json!({ "taskId": task_id, "revieweeId": poster.user_id, "rating": 6 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn task_updates_are_owner_only_and_status_checked() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let stranger = app.create_user(&format!("eve_{run_id}")).await;
    let task_id = app.create_task(&poster, "Guarded task").await;

    let resp = app
        .client
        .patch(format!("{}/api/tasks/{task_id}", app.server_url))
        .bearer_auth(&stranger.token)
        .json(&json!({ "title": "mine now" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .patch(format!("{}/api/tasks/{task_id}", app.server_url))
        .bearer_auth(&poster.token)
        .json(&json!({ "status": "paused" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = app
        .client
        .patch(format!("{}/api/tasks/{task_id}", app.server_url))
        .bearer_auth(&poster.token)
        .json(&json!({ "status": "in_progress" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn requests_without_a_token_are_unauthorized() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(format!("{}/api/conversations", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "UNAUTHENTICATED");
}
