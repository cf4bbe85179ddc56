mod common;

use common::TestApp;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn task_listing_pages_with_meta() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("lister_{run_id}")).await;
    for i in 0..25 {
        app.create_task(&poster, &format!("Task {i} {run_id}")).await;
    }

    let page: serde_json::Value = app
        .client
        .get(format!(
            "{}/api/tasks?posterId={}&page=2&limit=10",
            app.server_url, poster.user_id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(page["data"].as_array().unwrap().len(), 10);
    assert_eq!(page["meta"]["total"], 25);
    assert_eq!(page["meta"]["page"], 2);
    assert_eq!(page["meta"]["limit"], 10);
    assert_eq!(page["meta"]["totalPages"], 3);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn oversized_limit_is_clamped() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("clamp_{run_id}")).await;
    app.create_task(&poster, &format!("Lone task {run_id}")).await;

    let page: serde_json::Value = app
        .client
        .get(format!(
            "{}/api/tasks?posterId={}&limit=100000",
            app.server_url, poster.user_id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(page["meta"]["limit"], 100);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn conversation_list_pages_past_the_end_are_empty() {
    let app = TestApp::spawn().await;
    let run_id = &Uuid::new_v4().to_string()[..8];

    let poster = app.create_user(&format!("alice_{run_id}")).await;
    let worker = app.create_user(&format!("bob_{run_id}")).await;
    let task_id = app.create_task(&poster, "Single thread").await;
    app.open_conversation(&worker, task_id, poster.user_id).await;

    let page: serde_json::Value = app
        .client
        .get(format!("{}/api/conversations?page=5&limit=10", app.server_url))
        .bearer_auth(&poster.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(page["data"].as_array().unwrap().is_empty());
    assert_eq!(page["meta"]["total"], 1);
}
