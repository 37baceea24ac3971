use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn new_project_seeds_default_board() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let ws = app.seed_workspace(&alice, "Acme", &[]).await;
    let project = app.seed_project(&alice, &ws.id, "Site").await;

    let columns = project["columns"].as_array().unwrap();
    let titles: Vec<&str> = columns
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["To Do", "In Progress", "Done"]);

    // order lists exactly the three column ids, in creation order
    let order = project["order"].as_array().unwrap();
    assert_eq!(order.len(), 3);
    for (entry, column) in order.iter().zip(columns) {
        assert_eq!(entry, &column["id"]);
    }
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn project_create_requires_workspace_membership() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let mallory = app
        .register_user("mallory", "mallory@test.com", "Password123!")
        .await;
    let ws = app.seed_workspace(&alice, "Acme", &[]).await;

    let resp = app
        .auth_post("/api/projects", &mallory.token)
        .json(&serde_json::json!({ "name": "Rogue", "workspace_id": ws.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn added_column_lands_at_end_of_order() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let ws = app.seed_workspace(&alice, "Acme", &[]).await;
    let project = app.seed_project(&alice, &ws.id, "Site").await;
    let pid = project["id"].as_str().unwrap();

    let resp = app
        .auth_post(&format!("/api/projects/{}/columns", pid), &alice.token)
        .json(&serde_json::json!({ "title": "Review" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let json: Value = resp.json().await.unwrap();
    let columns = json["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 4);
    let new_id = &columns[3]["id"];
    assert_eq!(json["order"].as_array().unwrap().last().unwrap(), new_id);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn reorder_rejects_unknown_column_ids() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let ws = app.seed_workspace(&alice, "Acme", &[]).await;
    let project = app.seed_project(&alice, &ws.id, "Site").await;
    let pid = project["id"].as_str().unwrap();

    let mut order: Vec<String> = project["order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    order[2] = bson::oid::ObjectId::new().to_hex();

    let resp = app
        .auth_put(&format!("/api/projects/{}/order", pid), &alice.token)
        .json(&serde_json::json!({ "order": order }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn reorder_accepts_a_permutation() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let ws = app.seed_workspace(&alice, "Acme", &[]).await;
    let project = app.seed_project(&alice, &ws.id, "Site").await;
    let pid = project["id"].as_str().unwrap();

    let mut order: Vec<String> = project["order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    order.reverse();

    let resp = app
        .auth_put(&format!("/api/projects/{}/order", pid), &alice.token)
        .json(&serde_json::json!({ "order": order }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let stored: Vec<&str> = json["order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(stored, order.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn move_task_keeps_single_occurrence() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let ws = app.seed_workspace(&alice, "Acme", &[]).await;
    let project = app.seed_project(&alice, &ws.id, "Site").await;
    let pid = project["id"].as_str().unwrap().to_string();
    let todo = project["order"][0].as_str().unwrap().to_string();
    let doing = project["order"][1].as_str().unwrap().to_string();

    let resp = app
        .auth_post(&format!("/api/projects/{}/tasks", pid), &alice.token)
        .json(&serde_json::json!({ "name": "Wireframes", "column_id": todo }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.unwrap();
    let task_id = created["task_id"].as_str().unwrap().to_string();

    let resp = app
        .auth_put(
            &format!("/api/projects/{}/tasks/{}/move", pid, task_id),
            &alice.token,
        )
        .json(&serde_json::json!({
            "source_column_id": todo,
            "destination_column_id": doing,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let columns = json["columns"].as_array().unwrap();
    let count = |cid: &str| {
        columns
            .iter()
            .find(|c| c["id"] == cid)
            .unwrap()["task_ids"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|t| t.as_str() == Some(task_id.as_str()))
            .count()
    };
    assert_eq!(count(&todo), 0);
    assert_eq!(count(&doing), 1);

    // Repeating the same move fails: the task is no longer in the source
    let resp = app
        .auth_put(
            &format!("/api/projects/{}/tasks/{}/move", pid, task_id),
            &alice.token,
        )
        .json(&serde_json::json!({
            "source_column_id": todo,
            "destination_column_id": doing,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn deactivated_column_stays_in_order_and_keeps_tasks() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let ws = app.seed_workspace(&alice, "Acme", &[]).await;
    let project = app.seed_project(&alice, &ws.id, "Site").await;
    let pid = project["id"].as_str().unwrap().to_string();
    let todo = project["order"][0].as_str().unwrap().to_string();

    let resp = app
        .auth_post(&format!("/api/projects/{}/tasks", pid), &alice.token)
        .json(&serde_json::json!({ "name": "Wireframes", "column_id": todo }))
        .send()
        .await
        .unwrap();
    let created: Value = resp.json().await.unwrap();
    let task_id = created["task_id"].as_str().unwrap().to_string();

    let resp = app
        .auth_patch(
            &format!("/api/projects/{}/columns/{}/deactivate", pid, todo),
            &alice.token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(&format!("/api/projects/{}", pid), &alice.token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();

    // Hidden but present: still in order, task_ids untouched
    assert!(json["order"].as_array().unwrap().iter().any(|v| v == todo.as_str()));
    let column = json["columns"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == todo.as_str())
        .unwrap();
    assert_eq!(column["is_active"], false);
    assert_eq!(column["task_ids"][0], task_id);
}
