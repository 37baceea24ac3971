use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn existing_data_lists_workspace_names() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    app.seed_workspace(&alice, "Acme", &[]).await;
    app.seed_workspace(&alice, "Globex", &[]).await;

    let resp = app
        .client
        .get(app.url("/api/get-existing-data?collection=workspaces&key=name"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let mut names: Vec<String> = resp.json().await.unwrap();
    names.sort();
    assert_eq!(names, vec!["Acme", "Globex"]);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn existing_data_skips_deactivated_workspaces() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let ws = app.seed_workspace(&alice, "Acme", &[]).await;
    app.seed_workspace(&alice, "Globex", &[]).await;

    let resp = app
        .auth_patch(
            &format!("/api/workspaces/{}/deactivate", ws.id),
            &alice.token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .client
        .get(app.url("/api/get-existing-data?collection=workspaces&key=name"))
        .send()
        .await
        .unwrap();
    let names: Vec<String> = resp.json().await.unwrap();
    assert_eq!(names, vec!["Globex"]);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn existing_data_rejects_unlisted_collection() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/api/get-existing-data?collection=notifications&key=message"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn existing_data_rejects_unlisted_key() {
    let app = TestApp::spawn().await;

    // Collection is allowed but the field is not in its whitelist
    let resp = app
        .client
        .get(app.url("/api/get-existing-data?collection=users&key=password"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn existing_data_requires_both_params() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/api/get-existing-data?collection=users"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Collection name and key are required");
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn image_url_requires_a_key() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;

    let resp = app
        .auth_get("/api/get-image-url?key=", &alice.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Key is required");
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn health_endpoint_answers_without_auth() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}
