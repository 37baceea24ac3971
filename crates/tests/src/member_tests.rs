use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn add_members_is_admin_gated_and_reports_statuses() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let bob = app
        .register_user("bob", "bob@test.com", "Password123!")
        .await;
    app.register_user("carol", "carol@test.com", "Password123!")
        .await;
    let ws = app
        .seed_workspace(&alice, "Acme", &["bob@test.com"])
        .await;

    // Bob (Member) cannot add
    let resp = app
        .auth_post(
            &format!("/api/workspaces/{}/user/{}/members", ws.id, bob.id),
            &bob.token,
        )
        .json(&serde_json::json!({ "emails": ["carol@test.com"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    // Alice (Admin) gets per-email statuses
    let resp = app
        .auth_post(
            &format!("/api/workspaces/{}/user/{}/members", ws.id, alice.id),
            &alice.token,
        )
        .json(&serde_json::json!({
            "emails": ["carol@test.com", "bob@test.com", "ghost@test.com"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let statuses = json["member_statuses"].as_array().unwrap();
    assert_eq!(statuses[0]["status"], "Added successfully");
    assert_eq!(statuses[1]["status"], "Member already in workspace");
    assert_eq!(statuses[2]["status"], "User not found");
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn removed_member_is_reactivated_on_re_add() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    app.register_user("bob", "bob@test.com", "Password123!")
        .await;
    let ws = app
        .seed_workspace(&alice, "Acme", &["bob@test.com"])
        .await;

    let resp = app
        .auth_patch(
            &format!("/api/workspaces/{}/user/{}/members", ws.id, alice.id),
            &alice.token,
        )
        .json(&serde_json::json!({ "emails": ["bob@test.com"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let statuses: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(statuses[0]["status"], "Deactivated successfully");

    // Membership history survives the removal, re-adding reactivates in place
    let resp = app
        .auth_post(
            &format!("/api/workspaces/{}/user/{}/members", ws.id, alice.id),
            &alice.token,
        )
        .json(&serde_json::json!({ "emails": ["bob@test.com"] }))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(
        json["member_statuses"][0]["status"],
        "Member activated and added to workspace"
    );
    assert_eq!(json["workspace"]["members"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn admin_cannot_remove_themselves() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let ws = app.seed_workspace(&alice, "Acme", &[]).await;

    let resp = app
        .auth_patch(
            &format!("/api/workspaces/{}/user/{}/members", ws.id, alice.id),
            &alice.token,
        )
        .json(&serde_json::json!({ "emails": ["alice@test.com"] }))
        .send()
        .await
        .unwrap();
    let statuses: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(statuses[0]["status"], "Admin user cannot remove themselves");
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn last_admin_cannot_exit_while_members_remain() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    app.register_user("bob", "bob@test.com", "Password123!")
        .await;
    let ws = app
        .seed_workspace(&alice, "Acme", &["bob@test.com"])
        .await;

    let resp = app
        .auth_patch(
            &format!("/api/workspaces/{}/members/{}/exit", ws.id, alice.id),
            &alice.token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("assign another admin")
    );
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn sole_member_exit_deactivates_workspace_and_frees_name() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let ws = app.seed_workspace(&alice, "Acme", &[]).await;

    let resp = app
        .auth_patch(
            &format!("/api/workspaces/{}/members/{}/exit", ws.id, alice.id),
            &alice.token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["workspace_deactivated"], true);

    // The name is renamed on deactivation, so it can be reused
    let resp = app
        .auth_post("/api/workspaces", &alice.token)
        .json(&serde_json::json!({ "name": "Acme" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn role_promotion_allows_previous_admin_to_exit() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    app.register_user("bob", "bob@test.com", "Password123!")
        .await;
    let bob_id = {
        let bob = app
            .client
            .post(app.url("/api/auth/login"))
            .json(&serde_json::json!({ "email": "bob@test.com", "password": "Password123!" }))
            .send()
            .await
            .unwrap()
            .json::<Value>()
            .await
            .unwrap();
        bob["user"]["id"].as_str().unwrap().to_string()
    };
    let ws = app
        .seed_workspace(&alice, "Acme", &["bob@test.com"])
        .await;

    let resp = app
        .auth_patch(
            &format!("/api/workspaces/members/role/{}", alice.id),
            &alice.token,
        )
        .json(&serde_json::json!({
            "workspace_id": ws.id,
            "user_id": bob_id,
            "role": "Admin",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // With a second active admin in place, Alice can leave
    let resp = app
        .auth_patch(
            &format!("/api/workspaces/{}/members/{}/exit", ws.id, alice.id),
            &alice.token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["workspace_deactivated"], false);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn member_role_update_is_admin_gated() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    let bob = app
        .register_user("bob", "bob@test.com", "Password123!")
        .await;
    let ws = app
        .seed_workspace(&alice, "Acme", &["bob@test.com"])
        .await;

    let resp = app
        .auth_patch(
            &format!("/api/workspaces/members/role/{}", bob.id),
            &bob.token,
        )
        .json(&serde_json::json!({
            "workspace_id": ws.id,
            "user_id": bob.id,
            "role": "Admin",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn members_listing_joins_user_profiles() {
    let app = TestApp::spawn().await;
    let alice = app
        .register_user("alice", "alice@test.com", "Password123!")
        .await;
    app.register_user("bob", "bob@test.com", "Password123!")
        .await;
    let ws = app
        .seed_workspace(&alice, "Acme", &["bob@test.com"])
        .await;

    let resp = app
        .auth_get(&format!("/api/workspaces/{}/members", ws.id), &alice.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let members: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(members.len(), 2);
    assert!(
        members
            .iter()
            .any(|m| m["user"]["email"] == "bob@test.com" && m["role"] == "Member")
    );
}
