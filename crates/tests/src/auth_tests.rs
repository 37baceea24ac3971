use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn register_creates_user() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "username": "alice",
            "email": "alice@test.com",
            "password": "Password123!",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["email"], "alice@test.com");
    assert_eq!(json["username"], "alice");
    assert_eq!(json["title"], "User");
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn register_rejects_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register_user("alice", "alice@test.com", "Password123!")
        .await;

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "username": "alice2",
            "email": "alice@test.com",
            "password": "Password123!",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn login_sets_cookie_and_returns_token() {
    let app = TestApp::spawn().await;
    app.register_user("bob", "bob@test.com", "Password123!")
        .await;

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": "bob@test.com",
            "password": "Password123!",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let set_cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(set_cookie.starts_with("access_token="));
    assert!(set_cookie.contains("HttpOnly"));

    let json: Value = resp.json().await.unwrap();
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["email"], "bob@test.com");
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn login_rejects_wrong_password() {
    let app = TestApp::spawn().await;
    app.register_user("carol", "carol@test.com", "Password123!")
        .await;

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": "carol@test.com",
            "password": "wrong",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn change_password_requires_current_password() {
    let app = TestApp::spawn().await;
    let user = app
        .register_user("dave", "dave@test.com", "Password123!")
        .await;

    let resp = app
        .auth_post("/api/auth/changepassword", &user.token)
        .json(&serde_json::json!({
            "current_password": "nope",
            "new_password": "NewPassword456!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let resp = app
        .auth_post("/api/auth/changepassword", &user.token)
        .json(&serde_json::json!({
            "current_password": "Password123!",
            "new_password": "NewPassword456!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // Old password no longer works
    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": "dave@test.com",
            "password": "Password123!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn reset_password_flow_with_code() {
    let app = TestApp::spawn().await;
    app.register_user("erin", "erin@test.com", "Password123!")
        .await;

    // Mail delivery is disabled in tests; the code lands in the user doc.
    let resp = app
        .client
        .post(app.url("/api/auth/forgotpassword"))
        .json(&serde_json::json!({ "email": "erin@test.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let user_doc = app
        .db
        .collection::<bson::Document>("users")
        .find_one(bson::doc! { "email": "erin@test.com" })
        .await
        .unwrap()
        .unwrap();
    let code = user_doc.get_str("reset_code").unwrap().to_string();

    let resp = app
        .client
        .post(app.url("/api/auth/verification"))
        .json(&serde_json::json!({ "email": "erin@test.com", "code": code }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .client
        .post(app.url("/api/auth/resetpassword"))
        .json(&serde_json::json!({
            "email": "erin@test.com",
            "code": code,
            "new_password": "Fresh789!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": "erin@test.com",
            "password": "Fresh789!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn verification_rejects_wrong_code() {
    let app = TestApp::spawn().await;
    app.register_user("frank", "frank@test.com", "Password123!")
        .await;

    app.client
        .post(app.url("/api/auth/forgotpassword"))
        .json(&serde_json::json!({ "email": "frank@test.com" }))
        .send()
        .await
        .unwrap();

    let resp = app
        .client
        .post(app.url("/api/auth/verification"))
        .json(&serde_json::json!({ "email": "frank@test.com", "code": "0000" }))
        .send()
        .await
        .unwrap();
    // Generated codes are 1000..=9999, so "0000" can never match.
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn protected_route_rejects_missing_token() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/api/workspaces"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}
