use serde_json::Value;

use super::test_app::TestApp;

pub struct SeededUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub token: String,
}

pub struct SeededWorkspace {
    pub id: String,
    pub name: String,
}

impl TestApp {
    /// Register a user, log them in, and return their id and token.
    pub async fn register_user(&self, username: &str, email: &str, password: &str) -> SeededUser {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Register request failed");
        assert_eq!(
            resp.status().as_u16(),
            201,
            "Register failed: {}",
            resp.text().await.unwrap_or_default()
        );

        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Login request failed");
        assert_eq!(resp.status().as_u16(), 200);

        let json: Value = resp.json().await.expect("Failed to parse login response");
        SeededUser {
            id: json["user"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            username: username.to_string(),
            token: json["token"].as_str().unwrap().to_string(),
        }
    }

    /// Create a workspace as `creator`, optionally inviting members by email.
    pub async fn seed_workspace(
        &self,
        creator: &SeededUser,
        name: &str,
        member_emails: &[&str],
    ) -> SeededWorkspace {
        let resp = self
            .auth_post("/api/workspaces", &creator.token)
            .json(&serde_json::json!({
                "name": name,
                "member_emails": member_emails,
            }))
            .send()
            .await
            .expect("Workspace create request failed");
        assert_eq!(
            resp.status().as_u16(),
            201,
            "Workspace create failed: {}",
            resp.text().await.unwrap_or_default()
        );

        let json: Value = resp.json().await.unwrap();
        SeededWorkspace {
            id: json["workspace"]["id"].as_str().unwrap().to_string(),
            name: name.to_string(),
        }
    }

    /// Create a project in the workspace and return its JSON (includes the
    /// three default columns).
    pub async fn seed_project(
        &self,
        creator: &SeededUser,
        workspace_id: &str,
        name: &str,
    ) -> Value {
        let resp = self
            .auth_post("/api/projects", &creator.token)
            .json(&serde_json::json!({
                "name": name,
                "workspace_id": workspace_id,
            }))
            .send()
            .await
            .expect("Project create request failed");
        assert_eq!(
            resp.status().as_u16(),
            201,
            "Project create failed: {}",
            resp.text().await.unwrap_or_default()
        );
        resp.json().await.unwrap()
    }
}
