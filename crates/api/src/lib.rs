pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{get, patch, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/forgotpassword", post(routes::auth::forgot_password))
        .route("/verification", post(routes::auth::verify_reset_code))
        .route("/resendotp", post(routes::auth::resend_otp))
        .route("/resetpassword", post(routes::auth::reset_password))
        .route("/changepassword", post(routes::auth::change_password))
        .route("/updateprofile", put(routes::auth::update_profile));

    let workspace_routes = Router::new()
        .route(
            "/",
            post(routes::workspace::create).get(routes::workspace::list),
        )
        .route(
            "/{workspace_id}",
            get(routes::workspace::get).put(routes::workspace::update),
        )
        .route(
            "/{workspace_id}/deactivate",
            patch(routes::workspace::deactivate),
        )
        .route("/{workspace_id}/members", get(routes::member::members))
        .route(
            "/{workspace_id}/user/{admin_user_id}/members",
            post(routes::member::add_members).patch(routes::member::remove_members),
        )
        .route(
            "/{workspace_id}/projects",
            get(routes::member::workspace_projects),
        )
        .route("/{workspace_id}/tasks", get(routes::member::workspace_tasks))
        .route(
            "/{workspace_id}/members/{user_id}/exit",
            patch(routes::member::exit),
        )
        .route(
            "/members/role/{admin_user_id}",
            patch(routes::member::update_role),
        )
        .route(
            "/{workspace_id}/media-docs",
            get(routes::workspace::media_docs),
        )
        .route("/user/{user_id}/workspaces", get(routes::member::user_workspaces))
        .route("/user/{user_id}/projects", get(routes::member::user_projects))
        .route("/user/{user_id}/tasks", get(routes::member::user_tasks));

    let project_routes = Router::new()
        .route("/", post(routes::project::create))
        .route(
            "/{project_id}",
            get(routes::project::get).put(routes::project::update),
        )
        .route(
            "/{project_id}/deactivate",
            patch(routes::project::deactivate),
        )
        .route("/{project_id}/columns", post(routes::board::add_column))
        .route(
            "/{project_id}/columns/{column_id}",
            put(routes::board::update_column),
        )
        .route(
            "/{project_id}/columns/{column_id}/deactivate",
            patch(routes::board::deactivate_column),
        )
        .route("/{project_id}/order", put(routes::board::update_order))
        .route("/{project_id}/tasks", post(routes::task::add_task))
        .route(
            "/{project_id}/tasks/{task_id}",
            put(routes::task::update_task),
        )
        .route(
            "/{project_id}/tasks/{task_id}/move",
            put(routes::board::move_task),
        )
        .route(
            "/{project_id}/tasks/{task_id}/deactivate",
            put(routes::task::deactivate_task),
        );

    let notification_routes = Router::new()
        .route("/{id}", get(routes::notification::unread))
        .route("/{id}/read", patch(routes::notification::mark_read));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/workspaces", workspace_routes)
        .nest("/projects", project_routes)
        .nest("/notifications", notification_routes)
        .route("/upload", post(routes::upload::upload))
        .route("/get-image-url", get(routes::upload::get_image_url))
        .route("/get-existing-data", get(routes::common::get_existing_data));

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
