use mongodb::Database;
use std::sync::Arc;
use taskwise_config::Settings;
use taskwise_services::{
    AuthService, Mailer, ObjectStorage,
    dao::{
        notification::NotificationDao, project::ProjectDao, registry::ValueRegistry,
        user::UserDao, workspace::WorkspaceDao,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub workspaces: Arc<WorkspaceDao>,
    pub projects: Arc<ProjectDao>,
    pub notifications: Arc<NotificationDao>,
    pub registry: Arc<ValueRegistry>,
    pub storage: Arc<ObjectStorage>,
    pub mailer: Arc<Mailer>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let users = Arc::new(UserDao::new(&db));
        let workspaces = Arc::new(WorkspaceDao::new(&db));
        let projects = Arc::new(ProjectDao::new(&db));
        let notifications = Arc::new(NotificationDao::new(&db));
        let registry = Arc::new(ValueRegistry::new(&db));
        let storage = Arc::new(ObjectStorage::new(settings.s3.clone()));
        let mailer = Arc::new(Mailer::new(settings.email.clone()));

        Self {
            db,
            settings,
            auth,
            users,
            workspaces,
            projects,
            notifications,
            registry,
            storage,
            mailer,
        }
    }
}
