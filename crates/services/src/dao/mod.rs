pub mod base;
pub mod notification;
pub mod project;
pub mod registry;
pub mod user;
pub mod workspace;

pub use base::{BaseDao, DaoError, DaoResult};
pub use notification::NotificationDao;
pub use project::{NewTask, ProjectDao, TaskPatch};
pub use registry::ValueRegistry;
pub use user::UserDao;
pub use workspace::{
    CommentView, MediaDocs, MediaRef, MemberStatus, MemberView, ProjectSummary, TaskView, UserRef,
    WorkspaceDao, WorkspaceSummary,
};
