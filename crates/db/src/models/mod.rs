pub mod notification;
pub mod project;
pub mod user;
pub mod workspace;

pub use notification::Notification;
pub use project::{
    Attachment, BoardError, Column, Comment, DocType, Priority, Project, Task, UserSnapshot,
};
pub use user::User;
pub use workspace::{
    AddMemberOutcome, Member, MemberRole, MembershipError, Workspace, WorkspaceExit,
};
