use bson::{doc, oid::ObjectId};
use mongodb::Database;
use serde::Serialize;
use taskwise_db::models::{
    AddMemberOutcome, Attachment, Comment, DocType, MemberRole, Priority, Project, User,
    UserSnapshot, Workspace, WorkspaceExit,
};

use super::base::{BaseDao, DaoError, DaoResult};

/// Per-email outcome of a batch membership operation. Partial success is
/// normal: one bad email never fails the whole call.
#[derive(Debug, Clone, Serialize)]
pub struct MemberStatus {
    pub email: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct MemberView {
    pub user: MemberUserView,
    pub role: MemberRole,
    pub is_active: bool,
    pub joined_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MemberUserView {
    pub id: String,
    pub email: String,
    pub img_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceSummary {
    pub id: String,
    pub name: String,
    pub img_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub img_url: Option<String>,
    pub workspace_id: String,
    pub workspace_name: String,
}

/// Hex-id rendering of an embedded user snapshot, for JSON responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&UserSnapshot> for UserRef {
    fn from(snapshot: &UserSnapshot) -> Self {
        Self {
            id: snapshot.id.to_hex(),
            username: snapshot.username.clone(),
            email: snapshot.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub user: UserRef,
    pub text: String,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            user: UserRef::from(&comment.user),
            text: comment.text.clone(),
        }
    }
}

/// Flattened cross-project task row, the shape the board UI lists.
#[derive(Debug, Serialize)]
pub struct TaskView {
    pub id: String,
    pub project_id: String,
    pub project: String,
    pub workspace: String,
    pub name: String,
    pub content: Option<String>,
    pub assignee: Option<UserRef>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub attachments: Vec<Attachment>,
    pub comments: Vec<CommentView>,
    pub created_by: UserRef,
}

#[derive(Debug, Serialize)]
pub struct MediaDocs {
    pub img_urls: Vec<MediaRef>,
    pub doc_urls: Vec<MediaRef>,
}

#[derive(Debug, Serialize)]
pub struct MediaRef {
    pub name: String,
    pub url: String,
}

pub struct WorkspaceDao {
    pub base: BaseDao<Workspace>,
    pub users: BaseDao<User>,
    pub projects: BaseDao<Project>,
}

impl WorkspaceDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Workspace::COLLECTION),
            users: BaseDao::new(db, User::COLLECTION),
            projects: BaseDao::new(db, Project::COLLECTION),
        }
    }

    /// Creates a workspace with the creator as sole Admin; any provided
    /// member emails are resolved and added with the Member role, with a
    /// per-email status report.
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
        img_key: String,
        img_url: Option<String>,
        creator_user_id: ObjectId,
        member_emails: Vec<String>,
    ) -> DaoResult<(Workspace, Vec<MemberStatus>)> {
        let creator = self.users.find_by_id(creator_user_id).await?;

        let mut workspace = Workspace::new(
            name,
            description,
            img_key,
            img_url,
            creator.id.expect("loaded user has an id"),
        );

        let mut statuses = Vec::new();
        for email in member_emails {
            match self.users.find_one(doc! { "email": &email }).await? {
                Some(user) => {
                    workspace.add_or_reactivate_member(
                        user.id.expect("loaded user has an id"),
                        MemberRole::Member,
                    );
                    statuses.push(MemberStatus {
                        email,
                        status: "Added".to_string(),
                    });
                }
                None => statuses.push(MemberStatus {
                    email,
                    status: "Not Found".to_string(),
                }),
            }
        }

        let id = self.base.insert_one(&workspace).await?;
        Ok((self.base.find_by_id(id).await?, statuses))
    }

    pub async fn list(&self, is_active: bool) -> DaoResult<Vec<Workspace>> {
        self.base
            .find_many(doc! { "is_active": is_active }, Some(doc! { "name": 1 }))
            .await
    }

    pub async fn update(
        &self,
        workspace_id: ObjectId,
        name: Option<String>,
        description: Option<String>,
        img_key: Option<String>,
        img_url: Option<String>,
    ) -> DaoResult<Workspace> {
        let mut set = bson::Document::new();
        if let Some(name) = name {
            set.insert("name", name);
        }
        if let Some(description) = description {
            set.insert("description", description);
        }
        if let Some(img_key) = img_key {
            set.insert("img_key", img_key);
        }
        if let Some(img_url) = img_url {
            set.insert("img_url", img_url);
        }

        if !set.is_empty() {
            self.base
                .update_by_id(workspace_id, doc! { "$set": set })
                .await?;
        }
        self.base.find_by_id(workspace_id).await
    }

    pub async fn deactivate(
        &self,
        workspace_id: ObjectId,
        requesting_user_id: ObjectId,
    ) -> DaoResult<()> {
        let workspace = self.base.find_by_id(workspace_id).await?;
        if !workspace.is_active_admin(requesting_user_id) {
            return Err(DaoError::Forbidden(
                "You are not allowed to deactivate this workspace".to_string(),
            ));
        }

        self.base
            .update_by_id(
                workspace_id,
                doc! { "$set": { "is_active": false, "deactivated_at": bson::DateTime::now() } },
            )
            .await?;
        Ok(())
    }

    /// Admin-gated batch add. Unknown emails and already-active members are
    /// reported per email, previously deactivated members are reactivated in
    /// place.
    pub async fn add_members(
        &self,
        workspace_id: ObjectId,
        admin_user_id: ObjectId,
        emails: Vec<String>,
        role: Option<MemberRole>,
    ) -> DaoResult<(Workspace, Vec<MemberStatus>)> {
        let mut workspace = self.base.find_by_id(workspace_id).await?;
        self.users.find_by_id(admin_user_id).await?;
        if !workspace.is_active_admin(admin_user_id) {
            return Err(DaoError::Forbidden(
                "You are not authorized to perform this action".to_string(),
            ));
        }

        let role = role.unwrap_or(MemberRole::Member);
        let mut statuses = Vec::new();
        for email in emails {
            let Some(user) = self.users.find_one(doc! { "email": &email }).await? else {
                statuses.push(MemberStatus {
                    email,
                    status: "User not found".to_string(),
                });
                continue;
            };

            let outcome = workspace
                .add_or_reactivate_member(user.id.expect("loaded user has an id"), role);
            let status = match outcome {
                AddMemberOutcome::Added => "Added successfully",
                AddMemberOutcome::Reactivated => "Member activated and added to workspace",
                AddMemberOutcome::AlreadyActive => "Member already in workspace",
            };
            statuses.push(MemberStatus {
                email,
                status: status.to_string(),
            });
        }

        workspace.updated_at = bson::DateTime::now();
        self.base.replace_by_id(workspace_id, &workspace).await?;
        Ok((workspace, statuses))
    }

    /// Admin-gated batch removal (soft). The requesting admin cannot remove
    /// themselves through this path; self-removal is `exit_member`.
    pub async fn remove_members(
        &self,
        workspace_id: ObjectId,
        admin_user_id: ObjectId,
        emails: Vec<String>,
    ) -> DaoResult<(Workspace, Vec<MemberStatus>)> {
        let mut workspace = self.base.find_by_id(workspace_id).await?;
        self.users.find_by_id(admin_user_id).await?;
        if !workspace.is_active_admin(admin_user_id) {
            return Err(DaoError::Forbidden(
                "You are not authorized to perform this action".to_string(),
            ));
        }

        let mut statuses = Vec::new();
        for email in emails {
            let Some(user) = self.users.find_one(doc! { "email": &email }).await? else {
                statuses.push(MemberStatus {
                    email,
                    status: "User not found".to_string(),
                });
                continue;
            };
            let user_id = user.id.expect("loaded user has an id");

            let status = if user_id == admin_user_id {
                "Admin user cannot remove themselves"
            } else if workspace.deactivate_member(user_id) {
                "Deactivated successfully"
            } else {
                "Member not found in workspace"
            };
            statuses.push(MemberStatus {
                email,
                status: status.to_string(),
            });
        }

        workspace.updated_at = bson::DateTime::now();
        self.base.replace_by_id(workspace_id, &workspace).await?;
        Ok((workspace, statuses))
    }

    /// Self-service exit; may cascade into workspace deactivation when the
    /// last active member leaves.
    pub async fn exit_member(
        &self,
        workspace_id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<WorkspaceExit> {
        let mut workspace = self.base.find_by_id(workspace_id).await?;
        let exit = workspace.exit_member(user_id)?;
        workspace.updated_at = bson::DateTime::now();
        self.base.replace_by_id(workspace_id, &workspace).await?;
        Ok(exit)
    }

    pub async fn update_member_role(
        &self,
        workspace_id: ObjectId,
        admin_user_id: ObjectId,
        target_user_id: ObjectId,
        role: MemberRole,
    ) -> DaoResult<()> {
        let mut workspace = self.base.find_by_id(workspace_id).await?;
        if !workspace.is_active_admin(admin_user_id) {
            return Err(DaoError::Forbidden(
                "Only admins can update member roles".to_string(),
            ));
        }
        if !workspace.set_member_role(target_user_id, role) {
            return Err(DaoError::NotFoundMsg("Member not found".to_string()));
        }
        workspace.updated_at = bson::DateTime::now();
        self.base.replace_by_id(workspace_id, &workspace).await?;
        Ok(())
    }

    /// Active members joined with their user profile (email + avatar URL).
    pub async fn active_members(&self, workspace_id: ObjectId) -> DaoResult<Vec<MemberView>> {
        let workspace = self.base.find_by_id(workspace_id).await?;

        let user_ids: Vec<ObjectId> = workspace
            .members
            .iter()
            .filter(|m| m.is_active)
            .map(|m| m.user_id)
            .collect();
        let users = self
            .users
            .find_many(doc! { "_id": { "$in": &user_ids } }, None)
            .await?;

        let mut views = Vec::new();
        for member in workspace.members.iter().filter(|m| m.is_active) {
            let Some(user) = users.iter().find(|u| u.id == Some(member.user_id)) else {
                continue;
            };
            views.push(MemberView {
                user: MemberUserView {
                    id: member.user_id.to_hex(),
                    email: user.email.clone(),
                    img_url: user.img_url.clone(),
                },
                role: member.role,
                is_active: member.is_active,
                joined_at: member.joined_at.try_to_rfc3339_string().ok(),
            });
        }
        Ok(views)
    }

    pub async fn workspace_projects(
        &self,
        workspace_id: ObjectId,
    ) -> DaoResult<Vec<ProjectSummary>> {
        let workspace = self.base.find_by_id(workspace_id).await?;
        let projects = self
            .projects
            .find_many(doc! { "_id": { "$in": &workspace.projects } }, None)
            .await?;
        Ok(projects
            .into_iter()
            .map(|p| project_summary(p, &workspace))
            .collect())
    }

    /// All active tasks of all active projects of an active workspace.
    pub async fn workspace_tasks(&self, workspace_id: ObjectId) -> DaoResult<Vec<TaskView>> {
        let workspace = self.base.find_by_id(workspace_id).await?;
        if !workspace.is_active {
            return Err(DaoError::Validation("Workspace is not active".to_string()));
        }

        let projects = self
            .projects
            .find_many(
                doc! { "_id": { "$in": &workspace.projects }, "is_active": true },
                None,
            )
            .await?;

        let mut views = Vec::new();
        for project in &projects {
            for task in project.tasks.iter().filter(|t| t.is_active) {
                views.push(task_view(task, project, &workspace));
            }
        }
        Ok(views)
    }

    /// Active workspaces in which the user is an active member.
    pub async fn user_workspaces(&self, user_id: ObjectId) -> DaoResult<Vec<WorkspaceSummary>> {
        self.users.find_by_id(user_id).await?;
        let workspaces = self
            .base
            .find_many(
                doc! {
                    "is_active": true,
                    "members": { "$elemMatch": { "user_id": user_id, "is_active": true } },
                },
                Some(doc! { "name": 1 }),
            )
            .await?;
        Ok(workspaces
            .into_iter()
            .map(|w| WorkspaceSummary {
                id: w.id.map(|id| id.to_hex()).unwrap_or_default(),
                name: w.name,
                img_url: w.img_url,
            })
            .collect())
    }

    pub async fn user_projects(&self, user_id: ObjectId) -> DaoResult<Vec<ProjectSummary>> {
        self.users.find_by_id(user_id).await?;
        let workspaces = self
            .base
            .find_many(
                doc! { "members": { "$elemMatch": { "user_id": user_id, "is_active": true } } },
                None,
            )
            .await?;

        let mut summaries = Vec::new();
        for workspace in &workspaces {
            let projects = self
                .projects
                .find_many(doc! { "_id": { "$in": &workspace.projects } }, None)
                .await?;
            summaries.extend(
                projects
                    .into_iter()
                    .map(|p| project_summary(p, workspace)),
            );
        }
        Ok(summaries)
    }

    /// Active tasks assigned to the user across all their active
    /// workspaces/projects, optionally filtered by project name.
    pub async fn user_tasks(
        &self,
        user_id: ObjectId,
        project_name: Option<&str>,
    ) -> DaoResult<Vec<TaskView>> {
        self.users.find_by_id(user_id).await?;
        let workspaces = self
            .base
            .find_many(
                doc! {
                    "is_active": true,
                    "members": { "$elemMatch": { "user_id": user_id, "is_active": true } },
                },
                None,
            )
            .await?;

        let mut views = Vec::new();
        for workspace in &workspaces {
            let projects = self
                .projects
                .find_many(
                    doc! { "_id": { "$in": &workspace.projects }, "is_active": true },
                    None,
                )
                .await?;
            for project in &projects {
                if let Some(name) = project_name {
                    if project.name != name {
                        continue;
                    }
                }
                for task in project.tasks.iter().filter(|t| {
                    t.is_active && t.assignee.as_ref().is_some_and(|a| a.id == user_id)
                }) {
                    views.push(task_view(task, project, workspace));
                }
            }
        }
        Ok(views)
    }

    /// Attachment listing across projects, split into images and documents.
    pub async fn media_docs(&self, workspace_id: ObjectId) -> DaoResult<MediaDocs> {
        self.base.find_by_id(workspace_id).await?;
        let projects = self
            .projects
            .find_many(doc! { "workspace_id": workspace_id }, None)
            .await?;

        let mut img_urls = Vec::new();
        let mut doc_urls = Vec::new();
        for project in &projects {
            for task in &project.tasks {
                for attachment in &task.attachments {
                    let media = MediaRef {
                        name: attachment.doc_name.clone(),
                        url: attachment.doc_url.clone(),
                    };
                    if attachment.doc_type == DocType::Image {
                        img_urls.push(media);
                    } else {
                        doc_urls.push(media);
                    }
                }
            }
        }
        Ok(MediaDocs { img_urls, doc_urls })
    }
}

fn project_summary(project: Project, workspace: &Workspace) -> ProjectSummary {
    ProjectSummary {
        id: project.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: project.name,
        img_url: project.img_url,
        workspace_id: workspace.id.map(|id| id.to_hex()).unwrap_or_default(),
        workspace_name: workspace.name.clone(),
    }
}

fn task_view(
    task: &taskwise_db::models::Task,
    project: &Project,
    workspace: &Workspace,
) -> TaskView {
    TaskView {
        id: task.id.to_hex(),
        project_id: project.id.map(|id| id.to_hex()).unwrap_or_default(),
        project: project.name.clone(),
        workspace: workspace.name.clone(),
        name: task.name.clone(),
        content: task.content.clone(),
        assignee: task.assignee.as_ref().map(UserRef::from),
        due_date: task.due_date.and_then(|d| d.try_to_rfc3339_string().ok()),
        priority: task.priority,
        attachments: task.attachments.clone(),
        comments: task.comments.iter().map(CommentView::from).collect(),
        created_by: UserRef::from(&task.created_by),
    }
}
