use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use taskwise_db::models::{
    Attachment, Comment, Priority, Project, Task, User, UserSnapshot, Workspace,
};
use tracing::warn;

use super::base::{BaseDao, DaoError, DaoResult};
use super::notification::NotificationDao;

/// Fields accepted when creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub content: Option<String>,
    pub column_id: ObjectId,
    pub assignee: Option<UserSnapshot>,
    pub due_date: Option<DateTime>,
    pub priority: Option<Priority>,
    pub attachments: Vec<Attachment>,
    pub comments: Vec<Comment>,
    pub created_by: UserSnapshot,
}

/// Partial task update: `None` leaves the field untouched, `Some` applies
/// it — including empty strings, unlike the truthiness convention this
/// replaces.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub content: Option<String>,
    pub assignee: Option<UserSnapshot>,
    pub due_date: Option<DateTime>,
    pub priority: Option<Priority>,
    pub attachments: Option<Vec<Attachment>>,
    pub comments: Option<Vec<Comment>>,
}

pub struct ProjectDao {
    pub base: BaseDao<Project>,
    pub workspaces: BaseDao<Workspace>,
    pub users: BaseDao<User>,
    notifications: NotificationDao,
}

impl ProjectDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Project::COLLECTION),
            workspaces: BaseDao::new(db, Workspace::COLLECTION),
            users: BaseDao::new(db, User::COLLECTION),
            notifications: NotificationDao::new(db),
        }
    }

    /// Creates a project with the default three-column board and registers
    /// its id on the owning workspace.
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
        img_key: Option<String>,
        img_url: Option<String>,
        workspace_id: ObjectId,
        creator_user_id: ObjectId,
    ) -> DaoResult<Project> {
        self.users.find_by_id(creator_user_id).await?;
        let workspace = self
            .workspaces
            .find_one(doc! { "_id": workspace_id })
            .await?
            .ok_or_else(|| DaoError::NotFoundMsg("Workspace not found".to_string()))?;
        if workspace.member(creator_user_id).is_none() {
            return Err(DaoError::Forbidden(
                "You are not a member of the specified workspace".to_string(),
            ));
        }

        let project = Project::new(
            name,
            description,
            img_key,
            img_url,
            workspace_id,
            creator_user_id,
        );
        let project_id = self.base.insert_one(&project).await?;

        self.workspaces
            .update_by_id(workspace_id, doc! { "$push": { "projects": project_id } })
            .await?;

        self.base.find_by_id(project_id).await
    }

    pub async fn update(
        &self,
        project_id: ObjectId,
        name: Option<String>,
        description: Option<String>,
        img_key: Option<String>,
        img_url: Option<String>,
    ) -> DaoResult<Project> {
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
                .update_by_id(project_id, doc! { "$set": set })
                .await?;
        }
        self.base.find_by_id(project_id).await
    }

    pub async fn deactivate(&self, project_id: ObjectId) -> DaoResult<()> {
        let updated = self
            .base
            .update_by_id(
                project_id,
                doc! { "$set": { "is_active": false, "deactivated_at": DateTime::now() } },
            )
            .await?;
        if !updated {
            return Err(DaoError::NotFoundMsg("Project not found".to_string()));
        }
        Ok(())
    }

    pub async fn add_column(&self, project_id: ObjectId, title: String) -> DaoResult<Project> {
        if title.trim().is_empty() {
            return Err(DaoError::Validation("Title is required".to_string()));
        }

        let mut project = self.load(project_id).await?;
        project.add_column(title);
        self.save(&mut project).await?;
        Ok(project)
    }

    pub async fn update_column(
        &self,
        project_id: ObjectId,
        column_id: ObjectId,
        title: Option<String>,
        task_ids: Option<Vec<ObjectId>>,
    ) -> DaoResult<Project> {
        let mut project = self.load(project_id).await?;
        project.update_column(column_id, title, task_ids)?;
        self.save(&mut project).await?;
        Ok(project)
    }

    pub async fn deactivate_column(
        &self,
        project_id: ObjectId,
        column_id: ObjectId,
    ) -> DaoResult<()> {
        let mut project = self.load(project_id).await?;
        project.deactivate_column(column_id)?;
        self.save(&mut project).await
    }

    pub async fn reorder_columns(
        &self,
        project_id: ObjectId,
        new_order: Vec<ObjectId>,
    ) -> DaoResult<Project> {
        let mut project = self.load(project_id).await?;
        project.reorder_columns(new_order)?;
        self.save(&mut project).await?;
        Ok(project)
    }

    pub async fn move_task(
        &self,
        project_id: ObjectId,
        task_id: ObjectId,
        source_column_id: ObjectId,
        dest_column_id: ObjectId,
    ) -> DaoResult<Project> {
        let mut project = self.load(project_id).await?;
        project.move_task(task_id, source_column_id, dest_column_id)?;
        self.save(&mut project).await?;
        Ok(project)
    }

    /// Task creation: validates the attachment vocabulary, resolves the
    /// owning workspace by reverse lookup, checks the assignee is an active
    /// member, embeds the task, and emits the assignment notification.
    pub async fn add_task(
        &self,
        project_id: ObjectId,
        input: NewTask,
    ) -> DaoResult<(ObjectId, Project)> {
        validate_attachments(&input.attachments)?;

        let mut project = self.load(project_id).await?;

        let workspace = self
            .workspaces
            .find_one(doc! { "projects": project_id })
            .await?
            .ok_or_else(|| {
                DaoError::NotFoundMsg("Workspace not found for the project".to_string())
            })?;

        if let Some(assignee) = &input.assignee {
            if !workspace.has_active_member(assignee.id) {
                return Err(DaoError::Validation(
                    "Assignee must be a member of the workspace".to_string(),
                ));
            }
        }

        let mut task = Task::new(input.name, input.created_by.clone());
        task.content = input.content;
        task.assignee = input.assignee.clone();
        task.due_date = input.due_date;
        task.priority = input.priority;
        task.attachments = input.attachments;
        task.comments = input.comments;

        let task_name = task.name.clone();
        let task_id = project.add_task(task, input.column_id)?;
        self.save(&mut project).await?;

        if let Some(assignee) = &input.assignee {
            if assignee.id != input.created_by.id {
                let message = format!(
                    "The following task has been assigned to you \
                     <taskName>{}</taskName> in the project \
                     <projectName>{}</projectName> of workspace \
                     <workspaceName>{}</workspaceName>",
                    task_name, project.name, workspace.name
                );
                self.emit_assignment(assignee.id, &message, task_id, project_id)
                    .await;
            }
        }

        Ok((task_id, project))
    }

    /// Partial task update; re-emits an assignment notification when the
    /// patch hands the task to someone other than its creator.
    pub async fn update_task(
        &self,
        project_id: ObjectId,
        task_id: ObjectId,
        patch: TaskPatch,
    ) -> DaoResult<Project> {
        if let Some(attachments) = &patch.attachments {
            validate_attachments(attachments)?;
        }

        let mut project = self.load(project_id).await?;
        let task = project
            .task_mut(task_id)
            .ok_or_else(|| DaoError::NotFoundMsg("Task not found in the project".to_string()))?;
        let created_by_id = task.created_by.id;

        if let Some(name) = patch.name {
            task.name = name;
        }
        if let Some(content) = patch.content {
            task.content = Some(content);
        }
        if let Some(assignee) = patch.assignee.clone() {
            task.assignee = Some(assignee);
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(priority) = patch.priority {
            task.priority = Some(priority);
        }
        if let Some(attachments) = patch.attachments {
            task.attachments = attachments;
        }
        if let Some(comments) = patch.comments {
            task.comments = comments;
        }
        task.updated_at = DateTime::now();
        let task_name = task.name.clone();

        self.save(&mut project).await?;

        if let Some(assignee) = &patch.assignee {
            if assignee.id != created_by_id {
                let message = format!(
                    "The following task has been assigned to you \
                     <taskName>{}</taskName> in the project \
                     <projectName>{}</projectName>.",
                    task_name, project.name
                );
                self.emit_assignment(assignee.id, &message, task_id, project_id)
                    .await;
            }
        }

        Ok(project)
    }

    pub async fn deactivate_task(
        &self,
        project_id: ObjectId,
        task_id: ObjectId,
    ) -> DaoResult<()> {
        let mut project = self.load(project_id).await?;
        project.deactivate_task(task_id)?;
        self.save(&mut project).await
    }

    async fn load(&self, project_id: ObjectId) -> DaoResult<Project> {
        self.base
            .find_one(doc! { "_id": project_id })
            .await?
            .ok_or_else(|| DaoError::NotFoundMsg("Project not found".to_string()))
    }

    async fn save(&self, project: &mut Project) -> DaoResult<()> {
        let id = project.id.expect("loaded project has an id");
        project.updated_at = DateTime::now();
        self.base.replace_by_id(id, project).await
    }

    /// Fire-and-forget: a failed notification insert never fails the task
    /// mutation that triggered it.
    async fn emit_assignment(
        &self,
        user_id: ObjectId,
        message: &str,
        task_id: ObjectId,
        project_id: ObjectId,
    ) {
        if let Err(err) = self
            .notifications
            .create(user_id, message.to_string(), task_id, project_id)
            .await
        {
            warn!(%user_id, %task_id, error = %err, "Failed to record assignment notification");
        }
    }
}

fn validate_attachments(attachments: &[Attachment]) -> DaoResult<()> {
    for attachment in attachments {
        if attachment.doc_name.is_empty()
            || attachment.doc_key.is_empty()
            || attachment.doc_url.is_empty()
        {
            return Err(DaoError::Validation(
                "Attachments must include docType, docName, docKey, and docUrl for each item"
                    .to_string(),
            ));
        }
    }
    Ok(())
}
