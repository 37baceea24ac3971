use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Project aggregate, i.e. the Kanban board: `columns` and `tasks` are
/// embedded subdocuments and `order` is the display sequence of column ids.
/// Invariants maintained by the methods below:
///
/// - every id in a column's `task_ids` names a task embedded in this project;
/// - every id in `order` names a column embedded in this project;
/// - a task id sits in at most one column's `task_ids` at a time.
///
/// Column and task ids are generated client-side (`ObjectId::new()`) so a
/// structural mutation touches both collections in one in-memory step and
/// the aggregate is persisted with a single write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
    pub img_key: Option<String>,
    pub img_url: Option<String>,
    pub workspace_id: ObjectId,
    #[serde(default)]
    pub order: Vec<ObjectId>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub deactivated_at: Option<DateTime>,
    pub creator_user_id: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub deactivated_at: Option<DateTime>,
    #[serde(default)]
    pub task_ids: Vec<ObjectId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub content: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub deactivated_at: Option<DateTime>,
    pub assignee: Option<UserSnapshot>,
    pub due_date: Option<DateTime>,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_by: UserSnapshot,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Denormalized display cache of a user; deliberately never re-synced when
/// the referenced profile changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: ObjectId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub doc_type: DocType,
    pub doc_name: String,
    pub doc_key: String,
    pub doc_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Image,
    Document,
    Video,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub user: UserSnapshot,
    pub text: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("Column not found")]
    ColumnNotFound,
    #[error("Source column not found in the project")]
    SourceColumnNotFound,
    #[error("Destination column not found in the project")]
    DestinationColumnNotFound,
    #[error("Task not found in the project")]
    TaskNotFound,
    #[error("Task not found in the source column")]
    TaskNotInColumn,
    #[error("One or more columns in the order are not part of the project")]
    UnknownColumnInOrder,
}

impl Project {
    pub const COLLECTION: &'static str = "projects";

    pub const DEFAULT_COLUMN_TITLES: [&'static str; 3] = ["To Do", "In Progress", "Done"];

    pub fn new(
        name: String,
        description: Option<String>,
        img_key: Option<String>,
        img_url: Option<String>,
        workspace_id: ObjectId,
        creator_user_id: ObjectId,
    ) -> Self {
        let now = DateTime::now();
        let mut project = Self {
            id: None,
            name,
            description,
            img_key,
            img_url,
            workspace_id,
            order: Vec::new(),
            columns: Vec::new(),
            tasks: Vec::new(),
            is_active: true,
            deactivated_at: None,
            creator_user_id,
            created_at: now,
            updated_at: now,
        };
        project.seed_default_board();
        project
    }

    /// Seeds the three default columns, empty, with `order` built from their
    /// pre-generated ids. One write suffices; there is no id round trip.
    fn seed_default_board(&mut self) {
        for title in Self::DEFAULT_COLUMN_TITLES {
            self.add_column(title.to_string());
        }
    }

    pub fn column(&self, column_id: ObjectId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    fn column_mut(&mut self, column_id: ObjectId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    pub fn task(&self, task_id: ObjectId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: ObjectId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Appends a new empty column and its id to `order`, returning the id.
    pub fn add_column(&mut self, title: String) -> ObjectId {
        let column_id = ObjectId::new();
        self.columns.push(Column {
            id: column_id,
            title,
            is_active: true,
            deactivated_at: None,
            task_ids: Vec::new(),
        });
        self.order.push(column_id);
        column_id
    }

    pub fn update_column(
        &mut self,
        column_id: ObjectId,
        title: Option<String>,
        task_ids: Option<Vec<ObjectId>>,
    ) -> Result<(), BoardError> {
        let column = self
            .column_mut(column_id)
            .ok_or(BoardError::ColumnNotFound)?;
        if let Some(title) = title {
            column.title = title;
        }
        if let Some(task_ids) = task_ids {
            column.task_ids = task_ids;
        }
        Ok(())
    }

    /// Soft-deactivates a column. Its id stays in `order` and its `task_ids`
    /// are not purged: inactive columns are hidden-but-present, unlike
    /// deactivated tasks which are removed from their container.
    pub fn deactivate_column(&mut self, column_id: ObjectId) -> Result<(), BoardError> {
        let column = self
            .column_mut(column_id)
            .ok_or(BoardError::ColumnNotFound)?;
        column.is_active = false;
        column.deactivated_at = Some(DateTime::now());
        Ok(())
    }

    /// Replaces `order` wholesale. Every id must name a column of this
    /// project; the upstream implementation skipped this check (it was
    /// commented out) and could persist arbitrary ids.
    pub fn reorder_columns(&mut self, new_order: Vec<ObjectId>) -> Result<(), BoardError> {
        if new_order.iter().any(|id| self.column(*id).is_none()) {
            return Err(BoardError::UnknownColumnInOrder);
        }
        self.order = new_order;
        Ok(())
    }

    /// Moves a task id from one column's `task_ids` to the end of another's.
    /// `order` is untouched; both columns are assumed to already be listed.
    pub fn move_task(
        &mut self,
        task_id: ObjectId,
        source_column_id: ObjectId,
        dest_column_id: ObjectId,
    ) -> Result<(), BoardError> {
        if self.column(source_column_id).is_none() {
            return Err(BoardError::SourceColumnNotFound);
        }
        if self.column(dest_column_id).is_none() {
            return Err(BoardError::DestinationColumnNotFound);
        }

        let source = self
            .column_mut(source_column_id)
            .ok_or(BoardError::SourceColumnNotFound)?;
        let position = source
            .task_ids
            .iter()
            .position(|id| *id == task_id)
            .ok_or(BoardError::TaskNotInColumn)?;
        source.task_ids.remove(position);

        let dest = self
            .column_mut(dest_column_id)
            .ok_or(BoardError::DestinationColumnNotFound)?;
        dest.task_ids.push(task_id);
        Ok(())
    }

    /// Embeds a task and files its pre-generated id into the target column
    /// in the same mutation, so the aggregate never holds a task that no
    /// column references mid-protocol.
    pub fn add_task(&mut self, task: Task, column_id: ObjectId) -> Result<ObjectId, BoardError> {
        let task_id = task.id;
        let column = self
            .column_mut(column_id)
            .ok_or(BoardError::ColumnNotFound)?;
        column.task_ids.push(task_id);
        self.tasks.push(task);
        Ok(task_id)
    }

    /// Soft-deactivates a task and purges its id from every column's
    /// `task_ids`. The task record persists; `order` and the column list are
    /// structurally unchanged.
    pub fn deactivate_task(&mut self, task_id: ObjectId) -> Result<(), BoardError> {
        let task = self.task_mut(task_id).ok_or(BoardError::TaskNotFound)?;
        task.is_active = false;
        task.deactivated_at = Some(DateTime::now());

        for column in &mut self.columns {
            column.task_ids.retain(|id| *id != task_id);
        }
        Ok(())
    }

    /// Number of columns whose `task_ids` contain the given task id.
    pub fn task_occurrences(&self, task_id: ObjectId) -> usize {
        self.columns
            .iter()
            .map(|c| c.task_ids.iter().filter(|id| **id == task_id).count())
            .sum()
    }
}

impl Task {
    pub fn new(name: String, created_by: UserSnapshot) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            name,
            content: None,
            is_active: true,
            deactivated_at: None,
            assignee: None,
            due_date: None,
            priority: None,
            attachments: Vec::new(),
            comments: Vec::new(),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}
