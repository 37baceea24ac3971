use std::sync::Arc;

use bson::doc;
use mongodb::Database;
use taskwise_db::models::{Project, User, Workspace};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{info, warn};

use crate::dao::base::{BaseDao, DaoResult};
use crate::storage::ObjectStorage;

/// Periodic re-mint of presigned URLs. Stored `*_url` fields expire with
/// the presign TTL; this job walks every document carrying an object key
/// and writes back a fresh URL. Failures on one document never stop the
/// sweep.
pub struct UrlRefreshJob {
    users: BaseDao<User>,
    workspaces: BaseDao<Workspace>,
    projects: BaseDao<Project>,
    storage: Arc<ObjectStorage>,
}

impl UrlRefreshJob {
    pub fn new(db: &Database, storage: Arc<ObjectStorage>) -> Self {
        Self {
            users: BaseDao::new(db, User::COLLECTION),
            workspaces: BaseDao::new(db, Workspace::COLLECTION),
            projects: BaseDao::new(db, Project::COLLECTION),
            storage,
        }
    }

    /// Registers the sweep on the scheduler and runs it once immediately,
    /// so a restart never serves stale URLs until the next tick.
    pub async fn schedule(
        self: Arc<Self>,
        scheduler: &JobScheduler,
        cron: &str,
    ) -> Result<(), JobSchedulerError> {
        self.run_once().await;

        let job_self = Arc::clone(&self);
        let job = Job::new_async(cron, move |_uuid, _lock| {
            let job_self = Arc::clone(&job_self);
            Box::pin(async move {
                job_self.run_once().await;
            })
        })?;
        scheduler.add(job).await?;
        Ok(())
    }

    pub async fn run_once(&self) {
        let mut refreshed = 0usize;

        match self.refresh_users().await {
            Ok(count) => refreshed += count,
            Err(err) => warn!(error = %err, "User URL refresh sweep failed"),
        }
        match self.refresh_workspaces().await {
            Ok(count) => refreshed += count,
            Err(err) => warn!(error = %err, "Workspace URL refresh sweep failed"),
        }
        match self.refresh_projects().await {
            Ok(count) => refreshed += count,
            Err(err) => warn!(error = %err, "Project URL refresh sweep failed"),
        }

        info!(refreshed, "Presigned URL refresh complete");
    }

    async fn refresh_users(&self) -> DaoResult<usize> {
        let users = self
            .users
            .find_many(doc! { "img_key": { "$nin": ["", null] } }, None)
            .await?;

        let mut count = 0;
        for user in users {
            let Some(id) = user.id else { continue };
            let url = self.storage.presign_get(&user.img_key);
            match self
                .users
                .update_by_id(id, doc! { "$set": { "img_url": url } })
                .await
            {
                Ok(_) => count += 1,
                Err(err) => warn!(user_id = %id, error = %err, "Failed to refresh user image URL"),
            }
        }
        Ok(count)
    }

    async fn refresh_workspaces(&self) -> DaoResult<usize> {
        let workspaces = self
            .workspaces
            .find_many(doc! { "img_key": { "$nin": ["", null] } }, None)
            .await?;

        let mut count = 0;
        for workspace in workspaces {
            let Some(id) = workspace.id else { continue };
            let url = self.storage.presign_get(&workspace.img_key);
            match self
                .workspaces
                .update_by_id(id, doc! { "$set": { "img_url": url } })
                .await
            {
                Ok(_) => count += 1,
                Err(err) => {
                    warn!(workspace_id = %id, error = %err, "Failed to refresh workspace image URL")
                }
            }
        }
        Ok(count)
    }

    /// Projects also carry attachment URLs inside embedded tasks, so the
    /// whole aggregate is rewritten in one replace.
    async fn refresh_projects(&self) -> DaoResult<usize> {
        let projects = self.projects.find_many(doc! {}, None).await?;

        let mut count = 0;
        for mut project in projects {
            let Some(id) = project.id else { continue };

            let mut touched = false;
            if let Some(key) = project.img_key.as_deref() {
                if !key.is_empty() {
                    project.img_url = Some(self.storage.presign_get(key));
                    touched = true;
                }
            }
            for task in &mut project.tasks {
                for attachment in &mut task.attachments {
                    if !attachment.doc_key.is_empty() {
                        attachment.doc_url = self.storage.presign_get(&attachment.doc_key);
                        touched = true;
                    }
                }
            }

            if !touched {
                continue;
            }
            match self.projects.replace_by_id(id, &project).await {
                Ok(()) => count += 1,
                Err(err) => {
                    warn!(project_id = %id, error = %err, "Failed to refresh project URLs")
                }
            }
        }
        Ok(count)
    }
}
