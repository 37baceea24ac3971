use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        "users",
        vec![index_unique(bson::doc! { "email": 1 })],
    )
    .await?;

    // Workspaces. The name index stays unique because a deactivated
    // workspace gets a timestamp-suffixed name, freeing the original slot.
    create_indexes(
        db,
        "workspaces",
        vec![
            index_unique(bson::doc! { "name": 1 }),
            index(bson::doc! { "members.user_id": 1, "members.is_active": 1 }),
            index(bson::doc! { "projects": 1 }),
            index(bson::doc! { "is_active": 1 }),
        ],
    )
    .await?;

    // Projects
    create_indexes(
        db,
        "projects",
        vec![
            index(bson::doc! { "workspace_id": 1, "is_active": 1 }),
            index(bson::doc! { "tasks.assignee.id": 1 }),
        ],
    )
    .await?;

    // Notifications
    create_indexes(
        db,
        "notifications",
        vec![index(
            bson::doc! { "user_id": 1, "is_read": 1, "created_at": -1 },
        )],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
