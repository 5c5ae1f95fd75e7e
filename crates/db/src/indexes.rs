use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users — lookups are by external identity and by embedded room id
    // (multikey over the study_rooms array).
    create_indexes(
        db,
        "users",
        vec![
            index_unique(bson::doc! { "identity_id": 1 }),
            index(bson::doc! { "study_rooms.id": 1 }),
        ],
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
    let coll = db.collection::<bson::Document>(collection);
    match coll.create_indexes(indexes.clone()).await {
        Ok(_) => {
            info!(collection, "Indexes created");
            Ok(())
        }
        Err(e) => {
            // IndexKeySpecsConflict (code 86): an existing index has the same
            // name but different options. Drop the conflicting indexes and
            // retry.
            if let mongodb::error::ErrorKind::Command(ref cmd_err) = *e.kind {
                if cmd_err.code == 86 {
                    tracing::warn!(
                        collection,
                        "Index conflict detected, dropping conflicting indexes and retrying"
                    );
                    coll.drop_indexes().await?;
                    coll.create_indexes(indexes).await?;
                    info!(collection, "Indexes recreated after conflict resolution");
                    return Ok(());
                }
            }
            Err(e)
        }
    }
}
