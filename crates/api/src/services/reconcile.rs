//! Cleanup pass over the orphan ledger.

use lms_db::CourseStore;
use lms_storage::MediaUploader;
use serde::Serialize;

use crate::error::AppResult;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub destroyed: usize,
    pub failed: usize,
}

/// Destroy every pending orphan once and drop the ones that are gone from
/// the ledger. Objects the store no longer knows count as destroyed
/// (see [`MediaUploader::destroy`]).
pub async fn reconcile_orphans(
    store: &dyn CourseStore,
    media: &MediaUploader,
) -> AppResult<ReconcileReport> {
    let mut report = ReconcileReport::default();

    for orphan in store.list_orphans().await? {
        let Some(resource_type) = orphan.resource_type() else {
            tracing::warn!(
                orphan_id = orphan.id,
                resource_type = %orphan.resource_type,
                "Skipping orphan with unknown resource type",
            );
            report.failed += 1;
            continue;
        };

        match media.destroy(&orphan.object_id, resource_type).await {
            Ok(()) => {
                store.resolve_orphan(orphan.id).await?;
                report.destroyed += 1;
            }
            Err(e) => {
                tracing::warn!(
                    orphan_id = orphan.id,
                    object_id = %orphan.object_id,
                    error = %e,
                    "Orphan cleanup failed; will retry on next pass",
                );
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        destroyed = report.destroyed,
        failed = report.failed,
        "Orphan reconciliation finished",
    );
    Ok(report)
}
