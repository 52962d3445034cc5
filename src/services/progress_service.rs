use chrono::Utc;

use crate::api::{BackendClient, Query};
use crate::error::DataResult;
use crate::models::{Progress, ProgressRow, UpsertProgress, PROGRESS_CONFLICT_KEY};

const PROGRESS: &str = "progress";

#[derive(Clone)]
pub struct ProgressService {
    client: BackendClient,
}

impl ProgressService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn list_progress(&self, student_id: &str) -> DataResult<Vec<Progress>> {
        let rows: Vec<ProgressRow> = self
            .client
            .select(
                PROGRESS,
                &Query::new().eq("student_id", student_id).order("skill_id", true),
            )
            .await?;

        Ok(rows.into_iter().map(Progress::from).collect())
    }

    /// Set the status of one skill for a student, creating the row if needed.
    pub async fn upsert_progress(
        &self,
        student_id: &str,
        skill_id: &str,
        status: &str,
    ) -> DataResult<Progress> {
        let payload = UpsertProgress {
            student_id: student_id.to_string(),
            skill_id: skill_id.to_string(),
            status: status.to_string(),
            last_updated: Utc::now(),
        };

        let row: ProgressRow = self
            .client
            .upsert(PROGRESS, &payload, PROGRESS_CONFLICT_KEY)
            .await?;

        tracing::info!("Progress for {} on {} is now {}", student_id, skill_id, status);
        Ok(Progress::from(row))
    }
}
