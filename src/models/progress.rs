use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-skill status of a student. One row per (student, skill).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: String,
    pub student_id: String,
    pub skill_id: String,
    pub status: String,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Row of the `progress` table
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressRow {
    pub id: String,
    pub student_id: String,
    pub skill_id: String,
    pub status: String,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<ProgressRow> for Progress {
    fn from(row: ProgressRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            skill_id: row.skill_id,
            status: row.status,
            last_updated: row.last_updated,
        }
    }
}

/// Upsert payload keyed on `(student_id, skill_id)`
#[derive(Debug, Clone, Serialize)]
pub struct UpsertProgress {
    pub student_id: String,
    pub skill_id: String,
    pub status: String,
    pub last_updated: DateTime<Utc>,
}

pub const PROGRESS_CONFLICT_KEY: &str = "student_id,skill_id";
