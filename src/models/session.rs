use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled occurrence of a class, with its enrollment roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSession {
    pub id: String,
    pub class_type_id: String,
    pub instructor_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: u32,
    pub enrolled_user_ids: Vec<String>,
}

/// Row of the `sessions` table, optionally with nested `enrollments(user_id)`
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRow {
    pub id: String,
    pub class_type_id: String,
    #[serde(default)]
    pub instructor_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub enrollments: Vec<EnrollmentRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentRef {
    pub user_id: String,
}

/// Row of the `enrollments` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: String,
    pub session_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateEnrollment<'a> {
    pub session_id: &'a str,
    pub user_id: &'a str,
}

/// Enrollment row with its session embedded, used to list a user's
/// sessions through the enrollment table.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrolledSessionRow {
    #[serde(default)]
    pub session: Option<SessionRow>,
}

impl From<SessionRow> for LessonSession {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            class_type_id: row.class_type_id,
            instructor_id: row.instructor_id,
            start_time: row.start_time,
            end_time: row.end_time,
            capacity: row.capacity.unwrap_or(0),
            enrolled_user_ids: row.enrollments.into_iter().map(|e| e.user_id).collect(),
        }
    }
}

impl LessonSession {
    pub fn is_enrolled(&self, user_id: &str) -> bool {
        self.enrolled_user_ids.iter().any(|id| id == user_id)
    }

    pub fn spots_left(&self) -> u32 {
        self.capacity
            .saturating_sub(self.enrolled_user_ids.len() as u32)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    pub class_type_id: String,
    pub instructor_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: u32,
}
