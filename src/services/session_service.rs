use chrono::{Duration, Utc};

use super::credits::adjust_credits;
use crate::api::{ApiError, BackendClient, Query};
use crate::error::{DataError, DataResult};
use crate::models::{
    CreateEnrollment, CreateSession, EnrolledSessionRow, Enrollment, LessonSession, SessionRow,
};

const SESSIONS: &str = "sessions";
const ENROLLMENTS: &str = "enrollments";

/// Session columns plus the roster from the enrollment table.
const SESSION_WITH_ROSTER: &str = "*,enrollments(user_id)";

/// Enrollment rows with their session (and its full roster) embedded.
const ENROLLED_SESSION: &str = "session:sessions(*,enrollments(user_id))";

#[derive(Clone)]
pub struct SessionService {
    client: BackendClient,
}

impl SessionService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// All sessions by start time, each with its enrolled user ids.
    pub async fn list_sessions(&self) -> DataResult<Vec<LessonSession>> {
        let rows: Vec<SessionRow> = self
            .client
            .select(
                SESSIONS,
                &Query::new().select(SESSION_WITH_ROSTER).order("start_time", true),
            )
            .await?;

        Ok(rows.into_iter().map(LessonSession::from).collect())
    }

    pub async fn get_session(&self, session_id: &str) -> DataResult<Option<LessonSession>> {
        let row: Option<SessionRow> = self
            .client
            .select_one(
                SESSIONS,
                &Query::new().select(SESSION_WITH_ROSTER).eq("id", session_id),
            )
            .await?;

        Ok(row.map(LessonSession::from))
    }

    /// Sessions the user holds an enrollment for, joined through the
    /// enrollment table. Rosters list every enrolled user, not just this one.
    pub async fn list_sessions_for_user(&self, user_id: &str) -> DataResult<Vec<LessonSession>> {
        let rows: Vec<EnrolledSessionRow> = self
            .client
            .select(
                ENROLLMENTS,
                &Query::new().select(ENROLLED_SESSION).eq("user_id", user_id),
            )
            .await?;

        let mut sessions: Vec<LessonSession> = rows
            .into_iter()
            .filter_map(|row| row.session)
            .map(LessonSession::from)
            .collect();
        sessions.sort_by_key(|s| s.start_time);

        Ok(sessions)
    }

    pub async fn create_session(&self, session: &CreateSession) -> DataResult<LessonSession> {
        if session.end_time <= session.start_time {
            return Err(DataError::Validation(
                "session must end after it starts".to_string(),
            ));
        }

        let row: SessionRow = self.client.insert(SESSIONS, session).await?;

        tracing::info!("Created session {} at {}", row.id, row.start_time);
        Ok(LessonSession::from(row))
    }

    pub async fn delete_session(&self, session_id: &str) -> DataResult<()> {
        self.client
            .delete(SESSIONS, &Query::new().eq("id", session_id))
            .await?;

        tracing::info!("Deleted session {}", session_id);
        Ok(())
    }

    /// Enroll a user and debit one credit when the balance is positive.
    ///
    /// An existing enrollment fails with `AlreadyEnrolled` before anything
    /// is written. The enrollment is saved before the debit; if the balance
    /// stays contended through every attempt the call returns
    /// `ConcurrentCreditUpdate` and the enrollment is kept.
    pub async fn book_session(&self, session_id: &str, user_id: &str) -> DataResult<Enrollment> {
        if self.find_enrollment(session_id, user_id).await?.is_some() {
            return Err(already_enrolled(session_id, user_id));
        }

        let enrollment: Enrollment = self
            .client
            .insert(ENROLLMENTS, &CreateEnrollment { session_id, user_id })
            .await
            .map_err(|e| match e {
                // lost a race against another booking of the same pair
                DataError::Api(ApiError::Conflict(_)) => already_enrolled(session_id, user_id),
                other => other,
            })?;

        let remaining = adjust_credits(&self.client, user_id, |balance| {
            (balance > 0).then(|| balance - 1)
        })
        .await?;

        match remaining {
            Some(balance) => tracing::info!(
                "Booked {} into session {}, {} credits left",
                user_id,
                session_id,
                balance
            ),
            None => tracing::info!(
                "Booked {} into session {} with no credits to debit",
                user_id,
                session_id
            ),
        }

        Ok(enrollment)
    }

    /// Remove a user's enrollment and refund one credit, provided the
    /// session starts more than `window_hours` from now.
    pub async fn cancel_booking(
        &self,
        session_id: &str,
        user_id: &str,
        window_hours: u32,
    ) -> DataResult<()> {
        let session = self
            .get_session(session_id)
            .await?
            .ok_or_else(|| DataError::NotFound {
                entity: "session",
                id: session_id.to_string(),
            })?;

        if session.start_time - Utc::now() < Duration::hours(i64::from(window_hours)) {
            return Err(DataError::CancellationWindowClosed {
                session_id: session_id.to_string(),
                window_hours,
            });
        }

        if self.find_enrollment(session_id, user_id).await?.is_none() {
            return Err(DataError::NotEnrolled {
                session_id: session_id.to_string(),
                user_id: user_id.to_string(),
            });
        }

        self.client
            .delete(
                ENROLLMENTS,
                &Query::new().eq("session_id", session_id).eq("user_id", user_id),
            )
            .await?;

        adjust_credits(&self.client, user_id, |balance| Some(balance.saturating_add(1))).await?;

        tracing::info!("Cancelled booking of {} for session {}", user_id, session_id);
        Ok(())
    }

    async fn find_enrollment(&self, session_id: &str, user_id: &str) -> DataResult<Option<Enrollment>> {
        self.client
            .select_one(
                ENROLLMENTS,
                &Query::new().eq("session_id", session_id).eq("user_id", user_id),
            )
            .await
    }
}

fn already_enrolled(session_id: &str, user_id: &str) -> DataError {
    DataError::AlreadyEnrolled {
        session_id: session_id.to_string(),
        user_id: user_id.to_string(),
    }
}
