use crate::api::{BackendClient, Query};
use crate::error::{DataError, DataResult};
use crate::models::{CreateUser, ProfileRow, UpdateUser, User};

pub(crate) const PROFILES: &str = "profiles";

#[derive(Clone)]
pub struct UserService {
    client: BackendClient,
}

impl UserService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn get_user(&self, user_id: &str) -> DataResult<Option<User>> {
        let row: Option<ProfileRow> = self
            .client
            .select_one(PROFILES, &Query::new().eq("id", user_id))
            .await?;

        Ok(row.map(User::from))
    }

    pub async fn list_users(&self) -> DataResult<Vec<User>> {
        let rows: Vec<ProfileRow> = self
            .client
            .select(PROFILES, &Query::new().order("name", true))
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Apply a partial update and return the stored profile.
    pub async fn update_user(&self, user_id: &str, update: &UpdateUser) -> DataResult<User> {
        if update.is_empty() {
            return Err(DataError::Validation("no profile fields to update".to_string()));
        }

        let rows: Vec<ProfileRow> = self
            .client
            .update(PROFILES, &Query::new().eq("id", user_id), update)
            .await?;

        let row = rows.into_iter().next().ok_or_else(|| DataError::NotFound {
            entity: "profile",
            id: user_id.to_string(),
        })?;

        tracing::info!("Updated profile {}", user_id);
        Ok(User::from(row))
    }

    /// Accounts are created through sign-up; direct creation needs the
    /// backend's service role.
    pub async fn create_user(&self, user: &CreateUser) -> DataResult<User> {
        tracing::warn!("Refusing to create account for {} without admin access", user.email);
        Err(DataError::RequiresAdmin("creating a user"))
    }

    /// Deleting an auth identity needs the backend's service role.
    pub async fn delete_user(&self, user_id: &str) -> DataResult<()> {
        tracing::warn!("Refusing to delete account {} without admin access", user_id);
        Err(DataError::RequiresAdmin("deleting a user"))
    }
}
