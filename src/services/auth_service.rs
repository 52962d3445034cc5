use crate::api::{AuthSession, BackendClient, SignUp, SignUpMetadata};
use crate::error::DataResult;
use crate::models::{User, UserRole};

use super::UserService;

/// Avatar generated from the display name at sign-up
pub fn avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        urlencoding::encode(name)
    )
}

#[derive(Clone)]
pub struct AuthService {
    client: BackendClient,
    users: UserService,
}

impl AuthService {
    pub fn new(client: BackendClient, users: UserService) -> Self {
        Self { client, users }
    }

    /// Register an account. Profile defaults travel as auth metadata and a
    /// backend trigger creates the profile row from them.
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> DataResult<SignUp> {
        let metadata = SignUpMetadata {
            name: name.to_string(),
            role: UserRole::Client.to_string(),
            avatar_url: avatar_url(name),
        };

        self.client.sign_up(email, password, &metadata).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> DataResult<AuthSession> {
        self.client.sign_in_with_password(email, password).await
    }

    /// Trade a saved refresh token for a fresh session.
    pub async fn refresh_session(&self, refresh_token: &str) -> DataResult<AuthSession> {
        self.client.refresh_session(refresh_token).await
    }

    pub async fn sign_out(&self) -> DataResult<()> {
        self.client.sign_out().await
    }

    /// Resume a session from a previously issued access token.
    pub fn restore_session(&self, access_token: &str) {
        if access_token.is_empty() {
            self.client.set_access_token(None);
        } else {
            self.client.set_access_token(Some(access_token.to_string()));
        }
    }

    /// Profile of the signed-in user. `None` when there is no session, the
    /// token is rejected, or the profile row cannot be read.
    pub async fn current_profile(&self) -> Option<User> {
        let identity = match self.client.get_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::debug!("No authenticated identity: {}", e);
                return None;
            }
        };

        match self.users.get_user(&identity.id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::debug!("Could not load profile {}: {}", identity.id, e);
                None
            }
        }
    }
}
