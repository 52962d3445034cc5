use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiError, BackendClient};
use crate::error::{DataError, DataResult};

/// Profile defaults handed to the backend as auth metadata at sign-up.
/// A backend trigger copies them into the new profile row.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpMetadata {
    pub name: String,
    pub role: String,
    pub avatar_url: String,
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: &'a SignUpMetadata,
}

#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshGrantRequest<'a> {
    refresh_token: &'a str,
}

/// Raw authentication identity, as opposed to the application profile.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Tokens of a signed-in session
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Sign-up result. `session` is absent when the backend requires email
/// confirmation before the first sign-in.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub user: AuthUser,
    pub session: Option<AuthSession>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(AuthSession),
    User(AuthUser),
}

impl BackendClient {
    /// Register a new account. Adopts the returned session token, if any.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> DataResult<SignUp> {
        tracing::debug!("Signing up {}", email);

        let request = self
            .request(Method::POST, &self.auth_url("signup"))
            .json(&SignUpRequest {
                email,
                password,
                data: metadata,
            });

        let response = self.send(request).await?;
        let sign_up = match Self::read_json::<SignUpResponse>(response).await? {
            SignUpResponse::Session(session) => {
                self.set_access_token(Some(session.access_token.clone()));
                SignUp {
                    user: session.user.clone(),
                    session: Some(session),
                }
            }
            SignUpResponse::User(user) => SignUp {
                user,
                session: None,
            },
        };

        tracing::info!("Signed up {} as {}", email, sign_up.user.id);
        Ok(sign_up)
    }

    /// Password sign-in. Adopts the returned access token.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> DataResult<AuthSession> {
        tracing::debug!("Signing in as {}", email);

        let request = self
            .request(Method::POST, &self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&PasswordGrantRequest { email, password });

        let session: AuthSession = match self.send(request).await {
            Ok(response) => Self::read_json(response).await?,
            Err(DataError::Api(ApiError::BadRequest(msg) | ApiError::Unauthorized(msg))) => {
                return Err(ApiError::AuthenticationFailed(msg).into());
            }
            Err(e) => return Err(e),
        };

        self.set_access_token(Some(session.access_token.clone()));
        tracing::info!("Signed in as {}", email);
        Ok(session)
    }

    /// Exchange a refresh token for a new session. Adopts the new access
    /// token; a rejected refresh token is `AuthenticationFailed`.
    pub async fn refresh_session(&self, refresh_token: &str) -> DataResult<AuthSession> {
        tracing::debug!("Refreshing access token");

        let request = self
            .request(Method::POST, &self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrantRequest { refresh_token });

        let session: AuthSession = match self.send(request).await {
            Ok(response) => Self::read_json(response).await?,
            Err(DataError::Api(ApiError::BadRequest(msg) | ApiError::Unauthorized(msg))) => {
                return Err(ApiError::AuthenticationFailed(msg).into());
            }
            Err(e) => return Err(e),
        };

        self.set_access_token(Some(session.access_token.clone()));
        tracing::info!("Refreshed access token for {}", session.user.id);
        Ok(session)
    }

    /// Revoke the current session. The local token is dropped whether or
    /// not the backend call succeeds.
    pub async fn sign_out(&self) -> DataResult<()> {
        if !self.is_authenticated() {
            return Ok(());
        }

        let request = self.request(Method::POST, &self.auth_url("logout"));
        let result = self.send(request).await;
        self.set_access_token(None);

        result.map(|_| {
            tracing::info!("Signed out");
        })
    }

    /// Identity behind the current access token.
    pub async fn get_user(&self) -> DataResult<AuthUser> {
        if !self.is_authenticated() {
            return Err(DataError::NotAuthenticated);
        }

        let request = self.request(Method::GET, &self.auth_url("user"));
        let response = self.send(request).await?;
        Self::read_json(response).await
    }
}
