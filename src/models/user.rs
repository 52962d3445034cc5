use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Role of a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Client,
    Instructor,
    Admin,
}

/// Application-facing profile record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub package_credits: u32,
}

/// Row of the `profiles` table
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub package_credits: Option<i64>,
}

/// Only the balance column, for credit mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditBalanceRow {
    #[serde(default)]
    pub package_credits: Option<i64>,
}

impl CreditBalanceRow {
    pub fn balance(&self) -> u32 {
        clamp_credits(self.package_credits)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_credits: Option<u32>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.package_credits.is_none()
    }
}

fn clamp_credits(credits: Option<i64>) -> u32 {
    credits
        .unwrap_or(0)
        .clamp(0, i64::from(u32::MAX)) as u32
}

impl From<ProfileRow> for User {
    fn from(row: ProfileRow) -> Self {
        let role = match row.role.as_deref() {
            None => UserRole::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Unknown role {:?} on profile {}, treating as client", raw, row.id);
                UserRole::default()
            }),
        };

        Self {
            email: row.email.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            role,
            avatar_url: row.avatar_url,
            package_credits: clamp_credits(row.package_credits),
            id: row.id,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Client => write!(f, "client"),
            UserRole::Instructor => write!(f, "instructor"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(UserRole::Client),
            "instructor" => Ok(UserRole::Instructor),
            "admin" => Ok(UserRole::Admin),
            _ => Err(DataError::Validation(format!("Invalid role: {}", s))),
        }
    }
}
