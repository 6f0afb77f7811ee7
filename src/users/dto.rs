use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::UserRecord;

/// Request body for account creation. `emailid` is what older clients send.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    #[serde(alias = "emailid")]
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "emailid")]
    pub email: String,
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<UserRecord> for PublicUser {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}
