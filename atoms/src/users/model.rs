use serde::{Deserialize, Serialize};

/// Public user shape - what `/auth/me` returns. Password material never
/// leaves the store layer.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// Stored user document, including the pbkdf2 password record
/// (base64 salt + base64 derived key).
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_salt: String,
    pub password_hash: String,
    pub created_at: String,
}

impl UserRecord {
    pub fn public(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

/// Slim shape embedded in register/login responses.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl UserSummary {
    pub fn of(record: &UserRecord) -> Self {
        UserSummary {
            id: record.id.clone(),
            username: record.username.clone(),
            email: record.email.clone(),
        }
    }
}
