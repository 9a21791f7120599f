use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
}

#[derive(Serialize)]
pub struct UserRow {
    pub name: String,
    pub current: bool,
}

#[derive(Serialize)]
pub struct UserList {
    pub users: Vec<UserRow>,
}

#[derive(Debug, Default, Serialize)]
pub struct ResetCounts {
    pub posts: u64,
    pub follows: u64,
    pub feeds: u64,
    pub users: u64,
}
