use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::{Draft, Record, RecordQuery};

/// Owner of trips. Only the identifier and its deletion matter here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: String,
}

impl Record for User {
    const TABLE: &'static str = "users";
    const MODEL: &'static str = "user";
    const VERBOSE_NAME: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

impl Draft for NewUser {
    type Record = User;

    const COLUMNS: &'static [&'static str] = &["username"];

    fn bind<'q>(&'q self, query: RecordQuery<'q, User>) -> RecordQuery<'q, User> {
        query.bind(&self.username)
    }
}
