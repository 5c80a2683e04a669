use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::{Draft, Record, RecordQuery};

/// Point of interest referenced by saved places, lodgings and events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Place {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
}

impl Record for Place {
    const TABLE: &'static str = "places";
    const MODEL: &'static str = "place";
    const VERBOSE_NAME: &'static str = "Place";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlace {
    pub name: String,
}

impl NewPlace {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Draft for NewPlace {
    type Record = Place;

    const COLUMNS: &'static [&'static str] = &["name"];

    fn bind<'q>(&'q self, query: RecordQuery<'q, Place>) -> RecordQuery<'q, Place> {
        query.bind(&self.name)
    }
}
