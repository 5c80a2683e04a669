use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::{check_storable_date, Draft, Record, RecordQuery};
use crate::error::AppError;

/// A user-owned, date-ranged travel plan. `start_date <= end_date` is enforced
/// by the `start_date_before_end_date` check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_id: Uuid,
}

impl Record for Trip {
    const TABLE: &'static str = "trips";
    const MODEL: &'static str = "trip";
    const VERBOSE_NAME: &'static str = "Trip";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} to {})", self.name, self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrip {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_id: Uuid,
}

impl Draft for NewTrip {
    type Record = Trip;

    const COLUMNS: &'static [&'static str] = &["name", "start_date", "end_date", "user_id"];

    fn bind<'q>(&'q self, query: RecordQuery<'q, Trip>) -> RecordQuery<'q, Trip> {
        query
            .bind(&self.name)
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.user_id)
    }

    fn validate(&self) -> Result<(), AppError> {
        check_storable_date("start_date", self.start_date)?;
        check_storable_date("end_date", self.end_date)
    }
}

/// Shared access to a trip beyond its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserTrip {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub trip_id: Option<Uuid>,
}

impl Record for UserTrip {
    const TABLE: &'static str = "user_trips";
    const MODEL: &'static str = "usertrip";
    const VERBOSE_NAME: &'static str = "User trip";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for UserTrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.trip_id {
            Some(trip_id) => write!(f, "{} -> {}", self.user_id, trip_id),
            None => write!(f, "{} -> (no trip)", self.user_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserTrip {
    pub user_id: Uuid,
    pub trip_id: Option<Uuid>,
}

impl Draft for NewUserTrip {
    type Record = UserTrip;

    const COLUMNS: &'static [&'static str] = &["user_id", "trip_id"];

    fn bind<'q>(&'q self, query: RecordQuery<'q, UserTrip>) -> RecordQuery<'q, UserTrip> {
        query.bind(self.user_id).bind(self.trip_id)
    }
}
