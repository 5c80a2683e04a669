use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::{check_storable_date, Draft, Record, RecordQuery};
use crate::error::AppError;

/// One calendar date of a trip; a trip has at most one per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TripDay {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub date: NaiveDate,
    pub name: Option<String>,
    pub trip_id: Uuid,
}

impl Record for TripDay {
    const TABLE: &'static str = "trip_days";
    const MODEL: &'static str = "tripday";
    const VERBOSE_NAME: &'static str = "Trip day";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for TripDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} - {}", name, self.date),
            None => write!(f, "{}", self.date),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTripDay {
    pub date: NaiveDate,
    pub name: Option<String>,
    pub trip_id: Uuid,
}

impl NewTripDay {
    pub fn new(trip_id: Uuid, date: NaiveDate) -> Self {
        Self {
            date,
            name: None,
            trip_id,
        }
    }
}

impl Draft for NewTripDay {
    type Record = TripDay;

    const COLUMNS: &'static [&'static str] = &["date", "name", "trip_id"];

    fn bind<'q>(&'q self, query: RecordQuery<'q, TripDay>) -> RecordQuery<'q, TripDay> {
        query
            .bind(self.date)
            .bind(self.name.as_deref())
            .bind(self.trip_id)
    }

    fn validate(&self) -> Result<(), AppError> {
        check_storable_date("date", self.date)
    }
}
