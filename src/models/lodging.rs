use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::{check_storable_date, Draft, Record, RecordQuery};
use crate::error::AppError;

/// An accommodation booking. Names are unique per trip and
/// `arrival_date <= departure_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Lodging {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub location_text: String,
    pub trip_id: Uuid,
    /// Cleared when the place is deleted.
    pub place_id: Option<Uuid>,
}

impl Record for Lodging {
    const TABLE: &'static str = "lodgings";
    const MODEL: &'static str = "lodging";
    const VERBOSE_NAME: &'static str = "Lodging";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for Lodging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} to {})",
            self.name, self.arrival_date, self.departure_date
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLodging {
    pub name: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub location_text: String,
    pub trip_id: Uuid,
    pub place_id: Option<Uuid>,
}

impl Draft for NewLodging {
    type Record = Lodging;

    const COLUMNS: &'static [&'static str] = &[
        "name",
        "arrival_date",
        "departure_date",
        "location_text",
        "trip_id",
        "place_id",
    ];

    fn bind<'q>(&'q self, query: RecordQuery<'q, Lodging>) -> RecordQuery<'q, Lodging> {
        query
            .bind(&self.name)
            .bind(self.arrival_date)
            .bind(self.departure_date)
            .bind(&self.location_text)
            .bind(self.trip_id)
            .bind(self.place_id)
    }

    fn validate(&self) -> Result<(), AppError> {
        check_storable_date("arrival_date", self.arrival_date)?;
        check_storable_date("departure_date", self.departure_date)
    }
}
