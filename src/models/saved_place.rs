use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::{Draft, Record, RecordQuery};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TripSavedPlace {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub trip_id: Uuid,
    pub place_id: Uuid,
}

impl Record for TripSavedPlace {
    const TABLE: &'static str = "trip_saved_places";
    const MODEL: &'static str = "tripsavedplace";
    const VERBOSE_NAME: &'static str = "Trip saved place";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for TripSavedPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.place_id, self.trip_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTripSavedPlace {
    pub trip_id: Uuid,
    pub place_id: Uuid,
}

impl Draft for NewTripSavedPlace {
    type Record = TripSavedPlace;

    const COLUMNS: &'static [&'static str] = &["trip_id", "place_id"];

    fn bind<'q>(
        &'q self,
        query: RecordQuery<'q, TripSavedPlace>,
    ) -> RecordQuery<'q, TripSavedPlace> {
        query.bind(self.trip_id).bind(self.place_id)
    }
}
