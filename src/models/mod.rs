pub mod constraints;
pub mod event;
pub mod lodging;
pub mod place;
pub mod saved_place;
pub mod trip;
pub mod trip_day;
pub mod user;

use std::{fmt, ops::RangeInclusive};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use sqlx::{
    query::QueryAs,
    sqlite::{SqliteArguments, SqliteRow},
    FromRow, Sqlite,
};
use uuid::Uuid;

use crate::error::AppError;

pub use event::{Event, EventType, NewEvent};
pub use lodging::{Lodging, NewLodging};
pub use place::{NewPlace, Place};
pub use saved_place::{NewTripSavedPlace, TripSavedPlace};
pub use trip::{NewTrip, NewUserTrip, Trip, UserTrip};
pub use trip_day::{NewTripDay, TripDay};
pub use user::{NewUser, User};

/// Dates are stored as `YYYY-MM-DD` text and compared as strings, which only
/// orders correctly for four-digit years.
pub const STORABLE_YEARS: RangeInclusive<i32> = 1..=9999;

pub fn check_storable_date(field: &str, date: NaiveDate) -> Result<(), AppError> {
    if STORABLE_YEARS.contains(&date.year()) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "{field}: year must be between 1 and 9999"
        )))
    }
}

pub type RecordQuery<'q, R> = QueryAs<'q, Sqlite, R, SqliteArguments<'q>>;

/// A persisted row. Every table carries `id`, `created_at` and `updated_at`
/// in addition to the columns its [`Draft`] writes.
pub trait Record:
    for<'r> FromRow<'r, SqliteRow> + Serialize + fmt::Display + Send + Sync + Unpin + 'static
{
    const TABLE: &'static str;
    /// Path segment under `/admin`.
    const MODEL: &'static str;
    const VERBOSE_NAME: &'static str;

    fn id(&self) -> Uuid;
}

/// The writable columns of a [`Record`], used for both inserts and updates.
pub trait Draft: Send + Sync {
    type Record: Record;

    const COLUMNS: &'static [&'static str];

    /// Binds one value per entry of [`Draft::COLUMNS`], in order.
    fn bind<'q>(&'q self, query: RecordQuery<'q, Self::Record>) -> RecordQuery<'q, Self::Record>;

    /// Rejects values the schema cannot compare correctly. Runs before every write.
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}
