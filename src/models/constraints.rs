//! Names of the integrity constraints declared in `migrations/`.

pub const START_DATE_BEFORE_END_DATE: &str = "start_date_before_end_date";
pub const ARRIVAL_DATE_BEFORE_DEPARTURE_DATE: &str = "arrival_date_before_departure_date";
pub const EVENT_DURATION_NON_NEGATIVE: &str = "event_duration_non_negative";

pub const TRIP_START_DATE_FORMAT: &str = "trip_start_date_format";
pub const TRIP_END_DATE_FORMAT: &str = "trip_end_date_format";
pub const TRIP_DAY_DATE_FORMAT: &str = "trip_day_date_format";
pub const LODGING_ARRIVAL_DATE_FORMAT: &str = "lodging_arrival_date_format";
pub const LODGING_DEPARTURE_DATE_FORMAT: &str = "lodging_departure_date_format";

pub const UNIQUE_TRIP_DAY_PER_TRIP: &str = "unique_trip_day_per_trip";
pub const UNIQUE_SAVED_PLACE_PER_TRIP: &str = "unique_saved_place_per_trip";
pub const UNIQUE_LODGING_PER_TRIP: &str = "unique_lodging_per_trip";
pub const UNIQUE_EVENT_PER_TRIP_DAY: &str = "unique_event_per_trip_day";
pub const UNIQUE_USERNAME: &str = "unique_username";

pub const FOREIGN_KEY: &str = "foreign_key";

// SQLite reports unique failures by column list rather than by name.
const UNIQUE_COLUMNS: &[(&str, &str)] = &[
    ("trip_days.trip_id, trip_days.date", UNIQUE_TRIP_DAY_PER_TRIP),
    (
        "trip_saved_places.trip_id, trip_saved_places.place_id",
        UNIQUE_SAVED_PLACE_PER_TRIP,
    ),
    ("lodgings.name, lodgings.trip_id", UNIQUE_LODGING_PER_TRIP),
    (
        "events.trip_day_id, events.place_id, events.start_time",
        UNIQUE_EVENT_PER_TRIP_DAY,
    ),
    ("users.username", UNIQUE_USERNAME),
];

pub fn unique_constraint_for(columns: &str) -> Option<&'static str> {
    UNIQUE_COLUMNS
        .iter()
        .find(|(cols, _)| *cols == columns)
        .map(|(_, name)| *name)
}
