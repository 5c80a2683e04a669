use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::{Draft, Record, RecordQuery};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Flight,
    Train,
    Bus,
    Meal,
    Activity,
    #[default]
    Other,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::Flight,
        EventType::Train,
        EventType::Bus,
        EventType::Meal,
        EventType::Activity,
        EventType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Flight => "FLIGHT",
            EventType::Train => "TRAIN",
            EventType::Bus => "BUS",
            EventType::Meal => "MEAL",
            EventType::Activity => "ACTIVITY",
            EventType::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventType::Flight => "Flight",
            EventType::Train => "Train",
            EventType::Bus => "Bus",
            EventType::Meal => "Meal",
            EventType::Activity => "Activity",
            EventType::Other => "Other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| format!("unknown event type `{raw}`"))
    }
}

/// A scheduled activity or transit segment within a trip day.
///
/// `(trip_day_id, place_id, start_time)` is unique only when both `place_id`
/// and `start_time` are set; overlapping events are otherwise allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: EventType,
    pub location_text: Option<String>,
    pub start_time: Option<NaiveTime>,
    /// Minutes.
    pub duration: Option<u32>,
    pub trip_day_id: Uuid,
    pub place_id: Option<Uuid>,
    /// Ordering index within the day.
    pub position: Option<i32>,
    pub notes: Option<String>,
}

impl Event {
    /// `start_time + duration`, wrapping past midnight. `None` unless both are set.
    pub fn end_time(&self) -> Option<NaiveTime> {
        end_time(self.start_time, self.duration)
    }
}

fn end_time(start_time: Option<NaiveTime>, duration: Option<u32>) -> Option<NaiveTime> {
    let start = start_time?;
    let minutes = duration?;
    let (end, _) = start.overflowing_add_signed(Duration::minutes(i64::from(minutes)));
    Some(end)
}

impl Record for Event {
    const TABLE: &'static str = "events";
    const MODEL: &'static str = "event";
    const VERBOSE_NAME: &'static str = "Event";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start_time {
            Some(start) => write!(f, "{} at {}", self.name, start.format("%H:%M")),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: EventType,
    pub location_text: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub duration: Option<u32>,
    pub trip_day_id: Uuid,
    pub place_id: Option<Uuid>,
    pub position: Option<i32>,
    pub notes: Option<String>,
}

impl NewEvent {
    pub fn new(trip_day_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EventType::default(),
            location_text: None,
            start_time: None,
            duration: None,
            trip_day_id,
            place_id: None,
            position: None,
            notes: None,
        }
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        end_time(self.start_time, self.duration)
    }
}

impl Draft for NewEvent {
    type Record = Event;

    const COLUMNS: &'static [&'static str] = &[
        "name",
        "type",
        "location_text",
        "start_time",
        "duration",
        "trip_day_id",
        "place_id",
        "position",
        "notes",
    ];

    fn bind<'q>(&'q self, query: RecordQuery<'q, Event>) -> RecordQuery<'q, Event> {
        query
            .bind(&self.name)
            .bind(self.kind)
            .bind(self.location_text.as_deref())
            .bind(self.start_time)
            .bind(self.duration)
            .bind(self.trip_day_id)
            .bind(self.place_id)
            .bind(self.position)
            .bind(self.notes.as_deref())
    }
}
