//! Parsing of admin change-form submissions into drafts.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        EventType, NewEvent, NewLodging, NewTrip, NewTripDay, NewTripSavedPlace, NewUserTrip,
        STORABLE_YEARS,
    },
};

pub type FormData = HashMap<String, String>;

pub trait FromForm: Sized {
    fn from_form(form: &FormData) -> Result<Self, AppError>;
}

impl FromForm for NewTrip {
    fn from_form(form: &FormData) -> Result<Self, AppError> {
        Ok(Self {
            name: required_text(form, "name")?,
            start_date: required(form, "start_date", parse_date)?,
            end_date: required(form, "end_date", parse_date)?,
            user_id: required(form, "user_id", parse_uuid)?,
        })
    }
}

impl FromForm for NewUserTrip {
    fn from_form(form: &FormData) -> Result<Self, AppError> {
        Ok(Self {
            user_id: required(form, "user_id", parse_uuid)?,
            trip_id: optional(form, "trip_id", parse_uuid)?,
        })
    }
}

impl FromForm for NewTripDay {
    fn from_form(form: &FormData) -> Result<Self, AppError> {
        Ok(Self {
            date: required(form, "date", parse_date)?,
            name: optional_text(form, "name"),
            trip_id: required(form, "trip_id", parse_uuid)?,
        })
    }
}

impl FromForm for NewTripSavedPlace {
    fn from_form(form: &FormData) -> Result<Self, AppError> {
        Ok(Self {
            trip_id: required(form, "trip_id", parse_uuid)?,
            place_id: required(form, "place_id", parse_uuid)?,
        })
    }
}

impl FromForm for NewLodging {
    fn from_form(form: &FormData) -> Result<Self, AppError> {
        Ok(Self {
            name: required_text(form, "name")?,
            arrival_date: required(form, "arrival_date", parse_date)?,
            departure_date: required(form, "departure_date", parse_date)?,
            location_text: required_text(form, "location_text")?,
            trip_id: required(form, "trip_id", parse_uuid)?,
            place_id: optional(form, "place_id", parse_uuid)?,
        })
    }
}

impl FromForm for NewEvent {
    fn from_form(form: &FormData) -> Result<Self, AppError> {
        Ok(Self {
            name: required_text(form, "name")?,
            kind: optional(form, "type", |raw| raw.parse::<EventType>())?.unwrap_or_default(),
            location_text: optional_text(form, "location_text"),
            start_time: optional(form, "start_time", parse_time)?,
            duration: optional(form, "duration", |raw| {
                raw.parse::<u32>()
                    .map_err(|_| "must be a non-negative number of minutes".to_string())
            })?,
            trip_day_id: required(form, "trip_day_id", parse_uuid)?,
            place_id: optional(form, "place_id", parse_uuid)?,
            position: optional(form, "position", |raw| {
                raw.parse::<i32>().map_err(|err| err.to_string())
            })?,
            notes: optional_text(form, "notes"),
        })
    }
}

fn optional_text(form: &FormData, field: &str) -> Option<String> {
    form.get(field).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn required_text(form: &FormData, field: &str) -> Result<String, AppError> {
    optional_text(form, field)
        .ok_or_else(|| AppError::BadRequest(format!("{field}: this field is required")))
}

fn optional<T>(
    form: &FormData,
    field: &str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<Option<T>, AppError> {
    optional_text(form, field)
        .map(|raw| {
            parse(raw.as_str()).map_err(|msg| AppError::BadRequest(format!("{field}: {msg}")))
        })
        .transpose()
}

fn required<T>(
    form: &FormData,
    field: &str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, AppError> {
    optional(form, field, parse)?
        .ok_or_else(|| AppError::BadRequest(format!("{field}: this field is required")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| "expected YYYY-MM-DD".to_string())?;
    if !STORABLE_YEARS.contains(&date.year()) {
        return Err("year must be between 1 and 9999".to_string());
    }
    Ok(date)
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| "expected HH:MM".to_string())
}

fn parse_uuid(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw).map_err(|err| err.to_string())
}
