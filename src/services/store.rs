use chrono::Utc;
use sqlx::Sqlite;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{Draft, Record},
};

/// Generic create/read/update/delete over every [`Record`] table.
///
/// Each write is a single statement, so a constraint violation leaves the
/// table untouched and surfaces as [`AppError::Constraint`].
#[derive(Clone)]
pub struct ItineraryStore {
    db: DbPool,
}

impl ItineraryStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn create<D: Draft>(&self, draft: &D) -> Result<D::Record, AppError> {
        draft.validate()?;
        let table = <D::Record as Record>::TABLE;
        let id = Uuid::new_v4();
        let now = Utc::now();
        let placeholders = (1..=D::COLUMNS.len() + 3)
            .map(|idx| format!("?{idx}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {table} (id, created_at, updated_at, {}) VALUES ({placeholders}) RETURNING *",
            D::COLUMNS.join(", ")
        );
        let query = sqlx::query_as::<Sqlite, D::Record>(&sql)
            .bind(id)
            .bind(now)
            .bind(now);
        let record = draft
            .bind(query)
            .fetch_one(&self.db)
            .await
            .map_err(|err| log_write_failure(table, err))?;
        debug!("created {table} {id}");
        Ok(record)
    }

    pub async fn get<R: Record>(&self, id: Uuid) -> Result<R, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?1", R::TABLE);
        sqlx::query_as::<Sqlite, R>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list<R: Record>(&self) -> Result<Vec<R>, AppError> {
        let sql = format!("SELECT * FROM {} ORDER BY created_at, rowid", R::TABLE);
        let records = sqlx::query_as::<Sqlite, R>(&sql).fetch_all(&self.db).await?;
        Ok(records)
    }

    /// Overwrites every writable column and refreshes `updated_at`.
    pub async fn update<D: Draft>(&self, id: Uuid, draft: &D) -> Result<D::Record, AppError> {
        draft.validate()?;
        let table = <D::Record as Record>::TABLE;
        let assignments = D::COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, column)| format!("{column} = ?{}", idx + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {table} SET updated_at = ?1, {assignments} WHERE id = ?{} RETURNING *",
            D::COLUMNS.len() + 2
        );
        let query = sqlx::query_as::<Sqlite, D::Record>(&sql).bind(Utc::now());
        let record = draft
            .bind(query)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(|err| log_write_failure(table, err))?
            .ok_or(AppError::NotFound)?;
        debug!("updated {table} {id}");
        Ok(record)
    }

    /// Deletes one row; dependent rows follow the schema's referential actions.
    pub async fn delete<R: Record>(&self, id: Uuid) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
        let result = sqlx::query::<Sqlite>(&sql)
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|err| log_write_failure(R::TABLE, err))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        debug!("deleted {} {id}", R::TABLE);
        Ok(())
    }
}

fn log_write_failure(table: &str, err: sqlx::Error) -> AppError {
    let err = AppError::from(err);
    if let AppError::Constraint(violation) = &err {
        warn!("write to {table} rejected: {violation}");
    }
    err
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::{
        db::init_memory_pool,
        error::ConstraintKind,
        models::{
            constraints, Event, EventType, Lodging, NewEvent, NewLodging, NewPlace, NewTrip,
            NewTripDay, NewTripSavedPlace, NewUser, NewUserTrip, Place, Trip, TripDay,
            TripSavedPlace, User, UserTrip,
        },
    };

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    fn time(raw: &str) -> NaiveTime {
        NaiveTime::parse_from_str(raw, "%H:%M").expect("valid time")
    }

    async fn store() -> ItineraryStore {
        ItineraryStore::new(init_memory_pool().await.expect("memory pool"))
    }

    async fn trip(store: &ItineraryStore, start: &str, end: &str) -> Trip {
        let user = store
            .create(&NewUser::new(format!("traveller-{}", Uuid::new_v4())))
            .await
            .expect("user");
        store
            .create(&NewTrip {
                name: "Lisbon".into(),
                start_date: date(start),
                end_date: date(end),
                user_id: user.id,
            })
            .await
            .expect("trip")
    }

    fn lodging(trip_id: Uuid, name: &str, arrival: &str, departure: &str) -> NewLodging {
        NewLodging {
            name: name.into(),
            arrival_date: date(arrival),
            departure_date: date(departure),
            location_text: "Alfama".into(),
            trip_id,
            place_id: None,
        }
    }

    fn assert_violation(err: AppError, kind: ConstraintKind, constraint: &str) {
        match err {
            AppError::Constraint(violation) => {
                assert_eq!(violation.kind, kind);
                assert_eq!(violation.constraint, constraint);
            }
            other => panic!("expected constraint violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_get_update_delete_roundtrip() {
        let store = store().await;
        let created = trip(&store, "2024-01-01", "2024-01-05").await;
        assert_eq!(created.to_string(), "Lisbon (2024-01-01 to 2024-01-05)");

        let fetched: Trip = store.get(created.id).await.expect("get");
        assert_eq!(fetched, created);

        let updated = store
            .update(
                created.id,
                &NewTrip {
                    name: "Porto".into(),
                    start_date: date("2024-01-02"),
                    end_date: date("2024-01-06"),
                    user_id: created.user_id,
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.name, "Porto");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        store.delete::<Trip>(created.id).await.expect("delete");
        assert!(matches!(
            store.get::<Trip>(created.id).await,
            Err(AppError::NotFound)
        ));
        assert!(matches!(
            store.delete::<Trip>(created.id).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn trip_dates_must_be_ordered() {
        let store = store().await;
        let first = trip(&store, "2024-01-01", "2024-01-05").await;

        let err = store
            .create(&NewTrip {
                name: "Backwards".into(),
                start_date: date("2024-01-10"),
                end_date: date("2024-01-02"),
                user_id: first.user_id,
            })
            .await
            .expect_err("start after end");
        assert_violation(
            err,
            ConstraintKind::Check,
            constraints::START_DATE_BEFORE_END_DATE,
        );

        let trips: Vec<Trip> = store.list().await.expect("list");
        assert_eq!(trips.len(), 1);
    }

    #[tokio::test]
    async fn failed_update_leaves_row_unchanged() {
        let store = store().await;
        let created = trip(&store, "2024-01-01", "2024-01-05").await;

        let err = store
            .update(
                created.id,
                &NewTrip {
                    name: "Broken".into(),
                    start_date: date("2024-02-01"),
                    end_date: date("2024-01-01"),
                    user_id: created.user_id,
                },
            )
            .await
            .expect_err("invalid update");
        assert!(matches!(err, AppError::Constraint(_)));

        let fetched: Trip = store.get(created.id).await.expect("get");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn single_day_trip_is_allowed() {
        let store = store().await;
        let created = trip(&store, "2024-03-03", "2024-03-03").await;
        assert_eq!(created.start_date, created.end_date);
    }

    #[tokio::test]
    async fn trip_day_dates_are_unique_per_trip() {
        let store = store().await;
        let lisbon = trip(&store, "2024-01-01", "2024-01-05").await;
        let porto = trip(&store, "2024-01-01", "2024-01-05").await;

        store
            .create(&NewTripDay::new(lisbon.id, date("2024-01-02")))
            .await
            .expect("first day");
        let err = store
            .create(&NewTripDay::new(lisbon.id, date("2024-01-02")))
            .await
            .expect_err("duplicate day");
        assert_violation(
            err,
            ConstraintKind::Unique,
            constraints::UNIQUE_TRIP_DAY_PER_TRIP,
        );

        store
            .create(&NewTripDay::new(porto.id, date("2024-01-02")))
            .await
            .expect("same date on another trip");
    }

    #[tokio::test]
    async fn lodging_constraints_are_enforced() {
        let store = store().await;
        let lisbon = trip(&store, "2024-01-01", "2024-01-05").await;

        let err = store
            .create(&lodging(lisbon.id, "Casa", "2024-01-04", "2024-01-02"))
            .await
            .expect_err("departure before arrival");
        assert_violation(
            err,
            ConstraintKind::Check,
            constraints::ARRIVAL_DATE_BEFORE_DEPARTURE_DATE,
        );

        let casa = store
            .create(&lodging(lisbon.id, "Casa", "2024-01-01", "2024-01-03"))
            .await
            .expect("lodging");
        assert_eq!(casa.to_string(), "Casa (2024-01-01 to 2024-01-03)");

        let err = store
            .create(&lodging(lisbon.id, "Casa", "2024-01-03", "2024-01-05"))
            .await
            .expect_err("duplicate name");
        assert_violation(
            err,
            ConstraintKind::Unique,
            constraints::UNIQUE_LODGING_PER_TRIP,
        );
    }

    #[tokio::test]
    async fn saved_places_are_unique_per_trip() {
        let store = store().await;
        let lisbon = trip(&store, "2024-01-01", "2024-01-05").await;
        let tower = store.create(&NewPlace::new("Belém Tower")).await.expect("place");
        let saved = NewTripSavedPlace {
            trip_id: lisbon.id,
            place_id: tower.id,
        };

        store.create(&saved).await.expect("saved place");
        let err = store.create(&saved).await.expect_err("duplicate");
        assert_violation(
            err,
            ConstraintKind::Unique,
            constraints::UNIQUE_SAVED_PLACE_PER_TRIP,
        );
    }

    #[tokio::test]
    async fn event_slots_are_unique_only_with_place_and_time() {
        let store = store().await;
        let lisbon = trip(&store, "2024-01-01", "2024-01-05").await;
        let day = store
            .create(&NewTripDay::new(lisbon.id, date("2024-01-01")))
            .await
            .expect("day");
        let museum = store.create(&NewPlace::new("Gulbenkian")).await.expect("place");

        let mut visit = NewEvent::new(day.id, "Visit");
        visit.kind = EventType::Activity;
        visit.place_id = Some(museum.id);
        visit.start_time = Some(time("09:00"));
        visit.duration = Some(90);
        let created = store.create(&visit).await.expect("event");
        assert_eq!(created.kind, EventType::Activity);
        assert_eq!(created.end_time(), Some(time("10:30")));

        let err = store.create(&visit).await.expect_err("same slot");
        assert_violation(
            err,
            ConstraintKind::Unique,
            constraints::UNIQUE_EVENT_PER_TRIP_DAY,
        );

        let mut placeless = NewEvent::new(day.id, "Walk");
        placeless.start_time = Some(time("09:00"));
        store.create(&placeless).await.expect("first placeless");
        store.create(&placeless).await.expect("second placeless");

        let mut untimed = NewEvent::new(day.id, "Browse");
        untimed.place_id = Some(museum.id);
        store.create(&untimed).await.expect("first untimed");
        store.create(&untimed).await.expect("second untimed");

        let events: Vec<Event> = store.list().await.expect("list");
        assert_eq!(events.len(), 5);
        assert!(events
            .iter()
            .filter(|event| event.name != "Visit")
            .all(|event| event.kind == EventType::Other));
    }

    #[tokio::test]
    async fn event_duration_cannot_be_negative_in_storage() {
        let store = store().await;
        let lisbon = trip(&store, "2024-01-01", "2024-01-05").await;
        let day = store
            .create(&NewTripDay::new(lisbon.id, date("2024-01-01")))
            .await
            .expect("day");

        let now = Utc::now();
        let err = sqlx::query(
            "INSERT INTO events (id, created_at, updated_at, name, trip_day_id, duration) VALUES (?1, ?2, ?2, 'Bad', ?3, -5)",
        )
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(day.id)
        .execute(&store.db)
        .await
        .map_err(AppError::from)
        .expect_err("negative duration");
        assert_violation(
            err,
            ConstraintKind::Check,
            constraints::EVENT_DURATION_NON_NEGATIVE,
        );
    }

    #[tokio::test]
    async fn dates_beyond_year_9999_are_rejected_before_writing() {
        let store = store().await;
        let lisbon = trip(&store, "2024-01-01", "2024-01-05").await;
        let far = NaiveDate::from_ymd_opt(10_000, 1, 1).expect("representable date");

        let err = store
            .create(&NewTrip {
                name: "Far".into(),
                start_date: far,
                end_date: date("9999-12-31"),
                user_id: lisbon.user_id,
            })
            .await
            .expect_err("five-digit year");
        assert!(matches!(err, AppError::BadRequest(msg) if msg.starts_with("start_date")));

        let err = store
            .update(
                lisbon.id,
                &NewTrip {
                    name: "Lisbon".into(),
                    start_date: date("9999-12-31"),
                    end_date: far,
                    user_id: lisbon.user_id,
                },
            )
            .await
            .expect_err("five-digit year");
        assert!(matches!(err, AppError::BadRequest(msg) if msg.starts_with("end_date")));

        let mut stay = lodging(lisbon.id, "Casa", "2024-01-01", "2024-01-03");
        stay.arrival_date = far;
        let err = store.create(&stay).await.expect_err("five-digit year");
        assert!(matches!(err, AppError::BadRequest(msg) if msg.starts_with("arrival_date")));

        let err = store
            .create(&NewTripDay::new(lisbon.id, far))
            .await
            .expect_err("five-digit year");
        assert!(matches!(err, AppError::BadRequest(msg) if msg.starts_with("date")));

        let trips: Vec<Trip> = store.list().await.expect("list");
        assert_eq!(trips, [lisbon]);
        assert!(store.list::<Lodging>().await.expect("lodgings").is_empty());
    }

    #[tokio::test]
    async fn stored_dates_must_have_four_digit_years() {
        let store = store().await;
        let lisbon = trip(&store, "2024-01-01", "2024-01-05").await;
        let now = Utc::now();

        let err = sqlx::query(
            "INSERT INTO trips (id, created_at, updated_at, name, start_date, end_date, user_id) VALUES (?1, ?2, ?2, 'Far', '+10000-01-01', '9999-12-31', ?3)",
        )
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(lisbon.user_id)
        .execute(&store.db)
        .await
        .map_err(AppError::from)
        .expect_err("reversed range hidden by a five-digit year");
        assert_violation(err, ConstraintKind::Check, constraints::TRIP_START_DATE_FORMAT);

        let err = sqlx::query(
            "INSERT INTO lodgings (id, created_at, updated_at, name, arrival_date, departure_date, location_text, trip_id) VALUES (?1, ?2, ?2, 'Casa', '+10000-01-01', '2024-01-03', 'Alfama', ?3)",
        )
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(lisbon.id)
        .execute(&store.db)
        .await
        .map_err(AppError::from)
        .expect_err("five-digit arrival year");
        assert_violation(
            err,
            ConstraintKind::Check,
            constraints::LODGING_ARRIVAL_DATE_FORMAT,
        );
    }

    #[tokio::test]
    async fn unknown_parent_is_a_foreign_key_violation() {
        let store = store().await;
        let err = store
            .create(&NewTripDay::new(Uuid::new_v4(), date("2024-01-01")))
            .await
            .expect_err("missing trip");
        assert_violation(err, ConstraintKind::ForeignKey, constraints::FOREIGN_KEY);
    }

    #[tokio::test]
    async fn deleting_trip_cascades_to_children() {
        let store = store().await;
        let lisbon = trip(&store, "2024-01-01", "2024-01-05").await;
        let day = store
            .create(&NewTripDay::new(lisbon.id, date("2024-01-01")))
            .await
            .expect("day");
        store
            .create(&NewEvent::new(day.id, "Dinner"))
            .await
            .expect("event");
        store
            .create(&lodging(lisbon.id, "Casa", "2024-01-01", "2024-01-05"))
            .await
            .expect("lodging");
        let place = store.create(&NewPlace::new("Miradouro")).await.expect("place");
        store
            .create(&NewTripSavedPlace {
                trip_id: lisbon.id,
                place_id: place.id,
            })
            .await
            .expect("saved");
        store
            .create(&NewUserTrip {
                user_id: lisbon.user_id,
                trip_id: Some(lisbon.id),
            })
            .await
            .expect("user trip");

        store.delete::<Trip>(lisbon.id).await.expect("delete trip");

        assert!(store.list::<TripDay>().await.expect("days").is_empty());
        assert!(store.list::<Event>().await.expect("events").is_empty());
        assert!(store.list::<Lodging>().await.expect("lodgings").is_empty());
        assert!(store
            .list::<TripSavedPlace>()
            .await
            .expect("saved")
            .is_empty());
        assert!(store.list::<UserTrip>().await.expect("shares").is_empty());
        assert_eq!(store.list::<Place>().await.expect("places").len(), 1);
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_owned_trips() {
        let store = store().await;
        let lisbon = trip(&store, "2024-01-01", "2024-01-05").await;
        store
            .create(&NewUserTrip {
                user_id: lisbon.user_id,
                trip_id: None,
            })
            .await
            .expect("share without trip");

        store.delete::<User>(lisbon.user_id).await.expect("delete user");

        assert!(store.list::<Trip>().await.expect("trips").is_empty());
        assert!(store.list::<UserTrip>().await.expect("shares").is_empty());
    }

    #[tokio::test]
    async fn deleting_place_nullifies_lodgings_and_events() {
        let store = store().await;
        let lisbon = trip(&store, "2024-01-01", "2024-01-05").await;
        let place = store.create(&NewPlace::new("Hotel Avenida")).await.expect("place");

        let mut stay = lodging(lisbon.id, "Avenida", "2024-01-01", "2024-01-05");
        stay.place_id = Some(place.id);
        let stay = store.create(&stay).await.expect("lodging");

        let day = store
            .create(&NewTripDay::new(lisbon.id, date("2024-01-01")))
            .await
            .expect("day");
        let mut check_in = NewEvent::new(day.id, "Check in");
        check_in.place_id = Some(place.id);
        check_in.start_time = Some(time("15:00"));
        let check_in = store.create(&check_in).await.expect("event");

        store
            .create(&NewTripSavedPlace {
                trip_id: lisbon.id,
                place_id: place.id,
            })
            .await
            .expect("saved");

        store.delete::<Place>(place.id).await.expect("delete place");

        let stay: Lodging = store.get(stay.id).await.expect("lodging survives");
        assert_eq!(stay.place_id, None);
        let check_in: Event = store.get(check_in.id).await.expect("event survives");
        assert_eq!(check_in.place_id, None);
        assert!(store
            .list::<TripSavedPlace>()
            .await
            .expect("saved")
            .is_empty());
    }

    #[tokio::test]
    async fn list_returns_records_in_creation_order() {
        let store = store().await;
        let lisbon = trip(&store, "2024-01-01", "2024-01-05").await;
        for day in ["2024-01-03", "2024-01-01", "2024-01-02"] {
            store
                .create(&NewTripDay::new(lisbon.id, date(day)))
                .await
                .expect("day");
        }
        let days: Vec<TripDay> = store.list().await.expect("list");
        let dates: Vec<String> = days.iter().map(|day| day.date.to_string()).collect();
        assert_eq!(dates, ["2024-01-03", "2024-01-01", "2024-01-02"]);
    }
}
