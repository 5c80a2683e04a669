use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::constraints;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("constraint violation: {0}")]
    Constraint(ConstraintViolation),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("not found")]
    NotFound,
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let violation = err
            .as_database_error()
            .and_then(|db_err| ConstraintViolation::from_sqlite_message(db_err.message()));
        match violation {
            Some(violation) => AppError::Constraint(violation),
            None => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Constraint(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
        };

        (status, self.to_string()).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    Check,
    NotNull,
    ForeignKey,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::Check => "check",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::ForeignKey => "foreign key",
        };
        f.write_str(label)
    }
}

/// A write rejected by the storage engine, named after the declared constraint
/// where SQLite reports enough to identify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    pub constraint: String,
}

impl ConstraintViolation {
    pub fn new(kind: ConstraintKind, constraint: impl Into<String>) -> Self {
        Self {
            kind,
            constraint: constraint.into(),
        }
    }

    /// Parses SQLite's constraint failure messages, e.g.
    /// `UNIQUE constraint failed: trip_days.trip_id, trip_days.date`.
    pub fn from_sqlite_message(message: &str) -> Option<Self> {
        if let Some(columns) = message.strip_prefix("UNIQUE constraint failed: ") {
            let columns = columns.trim();
            let name = constraints::unique_constraint_for(columns).unwrap_or(columns);
            return Some(Self::new(ConstraintKind::Unique, name));
        }
        if let Some(name) = message.strip_prefix("CHECK constraint failed: ") {
            return Some(Self::new(ConstraintKind::Check, name.trim()));
        }
        if let Some(column) = message.strip_prefix("NOT NULL constraint failed: ") {
            return Some(Self::new(ConstraintKind::NotNull, column.trim()));
        }
        if message.starts_with("FOREIGN KEY constraint failed") {
            return Some(Self::new(
                ConstraintKind::ForeignKey,
                constraints::FOREIGN_KEY,
            ));
        }
        None
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} constraint `{}` failed", self.kind, self.constraint)
    }
}
