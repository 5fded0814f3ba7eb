use sea_orm::{DbErr, SqlErr};

/// `true` when the database rejected a write for violating a unique constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
