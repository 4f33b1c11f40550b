//! Classification of PostgreSQL errors.

/// Name of the unique constraint guarding `urls.short_url`.
pub const SHORT_URL_CONSTRAINT: &str = "urls_short_url_key";

/// Returns true if `e` is a unique violation on the short code column.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_URL_CONSTRAINT))
}
