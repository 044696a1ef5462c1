use crate::domain::errors::DomainError;

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                // undefined_column / undefined_table: the configured schema
                // does not match the database.
                if matches!(code.as_ref(), "42703" | "42P01") {
                    return DomainError::Persistence(format!(
                        "user directory schema mismatch: {}",
                        db_err.message()
                    ));
                }
            }
            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
