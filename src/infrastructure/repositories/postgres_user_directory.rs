// src/infrastructure/repositories/postgres_user_directory.rs
use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::{DirectoryUser, UserDirectory};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

const SELECT_USER: &str = "SELECT id::text AS id, name, email FROM users";

/// User lookups against the platform's `users` table.
///
/// Whether an external identity column exists is a deployment fact passed in
/// at construction; there is no probing at query time.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
    by_id: String,
    by_external_id: Option<String>,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool, external_id_column: Option<&str>) -> DomainResult<Self> {
        let by_external_id = match external_id_column {
            Some(column) if is_plain_identifier(column) => {
                Some(format!("{SELECT_USER} WHERE {column} = $1 LIMIT 1"))
            }
            Some(column) => {
                return Err(DomainError::Validation(format!(
                    "invalid external id column name {column:?}"
                )));
            }
            None => None,
        };
        Ok(Self {
            pool,
            by_id: format!("{SELECT_USER} WHERE id::text = $1 LIMIT 1"),
            by_external_id,
        })
    }

    async fn fetch_one(&self, sql: &str, subject: &str) -> DomainResult<Option<DirectoryUser>> {
        sqlx::query_as::<_, UserRow>(sql)
            .bind(subject)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx)
    }
}

/// Lowercase ASCII letters, digits and underscores, not starting with a digit.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    name: Option<String>,
    email: Option<String>,
}

impl From<UserRow> for DirectoryUser {
    fn from(row: UserRow) -> Self {
        DirectoryUser::new(row.id, row.name, row.email)
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_id_or_external_id(&self, subject: &str) -> DomainResult<Option<DirectoryUser>> {
        if let Some(user) = self.fetch_one(&self.by_id, subject).await? {
            return Ok(Some(user));
        }
        match self.by_external_id.as_deref() {
            Some(sql) => self.fetch_one(sql, subject).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_check_rejects_injection() {
        assert!(is_plain_identifier("auth_subject"));
        assert!(is_plain_identifier("_legacy_id2"));
        assert!(!is_plain_identifier("2fa"));
        assert!(!is_plain_identifier("id; DROP TABLE users"));
        assert!(!is_plain_identifier("Auth0Id"));
        assert!(!is_plain_identifier(""));
    }

    #[tokio::test]
    async fn rejects_bad_column_at_construction() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .expect("connect_lazy");
        assert!(PostgresUserDirectory::new(pool.clone(), Some("bad column")).is_err());
        assert!(PostgresUserDirectory::new(pool, Some("auth_subject")).is_ok());
    }
}
