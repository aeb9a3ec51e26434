use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::{Contact, DomainError, NewContact};
use crate::store::ContactRepository;

/// Networked-relational backend over a PostgreSQL pool. The pool is
/// established, pinged and schema-initialized by `db::connect` before it
/// reaches this type.
#[derive(Clone, Debug)]
pub struct PostgresContactRepository {
    pool: PgPool,
}

impl PostgresContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    async fn get_all(&self) -> Result<Vec<Contact>, DomainError> {
        let rows = sqlx::query("SELECT id, first_name, last_name, email FROM contacts")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.iter().map(row_to_contact).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Contact, DomainError> {
        let maybe_row =
            sqlx::query("SELECT id, first_name, last_name, email FROM contacts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        match maybe_row {
            Some(row) => Ok(row_to_contact(&row)),
            None => Err(DomainError::not_found(format!("no contact with id {id}"))),
        }
    }

    async fn create(&self, contact: NewContact) -> Result<i64, DomainError> {
        let row = sqlx::query(
            "INSERT INTO contacts (first_name, last_name, email) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.get("id"))
    }

    async fn update(&self, contact: &Contact) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE contacts SET first_name = $1, last_name = $2, email = $3 WHERE id = $4",
        )
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.email)
        .bind(contact.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "no contact with id {}",
                contact.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

fn row_to_contact(row: &sqlx::postgres::PgRow) -> Contact {
    Contact {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
    }
}

fn map_sqlx_error(error: sqlx::Error) -> DomainError {
    match error {
        sqlx::Error::RowNotFound => DomainError::not_found("no such contact"),
        other => DomainError::storage(other.to_string()),
    }
}
