//! MySQL implementation of the AccountRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};

use idn_core::domain::entities::{Account, AccountType};
use idn_core::errors::DomainError;
use idn_core::repositories::AccountRepository;

use super::{account_table, is_unique_violation, query_failed, verification_token_table};

const ACCOUNT_COLUMNS: &str = "id, email, phone_number, password, role, active, \
     phone_verified, email_verified, password_updated_at, email_updated_at";

/// Account store of one population (`users` or `system_users`)
pub struct MySqlAccountRepository {
    pool: MySqlPool,
    table: &'static str,
    token_table: &'static str,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool, account_type: AccountType) -> Self {
        Self {
            pool,
            table: account_table(account_type),
            token_table: verification_token_table(account_type),
        }
    }

    /// Convert database row to Account entity
    fn row_to_account(row: &MySqlRow) -> Result<Account, sqlx::Error> {
        Ok(Account {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
            password_hash: row.try_get("password")?,
            role: row.try_get("role")?,
            active: row.try_get("active")?,
            phone_verified: row.try_get("phone_verified")?,
            email_verified: row.try_get("email_verified")?,
            password_updated_at: row.try_get::<Option<DateTime<Utc>>, _>("password_updated_at")?,
            email_updated_at: row.try_get::<Option<DateTime<Utc>>, _>("email_updated_at")?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = ? LIMIT 1",
            ACCOUNT_COLUMNS, self.table, column
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("select", self.table, e))?;

        row.map(|row| Self::row_to_account(&row))
            .transpose()
            .map_err(|e| query_failed("decode", self.table, e))
    }

    /// Run a single-row UPDATE and require the row to exist
    async fn update_one(&self, operation: &str, query: &str, id: i64, bind: Option<&str>) -> Result<(), DomainError> {
        let mut statement = sqlx::query(query);
        if let Some(value) = bind {
            statement = statement.bind(value);
        }

        let result = statement
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed(operation, self.table, e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("account {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        // Emails are stored lowercased
        self.find_one("email", &email.trim().to_lowercase()).await
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Option<Account>, DomainError> {
        self.find_one("phone_number", phone_number).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, DomainError> {
        let query = format!("SELECT {} FROM {} WHERE id = ? LIMIT 1", ACCOUNT_COLUMNS, self.table);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("select", self.table, e))?;

        row.map(|row| Self::row_to_account(&row))
            .transpose()
            .map_err(|e| query_failed("decode", self.table, e))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        let query = format!("SELECT COUNT(*) FROM {} WHERE email = ?", self.table);

        let count: i64 = sqlx::query_scalar(&query)
            .bind(email.trim().to_lowercase())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_failed("count", self.table, e))?;

        Ok(count > 0)
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), DomainError> {
        let query = format!(
            "UPDATE {} SET password = ?, password_updated_at = ? WHERE id = ?",
            self.table
        );
        self.update_one("update_password", &query, id, Some(password_hash)).await
    }

    async fn set_phone_verified(&self, id: i64) -> Result<(), DomainError> {
        let query = format!(
            "UPDATE {} SET phone_verified = TRUE, updated_at = ? WHERE id = ?",
            self.table
        );
        self.update_one("set_phone_verified", &query, id, None).await
    }

    async fn set_email_verified(&self, id: i64) -> Result<(), DomainError> {
        let query = format!(
            "UPDATE {} SET email_verified = TRUE, updated_at = ? WHERE id = ?",
            self.table
        );
        self.update_one("set_email_verified", &query, id, None).await
    }

    async fn update_role(&self, id: i64, role: &str) -> Result<(), DomainError> {
        let query = format!("UPDATE {} SET role = ?, updated_at = ? WHERE id = ?", self.table);
        self.update_one("update_role", &query, id, Some(role)).await
    }

    async fn update_email_and_purge_tokens(&self, account: &Account) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| query_failed("begin", self.table, e))?;

        let purge = format!("DELETE FROM {} WHERE user_id = ?", self.token_table);
        let purged = sqlx::query(&purge)
            .bind(account.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| query_failed("purge_tokens", self.token_table, e))?;

        let update = format!(
            "UPDATE {} SET email = ?, email_verified = ?, email_updated_at = ?, updated_at = ? WHERE id = ?",
            self.table
        );
        let updated = sqlx::query(&update)
            .bind(&account.email)
            .bind(account.email_verified)
            .bind(account.email_updated_at.unwrap_or_else(Utc::now))
            .bind(Utc::now())
            .bind(account.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Conflict {
                        field: "email".to_string(),
                    }
                } else {
                    query_failed("update_email", self.table, e)
                }
            })?;

        if updated.rows_affected() == 0 {
            // Dropping the transaction rolls back the purge
            return Err(DomainError::not_found(format!("account {}", account.id)));
        }

        tx.commit()
            .await
            .map_err(|e| query_failed("commit", self.table, e))?;

        tracing::debug!(
            table = self.table,
            account_id = account.id,
            purged_tokens = purged.rows_affected(),
            "Email updated and verification tokens purged"
        );
        Ok(())
    }
}
