//! MySQL implementation of the VerificationTokenRepository trait.
//!
//! A unique index on (user_id, token_type) backs the one-token-per-purpose
//! rule. Attempt counting and consumption are single statements, so two
//! concurrent checks of the same code can never both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};

use idn_core::domain::entities::{AccountType, TokenPurpose, VerificationToken};
use idn_core::errors::DomainError;
use idn_core::repositories::VerificationTokenRepository;

use super::{is_unique_violation, query_failed, verification_token_table};

pub struct MySqlVerificationTokenRepository {
    pool: MySqlPool,
    account_type: AccountType,
    table: &'static str,
}

impl MySqlVerificationTokenRepository {
    pub fn new(pool: MySqlPool, account_type: AccountType) -> Self {
        Self {
            pool,
            account_type,
            table: verification_token_table(account_type),
        }
    }

    fn row_to_token(&self, row: &MySqlRow) -> Result<VerificationToken, DomainError> {
        let decode = |e: sqlx::Error| query_failed("decode", self.table, e);

        let token_type: String = row.try_get("token_type").map_err(decode)?;
        let purpose = token_type.parse::<TokenPurpose>().map_err(|e| {
            tracing::error!(table = self.table, error = %e, "Unknown token type in database");
            DomainError::internal(e)
        })?;

        Ok(VerificationToken {
            id: row.try_get("id").map_err(decode)?,
            account_type: self.account_type,
            account_id: row.try_get("user_id").map_err(decode)?,
            purpose,
            code_hash: row.try_get("token").map_err(decode)?,
            attempt_number: row.try_get("attempt_number").map_err(decode)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created").map_err(decode)?,
        })
    }
}

#[async_trait]
impl VerificationTokenRepository for MySqlVerificationTokenRepository {
    async fn find(
        &self,
        account_id: i64,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, DomainError> {
        let query = format!(
            "SELECT id, user_id, token_type, token, attempt_number, created \
             FROM {} WHERE user_id = ? AND token_type = ? LIMIT 1",
            self.table
        );

        let row = sqlx::query(&query)
            .bind(account_id)
            .bind(purpose.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("select", self.table, e))?;

        row.map(|row| self.row_to_token(&row)).transpose()
    }

    async fn insert(&self, token: VerificationToken) -> Result<VerificationToken, DomainError> {
        let query = format!(
            "INSERT INTO {} (user_id, token_type, token, attempt_number, created) VALUES (?, ?, ?, ?, ?)",
            self.table
        );

        let result = sqlx::query(&query)
            .bind(token.account_id)
            .bind(token.purpose.as_str())
            .bind(&token.code_hash)
            .bind(token.attempt_number)
            .bind(token.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Conflict {
                        field: "token".to_string(),
                    }
                } else {
                    query_failed("insert", self.table, e)
                }
            })?;

        Ok(VerificationToken {
            id: result.last_insert_id() as i64,
            ..token
        })
    }

    async fn increment_attempts(&self, id: i64) -> Result<Option<i32>, DomainError> {
        let update = format!(
            "UPDATE {} SET attempt_number = attempt_number + 1 WHERE id = ?",
            self.table
        );
        let result = sqlx::query(&update)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("increment_attempts", self.table, e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let select = format!("SELECT attempt_number FROM {} WHERE id = ?", self.table);
        sqlx::query_scalar::<_, i32>(&select)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("select_attempts", self.table, e))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE id = ?", self.table);

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("delete", self.table, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_account(&self, account_id: i64) -> Result<u64, DomainError> {
        let query = format!("DELETE FROM {} WHERE user_id = ?", self.table);

        let result = sqlx::query(&query)
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("delete_by_account", self.table, e))?;

        Ok(result.rows_affected())
    }

    async fn delete_by_account_and_purpose(
        &self,
        account_id: i64,
        purpose: TokenPurpose,
    ) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE user_id = ? AND token_type = ?", self.table);

        let result = sqlx::query(&query)
            .bind(account_id)
            .bind(purpose.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed("delete_by_account_and_purpose", self.table, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, account_id: i64, purpose: TokenPurpose) -> Result<bool, DomainError> {
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE user_id = ? AND token_type = ?",
            self.table
        );

        let count: i64 = sqlx::query_scalar(&query)
            .bind(account_id)
            .bind(purpose.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_failed("exists", self.table, e))?;

        Ok(count > 0)
    }
}
