//! Rental transactions repository for database operations

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::transaction::{day_window, BookTransaction, TransactionQuery},
};

/// Partial unique index guarding the one-active-issue-per-pair invariant.
const ACTIVE_ISSUE_INDEX: &str = "book_transactions_active_issue_key";

#[derive(Clone)]
pub struct TransactionsRepository {
    pool: Pool<Postgres>,
}

impl TransactionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get the active (issued, not yet returned) transaction for a (user, book) pair
    pub async fn get_active(
        &self,
        user_id: i32,
        book_name: &str,
    ) -> AppResult<Option<BookTransaction>> {
        let tx = sqlx::query_as::<_, BookTransaction>(
            r#"
            SELECT * FROM book_transactions
            WHERE user_id = $1 AND book_name = $2 AND status = 'issued'
            "#,
        )
        .bind(user_id)
        .bind(book_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tx)
    }

    /// Check whether the pair has any transaction history at all
    pub async fn pair_has_history(&self, user_id: i32, book_name: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM book_transactions WHERE user_id = $1 AND book_name = $2)",
        )
        .bind(user_id)
        .bind(book_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Create an issue record, returning the new transaction id.
    ///
    /// The one-active-issue-per-pair invariant is enforced by the partial
    /// unique index, so two concurrent issues for the same pair cannot both
    /// succeed; the loser surfaces as a conflict.
    pub async fn create_issue(
        &self,
        user_id: i32,
        username: &str,
        book_name: &str,
        issued_date: DateTime<Utc>,
    ) -> AppResult<i32> {
        let result = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO book_transactions (user_id, username, book_name, issued_date, status)
            VALUES ($1, $2, $3, $4, 'issued')
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(book_name)
        .bind(issued_date)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(e)) if e.constraint() == Some(ACTIVE_ISSUE_INDEX) => {
                Err(AppError::Conflict("Book already issued".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Mark a transaction returned, stamping the return date and rent.
    ///
    /// The update is conditional on `status = 'issued'`; a transaction that
    /// was returned in the meantime yields `None` instead of being
    /// overwritten.
    pub async fn complete_return(
        &self,
        id: i32,
        returned_date: DateTime<Utc>,
        total_rent_paid: Decimal,
    ) -> AppResult<Option<BookTransaction>> {
        let tx = sqlx::query_as::<_, BookTransaction>(
            r#"
            UPDATE book_transactions
            SET status = 'returned', returned_date = $1, total_rent_paid = $2
            WHERE id = $3 AND status = 'issued'
            RETURNING *
            "#,
        )
        .bind(returned_date)
        .bind(total_rent_paid)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tx)
    }

    /// Search transactions by any combination of exact book name, exact
    /// user id and an inclusive calendar-date range on issued_date.
    pub async fn search(&self, query: &TransactionQuery) -> AppResult<Vec<BookTransaction>> {
        // Each calendar-date bound covers its whole day
        let from = query.start_date.map(|d| day_window(d, d).0);
        let to = query.end_date.map(|d| day_window(d, d).1);

        let mut conditions: Vec<String> = Vec::new();
        let mut param = 0;

        if query.book_name.is_some() {
            param += 1;
            conditions.push(format!("book_name = ${}", param));
        }
        if query.user_id.is_some() {
            param += 1;
            conditions.push(format!("user_id = ${}", param));
        }
        if from.is_some() {
            param += 1;
            conditions.push(format!("issued_date >= ${}", param));
        }
        if to.is_some() {
            param += 1;
            conditions.push(format!("issued_date < ${}", param));
        }

        let where_clause = if conditions.is_empty() {
            "1=1".to_string()
        } else {
            conditions.join(" AND ")
        };

        let sql = format!(
            "SELECT * FROM book_transactions WHERE {} ORDER BY issued_date",
            where_clause
        );

        let mut q = sqlx::query_as::<_, BookTransaction>(&sql);
        if let Some(ref book_name) = query.book_name {
            q = q.bind(book_name);
        }
        if let Some(user_id) = query.user_id {
            q = q.bind(user_id);
        }
        if let Some(from) = from {
            q = q.bind(from);
        }
        if let Some(to) = to {
            q = q.bind(to);
        }

        let transactions = q.fetch_all(&self.pool).await?;
        Ok(transactions)
    }

    /// Sum total_rent_paid over all transactions for a book; transactions
    /// still outstanding (no rent recorded) contribute zero.
    pub async fn total_rent_for_book(&self, book_name: &str) -> AppResult<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_rent_paid), 0) FROM book_transactions WHERE book_name = $1",
        )
        .bind(book_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Completed transactions whose issued_date and returned_date each fall
    /// within the half-open UTC window `[from, to)`; rows without a
    /// returned_date are excluded.
    pub async fn completed_in_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        user_id: Option<i32>,
    ) -> AppResult<Vec<BookTransaction>> {
        let mut sql = String::from(
            r#"
            SELECT * FROM book_transactions
            WHERE issued_date >= $1 AND issued_date < $2
              AND returned_date IS NOT NULL
              AND returned_date >= $1 AND returned_date < $2
            "#,
        );
        if user_id.is_some() {
            sql.push_str(" AND user_id = $3");
        }
        sql.push_str(" ORDER BY issued_date");

        let mut q = sqlx::query_as::<_, BookTransaction>(&sql).bind(from).bind(to);
        if let Some(user_id) = user_id {
            q = q.bind(user_id);
        }

        let transactions = q.fetch_all(&self.pool).await?;
        Ok(transactions)
    }
}
