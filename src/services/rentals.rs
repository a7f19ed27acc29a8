//! Rental transaction service: issue, return, history and rent reporting

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::transaction::{
        day_window, BookTransaction, DateRangeQuery, TransactionQuery, TransactionSummary,
    },
    repository::Repository,
};

/// Whole rental days between issue and return, any partial day rounded up.
/// A return before the recorded issue date (clock skew, future-dated data)
/// counts as zero days rather than a phantom positive duration.
pub fn rental_days(issued: DateTime<Utc>, returned: DateTime<Utc>) -> i64 {
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    let elapsed_ms = returned.signed_duration_since(issued).num_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }
    (elapsed_ms + DAY_MS - 1) / DAY_MS
}

#[derive(Clone)]
pub struct RentalsService {
    repository: Repository,
}

impl RentalsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Issue a book to a user, returning the new transaction id.
    ///
    /// The username is copied onto the transaction as it is at issue time.
    /// A second active issue for the same (user, book) pair is rejected by
    /// the persistence layer, so concurrent issues cannot both succeed.
    pub async fn issue_book(&self, user_id: i32, book_name: &str) -> AppResult<i32> {
        let book = self.repository.books.get_by_name(book_name).await?;
        let user = self.repository.users.get_by_id(user_id).await?;

        let id = self
            .repository
            .transactions
            .create_issue(user_id, &user.username, &book.book_name, Utc::now())
            .await?;

        tracing::info!(
            "Issued '{}' to user {} (transaction {})",
            book.book_name,
            user_id,
            id
        );
        Ok(id)
    }

    /// Return an issued book, computing the rent owed.
    pub async fn return_book(&self, user_id: i32, book_name: &str) -> AppResult<BookTransaction> {
        let active = match self
            .repository
            .transactions
            .get_active(user_id, book_name)
            .await?
        {
            Some(tx) => tx,
            None => {
                // Distinguish "never issued" from "already returned"
                let has_history = self
                    .repository
                    .transactions
                    .pair_has_history(user_id, book_name)
                    .await?;
                return Err(if has_history {
                    AppError::Conflict("Book already returned".to_string())
                } else {
                    AppError::NotFound("No such book is issued to this user".to_string())
                });
            }
        };

        let book = self.repository.books.get_by_name(book_name).await?;

        let now = Utc::now();
        let days = rental_days(active.issued_date, now);
        let total_rent = Decimal::from(days) * book.rent_price_per_day;

        // The conditional update loses against a concurrent return
        self.repository
            .transactions
            .complete_return(active.id, now, total_rent)
            .await?
            .ok_or_else(|| AppError::Conflict("Book already returned".to_string()))
    }

    /// Transaction history filtered by book, user and issue-date range
    pub async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> AppResult<Vec<TransactionSummary>> {
        let transactions = self.repository.transactions.search(query).await?;
        Ok(transactions.into_iter().map(Into::into).collect())
    }

    /// Total rent collected over a book's whole transaction history;
    /// outstanding rentals contribute nothing.
    pub async fn total_rent_for_book(&self, book_name: &str) -> AppResult<Decimal> {
        self.repository
            .transactions
            .total_rent_for_book(book_name)
            .await
    }

    /// Completed transactions whose issued and returned dates both fall
    /// within the inclusive [start_date, end_date] window.
    pub async fn completed_in_range(
        &self,
        query: &DateRangeQuery,
    ) -> AppResult<Vec<BookTransaction>> {
        if query.end_date < query.start_date {
            return Err(AppError::BadRequest(
                "end_date must not precede start_date".to_string(),
            ));
        }
        let (from, to) = day_window(query.start_date, query.end_date);
        self.repository
            .transactions
            .completed_in_window(from, to, query.user_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: i64, m: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let issued = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        (issued, issued + Duration::hours(h) + Duration::minutes(m))
    }

    #[test]
    fn partial_day_rounds_up_to_one() {
        let (issued, returned) = at(1, 30);
        assert_eq!(rental_days(issued, returned), 1);
    }

    #[test]
    fn one_minute_counts_as_a_day() {
        let (issued, returned) = at(0, 1);
        assert_eq!(rental_days(issued, returned), 1);
    }

    #[test]
    fn twenty_five_hours_is_two_days() {
        let (issued, returned) = at(25, 0);
        assert_eq!(rental_days(issued, returned), 2);
    }

    #[test]
    fn exactly_one_day_is_one_day() {
        let (issued, returned) = at(24, 0);
        assert_eq!(rental_days(issued, returned), 1);
    }

    #[test]
    fn future_dated_issue_yields_zero() {
        let (issued, returned) = at(0, 0);
        assert_eq!(rental_days(issued, returned), 0);
        assert_eq!(rental_days(issued + Duration::hours(5), returned), 0);
    }

    #[test]
    fn rent_scales_with_price() {
        let (issued, returned) = at(25, 0);
        let days = rental_days(issued, returned);
        let price = Decimal::new(125, 1); // 12.5 per day
        assert_eq!(Decimal::from(days) * price, Decimal::new(250, 1));
    }
}
