//! Rental transaction model and related types

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};

/// Transaction lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Issued,
    Returned,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Issued => "issued",
            TransactionStatus::Returned => "returned",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "issued" => Ok(TransactionStatus::Issued),
            "returned" => Ok(TransactionStatus::Returned),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

// SQLx conversion for TransactionStatus (stored as text)
impl sqlx::Type<Postgres> for TransactionStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for TransactionStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for TransactionStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Rental transaction from database.
///
/// `username` is a copy taken at issue time and is not refreshed if the
/// user later changes; `book_name` references the book by name, not id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookTransaction {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub book_name: String,
    pub issued_date: DateTime<Utc>,
    pub returned_date: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
    pub total_rent_paid: Option<Decimal>,
}

/// Projection of a transaction for history listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionSummary {
    pub username: String,
    pub status: TransactionStatus,
    pub issued_date: DateTime<Utc>,
}

impl From<BookTransaction> for TransactionSummary {
    fn from(tx: BookTransaction) -> Self {
        TransactionSummary {
            username: tx.username,
            status: tx.status,
            issued_date: tx.issued_date,
        }
    }
}

/// Transaction history filter parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct TransactionQuery {
    /// Exact book name
    pub book_name: Option<String>,
    /// Exact user id
    pub user_id: Option<i32>,
    /// Lower bound on issued_date (inclusive, YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// Upper bound on issued_date (inclusive of the whole day, YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
}

/// Date-range report parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DateRangeQuery {
    /// Window start (inclusive, YYYY-MM-DD)
    pub start_date: NaiveDate,
    /// Window end (inclusive of the whole day, YYYY-MM-DD)
    pub end_date: NaiveDate,
    /// Optional exact user id filter
    pub user_id: Option<i32>,
}

/// Convert an inclusive calendar-date window to a half-open UTC timestamp
/// range `[start 00:00, end + 1 day 00:00)`.
pub fn day_window(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let from = start.and_time(NaiveTime::MIN).and_utc();
    let to = end
        .succ_opt()
        .unwrap_or(NaiveDate::MAX)
        .and_time(NaiveTime::MIN)
        .and_utc();
    (from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_parses_both_states() {
        assert_eq!(
            "issued".parse::<TransactionStatus>().unwrap(),
            TransactionStatus::Issued
        );
        assert_eq!(
            "RETURNED".parse::<TransactionStatus>().unwrap(),
            TransactionStatus::Returned
        );
        assert!("overdue".parse::<TransactionStatus>().is_err());
    }

    #[test]
    fn day_window_covers_the_whole_end_day() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let (from, to) = day_window(start, end);

        let late_on_end_day = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        assert!(from <= late_on_end_day && late_on_end_day < to);
        assert!(next_day >= to);
    }

    #[test]
    fn day_window_single_day() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let (from, to) = day_window(day, day);
        assert_eq!(to - from, chrono::Duration::days(1));
    }
}
