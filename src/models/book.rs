//! Book catalog model and query types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Catalog entry. Books are seeded externally; the API only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub book_name: String,
    pub author_name: String,
    pub category: String,
    pub rent_price_per_day: Decimal,
}

/// Book search parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Free-text search across book_name, author_name and category
    pub search: Option<String>,
    /// Lower bound on rent_price_per_day (inclusive)
    pub min_price: Option<Decimal>,
    /// Upper bound on rent_price_per_day (inclusive)
    pub max_price: Option<Decimal>,
}
