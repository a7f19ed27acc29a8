//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a book by its exact name
    pub async fn get_by_name(&self, book_name: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE book_name = $1")
            .bind(book_name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No book named '{}'", book_name)))
    }

    /// Search books by free text and price range.
    ///
    /// The free-text term matches book_name, author_name and category
    /// case-insensitively (OR-combined); price bounds are inclusive.
    /// With no filters, all books are returned.
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param = 0;

        if query.search.is_some() {
            param += 1;
            conditions.push(format!(
                "(book_name ILIKE ${i} OR author_name ILIKE ${i} OR category ILIKE ${i})",
                i = param
            ));
        }
        if query.min_price.is_some() {
            param += 1;
            conditions.push(format!("rent_price_per_day >= ${}", param));
        }
        if query.max_price.is_some() {
            param += 1;
            conditions.push(format!("rent_price_per_day <= ${}", param));
        }

        let where_clause = if conditions.is_empty() {
            "1=1".to_string()
        } else {
            conditions.join(" AND ")
        };

        let sql = format!(
            "SELECT * FROM books WHERE {} ORDER BY book_name",
            where_clause
        );

        let mut q = sqlx::query_as::<_, Book>(&sql);
        if let Some(ref term) = query.search {
            q = q.bind(format!("%{}%", term));
        }
        if let Some(min_price) = query.min_price {
            q = q.bind(min_price);
        }
        if let Some(max_price) = query.max_price {
            q = q.bind(max_price);
        }

        let books = q.fetch_all(&self.pool).await?;
        Ok(books)
    }
}
