//! Book catalog endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery},
};

use super::AuthenticatedUser;

/// Book search response
#[derive(Serialize, ToSchema)]
pub struct BooksResponse {
    pub success: bool,
    pub books: Vec<Book>,
    /// Number of books matched
    pub count: usize,
}

/// Search the book catalog
#[utoipa::path(
    get,
    path = "/books/get",
    tag = "books",
    security(("cookie_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = BooksResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BooksResponse>> {
    let books = state.services.catalog.search_books(&query).await?;

    Ok(Json(BooksResponse {
        success: true,
        count: books.len(),
        books,
    }))
}
