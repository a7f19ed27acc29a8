//! Rental transaction endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::transaction::{BookTransaction, DateRangeQuery, TransactionQuery, TransactionSummary},
};

use super::AuthenticatedUser;

/// Issue / return request: the user comes from the session cookie
#[derive(Deserialize, ToSchema)]
pub struct BookActionRequest {
    /// Name of the book to issue or return
    pub book_name: String,
}

/// Issue response
#[derive(Serialize, ToSchema)]
pub struct IssueResponse {
    /// Status message
    pub message: String,
    /// New transaction id
    pub transaction_id: i32,
}

/// Return response with the completed transaction
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Status message
    pub message: String,
    /// Completed transaction, including the rent charged
    pub transaction: BookTransaction,
}

/// Transaction history response
#[derive(Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub transaction_details: Vec<TransactionSummary>,
    pub size: usize,
}

/// Total rent query
#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TotalRentQuery {
    /// Exact book name
    pub book_name: String,
}

/// Total rent response
#[derive(Serialize, ToSchema)]
pub struct TotalRentResponse {
    pub total_rent_generated: Decimal,
}

/// Date-range report response
#[derive(Serialize, ToSchema)]
pub struct DateRangeResponse {
    pub transactions: Vec<BookTransaction>,
    pub count: usize,
}

/// Issue a book to the authenticated user
#[utoipa::path(
    post,
    path = "/books/issue",
    tag = "rentals",
    security(("cookie_auth" = [])),
    request_body = BookActionRequest,
    responses(
        (status = 201, description = "Book issued", body = IssueResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such book"),
        (status = 409, description = "Book already issued to this user")
    )
)]
pub async fn issue_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BookActionRequest>,
) -> AppResult<(StatusCode, Json<IssueResponse>)> {
    let transaction_id = state
        .services
        .rentals
        .issue_book(claims.user_id, &request.book_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(IssueResponse {
            message: "Book issued".to_string(),
            transaction_id,
        }),
    ))
}

/// Return a book and settle the rent
#[utoipa::path(
    post,
    path = "/books/return",
    tag = "rentals",
    security(("cookie_auth" = [])),
    request_body = BookActionRequest,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No active rental for this user and book"),
        (status = 409, description = "Book already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BookActionRequest>,
) -> AppResult<Json<ReturnResponse>> {
    let transaction = state
        .services
        .rentals
        .return_book(claims.user_id, &request.book_name)
        .await?;

    Ok(Json(ReturnResponse {
        message: "Book returned".to_string(),
        transaction,
    }))
}

/// Transaction history, filtered by book, user and issue-date range
#[utoipa::path(
    get,
    path = "/books/issued/users",
    tag = "rentals",
    security(("cookie_auth" = [])),
    params(TransactionQuery),
    responses(
        (status = 200, description = "Matching transactions", body = TransactionListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn issued_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<TransactionQuery>,
) -> AppResult<Json<TransactionListResponse>> {
    let transaction_details = state.services.rentals.list_transactions(&query).await?;

    Ok(Json(TransactionListResponse {
        size: transaction_details.len(),
        transaction_details,
    }))
}

/// Total rent a book has generated over its whole history
#[utoipa::path(
    get,
    path = "/books/total-book-rent",
    tag = "rentals",
    security(("cookie_auth" = [])),
    params(TotalRentQuery),
    responses(
        (status = 200, description = "Aggregate rent", body = TotalRentResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn total_book_rent(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<TotalRentQuery>,
) -> AppResult<Json<TotalRentResponse>> {
    let total_rent_generated = state
        .services
        .rentals
        .total_rent_for_book(&query.book_name)
        .await?;

    Ok(Json(TotalRentResponse {
        total_rent_generated,
    }))
}

/// Completed transactions inside an inclusive date window.
///
/// Both issued_date and returned_date must fall inside the window;
/// outstanding rentals are excluded. Public report endpoint.
#[utoipa::path(
    get,
    path = "/books/daterange",
    tag = "rentals",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Transactions in window", body = DateRangeResponse),
        (status = 400, description = "Invalid window")
    )
)]
pub async fn transactions_in_range(
    State(state): State<crate::AppState>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<DateRangeResponse>> {
    let transactions = state.services.rentals.completed_in_range(&query).await?;

    Ok(Json(DateRangeResponse {
        count: transactions.len(),
        transactions,
    }))
}
