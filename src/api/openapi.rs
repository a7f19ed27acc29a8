//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, rentals, SESSION_COOKIE};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Librent API",
        version = "1.0.0",
        description = "Library Book Rental REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        // Books
        books::get_books,
        // Rentals
        rentals::issue_book,
        rentals::return_book,
        rentals::issued_users,
        rentals::total_book_rent,
        rentals::transactions_in_range,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            auth::RegisterResponse,
            auth::LoginResponse,
            auth::MessageResponse,
            // Books
            crate::models::book::Book,
            crate::models::book::BookQuery,
            books::BooksResponse,
            // Rentals
            crate::models::transaction::BookTransaction,
            crate::models::transaction::TransactionStatus,
            crate::models::transaction::TransactionSummary,
            crate::models::transaction::TransactionQuery,
            crate::models::transaction::DateRangeQuery,
            rentals::BookActionRequest,
            rentals::IssueResponse,
            rentals::ReturnResponse,
            rentals::TransactionListResponse,
            rentals::TotalRentQuery,
            rentals::TotalRentResponse,
            rentals::DateRangeResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and session endpoints"),
        (name = "books", description = "Book catalog search"),
        (name = "rentals", description = "Book issue, return and reporting")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
