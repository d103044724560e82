#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use sqlx::SqlitePool;
use std::sync::Arc;
use linkvault::application::services::{AuthService, LinkService, RedirectService};
use linkvault::domain::reserved_codes::ReservedCodes;
use linkvault::infrastructure::persistence::SqliteLinkRepository;
use linkvault::routes::app_router;
use linkvault::state::AppState;
use linkvault::utils::code_generator::CodeAllocation;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_BASE_URL: &str = "http://sho.rt";

pub async fn create_test_link(pool: &SqlitePool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO links (short_code, original_url) VALUES (?1, ?2) RETURNING id")
        .bind(code)
        .bind(url)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn click_count(pool: &SqlitePool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT click_count FROM links WHERE short_code = ?1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    create_test_state_with(pool, CodeAllocation::default())
}

pub fn create_test_state_with(pool: SqlitePool, allocation: CodeAllocation) -> AppState {
    let link_repo = Arc::new(SqliteLinkRepository::new(Arc::new(pool)));

    let reserved = ReservedCodes::from_routes(Vec::<String>::new());

    let link_service = Arc::new(
        LinkService::new(link_repo.clone(), allocation).with_reserved_codes(reserved.clone()),
    );
    let redirect_service = Arc::new(RedirectService::new(link_repo, reserved));
    let auth_service = Arc::new(AuthService::new(TEST_API_KEY));

    AppState::new(link_service, redirect_service, auth_service, TEST_BASE_URL)
}

/// Full application router, as served in production minus path normalization.
pub fn create_test_app(pool: SqlitePool) -> Router {
    app_router(create_test_state(pool), &[])
}

pub fn create_test_server(pool: SqlitePool) -> TestServer {
    TestServer::new(create_test_app(pool)).unwrap()
}
