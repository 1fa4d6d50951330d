//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use spendwise_core::db::Database;
use spendwise_core::models::Account;
use spendwise_core::period::YearMonth;
use spendwise_core::test_utils::{add_expense, create_account, TEST_PASSWORD};
use tower::ServiceExt;

const TEST_SECRET: &str = "test-session-secret-with-enough-bytes";

fn test_config() -> ServerConfig {
    ServerConfig::new(TEST_SECRET)
}

fn setup_test_app() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let app = create_router(db.clone(), None, test_config());
    (app, db)
}

/// Create an account and a valid session token for it
fn login_as(db: &Database, email: &str, salary: f64, savings: f64) -> (Account, String) {
    let account = create_account(db, email, salary, savings, Utc::now());
    let token = session::issue_token(&test_config(), &account).unwrap();
    (account, token)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

// ========== Auth API Tests ==========

#[tokio::test]
async fn test_health_needs_no_auth() {
    let (app, _db) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let (app, _db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.oneshot(get("/api/me", "garbage")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let (app, db) = setup_test_app();
    let account = create_account(&db, "x@example.com", 0.0, 0.0, Utc::now());
    let forged =
        session::issue_token(&ServerConfig::new("some-other-secret-value-entirely!!"), &account)
            .unwrap();

    let response = app.oneshot(get("/api/me", &forged)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_then_me() {
    let (app, _db) = setup_test_app();

    let body = serde_json::json!({
        "username": "newbie",
        "email": "newbie@example.com",
        "password": "secret1",
        "confirm_password": "secret1"
    });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/auth/register", None, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    assert_eq!(json["account"]["email"], "newbie@example.com");
    assert_eq!(json["account"]["monthly_salary"], 0.0);
    assert!(json["account"].get("password_hash").is_none());
    let token = json["token"].as_str().unwrap().to_string();

    let response = app.oneshot(get("/api/me", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me = get_body_json(response).await;
    assert_eq!(me["username"], "newbie");
}

#[tokio::test]
async fn test_register_validation_and_duplicates() {
    let (app, db) = setup_test_app();
    create_account(&db, "taken@example.com", 0.0, 0.0, Utc::now());

    let mismatch = serde_json::json!({
        "username": "a",
        "email": "a@example.com",
        "password": "secret1",
        "confirm_password": "secret2"
    });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/auth/register", None, mismatch))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_body_json(response).await["error"], "Passwords do not match");

    let short = serde_json::json!({
        "username": "a",
        "email": "a@example.com",
        "password": "abc",
        "confirm_password": "abc"
    });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/auth/register", None, short))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let missing = serde_json::json!({ "email": "a@example.com" });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/auth/register", None, missing))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_body_json(response).await["error"], "Please fill in all fields");

    let duplicate = serde_json::json!({
        "username": "again",
        "email": "taken@example.com",
        "password": "secret1",
        "confirm_password": "secret1"
    });
    let response = app
        .oneshot(send_json("POST", "/api/auth/register", None, duplicate))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(get_body_json(response).await["error"], "Email already registered");
}

#[tokio::test]
async fn test_login() {
    let (app, db) = setup_test_app();
    create_account(&db, "login@example.com", 0.0, 0.0, Utc::now());

    let ok = serde_json::json!({ "email": "login@example.com", "password": TEST_PASSWORD });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/auth/login", None, ok))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));

    for (email, password) in [
        ("login@example.com", "wrong-password"),
        ("nobody@example.com", TEST_PASSWORD),
    ] {
        let bad = serde_json::json!({ "email": email, "password": password });
        let response = app
            .clone()
            .oneshot(send_json("POST", "/api/auth/login", None, bad))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_body_json(response).await["error"],
            "Invalid email or password"
        );
    }
}

#[tokio::test]
async fn test_out_of_range_session_lifetime_fails_cleanly() {
    let db = Database::in_memory().unwrap();
    let mut config = test_config();
    config.session_ttl_hours = 9_000_000_000_000_000;
    let app = create_router(db.clone(), None, config.clone());

    let body = serde_json::json!({
        "username": "ttl",
        "email": "ttl@example.com",
        "password": "secret1",
        "confirm_password": "secret1"
    });
    let response = app
        .oneshot(send_json("POST", "/api/auth/register", None, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let err = serve_with_config(db, "127.0.0.1", 0, None, config)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Session lifetime"));
}

#[tokio::test]
async fn test_logout_is_audited() {
    let (app, db) = setup_test_app();
    let (account, token) = login_as(&db, "bye@example.com", 0.0, 0.0);

    let response = app
        .oneshot(send_json("POST", "/api/auth/logout", Some(&token), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["success"], true);

    let entries = db.list_audit_log(&account.email, 10).unwrap();
    assert_eq!(entries[0].action, "logout");
}

// ========== Account API Tests ==========

#[tokio::test]
async fn test_update_finances() {
    let (app, db) = setup_test_app();
    let (account, token) = login_as(&db, "money@example.com", 0.0, 0.0);

    let body = serde_json::json!({ "monthly_salary": "6000", "current_savings": 1500.5 });
    let response = app
        .clone()
        .oneshot(send_json("PUT", "/api/account/finances", Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["monthly_salary"], 6000.0);
    assert_eq!(json["current_savings"], 1500.5);

    let negative = serde_json::json!({ "monthly_salary": -1, "current_savings": 0 });
    let response = app
        .oneshot(send_json("PUT", "/api/account/finances", Some(&token), negative))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_body_json(response).await["error"], "Salary cannot be negative");

    let stored = db.get_account(account.id).unwrap().unwrap();
    assert_eq!(stored.monthly_salary, 6000.0);
}

// ========== Expense API Tests ==========

#[tokio::test]
async fn test_create_and_list_expenses() {
    let (app, db) = setup_test_app();
    let (_account, token) = login_as(&db, "spend@example.com", 0.0, 0.0);

    let body = serde_json::json!({
        "amount": "12.50",
        "category": "Food",
        "description": "Lunch"
    });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/api/expenses", Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = get_body_json(response).await;
    assert_eq!(created["amount"], 12.5);
    // Missing date defaults to today
    assert_eq!(created["date"], today().to_string());

    let current = YearMonth::of(&today());
    let uri = format!("/api/expenses?year={}&month={}", current.year, current.month);
    let response = app.clone().oneshot(get(&uri, &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["total"], 12.5);
    assert_eq!(json["expenses"].as_array().unwrap().len(), 1);

    let response = app.oneshot(get("/api/expenses", &token)).await.unwrap();
    let json = get_body_json(response).await;
    assert!(json["period"].is_null());
    assert_eq!(json["expenses"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_expense_rejects_bad_input() {
    let (app, db) = setup_test_app();
    let (account, token) = login_as(&db, "bad@example.com", 0.0, 0.0);
    let tomorrow = today() + Duration::days(1);

    let cases = [
        (serde_json::json!({ "amount": 0, "category": "Food" }), "Amount must be greater than 0"),
        (serde_json::json!({ "amount": "abc", "category": "Food" }), "Invalid amount entered"),
        (
            serde_json::json!({ "amount": 5, "category": "Food", "date": tomorrow.to_string() }),
            "Cannot add future expenses",
        ),
        (
            serde_json::json!({ "amount": 5, "category": "Food", "date": "31/01/2024" }),
            "Invalid amount or date format",
        ),
    ];

    for (body, message) in cases {
        let response = app
            .clone()
            .oneshot(send_json("POST", "/api/expenses", Some(&token), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get_body_json(response).await["error"], message);
    }

    // No partial state change
    assert!(db.list_expenses(account.id).unwrap().is_empty());
}

#[tokio::test]
async fn test_list_expenses_invalid_month() {
    let (app, db) = setup_test_app();
    let (_account, token) = login_as(&db, "months@example.com", 0.0, 0.0);

    let response = app
        .oneshot(get("/api/expenses?year=2024&month=13", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_categories() {
    let (app, db) = setup_test_app();
    let (_account, token) = login_as(&db, "cats@example.com", 0.0, 0.0);

    let response = app
        .clone()
        .oneshot(get("/api/categories", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let categories: Vec<&str> = json["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert_eq!(
        categories,
        vec!["Food", "Transportation", "Entertainment", "Shopping", "Bills", "Other"]
    );

    // Suggestions only: any other category is still accepted
    let body = serde_json::json!({ "amount": 3, "category": "Pets" });
    let response = app
        .oneshot(send_json("POST", "/api/expenses", Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_out_of_range_year_is_bad_request() {
    let (app, db) = setup_test_app();
    let (_account, token) = login_as(&db, "years@example.com", 6000.0, 0.0);

    for uri in [
        "/api/expenses?year=2147483647&month=12",
        "/api/expenses?year=-2147483648&month=1",
        "/api/dashboard?year=2147483647&month=12",
        "/api/insights?year=2147483647&month=12&generate=true",
    ] {
        let response = app.clone().oneshot(get(uri, &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(
            get_body_json(response).await["error"],
            "Year must be between 1 and 9999"
        );
    }

    let body = serde_json::json!({ "year": 2147483647, "month": 12 });
    let response = app
        .oneshot(send_json("POST", "/api/insights/generate", Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_expense() {
    let (app, db) = setup_test_app();
    let (account, token) = login_as(&db, "edit@example.com", 0.0, 0.0);
    let expense = add_expense(&db, account.id, 20.0, "Food", today());

    let uri = format!("/api/expenses/{}", expense.id);
    let yesterday = today() - Duration::days(1);
    let body = serde_json::json!({
        "amount": "35.00",
        "category": "Shopping",
        "description": "Shoes",
        "date": yesterday.to_string()
    });
    let response = app
        .clone()
        .oneshot(send_json("PUT", &uri, Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["amount"], 35.0);
    assert_eq!(json["category"], "Shopping");
    assert_eq!(json["date"], yesterday.to_string());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get(&uri, &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_accounts_expense_is_not_found() {
    let (app, db) = setup_test_app();
    let (owner, _owner_token) = login_as(&db, "owner@example.com", 0.0, 0.0);
    let (_intruder, token) = login_as(&db, "intruder@example.com", 0.0, 0.0);
    let expense = add_expense(&db, owner.id, 20.0, "Food", today());
    let uri = format!("/api/expenses/{}", expense.id);

    let response = app.clone().oneshot(get(&uri, &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = serde_json::json!({ "amount": 1, "category": "Food" });
    let response = app
        .clone()
        .oneshot(send_json("PUT", &uri, Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Untouched
    let stored = db.get_expense(owner.id, expense.id).unwrap().unwrap();
    assert_eq!(stored.amount, 20.0);
}

#[tokio::test]
async fn test_export_csv() {
    let (app, db) = setup_test_app();
    let (account, token) = login_as(&db, "csv@example.com", 0.0, 0.0);
    add_expense(&db, account.id, 9.99, "Food", today());

    let response = app
        .oneshot(get("/api/expenses/export", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/csv; charset=utf-8"
    );

    let text = get_body_text(response).await;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,category,description,amount");
    assert_eq!(lines[1], format!("{},Food,Food expense,9.99", today()));
}

// ========== Dashboard & Insight API Tests ==========

#[tokio::test]
async fn test_dashboard_applies_rollover() {
    let (app, db) = setup_test_app();
    let previous = YearMonth::of(&today()).previous();

    // Last rollover happened two months ago
    let last_update = previous
        .previous()
        .first_day()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc();
    let account = create_account(&db, "dash@example.com", 3000.0, 1000.0, last_update);
    add_expense(&db, account.id, 1000.0, "Bills", previous.first_day());
    let token = session::issue_token(&test_config(), &account).unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/dashboard", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["current_savings"], 3000.0);
    assert_eq!(json["months"].as_array().unwrap().len(), 12);
    assert_eq!(json["years"].as_array().unwrap().len(), 3);

    // Second visit in the same month does not roll over again
    let response = app.oneshot(get("/api/dashboard", &token)).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["current_savings"], 3000.0);

    let stored = db.get_account(account.id).unwrap().unwrap();
    assert_eq!(stored.current_savings, 3000.0);
}

#[tokio::test]
async fn test_dashboard_for_past_month() {
    let (app, db) = setup_test_app();
    let (account, token) = login_as(&db, "past@example.com", 6000.0, 0.0);
    add_expense(&db, account.id, 2000.0, "Bills", NaiveDate::from_ymd_opt(2023, 3, 4).unwrap());

    let response = app
        .oneshot(get("/api/dashboard?year=2023&month=3", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["month_name"], "March");
    assert_eq!(json["total_expenses"], 2000.0);
    let insights = json["insights"].as_str().unwrap();
    assert!(insights.contains("🎯 Great job! You're on track to save $4000.00 this month."));
    assert!(insights.contains("📊 Your highest spending category in March is Bills ($2000.00)."));
}

#[tokio::test]
async fn test_insights_empty_month_shows_onboarding() {
    let (app, db) = setup_test_app();
    let (_account, token) = login_as(&db, "empty@example.com", 6000.0, 0.0);

    let response = app
        .oneshot(get("/api/insights?year=2022&month=1&generate=true", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(
        json["report"],
        "Start tracking your expenses to receive AI-powered insights!"
    );
    assert!(json["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_insights_generate_flag() {
    let (app, db) = setup_test_app();
    let (account, token) = login_as(&db, "flag@example.com", 6000.0, 0.0);
    for day in 1..=6 {
        add_expense(&db, account.id, 5.0, "Food", NaiveDate::from_ymd_opt(2023, 5, day).unwrap());
    }

    let response = app
        .clone()
        .oneshot(get("/api/insights?year=2023&month=5", &token))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["report"], "");

    let body = serde_json::json!({ "year": 2023, "month": 5 });
    let response = app
        .oneshot(send_json("POST", "/api/insights/generate", Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let report = json["report"].as_str().unwrap();
    assert!(report.contains("🔍 You had 6 small expenses (<$10) totaling $30.00."));
    assert!(json["lines"]
        .as_array()
        .unwrap()
        .iter()
        .any(|l| l["kind"] == "small_expenses"));
}

// ========== Audit & Security Tests ==========

#[tokio::test]
async fn test_audit_log_lists_own_entries() {
    let (app, db) = setup_test_app();
    let (_account, token) = login_as(&db, "audit@example.com", 0.0, 0.0);
    db.log_audit("someone-else@example.com", "login", None, None, None)
        .unwrap();

    app.clone()
        .oneshot(get("/api/expenses", &token))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/audit?limit=10", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "list");
    assert_eq!(entries[0]["user_email"], "audit@example.com");
}

#[tokio::test]
async fn test_security_headers() {
    let (app, _db) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
}

#[tokio::test]
async fn test_internal_errors_are_sanitized() {
    let err: AppError = spendwise_core::Error::Encryption("secret detail".to_string()).into();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = err.into_response();
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "An internal error occurred");
}
