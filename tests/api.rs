//! 通过路由驱动整个应用，存储用内存实现

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use payroll_management_backend::{
    AppState, create_router,
    db::memory::MemoryStore,
    shared::setting::{CorsConfig, JwtConfig},
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let jwt = JwtConfig {
        jwt_secret: b"integration-secret".to_vec(),
        expiration_hours: 1,
    };
    let cors = CorsConfig {
        allowed_origins: vec![],
    };
    create_router(AppState::new(Arc::new(MemoryStore::new()), &jwt), &cors)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// 注册并登录，返回令牌
async fn register(app: &Router, username: &str) -> String {
    let (status, _) = call(
        app,
        Method::POST,
        "/api/signup",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": username, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create_department(app: &Router, token: &str, code: &str, gross: f64) -> StatusCode {
    let (status, _) = call(
        app,
        Method::POST,
        "/api/department",
        Some(token),
        Some(json!({
            "departmentCode": code,
            "departmentName": format!("{} department", code),
            "grossSalary": gross,
        })),
    )
    .await;
    status
}

async fn create_employee(app: &Router, token: &str, first_name: &str, code: &str) -> i64 {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/employee",
        Some(token),
        Some(json!({
            "firstName": first_name,
            "lastName": "Doe",
            "gender": "female",
            "position": "Engineer",
            "departmentCode": code,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["employeeNumber"].as_i64().unwrap()
}

async fn create_salary(
    app: &Router,
    token: &str,
    employee_number: i64,
    month: &str,
    deductions: f64,
) -> (StatusCode, Value) {
    call(
        app,
        Method::POST,
        "/api/salary",
        Some(token),
        Some(json!({
            "employeeNumber": employee_number,
            "month": month,
            "deductions": deductions,
        })),
    )
    .await
}

fn amount(value: &Value) -> f64 {
    value.as_f64().unwrap()
}

#[tokio::test]
async fn signup_login_and_account_lookup() {
    let app = app();
    let token = register(&app, "jane").await;

    let (status, body) = call(&app, Method::GET, "/api/account", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["username"], "jane");
    assert!(body["data"].get("passwordHash").is_none());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "jane", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = app();
    register(&app, "jane").await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/signup",
        None,
        Some(json!({
            "username": "jane",
            "email": "someone-else@example.com",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/employee", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"], Value::Null);

    let (status, _) = call(&app, Method::GET, "/api/employee", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_payloads_are_bad_requests() {
    let app = app();
    let token = register(&app, "jane").await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/department",
        Some(&token),
        Some(json!({ "departmentCode": "IT", "departmentName": "IT", "grossSalary": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/department",
        Some(&token),
        Some(json!({ "departmentName": "IT", "grossSalary": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(create_department(&app, &token, "IT", 5000.0).await, StatusCode::CREATED);
    let employee = create_employee(&app, &token, "Jane", "IT").await;
    let (status, _) = create_salary(&app, &token, employee, "2024-13", 0.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn salary_is_computed_from_department_gross() {
    let app = app();
    let token = register(&app, "jane").await;
    assert_eq!(create_department(&app, &token, "IT", 5000.0).await, StatusCode::CREATED);
    let employee = create_employee(&app, &token, "Jane", "IT").await;

    let (status, body) = create_salary(&app, &token, employee, "2024-06", 500.0).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(amount(&body["data"]["grossSalary"]), 5000.0);
    assert_eq!(amount(&body["data"]["deductions"]), 500.0);
    assert_eq!(amount(&body["data"]["netSalary"]), 4500.0);
}

#[tokio::test]
async fn second_salary_for_the_same_month_conflicts() {
    let app = app();
    let token = register(&app, "jane").await;
    create_department(&app, &token, "IT", 5000.0).await;
    let employee = create_employee(&app, &token, "Jane", "IT").await;

    let (status, _) = create_salary(&app, &token, employee, "2024-06", 500.0).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = create_salary(&app, &token, employee, "2024-06", 100.0).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (_, body) = call(&app, Method::GET, "/api/salary", Some(&token), None).await;
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(amount(&records[0]["deductions"]), 500.0);
}

#[tokio::test]
async fn other_accounts_cannot_see_or_touch_rows() {
    let app = app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;
    create_department(&app, &alice, "IT", 5000.0).await;
    let employee = create_employee(&app, &alice, "Jane", "IT").await;

    let (status, body) = call(&app, Method::GET, "/api/department", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = create_salary(&app, &bob, employee, "2024-06", 0.0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/employee/{}", employee),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 部门编号全局唯一，别人的编号也占用
    assert_eq!(create_department(&app, &bob, "IT", 1.0).await, StatusCode::CONFLICT);
}

#[tokio::test]
async fn department_update_does_not_rewrite_history() {
    let app = app();
    let token = register(&app, "jane").await;
    create_department(&app, &token, "IT", 5000.0).await;
    let employee = create_employee(&app, &token, "Jane", "IT").await;
    create_salary(&app, &token, employee, "2024-06", 0.0).await;

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/department/IT",
        Some(&token),
        Some(json!({ "departmentName": "IT", "grossSalary": "6000.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = create_salary(&app, &token, employee, "2024-07", 0.0).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = call(
        &app,
        Method::GET,
        &format!("/api/salary/{}", employee),
        Some(&token),
        None,
    )
    .await;
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["month"], "2024-07");
    assert_eq!(amount(&records[0]["grossSalary"]), 6000.0);
    assert_eq!(records[1]["month"], "2024-06");
    assert_eq!(amount(&records[1]["grossSalary"]), 5000.0);
}

#[tokio::test]
async fn report_filters_and_totals() {
    let app = app();
    let token = register(&app, "jane").await;
    create_department(&app, &token, "IT", 5000.0).await;
    create_department(&app, &token, "HR", 3000.0).await;
    let alice = create_employee(&app, &token, "Alice", "IT").await;
    let bob = create_employee(&app, &token, "Bob", "HR").await;
    create_salary(&app, &token, alice, "2024-05", 500.0).await;
    create_salary(&app, &token, alice, "2024-06", 250.0).await;
    create_salary(&app, &token, bob, "2024-06", 0.0).await;

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/report?month=2024-06",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let totals = &body["data"]["totals"];
    assert_eq!(amount(&totals["totalGross"]), 8000.0);
    assert_eq!(amount(&totals["totalDeductions"]), 250.0);
    assert_eq!(amount(&totals["totalNet"]), 7750.0);
    assert_eq!(totals["count"], 2);
    assert!(body["data"]["records"][0]["firstName"].is_string());

    let (_, body) = call(
        &app,
        Method::GET,
        "/api/salary?departmentCode=HR",
        Some(&token),
        None,
    )
    .await;
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["employeeNumber"].as_i64(), Some(bob));

    let (status, _) = call(
        &app,
        Method::GET,
        "/api/salary?employeeNumber=abc",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn referenced_department_cannot_be_deleted() {
    let app = app();
    let token = register(&app, "jane").await;
    create_department(&app, &token, "IT", 5000.0).await;
    let employee = create_employee(&app, &token, "Jane", "IT").await;

    let (status, _) = call(&app, Method::DELETE, "/api/department/IT", Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/employee/{}", employee),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, "/api/department/IT", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleting_the_account_removes_owned_rows() {
    let app = app();
    let token = register(&app, "jane").await;
    create_department(&app, &token, "IT", 5000.0).await;
    let employee = create_employee(&app, &token, "Jane", "IT").await;
    create_salary(&app, &token, employee, "2024-06", 0.0).await;

    let (status, _) = call(&app, Method::DELETE, "/api/account", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    // 令牌还没过期，但账户已经不在了
    let (status, _) = call(&app, Method::GET, "/api/account", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 编号被释放，新账户可以重新使用
    let other = register(&app, "john").await;
    assert_eq!(create_department(&app, &other, "IT", 1.0).await, StatusCode::CREATED);
}

#[tokio::test]
async fn usernames_are_measured_after_trimming() {
    let app = app();
    for username in ["   ", "  ab "] {
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/signup",
            None,
            Some(json!({
                "username": username,
                "email": "jane@example.com",
                "password": "password123",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{:?}", username);
        assert_eq!(body["code"], 400);
    }
}

#[tokio::test]
async fn token_of_a_deleted_account_cannot_write() {
    let app = app();
    let token = register(&app, "jane").await;
    let (status, _) = call(&app, Method::DELETE, "/api/account", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(create_department(&app, &token, "IT", 5000.0).await, StatusCode::UNAUTHORIZED);
    let (_, body) = call(&app, Method::GET, "/api/department", Some(&token), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_path_parameters_use_the_envelope() {
    let app = app();
    let token = register(&app, "jane").await;
    let (status, body) = call(&app, Method::DELETE, "/api/salary/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert_eq!(body["data"], Value::Null);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn missing_and_invalid_tokens_read_differently() {
    let app = app();
    let (_, missing) = call(&app, Method::GET, "/api/account", None, None).await;
    let (_, invalid) = call(&app, Method::GET, "/api/account", Some("garbage"), None).await;
    assert_eq!(missing["code"], 401);
    assert_eq!(invalid["code"], 401);
    assert_ne!(missing["message"], invalid["message"]);
}
