use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

// 模块声明
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod shared;
pub mod vos;
// 类型导入
use crate::{
    db::PayrollStore,
    handlers::{auth, department, employee, salary},
    services::{AuthService, DepartmentService, EmployeeService, PayrollService, ReportService},
    shared::{
        auth_middleware,
        jwt::TokenService,
        setting::{CorsConfig, JwtConfig},
    },
};

/// 所有服务共用同一个存储实例，由调用方注入
#[derive(Clone, FromRef)]
pub struct AppState {
    pub auth_service: AuthService,
    pub department_service: DepartmentService,
    pub employee_service: EmployeeService,
    pub payroll_service: PayrollService,
    pub report_service: ReportService,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(store: Arc<dyn PayrollStore>, jwt: &JwtConfig) -> Self {
        let tokens = TokenService::new(jwt);
        AppState {
            auth_service: AuthService::new(store.clone(), tokens.clone()),
            department_service: DepartmentService::new(store.clone()),
            employee_service: EmployeeService::new(store.clone()),
            payroll_service: PayrollService::new(store.clone()),
            report_service: ReportService::new(store),
            tokens,
        }
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// 创建应用路由
pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    // 需要认证的路由组
    let protected = Router::new()
        .route(
            "/account",
            get(auth::get_user_data).delete(auth::delete_account),
        )
        .route(
            "/department",
            get(department::list_departments).post(department::create_department),
        )
        .route(
            "/department/{department_code}",
            put(department::update_department).delete(department::delete_department),
        )
        .route(
            "/employee",
            get(employee::list_employees).post(employee::create_employee),
        )
        .route(
            "/employee/{employee_number}",
            put(employee::update_employee).delete(employee::delete_employee),
        )
        .route(
            "/salary",
            get(salary::list_salaries).post(salary::create_salary),
        )
        .route(
            "/salary/{id}",
            get(salary::list_salaries_for_employee).delete(salary::delete_salary),
        )
        .route("/report", get(salary::salary_report))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::auth_middleware,
        ));

    Router::new()
        // API 路由组
        .nest(
            "/api",
            Router::new()
                .route("/signup", post(auth::signup))
                .route("/login", post(auth::login))
                .merge(protected),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .with_state(state)
}
