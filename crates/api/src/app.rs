use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::Notifier;
use shared::jwt::{JwtConfig, JwtError};
use shared::pagination::PageRequest;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    auth_rate_limit, metrics_handler, metrics_middleware, require_admin, require_auth,
    require_employee, require_password_current, security_headers_middleware, trace_id,
    RateLimiterState,
};
use crate::routes::{
    admin_dashboard, auth, employee_dashboard, employees, health, leave_requests, notifications,
    profile, salaries, schedules,
};
use crate::services::{AuthService, LeaveWorkflow};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Arc<RateLimiterState>,
    pub notifier: Arc<dyn Notifier>,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(
        config: Config,
        pool: PgPool,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, JwtError> {
        let jwt = Arc::new(JwtConfig::new(
            &config.jwt.secret,
            config.jwt.token_expiry_secs,
            config.jwt.leeway_secs,
        )?);

        let rate_limiter = Arc::new(
            RateLimiterState::new(config.security.auth_rate_limit_per_minute)
                .with_trusted_proxies(config.security.trusted_proxies.clone()),
        );

        Ok(Self {
            auth: AuthService::new(pool.clone(), jwt),
            pool,
            config: Arc::new(config),
            rate_limiter,
            notifier,
        })
    }

    /// Resolves `page`/`per_page` against the configured defaults.
    pub fn page(&self, page: Option<i64>, per_page: Option<i64>) -> PageRequest {
        PageRequest::new(
            page,
            per_page,
            self.config.pagination.default_per_page,
            self.config.pagination.max_per_page,
        )
    }

    pub fn leave_workflow(&self) -> LeaveWorkflow {
        LeaveWorkflow::new(self.pool.clone(), self.notifier.clone())
    }
}

pub fn create_app_with_notifier(
    config: Config,
    pool: PgPool,
    notifier: Arc<dyn Notifier>,
) -> Result<Router, JwtError> {
    Ok(build_router(AppState::new(config, pool, notifier)?))
}

pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Login and registration, throttled per client
    let auth_routes = Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/register", post(auth::register))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_rate_limit,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Reachable while a password reset is pending
    let account_routes = Router::new()
        .route("/api/user", get(auth::me))
        .route("/api/logout", post(auth::logout))
        .route("/api/profile", get(profile::show))
        .route("/api/profile/change-password", post(profile::change_password));

    let member_routes = Router::new()
        .route("/api/profile", axum::routing::put(profile::update))
        .route("/api/schedules", get(schedules::list))
        .route("/api/schedules/today", get(schedules::today))
        .route("/api/schedules/upcoming", get(schedules::upcoming))
        .route("/api/schedules/:id", get(schedules::show))
        .route("/api/notifications", get(notifications::list))
        .route(
            "/api/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route("/api/notifications/recent", get(notifications::recent))
        .route(
            "/api/notifications/mark-all-as-read",
            post(notifications::mark_all_as_read),
        )
        .route(
            "/api/notifications/:id/mark-as-read",
            post(notifications::mark_as_read),
        )
        .route_layer(middleware::from_fn(require_password_current));

    let admin_routes = Router::new()
        .route(
            "/api/employees",
            get(employees::list).post(employees::create),
        )
        .route(
            "/api/employees/:id",
            get(employees::show)
                .put(employees::update)
                .delete(employees::destroy),
        )
        .route("/api/leave-requests", get(leave_requests::list))
        .route(
            "/api/leave-requests/:id",
            axum::routing::delete(leave_requests::destroy),
        )
        .route(
            "/api/leave-requests/:id/status",
            post(leave_requests::update_status),
        )
        .route("/api/salaries", get(salaries::list).post(salaries::create))
        .route(
            "/api/salaries/:id",
            axum::routing::put(salaries::update).delete(salaries::destroy),
        )
        .route("/api/schedules", post(schedules::create))
        .route(
            "/api/schedules/:id",
            axum::routing::put(schedules::update).delete(schedules::destroy),
        )
        .route("/api/admin/dashboard/stats", get(admin_dashboard::stats))
        .route(
            "/api/admin/dashboard/recent-employees",
            get(admin_dashboard::recent_employees),
        )
        .route(
            "/api/admin/dashboard/pending-leaves",
            get(admin_dashboard::pending_leaves),
        )
        .route(
            "/api/admin/dashboard/employee-stats",
            get(admin_dashboard::employee_stats),
        )
        // Password gate runs after the role gate
        .route_layer(middleware::from_fn(require_password_current))
        .route_layer(middleware::from_fn(require_admin));

    let employee_routes = Router::new()
        .route(
            "/api/my-leaves",
            get(leave_requests::my_leaves).post(leave_requests::submit),
        )
        .route("/api/my-salaries", get(salaries::my_salaries))
        .route(
            "/api/employee/dashboard/stats",
            get(employee_dashboard::stats),
        )
        .route(
            "/api/employee/dashboard/my-leaves",
            get(employee_dashboard::my_leaves),
        )
        .route(
            "/api/employee/dashboard/leave-stats",
            get(employee_dashboard::leave_stats),
        )
        .route_layer(middleware::from_fn(require_password_current))
        .route_layer(middleware::from_fn(require_employee));

    // Auth is the outermost layer so every gate above sees the caller
    let protected_routes = Router::new()
        .merge(account_routes)
        .merge(member_routes)
        .merge(admin_routes)
        .merge(employee_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
