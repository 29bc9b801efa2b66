//! 路由与共享状态

pub mod monitor;
pub mod users;

use axum::{middleware, routing::get, Router};
use std::{path::Path, sync::Arc};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

use crate::core::{
    middleware::{expose_error_details, handle_panic, rate_limit, record_request, security_headers},
    rate_limit::RateLimiter,
};
use monitor::RequestRecorder;
use users::{UserRepository, UserService};

/// 注入到所有处理器和中间件的应用状态
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub recorder: RequestRecorder,
    pub rate_limiter: Arc<RateLimiter>,
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        rate_limiter: RateLimiter,
        expose_error_details: bool,
    ) -> Self {
        Self {
            users: UserService::new(repository),
            recorder: RequestRecorder::new(),
            rate_limiter: Arc::new(rate_limiter),
            expose_error_details,
        }
    }
}

/// 创建路由；未匹配的路径交给 `public_dir` 下的静态文件
pub fn build_router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        // 监控与健康检查
        .route("/", get(monitor::handler::dashboard))
        .route("/health", get(monitor::handler::health_check))
        // 用户 CRUD 操作
        .route(
            "/users",
            get(users::handler::list_users).post(users::handler::create_user),
        )
        .route(
            "/users/:id",
            get(users::handler::get_user)
                .put(users::handler::update_user)
                .delete(users::handler::delete_user),
        )
        .fallback_service(ServeDir::new(public_dir))
        // 中间件层，后添加的在外层
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            expose_error_details,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
