//! 监控与健康检查处理器

use axum::{extract::State, response::Html, Json};

use super::dashboard::render_dashboard;
use crate::{app::AppState, core::response::HealthResponse};

/// 最近请求监控页面
pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    Html(render_dashboard(&state.recorder.snapshot()))
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
