//! 用户 CRUD 处理器

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::Json,
};

use super::{
    model::{PageRequest, User, UserPage},
    validation::UserPayload,
};
use crate::{
    app::AppState,
    core::{
        error::AppError,
        response::{CreatedResponse, MessageResponse},
    },
};

/// 只接受完整的整数 id，`1abc` 这类带数字前缀的值同样按不存在处理
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| AppError::NotFound)
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: UserPayload,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let input = payload.into_input().map_err(AppError::Validation)?;
    let user_id = state.users.create_user(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "User created successfully".to_string(),
            user_id,
        }),
    ))
}

pub async fn list_users(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<UserPage>, AppError> {
    let request = PageRequest::from_query(query.as_deref());
    Ok(Json(state.users.list_users(request).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(state.users.get_user(id).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: UserPayload,
) -> Result<Json<MessageResponse>, AppError> {
    let input = payload.into_input().map_err(AppError::Validation)?;
    let id = parse_id(&id)?;
    state.users.update_user(id, &input).await?;

    Ok(Json(MessageResponse::new("User updated successfully")))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    state.users.delete_user(id).await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
