//! 用户业务服务

use std::sync::Arc;
use tracing::info;

use super::{
    model::{PageRequest, Pagination, User, UserInput, UserPage},
    repository::UserRepository,
};
use crate::core::error::AppError;

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, input: &UserInput) -> Result<u64, AppError> {
        let id = self.repository.create(input).await?;
        info!(user_id = id, "Created user");
        Ok(id)
    }

    pub async fn list_users(&self, request: PageRequest) -> Result<UserPage, AppError> {
        let users = self
            .repository
            .list_page(request.limit, request.offset())
            .await?;
        let total = self.repository.count().await?;

        Ok(UserPage {
            users,
            pagination: Pagination::new(request, total),
        })
    }

    pub async fn get_user(&self, id: i64) -> Result<User, AppError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// 是否存在只由受影响行数判断，不预先查询
    pub async fn update_user(&self, id: i64, input: &UserInput) -> Result<(), AppError> {
        if self.repository.update(id, input).await? == 0 {
            return Err(AppError::NotFound);
        }
        info!(user_id = id, "Updated user");
        Ok(())
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        if self.repository.delete_by_id(id).await? == 0 {
            return Err(AppError::NotFound);
        }
        info!(user_id = id, "Deleted user");
        Ok(())
    }
}
