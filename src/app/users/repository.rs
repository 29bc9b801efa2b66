//! 用户持久化
//!
//! 所有 SQL 都使用占位符绑定参数。唯一约束冲突在 `AppError::from(sqlx::Error)`
//! 中被识别为 `Duplicate`。

use async_trait::async_trait;
use sqlx::mysql::MySqlPool;

use super::model::{User, UserInput};
use crate::core::error::AppError;

// id 与 age 统一按 BIGINT 读取，与列的具体整数类型无关
const LIST_USERS: &str = "SELECT CAST(id AS SIGNED) AS id, name, email, CAST(age AS SIGNED) AS age \
     FROM users ORDER BY id LIMIT ? OFFSET ?";

const GET_USER: &str = "SELECT CAST(id AS SIGNED) AS id, name, email, CAST(age AS SIGNED) AS age \
     FROM users WHERE id = ?";

/// 用户表的访问接口
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 插入一行并返回生成的 id
    async fn create(&self, input: &UserInput) -> Result<u64, AppError>;

    async fn list_page(&self, limit: u64, offset: u64) -> Result<Vec<User>, AppError>;

    async fn count(&self) -> Result<u64, AppError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// 返回受影响的行数
    async fn update(&self, id: i64, input: &UserInput) -> Result<u64, AppError>;

    /// 返回受影响的行数
    async fn delete_by_id(&self, id: i64) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, input: &UserInput) -> Result<u64, AppError> {
        let result = sqlx::query("INSERT INTO users (name, email, age) VALUES (?, ?, ?)")
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.age)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_id())
    }

    async fn list_page(&self, limit: u64, offset: u64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(LIST_USERS)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn count(&self) -> Result<u64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(GET_USER)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update(&self, id: i64, input: &UserInput) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE users SET name = ?, email = ?, age = ? WHERE id = ?")
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.age)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
