//! 数据库基础设施

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::info;

use super::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: MySqlPool,
}

impl DatabaseManager {
    /// 创建连接池，连接在第一次查询时才建立
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            max_connections = config.pool_size,
            "Database pool configured"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.pool_size)
            .connect_lazy_with(options);

        Self { pool }
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// 等待借出的连接归还后关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
