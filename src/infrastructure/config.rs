//! 配置基础设施
//!
//! 所有配置项都来自环境变量（启动时会先尝试加载 `.env` 文件）。

use std::{fmt, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

/// 配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for environment variable {key}")]
    Invalid { key: &'static str, value: String },
}

/// 运行环境，只有 development 会把内部错误信息返回给客户端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: Option<String>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("development") => {
                Environment::Development
            }
            _ => Environment::Production,
        }
    }
}

/// 数据库连接配置
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub pool_size: u32,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

/// 限流配置：固定窗口内每个客户端地址允许的请求数
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(15 * 60),
            max_requests: 100,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database: DatabaseConfig,
    pub environment: Environment,
    pub rate_limit: RateLimitConfig,
    pub public_dir: PathBuf,
}

impl AppConfig {
    /// 从进程环境变量读取配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig {
            host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(&lookup, "DB_PORT", 3306)?,
            user: lookup("DB_USER").unwrap_or_else(|| "root".to_string()),
            password: lookup("DB_PASSWORD").ok_or(ConfigError::Missing("DB_PASSWORD"))?,
            name: lookup("DB_NAME").unwrap_or_else(|| "ebilly".to_string()),
            pool_size: parse_or(&lookup, "DB_POOL_SIZE", 10)?,
        };

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            window: Duration::from_secs(parse_or(
                &lookup,
                "RATE_LIMIT_WINDOW_SECS",
                defaults.window.as_secs(),
            )?),
            max_requests: parse_or(&lookup, "RATE_LIMIT_MAX_REQUESTS", defaults.max_requests)?,
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", 3000)?,
            database,
            environment: Environment::parse(lookup("APP_ENV")),
            rate_limit,
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
        })
    }

    pub fn expose_error_details(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
