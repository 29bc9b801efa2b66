//! 日志基础设施

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "users_api=info,tower_http=info";

pub struct Logger;

impl Logger {
    /// 安装全局 subscriber，`RUST_LOG` 优先于默认过滤规则
    pub fn init() {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .init();
    }
}
