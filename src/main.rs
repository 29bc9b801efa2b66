//! users-api 服务入口

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use users_api::{
    app::{users::MySqlUserRepository, AppState},
    build_router,
    core::rate_limit::RateLimiter,
    infrastructure::{config::AppConfig, database::DatabaseManager, logger::Logger},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 文件是可选的
    let dotenv = dotenvy::dotenv();

    // 初始化日志
    Logger::init();

    if let Err(err) = &dotenv {
        if !err.not_found() {
            error!(error = %err, "Failed to load .env file");
        }
    }

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    info!(?config, "Configuration loaded");

    // 初始化数据库连接池
    let database = DatabaseManager::new(&config.database);
    let repository = Arc::new(MySqlUserRepository::new(database.get_pool().clone()));

    // 创建应用状态和路由
    let state = AppState::new(
        repository,
        RateLimiter::new(config.rate_limit),
        config.expose_error_details(),
    );
    let app = build_router(state, &config.public_dir);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Server is running on port {}", config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("HTTP server stopped, closing database pool...");
    database.close().await;

    info!("Shutdown complete");
    Ok(())
}

/// 等待 SIGTERM 或 Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received"),
        _ = terminate => info!("SIGTERM received"),
    }
}
