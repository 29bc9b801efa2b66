//! # users-api
//!
//! 基于 Axum 和 SQLx(MySQL) 的用户 CRUD 服务，附带一个最近请求监控页面：
//! - 用户的创建、分页查询、按 id 读取、整体更新和删除
//! - 请求体校验、按客户端地址限流、安全响应头
//! - 内存中保存最近 10 个请求，在 `/` 页面展示

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{build_router, AppState};
