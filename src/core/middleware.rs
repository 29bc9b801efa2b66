//! 核心中间件模块
//!
//! 请求依次经过：安全响应头 → 限流 → 请求体缓冲与记录 → 路由处理；
//! 开发模式下 500 响应（包括处理器 panic）会补上内部错误信息。

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use http_body_util::LengthLimitError;
use serde_json::Value;
use std::{
    any::Any,
    error::Error as StdError,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};
use tracing::warn;

use super::{
    body::{decode, params_to_object, BodyKind},
    error::{AppError, ErrorBody, ErrorDetail, SERVER_ERROR},
    rate_limit::RateDecision,
};
use crate::app::{monitor::RecordedRequest, AppState};

/// 请求体上限
pub const BODY_LIMIT: usize = 100 * 1024;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; base-uri 'self'; \
    font-src 'self' https: data:; form-action 'self'; frame-ancestors 'self'; \
    img-src 'self' data:; object-src 'none'; script-src 'self' 'unsafe-inline'; \
    script-src-attr 'none'; style-src 'self' https: 'unsafe-inline'; \
    upgrade-insecure-requests";

const SECURITY_HEADERS: [(&str, &str); 12] = [
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    (
        "strict-transport-security",
        "max-age=15552000; includeSubDomains",
    ),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// 对端地址；没有连接信息时（例如测试中直接调用路由）所有请求共用一个地址
fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// 为每个响应添加安全相关的响应头
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in SECURITY_HEADERS {
        headers
            .entry(HeaderName::from_static(name))
            .or_insert(HeaderValue::from_static(value));
    }

    response
}

/// 限流中间件
pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let client = client_ip(&req);

    match state.rate_limiter.check(client) {
        RateDecision::Allowed { remaining } => {
            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", state.rate_limiter.max_requests().into());
            headers.insert("x-ratelimit-remaining", remaining.into());
            response
        }
        RateDecision::Limited { retry_after } => {
            warn!(%client, "Rate limit exceeded");
            // 向上取整到秒
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests, please try again later.",
            )
                .into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, seconds.into());
            response
        }
    }
}

/// 记录请求快照；非 GET 请求的请求体先被缓冲，然后原样交给后续处理器。
/// 请求体读取失败时也会先记录，再返回错误
pub async fn record_request(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let source_address = client_ip(&req).to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req
        .uri()
        .query()
        .map(|raw| params_to_object(raw.as_bytes()))
        .unwrap_or_default();

    let (req, body, failure) = if method == Method::GET {
        (req, None, None)
    } else {
        let (parts, body) = req.into_parts();
        match to_bytes(body, BODY_LIMIT).await {
            Ok(bytes) => {
                let recorded = decode(BodyKind::from_headers(&parts.headers), &bytes)
                    .unwrap_or_else(|_| {
                        Value::String(String::from_utf8_lossy(&bytes).into_owned())
                    });
                (
                    Request::from_parts(parts, Body::from(bytes)),
                    Some(recorded),
                    None,
                )
            }
            Err(err) => (
                Request::from_parts(parts, Body::empty()),
                None,
                Some(body_read_error(&err)),
            ),
        }
    };

    state.recorder.record(RecordedRequest {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        method: method.to_string(),
        path,
        query,
        body,
        source_address,
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(next.run(req).await),
    }
}

/// 超过长度上限返回 413，其余读取错误（例如客户端中断传输）按请求体异常处理
fn body_read_error(err: &axum::Error) -> AppError {
    let mut source = Some(err as &(dyn StdError + 'static));
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return AppError::PayloadTooLarge;
        }
        source = current.source();
    }

    warn!(error = %err, "Failed to read request body");
    AppError::MalformedBody
}

/// 开发模式下把内部错误信息写回 500 响应体
pub async fn expose_error_details(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    match response.extensions_mut().remove::<ErrorDetail>() {
        Some(ErrorDetail(message)) if state.expose_error_details => (
            response.status(),
            Json(ErrorBody {
                error: SERVER_ERROR,
                message: Some(message),
            }),
        )
            .into_response(),
        _ => response,
    }
}

/// 处理器 panic 时返回通用的 500 响应，panic 信息按内部错误处理
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}
